//! Application layer of the daemon.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure data and rules in `cec-core`) and the infrastructure (sockets,
//! signals, child processes).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain objects to fulfil a goal (e.g., "turn a key
//!   press reported by the TV into LIRC lines for every subscriber").
//! - **Depends on abstractions** (the traits in [`ports`]) rather than
//!   concrete implementations, so tests can swap the socket, the adapter, or
//!   the shell for in-memory recorders.
//! - **Contains no OS calls**.
//!
//! # Sub-modules
//!
//! - **`command_queue`** – The FIFO hand-off between the threads that observe
//!   events and the one thread allowed to act on them.
//! - **`dispatch`** – Drains the queue and executes each command.
//! - **`callbacks`** – Translates the seven adapter callbacks into commands.
//! - **`key_emitter`** – Turns control codes into LIRC lines.
//! - **`ports`** – The traits the infrastructure layer implements.

pub mod callbacks;
pub mod command_queue;
pub mod dispatch;
pub mod key_emitter;
pub mod ports;
