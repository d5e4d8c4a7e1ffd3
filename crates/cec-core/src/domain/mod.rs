//! Domain entities for cec-lircd.
//!
//! This module contains pure data types and rules with no infrastructure
//! dependencies.
//!
//! # What lives here (for beginners)
//!
//! - [`command::Command`] is the unit of work handed from the CEC callback
//!   threads (and the signal thread) to the single dispatch thread.
//! - [`key_event::KeyEvent`] is a key notification as the adapter reports it,
//!   together with the rule deciding whether it counts as a press.
//! - [`cec`] holds the bus-level vocabulary: opcodes, alerts, log messages,
//!   and the adapter configuration record.
//! - [`address`] holds logical and physical HDMI addresses plus the
//!   `tv` / `tv.N` / `av.N` target notation used on the command line.

pub mod address;
pub mod cec;
pub mod command;
pub mod key_event;
