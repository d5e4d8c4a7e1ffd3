//! Infrastructure layer of the daemon.
//!
//! Contains OS-facing adapters: the LIRC Unix socket, signal delivery,
//! shell actions, the CEC adapter binding, configuration storage, and the
//! supervisor that wires them into the application layer.
//!
//! **Dependency rule**: this layer may depend on `application` and `cec_core`,
//! but production code in `application` must only see it through the traits
//! in `application::ports`.

pub mod actions;
pub mod cec_adapter;
pub mod daemon;
pub mod lirc_socket;
pub mod signals;
pub mod storage;
