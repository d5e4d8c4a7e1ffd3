//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the daemon's TOML file and supplies
//! defaults for everything it leaves out, including the case where the
//! file does not exist at all.

pub mod config;
