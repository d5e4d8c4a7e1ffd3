//! LIRC daemon socket text protocol.

pub mod line;

pub use line::{LineParseError, LircLine, DEFAULT_SOURCE_TAG};
