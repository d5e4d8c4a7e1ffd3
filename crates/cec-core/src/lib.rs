//! # cec-core
//!
//! Shared library for cec-lircd containing the remote-control key tables,
//! the HDMI-CEC domain types, and the LIRC text line format.
//!
//! It has zero dependencies on OS APIs, sockets, or threads, so everything
//! in here can be unit-tested on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! A TV remote talks to the TV over infrared.  When the TV is linked to
//! other HDMI devices it relays button presses over the **CEC** bus (a slow
//! single-wire bus inside the HDMI cable).  cec-lircd listens on that bus and
//! re-publishes each button as a line of text on a LIRC daemon socket, so any
//! program that already understands LIRC remotes (media centers, scripts)
//! can react to the TV remote.
//!
//! This crate defines:
//!
//! - **`keymap`** – The table that turns a CEC *user control code* (the
//!   button number on the bus) into one or more LIRC key names such as
//!   `KEY_OK` or `KEY_VOLUMEUP`.
//!
//! - **`domain`** – The vocabulary of the daemon: the [`Command`] values that
//!   flow through the dispatch queue, key events, CEC frames, alerts, and
//!   HDMI addresses.
//!
//! - **`protocol`** – The exact text format of one LIRC line.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::address::{AddressParseError, HdmiAddress, LogicalAddress, PhysicalAddress};
pub use domain::cec::{
    AdapterConfiguration, Alert, CecCommand, DeckControlMode, LogLevel, LogMessage, MenuState,
    Opcode, PlayMode,
};
pub use domain::command::Command;
pub use domain::key_event::KeyEvent;
pub use keymap::code::UserControlCode;
pub use keymap::{KeyMap, KeyMapError, MAX_CONTROL_CODE};
pub use protocol::line::{LineParseError, LircLine, DEFAULT_SOURCE_TAG};
