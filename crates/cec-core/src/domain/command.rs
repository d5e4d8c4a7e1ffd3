//! Commands processed by the dispatch loop.

use std::fmt;

use crate::keymap::code::UserControlCode;

/// A unit of work for the dispatch thread.
///
/// Commands are created on whatever thread observed the triggering event
/// (CEC callback thread, signal thread) and moved into the command queue.
/// Only [`Command::KeyPress`] carries a payload: the raw control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// The TV asked every device to go to standby.
    Standby,
    /// This device became the active source.
    Activate,
    /// Another device became the active source.
    Inactive,
    /// Close and reopen the adapter and the subscriber socket.
    Restart,
    /// Emit the key names mapped to this control code.
    KeyPress(u8),
    /// Leave the dispatch loop and shut down.
    Exit,
}

impl Command {
    /// Shorthand for a key press of a typed control code.
    pub fn key(code: UserControlCode) -> Self {
        Command::KeyPress(code.as_u8())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Standby => f.write_str("standby"),
            Command::Activate => f.write_str("activate"),
            Command::Inactive => f.write_str("inactive"),
            Command::Restart => f.write_str("restart"),
            Command::KeyPress(code) => write!(f, "keypress(0x{code:02x})"),
            Command::Exit => f.write_str("exit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shorthand_carries_raw_code() {
        assert_eq!(Command::key(UserControlCode::Stop), Command::KeyPress(0x45));
    }

    #[test]
    fn test_display_is_lowercase_and_shows_keypress_code() {
        assert_eq!(Command::Standby.to_string(), "standby");
        assert_eq!(Command::KeyPress(0x0b).to_string(), "keypress(0x0b)");
    }
}
