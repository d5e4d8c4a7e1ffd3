//! Key notifications reported by the CEC adapter.

use crate::keymap::code::UserControlCode;

/// One key notification as reported by the adapter.
///
/// A `duration_ms` of zero marks the key-down edge.  Non-zero durations are
/// reported while the key is held and when it is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw CEC user control code.
    pub code: u8,
    /// How long the key has been held, in milliseconds.
    pub duration_ms: u32,
}

impl KeyEvent {
    /// A key-down edge for `code`.
    pub fn press(code: u8) -> Self {
        Self { code, duration_ms: 0 }
    }

    /// A held or released key with a non-zero duration.
    pub fn held(code: u8, duration_ms: u32) -> Self {
        Self { code, duration_ms }
    }

    /// Returns `true` if this event should produce key output.
    ///
    /// Only the key-down edge is emitted, except for the edge-triggered codes
    /// (`AN_RETURN`, `AN_CHANNELS_LIST`) whose key-down is never reported
    /// with a zero duration.
    pub fn is_press_edge(&self) -> bool {
        self.duration_ms == 0
            || UserControlCode::from_u8(self.code).is_some_and(UserControlCode::is_edge_triggered)
    }
}
