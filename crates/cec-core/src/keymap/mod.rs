//! Control code to key name translation.
//!
//! The canonical input is the raw CEC user control code byte delivered by the
//! adapter.  [`KeyMap`] resolves it to the ordered LIRC key names that are
//! written to subscribers.

pub mod code;
pub mod lirc;

use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

pub use code::UserControlCode;

/// Highest control code covered by the table (`AN_CHANNELS_LIST`).
pub const MAX_CONTROL_CODE: u8 = 0x96;

/// Error type for key map lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyMapError {
    /// The code lies outside `0..=MAX_CONTROL_CODE`.
    #[error("control code 0x{0:02x} is outside the key map domain (max 0x{max:02x})", max = MAX_CONTROL_CODE)]
    OutOfRange(u8),
}

/// Read-only table from control code to LIRC key names.
///
/// Every code in `0..=MAX_CONTROL_CODE` has an entry; reserved and
/// suppressed codes hold an empty slice.
#[derive(Debug)]
pub struct KeyMap {
    entries: Vec<&'static [&'static str]>,
}

static GLOBAL_KEYMAP: OnceLock<KeyMap> = OnceLock::new();

impl KeyMap {
    /// Builds a fresh table from [`lirc::lirc_names`].
    pub fn build() -> Self {
        let entries = (0..=MAX_CONTROL_CODE)
            .map(|raw| UserControlCode::from_u8(raw).map_or(&[][..], lirc::lirc_names))
            .collect();
        Self { entries }
    }

    /// Returns the process-wide table, building it on first use.
    ///
    /// Construction happens at most once even when several threads race on
    /// the first call.
    pub fn global() -> &'static KeyMap {
        GLOBAL_KEYMAP.get_or_init(|| {
            let map = KeyMap::build();
            debug!("built CEC key map with {} entries", map.len());
            map
        })
    }

    /// Looks up the key names for a raw control code.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::OutOfRange`] if `code > MAX_CONTROL_CODE`.
    pub fn lookup(&self, code: u8) -> Result<&'static [&'static str], KeyMapError> {
        self.entries
            .get(usize::from(code))
            .copied()
            .ok_or(KeyMapError::OutOfRange(code))
    }

    /// Looks up the key names for a typed control code.
    pub fn names(&self, code: UserControlCode) -> &'static [&'static str] {
        // Every variant is within the domain.
        self.lookup(code.as_u8()).unwrap_or(&[])
    }

    /// Number of codes covered (always `MAX_CONTROL_CODE + 1`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
