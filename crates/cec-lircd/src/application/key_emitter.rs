//! Turns control codes into LIRC lines.
//!
//! The emitter owns the press-only repeat policy: a key is reported once,
//! on its key-down edge.  Holding a key does not produce repeat lines; LIRC
//! clients that want auto-repeat implement it themselves.
//!
//! The emitter is owned by the dispatch loop, so every line in the process
//! is written from that one thread, in command order.

use cec_core::{KeyMap, KeyMapError, LircLine, UserControlCode};
use tracing::debug;

use super::ports::LineSink;

/// Formats and writes key lines for one source tag.
#[derive(Debug)]
pub struct KeyEmitter {
    keymap: &'static KeyMap,
    source_tag: String,
    last_emitted: Vec<&'static str>,
}

impl KeyEmitter {
    /// Creates an emitter using the process-wide [`KeyMap`].
    pub fn new(source_tag: impl Into<String>) -> Self {
        Self { keymap: KeyMap::global(), source_tag: source_tag.into(), last_emitted: Vec::new() }
    }

    /// Emits one line per key name mapped to `code`.
    ///
    /// Suppressed codes write nothing and leave [`last_emitted`](Self::last_emitted)
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::OutOfRange`] if the code is outside the table.
    pub fn press(&mut self, code: u8, sink: &dyn LineSink) -> Result<usize, KeyMapError> {
        let names = self.keymap.lookup(code)?;
        if names.is_empty() {
            debug!(code, "control code has no LIRC key, nothing emitted");
            return Ok(0);
        }
        self.write_lines(code, names, sink);
        self.last_emitted = names.to_vec();
        Ok(names.len())
    }

    /// Emits a full press and release cycle for `code`.
    ///
    /// Both halves are reported with the repeat flag cleared, so clients see
    /// each key name twice.  Used when the daemon synthesizes a key itself
    /// rather than relaying one from the remote.
    pub fn press_and_release(&mut self, code: UserControlCode, sink: &dyn LineSink) -> usize {
        let names = self.keymap.names(code);
        self.write_lines(code.as_u8(), names, sink);
        self.write_lines(code.as_u8(), names, sink);
        self.last_emitted = names.to_vec();
        names.len() * 2
    }

    /// Key names written by the most recent emission.
    pub fn last_emitted(&self) -> &[&'static str] {
        &self.last_emitted
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    fn write_lines(&self, code: u8, names: &[&str], sink: &dyn LineSink) {
        for name in names {
            let line = LircLine::format(u32::from(code), false, name, &self.source_tag);
            let delivered = sink.broadcast(&line);
            debug!(key = name, code, delivered, "key emitted");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
