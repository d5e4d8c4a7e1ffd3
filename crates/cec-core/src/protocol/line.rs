//! One line of the LIRC daemon broadcast protocol.
//!
//! `lircd` publishes every decoded button on its Unix socket as:
//!
//! ```text
//! <code> <repeat> <name> <remote>\n
//! ```
//!
//! - `code`   – the raw code, lowercase hexadecimal without a `0x` prefix
//! - `repeat` – `0` for the first report of a press, `1` for repeats
//! - `name`   – symbolic key name, e.g. `KEY_OK`
//! - `remote` – name of the remote that produced the key
//!
//! Clients (media centers, `irexec`, `irw`) only look at `name` and
//! `remote`, but they split on single spaces, so neither may contain one.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Remote name written in the last field when none is configured.
pub const DEFAULT_SOURCE_TAG: &str = "RPICEC";

/// Error returned when a received line does not follow the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineParseError {
    #[error("line is not terminated by a newline")]
    MissingNewline,
    #[error("expected 4 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid hexadecimal code {0:?}")]
    InvalidCode(String),
    #[error("invalid repeat flag {0:?}")]
    InvalidRepeat(String),
}

/// A single key report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LircLine {
    pub code: u32,
    pub repeat: bool,
    pub name: String,
    pub source: String,
}

impl LircLine {
    pub fn new(code: u32, repeat: bool, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self { code, repeat, name: name.into(), source: source.into() }
    }

    /// Formats the line straight from borrowed parts, without allocating a
    /// [`LircLine`] first.  This is the hot path used for every emitted key.
    pub fn format(code: u32, repeat: bool, name: &str, source: &str) -> String {
        format!("{code:x} {} {name} {source}\n", u8::from(repeat))
    }
}

impl fmt::Display for LircLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:x} {} {} {}", self.code, u8::from(self.repeat), self.name, self.source)
    }
}

impl FromStr for LircLine {
    type Err = LineParseError;

    /// Parses one complete line, including its trailing `\n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_suffix('\n').ok_or(LineParseError::MissingNewline)?;
        let fields: Vec<&str> = body.split(' ').collect();
        let [code, repeat, name, source] = fields.as_slice() else {
            return Err(LineParseError::FieldCount(fields.len()));
        };

        let code = u32::from_str_radix(code, 16)
            .map_err(|_| LineParseError::InvalidCode((*code).to_string()))?;
        let repeat = match *repeat {
            "0" => false,
            "1" => true,
            other => return Err(LineParseError::InvalidRepeat(other.to_string())),
        };
        Ok(LircLine::new(code, repeat, *name, *source))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
