//! TOML configuration for the daemon.
//!
//! The file lives at [`DEFAULT_CONFIG_PATH`] unless `--config` says
//! otherwise.  Every field is optional:
//!
//! ```toml
//! [daemon]
//! socket_path = "/var/run/lirc/lircd"
//! device = "RPI"
//! make_active = true
//! log_level = "info"
//! source_tag = "RPICEC"
//! target_address = "tv"
//! osd_name = "livingroom"
//!
//! [actions]
//! on_standby = "systemctl suspend"
//! on_activate = ""
//! on_deactivate = ""
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, so a partial file (or none at
//! all) still yields a complete [`DaemonConfig`].  Command-line flags are
//! layered on top of the loaded values in `main`.

use std::path::{Path, PathBuf};

use cec_core::{HdmiAddress, DEFAULT_SOURCE_TAG};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::ActionHooks;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cec-lircd/config.toml";

/// Socket LIRC clients connect to by default.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/lirc/lircd";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `source_tag` is empty or contains whitespace, which would break the
    /// space-separated line format.
    #[error("invalid source_tag {0:?}: must be non-empty with no whitespace")]
    InvalidSourceTag(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DaemonConfig {
    #[serde(default)]
    pub daemon: DaemonSection,
    #[serde(default)]
    pub actions: ActionsSection,
}

/// Socket, adapter and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaemonSection {
    /// Path of the LIRC Unix socket.
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    /// Adapter port name.  Absent means the first adapter found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Whether to claim active source on start and on request.
    #[serde(default = "default_true")]
    pub make_active: bool,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Last field of every emitted line.  A single token: no whitespace.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
    /// HDMI input the adapter is plugged into, e.g. `"tv.2"` or `"1.0.0.0"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_address: Option<HdmiAddress>,
    /// Name shown in the TV's source list.  Absent means the hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osd_name: Option<String>,
}

/// Shell commands run on power transitions.  Empty strings mean unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_standby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_activate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_deactivate: Option<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_socket_path() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_PATH)
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_source_tag() -> String {
    DEFAULT_SOURCE_TAG.to_string()
}

impl Default for DaemonSection {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            device: None,
            make_active: default_true(),
            log_level: default_log_level(),
            source_tag: default_source_tag(),
            target_address: None,
            osd_name: None,
        }
    }
}

impl ActionsSection {
    /// Converts to [`ActionHooks`], treating blank commands as unset.
    pub fn hooks(&self) -> ActionHooks {
        fn configured(cmd: &Option<String>) -> Option<String> {
            cmd.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(str::to_string)
        }
        ActionHooks {
            on_standby: configured(&self.on_standby),
            on_activate: configured(&self.on_activate),
            on_deactivate: configured(&self.on_deactivate),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Parses `content` as a config file.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the TOML is malformed or a value has
/// the wrong type (including an unparseable `target_address`), and
/// [`ConfigError::InvalidSourceTag`] if `source_tag` is not a single token.
pub fn parse_config(content: &str) -> Result<DaemonConfig, ConfigError> {
    let config: DaemonConfig = toml::from_str(content)?;
    validate_source_tag(&config.daemon.source_tag)?;
    Ok(config)
}

/// Checks that `tag` can be the last field of a line.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSourceTag`] if `tag` is empty or contains a
/// whitespace or control character.
pub fn validate_source_tag(tag: &str) -> Result<(), ConfigError> {
    if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidSourceTag(tag.to_string()));
    }
    Ok(())
}

/// Loads the config at `path`, returning `DaemonConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::InvalidSourceTag`] for a tag that would split the line.
pub fn load_config(path: &Path) -> Result<DaemonConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DaemonConfig::default()),
        Err(e) => Err(ConfigError::Io { path: path.to_path_buf(), source: e }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cec_core::LircLine;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_config_uses_lirc_socket_path() {
        // Arrange / Act
        let cfg = DaemonConfig::default();

        // Assert
        assert_eq!(cfg.daemon.socket_path, PathBuf::from("/var/run/lirc/lircd"));
        assert_eq!(cfg.daemon.source_tag, "RPICEC");
        assert_eq!(cfg.daemon.log_level, "info");
    }

    #[test]
    fn test_default_config_makes_active_and_has_no_actions() {
        let cfg = DaemonConfig::default();
        assert!(cfg.daemon.make_active);
        assert_eq!(cfg.actions.hooks(), ActionHooks::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let cfg = parse_config("").expect("parse");
        assert_eq!(cfg, DaemonConfig::default());
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_partial_file_fills_remaining_defaults() {
        // Arrange
        let content = r#"
            [daemon]
            device = "RPI"
            target_address = "tv.2"
        "#;

        // Act
        let cfg = parse_config(content).expect("parse");

        // Assert
        assert_eq!(cfg.daemon.device.as_deref(), Some("RPI"));
        assert_eq!(cfg.daemon.target_address, Some(HdmiAddress::Tv { port: Some(2) }));
        assert!(cfg.daemon.make_active);
        assert_eq!(cfg.daemon.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
    }

    #[test]
    fn test_blank_actions_are_unset() {
        let content = r#"
            [actions]
            on_standby = "systemctl suspend"
            on_activate = ""
            on_deactivate = "   "
        "#;

        let hooks = parse_config(content).expect("parse").actions.hooks();

        assert_eq!(hooks.on_standby.as_deref(), Some("systemctl suspend"));
        assert_eq!(hooks.on_activate, None);
        assert_eq!(hooks.on_deactivate, None);
    }

    #[test]
    fn test_invalid_target_address_is_parse_error() {
        let result = parse_config("[daemon]\ntarget_address = \"dvd.9\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let result = parse_config("[daemon]\nmake_active = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_source_tag_with_space_is_rejected() {
        let result = parse_config("[daemon]\nsource_tag = \"LIVING ROOM\"\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSourceTag(tag)) if tag == "LIVING ROOM"
        ));
    }

    #[test]
    fn test_source_tag_with_newline_or_empty_is_rejected() {
        for content in ["[daemon]\nsource_tag = \"A\\nB\"\n", "[daemon]\nsource_tag = \"\"\n"] {
            assert!(
                matches!(parse_config(content), Err(ConfigError::InvalidSourceTag(_))),
                "accepted {content:?}"
            );
        }
    }

    #[test]
    fn test_accepted_source_tag_produces_parseable_lines() {
        // Arrange
        let cfg = parse_config("[daemon]\nsource_tag = \"LIVING_ROOM\"\n").expect("parse");

        // Act
        let text = LircLine::format(0x2b, false, "KEY_ENTER", &cfg.daemon.source_tag);
        let line: LircLine = text.parse().expect("line parses");

        // Assert
        assert_eq!(line.source, "LIVING_ROOM");
        assert_eq!(line.name, "KEY_ENTER");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        // Arrange
        let mut cfg = DaemonConfig::default();
        cfg.daemon.osd_name = Some("kodi".to_string());
        cfg.daemon.target_address = Some(HdmiAddress::AudioSystem { port: 1 });
        cfg.actions.on_standby = Some("true".to_string());

        // Act
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored = parse_config(&text).expect("parse");

        // Assert
        assert_eq!(cfg, restored);
    }

    // ── Loading from disk ─────────────────────────────────────────────────────

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, DaemonConfig::default());
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[daemon]\nsource_tag = \"LIVING\"\n").expect("write");

        let cfg = load_config(&path).expect("load");

        assert_eq!(cfg.daemon.source_tag, "LIVING");
    }

    #[test]
    fn test_load_rejects_source_tag_with_space() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[daemon]\nsource_tag = \"A B\"\n").expect("write");

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::InvalidSourceTag(_))));
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
