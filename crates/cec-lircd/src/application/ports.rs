//! Traits at the boundary between the application and infrastructure layers.
//!
//! Production implementations live in `infrastructure`; tests use the
//! in-memory doubles next to them (or `mockall` mocks for [`ActionRunner`]).

use std::sync::Arc;

use cec_core::{
    AdapterConfiguration, Alert, CecCommand, HdmiAddress, KeyEvent, LogMessage, LogicalAddress,
    MenuState, PhysicalAddress,
};
use thiserror::Error;

// ── Line output ───────────────────────────────────────────────────────────────

/// Destination for formatted LIRC lines.
pub trait LineSink: Send + Sync {
    /// Writes `line` to every subscriber and returns how many received it.
    fn broadcast(&self, line: &str) -> usize;
}

// ── External actions ──────────────────────────────────────────────────────────

/// Error type for configured shell actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The command could not be started.
    #[error("failed to start {label} action {command:?}: {source}")]
    Spawn {
        label: String,
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// The command ran but did not exit successfully.
    #[error("{label} action {command:?} exited with {status}")]
    Failed {
        label: String,
        command: String,
        status: String,
    },
}

/// Runs the user-configured commands for standby/activate/deactivate.
#[cfg_attr(test, mockall::automock)]
pub trait ActionRunner: Send + Sync {
    /// Runs `command` to completion.  `label` names the transition for logs.
    fn run(&self, label: &str, command: &str) -> Result<(), ActionError>;
}

// ── CEC adapter ───────────────────────────────────────────────────────────────

/// Error type for adapter operations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No CEC adapter was detected.
    #[error("no CEC adapter found")]
    NoAdapter,
    /// The adapter exists but could not be opened.
    #[error("failed to open CEC adapter {device}: {reason}")]
    OpenFailed { device: String, reason: String },
    /// An operation was attempted before `open` or after `close`.
    #[error("CEC adapter is not open")]
    NotOpen,
    /// The adapter refused the request.
    #[error("CEC adapter rejected the request: {0}")]
    Rejected(String),
}

/// Parameters used when opening the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    /// Device/port name; `None` opens the first adapter found.
    pub device: Option<String>,
    /// Name shown in the TV's source list.
    pub osd_name: String,
}

/// One detected adapter, as printed by `--list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// Port name to pass back in [`AdapterSettings::device`].
    pub port: String,
    /// OS device path.
    pub comm_path: String,
    pub physical_address: PhysicalAddress,
    pub vendor: String,
    pub firmware_version: u16,
}

/// The seven notifications an open adapter delivers.
///
/// Implementations are called on the adapter's own threads, concurrently
/// with each other and with the dispatch loop, so they must only enqueue
/// work and never block.
pub trait CecCallbacks: Send + Sync {
    fn on_log_message(&self, message: &LogMessage);
    fn on_key_press(&self, event: KeyEvent);
    fn on_command(&self, command: &CecCommand);
    fn on_configuration_changed(&self, configuration: &AdapterConfiguration);
    fn on_alert(&self, alert: Alert);
    fn on_menu_state_changed(&self, state: MenuState);
    fn on_source_activated(&self, address: LogicalAddress, activated: bool);
}

/// Lifecycle of the HDMI-CEC adapter.
///
/// The production binding wraps the vendor library; [`crate::infrastructure::cec_adapter::mock::MockCecAdapter`]
/// is an in-process stand-in.
pub trait CecAdapter: Send {
    /// Opens the adapter and starts delivering notifications to `callbacks`.
    fn open(
        &mut self,
        settings: &AdapterSettings,
        callbacks: Arc<dyn CecCallbacks>,
    ) -> Result<(), AdapterError>;

    /// Closes the adapter.  With `make_inactive` the device first tells the
    /// bus it is no longer the active source.  Idempotent.
    fn close(&mut self, make_inactive: bool);

    /// Announces this device as the active source.
    fn make_active(&mut self) -> Result<(), AdapterError>;

    /// Tells the adapter which HDMI input it is connected to.
    fn set_target_address(&mut self, address: HdmiAddress) -> Result<(), AdapterError>;

    /// Lists the adapters present on this machine.
    fn list_devices(&self) -> Result<Vec<AdapterDescriptor>, AdapterError>;
}
