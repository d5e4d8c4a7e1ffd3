//! HDMI-CEC bus vocabulary delivered by the adapter callbacks.
//!
//! Only the opcodes and operands the daemon reacts to get named variants;
//! everything else is preserved as a raw byte so it can still be logged.

use std::fmt;

use super::address::{LogicalAddress, PhysicalAddress};

// ── Opcodes ───────────────────────────────────────────────────────────────────

/// CEC message opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    FeatureAbort,
    ImageViewOn,
    GiveDeckStatus,
    DeckStatus,
    TextViewOn,
    SetMenuLanguage,
    Standby,
    Play,
    DeckControl,
    UserControlPressed,
    UserControlRelease,
    GiveOsdName,
    SetOsdName,
    RoutingChange,
    RoutingInformation,
    ActiveSource,
    RequestActiveSource,
    SetStreamPath,
    DeviceVendorId,
    VendorCommand,
    VendorRemoteButtonDown,
    VendorRemoteButtonUp,
    GiveDeviceVendorId,
    MenuRequest,
    MenuStatus,
    GiveDevicePowerStatus,
    ReportPowerStatus,
    GetMenuLanguage,
    InactiveSource,
    CecVersion,
    GetCecVersion,
    /// Any opcode without a named variant.
    Other(u8),
}

impl Opcode {
    /// Decodes a raw opcode byte.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Opcode::FeatureAbort,
            0x04 => Opcode::ImageViewOn,
            0x1A => Opcode::GiveDeckStatus,
            0x1B => Opcode::DeckStatus,
            0x0D => Opcode::TextViewOn,
            0x32 => Opcode::SetMenuLanguage,
            0x36 => Opcode::Standby,
            0x41 => Opcode::Play,
            0x42 => Opcode::DeckControl,
            0x44 => Opcode::UserControlPressed,
            0x45 => Opcode::UserControlRelease,
            0x46 => Opcode::GiveOsdName,
            0x47 => Opcode::SetOsdName,
            0x80 => Opcode::RoutingChange,
            0x81 => Opcode::RoutingInformation,
            0x82 => Opcode::ActiveSource,
            0x85 => Opcode::RequestActiveSource,
            0x86 => Opcode::SetStreamPath,
            0x87 => Opcode::DeviceVendorId,
            0x89 => Opcode::VendorCommand,
            0x8A => Opcode::VendorRemoteButtonDown,
            0x8B => Opcode::VendorRemoteButtonUp,
            0x8C => Opcode::GiveDeviceVendorId,
            0x8D => Opcode::MenuRequest,
            0x8E => Opcode::MenuStatus,
            0x8F => Opcode::GiveDevicePowerStatus,
            0x90 => Opcode::ReportPowerStatus,
            0x91 => Opcode::GetMenuLanguage,
            0x9D => Opcode::InactiveSource,
            0x9E => Opcode::CecVersion,
            0x9F => Opcode::GetCecVersion,
            other => Opcode::Other(other),
        }
    }

    /// Returns the raw opcode byte.
    pub fn as_u8(self) -> u8 {
        match self {
            Opcode::FeatureAbort => 0x00,
            Opcode::ImageViewOn => 0x04,
            Opcode::GiveDeckStatus => 0x1A,
            Opcode::DeckStatus => 0x1B,
            Opcode::TextViewOn => 0x0D,
            Opcode::SetMenuLanguage => 0x32,
            Opcode::Standby => 0x36,
            Opcode::Play => 0x41,
            Opcode::DeckControl => 0x42,
            Opcode::UserControlPressed => 0x44,
            Opcode::UserControlRelease => 0x45,
            Opcode::GiveOsdName => 0x46,
            Opcode::SetOsdName => 0x47,
            Opcode::RoutingChange => 0x80,
            Opcode::RoutingInformation => 0x81,
            Opcode::ActiveSource => 0x82,
            Opcode::RequestActiveSource => 0x85,
            Opcode::SetStreamPath => 0x86,
            Opcode::DeviceVendorId => 0x87,
            Opcode::VendorCommand => 0x89,
            Opcode::VendorRemoteButtonDown => 0x8A,
            Opcode::VendorRemoteButtonUp => 0x8B,
            Opcode::GiveDeviceVendorId => 0x8C,
            Opcode::MenuRequest => 0x8D,
            Opcode::MenuStatus => 0x8E,
            Opcode::GiveDevicePowerStatus => 0x8F,
            Opcode::ReportPowerStatus => 0x90,
            Opcode::GetMenuLanguage => 0x91,
            Opcode::InactiveSource => 0x9D,
            Opcode::CecVersion => 0x9E,
            Opcode::GetCecVersion => 0x9F,
            Opcode::Other(raw) => raw,
        }
    }
}

/// Operand of `<Deck Control>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckControlMode {
    SkipForward,
    SkipReverse,
    Stop,
    Eject,
    Other(u8),
}

impl DeckControlMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => DeckControlMode::SkipForward,
            0x02 => DeckControlMode::SkipReverse,
            0x03 => DeckControlMode::Stop,
            0x04 => DeckControlMode::Eject,
            other => DeckControlMode::Other(other),
        }
    }
}

/// Operand of `<Play>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    PlayReverse,
    PlayForward,
    PlayStill,
    /// One of the fast/slow forward/reverse speeds.
    Other(u8),
}

impl PlayMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x20 => PlayMode::PlayReverse,
            0x24 => PlayMode::PlayForward,
            0x25 => PlayMode::PlayStill,
            other => PlayMode::Other(other),
        }
    }
}

/// A received CEC frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CecCommand {
    pub initiator: LogicalAddress,
    pub destination: LogicalAddress,
    pub opcode: Opcode,
    /// Operand bytes following the opcode.
    pub parameters: Vec<u8>,
}

impl CecCommand {
    pub fn new(
        initiator: LogicalAddress,
        destination: LogicalAddress,
        opcode: Opcode,
        parameters: Vec<u8>,
    ) -> Self {
        Self { initiator, destination, opcode, parameters }
    }

    /// First operand byte, if any.
    pub fn first_parameter(&self) -> Option<u8> {
        self.parameters.first().copied()
    }

    /// Decodes the ISO 639-2 language code carried by `<Set Menu Language>`.
    ///
    /// Only frames sent by the TV to `own` or to everyone count; anything
    /// else yields `None`.
    pub fn menu_language(&self, own: LogicalAddress) -> Option<String> {
        if self.opcode != Opcode::SetMenuLanguage || self.parameters.len() != 3 {
            return None;
        }
        if self.initiator != LogicalAddress::Tv {
            return None;
        }
        if self.destination != own && self.destination != LogicalAddress::Broadcast {
            return None;
        }
        if !self.parameters.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(self.parameters.iter().map(|&b| char::from(b)).collect())
    }
}

impl fmt::Display for CecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}{:x}:{:02x}",
            self.initiator.as_u8(),
            self.destination.as_u8(),
            self.opcode.as_u8()
        )?;
        for p in &self.parameters {
            write!(f, ":{p:02x}")?;
        }
        Ok(())
    }
}

// ── Alerts ────────────────────────────────────────────────────────────────────

/// Out-of-band condition reported by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    ServiceDevice,
    ConnectionLost,
    PermissionError,
    PortBusy,
    PhysicalAddressError,
    TvPollFailed,
    Other(u8),
}

impl Alert {
    /// Returns `true` if the adapter link must be reopened.
    pub fn requires_restart(self) -> bool {
        matches!(
            self,
            Alert::ConnectionLost
                | Alert::PermissionError
                | Alert::PortBusy
                | Alert::PhysicalAddressError
                | Alert::TvPollFailed
        )
    }
}

// ── Log messages ──────────────────────────────────────────────────────────────

/// Severity attached to adapter log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Notice,
    Traffic,
    Debug,
}

/// A log line produced inside the adapter library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    /// Milliseconds since the adapter was opened.
    pub time_ms: u64,
}

impl LogMessage {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), time_ms: 0 }
    }
}

// ── Menu state / configuration ───────────────────────────────────────────────

/// Whether the TV has handed its menu to this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Activated,
    Deactivated,
}

/// The adapter's view of its own identity on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfiguration {
    /// Logical address claimed on the bus.
    pub primary_address: LogicalAddress,
    pub physical_address: PhysicalAddress,
    /// Name shown in the TV's source list.
    pub osd_name: String,
}
