//! Logical and physical HDMI addresses.
//!
//! # Two kinds of address (for beginners)
//!
//! Every CEC device has a **logical address** (a 4-bit role such as "TV" or
//! "playback device 1") and a **physical address** (its position in the HDMI
//! topology, written `a.b.c.d`, where each digit is the HDMI input number on
//! the next device towards the TV).  The TV is always `0.0.0.0`; a player
//! plugged into TV input 2 is `2.0.0.0`.
//!
//! The daemon lets the user say which HDMI input it is plugged into with the
//! short [`HdmiAddress`] notation:
//!
//! | Text      | Meaning                                         |
//! |-----------|-------------------------------------------------|
//! | `tv`      | connected to the TV, input auto-detected        |
//! | `tv.2`    | connected to TV input 2                         |
//! | `av.1`    | connected to input 1 of the audio system        |
//! | `1.2.0.0` | explicit physical address                       |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an address string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,
    #[error("physical address component {0:?} is not a number between 0 and 15")]
    InvalidComponent(String),
    #[error("physical address has more than four components")]
    TooManyComponents,
    #[error("unknown device {0:?}, expected \"tv\" or \"av\"")]
    UnknownDevice(String),
    #[error("HDMI port {0:?} is not a number between 1 and 15")]
    InvalidPort(String),
    #[error("an audio system address needs an HDMI port, e.g. \"av.1\"")]
    MissingPort,
}

// ── Logical address ───────────────────────────────────────────────────────────

/// 4-bit CEC logical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAddress {
    Tv,
    RecordingDevice1,
    RecordingDevice2,
    Tuner1,
    PlaybackDevice1,
    AudioSystem,
    Tuner2,
    Tuner3,
    PlaybackDevice2,
    RecordingDevice3,
    Tuner4,
    PlaybackDevice3,
    Reserved1,
    Reserved2,
    FreeUse,
    /// Broadcast when used as a destination, unregistered as an initiator.
    Broadcast,
    /// Not yet known (no configuration received).
    Unknown,
}

impl LogicalAddress {
    /// Decodes a raw address; anything above 15 is [`LogicalAddress::Unknown`].
    pub fn from_u8(value: u8) -> Self {
        use LogicalAddress::*;
        match value {
            0 => Tv,
            1 => RecordingDevice1,
            2 => RecordingDevice2,
            3 => Tuner1,
            4 => PlaybackDevice1,
            5 => AudioSystem,
            6 => Tuner2,
            7 => Tuner3,
            8 => PlaybackDevice2,
            9 => RecordingDevice3,
            10 => Tuner4,
            11 => PlaybackDevice3,
            12 => Reserved1,
            13 => Reserved2,
            14 => FreeUse,
            15 => Broadcast,
            _ => Unknown,
        }
    }

    /// Returns the raw address, `0xFF` for [`LogicalAddress::Unknown`].
    pub fn as_u8(self) -> u8 {
        use LogicalAddress::*;
        match self {
            Tv => 0,
            RecordingDevice1 => 1,
            RecordingDevice2 => 2,
            Tuner1 => 3,
            PlaybackDevice1 => 4,
            AudioSystem => 5,
            Tuner2 => 6,
            Tuner3 => 7,
            PlaybackDevice2 => 8,
            RecordingDevice3 => 9,
            Tuner4 => 10,
            PlaybackDevice3 => 11,
            Reserved1 => 12,
            Reserved2 => 13,
            FreeUse => 14,
            Broadcast => 15,
            Unknown => 0xFF,
        }
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalAddress::Unknown => f.write_str("unknown"),
            other => write!(f, "{}", other.as_u8()),
        }
    }
}

// ── Physical address ──────────────────────────────────────────────────────────

/// 16-bit HDMI physical address, one nibble per topology level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhysicalAddress(pub u16);

impl PhysicalAddress {
    /// The TV's own address.
    pub const TV: PhysicalAddress = PhysicalAddress(0x0000);

    /// Builds an address from its four components (each masked to 4 bits).
    pub fn from_components(parts: [u8; 4]) -> Self {
        let value = parts
            .iter()
            .fold(0u16, |acc, &p| (acc << 4) | u16::from(p & 0x0F));
        PhysicalAddress(value)
    }

    /// Returns the four components, most significant first.
    pub fn components(self) -> [u8; 4] {
        let v = self.0;
        [
            ((v >> 12) & 0xF) as u8,
            ((v >> 8) & 0xF) as u8,
            ((v >> 4) & 0xF) as u8,
            (v & 0xF) as u8,
        ]
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.components();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for PhysicalAddress {
    type Err = AddressParseError;

    /// Parses `a[.b[.c[.d]]]`; missing trailing components are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddressParseError::Empty);
        }
        let mut parts = [0u8; 4];
        for (i, component) in s.split('.').enumerate() {
            if i >= parts.len() {
                return Err(AddressParseError::TooManyComponents);
            }
            parts[i] = component
                .parse::<u8>()
                .ok()
                .filter(|n| *n <= 15)
                .ok_or_else(|| AddressParseError::InvalidComponent(component.to_string()))?;
        }
        Ok(PhysicalAddress::from_components(parts))
    }
}

// ── HDMI target address ───────────────────────────────────────────────────────

/// Where this device is plugged in, as given on the command line or in the
/// config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HdmiAddress {
    /// Connected to the TV; `None` lets the adapter auto-detect the input.
    Tv { port: Option<u8> },
    /// Connected to the audio system on the given input.
    AudioSystem { port: u8 },
    /// Explicit physical address.
    Physical(PhysicalAddress),
}

fn parse_port(text: &str) -> Result<u8, AddressParseError> {
    text.parse::<u8>()
        .ok()
        .filter(|n| (1..=15).contains(n))
        .ok_or_else(|| AddressParseError::InvalidPort(text.to_string()))
}

impl FromStr for HdmiAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = s.chars().next().ok_or(AddressParseError::Empty)?;
        if first.is_ascii_digit() {
            return s.parse().map(HdmiAddress::Physical);
        }

        let (device, port) = match s.split_once('.') {
            Some((device, port)) => (device, Some(port)),
            None => (s, None),
        };
        match (device.to_ascii_lowercase().as_str(), port) {
            ("tv", None) => Ok(HdmiAddress::Tv { port: None }),
            ("tv", Some(p)) => Ok(HdmiAddress::Tv { port: Some(parse_port(p)?) }),
            ("av", None) => Err(AddressParseError::MissingPort),
            ("av", Some(p)) => Ok(HdmiAddress::AudioSystem { port: parse_port(p)? }),
            _ => Err(AddressParseError::UnknownDevice(device.to_string())),
        }
    }
}

impl fmt::Display for HdmiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdmiAddress::Tv { port: None } => f.write_str("tv"),
            HdmiAddress::Tv { port: Some(p) } => write!(f, "tv.{p}"),
            HdmiAddress::AudioSystem { port } => write!(f, "av.{port}"),
            HdmiAddress::Physical(pa) => write!(f, "{pa}"),
        }
    }
}

impl TryFrom<String> for HdmiAddress {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HdmiAddress> for String {
    fn from(value: HdmiAddress) -> Self {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
