//! HDMI-CEC user control codes (CEC 1.4, table 27 "User Control Codes").
//!
//! A user control code is the one-byte operand of the `<User Control Pressed>`
//! message.  The TV sends one of these whenever a button on its remote is
//! pressed and the key is routed to this device.
//!
//! # Gaps in the code space (for beginners)
//!
//! The code space is not contiguous: ranges such as `0x0E..=0x1F` are
//! reserved by the CEC standard and never sent by a compliant TV.  Reserved
//! values still belong to the table domain (`0..=0x96`), they simply have no
//! [`UserControlCode`] variant and no LIRC key name.

use serde::{Deserialize, Serialize};

/// CEC user control code, as delivered by the adapter with every key event.
///
/// The numeric value of each variant is its code on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UserControlCode {
    // Navigation (0x00–0x0D)
    Select = 0x00,
    Up = 0x01,
    Down = 0x02,
    Left = 0x03,
    Right = 0x04,
    RightUp = 0x05,
    RightDown = 0x06,
    LeftUp = 0x07,
    LeftDown = 0x08,
    RootMenu = 0x09,
    SetupMenu = 0x0A,
    ContentsMenu = 0x0B,
    FavoriteMenu = 0x0C,
    Exit = 0x0D,

    // Reserved 0x0E–0x0F; top menu / DVD menu (CEC 2.0)
    TopMenu = 0x10,
    DvdMenu = 0x11,

    // Number entry mode (CEC 2.0)
    NumberEntryMode = 0x1D,
    Number11 = 0x1E,
    Number12 = 0x1F,

    // Digits (0x20–0x29)
    Number0 = 0x20,
    Number1 = 0x21,
    Number2 = 0x22,
    Number3 = 0x23,
    Number4 = 0x24,
    Number5 = 0x25,
    Number6 = 0x26,
    Number7 = 0x27,
    Number8 = 0x28,
    Number9 = 0x29,

    // Entry (0x2A–0x2F)
    Dot = 0x2A,
    Enter = 0x2B,
    Clear = 0x2C,
    NextFavorite = 0x2F,

    // Channel and information (0x30–0x38)
    ChannelUp = 0x30,
    ChannelDown = 0x31,
    PreviousChannel = 0x32,
    SoundSelect = 0x33,
    InputSelect = 0x34,
    DisplayInformation = 0x35,
    Help = 0x36,
    PageUp = 0x37,
    PageDown = 0x38,

    // Power, volume and transport (0x40–0x4E)
    Power = 0x40,
    VolumeUp = 0x41,
    VolumeDown = 0x42,
    Mute = 0x43,
    Play = 0x44,
    Stop = 0x45,
    Pause = 0x46,
    Record = 0x47,
    Rewind = 0x48,
    FastForward = 0x49,
    Eject = 0x4A,
    Forward = 0x4B,
    Backward = 0x4C,
    StopRecord = 0x4D,
    PauseRecord = 0x4E,

    // Presentation (0x50–0x55)
    Angle = 0x50,
    SubPicture = 0x51,
    VideoOnDemand = 0x52,
    ElectronicProgramGuide = 0x53,
    TimerProgramming = 0x54,
    InitialConfiguration = 0x55,
    SelectBroadcastType = 0x56,
    SelectSoundPresentation = 0x57,

    // Functions (0x60–0x6D)
    PlayFunction = 0x60,
    PausePlayFunction = 0x61,
    RecordFunction = 0x62,
    PauseRecordFunction = 0x63,
    StopFunction = 0x64,
    MuteFunction = 0x65,
    RestoreVolumeFunction = 0x66,
    TuneFunction = 0x67,
    SelectMediaFunction = 0x68,
    SelectAvInputFunction = 0x69,
    SelectAudioInputFunction = 0x6A,
    PowerToggleFunction = 0x6B,
    PowerOffFunction = 0x6C,
    PowerOnFunction = 0x6D,

    // Coloured keys (0x71–0x76)
    F1Blue = 0x71,
    F2Red = 0x72,
    F3Green = 0x73,
    F4Yellow = 0x74,
    F5 = 0x75,
    Data = 0x76,

    // Vendor extensions reported by some adapters
    AnReturn = 0x91,
    AnChannelsList = 0x96,
}

impl UserControlCode {
    /// Converts a raw control code to a [`UserControlCode`].
    ///
    /// Returns `None` for reserved values and for anything above
    /// [`crate::MAX_CONTROL_CODE`].
    pub fn from_u8(value: u8) -> Option<Self> {
        use UserControlCode::*;
        let code = match value {
            0x00 => Select,
            0x01 => Up,
            0x02 => Down,
            0x03 => Left,
            0x04 => Right,
            0x05 => RightUp,
            0x06 => RightDown,
            0x07 => LeftUp,
            0x08 => LeftDown,
            0x09 => RootMenu,
            0x0A => SetupMenu,
            0x0B => ContentsMenu,
            0x0C => FavoriteMenu,
            0x0D => Exit,
            0x10 => TopMenu,
            0x11 => DvdMenu,
            0x1D => NumberEntryMode,
            0x1E => Number11,
            0x1F => Number12,
            0x20 => Number0,
            0x21 => Number1,
            0x22 => Number2,
            0x23 => Number3,
            0x24 => Number4,
            0x25 => Number5,
            0x26 => Number6,
            0x27 => Number7,
            0x28 => Number8,
            0x29 => Number9,
            0x2A => Dot,
            0x2B => Enter,
            0x2C => Clear,
            0x2F => NextFavorite,
            0x30 => ChannelUp,
            0x31 => ChannelDown,
            0x32 => PreviousChannel,
            0x33 => SoundSelect,
            0x34 => InputSelect,
            0x35 => DisplayInformation,
            0x36 => Help,
            0x37 => PageUp,
            0x38 => PageDown,
            0x40 => Power,
            0x41 => VolumeUp,
            0x42 => VolumeDown,
            0x43 => Mute,
            0x44 => Play,
            0x45 => Stop,
            0x46 => Pause,
            0x47 => Record,
            0x48 => Rewind,
            0x49 => FastForward,
            0x4A => Eject,
            0x4B => Forward,
            0x4C => Backward,
            0x4D => StopRecord,
            0x4E => PauseRecord,
            0x50 => Angle,
            0x51 => SubPicture,
            0x52 => VideoOnDemand,
            0x53 => ElectronicProgramGuide,
            0x54 => TimerProgramming,
            0x55 => InitialConfiguration,
            0x56 => SelectBroadcastType,
            0x57 => SelectSoundPresentation,
            0x60 => PlayFunction,
            0x61 => PausePlayFunction,
            0x62 => RecordFunction,
            0x63 => PauseRecordFunction,
            0x64 => StopFunction,
            0x65 => MuteFunction,
            0x66 => RestoreVolumeFunction,
            0x67 => TuneFunction,
            0x68 => SelectMediaFunction,
            0x69 => SelectAvInputFunction,
            0x6A => SelectAudioInputFunction,
            0x6B => PowerToggleFunction,
            0x6C => PowerOffFunction,
            0x6D => PowerOnFunction,
            0x71 => F1Blue,
            0x72 => F2Red,
            0x73 => F3Green,
            0x74 => F4Yellow,
            0x75 => F5,
            0x76 => Data,
            0x91 => AnReturn,
            0x96 => AnChannelsList,
            _ => return None,
        };
        Some(code)
    }

    /// Returns the raw bus value of this control code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for codes whose press is reported regardless of the
    /// key duration, because the adapter never reports their release.
    pub fn is_edge_triggered(self) -> bool {
        matches!(self, UserControlCode::AnReturn | UserControlCode::AnChannelsList)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
