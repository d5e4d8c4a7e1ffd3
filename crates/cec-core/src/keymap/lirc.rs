//! CEC user control code to LIRC key name table.
//!
//! LIRC key names follow the Linux input event codes in
//! `linux/input-event-codes.h` (`KEY_OK`, `KEY_VOLUMEUP`, ...), which is what
//! LIRC clients such as media centers bind their actions to.
//!
//! # Why some codes map to several names
//!
//! The diagonal navigation buttons have no single Linux key.  They are
//! emitted as the two orthogonal keys in a fixed order, so `RightUp` produces
//! `KEY_RIGHT` followed by `KEY_UP`.
//!
//! # Why some codes map to nothing
//!
//! Codes with no sensible LIRC counterpart (the `*Function` codes that carry
//! an operand, the 11/12 number keys, broadcast-type selection) return an
//! empty slice.  An empty slice means "suppressed": the daemon emits no line.

use super::code::UserControlCode;

/// Returns the LIRC key names for `code`, in emission order.
///
/// Returns an empty slice if the code is intentionally suppressed.
///
/// # Panics
///
/// This function never panics.
pub fn lirc_names(code: UserControlCode) -> &'static [&'static str] {
    use UserControlCode::*;
    match code {
        Select => &["KEY_OK"],
        Up => &["KEY_UP"],
        Down => &["KEY_DOWN"],
        Left => &["KEY_LEFT"],
        Right => &["KEY_RIGHT"],
        RightUp => &["KEY_RIGHT", "KEY_UP"],
        RightDown => &["KEY_RIGHT", "KEY_DOWN"],
        LeftUp => &["KEY_LEFT", "KEY_UP"],
        LeftDown => &["KEY_LEFT", "KEY_DOWN"],
        RootMenu => &["KEY_HOME"],
        SetupMenu => &["KEY_SETUP"],
        ContentsMenu => &["KEY_MENU"],
        FavoriteMenu => &["KEY_FAVORITES"],
        Exit => &["KEY_EXIT"],
        TopMenu => &["KEY_ROOT_MENU"],
        DvdMenu => &["KEY_DVD"],
        NumberEntryMode | Number11 | Number12 => &[],
        Number0 => &["KEY_0"],
        Number1 => &["KEY_1"],
        Number2 => &["KEY_2"],
        Number3 => &["KEY_3"],
        Number4 => &["KEY_4"],
        Number5 => &["KEY_5"],
        Number6 => &["KEY_6"],
        Number7 => &["KEY_7"],
        Number8 => &["KEY_8"],
        Number9 => &["KEY_9"],
        Dot => &["KEY_DOT"],
        Enter => &["KEY_ENTER"],
        Clear => &["KEY_BACKSPACE"],
        NextFavorite => &[],
        ChannelUp => &["KEY_CHANNELUP"],
        ChannelDown => &["KEY_CHANNELDOWN"],
        PreviousChannel => &["KEY_PREVIOUS"],
        SoundSelect => &["KEY_SOUND"],
        InputSelect => &["KEY_TUNER"],
        DisplayInformation => &["KEY_INFO"],
        Help => &["KEY_HELP"],
        PageUp => &["KEY_PAGEUP"],
        PageDown => &["KEY_PAGEDOWN"],
        Power => &["KEY_POWER"],
        VolumeUp => &["KEY_VOLUMEUP"],
        VolumeDown => &["KEY_VOLUMEDOWN"],
        Mute => &["KEY_MUTE"],
        Play => &["KEY_PLAY"],
        Stop => &["KEY_STOP"],
        Pause => &["KEY_PAUSE"],
        Record => &["KEY_RECORD"],
        Rewind => &["KEY_REWIND"],
        FastForward => &["KEY_FASTFORWARD"],
        Eject => &["KEY_EJECTCD"],
        Forward => &["KEY_FORWARD"],
        Backward => &["KEY_BACK"],
        StopRecord | PauseRecord => &[],
        Angle => &["KEY_SCREEN"],
        SubPicture => &["KEY_SUBTITLE"],
        VideoOnDemand => &["KEY_VIDEO"],
        ElectronicProgramGuide => &["KEY_EPG"],
        TimerProgramming => &["KEY_TIME"],
        InitialConfiguration => &["KEY_CONFIG"],
        SelectBroadcastType | SelectSoundPresentation => &[],
        PlayFunction
        | PausePlayFunction
        | RecordFunction
        | PauseRecordFunction
        | StopFunction
        | MuteFunction
        | RestoreVolumeFunction
        | TuneFunction => &[],
        SelectMediaFunction => &["KEY_MEDIA"],
        SelectAvInputFunction
        | SelectAudioInputFunction
        | PowerToggleFunction
        | PowerOffFunction
        | PowerOnFunction => &[],
        F1Blue => &["KEY_BLUE"],
        F2Red => &["KEY_RED"],
        F3Green => &["KEY_GREEN"],
        F4Yellow => &["KEY_YELLOW"],
        F5 => &[],
        Data => &["KEY_TEXT"],
        AnReturn => &["KEY_ESC"],
        AnChannelsList => &["KEY_LIST"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_maps_to_key_ok() {
        assert_eq!(lirc_names(UserControlCode::Select), &["KEY_OK"]);
    }

    #[test]
    fn test_diagonals_map_to_two_orthogonal_keys() {
        assert_eq!(lirc_names(UserControlCode::RightUp), &["KEY_RIGHT", "KEY_UP"]);
        assert_eq!(lirc_names(UserControlCode::RightDown), &["KEY_RIGHT", "KEY_DOWN"]);
        assert_eq!(lirc_names(UserControlCode::LeftUp), &["KEY_LEFT", "KEY_UP"]);
        assert_eq!(lirc_names(UserControlCode::LeftDown), &["KEY_LEFT", "KEY_DOWN"]);
    }

    #[test]
    fn test_transport_keys_have_linux_names() {
        assert_eq!(lirc_names(UserControlCode::Play), &["KEY_PLAY"]);
        assert_eq!(lirc_names(UserControlCode::Pause), &["KEY_PAUSE"]);
        assert_eq!(lirc_names(UserControlCode::Stop), &["KEY_STOP"]);
        assert_eq!(lirc_names(UserControlCode::Power), &["KEY_POWER"]);
    }

    #[test]
    fn test_function_codes_are_suppressed() {
        for code in [
            UserControlCode::PlayFunction,
            UserControlCode::PowerOnFunction,
            UserControlCode::Number11,
            UserControlCode::F5,
        ] {
            assert!(lirc_names(code).is_empty(), "{code:?} should be suppressed");
        }
    }

    #[test]
    fn test_all_names_use_linux_key_prefix() {
        for raw in 0u8..=0xFF {
            let Some(code) = UserControlCode::from_u8(raw) else {
                continue;
            };
            for name in lirc_names(code) {
                assert!(name.starts_with("KEY_"), "{code:?} has bad name {name}");
                assert!(!name.contains(' '), "names must not contain spaces: {name}");
            }
        }
    }
}
