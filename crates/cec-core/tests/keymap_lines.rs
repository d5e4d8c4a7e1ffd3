//! Integration tests for the cec-core public API.
//!
//! These tests drive the key map and the line format together, the way the
//! daemon does for every key press.

use cec_core::{
    Command, KeyEvent, KeyMap, KeyMapError, LircLine, UserControlCode, DEFAULT_SOURCE_TAG,
    MAX_CONTROL_CODE,
};

/// Produces the wire lines for one code, as the daemon would write them.
fn lines_for(code: u8) -> Result<Vec<String>, KeyMapError> {
    let names = KeyMap::global().lookup(code)?;
    Ok(names
        .iter()
        .map(|name| LircLine::format(u32::from(code), false, name, DEFAULT_SOURCE_TAG))
        .collect())
}

#[test]
fn test_select_produces_single_key_ok_line() {
    assert_eq!(lines_for(0x00), Ok(vec!["0 0 KEY_OK RPICEC\n".to_string()]));
}

#[test]
fn test_diagonal_produces_two_lines_in_order() {
    let lines = lines_for(UserControlCode::RightDown.as_u8()).expect("in domain");
    assert_eq!(lines, vec!["6 0 KEY_RIGHT RPICEC\n", "6 0 KEY_DOWN RPICEC\n"]);
}

#[test]
fn test_suppressed_code_produces_no_lines() {
    assert_eq!(lines_for(UserControlCode::PowerOnFunction.as_u8()), Ok(Vec::new()));
}

#[test]
fn test_every_emitted_line_parses_back() {
    for code in 0..=MAX_CONTROL_CODE {
        for line in lines_for(code).expect("in domain") {
            let parsed: LircLine = line.parse().expect("daemon output must parse");
            assert_eq!(parsed.code, u32::from(code));
            assert!(!parsed.repeat);
            assert_eq!(parsed.source, DEFAULT_SOURCE_TAG);
        }
    }
}

#[test]
fn test_out_of_domain_code_is_rejected() {
    assert_eq!(lines_for(0xFF), Err(KeyMapError::OutOfRange(0xFF)));
}

#[test]
fn test_press_edges_and_keypress_commands_agree_on_codes() {
    // Arrange
    let event = KeyEvent::held(UserControlCode::AnChannelsList.as_u8(), 300);

    // Act
    let command = event.is_press_edge().then(|| Command::KeyPress(event.code));

    // Assert
    assert_eq!(command, Some(Command::key(UserControlCode::AnChannelsList)));
}
