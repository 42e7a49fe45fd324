//! Browser event translation helpers.
//!
//! Kept free of `web-sys` types so the mapping is usable (and tested) on every
//! target; the web canvas passes the raw `KeyboardEvent.code`, `MouseEvent.button`
//! and wheel values straight through.

use crate::input::{Key, MouseButton, PIXELS_PER_SCROLL_LINE};

/// Maps a `KeyboardEvent.code` value to a [`Key`].
pub fn key_from_code(code: &str) -> Key {
    match code {
        "Escape" => Key::Escape,
        "Enter" | "NumpadEnter" => Key::Enter,
        "Tab" => Key::Tab,
        "Backspace" => Key::Backspace,
        "Space" => Key::Space,
        "Delete" => Key::Delete,

        "ArrowUp" => Key::ArrowUp,
        "ArrowDown" => Key::ArrowDown,
        "ArrowLeft" => Key::ArrowLeft,
        "ArrowRight" => Key::ArrowRight,

        "ShiftLeft" | "ShiftRight" => Key::Shift,
        "ControlLeft" | "ControlRight" => Key::Control,
        "AltLeft" | "AltRight" => Key::Alt,

        _ => {
            if let Some(letter) = code.strip_prefix("Key") {
                letter_key(letter)
            } else if let Some(digit) = code.strip_prefix("Digit") {
                digit_key(digit)
            } else {
                Key::Unknown
            }
        }
    }
}

fn letter_key(s: &str) -> Key {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];
    match s.as_bytes() {
        [c @ b'A'..=b'Z'] => LETTERS[(c - b'A') as usize],
        _ => Key::Unknown,
    }
}

fn digit_key(s: &str) -> Key {
    const DIGITS: [Key; 10] = [
        Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
        Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
    ];
    match s.as_bytes() {
        [c @ b'0'..=b'9'] => DIGITS[(c - b'0') as usize],
        _ => Key::Unknown,
    }
}

/// Maps `MouseEvent.button`.
pub fn mouse_button(button: i16) -> MouseButton {
    match button {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        other => MouseButton::Other(other.max(0) as u16),
    }
}

/// Converts a `WheelEvent` delta to lines, positive y scrolling up/away.
///
/// `delta_mode` follows the DOM constants: 0 pixels, 1 lines, 2 pages.
pub fn wheel_lines(delta_x: f64, delta_y: f64, delta_mode: u32) -> (f32, f32) {
    let per_line = match delta_mode {
        0 => PIXELS_PER_SCROLL_LINE as f64,
        2 => 1.0 / 20.0,
        _ => 1.0,
    };
    ((-delta_x / per_line) as f32, (-delta_y / per_line) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_codes() {
        assert_eq!(key_from_code("Space"), Key::Space);
        assert_eq!(key_from_code("Escape"), Key::Escape);
        assert_eq!(key_from_code("ArrowDown"), Key::ArrowDown);
    }

    #[test]
    fn letter_and_digit_codes() {
        assert_eq!(key_from_code("KeyA"), Key::A);
        assert_eq!(key_from_code("KeyZ"), Key::Z);
        assert_eq!(key_from_code("Digit7"), Key::Digit7);
    }

    #[test]
    fn malformed_codes_are_unknown() {
        assert_eq!(key_from_code("Keya"), Key::Unknown);
        assert_eq!(key_from_code("KeyAB"), Key::Unknown);
        assert_eq!(key_from_code("Digit10"), Key::Unknown);
        assert_eq!(key_from_code("F1"), Key::Unknown);
    }

    #[test]
    fn wheel_pixels_to_lines() {
        assert_eq!(wheel_lines(0.0, 40.0, 0), (-0.0, -2.0));
        assert_eq!(wheel_lines(0.0, -3.0, 1), (-0.0, 3.0));
    }

    #[test]
    fn dom_button_order() {
        assert_eq!(mouse_button(0), MouseButton::Left);
        assert_eq!(mouse_button(1), MouseButton::Middle);
        assert_eq!(mouse_button(2), MouseButton::Right);
    }
}
