use std::fmt;

use crate::coords::Vec2;

/// Keyboard key identifier, by physical position (US layout names).
///
/// Backends map platform codes into these; anything else arrives as `Unknown`
/// and is ignored by the tracker.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    Unknown,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-agnostic input events. Backends translate into these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ButtonState,
        /// OS auto-repeat.
        repeat: bool,
    },

    /// Logical pixels, top-left origin.
    PointerMoved(Vec2),
    PointerButton {
        button: MouseButton,
        state: ButtonState,
    },
    PointerLeft,

    /// Scroll amount in lines; pixel deltas are converted by the backend.
    Scroll { x: f32, y: f32 },

    Focused(bool),
}
