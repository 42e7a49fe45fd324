use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Keyboard and pointer state with one-frame edge detection.
///
/// A frame is the span between two [`InputState::begin_frame`] calls. Events
/// applied in between update the held sets and record transitions, so a key
/// that goes down during frame N reads as pressed for frame N only, however
/// long it is then held.
#[derive(Debug)]
pub struct InputState {
    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,

    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,

    pointer: Vec2,
    pointer_at_frame_start: Vec2,
    pointer_inside: bool,

    scroll: Vec2,

    focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            buttons_down: HashSet::new(),
            buttons_pressed: HashSet::new(),
            buttons_released: HashSet::new(),
            pointer: Vec2::zero(),
            pointer_at_frame_start: Vec2::zero(),
            pointer_inside: false,
            scroll: Vec2::zero(),
            focused: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the previous frame: transitions are forgotten, the pointer delta
    /// baseline moves to the current position and scroll resets.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_at_frame_start = self.pointer;
        self.scroll = Vec2::zero();
    }

    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { key: Key::Unknown, .. } => {}

            InputEvent::Key { key, state, .. } => match state {
                // Repeats fail the insert and record nothing.
                ButtonState::Pressed => {
                    if self.keys_down.insert(key) {
                        self.keys_pressed.insert(key);
                    }
                }
                ButtonState::Released => {
                    if self.keys_down.remove(&key) {
                        self.keys_released.insert(key);
                    }
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        self.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        self.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::PointerMoved(p) => {
                if !self.pointer_inside {
                    // Entering the window is not movement.
                    self.pointer_at_frame_start = p;
                }
                self.pointer = p;
                self.pointer_inside = true;
            }

            InputEvent::PointerLeft => {
                self.pointer_inside = false;
            }

            InputEvent::Scroll { x, y } => {
                self.scroll = self.scroll + Vec2::new(x, y);
            }

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases are never delivered to an unfocused window.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
        }
    }

    /// Held right now.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Went down during the current frame.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Went up during the current frame.
    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Last known pointer position; kept after the pointer leaves.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer - self.pointer_at_frame_start
    }

    /// Lines scrolled during the current frame.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn focused(&self) -> bool {
        self.focused
    }
}
