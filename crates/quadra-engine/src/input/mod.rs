//! Input subsystem.
//!
//! Public API is platform-agnostic. Backends translate native events into
//! [`InputEvent`]s and feed them to the [`InputState`] owned by the render
//! context.

pub mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};

/// Pixel-precise scroll deltas are reported in lines of this height.
pub const PIXELS_PER_SCROLL_LINE: f32 = 20.0;
