//! Color model shared by every drawing call.
//!
//! Geometry types live in `coords`.

pub mod color;

pub use color::Color;
