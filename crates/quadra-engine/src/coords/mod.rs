//! Coordinate and geometry types shared by the backends.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Each backend maps pixel positions into its own target space at the very end
//! (NDC for the GPU backend, canvas pixels for the canvas backend).

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
