//! Monospace bitmap text built on the quad renderer.
//!
//! A glyph atlas is one image laid out as a fixed grid of cells covering ASCII
//! `32..=127`. Every glyph is a single [`DrawOptions`](crate::quad::DrawOptions)
//! whose source rectangle selects its cell; the compositions here only produce
//! those options, the caller submits them.

mod atlas;
mod bake;
mod layout;

pub use atlas::{GlyphGrid, FIRST_GLYPH, LAST_GLYPH};
pub use bake::bake_atlas;
pub use layout::{layout_centered, layout_line, layout_outline, layout_with_background, PanelLayout};
