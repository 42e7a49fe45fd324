use crate::coords::Rect;
use crate::paint::Color;
use crate::quad::DrawOptions;

use super::GlyphGrid;

/// Eight surrounding directions, corners first.
const OUTLINE_OFFSETS: [(f32, f32); 8] = [
    (-1.0, -1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (1.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (0.0, -1.0),
    (0.0, 1.0),
];

/// Left-aligned line with its top-left at `(x, y)`.
///
/// Characters outside `32..=127` draw nothing but keep their slot, so the
/// glyphs after them stay where a fixed-width reader expects them.
pub fn layout_line(
    grid: &GlyphGrid,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Color,
) -> Vec<DrawOptions> {
    let advance = grid.advance(size);
    let (w, h) = grid.glyph_size(size);

    text.chars()
        .enumerate()
        .filter_map(|(i, ch)| {
            let src = grid.glyph_source(ch)?;
            Some(DrawOptions {
                x: x + i as f32 * advance,
                y,
                width: w,
                height: h,
                rotation: 0.0,
                tint: color,
                src_x: src.origin.x,
                src_y: src.origin.y,
                src_w: src.size.x,
                src_h: src.size.y,
            })
        })
        .collect()
}

/// Line centered on `(cx, cy)` in both axes.
pub fn layout_centered(
    grid: &GlyphGrid,
    text: &str,
    cx: f32,
    cy: f32,
    size: f32,
    color: Color,
) -> Vec<DrawOptions> {
    let x = cx - grid.text_width(text, size) * 0.5;
    let y = cy - grid.line_height(size) * 0.5;
    layout_line(grid, text, x, y, size, color)
}

/// Outline passes first, then the main text on top.
pub fn layout_outline(
    grid: &GlyphGrid,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Color,
    outline: Color,
) -> Vec<DrawOptions> {
    let step = size * 0.5;
    let mut out = Vec::with_capacity(text.len() * (OUTLINE_OFFSETS.len() + 1));
    for (dx, dy) in OUTLINE_OFFSETS {
        out.extend(layout_line(grid, text, x + dx * step, y + dy * step, size, outline));
    }
    out.extend(layout_line(grid, text, x, y, size, color));
    out
}

/// Background panel plus the glyphs drawn inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub glyphs: Vec<DrawOptions>,
}

/// Panel top-left sits at `(x, y)`; the text is inset by the padding.
#[allow(clippy::too_many_arguments)]
pub fn layout_with_background(
    grid: &GlyphGrid,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Color,
    padding_x: f32,
    padding_y: f32,
) -> PanelLayout {
    let panel = Rect::new(
        x,
        y,
        grid.text_width(text, size) + 2.0 * padding_x,
        grid.line_height(size) + 2.0 * padding_y,
    );
    let glyphs = layout_line(grid, text, x + padding_x, y + padding_y, size, color);
    PanelLayout { panel, glyphs }
}
