use crate::coords::Rect;

pub const FIRST_GLYPH: char = ' ';
pub const LAST_GLYPH: char = '\u{7f}';

/// Cell geometry of a glyph atlas, in atlas pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    pub cell_w: u32,
    pub cell_h: u32,
    pub per_row: u32,
}

impl Default for GlyphGrid {
    fn default() -> Self {
        Self { cell_w: 20, cell_h: 24, per_row: 16 }
    }
}

impl GlyphGrid {
    pub const GLYPH_COUNT: u32 = LAST_GLYPH as u32 - FIRST_GLYPH as u32 + 1;

    pub fn is_supported(ch: char) -> bool {
        (FIRST_GLYPH..=LAST_GLYPH).contains(&ch)
    }

    /// Atlas pixel size needed to hold every supported glyph.
    pub fn atlas_size(&self) -> (u32, u32) {
        let per_row = self.per_row.max(1);
        let rows = Self::GLYPH_COUNT.div_ceil(per_row);
        (per_row * self.cell_w, rows * self.cell_h)
    }

    /// Top-left of the cell holding glyph number `index` (0 is `' '`).
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        let per_row = self.per_row.max(1);
        ((index % per_row) * self.cell_w, (index / per_row) * self.cell_h)
    }

    /// Source rectangle for `ch`, or `None` outside `32..=127`.
    pub fn glyph_source(&self, ch: char) -> Option<Rect> {
        if !Self::is_supported(ch) {
            return None;
        }
        let (x, y) = self.cell_origin(ch as u32 - FIRST_GLYPH as u32);
        Some(Rect::new(x as f32, y as f32, self.cell_w as f32, self.cell_h as f32))
    }

    /// Horizontal pen advance per character slot. Glyphs are drawn twice as wide
    /// as they advance, so neighbouring cells overlap by half.
    #[inline]
    pub fn advance(&self, size: f32) -> f32 {
        self.cell_w as f32 * size * 0.5
    }

    #[inline]
    pub fn glyph_size(&self, size: f32) -> (f32, f32) {
        (self.cell_w as f32 * size, self.cell_h as f32 * size)
    }

    /// Width of `text`; every character counts, supported or not.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * self.advance(size)
    }

    #[inline]
    pub fn line_height(&self, size: f32) -> f32 {
        self.cell_h as f32 * size
    }
}
