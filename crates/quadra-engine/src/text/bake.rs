use anyhow::{anyhow, Result};
use image::{Rgba, RgbaImage};

use super::{GlyphGrid, FIRST_GLYPH};

/// Rasterizes ASCII `32..=127` from a TTF/OTF into a white-on-transparent atlas.
///
/// Each glyph is centered horizontally in its cell and sits on a shared
/// baseline. Coverage goes to alpha so a tint recolors the text.
pub fn bake_atlas(font_bytes: &[u8], grid: &GlyphGrid, px: f32) -> Result<RgbaImage> {
    let font = fontdue::Font::from_bytes(font_bytes, fontdue::FontSettings::default())
        .map_err(|e| anyhow!("font parse failed: {e}"))?;

    let (atlas_w, atlas_h) = grid.atlas_size();
    let mut atlas = RgbaImage::new(atlas_w, atlas_h);

    let ascent = font
        .horizontal_line_metrics(px)
        .map_or(px, |m| m.ascent)
        .round() as i32;

    for index in 0..GlyphGrid::GLYPH_COUNT {
        let Some(ch) = char::from_u32(FIRST_GLYPH as u32 + index) else { continue };
        let (metrics, coverage) = font.rasterize(ch, px);
        if metrics.width == 0 || metrics.height == 0 {
            continue;
        }

        let (cell_x, cell_y) = grid.cell_origin(index);
        let pad_x = ((grid.cell_w as f32 - metrics.advance_width) * 0.5).round() as i32;
        let left = cell_x as i32 + pad_x + metrics.xmin;
        let top = cell_y as i32 + ascent - (metrics.ymin + metrics.height as i32);

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = coverage[row * metrics.width + col];
                if alpha == 0 {
                    continue;
                }
                let x = left + col as i32;
                let y = top + row as i32;
                // Clip to the glyph's own cell.
                let in_cell = x >= cell_x as i32
                    && y >= cell_y as i32
                    && x < (cell_x + grid.cell_w) as i32
                    && y < (cell_y + grid.cell_h) as i32;
                if in_cell {
                    atlas.put_pixel(x as u32, y as u32, Rgba([255, 255, 255, alpha]));
                }
            }
        }
    }

    log::debug!("baked glyph atlas {atlas_w}x{atlas_h} at {px}px");
    Ok(atlas)
}
