//! Bakes the bitmap font atlas used for text drawing.
//!
//! Usage: `quadra-atlas <font.ttf> [out.png] [pixel-size]`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use quadra_engine::text::bake_atlas;
use quadra_engine::{init_logging, FontAtlasConfig, LoggingConfig};

const DEFAULT_PX: f32 = 20.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut args = std::env::args().skip(1);
    let Some(font_path) = args.next().map(PathBuf::from) else {
        bail!("usage: quadra-atlas <font.ttf> [out.png] [pixel-size]");
    };
    let defaults = FontAtlasConfig::default();
    let out = args.next().map(PathBuf::from).unwrap_or(defaults.path);
    let px = match args.next() {
        Some(s) => s.parse::<f32>().with_context(|| format!("invalid pixel size {s:?}"))?,
        None => DEFAULT_PX,
    };

    let font = std::fs::read(&font_path).with_context(|| format!("failed to read {font_path:?}"))?;
    let atlas = bake_atlas(&font, &defaults.grid, px)?;

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {dir:?}"))?;
    }
    atlas.save(&out).with_context(|| format!("failed to write {out:?}"))?;

    log::info!("wrote {}x{} atlas to {out:?} ({px}px glyphs)", atlas.width(), atlas.height());
    Ok(())
}
