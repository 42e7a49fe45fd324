use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use crate::backend::gpu::GpuInit;
use crate::text::GlyphGrid;

/// Where the bitmap font lives and how it is laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlasConfig {
    pub path: PathBuf,
    pub grid: GlyphGrid,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("font/font_atlas_bold.png"),
            grid: GlyphGrid::default(),
        }
    }
}

/// Startup configuration for a [`RenderContext`](crate::RenderContext).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    /// Values below 1 are treated as 1.
    pub target_fps: u32,
    /// `None` disables text drawing without a warning.
    pub font_atlas: Option<FontAtlasConfig>,
    #[cfg(not(target_arch = "wasm32"))]
    pub gpu: GpuInit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "quadra".to_string(),
            width: 800,
            height: 600,
            target_fps: 60,
            font_atlas: Some(FontAtlasConfig::default()),
            #[cfg(not(target_arch = "wasm32"))]
            gpu: GpuInit::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_font_atlas(mut self, atlas: FontAtlasConfig) -> Self {
        self.font_atlas = Some(atlas);
        self
    }

    pub fn without_font_atlas(mut self) -> Self {
        self.font_atlas = None;
        self
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    pub(crate) fn effective_fps(&self) -> u32 {
        self.target_fps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = EngineConfig::default();
        assert_eq!((c.width, c.height, c.target_fps), (800, 600, 60));
        let atlas = c.font_atlas.unwrap();
        assert_eq!(atlas.path, PathBuf::from("font/font_atlas_bold.png"));
        assert_eq!(atlas.grid, GlyphGrid { cell_w: 20, cell_h: 24, per_row: 16 });
    }

    #[test]
    fn zero_fps_is_clamped() {
        assert_eq!(EngineConfig::default().with_target_fps(0).effective_fps(), 1);
    }
}
