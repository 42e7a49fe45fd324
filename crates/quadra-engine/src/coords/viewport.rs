use super::Vec2;

/// Drawing surface size in logical pixels.
///
/// Backends that render in normalized device coordinates use [`Viewport::to_ndc`]
/// as their final per-vertex mapping.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Maps a top-left-origin pixel position to NDC (`[-1, 1]`, +Y up).
    #[inline]
    pub fn to_ndc(self, p: Vec2) -> [f32; 2] {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        [(p.x / w) * 2.0 - 1.0, 1.0 - (p.y / h) * 2.0]
    }
}
