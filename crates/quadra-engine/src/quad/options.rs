use crate::coords::Rect;
use crate::paint::Color;

use super::ResolvedQuad;

/// One quad draw, fully described.
///
/// Zero values are meaningful and resolved by [`DrawOptions::resolve`]:
/// - `width`/`height == 0` → the image's native size
/// - `src_w`/`src_h <= 0` → the full image
/// - `tint == Color::UNSET` → opaque white (no tinting)
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DrawOptions {
    /// Destination top-left, logical pixels.
    pub x: f32,
    pub y: f32,
    /// Destination size, logical pixels.
    pub width: f32,
    pub height: f32,
    /// Degrees, about the destination center. Positive is clockwise on screen.
    pub rotation: f32,
    /// Multiplicative color.
    pub tint: Color,
    /// Source rectangle in image pixels, top-left origin.
    pub src_x: f32,
    pub src_y: f32,
    pub src_w: f32,
    pub src_h: f32,
}

impl DrawOptions {
    /// Options that draw the whole image, untinted and unrotated, at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, ..Self::default() }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_source(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.src_x = x;
        self.src_y = y;
        self.src_w = w;
        self.src_h = h;
        self
    }

    /// Applies the defaulting policy against an image of `image_w × image_h` pixels.
    ///
    /// Order: destination size, then source size, then tint. Nothing else is
    /// altered; negative destination sizes pass through (mirrored draws).
    pub fn resolve(self, image_w: f32, image_h: f32) -> ResolvedQuad {
        let width = if self.width == 0.0 { image_w } else { self.width };
        let height = if self.height == 0.0 { image_h } else { self.height };

        let src_w = if self.src_w <= 0.0 { image_w } else { self.src_w };
        let src_h = if self.src_h <= 0.0 { image_h } else { self.src_h };

        let tint = if self.tint.is_unset() { Color::WHITE } else { self.tint };

        ResolvedQuad {
            dst: Rect::new(self.x, self.y, width, height),
            src: Rect::new(self.src_x, self.src_y, src_w, src_h),
            rotation: self.rotation,
            tint,
            image_w,
            image_h,
        }
    }
}
