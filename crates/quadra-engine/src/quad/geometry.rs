use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2, Viewport};
use crate::image::TextureOrigin;
use crate::paint::Color;

/// Two triangles over corners `TL, TR, BR, BL`.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Interleaved textured vertex: position, texcoord, tint (8 floats).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// A quad after defaulting, ready for a backend.
///
/// Only [`DrawOptions::resolve`](super::DrawOptions::resolve) builds these, so a
/// backend never sees a zero-size destination meaning "native" or an unset tint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ResolvedQuad {
    pub dst: Rect,
    pub src: Rect,
    /// Degrees.
    pub rotation: f32,
    pub tint: Color,
    pub image_w: f32,
    pub image_h: f32,
}

impl ResolvedQuad {
    /// Destination corners `TL, TR, BR, BL`, rotated about the destination center.
    pub fn corners(&self) -> [Vec2; 4] {
        let corners = self.dst.corners();
        if self.rotation == 0.0 {
            return corners;
        }

        let pivot = self.dst.center();
        let radians = self.rotation.to_radians();
        corners.map(|c| c.rotated_about(pivot, radians))
    }

    /// Texture coordinates for `TL, TR, BR, BL`. Independent of rotation.
    ///
    /// `BottomLeft` textures were flipped at decode, so the source rectangle is
    /// mirrored vertically in UV space to address the same pixels.
    pub fn tex_coords(&self, origin: TextureOrigin) -> [[f32; 2]; 4] {
        let w = self.image_w.max(1.0);
        let h = self.image_h.max(1.0);

        let u0 = self.src.origin.x / w;
        let u1 = (self.src.origin.x + self.src.size.x) / w;

        match origin {
            TextureOrigin::TopLeft => {
                let v0 = self.src.origin.y / h;
                let v1 = (self.src.origin.y + self.src.size.y) / h;
                [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
            }
            TextureOrigin::BottomLeft => {
                let bottom = 1.0 - (self.src.origin.y + self.src.size.y) / h;
                let top = bottom + self.src.size.y / h;
                [[u0, top], [u1, top], [u1, bottom], [u0, bottom]]
            }
        }
    }

    /// `false` when nothing would be visible or the numbers are unusable.
    pub fn is_drawable(&self) -> bool {
        self.dst.size.x != 0.0
            && self.dst.size.y != 0.0
            && self.dst.is_finite()
            && self.src.is_finite()
            && self.rotation.is_finite()
            && self.tint.is_finite()
    }

    /// Vertices in NDC for backends that rasterize triangles.
    pub fn vertices(&self, viewport: Viewport, origin: TextureOrigin) -> [Vertex; 4] {
        let corners = self.corners();
        let uvs = self.tex_coords(origin);
        let color = self.tint.to_array();

        core::array::from_fn(|i| Vertex {
            pos: viewport.to_ndc(corners[i]),
            uv: uvs[i],
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quad::DrawOptions;

    const EPS: f32 = 1e-4;

    fn quad(opts: DrawOptions) -> ResolvedQuad {
        opts.resolve(64.0, 32.0)
    }

    #[test]
    fn unrotated_corners_are_exact() {
        let q = quad(DrawOptions::at(10.0, 20.0).with_size(30.0, 40.0));
        assert_eq!(
            q.corners(),
            [
                Vec2::new(10.0, 20.0),
                Vec2::new(40.0, 20.0),
                Vec2::new(40.0, 60.0),
                Vec2::new(10.0, 60.0),
            ]
        );
    }

    #[test]
    fn full_turn_returns_to_start() {
        let base = quad(DrawOptions::at(10.0, 20.0).with_size(30.0, 40.0));
        let spun = quad(DrawOptions::at(10.0, 20.0).with_size(30.0, 40.0).with_rotation(360.0));
        for (a, b) in base.corners().iter().zip(spun.corners()) {
            assert!(a.distance(b) < EPS, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn quarter_turn_keeps_center_and_swaps_extent() {
        let q = quad(DrawOptions::at(0.0, 0.0).with_size(40.0, 20.0).with_rotation(90.0));
        let c = q.corners();
        // Rotating clockwise moves TL to where TR of a 20x40 box centered at (20, 10) is.
        assert!(c[0].distance(Vec2::new(30.0, -10.0)) < EPS, "{:?}", c[0]);
        assert!(c[2].distance(Vec2::new(10.0, 30.0)) < EPS, "{:?}", c[2]);
        let mid = (c[0] + c[2]) * 0.5;
        assert!(mid.distance(Vec2::new(20.0, 10.0)) < EPS);
    }

    #[test]
    fn rotation_does_not_change_tex_coords() {
        let opts = DrawOptions::at(3.0, 4.0).with_source(8.0, 4.0, 16.0, 8.0);
        let a = quad(opts);
        let b = quad(opts.with_rotation(37.0));
        for origin in [TextureOrigin::TopLeft, TextureOrigin::BottomLeft] {
            assert_eq!(a.tex_coords(origin), b.tex_coords(origin));
        }
    }

    #[test]
    fn top_left_origin_maps_source_directly() {
        let q = quad(DrawOptions::default().with_source(16.0, 8.0, 32.0, 16.0));
        let uv = q.tex_coords(TextureOrigin::TopLeft);
        assert_eq!(uv[0], [0.25, 0.25]);
        assert_eq!(uv[2], [0.75, 0.75]);
    }

    #[test]
    fn bottom_left_origin_mirrors_source_vertically() {
        // Source is the top quarter-height band of a 64x32 image.
        let q = quad(DrawOptions::default().with_source(0.0, 0.0, 64.0, 8.0));
        let uv = q.tex_coords(TextureOrigin::BottomLeft);
        assert_eq!(uv[0], [0.0, 1.0]);
        assert_eq!(uv[1], [1.0, 1.0]);
        assert_eq!(uv[2], [1.0, 0.75]);
        assert_eq!(uv[3], [0.0, 0.75]);
    }

    #[test]
    fn full_image_covers_unit_square_for_both_origins() {
        let q = quad(DrawOptions::default());
        let tl = q.tex_coords(TextureOrigin::TopLeft);
        let bl = q.tex_coords(TextureOrigin::BottomLeft);
        assert_eq!(tl, [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(bl, [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn unset_tint_and_white_produce_same_vertices() {
        let vp = Viewport::new(800.0, 600.0);
        let a = quad(DrawOptions::at(1.0, 2.0)).vertices(vp, TextureOrigin::BottomLeft);
        let b = quad(DrawOptions::at(1.0, 2.0).with_tint(Color::WHITE))
            .vertices(vp, TextureOrigin::BottomLeft);
        assert_eq!(a, b);
    }

    #[test]
    fn vertices_are_in_ndc() {
        let vp = Viewport::new(64.0, 32.0);
        let v = quad(DrawOptions::default()).vertices(vp, TextureOrigin::TopLeft);
        assert_eq!(v[0].pos, [-1.0, 1.0]);
        assert_eq!(v[2].pos, [1.0, -1.0]);
        assert_eq!(v[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_or_non_finite_quads_are_not_drawable() {
        assert!(quad(DrawOptions::default()).is_drawable());
        assert!(!DrawOptions::default().resolve(0.0, 0.0).is_drawable());
        assert!(!quad(DrawOptions::at(f32::NAN, 0.0)).is_drawable());
    }

    #[test]
    fn vertex_is_eight_floats() {
        assert_eq!(core::mem::size_of::<Vertex>(), 8 * 4);
    }
}
