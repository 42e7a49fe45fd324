//! 2D canvas backend.
//!
//! Draws through any [`Canvas2d`]: the browser's `CanvasRenderingContext2D`
//! ([`WebCanvas`], wasm32 with the `web` feature) or the headless
//! [`RecordingCanvas`].
//!
//! Canvas images are addressed top-left first, so images are decoded without a
//! flip. A quad is drawn by mapping the unit image rectangle onto the rotated
//! corners with `setTransform`, which keeps rotation on the shared corner math.
//!
//! Tint has no per-vertex equivalent here. It is approximated: the image is
//! drawn at the tint's alpha, then a `multiply` fill of the tint color covers
//! the destination quad. Pixels around transparent parts of the image get
//! tinted too, so output only resembles the GPU backend.

mod context;
mod recording;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web;

pub use context::{Canvas2d, Composite};
pub use recording::{CanvasCommand, RecordedImage, RecordingCanvas};
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web::WebCanvas;

use crate::backend::Backend;
use crate::coords::Viewport;
use crate::error::LoadError;
use crate::image::{DecodedImage, TextureOrigin};
use crate::input::InputState;
use crate::paint::Color;
use crate::quad::ResolvedQuad;
use crate::shapes::{Mesh, Shape, Topology};

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

pub struct CanvasBackend<C: Canvas2d> {
    canvas: C,
    closed: bool,
}

impl<C: Canvas2d> CanvasBackend<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas, closed: false }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    fn trace_mesh_path(&mut self, mesh: &Mesh) {
        self.canvas.begin_path();
        if let Some((first, rest)) = mesh.points.split_first() {
            self.canvas.move_to(first.x as f64, first.y as f64);
            for p in rest {
                self.canvas.line_to(p.x as f64, p.y as f64);
            }
        }
    }
}

/// `setTransform` matrix taking the `|w| × |h|` rectangle at the origin onto
/// the quad's corners, or `None` for a degenerate quad.
///
/// A negative destination size flips the matching axis of the matrix, so the
/// image comes out mirrored as it does on the GPU.
pub fn quad_transform(quad: &ResolvedQuad) -> Option<[f64; 6]> {
    let w = (quad.dst.size.x as f64).abs();
    let h = (quad.dst.size.y as f64).abs();
    if w == 0.0 || h == 0.0 {
        return None;
    }

    let [tl, tr, _, bl] = quad.corners();
    let x_axis = tr - tl;
    let y_axis = bl - tl;
    Some([
        x_axis.x as f64 / w,
        x_axis.y as f64 / w,
        y_axis.x as f64 / h,
        y_axis.y as f64 / h,
        tl.x as f64,
        tl.y as f64,
    ])
}

impl<C: Canvas2d> Backend for CanvasBackend<C> {
    type Texture = C::Image;

    fn texture_origin(&self) -> TextureOrigin {
        TextureOrigin::TopLeft
    }

    fn viewport(&self) -> Viewport {
        let (w, h) = self.canvas.size();
        Viewport::new(w, h)
    }

    fn poll_events(&mut self, input: &mut InputState) {
        for ev in self.canvas.drain_events() {
            input.apply_event(ev);
        }
    }

    fn should_close(&self) -> bool {
        self.closed || self.canvas.is_closed()
    }

    fn clear(&mut self, color: Color) {
        if self.closed {
            return;
        }
        let (w, h) = self.canvas.size();
        let (w, h) = (w as f64, h as f64);
        self.canvas.save();
        self.canvas.set_transform(IDENTITY);
        self.canvas.set_global_alpha(1.0);
        self.canvas.set_composite(Composite::SourceOver);
        self.canvas.clear_rect(0.0, 0.0, w, h);
        self.canvas.set_fill_style(&color.to_css_rgba());
        self.canvas.fill_rect(0.0, 0.0, w, h);
        self.canvas.restore();
    }

    fn draw_shape(&mut self, shape: &Shape, color: Color) {
        if self.closed || !shape.is_finite() {
            return;
        }
        let css = color.to_css_rgba();

        match *shape {
            Shape::Rect(r) => {
                self.canvas.set_fill_style(&css);
                self.canvas.fill_rect(
                    r.origin.x as f64,
                    r.origin.y as f64,
                    r.size.x as f64,
                    r.size.y as f64,
                );
            }
            Shape::Circle { center, radius } => {
                self.canvas.set_fill_style(&css);
                self.canvas.begin_path();
                self.canvas.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.abs() as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                self.canvas.fill();
            }
            _ => {
                let mesh = shape.mesh();
                match mesh.topology {
                    Topology::LineList | Topology::LineStrip => {
                        self.canvas.set_stroke_style(&css);
                        self.trace_mesh_path(&mesh);
                        self.canvas.stroke();
                    }
                    Topology::TriangleList | Topology::TriangleFan => {
                        self.canvas.set_fill_style(&css);
                        self.trace_mesh_path(&mesh);
                        self.canvas.close_path();
                        self.canvas.fill();
                    }
                }
            }
        }
    }

    fn create_texture(&mut self, image: &DecodedImage) -> Result<C::Image, LoadError> {
        self.canvas
            .create_image(image.width, image.height, &image.rgba)
            .map_err(|reason| LoadError::Upload {
                path: image.label.clone(),
                reason,
            })
    }

    fn destroy_texture(&mut self, texture: C::Image) {
        self.canvas.release_image(texture);
    }

    fn draw_quad(&mut self, texture: &C::Image, quad: &ResolvedQuad) {
        if self.closed || !quad.is_drawable() {
            return;
        }
        let Some(transform) = quad_transform(quad) else { return };

        let (w, h) = ((quad.dst.size.x as f64).abs(), (quad.dst.size.y as f64).abs());
        let src = [
            quad.src.origin.x as f64,
            quad.src.origin.y as f64,
            quad.src.size.x as f64,
            quad.src.size.y as f64,
        ];
        let tint = quad.tint;

        self.canvas.save();
        self.canvas.set_transform(transform);
        self.canvas.set_global_alpha(tint.a.clamp(0.0, 1.0) as f64);
        self.canvas.draw_image(texture, src, [0.0, 0.0, w, h]);

        if (tint.r, tint.g, tint.b) != (1.0, 1.0, 1.0) {
            self.canvas.set_composite(Composite::Multiply);
            self.canvas.set_fill_style(&Color::rgb(tint.r, tint.g, tint.b).to_css_rgba());
            self.canvas.fill_rect(0.0, 0.0, w, h);
        }
        self.canvas.restore();
    }

    fn present(&mut self) {
        if !self.closed {
            self.canvas.present();
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.canvas.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::quad::DrawOptions;

    fn apply(m: [f64; 6], x: f64, y: f64) -> Vec2 {
        Vec2::new((m[0] * x + m[2] * y + m[4]) as f32, (m[1] * x + m[3] * y + m[5]) as f32)
    }

    #[test]
    fn transform_maps_unit_rect_onto_corners() {
        for rotation in [0.0, 30.0, 90.0, 217.0] {
            let q = DrawOptions::at(40.0, 30.0)
                .with_size(64.0, 32.0)
                .with_rotation(rotation)
                .resolve(64.0, 32.0);
            let m = quad_transform(&q).unwrap();
            let c = q.corners();
            assert!(apply(m, 0.0, 0.0).distance(c[0]) < 1e-3);
            assert!(apply(m, 64.0, 0.0).distance(c[1]) < 1e-3);
            assert!(apply(m, 64.0, 32.0).distance(c[2]) < 1e-3);
            assert!(apply(m, 0.0, 32.0).distance(c[3]) < 1e-3);
        }
    }

    #[test]
    fn unrotated_transform_is_a_translation() {
        let q = DrawOptions::at(5.0, 7.0).resolve(16.0, 16.0);
        assert_eq!(quad_transform(&q), Some([1.0, 0.0, 0.0, 1.0, 5.0, 7.0]));
    }

    #[test]
    fn negative_width_mirrors_horizontally() {
        let q = DrawOptions::at(100.0, 0.0).with_size(-64.0, 32.0).resolve(64.0, 32.0);
        let m = quad_transform(&q).unwrap();
        assert_eq!(m[0], -1.0);
        assert_eq!(m[3], 1.0);
        assert_eq!((m[4], m[5]), (100.0, 0.0));
        assert!(apply(m, 64.0, 0.0).distance(Vec2::new(36.0, 0.0)) < 1e-3);
    }

    #[test]
    fn negative_height_mirrors_vertically() {
        let q = DrawOptions::at(0.0, 50.0).with_size(16.0, -16.0).resolve(16.0, 16.0);
        let m = quad_transform(&q).unwrap();
        assert_eq!((m[0], m[3]), (1.0, -1.0));
    }

    #[test]
    fn mirrored_quad_draws_with_positive_destination() {
        let mut b = backend();
        let tex = texture(&mut b);
        let q = DrawOptions::at(100.0, 0.0)
            .with_size(-64.0, 32.0)
            .with_tint(Color::RED)
            .resolve(2.0, 2.0);
        b.draw_quad(&tex, &q);
        let draws: Vec<_> = b.canvas().image_draws().collect();
        assert_eq!(draws[0].2, [0.0, 0.0, 64.0, 32.0]);
        assert!(b.canvas().commands().contains(&CanvasCommand::FillRect([0.0, 0.0, 64.0, 32.0])));
    }

    #[test]
    fn degenerate_quad_has_no_transform() {
        let q = DrawOptions::default().resolve(0.0, 0.0);
        assert_eq!(quad_transform(&q), None);
    }

    fn backend() -> CanvasBackend<RecordingCanvas> {
        CanvasBackend::new(RecordingCanvas::new(200.0, 100.0))
    }

    fn texture(b: &mut CanvasBackend<RecordingCanvas>) -> RecordedImage {
        b.canvas_mut().create_image(2, 2, &[255; 16]).unwrap()
    }

    #[test]
    fn white_tint_skips_multiply_pass() {
        let mut b = backend();
        let tex = texture(&mut b);
        let q = DrawOptions::at(0.0, 0.0).resolve(2.0, 2.0);
        b.draw_quad(&tex, &q);
        assert!(!b
            .canvas()
            .commands()
            .contains(&CanvasCommand::SetComposite(Composite::Multiply)));
    }

    #[test]
    fn colored_tint_adds_multiply_fill_over_destination() {
        let mut b = backend();
        let tex = texture(&mut b);
        let q = DrawOptions::at(0.0, 0.0)
            .with_size(10.0, 20.0)
            .with_tint(Color::new(1.0, 0.0, 0.0, 0.5))
            .resolve(2.0, 2.0);
        b.draw_quad(&tex, &q);
        let cmds = b.canvas().commands();
        assert!(cmds.contains(&CanvasCommand::SetGlobalAlpha(0.5)));
        assert!(cmds.contains(&CanvasCommand::SetComposite(Composite::Multiply)));
        assert!(cmds.contains(&CanvasCommand::FillRect([0.0, 0.0, 10.0, 20.0])));
        assert_eq!(cmds.first(), Some(&CanvasCommand::Save));
        assert_eq!(cmds.last(), Some(&CanvasCommand::Restore));
    }

    #[test]
    fn source_rect_is_passed_through_unflipped() {
        let mut b = backend();
        let tex = texture(&mut b);
        let q = DrawOptions::at(0.0, 0.0).with_source(0.0, 1.0, 1.0, 1.0).resolve(2.0, 2.0);
        b.draw_quad(&tex, &q);
        let draws: Vec<_> = b.canvas().image_draws().collect();
        assert_eq!(draws, vec![(tex.id, [0.0, 1.0, 1.0, 1.0], [0.0, 0.0, 2.0, 2.0])]);
    }

    #[test]
    fn outline_strokes_closed_path() {
        let mut b = backend();
        b.draw_shape(&Shape::RectOutline(crate::coords::Rect::new(1.0, 1.0, 4.0, 4.0)), Color::RED);
        let cmds = b.canvas().commands();
        let line_tos = cmds.iter().filter(|c| matches!(c, CanvasCommand::LineTo(..))).count();
        assert_eq!(line_tos, 4);
        assert_eq!(cmds.last(), Some(&CanvasCommand::Stroke));
    }

    #[test]
    fn closed_backend_ignores_draws() {
        let mut b = backend();
        b.close();
        b.draw_shape(&Shape::Rect(crate::coords::Rect::new(0.0, 0.0, 1.0, 1.0)), Color::RED);
        b.clear(Color::BLACK);
        assert!(b.canvas().commands().is_empty());
        assert!(b.should_close());
    }
}
