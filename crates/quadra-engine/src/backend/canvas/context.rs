use crate::input::InputEvent;

/// `globalCompositeOperation` values the backend uses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Composite {
    SourceOver,
    Multiply,
}

impl Composite {
    pub fn as_css(self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Multiply => "multiply",
        }
    }
}

/// The slice of the HTML canvas 2D API the canvas backend draws through.
///
/// Coordinates are canvas pixels with a top-left origin. Method names follow
/// `CanvasRenderingContext2D`; `set_transform` takes `[a, b, c, d, e, f]`.
pub trait Canvas2d {
    /// Drawable image created from RGBA pixels.
    type Image;

    /// Canvas size in CSS pixels.
    fn size(&self) -> (f32, f32);

    fn create_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Self::Image, String>;
    fn release_image(&mut self, image: Self::Image);

    fn save(&mut self);
    fn restore(&mut self);
    fn set_transform(&mut self, m: [f64; 6]);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite(&mut self, op: Composite);
    fn set_fill_style(&mut self, css: &str);
    fn set_stroke_style(&mut self, css: &str);

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    /// `drawImage(image, sx, sy, sw, sh, dx, dy, dw, dh)`.
    fn draw_image(&mut self, image: &Self::Image, src: [f64; 4], dst: [f64; 4]);

    /// Input received since the last call.
    fn drain_events(&mut self) -> Vec<InputEvent>;

    fn is_closed(&self) -> bool;

    fn close(&mut self);

    /// End of frame. Browsers composite on their own, so most canvases do nothing.
    fn present(&mut self) {}
}
