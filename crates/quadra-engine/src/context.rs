//! The application-facing drawing context.
//!
//! A [`RenderContext`] owns one backend plus the input tracker, the frame timer,
//! the image handle table and the glyph atlas. All drawing, loading, input and
//! timing calls go through it, on the thread that created it.

use std::path::Path;

use crate::backend::canvas::{Canvas2d, CanvasBackend};
use crate::backend::Backend;
use crate::config::{EngineConfig, FontAtlasConfig};
use crate::coords::{Rect, Vec2};
use crate::error::LoadError;
use crate::image::{decode_file, decode_memory, DecodedImage, Image, ImageStore};
use crate::input::{InputState, Key, MouseButton};
use crate::paint::Color;
use crate::quad::DrawOptions;
use crate::shapes::Shape;
use crate::text::{layout_centered, layout_line, layout_outline, layout_with_background, GlyphGrid};
use crate::time::{default_clock, Clock, FrameTimer};

#[cfg(not(target_arch = "wasm32"))]
use crate::backend::gpu::GpuBackend;
#[cfg(not(target_arch = "wasm32"))]
use crate::error::PlatformError;

/// Returned by the per-frame callback of [`RenderContext::run_game_loop`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

struct FontAtlas {
    image: Image,
    grid: GlyphGrid,
}

pub struct RenderContext<B: Backend> {
    backend: B,
    images: ImageStore<B::Texture>,
    input: InputState,
    timer: FrameTimer,
    font: Option<FontAtlas>,
    closed: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl RenderContext<GpuBackend> {
    /// Opens a window with a GPU surface.
    ///
    /// Failure here is fatal; there is nothing to draw to.
    pub fn open(config: EngineConfig) -> Result<Self, PlatformError> {
        let backend = GpuBackend::new(&config)?;
        Ok(Self::with_backend(backend, config))
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl RenderContext<CanvasBackend<crate::backend::canvas::WebCanvas>> {
    /// Takes over the `<canvas>` element with the given id.
    pub fn attach(canvas_id: &str, config: EngineConfig) -> Result<Self, crate::error::PlatformError> {
        let canvas = crate::backend::canvas::WebCanvas::attach(canvas_id, config.width, config.height)?;
        Ok(Self::with_backend(CanvasBackend::new(canvas), config))
    }
}

impl<C: Canvas2d> RenderContext<CanvasBackend<C>> {
    pub fn canvas(&self) -> &C {
        self.backend.canvas()
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        self.backend.canvas_mut()
    }
}

impl<B: Backend> RenderContext<B> {
    /// Wraps an already initialized backend using the platform clock.
    pub fn with_backend(backend: B, config: EngineConfig) -> Self {
        Self::with_clock(backend, config, default_clock())
    }

    /// Like [`RenderContext::with_backend`] with an explicit time source.
    pub fn with_clock(backend: B, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let mut ctx = Self {
            backend,
            images: ImageStore::new(),
            input: InputState::new(),
            timer: FrameTimer::new(clock, config.effective_fps()),
            font: None,
            closed: false,
        };

        if let Some(atlas) = config.font_atlas {
            ctx.load_font_atlas(&atlas);
        }

        // Events that arrived while the window was opening belong to the first frame.
        ctx.backend.poll_events(&mut ctx.input);
        ctx
    }

    fn load_font_atlas(&mut self, atlas: &FontAtlasConfig) {
        match self.load_image(&atlas.path) {
            Ok(image) => {
                log::debug!("font atlas {:?} loaded", atlas.path);
                self.font = Some(FontAtlas { image, grid: atlas.grid.clone() });
            }
            Err(e) => log::warn!("font atlas unavailable, text drawing disabled: {e}"),
        }
    }

    /// Replaces the glyph atlas with an already loaded image.
    ///
    /// The previous atlas image, if any, is deleted.
    pub fn set_font_atlas(&mut self, image: Image, grid: GlyphGrid) {
        if let Some(old) = self.font.replace(FontAtlas { image, grid }) {
            self.delete_image(&old.image);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ---- window and frame ----

    /// `false` once the window was asked to close or [`RenderContext::close`] ran.
    pub fn should_continue(&self) -> bool {
        !self.closed && !self.backend.should_close()
    }

    /// Current drawing area in logical pixels.
    pub fn window_size(&self) -> (f32, f32) {
        let vp = self.backend.viewport();
        (vp.width, vp.height)
    }

    /// Shows the frame, then starts the next input frame with fresh platform events.
    pub fn present(&mut self) {
        if self.closed {
            return;
        }
        self.backend.present();
        self.input.begin_frame();
        self.backend.poll_events(&mut self.input);
    }

    /// Releases every image and the window. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.font = None;
        for texture in self.images.drain() {
            self.backend.destroy_texture(texture);
        }
        self.backend.close();
        self.closed = true;
        log::info!("render context closed");
    }

    /// Runs `frame` once per tick until it returns [`AppControl::Exit`] or the
    /// window closes: `frame`, then [`wait`](Self::wait), then [`present`](Self::present).
    pub fn run_game_loop<F>(&mut self, mut frame: F)
    where
        F: FnMut(&mut Self) -> AppControl,
    {
        while self.should_continue() {
            if frame(self) == AppControl::Exit {
                break;
            }
            self.wait();
            self.present();
        }
    }

    /// Runs one frame of an externally paced loop, such as the browser's
    /// animation frame: tick the timer, `frame`, then [`present`](Self::present).
    ///
    /// Returns `false` once the loop should stop; the context is closed by then.
    pub fn step_frame<F>(&mut self, frame: &mut F) -> bool
    where
        F: FnMut(&mut Self) -> AppControl,
    {
        self.timer.tick();
        if !self.should_continue() || frame(self) == AppControl::Exit {
            self.close();
            return false;
        }
        self.present();
        true
    }

    // ---- primitives ----

    /// Fills the frame. Anything drawn earlier in the frame is discarded.
    pub fn clear_background(&mut self, color: Color) {
        if self.closed {
            return;
        }
        self.backend.clear(color);
    }

    fn draw_shape(&mut self, shape: Shape, color: Color) {
        if self.closed || !shape.is_finite() {
            return;
        }
        self.backend.draw_shape(&shape, color);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.draw_shape(
            Shape::Line { from: Vec2::new(x1, y1), to: Vec2::new(x2, y2) },
            color,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, color: Color) {
        self.draw_shape(
            Shape::Triangle {
                a: Vec2::new(x1, y1),
                b: Vec2::new(x2, y2),
                c: Vec2::new(x3, y3),
            },
            color,
        );
    }

    pub fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.draw_shape(Shape::Rect(Rect::new(x, y, width, height)), color);
    }

    pub fn draw_rectangle_outline(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.draw_shape(Shape::RectOutline(Rect::new(x, y, width, height)), color);
    }

    pub fn draw_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Color) {
        self.draw_shape(
            Shape::Circle { center: Vec2::new(center_x, center_y), radius },
            color,
        );
    }

    // ---- images ----

    /// Decodes and uploads an image file (PNG, JPEG, GIF).
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<Image, LoadError> {
        let decoded = decode_file(path, self.backend.texture_origin())?;
        self.upload(decoded)
    }

    /// Decodes and uploads encoded image bytes. `label` names the image in errors.
    pub fn load_image_from_memory(&mut self, bytes: &[u8], label: impl AsRef<Path>) -> Result<Image, LoadError> {
        let decoded = decode_memory(bytes, label, self.backend.texture_origin())?;
        self.upload(decoded)
    }

    fn upload(&mut self, decoded: DecodedImage) -> Result<Image, LoadError> {
        if self.closed {
            return Err(LoadError::Upload {
                path: decoded.label,
                reason: "render context is closed".to_string(),
            });
        }
        let texture = self.backend.create_texture(&decoded)?;
        let id = self.images.insert(texture);
        log::debug!("loaded {:?} as {id:?} ({}x{})", decoded.label, decoded.width, decoded.height);
        Ok(Image::new(id, decoded.width, decoded.height, decoded.label))
    }

    /// Releases the image's backend resource. Deleting twice is a no-op.
    pub fn delete_image(&mut self, image: &Image) {
        match self.images.remove(image.id()) {
            Some(texture) => self.backend.destroy_texture(texture),
            None => log::trace!("{:?} already deleted", image.id()),
        }
    }

    /// Draws `image` as described by `options`.
    ///
    /// Every other image call ends up here. `None` or a deleted image draws nothing.
    pub fn draw_quad(&mut self, image: Option<&Image>, options: DrawOptions) {
        let Some(image) = image else {
            return;
        };
        if self.closed {
            return;
        }
        let Some(texture) = self.images.get(image.id()) else {
            log::trace!("skipping draw of stale {:?}", image.id());
            return;
        };

        let (w, h) = image.size();
        let quad = options.resolve(w, h);
        if !quad.is_drawable() {
            return;
        }
        self.backend.draw_quad(texture, &quad);
    }

    /// Native size, top-left at `(x, y)`.
    pub fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        let (w, h) = image.size();
        self.draw_quad(Some(image), DrawOptions::at(x, y).with_size(w, h));
    }

    /// Native size multiplied by `scale_x` / `scale_y`.
    pub fn draw_image_scaled(&mut self, image: &Image, x: f32, y: f32, scale_x: f32, scale_y: f32) {
        let (w, h) = image.size();
        self.draw_quad(
            Some(image),
            DrawOptions::at(x, y).with_size(w * scale_x, h * scale_y),
        );
    }

    /// Native size, rotated `degrees` clockwise about its center.
    pub fn draw_image_rotated(&mut self, image: &Image, x: f32, y: f32, degrees: f32) {
        let (w, h) = image.size();
        self.draw_quad(
            Some(image),
            DrawOptions::at(x, y).with_size(w, h).with_rotation(degrees),
        );
    }

    pub fn draw_image_tinted(&mut self, image: &Image, x: f32, y: f32, tint: Color) {
        let (w, h) = image.size();
        self.draw_quad(Some(image), DrawOptions::at(x, y).with_size(w, h).with_tint(tint));
    }

    // ---- text ----

    fn draw_glyphs(&mut self, glyphs: Vec<DrawOptions>) {
        let Some(atlas) = self.font.as_ref().map(|f| f.image.clone()) else {
            return;
        };
        for glyph in glyphs {
            self.draw_quad(Some(&atlas), glyph);
        }
    }

    fn glyph_grid(&self) -> Option<&GlyphGrid> {
        self.font.as_ref().map(|f| &f.grid)
    }

    /// Left-aligned text with its top-left at `(x, y)`. `size` 1 is half a cell per character.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(grid) = self.glyph_grid() else { return };
        let glyphs = layout_line(grid, text, x, y, size, color);
        self.draw_glyphs(glyphs);
    }

    pub fn draw_text_centered(&mut self, text: &str, center_x: f32, center_y: f32, size: f32, color: Color) {
        let Some(grid) = self.glyph_grid() else { return };
        let glyphs = layout_centered(grid, text, center_x, center_y, size, color);
        self.draw_glyphs(glyphs);
    }

    /// Text on a filled panel whose top-left is `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_with_background(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        background: Color,
        color: Color,
        padding_x: f32,
        padding_y: f32,
    ) {
        let Some(grid) = self.glyph_grid() else { return };
        let layout = layout_with_background(grid, text, x, y, size, color, padding_x, padding_y);
        self.draw_shape(Shape::Rect(layout.panel), background);
        self.draw_glyphs(layout.glyphs);
    }

    pub fn draw_text_outline(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color, outline: Color) {
        let Some(grid) = self.glyph_grid() else { return };
        let glyphs = layout_outline(grid, text, x, y, size, color, outline);
        self.draw_glyphs(glyphs);
    }

    // ---- input ----

    /// Edge-triggered: `true` only in the frame the key went down.
    ///
    /// Same as [`is_key_just_pressed`](Self::is_key_just_pressed). Use
    /// [`is_key_down`](Self::is_key_down) for "currently held".
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.input.key_pressed(key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.input.key_pressed(key)
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.key_down(key)
    }

    pub fn is_key_released(&self, key: Key) -> bool {
        self.input.key_released(key)
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.input.button_down(button)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.input.button_pressed(button)
    }

    pub fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.input.button_released(button)
    }

    /// Logical pixels, top-left origin.
    pub fn mouse_position(&self) -> (f32, f32) {
        let p = self.input.pointer();
        (p.x, p.y)
    }

    /// Pointer movement since the start of the frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        let d = self.input.pointer_delta();
        (d.x, d.y)
    }

    pub fn is_mouse_moved(&self) -> bool {
        self.input.pointer_delta() != Vec2::zero()
    }

    /// Scroll this frame, in lines.
    pub fn scroll_delta(&self) -> (f32, f32) {
        let s = self.input.scroll();
        (s.x, s.y)
    }

    pub fn is_scroll_moved(&self) -> bool {
        self.input.scroll() != Vec2::zero()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    // ---- timing ----

    /// Sleeps out the rest of the frame interval.
    pub fn wait(&mut self) {
        self.timer.wait();
    }

    /// Frames counted over the last full second. Counts one frame per call.
    pub fn fps(&mut self) -> u32 {
        self.timer.fps()
    }

    /// Seconds between the last two frame boundaries: [`wait`](Self::wait)
    /// calls, or animation-frame ticks in the browser loop.
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Seconds since startup or the last [`reset_timer`](Self::reset_timer).
    pub fn time(&self) -> f64 {
        self.timer.time()
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset_timer();
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.timer.set_target_fps(fps);
    }
}

impl<B: Backend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl RenderContext<CanvasBackend<crate::backend::canvas::WebCanvas>> {
    /// Hands the context to the browser: `frame` runs once per
    /// `requestAnimationFrame` tick until it returns [`AppControl::Exit`] or the
    /// page goes away.
    pub fn run_animation_loop<F>(self, frame: F)
    where
        F: FnMut(&mut Self) -> AppControl + 'static,
    {
        use std::cell::RefCell;
        use std::rc::Rc;
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        type Tick = Closure<dyn FnMut(f64)>;

        let Some(window) = web_sys::window() else {
            log::error!("no window; animation loop not started");
            return;
        };

        let tick: Rc<RefCell<Option<Tick>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&tick);
        let mut ctx = self;
        let mut frame = frame;
        let win = window.clone();

        *tick.borrow_mut() = Some(Closure::new(move |_ts: f64| {
            if !ctx.step_frame(&mut frame) {
                return;
            }
            if let Some(cb) = next.borrow().as_ref() {
                if win.request_animation_frame(cb.as_ref().unchecked_ref()).is_err() {
                    log::error!("requestAnimationFrame failed");
                }
            }
        }));

        if let Some(cb) = tick.borrow().as_ref() {
            if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_err() {
                log::error!("requestAnimationFrame failed");
            }
        }
    }
}
