use std::collections::HashMap;

use crate::input::InputEvent;

use super::{Canvas2d, Composite};

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCommand {
    Save,
    Restore,
    SetTransform([f64; 6]),
    SetGlobalAlpha(f64),
    SetComposite(Composite),
    SetFillStyle(String),
    SetStrokeStyle(String),
    ClearRect([f64; 4]),
    FillRect([f64; 4]),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    ClosePath,
    Fill,
    Stroke,
    DrawImage { image: u32, src: [f64; 4], dst: [f64; 4] },
    Present,
}

/// Image handle issued by [`RecordingCanvas`].
#[derive(Debug, PartialEq, Eq)]
pub struct RecordedImage {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

/// Headless canvas that records every call.
///
/// Input is injected with [`RecordingCanvas::push_event`].
#[derive(Debug)]
pub struct RecordingCanvas {
    size: (f32, f32),
    commands: Vec<CanvasCommand>,
    events: Vec<InputEvent>,
    /// Live image ids with the first uploaded pixel, for checking row order.
    live_images: HashMap<u32, [u8; 4]>,
    next_image: u32,
    released: usize,
    closed: bool,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            commands: Vec::new(),
            events: Vec::new(),
            live_images: HashMap::new(),
            next_image: 1,
            released: 0,
            closed: false,
        }
    }

    pub fn commands(&self) -> &[CanvasCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<CanvasCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }

    /// Simulates the user closing the page.
    pub fn request_close(&mut self) {
        self.closed = true;
    }

    pub fn live_images(&self) -> usize {
        self.live_images.len()
    }

    /// First RGBA pixel uploaded for a live image.
    pub fn first_pixel(&self, image: u32) -> Option<[u8; 4]> {
        self.live_images.get(&image).copied()
    }

    pub fn released_images(&self) -> usize {
        self.released
    }

    /// `DrawImage` commands only.
    pub fn image_draws(&self) -> impl Iterator<Item = (u32, [f64; 4], [f64; 4])> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            CanvasCommand::DrawImage { image, src, dst } => Some((image, src, dst)),
            _ => None,
        })
    }
}

impl Canvas2d for RecordingCanvas {
    type Image = RecordedImage;

    fn size(&self) -> (f32, f32) {
        self.size
    }

    fn create_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<RecordedImage, String> {
        if width == 0 || height == 0 {
            return Err(format!("cannot create a {width}x{height} image"));
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(format!("expected {} bytes, got {}", width * height * 4, rgba.len()));
        }
        let id = self.next_image;
        self.next_image += 1;
        let mut first_pixel = [0; 4];
        first_pixel.copy_from_slice(&rgba[..4]);
        self.live_images.insert(id, first_pixel);
        Ok(RecordedImage { id, width, height })
    }

    fn release_image(&mut self, image: RecordedImage) {
        if self.live_images.remove(&image.id).is_some() {
            self.released += 1;
        }
    }

    fn save(&mut self) {
        self.commands.push(CanvasCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(CanvasCommand::Restore);
    }

    fn set_transform(&mut self, m: [f64; 6]) {
        self.commands.push(CanvasCommand::SetTransform(m));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(CanvasCommand::SetGlobalAlpha(alpha));
    }

    fn set_composite(&mut self, op: Composite) {
        self.commands.push(CanvasCommand::SetComposite(op));
    }

    fn set_fill_style(&mut self, css: &str) {
        self.commands.push(CanvasCommand::SetFillStyle(css.to_string()));
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.commands.push(CanvasCommand::SetStrokeStyle(css.to_string()));
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(CanvasCommand::ClearRect([x, y, w, h]));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(CanvasCommand::FillRect([x, y, w, h]));
    }

    fn begin_path(&mut self) {
        self.commands.push(CanvasCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(CanvasCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(CanvasCommand::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.commands.push(CanvasCommand::Arc { x, y, radius, start, end });
    }

    fn close_path(&mut self) {
        self.commands.push(CanvasCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(CanvasCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(CanvasCommand::Stroke);
    }

    fn draw_image(&mut self, image: &RecordedImage, src: [f64; 4], dst: [f64; 4]) {
        self.commands.push(CanvasCommand::DrawImage { image: image.id, src, dst });
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn present(&mut self) {
        self.commands.push(CanvasCommand::Present);
    }
}
