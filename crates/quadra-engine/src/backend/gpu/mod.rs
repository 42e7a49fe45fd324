//! wgpu + winit desktop backend.
//!
//! Draw calls are recorded into CPU-side vertex lists and replayed in one
//! render pass when the frame is presented. The frame's clear color is the load
//! operation of that pass.
//!
//! Textures are addressed bottom-left first, so images are flipped on decode
//! and source rectangles are mapped through [`TextureOrigin::BottomLeft`].

mod device;
mod renderer;
mod surface;
mod window;

pub use device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
pub use renderer::GpuTexture;

use crate::backend::Backend;
use crate::config::EngineConfig;
use crate::coords::Viewport;
use crate::error::{LoadError, PlatformError};
use crate::image::{DecodedImage, TextureOrigin};
use crate::input::InputState;
use crate::paint::Color;
use crate::quad::ResolvedQuad;
use crate::shapes::Shape;

use renderer::Renderer;
use window::NativeWindow;

pub struct GpuBackend {
    window: NativeWindow,
    renderer: Renderer,
}

impl GpuBackend {
    /// Opens the window and brings up the device. Blocks until both are ready.
    pub fn new(config: &EngineConfig) -> Result<Self, PlatformError> {
        let window = NativeWindow::open(config)?;
        let renderer = window
            .with_gpu(Renderer::new)
            .ok_or(PlatformError::ClosedDuringInit)?;
        Ok(Self { window, renderer })
    }
}

impl Backend for GpuBackend {
    type Texture = GpuTexture;

    fn texture_origin(&self) -> TextureOrigin {
        TextureOrigin::BottomLeft
    }

    fn viewport(&self) -> Viewport {
        self.window.viewport()
    }

    fn poll_events(&mut self, input: &mut InputState) {
        for ev in self.window.pump() {
            input.apply_event(ev);
        }
    }

    fn should_close(&self) -> bool {
        self.window.close_requested()
    }

    fn clear(&mut self, color: Color) {
        self.renderer.clear(color);
    }

    fn draw_shape(&mut self, shape: &Shape, color: Color) {
        if !self.window.is_open() {
            return;
        }
        let viewport = self.window.viewport();
        self.renderer.push_shape(shape, color, viewport);
    }

    fn create_texture(&mut self, image: &DecodedImage) -> Result<GpuTexture, LoadError> {
        let renderer = &self.renderer;
        self.window
            .with_gpu(|gpu| renderer.create_texture(gpu, image))
            .unwrap_or_else(|| {
                Err(LoadError::Upload {
                    path: image.label.clone(),
                    reason: "window is closed".to_string(),
                })
            })
    }

    fn destroy_texture(&mut self, texture: GpuTexture) {
        // Frames recorded before this point hold their own reference to the bind group.
        drop(texture);
    }

    fn draw_quad(&mut self, texture: &GpuTexture, quad: &ResolvedQuad) {
        if !self.window.is_open() {
            return;
        }
        let viewport = self.window.viewport();
        self.renderer.push_quad(texture, quad, viewport);
    }

    fn present(&mut self) {
        if self.window.is_minimized() {
            self.renderer.discard();
            return;
        }
        let renderer = &mut self.renderer;
        let outcome = self.window.with_gpu_mut(|gpu| renderer.render(gpu));
        if let Some(Err(SurfaceErrorAction::Fatal)) = outcome {
            log::error!("surface lost beyond recovery; closing window");
            self.window.close();
        }
    }

    fn close(&mut self) {
        self.window.close();
    }
}
