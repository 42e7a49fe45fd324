//! Platform backends.
//!
//! A backend owns the window or canvas, turns [`Shape`]s and [`ResolvedQuad`]s
//! into pixels and reports input. Everything before that point (defaulting,
//! corner rotation, texture coordinates, text layout) is shared and lives in
//! [`crate::quad`], [`crate::shapes`] and [`crate::text`].

pub mod canvas;
#[cfg(not(target_arch = "wasm32"))]
pub mod gpu;

use crate::coords::Viewport;
use crate::error::LoadError;
use crate::image::{DecodedImage, TextureOrigin};
use crate::input::InputState;
use crate::paint::Color;
use crate::quad::ResolvedQuad;
use crate::shapes::Shape;

/// Contract every drawing surface implements.
///
/// Draw calls are only valid between two [`Backend::present`] calls; a backend
/// may record them and submit at present time.
pub trait Backend {
    /// Backend-native image object.
    type Texture;

    /// Row order this backend expects from the decoder.
    fn texture_origin(&self) -> TextureOrigin;

    /// Current drawing area in logical pixels.
    fn viewport(&self) -> Viewport;

    /// Delivers pending platform events to `input`.
    fn poll_events(&mut self, input: &mut InputState);

    /// `true` once the user or the platform asked to close.
    fn should_close(&self) -> bool;

    /// Fills the whole frame. Draws issued before this in the same frame are discarded.
    fn clear(&mut self, color: Color);

    fn draw_shape(&mut self, shape: &Shape, color: Color);

    fn create_texture(&mut self, image: &DecodedImage) -> Result<Self::Texture, LoadError>;

    fn destroy_texture(&mut self, texture: Self::Texture);

    fn draw_quad(&mut self, texture: &Self::Texture, quad: &ResolvedQuad);

    /// Shows the frame.
    fn present(&mut self);

    /// Releases the window or canvas. Further draws are ignored.
    fn close(&mut self);
}
