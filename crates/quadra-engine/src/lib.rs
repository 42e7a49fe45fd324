//! Quadra: an immediate-mode 2D drawing layer.
//!
//! One [`RenderContext`] per window (or browser canvas) draws flat shapes,
//! textured quads and bitmap text, tracks keyboard and mouse input with
//! one-frame edge detection, and paces the frame loop.
//!
//! ```no_run
//! use quadra_engine::{AppControl, Color, EngineConfig, Key, RenderContext};
//!
//! let mut ctx = RenderContext::open(EngineConfig::new(800, 600, "demo"))?;
//! let mut x = 400.0;
//! ctx.run_game_loop(|ctx| {
//!     if ctx.is_key_down(Key::ArrowRight) {
//!         x += 2.0;
//!     }
//!     ctx.clear_background(Color::BLACK);
//!     ctx.draw_circle(x, 300.0, 50.0, Color::YELLOW);
//!     AppControl::Continue
//! });
//! # Ok::<(), quadra_engine::PlatformError>(())
//! ```
//!
//! Rendering goes through a [`Backend`]: wgpu + winit on desktop
//! ([`GpuBackend`]) and the 2D canvas API in a browser or headless
//! ([`CanvasBackend`]).

pub mod backend;
pub mod config;
pub mod context;
pub mod coords;
pub mod error;
pub mod image;
pub mod input;
pub mod logging;
pub mod paint;
pub mod quad;
pub mod shapes;
pub mod text;
pub mod time;

pub use crate::backend::canvas::{CanvasBackend, RecordingCanvas};
#[cfg(not(target_arch = "wasm32"))]
pub use crate::backend::gpu::{GpuBackend, GpuInit};
pub use crate::backend::Backend;
pub use crate::config::{EngineConfig, FontAtlasConfig};
pub use crate::context::{AppControl, RenderContext};
pub use crate::error::{LoadError, PlatformError};
pub use crate::image::Image;
pub use crate::input::{Key, MouseButton};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::paint::Color;
pub use crate::quad::DrawOptions;
pub use crate::text::GlyphGrid;
