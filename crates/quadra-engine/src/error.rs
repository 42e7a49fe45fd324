//! Error taxonomy.
//!
//! Setup failures are fatal and surface as [`PlatformError`]. Asset failures are
//! recoverable and surface as [`LoadError`]. Per-draw problems are not errors at
//! all: the draw is skipped.

use std::path::PathBuf;

/// Window, surface, canvas or device creation failed. The caller must abort startup.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to create event loop")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(String),

    /// Adapter, device or surface setup; the inner error carries the context chain.
    #[error("graphics device initialization failed: {0:#}")]
    Gpu(anyhow::Error),

    #[error("canvas unavailable: {0}")]
    Canvas(String),

    #[error("window was closed before it finished opening")]
    ClosedDuringInit,
}

/// An image could not be turned into a drawable [`Image`](crate::image::Image).
///
/// Always names the path (or memory label) that failed. No image is created.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read image {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("backend rejected image {path:?}: {reason}")]
    Upload { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::Upload { path, .. } => path,
        }
    }
}
