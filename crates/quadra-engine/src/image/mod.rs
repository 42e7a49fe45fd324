//! Image handles, decoding and the per-backend handle table.
//!
//! An [`Image`] is a caller-owned handle: it is created by a load, stays valid
//! until the caller deletes it, and is never freed behind the caller's back.

mod decode;
mod store;

use std::path::{Path, PathBuf};

pub use decode::{decode_file, decode_memory, DecodedImage, TextureOrigin};
pub use store::ImageStore;

/// Opaque identifier of a backend texture in an [`ImageStore`].
///
/// Identifiers are never reused, so a stale handle can not alias a later load.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) u64);

/// A loaded image: backend handle plus native pixel size and source path.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    id: ImageId,
    width: u32,
    height: u32,
    path: PathBuf,
}

impl Image {
    pub(crate) fn new(id: ImageId, width: u32, height: u32, path: PathBuf) -> Self {
        Self { id, width, height, path }
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native size as floats, the unit every draw computation works in.
    #[inline]
    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
