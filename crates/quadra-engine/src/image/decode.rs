use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Where a backend puts texture coordinate `v = 0`.
///
/// The decoder uses this to decide whether rows must be flipped before upload,
/// and the quad geometry uses it to map the source rectangle to `(u, v)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureOrigin {
    /// `v = 0` is the bottom row (GL convention). Pixel rows are flipped on decode.
    BottomLeft,
    /// `v = 0` is the top row (2D canvas convention). Pixel rows are kept as-is.
    TopLeft,
}

impl TextureOrigin {
    #[inline]
    pub fn flips_on_decode(self) -> bool {
        matches!(self, TextureOrigin::BottomLeft)
    }
}

/// RGBA8 pixels ready for upload, already in the row order the backend expects.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub label: PathBuf,
    pub width: u32,
    pub height: u32,
    pub origin: TextureOrigin,
    /// Tightly packed RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// RGBA of the pixel at `(x, y)` in upload row order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = self.rgba.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Reads and decodes a PNG/JPEG/GIF file for a backend with the given origin.
pub fn decode_file(path: impl AsRef<Path>, origin: TextureOrigin) -> Result<DecodedImage, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_memory(&bytes, path, origin)
}

/// Decodes an in-memory PNG/JPEG/GIF. `label` is reported in errors and kept as
/// the image's path.
pub fn decode_memory(
    bytes: &[u8],
    label: impl AsRef<Path>,
    origin: TextureOrigin,
) -> Result<DecodedImage, LoadError> {
    let label = label.as_ref().to_path_buf();
    let img = image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        path: label.clone(),
        source,
    })?;

    let img = if origin.flips_on_decode() { img.flipv() } else { img };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!("decoded {label:?}: {width}x{height}, origin {origin:?}");

    Ok(DecodedImage {
        label,
        width,
        height,
        origin,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP: [u8; 4] = [255, 0, 0, 255];
    const BOTTOM: [u8; 4] = [0, 0, 255, 255];

    /// 2x3 PNG, red top row, blue everywhere else.
    fn two_tone_png() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(2, 3, |_, y| {
            if y == 0 { image::Rgba(TOP) } else { image::Rgba(BOTTOM) }
        });
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn bottom_left_origin_flips_rows() {
        let d = decode_memory(&two_tone_png(), "mem.png", TextureOrigin::BottomLeft).unwrap();
        assert_eq!((d.width, d.height), (2, 3));
        assert_eq!(d.pixel(0, 0), Some(BOTTOM));
        assert_eq!(d.pixel(1, 2), Some(TOP));
    }

    #[test]
    fn top_left_origin_keeps_rows() {
        let d = decode_memory(&two_tone_png(), "mem.png", TextureOrigin::TopLeft).unwrap();
        assert_eq!(d.pixel(0, 0), Some(TOP));
        assert_eq!(d.pixel(1, 2), Some(BOTTOM));
        assert_eq!(d.rgba.len(), 2 * 3 * 4);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = decode_file("/nonexistent.png", TextureOrigin::TopLeft).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.path(), Path::new("/nonexistent.png"));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = decode_memory(b"not an image", "junk.png", TextureOrigin::BottomLeft).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert_eq!(err.path(), Path::new("junk.png"));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let d = decode_memory(&two_tone_png(), "mem.png", TextureOrigin::TopLeft).unwrap();
        assert_eq!(d.pixel(2, 0), None);
        assert_eq!(d.pixel(0, 3), None);
    }
}
