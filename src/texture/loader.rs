//! Texture keys, decoded images and the loader seam.
//!
//! Decoding image files is left to the embedding application: a
//! [`TextureLoader`] turns a source identifier into RGBA pixels. The texture
//! manager only caches and shares what the loader returns.

use std::collections::HashMap;

use crate::geometry::PixelRect;

// ---------------------------------------------------------------------------
// TextureKey
// ---------------------------------------------------------------------------

/// Cache key of a texture entry: source identifier, sub-rectangle and
/// smoothing flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey {
    pub id: String,
    pub part: Option<PixelRect>,
    pub smooth: bool,
}

impl TextureKey {
    /// Key for a whole image with smoothing enabled.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), part: None, smooth: true }
    }

    /// Restrict the key to a part of the image (builder).
    pub fn with_part(mut self, part: PixelRect) -> Self {
        self.part = Some(part);
        self
    }

    /// Set the smoothing flag (builder).
    pub fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

// ---------------------------------------------------------------------------
// ImageData
// ---------------------------------------------------------------------------

/// A decoded image: tightly packed RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap RGBA pixels. Returns `None` if the buffer length does not match.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self { width, height, pixels })
    }

    /// An image filled with a single RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self { width, height, pixels }
    }

    /// RGBA value of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.pixels.get(idx..idx + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Copy out a sub-rectangle. Returns `None` if it does not fit.
    pub fn crop(&self, part: PixelRect) -> Option<ImageData> {
        if !part.fits_within(self.width, self.height) {
            return None;
        }
        let row_len = part.width as usize * 4;
        let mut pixels = Vec::with_capacity(row_len * part.height as usize);
        for row in part.y..part.y + part.height {
            let start = (row as usize * self.width as usize + part.x as usize) * 4;
            pixels.extend_from_slice(self.pixels.get(start..start + row_len)?);
        }
        Some(ImageData { width: part.width, height: part.height, pixels })
    }
}

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Why a texture could not be produced.
///
/// Cloneable so every caller waiting on the same load receives the failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("no image with id '{0}'")]
    NotFound(String),
    #[error("failed to decode '{id}': {reason}")]
    Decode { id: String, reason: String },
    #[error("part {part:?} lies outside the {width}x{height} image '{id}'")]
    PartOutOfBounds {
        id: String,
        part: PixelRect,
        width: u32,
        height: u32,
    },
}

// ---------------------------------------------------------------------------
// TextureLoader
// ---------------------------------------------------------------------------

/// Produces decoded images for source identifiers.
pub trait TextureLoader: Send + Sync {
    /// Load the full image named by `id`.
    fn load(&self, id: &str) -> Result<ImageData, LoadError>;
}

impl<F> TextureLoader for F
where
    F: Fn(&str) -> Result<ImageData, LoadError> + Send + Sync,
{
    fn load(&self, id: &str) -> Result<ImageData, LoadError> {
        self(id)
    }
}

/// A loader serving images registered in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    images: HashMap<String, ImageData>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image (builder).
    pub fn with_image(mut self, id: impl Into<String>, image: ImageData) -> Self {
        self.images.insert(id.into(), image);
        self
    }

    /// Register an image.
    pub fn insert(&mut self, id: impl Into<String>, image: ImageData) {
        self.images.insert(id.into(), image);
    }
}

impl TextureLoader for MemoryLoader {
    fn load(&self, id: &str) -> Result<ImageData, LoadError> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageData {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        ImageData::new(width, height, pixels).unwrap()
    }

    #[test]
    fn new_checks_buffer_length() {
        assert!(ImageData::new(2, 2, vec![0; 16]).is_some());
        assert!(ImageData::new(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn crop_copies_rows() {
        let image = gradient(4, 3);
        let part = image.crop(PixelRect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(part.width, 2);
        assert_eq!(part.height, 2);
        assert_eq!(part.pixel(0, 0), Some([1, 1, 0, 255]));
        assert_eq!(part.pixel(1, 1), Some([2, 2, 0, 255]));
    }

    #[test]
    fn crop_out_of_bounds() {
        let image = gradient(4, 3);
        assert!(image.crop(PixelRect::new(3, 0, 2, 1)).is_none());
        assert!(image.crop(PixelRect::new(0, 0, 4, 3)).is_some());
    }

    #[test]
    fn memory_loader_serves_registered_images() {
        let loader = MemoryLoader::new().with_image("a", ImageData::solid(1, 1, [1, 2, 3, 4]));
        assert_eq!(loader.load("a").unwrap().pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(loader.load("b"), Err(LoadError::NotFound("b".into())));
    }

    #[test]
    fn closures_are_loaders() {
        let loader = |id: &str| -> Result<ImageData, LoadError> {
            if id == "dot" {
                Ok(ImageData::solid(1, 1, [0, 0, 0, 255]))
            } else {
                Err(LoadError::NotFound(id.to_owned()))
            }
        };
        assert!(TextureLoader::load(&loader, "dot").is_ok());
        assert!(TextureLoader::load(&loader, "other").is_err());
    }
}
