//! Texture image decoding.
//!
//! Images are decoded once into a flat 8-bit RGB buffer. The renderer maps
//! texture coordinates to pixel indices and normalizes the bytes itself.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: row-major RGB bytes, top row first.
#[derive(Clone, Debug)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel data, `width * height` entries
    pub pixels: Vec<[u8; 3]>,
}

impl ImageData {
    /// Create an image from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> TextureResult<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(TextureError::LoadError(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width as usize * height as usize,
                width,
                height,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Get the pixel at integer coordinates, clamping them into the image.
    ///
    /// An image with no pixels returns magenta.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return [255, 0, 255];
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

/// Load and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> TextureResult<ImageData> {
    let path = path.as_ref();
    let img = image::open(path)?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| p.0).collect();

    let data = ImageData::new(width, height, pixels)?;
    log::debug!(
        "Loaded texture: {} ({}x{}, {:.1} KB)",
        path.display(),
        data.width,
        data.height,
        data.size_bytes() as f32 / 1024.0
    );

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> ImageData {
        ImageData::new(
            2,
            2,
            vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_lookup() {
        let image = two_by_two();
        assert_eq!(image.pixel(0, 0), [255, 0, 0]);
        assert_eq!(image.pixel(1, 0), [0, 255, 0]);
        assert_eq!(image.pixel(0, 1), [0, 0, 255]);
        assert_eq!(image.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn test_pixel_lookup_clamps() {
        let image = two_by_two();
        assert_eq!(image.pixel(-3, 0), [255, 0, 0]);
        assert_eq!(image.pixel(2, 5), [255, 255, 255]);
    }

    #[test]
    fn test_pixel_count_mismatch_is_rejected() {
        let result = ImageData::new(3, 3, vec![[0, 0, 0]; 4]);
        assert!(matches!(result, Err(TextureError::LoadError(_))));
    }

    #[test]
    fn test_load_missing_image_is_an_error() {
        let result = load_image("does/not/exist.png");
        assert!(matches!(result, Err(TextureError::ImageError(_))));
    }
}
