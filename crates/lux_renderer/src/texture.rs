//! Textures: spatially varying colors looked up at a hit point.

use std::path::Path;
use std::sync::Arc;

use lux_core::ImageData;
use lux_math::{Color, Interval, Point3};

/// Returned by an image texture whose image failed to load.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A color lookup by texture coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// A 3D checkerboard alternating between two textures.
///
/// Cells are cubes of side `scale` in world space.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// A texture backed by a decoded image.
///
/// `u` runs left to right and `v` bottom to top; both are clamped to [0, 1].
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// An image texture with no image; renders as cyan.
    pub fn missing() -> Self {
        Self { image: None }
    }

    /// Load an image file, falling back to [`ImageTexture::missing`] on failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match lux_core::load_image(path) {
            Ok(image) => Self::new(Arc::new(image)),
            Err(err) => {
                log::warn!("Using placeholder for texture {}: {}", path.display(), err);
                Self::missing()
            }
        }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        let image = match &self.image {
            Some(image) if image.height > 0 && image.width > 0 => image,
            _ => return MISSING_IMAGE_COLOR,
        };

        let u = Interval::UNIT.clamp(u);
        // Image rows run top to bottom
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = (u * image.width as f64) as i64;
        let j = (v * image.height as f64) as i64;
        let [r, g, b] = image.pixel(i, j);

        let color_scale = 1.0 / 255.0;
        Color::new(
            r as f64 * color_scale,
            g as f64 * color_scale,
            b as f64 * color_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::from_rgb(1.0, 0.5, 0.0);
        assert_eq!(tex.value(0.3, 0.7, Point3::ONE), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_parity() {
        let even = Color::ONE;
        let odd = Color::ZERO;
        let tex = CheckerTexture::from_colors(1.0, even, odd);

        assert_eq!(tex.value(0.0, 0.0, Point3::new(0.5, 0.5, 0.5)), even);
        assert_eq!(tex.value(0.0, 0.0, Point3::new(1.5, 0.5, 0.5)), odd);
        assert_eq!(tex.value(0.0, 0.0, Point3::new(1.5, 1.5, 0.5)), even);
        // Negative coordinates floor downwards
        assert_eq!(tex.value(0.0, 0.0, Point3::new(-0.5, 0.5, 0.5)), odd);
    }

    #[test]
    fn test_checker_scale() {
        let tex = CheckerTexture::from_colors(2.0, Color::ONE, Color::ZERO);
        assert_eq!(tex.value(0.0, 0.0, Point3::new(1.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(tex.value(0.0, 0.0, Point3::new(2.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_missing_image_is_cyan() {
        let tex = ImageTexture::missing();
        assert_eq!(tex.value(0.5, 0.5, Point3::ZERO), MISSING_IMAGE_COLOR);

        let tex = ImageTexture::load("does/not/exist.png");
        assert_eq!(tex.value(0.5, 0.5, Point3::ZERO), MISSING_IMAGE_COLOR);
    }

    #[test]
    fn test_image_lookup_flips_v_and_clamps() {
        // Top row red, green; bottom row blue, white
        let image = ImageData::new(
            2,
            2,
            vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        )
        .unwrap();
        let tex = ImageTexture::new(Arc::new(image));

        assert_eq!(tex.value(0.25, 0.75, Point3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.75, 0.75, Point3::ZERO), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.value(0.25, 0.25, Point3::ZERO), Color::new(0.0, 0.0, 1.0));
        // u = 1 and v = 0 land on the last column and bottom row
        assert_eq!(tex.value(1.0, 0.0, Point3::ZERO), Color::ONE);
        // Out of range coordinates are clamped
        assert_eq!(tex.value(-3.0, 7.0, Point3::ZERO), Color::new(1.0, 0.0, 0.0));
    }
}
