//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - Per-pixel seeded randomness, so output does not depend on threading

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::sampling::pixel_seed;
use crate::{Camera, HitRecord, Hittable};
use lux_math::{Color, Interval, Ray};

/// Parameter range for scene queries; the lower bound skips self-hits.
const SCENE_INTERVAL: Interval = Interval::new(1e-4, f64::INFINITY);

/// Radiance returned by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Vertical gradient from white (down) to light blue (up)
    #[default]
    Sky,
    Solid(Color),
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance for rays that hit nothing
    pub background: Background,
    /// Seed mixed into every pixel's generator
    pub seed: u64,
    /// Edge length of the square tiles rendered in parallel
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 10,
            max_depth: 10,
            background: Background::Sky,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Each bounce multiplies in the material's attenuation; absorbed rays and
/// rays that run out of depth contribute black.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, SCENE_INTERVAL, &mut rec) {
        return background.color(ray);
    }

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, background, rng)
        }
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f64| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// The pixel's generator is seeded from the config seed and the pixel index,
/// so the result is the same whichever thread computes it.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let pixel_index = y as u64 * camera.image_width as u64 + x as u64;
    let mut rng = StdRng::seed_from_u64(pixel_seed(config.seed, pixel_index));

    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, &mut rng);
        pixel_color += ray_color(&ray, world, config.max_depth, &config.background, &mut rng);
    }

    // Average the samples
    pixel_color * (1.0 / samples as f64)
}

/// Linear radiance for every pixel of a rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, chunk) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = self.index(bucket.x, bucket.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Gamma-corrected 8-bit RGB, ready for output.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb8(*c)).collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets are traced in parallel with rayon and then copied into the
/// image; the scene is only read.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let width = camera.image_width;
    let height = camera.image_height;
    let buckets = generate_buckets(width, height, config.bucket_size.max(1));

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} buckets",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .into_par_iter()
        .map(|bucket| render_bucket(&bucket, camera, world, config))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render time: {:.3}s", start.elapsed().as_secs_f64());
    image
}
