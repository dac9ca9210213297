//! Camera for ray generation.

use serde::{Deserialize, Serialize};

use crate::sampling::{gen_f64, random_in_unit_disk, sample_square};
use lux_math::{Point3, Ray, Vec3};
use rand::RngCore;

/// User-facing camera description, loadable from a settings file.
///
/// Vectors serialize as `[x, y, z]` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Ideal width over height; the actual image height is rounded down
    pub aspect_ratio: f64,
    pub image_width: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    pub lookfrom: Point3,
    pub lookat: Point3,
    pub vup: Vec3,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            vfov: 90.0,
            lookfrom: Point3::ZERO,
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    aspect_ratio: f64,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,
    defocus_angle: f64,
    focus_dist: f64,

    // Cached computed values (set by initialize())
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let defaults = CameraSettings::default();
        Self {
            image_width: defaults.image_width,
            image_height: 1,
            aspect_ratio: defaults.aspect_ratio,
            look_from: defaults.lookfrom,
            look_at: defaults.lookat,
            vup: defaults.vup,
            vfov: defaults.vfov,
            defocus_angle: defaults.defocus_angle,
            focus_dist: defaults.focus_dist,
            // Cached values (initialized to defaults)
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Build and initialize a camera from settings.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new()
            .with_image(settings.image_width, settings.aspect_ratio)
            .with_position(settings.lookfrom, settings.lookat, settings.vup)
            .with_lens(settings.vfov, settings.defocus_angle, settings.focus_dist);
        camera.initialize();
        camera
    }

    /// Set image width and aspect ratio; the height follows on initialize().
    pub fn with_image(mut self, width: u32, aspect_ratio: f64) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            let fallback = CameraSettings::default().aspect_ratio;
            log::warn!(
                "Invalid aspect ratio {}, using {:.4}",
                self.aspect_ratio,
                fallback
            );
            self.aspect_ratio = fallback;
        }
        self.image_width = self.image_width.max(1);
        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);
        self.center = self.look_from;

        // Viewport width follows the integer image size, not the ideal ratio
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Viewport edges; v runs down the image
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.defocus_radius();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Radius of the lens disk rays start from.
    pub fn defocus_radius(&self) -> f64 {
        self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan()
    }

    /// Generate a ray for pixel (i, j), jittered within the pixel footprint.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Camera basis (u right, v up, w backwards).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_image(800, 4.0 / 3.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center(), Point3::ZERO);
        assert_eq!(camera.image_height, 600);
        let (u, v, w) = camera.basis();
        assert!((u - Vec3::X).length() < 1e-12);
        assert!((v - Vec3::Y).length() < 1e-12);
        assert!((w - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_image_height_rounds_down_and_is_at_least_one() {
        let camera = Camera::from_settings(&CameraSettings {
            image_width: 400,
            aspect_ratio: 16.0 / 9.0,
            ..Default::default()
        });
        assert_eq!(camera.image_height, 225);

        let camera = Camera::from_settings(&CameraSettings {
            image_width: 401,
            aspect_ratio: 16.0 / 9.0,
            ..Default::default()
        });
        assert_eq!(camera.image_height, 225);

        let camera = Camera::from_settings(&CameraSettings {
            image_width: 10,
            aspect_ratio: 100.0,
            ..Default::default()
        });
        assert_eq!(camera.image_height, 1);
    }

    #[test]
    fn test_invalid_aspect_ratio_falls_back_to_default() {
        for aspect_ratio in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let camera = Camera::from_settings(&CameraSettings {
                image_width: 400,
                aspect_ratio,
                ..Default::default()
            });
            assert_eq!(camera.image_height, 225);
        }
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::from_settings(&CameraSettings {
            image_width: 101,
            aspect_ratio: 1.0,
            focus_dist: 1.0,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(42);

        // Center pixel looks straight down -Z, within half a pixel
        for _ in 0..20 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let dir = ray.direction();
            assert!((dir.z + 1.0).abs() < 1e-12);
            assert!(dir.x.abs() <= 1.0 / 101.0 + 1e-12);
            assert!(dir.y.abs() <= 1.0 / 101.0 + 1e-12);
            assert!((0.0..1.0).contains(&ray.time()));
        }

        // Top-left pixel points up and left
        let ray = camera.get_ray(0, 0, &mut rng);
        assert!(ray.direction().x < 0.0);
        assert!(ray.direction().y > 0.0);
    }

    #[test]
    fn test_defocus_disk_radius() {
        let settings = CameraSettings {
            defocus_angle: 10.0,
            focus_dist: 3.4,
            ..Default::default()
        };
        let camera = Camera::from_settings(&settings);
        let radius = 3.4 * 5f64.to_radians().tan();
        assert!((camera.defocus_radius() - radius).abs() < 1e-12);

        let mut rng = StdRng::seed_from_u64(5);
        let mut moved = false;
        for _ in 0..200 {
            let ray = camera.get_ray(10, 10, &mut rng);
            let offset = ray.origin() - camera.center();
            assert!(offset.length() < radius + 1e-12);
            // The lens disk lies in the u-v plane
            assert!(offset.z.abs() < 1e-12);
            moved |= offset.length() > 0.0;
        }
        assert!(moved);
    }

    #[test]
    fn test_pinhole_rays_start_at_center() {
        let camera = Camera::from_settings(&CameraSettings {
            lookfrom: Point3::new(1.0, 2.0, 3.0),
            lookat: Point3::ZERO,
            ..Default::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(camera.get_ray(3, 4, &mut rng).origin(), Point3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: CameraSettings =
            serde_json::from_str(r#"{ "image_width": 64, "lookfrom": [0.0, 1.0, 2.0] }"#)
                .unwrap();
        assert_eq!(settings.image_width, 64);
        assert_eq!(settings.lookfrom, Point3::new(0.0, 1.0, 2.0));
        assert_eq!(settings.vfov, CameraSettings::default().vfov);
        assert_eq!(settings.vup, Vec3::Y);
    }
}
