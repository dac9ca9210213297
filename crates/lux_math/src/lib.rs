//! Geometric primitives shared by the lux crates.
//!
//! All math is double precision: `Vec3` is glam's `DVec3` and is used
//! interchangeably as a point, a direction or a linear RGB color.

pub use glam::{dvec3, DVec3};

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Three doubles used as point, direction or color.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB radiance or reflectance.
pub type Color = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }
}
