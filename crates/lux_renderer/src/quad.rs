//! Planar primitives spanned by a corner and two edge vectors.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material,
};
use lux_math::{Aabb, Interval, Point3, Ray, Vec3};

/// Which part of the plane spanned by (Q, u, v) counts as the surface.
///
/// `alpha` and `beta` are the hit point's coordinates in the (u, v) basis
/// relative to Q.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadShape {
    /// Q + a*u + b*v for a, b in [0, 1]
    #[default]
    Parallelogram,
    /// The half of the parallelogram containing Q
    Triangle,
    /// Ellipse centered on Q with semi-axes u and v
    Disk,
}

impl QuadShape {
    /// Interior test; returns the texture coordinates of an interior point.
    fn interior(self, alpha: f64, beta: f64) -> Option<(f64, f64)> {
        match self {
            QuadShape::Parallelogram => {
                if Interval::UNIT.contains(alpha) && Interval::UNIT.contains(beta) {
                    Some((alpha, beta))
                } else {
                    None
                }
            }
            QuadShape::Triangle => {
                if alpha > 0.0 && beta > 0.0 && alpha + beta < 1.0 {
                    Some((alpha, beta))
                } else {
                    None
                }
            }
            QuadShape::Disk => {
                if alpha * alpha + beta * beta < 1.0 {
                    Some((alpha / 2.0 + 0.5, beta / 2.0 + 0.5))
                } else {
                    None
                }
            }
        }
    }

    fn bounding_box(self, q: Point3, u: Vec3, v: Vec3) -> Aabb {
        match self {
            QuadShape::Parallelogram | QuadShape::Triangle => {
                let diagonal1 = Aabb::from_points(q, q + u + v);
                let diagonal2 = Aabb::from_points(q + u, q + v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
            QuadShape::Disk => {
                let diagonal1 = Aabb::from_points(q - u - v, q + u + v);
                let diagonal2 = Aabb::from_points(q + u - v, q - u + v);
                Aabb::surrounding(&diagonal1, &diagonal2)
            }
        }
    }
}

/// A planar patch; a parallelogram unless built with another [`QuadShape`].
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    shape: QuadShape,
    material: Arc<dyn Material>,
    bbox: Aabb,
    /// Unit plane normal, cross(u, v) normalized
    normal: Vec3,
    /// Plane offset: dot(normal, p) = d for points on the plane
    d: f64,
    /// cross(u, v) / |cross(u, v)|^2, for planar coordinates
    w: Vec3,
}

impl Quad {
    /// Create a parallelogram with corner `q` and edges `u` and `v`.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::with_shape(q, u, v, QuadShape::Parallelogram, material)
    }

    pub fn with_shape(
        q: Point3,
        u: Vec3,
        v: Vec3,
        shape: QuadShape,
        material: Arc<dyn Material>,
    ) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        Self {
            q,
            u,
            v,
            shape,
            material,
            bbox: shape.bounding_box(q, u, v),
            normal,
            d,
            w,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let Some((u, v)) = self.shape.interior(alpha, beta) else {
            return false;
        };

        rec.t = t;
        rec.p = intersection;
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six outward-facing quads of the axis-aligned box with opposite
/// corners `a` and `b`.
pub fn quad_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    )));
    // right
    sides.add(Box::new(Quad::new(
        Point3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    )));
    // back
    sides.add(Box::new(Quad::new(
        Point3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    )));
    // left
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    )));
    // top
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    )));
    // bottom
    sides.add(Box::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    )));

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use lux_math::Color;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unit_quad(shape: QuadShape) -> Quad {
        Quad::with_shape(
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            shape,
            gray(),
        )
    }

    fn shoot(quad: &Quad, x: f64, y: f64) -> Option<HitRecord<'_>> {
        let ray = Ray::new_simple(Point3::new(x, y, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec)
            .then_some(rec)
    }

    #[test]
    fn test_parallelogram_hit() {
        let quad = unit_quad(QuadShape::Parallelogram);
        let rec = shoot(&quad, 0.25, 0.75).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!((rec.u - 0.25).abs() < 1e-12);
        assert!((rec.v - 0.75).abs() < 1e-12);
        assert!(rec.front_face);

        assert!(shoot(&quad, 1.25, 0.5).is_none());
        assert!(shoot(&quad, 0.5, -0.25).is_none());
    }

    #[test]
    fn test_quad_is_two_sided() {
        let quad = unit_quad(QuadShape::Parallelogram);
        let ray = Ray::new_simple(Point3::new(0.5, 0.5, -2.0), Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let quad = unit_quad(QuadShape::Parallelogram);
        let ray = Ray::new_simple(Point3::new(-1.0, 0.5, -1.0), Vec3::new(1.0, 0.0, 0.0));
        let mut rec = HitRecord::default();

        assert!(!quad.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_triangle_shape() {
        let quad = unit_quad(QuadShape::Triangle);
        assert!(shoot(&quad, 0.25, 0.25).is_some());
        assert!(shoot(&quad, 0.75, 0.75).is_none());
    }

    #[test]
    fn test_disk_shape() {
        let quad = unit_quad(QuadShape::Disk);

        // Centered on Q, so negative planar coordinates are inside
        let rec = shoot(&quad, -0.5, 0.0).unwrap();
        assert!((rec.u - 0.25).abs() < 1e-12);
        assert!((rec.v - 0.5).abs() < 1e-12);

        assert!(shoot(&quad, 0.8, 0.8).is_none());

        let bbox = quad.bounding_box();
        assert_eq!(bbox.x.min, -1.0);
        assert_eq!(bbox.x.max, 1.0);
    }

    #[test]
    fn test_flat_box_is_padded() {
        let bbox = unit_quad(QuadShape::Parallelogram).bounding_box();
        assert!((bbox.z.size() - 0.0001).abs() < 1e-12);
        assert_eq!(bbox.x.min, 0.0);
        assert_eq!(bbox.y.max, 1.0);
    }

    #[test]
    fn test_quad_box_encloses_corners() {
        let sides = quad_box(Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.0, 0.0), gray());
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert!(bbox.x.min <= -1.0 && bbox.x.max >= 1.0);
        assert!(bbox.y.min <= 0.0 && bbox.y.max >= 2.0);
        assert!(bbox.z.min <= 0.0 && bbox.z.max >= 3.0);

        // Every face normal points out of the box
        let ray = Ray::new_simple(Point3::new(0.0, 1.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(sides.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.p.z - 3.0).abs() < 1e-12);
        assert!(rec.front_face);
    }
}
