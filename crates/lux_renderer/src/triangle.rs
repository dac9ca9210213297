//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection. The
//! test is one-sided: rays approaching the back face (against the winding
//! order) pass through.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lux_math::{Aabb, Interval, Point3, Ray, Vec3};

/// Result of a successful ray-triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f64,
    /// Barycentric weight of the second vertex
    pub u: f64,
    /// Barycentric weight of the third vertex
    pub v: f64,
    /// Unit geometric normal, following the winding order
    pub normal: Vec3,
}

/// Möller-Trumbore intersection of a ray with triangle (v0, v1, v2).
///
/// Shared by [`Triangle`] and the mesh BVH leaves.
pub fn intersect_triangle(
    v0: Point3,
    v1: Point3,
    v2: Point3,
    ray: &Ray,
    ray_t: Interval,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction().cross(edge2);
    let det = edge1.dot(h);

    // Back facing, parallel or degenerate
    if det <= f64::EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin() - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction().dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.contains(t) {
        return None;
    }

    Some(TriangleHit {
        t,
        u,
        v,
        normal: edge1.cross(edge2).normalize(),
    })
}

/// Bounding box of three points, padded where flat.
pub(crate) fn triangle_box(v0: Point3, v1: Point3, v2: Point3) -> Aabb {
    Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2))
}

/// A single triangle.
pub struct Triangle {
    v0: Point3,
    v1: Point3,
    v2: Point3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices (counter-clockwise front face).
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: Arc<dyn Material>) -> Self {
        Self {
            v0,
            v1,
            v2,
            material,
            bbox: triangle_box(v0, v1, v2),
        }
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(hit) = intersect_triangle(self.v0, self.v1, self.v2, ray, ray_t) else {
            return false;
        };

        rec.t = hit.t;
        rec.p = ray.at(hit.t);
        rec.set_face_normal(ray, hit.normal);
        rec.u = hit.u;
        rec.v = hit.v;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
