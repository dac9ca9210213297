//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over the scene's top-level objects. Polygon meshes carry their
//! own face-level tree (see `mesh`) and enter this one as a single object.

use crate::{HitRecord, Hittable};
use lux_math::{Aabb, Interval, Ray};

/// BVH node - a branch with two children, a leaf holding one object, or empty.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<dyn Hittable>,
        right: Box<dyn Hittable>,
        bbox: Aabb,
    },
    /// A single object.
    Leaf { object: Box<dyn Hittable>, bbox: Aabb },
    /// No objects at all; never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        let count = objects.len();
        let node = Self::build(objects);
        log::debug!("Built BVH over {} objects", count);
        node
    }

    /// Recursive median split: stable sort by box minimum on the longest
    /// axis of the combined bounds, split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        match objects.len() {
            0 => BvhNode::Empty,
            1 => {
                let object = objects.remove(0);
                let bbox = object.bounding_box();
                BvhNode::Leaf { object, bbox }
            }
            2 => {
                let right = objects.remove(1);
                let left = objects.remove(0);
                let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
                BvhNode::Branch { left, right, bbox }
            }
            n => {
                let bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
                    Aabb::surrounding(&acc, &obj.bounding_box())
                });
                let axis = bounds.longest_axis();

                objects.sort_by(|a, b| {
                    let a_min = a.bounding_box().axis_interval(axis).min;
                    let b_min = b.bounding_box().axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = n / 2;
                let right_objects = objects.split_off(mid);

                let left: Box<dyn Hittable> = Box::new(Self::build(objects));
                let right: Box<dyn Hittable> = Box::new(Self::build(right_objects));
                let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

                BvhNode::Branch { left, right, bbox }
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }
                object.hit(ray, ray_t, rec)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::random_unit_vector;
    use crate::{HittableList, Lambertian, Material, Sphere, Triangle};
    use lux_math::{Color, Point3, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::Arc;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn interval() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    fn random_point(rng: &mut StdRng, extent: f64) -> Point3 {
        Point3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    /// Random spheres and triangles; the same seed yields the same scene.
    fn random_scene(seed: u64, count: usize) -> Vec<Box<dyn Hittable>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let material = gray();

        (0..count)
            .map(|i| -> Box<dyn Hittable> {
                let center = random_point(&mut rng, 10.0);
                if i % 2 == 0 {
                    Box::new(Sphere::new(center, rng.gen_range(0.1..1.5), material.clone()))
                } else {
                    Box::new(Triangle::new(
                        center + random_point(&mut rng, 1.5),
                        center + random_point(&mut rng, 1.5),
                        center + random_point(&mut rng, 1.5),
                        material.clone(),
                    ))
                }
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::UNIVERSE, &mut rec));
        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let bbox = sphere.bounding_box();
        let bvh = BvhNode::new(vec![Box::new(sphere)]);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));
        assert_eq!(bvh.bounding_box(), bbox);

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, interval(), &mut rec));
    }

    #[test]
    fn test_bvh_pair_is_a_branch() {
        let bvh = BvhNode::new(vec![
            Box::new(Sphere::new(Point3::new(-2.0, 0.0, -5.0), 0.5, gray())),
            Box::new(Sphere::new(Point3::new(2.0, 0.0, -5.0), 0.5, gray())),
        ]);
        assert!(matches!(bvh, BvhNode::Branch { .. }));

        let bbox = bvh.bounding_box();
        assert_eq!(bbox.x.min, -2.5);
        assert_eq!(bbox.x.max, 2.5);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Box<dyn Hittable>> = (0..10)
            .map(|i| {
                Box::new(Sphere::new(Point3::new(i as f64, 0.0, -5.0), 0.5, gray()))
                    as Box<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);

        // Ray that hits sphere at x=5
        let ray = Ray::new_simple(Point3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, interval(), &mut rec));

        // Sphere at z=-5, radius 0.5
        assert!((rec.p.z - (-4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_bvh_box_encloses_children() {
        let objects = random_scene(3, 40);
        let boxes: Vec<Aabb> = objects.iter().map(|o| o.bounding_box()).collect();
        let bvh = BvhNode::new(objects);
        let root = bvh.bounding_box();

        for b in boxes {
            for axis in 0..3 {
                assert!(root.axis_interval(axis).min <= b.axis_interval(axis).min);
                assert!(root.axis_interval(axis).max >= b.axis_interval(axis).max);
            }
        }
    }

    #[test]
    fn test_bvh_matches_linear_list() {
        for seed in 0..4 {
            let bvh = BvhNode::new(random_scene(seed, 60));
            let mut list = HittableList::new();
            for object in random_scene(seed, 60) {
                list.add(object);
            }

            let mut rng = StdRng::seed_from_u64(seed + 100);
            for _ in 0..500 {
                let origin = random_point(&mut rng, 15.0);
                let ray = Ray::new_simple(origin, random_unit_vector(&mut rng));

                let mut bvh_rec = HitRecord::default();
                let mut list_rec = HitRecord::default();
                let bvh_hit = bvh.hit(&ray, interval(), &mut bvh_rec);
                let list_hit = list.hit(&ray, interval(), &mut list_rec);

                assert_eq!(bvh_hit, list_hit);
                if bvh_hit {
                    assert!((bvh_rec.t - list_rec.t).abs() < 1e-9);
                    assert!((bvh_rec.p - list_rec.p).length() < 1e-9);
                }
            }
        }
    }
}
