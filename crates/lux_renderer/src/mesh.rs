//! Polygon meshes with their own face-level BVH.
//!
//! The scene BVH holds each mesh as a single object. Inside, a second tree
//! over the faces stores only face indices; triangle data is read from the
//! mesh's shared vertex buffer at hit time.

use std::sync::Arc;

use crate::triangle::{intersect_triangle, triangle_box, TriangleHit};
use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lux_core::Mesh;
use lux_math::{Aabb, Interval, Ray};

/// Node of a BVH over the faces of one mesh.
#[derive(Debug, Clone)]
pub enum MeshBvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<MeshBvhNode>,
        right: Box<MeshBvhNode>,
        bbox: Aabb,
    },
    /// A single face, by index into the mesh's face list.
    Leaf { face: usize, bbox: Aabb },
}

impl MeshBvhNode {
    /// Build a tree over every face of `mesh`. Returns None for a mesh
    /// without faces.
    pub fn new(mesh: &Mesh) -> Option<Self> {
        let boxes: Vec<Aabb> = (0..mesh.face_count())
            .map(|face| {
                let [v0, v1, v2] = mesh.triangle(face);
                triangle_box(v0, v1, v2)
            })
            .collect();

        let faces: Vec<usize> = (0..boxes.len()).collect();
        if faces.is_empty() {
            return None;
        }
        Some(Self::build(faces, &boxes))
    }

    /// Median split over a non-empty set of faces, mirroring the scene BVH.
    fn build(mut faces: Vec<usize>, boxes: &[Aabb]) -> Self {
        match faces.len() {
            1 => MeshBvhNode::Leaf {
                face: faces[0],
                bbox: boxes[faces[0]],
            },
            2 => {
                let left = Self::leaf(faces[0], boxes);
                let right = Self::leaf(faces[1], boxes);
                let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
                MeshBvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
            n => {
                let bounds = faces
                    .iter()
                    .fold(Aabb::EMPTY, |acc, &f| Aabb::surrounding(&acc, &boxes[f]));
                let axis = bounds.longest_axis();

                faces.sort_by(|&a, &b| {
                    let a_min = boxes[a].axis_interval(axis).min;
                    let b_min = boxes[b].axis_interval(axis).min;
                    a_min.total_cmp(&b_min)
                });

                let mid = n / 2;
                let right_faces = faces.split_off(mid);

                let left = Self::build(faces, boxes);
                let right = Self::build(right_faces, boxes);
                let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

                MeshBvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
        }
    }

    fn leaf(face: usize, boxes: &[Aabb]) -> Self {
        MeshBvhNode::Leaf {
            face,
            bbox: boxes[face],
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            MeshBvhNode::Branch { bbox, .. } => *bbox,
            MeshBvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    /// Nearest face hit within `ray_t`.
    pub fn hit(&self, mesh: &Mesh, ray: &Ray, ray_t: Interval) -> Option<TriangleHit> {
        if !self.bounding_box().hit(ray, ray_t) {
            return None;
        }

        match self {
            MeshBvhNode::Leaf { face, .. } => {
                let [v0, v1, v2] = mesh.triangle(*face);
                intersect_triangle(v0, v1, v2, ray, ray_t)
            }
            MeshBvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(mesh, ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |hit| hit.t);
                let hit_right = right.hit(mesh, ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            MeshBvhNode::Leaf { .. } => 1,
            MeshBvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }
}

/// A triangle mesh entering the scene as a single hittable.
pub struct PolygonMesh {
    mesh: Mesh,
    material: Arc<dyn Material>,
    root: Option<MeshBvhNode>,
}

impl PolygonMesh {
    pub fn new(mesh: Mesh, material: Arc<dyn Material>) -> Self {
        let root = MeshBvhNode::new(&mesh);
        if let Some(root) = &root {
            log::debug!(
                "Built mesh BVH: {} faces, {} nodes",
                mesh.face_count(),
                root.node_count()
            );
        }

        Self {
            mesh,
            material,
            root,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

impl Hittable for PolygonMesh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        let Some(hit) = root.hit(&self.mesh, ray, ray_t) else {
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
        self.root
            .as_ref()
            .map_or(Aabb::EMPTY, MeshBvhNode::bounding_box)
    }
}
