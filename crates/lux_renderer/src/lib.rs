//! lux Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer built around a two-level bounding volume
//! hierarchy: a scene BVH over heterogeneous primitives, and a per-mesh BVH
//! over triangle faces so each polygon mesh enters the scene as one object.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod mesh;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraSettings};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, reflectance, refract, Dielectric, Lambertian, Material, Metal, ScatterResult,
};
pub use mesh::{MeshBvhNode, PolygonMesh};
pub use quad::{quad_box, Quad, QuadShape};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, Background, ImageBuffer,
    RenderConfig,
};
pub use sampling::{gen_f64, pixel_seed, random_in_unit_disk, random_unit_vector, sample_square};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};
pub use triangle::{intersect_triangle, Triangle, TriangleHit};

/// Re-export math types from lux_math
pub use lux_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
