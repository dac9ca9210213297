//! Built-in example scenes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use lux_core::{load_obj, Mesh, MeshPlacement};
use lux_math::{Color, Point3, Vec3};
use lux_renderer::{
    quad_box, Background, CameraSettings, CheckerTexture, Dielectric, Hittable, ImageTexture,
    Lambertian, Material, Metal, PolygonMesh, Quad, QuadShape, RenderConfig, Sphere, Triangle,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SKY_BLUE: Color = Color::new(0.70, 0.80, 1.00);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Glass, metal and diffuse spheres on a checkered ground, some in motion
    Spheres,
    /// Three triangles with different materials
    Triangles,
    /// Five colored quads around the camera target, plus a disk and a triangle
    Quads,
    /// An open box with two blocks inside
    Cornell,
    /// A field of boxes with a textured sphere
    Boxes,
    /// An OBJ mesh on a ground sphere
    Mesh,
}

/// Inputs a scene may read from disk.
#[derive(Debug, Clone, Default)]
pub struct SceneAssets {
    pub mesh: Option<PathBuf>,
    pub mesh_placement: MeshPlacement,
    pub texture: Option<PathBuf>,
}

/// Geometry counts reported before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub objects: usize,
    pub vertices: usize,
    pub faces: usize,
}

/// A scene ready for the BVH: its objects plus suggested camera and render settings.
pub struct Scene {
    pub objects: Vec<Box<dyn Hittable>>,
    pub camera: CameraSettings,
    pub render: RenderConfig,
    pub stats: SceneStats,
}

impl Scene {
    fn new(camera: CameraSettings, background: Background) -> Self {
        Self {
            objects: Vec::new(),
            camera,
            render: RenderConfig {
                background,
                ..Default::default()
            },
            stats: SceneStats::default(),
        }
    }

    fn add(&mut self, object: impl Hittable + 'static) {
        self.objects.push(Box::new(object));
        self.stats.objects += 1;
    }

    fn add_mesh(&mut self, mesh: PolygonMesh) {
        self.stats.vertices += mesh.vertex_count();
        self.stats.faces += mesh.face_count();
        self.add(mesh);
    }
}

pub fn build_scene(kind: SceneKind, assets: &SceneAssets) -> Scene {
    match kind {
        SceneKind::Spheres => spheres(),
        SceneKind::Triangles => triangles(),
        SceneKind::Quads => quads(),
        SceneKind::Cornell => cornell(),
        SceneKind::Boxes => boxes(assets),
        SceneKind::Mesh => mesh(assets),
    }
}

fn spheres() -> Scene {
    let mut scene = Scene::new(
        CameraSettings {
            aspect_ratio: 16.0 / 9.0,
            vfov: 20.0,
            lookfrom: Point3::new(13.0, 2.0, 3.0),
            lookat: Point3::ZERO,
            defocus_angle: 0.6,
            focus_dist: 10.0,
            ..Default::default()
        },
        Background::Sky,
    );

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    scene.add(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    ));

    // Fixed seed so the layout is the same on every run
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for a in -5..5 {
        for b in -5..5 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            if choose_mat < 0.8 {
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                let bounce = Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                scene.add(Sphere::moving(
                    center,
                    center + bounce,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                ));
            } else if choose_mat < 0.95 {
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                scene.add(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                scene.add(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    scene.add(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    scene.add(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        0.9,
        Arc::new(Dielectric::new(1.0 / 1.5)),
    ));
    scene.add(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    scene.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    scene
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

fn triangles() -> Scene {
    let mut scene = Scene::new(
        CameraSettings {
            lookfrom: Point3::new(0.0, 0.0, 2.0),
            lookat: Point3::ZERO,
            focus_dist: 1.0,
            ..Default::default()
        },
        Background::Solid(SKY_BLUE),
    );

    scene.add(Triangle::new(
        Point3::new(-0.5, 0.1, 1.0),
        Point3::new(0.5, 0.1, 1.0),
        Point3::new(0.0, 0.85, 1.0),
        Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
    ));
    scene.add(Triangle::new(
        Point3::new(-1.5, 0.1, 1.1),
        Point3::new(-0.5, 0.1, 1.0),
        Point3::new(-1.0, 0.85, 1.0),
        Arc::new(Metal::new(Color::new(0.3, 0.6, 0.8), 1.0)),
    ));
    scene.add(Triangle::new(
        Point3::new(0.5, 0.1, 1.0),
        Point3::new(1.5, 0.1, 1.1),
        Point3::new(1.0, 0.85, 1.0),
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.1)),
    ));

    scene
}

fn quads() -> Scene {
    let mut scene = Scene::new(
        CameraSettings {
            aspect_ratio: 1.0,
            vfov: 80.0,
            lookfrom: Point3::new(0.0, 0.0, 9.0),
            lookat: Point3::ZERO,
            ..Default::default()
        },
        Background::Solid(SKY_BLUE),
    );

    let left_red = Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green = Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue = Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange = Arc::new(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal = Arc::new(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    scene.add(Quad::new(
        Point3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    ));
    scene.add(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    ));
    scene.add(Quad::new(
        Point3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    ));
    scene.add(Quad::new(
        Point3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    ));
    scene.add(Quad::new(
        Point3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    ));

    let gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.05));
    scene.add(Quad::with_shape(
        Point3::new(-0.8, 0.0, 1.0),
        Vec3::new(0.6, 0.0, 0.0),
        Vec3::new(0.0, 0.6, 0.0),
        QuadShape::Disk,
        gold.clone(),
    ));
    scene.add(Quad::with_shape(
        Point3::new(0.4, -0.6, 1.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.2, 0.0),
        QuadShape::Triangle,
        gold,
    ));

    scene
}

/// Walls of the box, open towards +z where the camera sits.
fn cornell_walls(scene: &mut Scene) {
    let red = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let green = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));

    // left
    scene.add(Quad::new(
        Point3::new(-2.0, -2.0, 2.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        red,
    ));
    // right
    scene.add(Quad::new(
        Point3::new(2.0, -2.0, 2.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        green,
    ));
    // floor
    scene.add(Quad::new(
        Point3::new(-2.0, -2.0, 2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        white.clone(),
    ));
    // ceiling
    scene.add(Quad::new(
        Point3::new(-2.0, 2.0, 2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        white.clone(),
    ));
    // back
    scene.add(Quad::new(
        Point3::new(-2.0, -2.0, -2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        white,
    ));
}

fn cornell_camera() -> CameraSettings {
    CameraSettings {
        aspect_ratio: 1.0,
        vfov: 70.0,
        lookfrom: Point3::new(0.0, 0.0, 5.0),
        lookat: Point3::ZERO,
        focus_dist: 5.0,
        ..Default::default()
    }
}

fn cornell() -> Scene {
    // No emitters: light enters through the open front
    let mut scene = Scene::new(cornell_camera(), Background::Solid(Color::ONE));
    cornell_walls(&mut scene);

    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    scene.add(quad_box(
        Point3::new(-0.9, 0.7, -2.0),
        Point3::new(0.0, -2.0, -1.0),
        white.clone(),
    ));
    scene.add(quad_box(
        Point3::new(-0.1, -2.0, 0.0),
        Point3::new(0.9, -1.0, 1.0),
        white,
    ));

    scene
}

fn boxes(assets: &SceneAssets) -> Scene {
    let mut scene = Scene::new(
        CameraSettings {
            aspect_ratio: 1.0,
            vfov: 40.0,
            lookfrom: Point3::new(8.0, 6.0, 10.0),
            lookat: Point3::new(0.0, 1.0, 0.0),
            ..Default::default()
        },
        Background::Sky,
    );

    let ground = Arc::new(Lambertian::new(Color::new(0.48, 0.83, 0.53)));
    let mut rng = StdRng::seed_from_u64(0xB0C5);
    let boxes_per_side = 10;
    let w = 1.0;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let x0 = -5.0 + i as f64 * w;
            let z0 = -5.0 + j as f64 * w;
            let y1 = rng.gen_range(0.05..0.6);
            scene.add(quad_box(
                Point3::new(x0, -0.5, z0),
                Point3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }

    let texture = match &assets.texture {
        Some(path) => ImageTexture::load(path),
        None => ImageTexture::missing(),
    };
    scene.add(Sphere::new(
        Point3::new(0.0, 2.0, 0.0),
        1.2,
        Arc::new(Lambertian::with_texture(Arc::new(texture))),
    ));
    scene.add(Sphere::new(
        Point3::new(2.5, 1.5, -1.5),
        0.8,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 0.2)),
    ));
    scene.add(Sphere::new(
        Point3::new(-2.5, 1.5, 1.5),
        0.8,
        Arc::new(Dielectric::new(1.5)),
    ));

    scene
}

fn mesh(assets: &SceneAssets) -> Scene {
    let mut scene = Scene::new(
        CameraSettings {
            vfov: 70.0,
            lookfrom: Point3::new(0.0, 4.0, 6.0),
            lookat: Point3::ZERO,
            ..Default::default()
        },
        Background::Solid(SKY_BLUE),
    );

    scene.add(Sphere::new(
        Point3::new(0.0, -100.5, -1.0),
        100.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    ));

    let mesh = match &assets.mesh {
        Some(path) => load_obj(path, assets.mesh_placement).unwrap_or_else(|err| {
            log::error!("Failed to load mesh {}: {}", path.display(), err);
            Mesh::empty()
        }),
        None => {
            log::error!("The mesh scene needs --mesh <PATH>");
            Mesh::empty()
        }
    };
    scene.add_mesh(PolygonMesh::new(
        mesh,
        Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
    ));

    scene
}
