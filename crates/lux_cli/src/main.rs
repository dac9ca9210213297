//! lux - render an example scene to a PPM image.

mod scenes;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lux_core::{save_ppm, MeshPlacement};
use lux_math::Vec3;
use lux_renderer::{render, BvhNode, Camera, CameraSettings, RenderConfig};

use scenes::{build_scene, SceneAssets, SceneKind};
use settings::Settings;

/// Monte Carlo ray tracer
#[derive(Parser, Debug)]
#[command(name = "lux", version, about)]
struct Args {
    /// Scene to render
    #[arg(short, long, value_enum, default_value = "spheres")]
    scene: SceneKind,

    /// Output PPM file
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// JSON settings file with camera and render options
    #[arg(long)]
    settings: Option<PathBuf>,

    /// OBJ file for the mesh scene
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Uniform scale applied to the mesh vertices
    #[arg(long, default_value_t = 1.0)]
    mesh_scale: f64,

    /// Image for the textured sphere in the boxes scene
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Image width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long)]
    depth: Option<u32>,

    /// Seed for the per-pixel generators
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Camera and render settings: scene defaults, then the settings file,
    /// then command line flags.
    fn resolve(
        &self,
        mut camera: CameraSettings,
        mut render: RenderConfig,
        file: Settings,
    ) -> (CameraSettings, RenderConfig) {
        if let Some(file_camera) = file.camera {
            camera = file_camera;
        }
        let overrides = file.render;
        if let Some(spp) = overrides.samples_per_pixel {
            render.samples_per_pixel = spp;
        }
        if let Some(depth) = overrides.max_depth {
            render.max_depth = depth;
        }
        if let Some(background) = overrides.background {
            render.background = background;
        }
        if let Some(seed) = overrides.seed {
            render.seed = seed;
        }
        if let Some(bucket_size) = overrides.bucket_size {
            render.bucket_size = bucket_size;
        }

        if let Some(width) = self.width {
            camera.image_width = width;
        }
        if let Some(spp) = self.samples {
            render.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            render.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            render.seed = seed;
        }

        (camera, render)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting lux ({:?} scene)", args.scene);

    let file_settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let assets = SceneAssets {
        mesh: args.mesh.clone(),
        mesh_placement: MeshPlacement::new(Vec3::ZERO, Vec3::splat(args.mesh_scale)),
        texture: args.texture.clone(),
    };
    let scene = build_scene(args.scene, &assets);
    let (camera_settings, config) = args.resolve(scene.camera, scene.render, file_settings);

    log::info!(
        "Scene: {} objects, {} vertices, {} faces",
        scene.stats.objects,
        scene.stats.vertices,
        scene.stats.faces
    );

    let world = BvhNode::new(scene.objects);
    let camera = Camera::from_settings(&camera_settings);

    let image = render(&camera, &world, &config);

    save_ppm(&args.output, image.width, image.height, &image.to_rgb8())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}
