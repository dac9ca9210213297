//! lux Core - asset loading and image output.
//!
//! This crate holds everything the ray tracer needs from the outside world,
//! kept apart from the intersection engine in `lux_renderer`:
//!
//! - **Meshes**: OBJ parsing into a vertex buffer and 0-based face list
//! - **Textures**: image decoding into an 8-bit RGB pixel buffer
//! - **Output**: plain-text PPM writing
//!
//! # Example
//!
//! ```ignore
//! use lux_core::mesh::{load_obj, MeshPlacement};
//!
//! let mesh = load_obj("teapot.obj", MeshPlacement::default())?;
//! println!("{} vertices, {} faces", mesh.vertex_count(), mesh.face_count());
//! ```

pub mod mesh;
pub mod ppm;
pub mod texture;

// Re-export commonly used types
pub use mesh::{load_obj, parse_obj, Mesh, MeshError, MeshPlacement};
pub use ppm::{save_ppm, write_ppm, OutputError};
pub use texture::{load_image, ImageData, TextureError};
