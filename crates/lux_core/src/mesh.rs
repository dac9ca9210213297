//! Polygon mesh data for the ray tracer.
//!
//! A [`Mesh`] is just a vertex buffer plus a list of triangles given as
//! 0-based vertex index triples. The renderer builds its per-mesh BVH from
//! this; nothing here knows about rays or materials.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lux_math::{Aabb, Point3, Vec3};
use thiserror::Error;

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No geometry found in {0}")]
    NoGeometry(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Placement applied to every vertex while loading: `p * scale + position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPlacement {
    pub position: Vec3,
    pub scale: Vec3,
}

impl MeshPlacement {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }

    #[inline]
    pub fn apply(&self, p: Point3) -> Point3 {
        p * self.scale + self.position
    }
}

impl Default for MeshPlacement {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// A triangle mesh: vertex positions and 0-based face index triples.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one point per vertex)
    pub positions: Vec<Point3>,

    /// Triangles as indices into `positions`
    pub faces: Vec<[usize; 3]>,

    /// Axis-aligned bounding box of all positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh, dropping any face that references a missing vertex.
    pub fn new(positions: Vec<Point3>, faces: Vec<[usize; 3]>) -> Self {
        let vertex_count = positions.len();
        let faces = faces
            .into_iter()
            .filter(|face| {
                let valid = face.iter().all(|&i| i < vertex_count);
                if !valid {
                    log::warn!(
                        "Invalid triangle indices: {:?}, vertex count: {}",
                        face,
                        vertex_count
                    );
                }
                valid
            })
            .collect();
        let bounds = Self::compute_bounds(&positions);

        Self {
            positions,
            faces,
            bounds,
        }
    }

    /// A mesh with no geometry. Used in place of a mesh that failed to load.
    pub fn empty() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
            bounds: Aabb::EMPTY,
        }
    }

    fn compute_bounds(positions: &[Point3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Point3::splat(f64::INFINITY);
        let mut max = Point3::splat(f64::NEG_INFINITY);
        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// The three corner positions of a face.
    pub fn triangle(&self, face: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[face];
        [self.positions[a], self.positions[b], self.positions[c]]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Parse OBJ data from a reader, triangulating polygons.
///
/// All objects in the file are merged into a single mesh. Material libraries
/// are ignored.
pub fn parse_obj<R: BufRead>(reader: &mut R, placement: MeshPlacement) -> MeshResult<Mesh> {
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let mut positions = Vec::new();
    let mut faces = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = positions.len();

        positions.extend(mesh.positions.chunks_exact(3).map(|p| {
            placement.apply(Point3::new(
                f64::from(p[0]),
                f64::from(p[1]),
                f64::from(p[2]),
            ))
        }));
        faces.extend(mesh.indices.chunks_exact(3).map(|f| {
            [
                base + f[0] as usize,
                base + f[1] as usize,
                base + f[2] as usize,
            ]
        }));
    }

    Ok(Mesh::new(positions, faces))
}

/// Load an OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>, placement: MeshPlacement) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mesh = parse_obj(&mut reader, placement)?;

    if mesh.is_empty() {
        return Err(MeshError::NoGeometry(path.display().to_string()));
    }

    log::debug!(
        "Loaded mesh: {} ({} vertices, {} faces)",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "\
# unit quad in the xy plane
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

    #[test]
    fn test_mesh_creation() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(positions.clone(), vec![[0, 1, 2]]);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.triangle(0), [positions[0], positions[1], positions[2]]);
    }

    #[test]
    fn test_invalid_faces_are_dropped() {
        let positions = vec![Point3::ZERO, Point3::X, Point3::Y];
        let mesh = Mesh::new(positions, vec![[0, 1, 2], [0, 1, 3]]);

        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Point3::new(-1.0, -2.0, -3.0),
            Point3::new(4.0, 5.0, 6.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![[0, 1, 2]]);

        assert_eq!(mesh.bounds.x.min, -1.0);
        assert_eq!(mesh.bounds.x.max, 4.0);
        assert_eq!(mesh.bounds.y.min, -2.0);
        assert_eq!(mesh.bounds.z.max, 6.0);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::empty();
        assert!(mesh.is_empty());
        assert_eq!(mesh.bounds, Aabb::EMPTY);
    }

    #[test]
    fn test_parse_obj_triangulates_and_uses_zero_based_indices() {
        let mesh = parse_obj(&mut Cursor::new(QUAD_OBJ), MeshPlacement::default()).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        for face in &mesh.faces {
            assert!(face.iter().all(|&i| i < 4));
        }
    }

    #[test]
    fn test_parse_obj_applies_placement() {
        let placement = MeshPlacement::new(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(2.0));
        let mesh = parse_obj(&mut Cursor::new(QUAD_OBJ), placement).unwrap();

        assert!(mesh.positions.contains(&Point3::new(2.0, 2.0, -5.0)));
        assert_eq!(mesh.bounds.x.max, 2.0);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = load_obj("does/not/exist.obj", MeshPlacement::default());
        assert!(matches!(result, Err(MeshError::Io(_))));
    }
}
