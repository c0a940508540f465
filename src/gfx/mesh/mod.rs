//! # Mesh Geometry
//!
//! Loaded mesh data and the text mesh loader.
//!
//! A [`Mesh`] is an immutable pair of buffers:
//!
//! - a flat vertex buffer (`x, y, z` per vertex, in file order)
//! - an index buffer where every triple names one triangle (0-based)
//!
//! Meshes produced by [`loader::load`] are normalized so that the longest
//! axis of the bounding box spans exactly `[-1, 1]` and the box is centred on
//! the origin.

pub mod loader;
pub mod vertex;

use cgmath::{InnerSpace, Vector3, Zero};

pub use loader::{load, load_file, normalize};
pub use vertex::Vertex3D;

/// Immutable triangle mesh: flattened positions plus triangle indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Creates a mesh from flattened positions and triangle indices.
    pub fn new(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        debug_assert_eq!(vertices.len() % 3, 0);
        debug_assert_eq!(indices.len() % 3, 0);
        Self { vertices, indices }
    }

    /// Flattened vertex positions.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Triangle indices into [`Mesh::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> [f32; 3] {
        [
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        ]
    }

    /// Axis-aligned bounding box of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(&self.vertices)
    }

    /// Builds GPU vertex records with smooth per-vertex normals.
    ///
    /// Each vertex normal is the normalized average of the face normals of the
    /// triangles that use it. Unreferenced vertices get a zero normal.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        let mut normals = vec![Vector3::<f32>::zero(); self.vertex_count()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let v0 = Vector3::from(self.position(i0));
            let v1 = Vector3::from(self.position(i1));
            let v2 = Vector3::from(self.position(i2));

            let face_normal = (v1 - v0).cross(v2 - v0);
            for idx in [i0, i1, i2] {
                normals[idx] += face_normal;
            }
        }

        normals
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let normal = if n.magnitude2() > 0.0 {
                    n.normalize()
                } else {
                    Vector3::zero()
                };
                Vertex3D {
                    position: self.position(i),
                    normal: normal.into(),
                }
            })
            .collect()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Bounds {
    /// Bounding box of flattened `x, y, z` positions.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut points = positions.chunks_exact(3);
        let first = points.next()?;
        let mut min = Vector3::new(first[0], first[1], first[2]);
        let mut max = min;

        for p in points {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }

        Some(Self { min, max })
    }

    /// Per-axis span.
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest per-axis span.
    pub fn max_extent(&self) -> f32 {
        let e = self.extent();
        e.x.max(e.y).max(e.z)
    }

    pub fn center(&self) -> Vector3<f32> {
        // Halve first so two large bounds cannot overflow
        self.min * 0.5 + self.max * 0.5
    }
}
