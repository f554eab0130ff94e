//! # Geometry
//!
//! Mesh data handed to the rendering engine. The viewer never rasterizes
//! anything itself; it only builds vertex/index buffers for loaded models and
//! for the fallback placeholder.
//!
//! ```rust
//! use arview::gfx::geometry::generate_cube;
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

/// Triangle mesh ready to be handed to the rendering engine
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Builds geometry from flat position/index arrays as produced by model
    /// parsers. Normals are derived from the faces when the source has none
    /// or their count does not match the positions.
    pub fn from_flat(positions: &[f32], normals: &[f32], indices: Vec<u32>) -> Self {
        let normals = if !normals.is_empty() && normals.len() == positions.len() {
            normals.to_vec()
        } else {
            calculate_face_normals(positions, &indices)
        };

        Self {
            vertices: positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect(),
            normals: normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect(),
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages face normals onto their vertices. Indices pointing past the
/// position array are skipped.
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut normals = vec![0.0; vertex_count * 3];
    let vertex = |i: usize| [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0.max(i1).max(i2) >= vertex_count {
            continue;
        }

        let (v0, v1, v2) = (vertex(i0), vertex(i1), vertex(i2));
        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for &vertex_idx in &[i0, i1, i2] {
            for axis in 0..3 {
                normals[vertex_idx * 3 + axis] += face_normal[axis];
            }
        }
    }

    for normal in normals.chunks_exact_mut(3) {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            normal.iter_mut().for_each(|c| *c /= length);
        }
    }

    normals
}
