//! # Primitive Shapes
//!
//! Procedural shapes used when no model file is available.

use super::GeometryData;

/// Generate a unit cube centered at the origin
///
/// Vertices span -0.5 to 0.5 on all axes. Each face carries its own four
/// vertices so the normals stay flat across the face.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_is_flat_shaded() {
        let cube = generate_cube();
        assert_eq!(cube.normals.len(), cube.vertices.len());
        for face in cube.normals.chunks(4) {
            assert!(face.iter().all(|n| *n == face[0]));
        }
    }

    #[test]
    fn test_cube_is_deterministic() {
        assert_eq!(generate_cube(), generate_cube());
    }

    #[test]
    fn test_face_normals_for_missing_normals() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let geometry = GeometryData::from_flat(&positions, &[], vec![0, 1, 2]);
        assert_eq!(geometry.normals, vec![[0.0, 0.0, 1.0]; 3]);
    }
}
