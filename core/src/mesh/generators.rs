//! Mesh generators for common shapes.
//!
//! These generators produce [`MeshData`] values that can be converted with
//! [`meshes_to_binary`](super::meshes_to_binary) and uploaded by a backend.

use glam::{Vec2, Vec3};

use super::data::MeshData;

/// Generate the cube the sky is rasterized onto.
///
/// Eight shared corners spanning `[-1, 1]^3`, wound to be visible from the
/// inside. Only positions are meaningful; all other streams are zero.
pub fn generate_sky_cube() -> MeshData {
    let positions = vec![
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    let vertex_count = positions.len();

    MeshData {
        positions,
        uvs: vec![Vec2::ZERO; vertex_count],
        normals: vec![Vec3::ZERO; vertex_count],
        tangents: vec![Vec3::ZERO; vertex_count],
        bitangents: vec![Vec3::ZERO; vertex_count],
        indices: vec![
            0, 1, 3, 3, 1, 2, //
            1, 5, 2, 2, 5, 6, //
            5, 4, 6, 6, 4, 7, //
            4, 0, 7, 7, 0, 3, //
            3, 2, 7, 7, 2, 6, //
            4, 5, 0, 0, 5, 1,
        ],
        ..Default::default()
    }
}

/// Generate an axis aligned box centered at the origin.
///
/// Each face has its own four vertices so normals, tangents and UVs are flat
/// per face. The mesh has 24 vertices and 36 indices.
///
/// # Arguments
///
/// * `half_extents` - Half the size of the box along each axis
pub fn generate_box(half_extents: Vec3) -> MeshData {
    // (normal, tangent) per face; bitangent = normal x tangent.
    let faces = [
        (Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_X, Vec3::Z),
        (Vec3::Y, Vec3::X),
        (Vec3::NEG_Y, Vec3::X),
        (Vec3::Z, Vec3::X),
        (Vec3::NEG_Z, Vec3::NEG_X),
    ];
    let corners = [
        (Vec2::new(-1.0, -1.0), Vec2::new(0.0, 1.0)),
        (Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)),
        (Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
        (Vec2::new(-1.0, 1.0), Vec2::new(0.0, 0.0)),
    ];

    let mut mesh = MeshData::default();
    for (normal, tangent) in faces {
        let bitangent = normal.cross(tangent);
        let base = mesh.positions.len() as u32;

        for (offset, uv) in corners {
            let local = normal + tangent * offset.x + bitangent * offset.y;
            mesh.positions.push(local * half_extents);
            mesh.uvs.push(uv);
            mesh.normals.push(normal);
            mesh.tangents.push(tangent);
            mesh.bitangents.push(bitangent);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::meshes_to_binary;

    #[test]
    fn test_generate_sky_cube() {
        let cube = generate_sky_cube();
        assert_eq!(cube.positions.len(), 8);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn test_generate_box() {
        let mesh = generate_box(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.normals.len(), 24);
    }

    #[test]
    fn test_box_bounds_match_half_extents() {
        let half = Vec3::new(1.0, 2.0, 3.0);
        let binary = &meshes_to_binary(&[generate_box(half)])[0];
        assert_eq!(binary.bounding_box.min, -half);
        assert_eq!(binary.bounding_box.max, half);
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let mesh = generate_box(Vec3::ONE);
        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[triangle[k] as usize]);
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.dot(mesh.normals[triangle[0] as usize]) > 0.0);
        }
    }
}
