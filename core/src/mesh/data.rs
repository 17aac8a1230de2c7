//! Mesh data containers and conversion to the binary upload format.

use std::path::PathBuf;

use glam::{Vec2, Vec3};

use crate::bounds::AxisAlignedBoundingBox;

/// Texture files referenced by a mesh's material.
///
/// An empty path means "no texture"; the renderer substitutes a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTexturePaths {
    pub albedo: PathBuf,
    pub normal: PathBuf,
    pub specular: PathBuf,
}

/// Mesh data as separate attribute streams.
///
/// All attribute streams are expected to have the same length as
/// `positions`. Missing streams are zero filled on conversion.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub texture_paths: MaterialTexturePaths,
}

/// Interleaved vertex used by the full vertex format.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FullVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

/// Mesh ready for upload: interleaved [`FullVertex`] bytes and `u32` indices.
#[derive(Debug, Clone, Default)]
pub struct MeshBinary {
    pub vertex_count: u32,
    pub index_count: u32,
    pub vertex_buffer: Vec<u8>,
    pub index_buffer: Vec<u8>,
    /// Object space bounds.
    pub bounding_box: AxisAlignedBoundingBox,
    pub texture_paths: MaterialTexturePaths,
}

/// Position-only line list used for debug geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// Interleave each mesh's attribute streams and compute its bounding box.
pub fn meshes_to_binary(meshes: &[MeshData]) -> Vec<MeshBinary> {
    meshes.iter().map(mesh_to_binary).collect()
}

fn mesh_to_binary(mesh: &MeshData) -> MeshBinary {
    let attribute = |stream: &[Vec3], i: usize| stream.get(i).copied().unwrap_or(Vec3::ZERO);

    let vertices: Vec<FullVertex> = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| FullVertex {
            position: position.to_array(),
            uv: mesh.uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
            normal: attribute(&mesh.normals, i).to_array(),
            tangent: attribute(&mesh.tangents, i).to_array(),
            bitangent: attribute(&mesh.bitangents, i).to_array(),
        })
        .collect();

    MeshBinary {
        vertex_count: vertices.len() as u32,
        index_count: mesh.indices.len() as u32,
        vertex_buffer: bytemuck::cast_slice(&vertices).to_vec(),
        index_buffer: bytemuck::cast_slice(&mesh.indices).to_vec(),
        bounding_box: AxisAlignedBoundingBox::from_points(mesh.positions.iter().copied())
            .unwrap_or_default(),
        texture_paths: mesh.texture_paths.clone(),
    }
}
