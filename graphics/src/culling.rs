//! Coarse CPU frustum culling of static meshes.

use glam::{Mat4, Vec3};
use plain_core::bounds::AxisAlignedBoundingBox;
use plain_core::frustum::ViewFrustum;

use crate::types::MeshHandle;

/// Distance the shadow frustum's near plane is pulled towards the sun, so
/// occluders outside the camera view still cast into it.
pub const SHADOW_NEAR_PLANE_EXTENSION: f32 = 10_000.0;

/// A registered static mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticMesh {
    pub backend_handle: MeshHandle,
    pub model_matrix: Mat4,
    /// Object space box transformed once at registration.
    pub bounding_box_world_space: AxisAlignedBoundingBox,
}

impl StaticMesh {
    pub fn new(
        backend_handle: MeshHandle,
        model_matrix: Mat4,
        bounding_box_object_space: &AxisAlignedBoundingBox,
    ) -> Self {
        Self {
            backend_handle,
            model_matrix,
            bounding_box_world_space: bounding_box_object_space.transformed(&model_matrix),
        }
    }
}

/// Indices of `meshes` whose world box may intersect `frustum`, in order.
pub fn visible_indices(meshes: &[StaticMesh], frustum: &ViewFrustum) -> Vec<usize> {
    meshes
        .iter()
        .enumerate()
        .filter(|(_, mesh)| frustum.intersects_aabb(&mesh.bounding_box_world_space))
        .map(|(i, _)| i)
        .collect()
}

/// Backend handles of the meshes that may be visible in `frustum`.
///
/// Conservative: a mesh is only dropped when all eight box corners are
/// outside a single plane.
pub fn cull(meshes: &[StaticMesh], frustum: &ViewFrustum) -> Vec<MeshHandle> {
    meshes
        .iter()
        .filter(|mesh| frustum.intersects_aabb(&mesh.bounding_box_world_space))
        .map(|mesh| mesh.backend_handle)
        .collect()
}

/// Shadow frustum with its near corners extruded towards the sun.
///
/// Returns a local copy; the caller's frustum is not modified.
pub fn shadow_cull_frustum(shadow_frustum: &ViewFrustum, sun_direction: Vec3) -> ViewFrustum {
    shadow_frustum.with_near_plane_offset(sun_direction * SHADOW_NEAR_PLANE_EXTENSION)
}
