//! GPU backend abstraction layer.
//!
//! The orchestration code never talks to a GPU API directly. Everything it
//! needs from the device goes through the [`RenderBackend`] trait: creating
//! resources and passes, receiving the per-frame graph, and executing it.
//!
//! # Available Backends
//!
//! - `dummy` (default): records every call without touching a GPU, used by
//!   tests, benchmarks and the headless demo
//!
//! A backend must execute submitted passes in an order consistent with their
//! parent edges but is free to reorder or overlap independent passes.

#[cfg(feature = "dummy")]
pub mod dummy;

use plain_core::mesh::{LineMesh, MeshBinary};

use crate::error::GraphicsError;
use crate::graph::{
    ComputePassDescription, GraphicPassDescription, PassHandle, RenderPassExecution,
};
use crate::shader::{GraphicPassShaderDescriptions, ShaderDescription};
use crate::types::{
    DynamicMeshHandle, ImageDescription, ImageHandle, MemoryStats, MeshHandle, RenderPassTime,
    SamplerDescription, SamplerHandle, StorageBufferDescription, StorageBufferHandle,
    UniformBufferDescription, UniformBufferHandle,
};
use crate::uniforms::{DrawTransform, GlobalShaderInfo};

/// Material textures of one static mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshMaterial {
    pub albedo: ImageHandle,
    pub normal: ImageHandle,
    pub specular: ImageHandle,
}

/// Execution service for the frame graph.
///
/// Setup-time creation calls are fallible; per-frame calls are
/// fire-and-forget except [`render_frame`](Self::render_frame), which reports
/// a malformed graph.
pub trait RenderBackend: Send + Sync {
    /// Human readable backend name.
    fn name(&self) -> &'static str;

    fn create_image(&self, desc: &ImageDescription) -> Result<ImageHandle, GraphicsError>;

    fn create_sampler(&self, desc: &SamplerDescription) -> Result<SamplerHandle, GraphicsError>;

    fn create_storage_buffer(
        &self,
        desc: &StorageBufferDescription,
    ) -> Result<StorageBufferHandle, GraphicsError>;

    fn create_uniform_buffer(
        &self,
        desc: &UniformBufferDescription,
    ) -> Result<UniformBufferHandle, GraphicsError>;

    /// Build the pipeline of a rasterization pass.
    fn create_graphic_pass(&self, desc: &GraphicPassDescription)
        -> Result<PassHandle, GraphicsError>;

    /// Build the pipeline of a compute pass.
    fn create_compute_pass(&self, desc: &ComputePassDescription)
        -> Result<PassHandle, GraphicsError>;

    /// Upload static meshes. `meshes` and `materials` have equal length.
    fn create_meshes(
        &self,
        meshes: &[MeshBinary],
        materials: &[MeshMaterial],
    ) -> Result<Vec<MeshHandle>, GraphicsError>;

    /// Create position-only meshes with initial contents.
    fn create_dynamic_meshes(
        &self,
        meshes: &[LineMesh],
    ) -> Result<Vec<DynamicMeshHandle>, GraphicsError>;

    /// Replace the contents of dynamic meshes. Both slices have equal length.
    fn update_dynamic_meshes(&self, handles: &[DynamicMeshHandle], meshes: &[LineMesh]);

    /// Resize 2D images in place, keeping format and mip layout.
    fn resize_images(&self, images: &[ImageHandle], width: u32, height: u32);

    fn recreate_swapchain(&self, width: u32, height: u32);

    fn update_graphic_pass_shader_description(
        &self,
        pass: PassHandle,
        desc: &GraphicPassShaderDescriptions,
    );

    fn update_compute_pass_shader_description(&self, pass: PassHandle, desc: &ShaderDescription);

    /// Rebuild pipelines whose shader descriptions changed.
    fn update_shader_code(&self);

    /// Add one node to the current frame's graph.
    fn set_render_pass_execution(&self, execution: RenderPassExecution);

    /// Record draws into a graphic pass. `transforms` pairs with `meshes`.
    fn draw_meshes(&self, pass: PassHandle, meshes: &[MeshHandle], transforms: &[DrawTransform]);

    fn draw_dynamic_meshes(
        &self,
        pass: PassHandle,
        meshes: &[DynamicMeshHandle],
        transforms: &[DrawTransform],
    );

    /// Begin a frame. Clears the previous frame's graph and draws.
    fn new_frame(&self);

    /// Execute the current frame's graph, presenting if `present` is set.
    fn render_frame(&self, present: bool) -> Result<(), GraphicsError>;

    fn set_global_shader_info(&self, info: &GlobalShaderInfo);

    fn set_uniform_buffer_data(&self, buffer: UniformBufferHandle, data: &[u8]);

    fn memory_stats(&self) -> MemoryStats;

    /// GPU timings of the last measured frame.
    fn render_pass_timings(&self) -> Vec<RenderPassTime>;

    /// Image the tonemapping pass writes into for presentation.
    fn swapchain_input_image(&self) -> ImageHandle;
}

static_assertions::assert_obj_safe!(RenderBackend);
