//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations. It hands out handles,
//! records every call, and compiles the submitted frame graph on
//! [`render_frame`](RenderBackend::render_frame) exactly like a real backend
//! would before recording command buffers. Tests inspect the recording to
//! check what the orchestrator asked for.

use std::collections::HashMap;

use parking_lot::Mutex;
use plain_core::mesh::{LineMesh, MeshBinary};

use crate::compiler::CompiledGraph;
use crate::error::GraphicsError;
use crate::graph::{
    ComputePassDescription, FrameGraph, GraphicPassDescription, PassHandle, RenderPassExecution,
};
use crate::shader::{GraphicPassShaderDescriptions, ShaderDescription};
use crate::types::{
    DynamicMeshHandle, ImageDescription, ImageHandle, ImageType, MemoryStats, MeshHandle,
    RenderPassTime, SamplerDescription, SamplerHandle, StorageBufferDescription,
    StorageBufferHandle, UniformBufferDescription, UniformBufferHandle,
};
use crate::uniforms::{DrawTransform, GlobalShaderInfo};

use super::{MeshMaterial, RenderBackend};

/// Shader state of a recorded pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedShaders {
    Graphic(GraphicPassShaderDescriptions),
    Compute(ShaderDescription),
}

/// A pass as declared to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPass {
    pub name: String,
    pub shaders: RecordedShaders,
    /// Number of shader description updates received.
    pub shader_updates: u32,
}

/// A draw recorded into a graphic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordedDraw {
    Mesh(MeshHandle),
    Dynamic(DynamicMeshHandle),
}

/// Everything the last rendered frame contained.
#[derive(Debug, Clone, Default)]
pub struct RecordedFrame {
    pub executions: Vec<RenderPassExecution>,
    pub compiled: CompiledGraph,
    pub draws: Vec<(PassHandle, RecordedDraw, DrawTransform)>,
    pub presented: bool,
}

impl RecordedFrame {
    /// The execution submitted for `pass`.
    pub fn execution(&self, pass: PassHandle) -> Option<&RenderPassExecution> {
        self.executions.iter().find(|e| e.handle == pass)
    }

    pub fn contains(&self, pass: PassHandle) -> bool {
        self.execution(pass).is_some()
    }

    /// Number of draws recorded into `pass`.
    pub fn draw_count(&self, pass: PassHandle) -> usize {
        self.draws.iter().filter(|(p, _, _)| *p == pass).count()
    }
}

#[derive(Debug, Default)]
struct DummyState {
    images: Vec<ImageDescription>,
    sampler_count: u32,
    storage_buffer_sizes: Vec<u64>,
    uniform_buffers: Vec<Vec<u8>>,
    passes: Vec<RecordedPass>,
    mesh_count: u32,
    dynamic_meshes: Vec<LineMesh>,

    graph: FrameGraph,
    draws: Vec<(PassHandle, RecordedDraw, DrawTransform)>,
    last_frame: Option<RecordedFrame>,
    global_shader_info: Option<GlobalShaderInfo>,

    call_count: u64,
    frames_rendered: u64,
    swapchain_recreations: u32,
    resize_calls: Vec<(Vec<ImageHandle>, u32, u32)>,
    shader_code_updates: u32,
    fail_pass: Option<String>,
}

/// Recording GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    state: Mutex<DummyState>,
    swapchain_image: ImageHandle,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        let swapchain = ImageDescription::new_2d(
            1,
            1,
            crate::types::ImageFormat::RGBA8,
            crate::types::ImageUsageFlags::STORAGE,
        );
        let state = DummyState {
            images: vec![swapchain],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
            swapchain_image: ImageHandle::from_raw(0),
        }
    }

    /// A backend that refuses to create the pass called `name`.
    pub fn failing_pass(name: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.state.lock().fail_pass = Some(name.into());
        backend
    }

    /// Total number of trait calls received.
    pub fn call_count(&self) -> u64 {
        self.state.lock().call_count
    }

    pub fn frames_rendered(&self) -> u64 {
        self.state.lock().frames_rendered
    }

    pub fn swapchain_recreations(&self) -> u32 {
        self.state.lock().swapchain_recreations
    }

    pub fn shader_code_updates(&self) -> u32 {
        self.state.lock().shader_code_updates
    }

    /// Every `resize_images` call as `(images, width, height)`.
    pub fn resize_calls(&self) -> Vec<(Vec<ImageHandle>, u32, u32)> {
        self.state.lock().resize_calls.clone()
    }

    /// Contents of the last rendered frame.
    pub fn last_frame(&self) -> Option<RecordedFrame> {
        self.state.lock().last_frame.clone()
    }

    /// Executions submitted since the last `new_frame`.
    pub fn pending_executions(&self) -> Vec<RenderPassExecution> {
        self.state.lock().graph.executions().to_vec()
    }

    /// Handle of the first pass declared under `name`.
    pub fn pass_handle(&self, name: &str) -> Option<PassHandle> {
        self.state
            .lock()
            .passes
            .iter()
            .position(|p| p.name == name)
            .map(|i| PassHandle::from_raw(i as u32))
    }

    pub fn pass(&self, pass: PassHandle) -> Option<RecordedPass> {
        self.state.lock().passes.get(pass.index()).cloned()
    }

    pub fn pass_count(&self) -> usize {
        self.state.lock().passes.len()
    }

    /// Description an image was created with, with its current size.
    pub fn image(&self, image: ImageHandle) -> Option<ImageDescription> {
        self.state.lock().images.get(image.raw() as usize).cloned()
    }

    pub fn image_count(&self) -> usize {
        self.state.lock().images.len()
    }

    pub fn uniform_buffer_data(&self, buffer: UniformBufferHandle) -> Option<Vec<u8>> {
        self.state
            .lock()
            .uniform_buffers
            .get(buffer.raw() as usize)
            .cloned()
    }

    pub fn dynamic_mesh(&self, mesh: DynamicMeshHandle) -> Option<LineMesh> {
        self.state
            .lock()
            .dynamic_meshes
            .get(mesh.raw() as usize)
            .cloned()
    }

    pub fn global_shader_info(&self) -> Option<GlobalShaderInfo> {
        self.state.lock().global_shader_info
    }

    /// Get the backend name.
    pub fn backend_name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn image_bytes(desc: &ImageDescription) -> u64 {
        let layers = match desc.image_type {
            ImageType::TypeCube => 6,
            ImageType::Type2D | ImageType::Type3D => 1,
        };
        desc.level_zero_size() * layers
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for DummyBackend {
    fn name(&self) -> &'static str {
        self.backend_name()
    }

    fn create_image(&self, desc: &ImageDescription) -> Result<ImageHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        if desc.width == 0 || desc.height == 0 || desc.depth == 0 {
            return Err(GraphicsError::ResourceCreationFailed(format!(
                "image with zero extent {}x{}x{}",
                desc.width, desc.height, desc.depth
            )));
        }
        log::trace!(
            "DummyBackend: creating image {}x{}x{} {:?}",
            desc.width,
            desc.height,
            desc.depth,
            desc.format
        );
        let mut recorded = desc.clone();
        recorded.initial_data = Vec::new();
        state.images.push(recorded);
        Ok(ImageHandle::from_raw(state.images.len() as u32 - 1))
    }

    fn create_sampler(&self, desc: &SamplerDescription) -> Result<SamplerHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!("DummyBackend: creating sampler {:?}", desc.interpolation);
        state.sampler_count += 1;
        Ok(SamplerHandle::from_raw(state.sampler_count - 1))
    }

    fn create_storage_buffer(
        &self,
        desc: &StorageBufferDescription,
    ) -> Result<StorageBufferHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!("DummyBackend: creating storage buffer (size: {})", desc.size);
        state.storage_buffer_sizes.push(desc.size);
        Ok(StorageBufferHandle::from_raw(
            state.storage_buffer_sizes.len() as u32 - 1,
        ))
    }

    fn create_uniform_buffer(
        &self,
        desc: &UniformBufferDescription,
    ) -> Result<UniformBufferHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!("DummyBackend: creating uniform buffer (size: {})", desc.size);
        state.uniform_buffers.push(vec![0; desc.size as usize]);
        Ok(UniformBufferHandle::from_raw(
            state.uniform_buffers.len() as u32 - 1,
        ))
    }

    fn create_graphic_pass(
        &self,
        desc: &GraphicPassDescription,
    ) -> Result<PassHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        if state.fail_pass.as_deref() == Some(desc.name.as_str()) {
            return Err(GraphicsError::PassCreationFailed {
                name: desc.name.clone(),
                reason: "pipeline creation rejected".into(),
            });
        }
        log::trace!("DummyBackend: creating graphic pass '{}'", desc.name);
        state.passes.push(RecordedPass {
            name: desc.name.clone(),
            shaders: RecordedShaders::Graphic(desc.shader_descriptions.clone()),
            shader_updates: 0,
        });
        Ok(PassHandle::from_raw(state.passes.len() as u32 - 1))
    }

    fn create_compute_pass(
        &self,
        desc: &ComputePassDescription,
    ) -> Result<PassHandle, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        if state.fail_pass.as_deref() == Some(desc.name.as_str()) {
            return Err(GraphicsError::PassCreationFailed {
                name: desc.name.clone(),
                reason: "pipeline creation rejected".into(),
            });
        }
        log::trace!("DummyBackend: creating compute pass '{}'", desc.name);
        state.passes.push(RecordedPass {
            name: desc.name.clone(),
            shaders: RecordedShaders::Compute(desc.shader_description.clone()),
            shader_updates: 0,
        });
        Ok(PassHandle::from_raw(state.passes.len() as u32 - 1))
    }

    fn create_meshes(
        &self,
        meshes: &[MeshBinary],
        materials: &[MeshMaterial],
    ) -> Result<Vec<MeshHandle>, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        if meshes.len() != materials.len() {
            return Err(GraphicsError::InvalidParameter(format!(
                "{} meshes but {} materials",
                meshes.len(),
                materials.len()
            )));
        }
        log::trace!("DummyBackend: creating {} meshes", meshes.len());
        let first = state.mesh_count;
        state.mesh_count += meshes.len() as u32;
        Ok((first..state.mesh_count).map(MeshHandle::from_raw).collect())
    }

    fn create_dynamic_meshes(
        &self,
        meshes: &[LineMesh],
    ) -> Result<Vec<DynamicMeshHandle>, GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!("DummyBackend: creating {} dynamic meshes", meshes.len());
        let first = state.dynamic_meshes.len() as u32;
        state.dynamic_meshes.extend(meshes.iter().cloned());
        let end = state.dynamic_meshes.len() as u32;
        Ok((first..end).map(DynamicMeshHandle::from_raw).collect())
    }

    fn update_dynamic_meshes(&self, handles: &[DynamicMeshHandle], meshes: &[LineMesh]) {
        let mut state = self.state.lock();
        state.call_count += 1;
        for (handle, mesh) in handles.iter().zip(meshes) {
            if let Some(slot) = state.dynamic_meshes.get_mut(handle.raw() as usize) {
                *slot = mesh.clone();
            }
        }
    }

    fn resize_images(&self, images: &[ImageHandle], width: u32, height: u32) {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!(
            "DummyBackend: resizing {} images to {}x{}",
            images.len(),
            width,
            height
        );
        for image in images {
            if let Some(desc) = state.images.get_mut(image.raw() as usize) {
                desc.width = width;
                desc.height = height;
            }
        }
        state.resize_calls.push((images.to_vec(), width, height));
    }

    fn recreate_swapchain(&self, width: u32, height: u32) {
        let mut state = self.state.lock();
        state.call_count += 1;
        log::trace!("DummyBackend: recreating swapchain {}x{}", width, height);
        state.swapchain_recreations += 1;
        let swapchain = self.swapchain_image.raw() as usize;
        if let Some(desc) = state.images.get_mut(swapchain) {
            desc.width = width;
            desc.height = height;
        }
    }

    fn update_graphic_pass_shader_description(
        &self,
        pass: PassHandle,
        desc: &GraphicPassShaderDescriptions,
    ) {
        let mut state = self.state.lock();
        state.call_count += 1;
        if let Some(recorded) = state.passes.get_mut(pass.index()) {
            recorded.shaders = RecordedShaders::Graphic(desc.clone());
            recorded.shader_updates += 1;
        }
    }

    fn update_compute_pass_shader_description(&self, pass: PassHandle, desc: &ShaderDescription) {
        let mut state = self.state.lock();
        state.call_count += 1;
        if let Some(recorded) = state.passes.get_mut(pass.index()) {
            recorded.shaders = RecordedShaders::Compute(desc.clone());
            recorded.shader_updates += 1;
        }
    }

    fn update_shader_code(&self) {
        let mut state = self.state.lock();
        state.call_count += 1;
        state.shader_code_updates += 1;
    }

    fn set_render_pass_execution(&self, execution: RenderPassExecution) {
        let mut state = self.state.lock();
        state.call_count += 1;
        state.graph.submit(execution);
    }

    fn draw_meshes(&self, pass: PassHandle, meshes: &[MeshHandle], transforms: &[DrawTransform]) {
        let mut state = self.state.lock();
        state.call_count += 1;
        let draws: Vec<_> = meshes
            .iter()
            .zip(transforms)
            .map(|(&mesh, &transform)| (pass, RecordedDraw::Mesh(mesh), transform))
            .collect();
        state.draws.extend(draws);
    }

    fn draw_dynamic_meshes(
        &self,
        pass: PassHandle,
        meshes: &[DynamicMeshHandle],
        transforms: &[DrawTransform],
    ) {
        let mut state = self.state.lock();
        state.call_count += 1;
        let draws: Vec<_> = meshes
            .iter()
            .zip(transforms)
            .map(|(&mesh, &transform)| (pass, RecordedDraw::Dynamic(mesh), transform))
            .collect();
        state.draws.extend(draws);
    }

    fn new_frame(&self) {
        let mut state = self.state.lock();
        state.call_count += 1;
        state.graph.clear();
        state.draws.clear();
    }

    fn render_frame(&self, present: bool) -> Result<(), GraphicsError> {
        let mut state = self.state.lock();
        state.call_count += 1;

        let compiled = state.graph.compile();
        let executions = state.graph.executions().to_vec();
        let draws = std::mem::take(&mut state.draws);
        state.graph.clear();
        let compiled = compiled?;

        log::trace!(
            "DummyBackend: rendering frame with {} passes (present: {})",
            compiled.pass_count(),
            present
        );
        state.frames_rendered += 1;
        state.last_frame = Some(RecordedFrame {
            executions,
            compiled,
            draws,
            presented: present,
        });
        Ok(())
    }

    fn set_global_shader_info(&self, info: &GlobalShaderInfo) {
        let mut state = self.state.lock();
        state.call_count += 1;
        state.global_shader_info = Some(*info);
    }

    fn set_uniform_buffer_data(&self, buffer: UniformBufferHandle, data: &[u8]) {
        let mut state = self.state.lock();
        state.call_count += 1;
        if let Some(contents) = state.uniform_buffers.get_mut(buffer.raw() as usize) {
            contents.clear();
            contents.extend_from_slice(data);
        }
    }

    fn memory_stats(&self) -> MemoryStats {
        let state = self.state.lock();
        let image_bytes: u64 = state.images.iter().map(Self::image_bytes).sum();
        let buffer_bytes: u64 = state.storage_buffer_sizes.iter().sum::<u64>()
            + state
                .uniform_buffers
                .iter()
                .map(|b| b.len() as u64)
                .sum::<u64>();
        let used = image_bytes + buffer_bytes;
        MemoryStats {
            allocated_bytes: used,
            used_bytes: used,
        }
    }

    fn render_pass_timings(&self) -> Vec<RenderPassTime> {
        let state = self.state.lock();
        let Some(frame) = &state.last_frame else {
            return Vec::new();
        };
        frame
            .compiled
            .pass_order()
            .iter()
            .filter_map(|pass| state.passes.get(pass.index()))
            .map(|pass| RenderPassTime {
                name: pass.name.clone(),
                time_ms: 0.0,
            })
            .collect()
    }

    fn swapchain_input_image(&self) -> ImageHandle {
        self.swapchain_image
    }
}

static_assertions::assert_impl_all!(DummyBackend: Send, Sync);
