//! Frame graph infrastructure.
//!
//! Passes are declared once at setup ([`GraphicPassDescription`],
//! [`ComputePassDescription`]) and referenced afterwards by [`PassHandle`].
//! Every frame the orchestrator submits one [`RenderPassExecution`] per active
//! pass, each naming the passes it depends on. The resulting DAG lives in a
//! [`FrameGraph`] until the frame is rendered.
//!
//! # Architecture
//!
//! | Layer | Type | Purpose |
//! |-------|------|---------|
//! | Driver | [`Renderer`](crate::renderer::Renderer) | Frame sequencing |
//! | Builder | [`FrameBuilder`](crate::frame::FrameBuilder) | Emits executions and edges |
//! | **Graph** | [`FrameGraph`] | Per-frame DAG (this module) |
//! | Compiler | [`CompiledGraph`](crate::compiler::CompiledGraph) | Dependency-respecting order |
//!
//! Submission order carries no meaning: backends order passes by compiling
//! the graph.

mod execution;
mod pass;

pub use execution::{
    ImageResource, RenderPassExecution, RenderPassResources, SamplerResource,
    StorageBufferResource, UniformBufferResource,
};
pub use pass::{
    Attachment, AttachmentLoadOp, BlendState, ComputePassDescription, CullMode, DepthFunction,
    DepthTest, GraphicPassDescription, Rasterization, RasterizationMode, VertexFormat,
};

use crate::compiler::{self, CompiledGraph, GraphError};

/// Handle to a declared pass.
///
/// `PassHandle` is `Copy` and cheap to pass around. It is created by the
/// backend when a pass is declared and stays valid for the backend's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassHandle(u32);

impl PassHandle {
    /// Wrap a backend-assigned index.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The backend-assigned index.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The set of pass executions submitted for the current frame.
///
/// # Example
///
/// ```ignore
/// let mut graph = FrameGraph::new();
/// graph.submit(RenderPassExecution::new(depth_prepass));
/// graph.submit(RenderPassExecution::new(depth_pyramid).with_parents([depth_prepass]));
///
/// let compiled = graph.compile()?;
/// assert_eq!(compiled.pass_order(), &[depth_prepass, depth_pyramid]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FrameGraph {
    executions: Vec<RenderPassExecution>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one node to the graph.
    pub fn submit(&mut self, execution: RenderPassExecution) {
        self.executions.push(execution);
    }

    /// Executions in submission order.
    pub fn executions(&self) -> &[RenderPassExecution] {
        &self.executions
    }

    /// The execution submitted for `handle`, if any.
    pub fn execution(&self, handle: PassHandle) -> Option<&RenderPassExecution> {
        self.executions.iter().find(|e| e.handle == handle)
    }

    pub fn contains(&self, handle: PassHandle) -> bool {
        self.execution(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.executions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    /// Drop every execution, keeping the allocation for the next frame.
    pub fn clear(&mut self) {
        self.executions.clear();
    }

    /// Order the submitted passes so every parent runs before its children.
    pub fn compile(&self) -> Result<CompiledGraph, GraphError> {
        compiler::compile(&self.executions)
    }
}
