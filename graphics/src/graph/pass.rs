//! Pass declarations.
//!
//! A pass is declared once at setup with a [`GraphicPassDescription`] or a
//! [`ComputePassDescription`]. The backend builds the pipeline and returns a
//! [`PassHandle`](super::PassHandle) that stays valid for the lifetime of the
//! renderer. Per-frame work is described separately by
//! [`RenderPassExecution`](super::RenderPassExecution).

use crate::shader::{GraphicPassShaderDescriptions, ShaderDescription};
use crate::types::ImageHandle;

/// Operation to perform when loading an attachment at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttachmentLoadOp {
    /// Clear the attachment.
    Clear,
    /// Load the existing contents of the attachment.
    #[default]
    Load,
}

/// An image subresource a graphic pass renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub image: ImageHandle,
    pub mip_level: u32,
    /// Attachment index within the pass.
    pub binding: u32,
    pub load_op: AttachmentLoadOp,
}

impl Attachment {
    pub fn new(image: ImageHandle, mip_level: u32, binding: u32, load_op: AttachmentLoadOp) -> Self {
        Self {
            image,
            mip_level,
            binding,
            load_op,
        }
    }
}

/// Depth comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthFunction {
    Never,
    Always,
    Less,
    Greater,
    #[default]
    LessEqual,
    GreaterEqual,
    Equal,
}

/// Depth test state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthTest {
    pub function: DepthFunction,
    pub write: bool,
}

impl Default for DepthTest {
    fn default() -> Self {
        Self {
            function: DepthFunction::LessEqual,
            write: true,
        }
    }
}

/// Face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    None,
    Front,
    #[default]
    Back,
}

/// Polygon rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RasterizationMode {
    #[default]
    Fill,
    Line,
}

/// Rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rasterization {
    pub cull_mode: CullMode,
    pub mode: RasterizationMode,
    /// Clamp depth instead of clipping against near and far.
    pub clamp_depth: bool,
}

/// Blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendState {
    #[default]
    None,
    Additive,
}

/// Vertex input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexFormat {
    /// Interleaved [`FullVertex`](plain_core::mesh::FullVertex).
    #[default]
    Full,
    /// Positions only, used by dynamic (debug) meshes.
    PositionOnly,
}

/// Declaration of a rasterization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicPassDescription {
    pub name: String,
    pub shader_descriptions: GraphicPassShaderDescriptions,
    pub attachments: Vec<Attachment>,
    pub depth_test: DepthTest,
    pub rasterization: Rasterization,
    pub blending: BlendState,
    pub vertex_format: VertexFormat,
}

impl GraphicPassDescription {
    /// A pass with default fixed-function state and no attachments.
    pub fn new(name: impl Into<String>, shaders: GraphicPassShaderDescriptions) -> Self {
        Self {
            name: name.into(),
            shader_descriptions: shaders,
            attachments: Vec::new(),
            depth_test: DepthTest::default(),
            rasterization: Rasterization::default(),
            blending: BlendState::None,
            vertex_format: VertexFormat::Full,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_depth_test(mut self, function: DepthFunction, write: bool) -> Self {
        self.depth_test = DepthTest { function, write };
        self
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.rasterization.cull_mode = cull_mode;
        self
    }

    pub fn with_rasterization_mode(mut self, mode: RasterizationMode) -> Self {
        self.rasterization.mode = mode;
        self
    }

    pub fn with_depth_clamp(mut self) -> Self {
        self.rasterization.clamp_depth = true;
        self
    }

    pub fn with_vertex_format(mut self, format: VertexFormat) -> Self {
        self.vertex_format = format;
        self
    }
}

/// Declaration of a compute pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputePassDescription {
    pub name: String,
    pub shader_description: ShaderDescription,
}

impl ComputePassDescription {
    pub fn new(name: impl Into<String>, shader: ShaderDescription) -> Self {
        Self {
            name: name.into(),
            shader_description: shader,
        }
    }
}
