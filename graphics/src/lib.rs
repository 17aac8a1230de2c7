//! # Plain Graphics
//!
//! Frame orchestration for the Plain renderer, built around a per-frame
//! render graph.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Renderer`] - Frame driver: resize handling, culling, draws, sky occlusion bake
//! - [`Passes`] - Every pass, declared once at setup
//! - [`FrameBuilder`] - Per-frame pass executions and dependency edges
//! - [`ShaderVariantTracker`] - Versioned shading options and pipeline updates
//! - [`RenderBackend`] - Trait the GPU backend implements
//! - A recording dummy backend (feature `dummy`, on by default) for tests
//!
//! ## Example
//!
//! ```ignore
//! use plain_graphics::{DummyBackend, Renderer, RendererSettings};
//!
//! let mut renderer = Renderer::setup(backend, loader, RendererSettings::default(), 1920, 1080)?;
//! renderer.add_static_meshes(&meshes, &transforms)?;
//! loop {
//!     renderer.set_camera_extrinsic(camera);
//!     renderer.prepare_new_frame()?;
//!     renderer.render_static_meshes();
//!     renderer.render_frame()?;
//! }
//! ```

pub mod backend;
pub mod bindings;
pub mod catalog;
pub mod compiler;
pub mod culling;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod graph;
pub mod renderer;
pub mod resize;
pub mod settings;
pub mod shader;
pub mod shading;
pub mod types;
pub mod uniforms;

// Re-export main types for convenience
#[cfg(feature = "dummy")]
pub use backend::dummy::DummyBackend;
pub use backend::{MeshMaterial, RenderBackend};
pub use bindings::{Binding, PassBindings};
pub use catalog::{FrameResources, Passes};
pub use compiler::{CompiledGraph, GraphError};
pub use culling::StaticMesh;
pub use error::GraphicsError;
pub use frame::{FrameBuilder, FrameParameters};
pub use graph::{FrameGraph, PassHandle, RenderPassExecution};
pub use renderer::Renderer;
pub use resize::{ResizeEvent, ResolutionState};
pub use settings::{DebugSettings, LightingSettings, RendererSettings};
pub use shading::{
    DiffuseBrdf, DirectMultiscatterBrdf, ShaderVariantTracker, ShadingConfig, ShadingOption,
    TaaSettings,
};
pub use types::{DrawcallStats, MemoryStats, RenderPassTime};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    log::info!("Plain Graphics v{} initialized", VERSION);
}
