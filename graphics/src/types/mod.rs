//! Common types and descriptors for graphics resources.
//!
//! This module contains the opaque resource handles handed out by a
//! [`RenderBackend`](crate::backend::RenderBackend), the descriptor structs
//! used to create buffers and samplers, and the statistics a backend reports.
//! Image descriptors live in `plain_core::texture` since loaders produce them.

mod buffer;
mod handles;
mod sampler;
mod stats;

pub use buffer::{StorageBufferDescription, UniformBufferDescription};
pub use handles::{
    DynamicMeshHandle, ImageHandle, MeshHandle, SamplerHandle, StorageBufferHandle,
    UniformBufferHandle,
};
pub use plain_core::texture::{
    ImageDescription, ImageFormat, ImageType, ImageUsageFlags, MipCount,
};
pub use sampler::{SamplerBorderColor, SamplerDescription, SamplerInterpolation, SamplerWrapping};
pub use stats::{DrawcallStats, MemoryStats, RenderPassTime};
