//! Per-frame pass invocations.

use crate::types::{ImageHandle, SamplerHandle, StorageBufferHandle, UniformBufferHandle};

use super::PassHandle;

/// An image subresource bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageResource {
    pub image: ImageHandle,
    pub mip_level: u32,
    pub binding: u32,
}

impl ImageResource {
    pub fn new(image: ImageHandle, mip_level: u32, binding: u32) -> Self {
        Self {
            image,
            mip_level,
            binding,
        }
    }
}

/// A sampler bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerResource {
    pub sampler: SamplerHandle,
    pub binding: u32,
}

impl SamplerResource {
    pub fn new(sampler: SamplerHandle, binding: u32) -> Self {
        Self { sampler, binding }
    }
}

/// A storage buffer bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageBufferResource {
    pub buffer: StorageBufferHandle,
    pub read_only: bool,
    pub binding: u32,
}

impl StorageBufferResource {
    pub fn new(buffer: StorageBufferHandle, read_only: bool, binding: u32) -> Self {
        Self {
            buffer,
            read_only,
            binding,
        }
    }
}

/// A uniform buffer bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBufferResource {
    pub buffer: UniformBufferHandle,
    pub binding: u32,
}

impl UniformBufferResource {
    pub fn new(buffer: UniformBufferHandle, binding: u32) -> Self {
        Self { buffer, binding }
    }
}

/// Resources bound for one pass invocation, grouped by binding kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPassResources {
    pub storage_images: Vec<ImageResource>,
    pub sampled_images: Vec<ImageResource>,
    pub samplers: Vec<SamplerResource>,
    pub storage_buffers: Vec<StorageBufferResource>,
    pub uniform_buffers: Vec<UniformBufferResource>,
}

impl RenderPassResources {
    /// Every binding slot used, in no particular order.
    pub fn bindings(&self) -> impl Iterator<Item = u32> + '_ {
        self.storage_images
            .iter()
            .map(|r| r.binding)
            .chain(self.sampled_images.iter().map(|r| r.binding))
            .chain(self.samplers.iter().map(|r| r.binding))
            .chain(self.storage_buffers.iter().map(|r| r.binding))
            .chain(self.uniform_buffers.iter().map(|r| r.binding))
    }

    /// Total number of bound resources.
    pub fn len(&self) -> usize {
        self.storage_images.len()
            + self.sampled_images.len()
            + self.samplers.len()
            + self.storage_buffers.len()
            + self.uniform_buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One node of the frame graph: a pass invocation with its dependencies.
///
/// Executions are built fresh every frame. `parents` may contain duplicates;
/// they are ignored when the graph is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassExecution {
    pub handle: PassHandle,
    pub parents: Vec<PassHandle>,
    /// Thread group counts for compute passes; ignored for graphic passes.
    pub dispatch_count: [u32; 3],
    pub resources: RenderPassResources,
}

impl RenderPassExecution {
    /// An execution with no parents, no resources and a `1, 1, 1` dispatch.
    pub fn new(handle: PassHandle) -> Self {
        Self {
            handle,
            parents: Vec::new(),
            dispatch_count: [1, 1, 1],
            resources: RenderPassResources::default(),
        }
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = PassHandle>) -> Self {
        self.parents.extend(parents);
        self
    }

    pub fn with_dispatch(mut self, dispatch_count: [u32; 3]) -> Self {
        self.dispatch_count = dispatch_count;
        self
    }

    pub fn with_resources(mut self, resources: RenderPassResources) -> Self {
        self.resources = resources;
        self
    }

    /// Whether `parent` is among this execution's parents.
    pub fn depends_on(&self, parent: PassHandle) -> bool {
        self.parents.contains(&parent)
    }
}
