//! Named binding tables.
//!
//! Every pass has a [`BindingLayout`] mapping a [`Binding`] name to a slot
//! and a resource kind. Layouts are validated for slot collisions once at
//! setup; per-frame code resolves slots by name through a
//! [`ResourceBuilder`] instead of repeating slot numbers.

use std::fmt;

use crate::error::GraphicsError;
use crate::graph::{
    ImageResource, RenderPassResources, SamplerResource, StorageBufferResource,
    UniformBufferResource,
};
use crate::types::{ImageHandle, SamplerHandle, StorageBufferHandle, UniformBufferHandle};

/// Maximum number of depth pyramid mips the pyramid shader writes.
pub const MAX_DEPTH_PYRAMID_MIPS: u32 = 11;

/// Type of resource that can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// Image read through a sampler.
    SampledImage,
    /// Image read and written directly.
    StorageImage,
    Sampler,
    StorageBuffer,
    UniformBuffer,
}

/// Name of a binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    ShadowSampler,
    DiffuseProbe,
    CubeSampler,
    BrdfLut,
    SpecularProbe,
    SkySamplerWithMips,
    LutSampler,
    LightBuffer,
    SunShadowInfo,
    /// Shadow map of one cascade.
    ShadowMap(u32),
    SkyOcclusionVolume,
    SkyOcclusionData,
    SkyOcclusionSampler,
    /// Storage view of one depth pyramid mip, by shader slot.
    PyramidMip(u32),
    Depth,
    DepthSampler,
    DepthPyramid,
    PyramidSync,
    LowestPyramidMip,
    PerTileHistogram,
    Histogram,
    Color,
    TexelSampler,
    SkyCubemap,
    History,
    MotionVectors,
    ColorSampler,
    SwapchainInput,
    EnvironmentMap,
    SourceMip,
    DestinationMip,
    /// Output probe of a convolution pass.
    Probe,
    SkyShadowMap,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShadowMap(i) => write!(f, "ShadowMap[{i}]"),
            Self::PyramidMip(i) => write!(f, "PyramidMip[{i}]"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Describes a single binding slot in a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingLayoutEntry {
    pub name: Binding,
    /// Binding index within the pass.
    pub binding: u32,
    pub binding_type: BindingType,
}

/// Binding slots of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingLayout {
    pub label: String,
    pub entries: Vec<BindingLayoutEntry>,
}

impl BindingLayout {
    /// Create a new empty binding layout.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    /// Add a binding entry to the layout.
    pub fn with_entry(mut self, name: Binding, binding: u32, binding_type: BindingType) -> Self {
        self.entries.push(BindingLayoutEntry {
            name,
            binding,
            binding_type,
        });
        self
    }

    pub fn with_sampled_image(self, name: Binding, binding: u32) -> Self {
        self.with_entry(name, binding, BindingType::SampledImage)
    }

    pub fn with_storage_image(self, name: Binding, binding: u32) -> Self {
        self.with_entry(name, binding, BindingType::StorageImage)
    }

    pub fn with_sampler(self, name: Binding, binding: u32) -> Self {
        self.with_entry(name, binding, BindingType::Sampler)
    }

    pub fn with_storage_buffer(self, name: Binding, binding: u32) -> Self {
        self.with_entry(name, binding, BindingType::StorageBuffer)
    }

    pub fn with_uniform_buffer(self, name: Binding, binding: u32) -> Self {
        self.with_entry(name, binding, BindingType::UniformBuffer)
    }

    pub fn entry(&self, name: Binding) -> Option<&BindingLayoutEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Slot of `name`.
    pub fn slot(&self, name: Binding) -> Result<u32, GraphicsError> {
        self.entry(name)
            .map(|e| e.binding)
            .ok_or_else(|| GraphicsError::MissingBinding {
                layout: self.label.clone(),
                name: name.to_string(),
            })
    }

    /// Check that no two names share a slot.
    pub fn validate(&self) -> Result<(), GraphicsError> {
        for (i, first) in self.entries.iter().enumerate() {
            if let Some(second) = self.entries[i + 1..]
                .iter()
                .find(|e| e.binding == first.binding)
            {
                return Err(GraphicsError::BindingCollision {
                    layout: self.label.clone(),
                    binding: first.binding,
                    first: first.name.to_string(),
                    second: second.name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Start collecting resources for one execution of this layout's pass.
    pub fn resources(&self) -> ResourceBuilder<'_> {
        ResourceBuilder {
            layout: self,
            resources: RenderPassResources::default(),
            error: None,
        }
    }
}

/// Collects per-frame resources, resolving slots by name.
///
/// The first lookup failure is kept and returned from [`build`](Self::build).
#[derive(Debug)]
pub struct ResourceBuilder<'a> {
    layout: &'a BindingLayout,
    resources: RenderPassResources,
    error: Option<GraphicsError>,
}

impl ResourceBuilder<'_> {
    fn resolve(&mut self, name: Binding, expected: BindingType) -> Option<u32> {
        if self.error.is_some() {
            return None;
        }
        let entry = match self.layout.entry(name) {
            Some(entry) => entry,
            None => {
                self.error = Some(GraphicsError::MissingBinding {
                    layout: self.layout.label.clone(),
                    name: name.to_string(),
                });
                return None;
            }
        };
        if entry.binding_type != expected {
            self.error = Some(GraphicsError::InvalidParameter(format!(
                "binding layout '{}': {} is {:?}, not {:?}",
                self.layout.label, name, entry.binding_type, expected
            )));
            return None;
        }
        Some(entry.binding)
    }

    pub fn sampled_image(mut self, name: Binding, image: ImageHandle, mip_level: u32) -> Self {
        if let Some(binding) = self.resolve(name, BindingType::SampledImage) {
            self.resources
                .sampled_images
                .push(ImageResource::new(image, mip_level, binding));
        }
        self
    }

    pub fn storage_image(mut self, name: Binding, image: ImageHandle, mip_level: u32) -> Self {
        if let Some(binding) = self.resolve(name, BindingType::StorageImage) {
            self.resources
                .storage_images
                .push(ImageResource::new(image, mip_level, binding));
        }
        self
    }

    pub fn sampler(mut self, name: Binding, sampler: SamplerHandle) -> Self {
        if let Some(binding) = self.resolve(name, BindingType::Sampler) {
            self.resources
                .samplers
                .push(SamplerResource::new(sampler, binding));
        }
        self
    }

    pub fn storage_buffer(
        mut self,
        name: Binding,
        buffer: StorageBufferHandle,
        read_only: bool,
    ) -> Self {
        if let Some(binding) = self.resolve(name, BindingType::StorageBuffer) {
            self.resources
                .storage_buffers
                .push(StorageBufferResource::new(buffer, read_only, binding));
        }
        self
    }

    pub fn uniform_buffer(mut self, name: Binding, buffer: UniformBufferHandle) -> Self {
        if let Some(binding) = self.resolve(name, BindingType::UniformBuffer) {
            self.resources
                .uniform_buffers
                .push(UniformBufferResource::new(buffer, binding));
        }
        self
    }

    pub fn build(self) -> Result<RenderPassResources, GraphicsError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.resources),
        }
    }
}

/// Binding layouts of every pass in the frame graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassBindings {
    pub forward: BindingLayout,
    pub shadow_cascade: BindingLayout,
    pub depth_pyramid: BindingLayout,
    pub light_matrix: BindingLayout,
    pub histogram_per_tile: BindingLayout,
    pub histogram_reset: BindingLayout,
    pub histogram_combine: BindingLayout,
    pub pre_expose: BindingLayout,
    pub sky: BindingLayout,
    pub taa: BindingLayout,
    pub history_copy: BindingLayout,
    pub tonemapping: BindingLayout,
    pub cubemap_copy: BindingLayout,
    pub cubemap_mip: BindingLayout,
    pub probe_convolution: BindingLayout,
    pub brdf_lut: BindingLayout,
    pub sky_occlusion_gather: BindingLayout,
}

impl PassBindings {
    /// The layouts the shaders are written against.
    pub fn standard(shadow_cascade_count: u32) -> Self {
        let mut forward = BindingLayout::new("Forward shading")
            .with_sampler(Binding::ShadowSampler, 0)
            .with_sampled_image(Binding::DiffuseProbe, 1)
            .with_sampler(Binding::CubeSampler, 2)
            .with_sampled_image(Binding::BrdfLut, 3)
            .with_sampled_image(Binding::SpecularProbe, 4)
            .with_sampler(Binding::SkySamplerWithMips, 5)
            .with_sampler(Binding::LutSampler, 6)
            .with_storage_buffer(Binding::LightBuffer, 7)
            .with_storage_buffer(Binding::SunShadowInfo, 8);
        for cascade in 0..shadow_cascade_count {
            forward = forward.with_sampled_image(Binding::ShadowMap(cascade), 9 + cascade);
        }
        let forward = forward
            .with_sampled_image(Binding::SkyOcclusionVolume, 13)
            .with_uniform_buffer(Binding::SkyOcclusionData, 14)
            .with_sampler(Binding::SkyOcclusionSampler, 15);

        let mut depth_pyramid = BindingLayout::new("Depth min/max pyramid creation");
        for mip in 0..MAX_DEPTH_PYRAMID_MIPS {
            depth_pyramid = depth_pyramid.with_storage_image(Binding::PyramidMip(mip), mip);
        }
        let depth_pyramid = depth_pyramid
            .with_sampled_image(Binding::Depth, 13)
            .with_sampler(Binding::DepthSampler, 14)
            .with_sampled_image(Binding::DepthPyramid, 15)
            .with_storage_buffer(Binding::PyramidSync, 16);

        Self {
            forward,
            shadow_cascade: BindingLayout::new("Shadow map cascade")
                .with_storage_buffer(Binding::SunShadowInfo, 0),
            depth_pyramid,
            light_matrix: BindingLayout::new("Compute light matrix")
                .with_storage_buffer(Binding::SunShadowInfo, 0)
                .with_storage_image(Binding::LowestPyramidMip, 1),
            histogram_per_tile: BindingLayout::new("Histogram per tile")
                .with_storage_buffer(Binding::PerTileHistogram, 0)
                .with_storage_buffer(Binding::Histogram, 1)
                .with_sampled_image(Binding::Color, 2)
                .with_storage_buffer(Binding::LightBuffer, 3)
                .with_sampler(Binding::TexelSampler, 4),
            histogram_reset: BindingLayout::new("Histogram reset")
                .with_storage_buffer(Binding::Histogram, 1),
            histogram_combine: BindingLayout::new("Histogram combine tiles")
                .with_storage_buffer(Binding::PerTileHistogram, 0)
                .with_storage_buffer(Binding::Histogram, 1),
            pre_expose: BindingLayout::new("Pre-expose lights")
                .with_storage_buffer(Binding::LightBuffer, 0)
                .with_storage_buffer(Binding::Histogram, 1),
            sky: BindingLayout::new("Skybox render")
                .with_sampled_image(Binding::SkyCubemap, 0)
                .with_sampler(Binding::CubeSampler, 1)
                .with_storage_buffer(Binding::LightBuffer, 2),
            taa: BindingLayout::new("TAA")
                .with_storage_image(Binding::Color, 0)
                .with_sampled_image(Binding::History, 1)
                .with_sampled_image(Binding::MotionVectors, 2)
                .with_sampled_image(Binding::Depth, 3)
                .with_sampler(Binding::ColorSampler, 4),
            history_copy: BindingLayout::new("Image copy")
                .with_storage_image(Binding::History, 0)
                .with_sampled_image(Binding::Color, 1)
                .with_sampler(Binding::TexelSampler, 2),
            tonemapping: BindingLayout::new("Tonemapping")
                .with_storage_image(Binding::SwapchainInput, 0)
                .with_sampled_image(Binding::Color, 1)
                .with_sampler(Binding::TexelSampler, 2),
            cubemap_copy: BindingLayout::new("Copy sky to cubemap")
                .with_storage_image(Binding::SkyCubemap, 0)
                .with_sampled_image(Binding::EnvironmentMap, 1)
                .with_sampler(Binding::CubeSampler, 2),
            cubemap_mip: BindingLayout::new("Sky mip creation")
                .with_storage_image(Binding::SourceMip, 0)
                .with_storage_image(Binding::DestinationMip, 1),
            probe_convolution: BindingLayout::new("Probe convolution")
                .with_storage_image(Binding::Probe, 0)
                .with_sampled_image(Binding::SkyCubemap, 1)
                .with_sampler(Binding::SkySamplerWithMips, 2),
            brdf_lut: BindingLayout::new("BRDF Lut creation")
                .with_storage_image(Binding::BrdfLut, 0),
            sky_occlusion_gather: BindingLayout::new("Sky occlusion gather")
                .with_storage_image(Binding::SkyOcclusionVolume, 0)
                .with_sampled_image(Binding::SkyShadowMap, 1)
                .with_sampler(Binding::ShadowSampler, 2)
                .with_uniform_buffer(Binding::SkyOcclusionData, 3),
        }
    }

    /// Every layout, in declaration order.
    pub fn layouts(&self) -> [&BindingLayout; 17] {
        [
            &self.forward,
            &self.shadow_cascade,
            &self.depth_pyramid,
            &self.light_matrix,
            &self.histogram_per_tile,
            &self.histogram_reset,
            &self.histogram_combine,
            &self.pre_expose,
            &self.sky,
            &self.taa,
            &self.history_copy,
            &self.tonemapping,
            &self.cubemap_copy,
            &self.cubemap_mip,
            &self.probe_convolution,
            &self.brdf_lut,
            &self.sky_occlusion_gather,
        ]
    }

    /// Validate every layout.
    pub fn validate(&self) -> Result<(), GraphicsError> {
        self.layouts().into_iter().try_for_each(BindingLayout::validate)
    }
}
