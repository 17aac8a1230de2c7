//! Setup-time declaration of every pass and resource.
//!
//! All passes are created once, before the first frame, and never change
//! afterwards except for their shader descriptions (see
//! [`ShaderVariantTracker`](crate::shading::ShaderVariantTracker)). Per-frame
//! code only refers to them through the [`Passes`] handles.
//!
//! | Pass | Kind | Shader |
//! |------|------|--------|
//! | Forward shading | graphic | `triangle` |
//! | Shadow map cascade N | graphic | `sunShadow` |
//! | Copy sky to cubemap | compute | `copyToCube.comp` |
//! | Sky mip creation | compute | `cubemapMip.comp` |
//! | Specular probe convolution | compute | `specularCubeConvolution.comp` |
//! | Diffuse probe convolution | compute | `diffuseCubeConvolution.comp` |
//! | Skybox render | graphic | `sky` |
//! | BRDF Lut creation | compute | `brdfLut.comp` |
//! | Debug geometry | graphic | `debug` |
//! | Histogram per tile | compute | `histogramPerTile.comp` |
//! | Histogram reset | compute | `histogramReset.comp` |
//! | Histogram combine tiles | compute | `histogramCombineTiles.comp` |
//! | Pre-expose lights | compute | `preExposeLights.comp` |
//! | Depth prepass | graphic | `depthPrepass` |
//! | Depth min/max pyramid creation | compute | `depthHiZPyramid.comp` |
//! | Compute light matrix | compute | `lightMatrix.comp` |
//! | Tonemapping | compute | `tonemapping.comp` |
//! | Image copy | compute | `imageCopyHDR.comp` |
//! | TAA | compute | `taa.comp` |
//! | Sky shadow map | graphic | `depthOnlySimple` |
//! | Sky occlusion gather | compute | `skyOcclusionGather.comp` |

mod resources;

pub use resources::{
    sky_occlusion_volume_description, DefaultTextures, FrameBuffers, FrameImages, FrameMeshes,
    FrameResources, Samplers, TextureCache,
};

use crate::backend::RenderBackend;
use crate::error::GraphicsError;
use crate::graph::{
    Attachment, AttachmentLoadOp, ComputePassDescription, CullMode, DepthFunction,
    GraphicPassDescription, PassHandle, RasterizationMode, VertexFormat,
};
use crate::settings::RendererSettings;
use crate::shader::{GraphicPassShaderDescriptions, ShaderDescription};
use crate::shading::{depth_pyramid_shader_description, ShaderVariantTracker};

/// Handles of every declared pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passes {
    pub forward: PassHandle,
    /// One per shadow cascade.
    pub shadow_cascades: Vec<PassHandle>,
    pub copy_to_cube: PassHandle,
    /// Writes sky cubemap mip `i + 1` from mip `i`.
    pub cubemap_mips: Vec<PassHandle>,
    /// One per convolved specular probe mip.
    pub specular_convolutions: Vec<PassHandle>,
    pub diffuse_convolution: PassHandle,
    pub sky: PassHandle,
    pub brdf_lut: PassHandle,
    pub debug: PassHandle,
    pub histogram_per_tile: PassHandle,
    pub histogram_reset: PassHandle,
    pub histogram_combine: PassHandle,
    pub pre_expose: PassHandle,
    pub depth_prepass: PassHandle,
    pub depth_pyramid: PassHandle,
    pub light_matrix: PassHandle,
    pub tonemapping: PassHandle,
    /// Copies the TAA output into the history buffer.
    pub image_copy: PassHandle,
    pub taa: PassHandle,
    pub sky_shadow: PassHandle,
    pub sky_occlusion_gather: PassHandle,
}

impl Passes {
    /// Declare every pass.
    ///
    /// Any backend failure aborts setup.
    pub fn declare(
        backend: &dyn RenderBackend,
        settings: &RendererSettings,
        resources: &FrameResources,
        shading: &ShaderVariantTracker,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        let images = &resources.images;
        let histogram = settings.histogram_settings();
        let bins = settings.histogram_bin_count;

        let forward = backend.create_graphic_pass(
            &GraphicPassDescription::new("Forward shading", shading.forward_shader_description())
                .with_attachment(Attachment::new(images.color, 0, 0, AttachmentLoadOp::Clear))
                .with_attachment(Attachment::new(images.depth, 0, 0, AttachmentLoadOp::Load))
                .with_depth_test(DepthFunction::Equal, true)
                .with_cull_mode(CullMode::Back),
        )?;

        let shadow_cascades = images
            .shadow_maps
            .iter()
            .zip(0u32..)
            .map(|(&shadow_map, cascade)| {
                let mut shaders = GraphicPassShaderDescriptions::from_name("sunShadow");
                shaders.vertex.push_constant(0, cascade);
                backend.create_graphic_pass(
                    &GraphicPassDescription::new(format!("Shadow map cascade {cascade}"), shaders)
                        .with_attachment(Attachment::new(shadow_map, 0, 0, AttachmentLoadOp::Clear))
                        .with_depth_test(DepthFunction::LessEqual, true)
                        .with_cull_mode(CullMode::Front)
                        .with_depth_clamp(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let compute = |name: &str, shader: ShaderDescription| {
            backend.create_compute_pass(&ComputePassDescription::new(name, shader))
        };

        let copy_to_cube = compute("Copy sky to cubemap", ShaderDescription::new("copyToCube.comp"))?;

        // mip 0 is written by the copy pass
        let cubemap_mips = (1..settings.sky_texture_mip_count)
            .map(|_| compute("Sky mip creation", ShaderDescription::new("cubemapMip.comp")))
            .collect::<Result<Vec<_>, _>>()?;

        let specular_mip_count = settings.specular_probe_mip_count();
        let specular_convolutions = (0..specular_mip_count)
            .map(|mip| {
                compute(
                    "Specular probe convolution",
                    ShaderDescription::new("specularCubeConvolution.comp")
                        .with_constant(0, specular_mip_count)
                        .with_constant(1, mip),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let diffuse_convolution = compute(
            "Diffuse probe convolution",
            ShaderDescription::new("diffuseCubeConvolution.comp"),
        )?;

        let sky = backend.create_graphic_pass(
            &GraphicPassDescription::new("Skybox render", GraphicPassShaderDescriptions::from_name("sky"))
                .with_attachment(Attachment::new(images.color, 0, 0, AttachmentLoadOp::Load))
                .with_attachment(Attachment::new(images.depth, 0, 0, AttachmentLoadOp::Load))
                .with_depth_test(DepthFunction::LessEqual, false)
                .with_cull_mode(CullMode::None),
        )?;

        let brdf_lut = compute("BRDF Lut creation", shading.brdf_lut_shader_description())?;

        let debug = backend.create_graphic_pass(
            &GraphicPassDescription::new(
                "Debug geometry",
                GraphicPassShaderDescriptions::from_name("debug"),
            )
            .with_attachment(Attachment::new(images.color, 0, 0, AttachmentLoadOp::Load))
            .with_attachment(Attachment::new(images.depth, 0, 0, AttachmentLoadOp::Load))
            .with_depth_test(DepthFunction::LessEqual, true)
            .with_cull_mode(CullMode::None)
            .with_rasterization_mode(RasterizationMode::Line)
            .with_vertex_format(VertexFormat::PositionOnly),
        )?;

        let histogram_per_tile = compute(
            "Histogram per tile",
            ShaderDescription::new("histogramPerTile.comp")
                .with_constant(0, bins)
                .with_constant(1, histogram.min_value)
                .with_constant(2, histogram.max_value)
                .with_constant(3, histogram.max_tile_count),
        )?;
        let histogram_reset = compute(
            "Histogram reset",
            ShaderDescription::new("histogramReset.comp").with_constant(0, bins),
        )?;
        let histogram_combine = compute(
            "Histogram combine tiles",
            ShaderDescription::new("histogramCombineTiles.comp")
                .with_constant(0, bins)
                .with_constant(1, histogram.max_tile_count),
        )?;
        let pre_expose = compute(
            "Pre-expose lights",
            ShaderDescription::new("preExposeLights.comp")
                .with_constant(0, bins)
                .with_constant(1, histogram.min_value)
                .with_constant(2, histogram.max_value),
        )?;

        let depth_prepass = backend.create_graphic_pass(
            &GraphicPassDescription::new(
                "Depth prepass",
                GraphicPassShaderDescriptions::from_name("depthPrepass"),
            )
            .with_attachment(Attachment::new(images.depth, 0, 0, AttachmentLoadOp::Clear))
            .with_attachment(Attachment::new(images.motion_vectors, 0, 1, AttachmentLoadOp::Clear))
            .with_depth_test(DepthFunction::LessEqual, true)
            .with_cull_mode(CullMode::Back),
        )?;

        let depth_pyramid = compute(
            "Depth min/max pyramid creation",
            depth_pyramid_shader_description(width, height),
        )?;
        let light_matrix = compute("Compute light matrix", ShaderDescription::new("lightMatrix.comp"))?;
        let tonemapping = compute("Tonemapping", ShaderDescription::new("tonemapping.comp"))?;
        let image_copy = compute("Image copy", ShaderDescription::new("imageCopyHDR.comp"))?;
        let taa = compute("TAA", shading.taa_shader_description())?;

        let sky_shadow = backend.create_graphic_pass(
            &GraphicPassDescription::new(
                "Sky shadow map",
                GraphicPassShaderDescriptions::from_name("depthOnlySimple"),
            )
            .with_attachment(Attachment::new(images.sky_shadow_map, 0, 0, AttachmentLoadOp::Clear))
            .with_depth_test(DepthFunction::LessEqual, true)
            .with_cull_mode(CullMode::Back)
            .with_depth_clamp(),
        )?;
        let sky_occlusion_gather = compute(
            "Sky occlusion gather",
            ShaderDescription::new("skyOcclusionGather.comp"),
        )?;

        log::debug!(
            "Declared {} shadow cascades, {} sky mip passes, {} specular convolutions",
            shadow_cascades.len(),
            cubemap_mips.len(),
            specular_convolutions.len()
        );

        Ok(Self {
            forward,
            shadow_cascades,
            copy_to_cube,
            cubemap_mips,
            specular_convolutions,
            diffuse_convolution,
            sky,
            brdf_lut,
            debug,
            histogram_per_tile,
            histogram_reset,
            histogram_combine,
            pre_expose,
            depth_prepass,
            depth_pyramid,
            light_matrix,
            tonemapping,
            image_copy,
            taa,
            sky_shadow,
            sky_occlusion_gather,
        })
    }

    /// Image based lighting passes in dependency order, BRDF LUT excluded.
    pub fn ibl_chain(&self) -> impl Iterator<Item = PassHandle> + '_ {
        std::iter::once(self.copy_to_cube)
            .chain(self.cubemap_mips.iter().copied())
            .chain(std::iter::once(self.diffuse_convolution))
            .chain(self.specular_convolutions.iter().copied())
    }

    /// Number of declared passes.
    pub fn count(&self) -> usize {
        // forward, sky, brdf lut, debug, histogram and exposure (4), depth (3),
        // post processing (3), sky occlusion (2)
        16 + self.shadow_cascades.len() + self.ibl_chain().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::{DummyBackend, RecordedShaders};
    use crate::shading::{ShadingConfig, TaaSettings};
    use plain_core::texture::{ImageDescription, ImageLoadError, ImageLoader};
    use std::path::Path;

    struct NoImages;

    impl ImageLoader for NoImages {
        fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError> {
            Err(ImageLoadError::Decode {
                path: path.to_path_buf(),
                reason: "no files in tests".into(),
            })
        }
    }

    fn declare(backend: &DummyBackend) -> Result<Passes, GraphicsError> {
        let settings = RendererSettings::default();
        let resources = FrameResources::create(backend, &NoImages, &settings, 1920, 1080)?;
        let shading = ShaderVariantTracker::new(
            ShadingConfig::default(),
            TaaSettings::default(),
            settings.specular_probe_mip_count(),
        );
        Passes::declare(backend, &settings, &resources, &shading, 1920, 1080)
    }

    #[test]
    fn test_pass_counts() {
        let backend = DummyBackend::new();
        let passes = declare(&backend).unwrap();
        assert_eq!(passes.shadow_cascades.len(), 4);
        assert_eq!(passes.cubemap_mips.len(), 7);
        assert_eq!(passes.specular_convolutions.len(), 6);
        // 18 single passes plus the repeated ones
        assert_eq!(backend.pass_count(), 18 + 4 + 7 + 6);
        assert_eq!(passes.ibl_chain().count(), 1 + 7 + 1 + 6);
        assert_eq!(passes.count(), backend.pass_count());
    }

    #[test]
    fn test_pass_names() {
        let backend = DummyBackend::new();
        let passes = declare(&backend).unwrap();
        assert_eq!(backend.pass_handle("Forward shading"), Some(passes.forward));
        assert_eq!(backend.pass_handle("TAA"), Some(passes.taa));
        assert_eq!(
            backend.pass(passes.shadow_cascades[2]).unwrap().name,
            "Shadow map cascade 2"
        );
    }

    #[test]
    fn test_creation_constants() {
        let backend = DummyBackend::new();
        let passes = declare(&backend).unwrap();

        let RecordedShaders::Graphic(shadow) = backend.pass(passes.shadow_cascades[3]).unwrap().shaders
        else {
            panic!("shadow cascade is a graphic pass");
        };
        assert_eq!(shadow.vertex.constant_u32(0), Some(3));

        let RecordedShaders::Compute(specular) =
            backend.pass(passes.specular_convolutions[4]).unwrap().shaders
        else {
            panic!("specular convolution is a compute pass");
        };
        assert_eq!(specular.constant_u32(0), Some(6));
        assert_eq!(specular.constant_u32(1), Some(4));

        let RecordedShaders::Compute(per_tile) = backend.pass(passes.histogram_per_tile).unwrap().shaders
        else {
            panic!("histogram is a compute pass");
        };
        assert_eq!(per_tile.constant_u32(0), Some(128));
        assert_eq!(per_tile.constant_f32(1), Some(0.001));
        assert_eq!(per_tile.constant_f32(2), Some(200_000.0));
        assert_eq!(per_tile.constant_u32(3), Some(2025));
    }

    #[test]
    fn test_backend_failure_aborts() {
        let backend = DummyBackend::failing_pass("Sky occlusion gather");
        let err = declare(&backend).unwrap_err();
        assert!(matches!(err, GraphicsError::PassCreationFailed { .. }));
    }
}
