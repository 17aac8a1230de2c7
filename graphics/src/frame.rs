//! Per-frame graph construction.
//!
//! [`FrameBuilder`] turns the declared passes into this frame's
//! [`RenderPassExecution`]s. It only computes dispatch sizes, resource
//! bindings and parent edges; submission and draws are the renderer's job.
//!
//! # Frame Layout
//!
//! ```text
//!  [IBL chain] [BRDF LUT]          (first frame / on request)
//!        │          │
//!        │          │   depth prepass ──► depth pyramid ──► light matrix
//!        │          │        │                                │    │
//!        │          │        │                 shadow cascades ◄┘   │
//!        │          │        │                        │             │
//!  histogram tiles ─┼─► combine ─► pre-expose         │             │
//!  histogram reset ─┘                 │               │             │
//!        ▼          ▼                 ▼               ▼             ▼
//!  ─────────────────────────── forward shading ─────────────────────────
//!                                     │
//!                        [debug geometry] ──► sky ──► TAA ──┬─► history copy
//!                                                           └─► tonemapping
//! ```

use glam::UVec3;

use crate::bindings::{Binding, PassBindings, MAX_DEPTH_PYRAMID_MIPS};
use crate::catalog::{FrameResources, Passes};
use crate::dispatch::{self, DepthPyramidLayout};
use crate::error::GraphicsError;
use crate::graph::{PassHandle, RenderPassExecution};
use crate::settings::RendererSettings;
use crate::types::ImageHandle;

/// What the next frame contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParameters {
    pub width: u32,
    pub height: u32,
    /// Rebuild the sky cubemap and the diffuse and specular probes.
    pub run_ibl: bool,
    /// Recompute the BRDF lookup table.
    pub run_brdf_lut: bool,
    /// Debug geometry is drawn between forward shading and the sky.
    pub draw_debug_geometry: bool,
}

impl FrameParameters {
    /// A steady state frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            run_ibl: false,
            run_brdf_lut: false,
            draw_debug_geometry: false,
        }
    }
}

/// Builds the executions of one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder<'a> {
    passes: &'a Passes,
    resources: &'a FrameResources,
    bindings: &'a PassBindings,
    settings: &'a RendererSettings,
    swapchain_input: ImageHandle,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(
        passes: &'a Passes,
        resources: &'a FrameResources,
        bindings: &'a PassBindings,
        settings: &'a RendererSettings,
        swapchain_input: ImageHandle,
    ) -> Self {
        Self {
            passes,
            resources,
            bindings,
            settings,
            swapchain_input,
        }
    }

    /// All executions of a frame, in submission order.
    pub fn build(&self, frame: &FrameParameters) -> Result<Vec<RenderPassExecution>, GraphicsError> {
        let (width, height) = (frame.width, frame.height);
        let mut executions = Vec::new();

        let mut preparation = Vec::new();
        if frame.run_ibl {
            executions.extend(self.ibl_chain()?);
            preparation.extend(self.passes.ibl_chain());
        }
        if frame.run_brdf_lut {
            executions.push(self.brdf_lut()?);
            preparation.push(self.passes.brdf_lut);
        }

        executions.extend(self.shadow_cascades()?);
        executions.extend(self.histogram(width, height)?);
        executions.push(self.pre_expose()?);
        executions.push(self.depth_prepass());
        executions.push(self.depth_pyramid(width, height)?);
        executions.push(self.light_matrix(width, height)?);
        executions.push(self.forward(&preparation)?);

        if frame.draw_debug_geometry {
            executions.push(self.debug_geometry());
        }
        executions.push(self.sky(frame.draw_debug_geometry)?);
        executions.push(self.taa(width, height)?);
        executions.push(self.history_copy(width, height)?);
        executions.push(self.tonemapping(width, height)?);

        Ok(executions)
    }

    // ===== IBL =====

    /// Sky cubemap copy, its mip chain and both probe convolutions.
    pub fn ibl_chain(&self) -> Result<Vec<RenderPassExecution>, GraphicsError> {
        let passes = self.passes;
        let images = &self.resources.images;
        let samplers = &self.resources.samplers;
        let sky_res = self.settings.sky_texture_resolution;

        let mut executions = Vec::with_capacity(passes.ibl_chain().count());

        executions.push(
            RenderPassExecution::new(passes.copy_to_cube)
                .with_dispatch(dispatch::cubemap_copy(sky_res))
                .with_resources(
                    self.bindings
                        .cubemap_copy
                        .resources()
                        .storage_image(Binding::SkyCubemap, images.sky_cubemap, 0)
                        .sampled_image(Binding::EnvironmentMap, images.environment_map, 0)
                        .sampler(Binding::CubeSampler, samplers.cube)
                        .build()?,
                ),
        );

        let mut previous = passes.copy_to_cube;
        for (&pass, mip) in passes.cubemap_mips.iter().zip(1u32..) {
            executions.push(
                RenderPassExecution::new(pass)
                    .with_parents([previous])
                    .with_dispatch(dispatch::cubemap_mip(sky_res, mip))
                    .with_resources(
                        self.bindings
                            .cubemap_mip
                            .resources()
                            .storage_image(Binding::SourceMip, images.sky_cubemap, mip - 1)
                            .storage_image(Binding::DestinationMip, images.sky_cubemap, mip)
                            .build()?,
                    ),
            );
            previous = pass;
        }

        // convolutions read the whole mip chain
        let sky_ready: Vec<PassHandle> = if passes.cubemap_mips.is_empty() {
            vec![passes.copy_to_cube]
        } else {
            passes.cubemap_mips.clone()
        };

        executions.push(
            RenderPassExecution::new(passes.diffuse_convolution)
                .with_parents(sky_ready.iter().copied())
                .with_dispatch(dispatch::diffuse_convolution(
                    self.settings.diffuse_probe_resolution,
                ))
                .with_resources(self.convolution_resources(images.diffuse_probe, 0)?),
        );

        for (&pass, mip) in passes.specular_convolutions.iter().zip(0u32..) {
            executions.push(
                RenderPassExecution::new(pass)
                    .with_parents(sky_ready.iter().copied())
                    .with_dispatch(dispatch::specular_convolution(
                        self.settings.specular_probe_resolution,
                        mip,
                    ))
                    .with_resources(self.convolution_resources(images.specular_probe, mip)?),
            );
        }

        Ok(executions)
    }

    fn convolution_resources(
        &self,
        probe: ImageHandle,
        mip: u32,
    ) -> Result<crate::graph::RenderPassResources, GraphicsError> {
        self.bindings
            .probe_convolution
            .resources()
            .storage_image(Binding::Probe, probe, mip)
            .sampled_image(Binding::SkyCubemap, self.resources.images.sky_cubemap, 0)
            .sampler(Binding::SkySamplerWithMips, self.resources.samplers.sky_with_mips)
            .build()
    }

    pub fn brdf_lut(&self) -> Result<RenderPassExecution, GraphicsError> {
        Ok(RenderPassExecution::new(self.passes.brdf_lut)
            .with_dispatch(dispatch::brdf_lut(self.settings.brdf_lut_resolution))
            .with_resources(
                self.bindings
                    .brdf_lut
                    .resources()
                    .storage_image(Binding::BrdfLut, self.resources.images.brdf_lut, 0)
                    .build()?,
            ))
    }

    // ===== Shadows and exposure =====

    fn shadow_cascades(&self) -> Result<Vec<RenderPassExecution>, GraphicsError> {
        self.passes
            .shadow_cascades
            .iter()
            .map(|&pass| {
                Ok(RenderPassExecution::new(pass)
                    .with_parents([self.passes.light_matrix])
                    .with_resources(
                        self.bindings
                            .shadow_cascade
                            .resources()
                            .storage_buffer(
                                Binding::SunShadowInfo,
                                self.resources.buffers.sun_shadow_info,
                                true,
                            )
                            .build()?,
                    ))
            })
            .collect()
    }

    fn histogram(&self, width: u32, height: u32) -> Result<[RenderPassExecution; 3], GraphicsError> {
        let buffers = &self.resources.buffers;
        let tile_size = self.settings.histogram_tile_size;
        let bins = self.settings.histogram_bin_count;

        let per_tile = RenderPassExecution::new(self.passes.histogram_per_tile)
            .with_dispatch(dispatch::histogram_per_tile(width, height, tile_size))
            .with_resources(
                self.bindings
                    .histogram_per_tile
                    .resources()
                    .storage_buffer(Binding::PerTileHistogram, buffers.histogram_per_tile, false)
                    .sampled_image(Binding::Color, self.resources.images.color, 0)
                    .storage_buffer(Binding::LightBuffer, buffers.light, true)
                    .sampler(Binding::TexelSampler, self.resources.samplers.texel)
                    .build()?,
            );

        let reset = RenderPassExecution::new(self.passes.histogram_reset)
            .with_dispatch(dispatch::histogram_reset(bins))
            .with_resources(
                self.bindings
                    .histogram_reset
                    .resources()
                    .storage_buffer(Binding::Histogram, buffers.histogram, false)
                    .build()?,
            );

        let combine = RenderPassExecution::new(self.passes.histogram_combine)
            .with_parents([self.passes.histogram_per_tile, self.passes.histogram_reset])
            .with_dispatch(dispatch::histogram_combine(width, height, tile_size, bins))
            .with_resources(
                self.bindings
                    .histogram_combine
                    .resources()
                    .storage_buffer(Binding::PerTileHistogram, buffers.histogram_per_tile, false)
                    .storage_buffer(Binding::Histogram, buffers.histogram, false)
                    .build()?,
            );

        Ok([per_tile, reset, combine])
    }

    fn pre_expose(&self) -> Result<RenderPassExecution, GraphicsError> {
        let buffers = &self.resources.buffers;
        Ok(RenderPassExecution::new(self.passes.pre_expose)
            .with_parents([self.passes.histogram_combine])
            .with_resources(
                self.bindings
                    .pre_expose
                    .resources()
                    .storage_buffer(Binding::LightBuffer, buffers.light, false)
                    .storage_buffer(Binding::Histogram, buffers.histogram, false)
                    .build()?,
            ))
    }

    // ===== Depth =====

    fn depth_prepass(&self) -> RenderPassExecution {
        RenderPassExecution::new(self.passes.depth_prepass)
    }

    fn depth_pyramid(&self, width: u32, height: u32) -> Result<RenderPassExecution, GraphicsError> {
        let images = &self.resources.images;
        let layout = DepthPyramidLayout::new(width, height);

        let mut resources = self
            .bindings
            .depth_pyramid
            .resources()
            .sampled_image(Binding::Depth, images.depth, 0)
            .sampler(Binding::DepthSampler, self.resources.samplers.clamped_depth)
            .sampled_image(Binding::DepthPyramid, images.depth_pyramid, 0)
            .storage_buffer(
                Binding::PyramidSync,
                self.resources.buffers.depth_pyramid_sync,
                false,
            );
        for slot in 0..MAX_DEPTH_PYRAMID_MIPS {
            resources = resources.storage_image(
                Binding::PyramidMip(slot),
                images.depth_pyramid,
                layout.mip_for_slot(slot),
            );
        }

        Ok(RenderPassExecution::new(self.passes.depth_pyramid)
            .with_parents([self.passes.depth_prepass])
            .with_dispatch(layout.dispatch_count())
            .with_resources(resources.build()?))
    }

    fn light_matrix(&self, width: u32, height: u32) -> Result<RenderPassExecution, GraphicsError> {
        let layout = DepthPyramidLayout::new(width, height);
        Ok(RenderPassExecution::new(self.passes.light_matrix)
            .with_parents([self.passes.depth_pyramid])
            .with_resources(
                self.bindings
                    .light_matrix
                    .resources()
                    .storage_buffer(
                        Binding::SunShadowInfo,
                        self.resources.buffers.sun_shadow_info,
                        false,
                    )
                    .storage_image(
                        Binding::LowestPyramidMip,
                        self.resources.images.depth_pyramid,
                        layout.lowest_mip(),
                    )
                    .build()?,
            ))
    }

    // ===== Shading =====

    fn forward(&self, preparation: &[PassHandle]) -> Result<RenderPassExecution, GraphicsError> {
        let images = &self.resources.images;
        let samplers = &self.resources.samplers;
        let buffers = &self.resources.buffers;

        let mut resources = self
            .bindings
            .forward
            .resources()
            .sampler(Binding::ShadowSampler, samplers.shadow)
            .sampled_image(Binding::DiffuseProbe, images.diffuse_probe, 0)
            .sampler(Binding::CubeSampler, samplers.cube)
            .sampled_image(Binding::BrdfLut, images.brdf_lut, 0)
            .sampled_image(Binding::SpecularProbe, images.specular_probe, 0)
            .sampler(Binding::SkySamplerWithMips, samplers.sky_with_mips)
            .sampler(Binding::LutSampler, samplers.lut)
            .storage_buffer(Binding::LightBuffer, buffers.light, true)
            .storage_buffer(Binding::SunShadowInfo, buffers.sun_shadow_info, true)
            .sampled_image(Binding::SkyOcclusionVolume, images.sky_occlusion_volume, 0)
            .uniform_buffer(Binding::SkyOcclusionData, buffers.sky_occlusion_data)
            .sampler(Binding::SkyOcclusionSampler, samplers.sky_occlusion);
        for (&shadow_map, cascade) in images.shadow_maps.iter().zip(0u32..) {
            resources = resources.sampled_image(Binding::ShadowMap(cascade), shadow_map, 0);
        }

        let passes = self.passes;
        let parents = preparation
            .iter()
            .copied()
            .chain([passes.pre_expose, passes.depth_prepass, passes.light_matrix])
            .chain(passes.shadow_cascades.iter().copied());

        Ok(RenderPassExecution::new(passes.forward)
            .with_parents(parents)
            .with_resources(resources.build()?))
    }

    fn debug_geometry(&self) -> RenderPassExecution {
        RenderPassExecution::new(self.passes.debug).with_parents([self.passes.forward])
    }

    fn sky(&self, after_debug_geometry: bool) -> Result<RenderPassExecution, GraphicsError> {
        let mut parents = vec![self.passes.forward];
        if after_debug_geometry {
            parents.push(self.passes.debug);
        }
        Ok(RenderPassExecution::new(self.passes.sky)
            .with_parents(parents)
            .with_resources(
                self.bindings
                    .sky
                    .resources()
                    .sampled_image(Binding::SkyCubemap, self.resources.images.sky_cubemap, 0)
                    .sampler(Binding::CubeSampler, self.resources.samplers.cube)
                    .storage_buffer(Binding::LightBuffer, self.resources.buffers.light, true)
                    .build()?,
            ))
    }

    // ===== Post processing =====

    fn taa(&self, width: u32, height: u32) -> Result<RenderPassExecution, GraphicsError> {
        let images = &self.resources.images;
        Ok(RenderPassExecution::new(self.passes.taa)
            .with_parents([self.passes.sky])
            .with_dispatch(dispatch::screen_space(width, height))
            .with_resources(
                self.bindings
                    .taa
                    .resources()
                    .storage_image(Binding::Color, images.color, 0)
                    .sampled_image(Binding::History, images.history, 0)
                    .sampled_image(Binding::MotionVectors, images.motion_vectors, 0)
                    .sampled_image(Binding::Depth, images.depth, 0)
                    .sampler(Binding::ColorSampler, self.resources.samplers.color)
                    .build()?,
            ))
    }

    fn history_copy(&self, width: u32, height: u32) -> Result<RenderPassExecution, GraphicsError> {
        let images = &self.resources.images;
        Ok(RenderPassExecution::new(self.passes.image_copy)
            .with_parents([self.passes.taa])
            .with_dispatch(dispatch::screen_space(width, height))
            .with_resources(
                self.bindings
                    .history_copy
                    .resources()
                    .storage_image(Binding::History, images.history, 0)
                    .sampled_image(Binding::Color, images.color, 0)
                    .sampler(Binding::TexelSampler, self.resources.samplers.texel)
                    .build()?,
            ))
    }

    fn tonemapping(&self, width: u32, height: u32) -> Result<RenderPassExecution, GraphicsError> {
        Ok(RenderPassExecution::new(self.passes.tonemapping)
            .with_parents([self.passes.taa])
            .with_dispatch(dispatch::screen_space(width, height))
            .with_resources(
                self.bindings
                    .tonemapping
                    .resources()
                    .storage_image(Binding::SwapchainInput, self.swapchain_input, 0)
                    .sampled_image(Binding::Color, self.resources.images.color, 0)
                    .sampler(Binding::TexelSampler, self.resources.samplers.texel)
                    .build()?,
            ))
    }

    // ===== Sky occlusion =====

    /// Sky shadow map render and gather into `volume`, for one bake sample.
    pub fn sky_occlusion(
        &self,
        volume: ImageHandle,
        volume_resolution: UVec3,
    ) -> Result<[RenderPassExecution; 2], GraphicsError> {
        let shadow = RenderPassExecution::new(self.passes.sky_shadow);
        let gather = RenderPassExecution::new(self.passes.sky_occlusion_gather)
            .with_parents([self.passes.sky_shadow])
            .with_dispatch(dispatch::sky_occlusion_gather(volume_resolution))
            .with_resources(
                self.bindings
                    .sky_occlusion_gather
                    .resources()
                    .storage_image(Binding::SkyOcclusionVolume, volume, 0)
                    .sampled_image(Binding::SkyShadowMap, self.resources.images.sky_shadow_map, 0)
                    .sampler(Binding::ShadowSampler, self.resources.samplers.shadow)
                    .uniform_buffer(
                        Binding::SkyOcclusionData,
                        self.resources.buffers.sky_occlusion_data,
                    )
                    .build()?,
            );
        Ok([shadow, gather])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::DummyBackend;
    use crate::backend::RenderBackend;
    use crate::compiler;
    use crate::shading::{ShaderVariantTracker, ShadingConfig, TaaSettings};
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

    struct Fixture {
        backend: DummyBackend,
        settings: RendererSettings,
        resources: FrameResources,
        passes: Passes,
        bindings: PassBindings,
    }

    impl Fixture {
        fn new() -> Self {
            let backend = DummyBackend::new();
            let settings = RendererSettings::default();
            let resources =
                FrameResources::create(&backend, &NoImages, &settings, 1920, 1080).unwrap();
            let shading = ShaderVariantTracker::new(
                ShadingConfig::default(),
                TaaSettings::default(),
                settings.specular_probe_mip_count(),
            );
            let passes =
                Passes::declare(&backend, &settings, &resources, &shading, 1920, 1080).unwrap();
            let bindings = PassBindings::standard(settings.shadow_cascade_count);
            Self {
                backend,
                settings,
                resources,
                passes,
                bindings,
            }
        }

        fn builder(&self) -> FrameBuilder<'_> {
            FrameBuilder::new(
                &self.passes,
                &self.resources,
                &self.bindings,
                &self.settings,
                self.backend.swapchain_input_image(),
            )
        }

        fn build(&self, frame: FrameParameters) -> Vec<RenderPassExecution> {
            self.builder().build(&frame).unwrap()
        }
    }

    fn find(executions: &[RenderPassExecution], pass: PassHandle) -> &RenderPassExecution {
        executions
            .iter()
            .find(|e| e.handle == pass)
            .expect("pass was emitted")
    }

    #[test]
    fn test_steady_frame_compiles() {
        let fixture = Fixture::new();
        let executions = fixture.build(FrameParameters::new(1920, 1080));
        // 4 cascades, 3 histogram, pre-expose, prepass, pyramid, light
        // matrix, forward, sky, taa, copy, tonemapping
        assert_eq!(executions.len(), 4 + 3 + 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1);

        let compiled = compiler::compile(&executions).unwrap();
        let p = &fixture.passes;
        let before = |a: PassHandle, b: PassHandle| {
            compiled.position(a).unwrap() < compiled.position(b).unwrap()
        };
        assert!(before(p.depth_prepass, p.depth_pyramid));
        assert!(before(p.depth_pyramid, p.light_matrix));
        assert!(before(p.light_matrix, p.shadow_cascades[0]));
        assert!(before(p.histogram_combine, p.pre_expose));
        assert!(before(p.pre_expose, p.forward));
        assert!(before(p.shadow_cascades[3], p.forward));
        assert!(before(p.forward, p.sky));
        assert!(before(p.sky, p.taa));
        assert!(before(p.taa, p.tonemapping));
        assert!(before(p.taa, p.image_copy));
    }

    #[test]
    fn test_forward_parents() {
        let fixture = Fixture::new();
        let executions = fixture.build(FrameParameters::new(1920, 1080));
        let p = &fixture.passes;
        let forward = find(&executions, p.forward);

        let mut expected = vec![p.pre_expose, p.depth_prepass, p.light_matrix];
        expected.extend(p.shadow_cascades.iter().copied());
        assert_eq!(forward.parents, expected);
        assert_eq!(forward.resources.sampled_images.len(), 4 + 4);
    }

    #[test]
    fn test_first_frame_runs_ibl_before_forward() {
        let fixture = Fixture::new();
        let frame = FrameParameters {
            run_ibl: true,
            run_brdf_lut: true,
            ..FrameParameters::new(1920, 1080)
        };
        let executions = fixture.build(frame);
        let p = &fixture.passes;

        let forward = find(&executions, p.forward);
        for pass in p.ibl_chain().chain([p.brdf_lut]) {
            assert!(forward.depends_on(pass), "{pass:?}");
        }

        assert_eq!(find(&executions, p.cubemap_mips[0]).parents, vec![p.copy_to_cube]);
        assert_eq!(find(&executions, p.cubemap_mips[3]).parents, vec![p.cubemap_mips[2]]);
        assert_eq!(find(&executions, p.diffuse_convolution).parents, p.cubemap_mips);
        assert_eq!(find(&executions, p.specular_convolutions[5]).parents, p.cubemap_mips);

        compiler::compile(&executions).unwrap();
    }

    #[test]
    fn test_brdf_lut_only_refresh() {
        let fixture = Fixture::new();
        let frame = FrameParameters {
            run_brdf_lut: true,
            ..FrameParameters::new(1920, 1080)
        };
        let executions = fixture.build(frame);
        let p = &fixture.passes;

        assert!(find(&executions, p.forward).depends_on(p.brdf_lut));
        assert_eq!(find(&executions, p.forward).parents[0], p.brdf_lut);
        assert!(!executions.iter().any(|e| e.handle == p.copy_to_cube));
        assert_eq!(find(&executions, p.brdf_lut).dispatch_count, [64, 64, 1]);
    }

    #[test]
    fn test_ibl_dispatch_and_mips() {
        let fixture = Fixture::new();
        let executions = fixture.builder().ibl_chain().unwrap();
        let p = &fixture.passes;

        assert_eq!(find(&executions, p.copy_to_cube).dispatch_count, [128, 128, 6]);
        let mip2 = find(&executions, p.cubemap_mips[1]);
        assert_eq!(mip2.dispatch_count, [32, 32, 6]);
        assert_eq!(mip2.resources.storage_images[0].mip_level, 1);
        assert_eq!(mip2.resources.storage_images[1].mip_level, 2);

        let specular = find(&executions, p.specular_convolutions[2]);
        assert_eq!(specular.dispatch_count, [16, 16, 6]);
        assert_eq!(specular.resources.storage_images[0].mip_level, 2);
        assert_eq!(find(&executions, p.diffuse_convolution).dispatch_count, [32, 32, 6]);
    }

    #[test]
    fn test_debug_geometry_edge() {
        let fixture = Fixture::new();
        let p = &fixture.passes;

        let executions = fixture.build(FrameParameters::new(1920, 1080));
        assert_eq!(find(&executions, p.sky).parents, vec![p.forward]);
        assert!(!executions.iter().any(|e| e.handle == p.debug));

        let frame = FrameParameters {
            draw_debug_geometry: true,
            ..FrameParameters::new(1920, 1080)
        };
        let executions = fixture.build(frame);
        assert_eq!(find(&executions, p.sky).parents, vec![p.forward, p.debug]);
        assert_eq!(find(&executions, p.debug).parents, vec![p.forward]);
    }

    #[test]
    fn test_depth_pyramid_bindings() {
        let fixture = Fixture::new();
        let executions = fixture.build(FrameParameters::new(1920, 1080));
        let p = &fixture.passes;

        let pyramid = find(&executions, p.depth_pyramid);
        assert_eq!(pyramid.dispatch_count, [60, 34, 1]);
        let mips: Vec<(u32, u32)> = pyramid
            .resources
            .storage_images
            .iter()
            .map(|r| (r.binding, r.mip_level))
            .collect();
        assert_eq!(mips.len(), 11);
        assert_eq!(mips[0], (0, 0));
        assert_eq!(mips[1], (1, 0));
        assert_eq!(mips[10], (10, 9));

        let light = find(&executions, p.light_matrix);
        assert_eq!(light.resources.storage_images[0].mip_level, 9);
        assert_eq!(light.resources.storage_images[0].binding, 1);
    }

    #[test]
    fn test_screen_dispatch() {
        let fixture = Fixture::new();
        let executions = fixture.build(FrameParameters::new(1280, 720));
        let p = &fixture.passes;
        assert_eq!(find(&executions, p.taa).dispatch_count, [160, 90, 1]);
        assert_eq!(find(&executions, p.tonemapping).dispatch_count, [160, 90, 1]);
        assert_eq!(find(&executions, p.histogram_per_tile).dispatch_count, [40, 23, 1]);
        assert_eq!(find(&executions, p.histogram_combine).dispatch_count, [40 * 23, 2, 1]);
        assert_eq!(find(&executions, p.pre_expose).dispatch_count, [1, 1, 1]);
    }

    #[test]
    fn test_tonemapping_writes_swapchain() {
        let fixture = Fixture::new();
        let executions = fixture.build(FrameParameters::new(1920, 1080));
        let tonemapping = find(&executions, fixture.passes.tonemapping);
        assert_eq!(
            tonemapping.resources.storage_images[0].image,
            fixture.backend.swapchain_input_image()
        );
    }

    #[test]
    fn test_sky_occlusion_executions() {
        let fixture = Fixture::new();
        let volume = ImageHandle::from_raw(99);
        let [shadow, gather] = fixture
            .builder()
            .sky_occlusion(volume, UVec3::new(64, 16, 32))
            .unwrap();
        assert!(shadow.parents.is_empty());
        assert_eq!(gather.parents, vec![fixture.passes.sky_shadow]);
        assert_eq!(gather.dispatch_count, [16, 4, 8]);
        assert_eq!(gather.resources.storage_images[0].image, volume);
    }
}
