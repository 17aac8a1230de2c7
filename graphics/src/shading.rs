//! Shader variant tracking.
//!
//! User facing shading options are baked into pipelines as specialisation
//! constants. Every option change bumps a version counter of each pipeline
//! that depends on it; a pipeline is stale while its counter is ahead of the
//! version last pushed to the backend. The BRDF lookup table is the odd one
//! out: its description is pushed during reconciliation but it only counts
//! as up to date once the LUT pass has actually run.

use crate::backend::RenderBackend;
use crate::catalog::Passes;
use crate::dispatch::DepthPyramidLayout;
use crate::shader::{GraphicPassShaderDescriptions, ShaderDescription};

/// Diffuse BRDF model of the forward pass and the LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DiffuseBrdf {
    Lambert = 0,
    Disney = 1,
    CoDWWII = 2,
    #[default]
    Titanfall2 = 3,
}

/// Energy compensation for multiple scattering on direct light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DirectMultiscatterBrdf {
    #[default]
    McAuley = 0,
    Simplified = 1,
    ScaledGgxLobe = 2,
    None = 3,
}

/// Shading options of the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingConfig {
    pub diffuse_brdf: DiffuseBrdf,
    pub direct_multiscatter: DirectMultiscatterBrdf,
    pub use_indirect_multiscatter: bool,
    pub use_geometry_aa: bool,
    pub use_sky_occlusion: bool,
    pub use_sky_occlusion_direction: bool,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            diffuse_brdf: DiffuseBrdf::Titanfall2,
            direct_multiscatter: DirectMultiscatterBrdf::McAuley,
            use_indirect_multiscatter: true,
            use_geometry_aa: true,
            use_sky_occlusion: true,
            use_sky_occlusion_direction: false,
        }
    }
}

/// Temporal anti-aliasing options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaaSettings {
    pub use_clipping: bool,
    pub use_variance_clipping: bool,
    pub use_ycocg: bool,
    pub use_motion_vector_dilation: bool,
    /// Mip bias applied when sampling material textures in the forward pass.
    pub texture_lod_bias: f32,
}

impl Default for TaaSettings {
    fn default() -> Self {
        Self {
            use_clipping: true,
            use_variance_clipping: true,
            use_ycocg: true,
            use_motion_vector_dilation: true,
            texture_lod_bias: -0.5,
        }
    }
}

/// A single option change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShadingOption {
    DiffuseBrdf(DiffuseBrdf),
    DirectMultiscatter(DirectMultiscatterBrdf),
    IndirectMultiscatter(bool),
    GeometricAa(bool),
    SkyOcclusion(bool),
    SkyOcclusionDirection(bool),
    TaaClipping(bool),
    TaaVarianceClipping(bool),
    TaaYCoCg(bool),
    TaaMotionVectorDilation(bool),
    TextureLodBias(f32),
}

/// Version of one pipeline's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TargetVersion {
    current: u64,
    applied: u64,
}

impl TargetVersion {
    fn bump(&mut self) {
        self.current += 1;
    }

    fn is_stale(&self) -> bool {
        self.current != self.applied
    }

    fn mark_applied(&mut self) {
        self.applied = self.current;
    }

    /// Mark `version` as applied. Later bumps stay stale.
    fn mark_applied_at(&mut self, version: u64) {
        self.applied = self.applied.max(version.min(self.current));
    }
}

/// Pipelines touched by an option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Targets {
    main: bool,
    brdf_lut: bool,
    taa: bool,
}

/// Replace `field` with `value`; returns whether it changed.
fn replace<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

/// Which pipelines a reconciliation updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub main_pass: bool,
    pub brdf_lut: bool,
    pub taa: bool,
    /// LUT configuration version the backend pipeline holds afterwards.
    pub brdf_lut_version: u64,
}

impl ReconcileReport {
    pub fn any(&self) -> bool {
        self.main_pass || self.brdf_lut || self.taa
    }
}

/// Versioned shading and TAA configuration.
#[derive(Debug, Clone)]
pub struct ShaderVariantTracker {
    shading: ShadingConfig,
    taa: TaaSettings,
    specular_probe_mip_count: u32,
    main: TargetVersion,
    brdf_lut: TargetVersion,
    taa_version: TargetVersion,
}

impl ShaderVariantTracker {
    /// A tracker whose pipelines are built from the current configuration.
    pub fn new(shading: ShadingConfig, taa: TaaSettings, specular_probe_mip_count: u32) -> Self {
        Self {
            shading,
            taa,
            specular_probe_mip_count,
            main: TargetVersion::default(),
            brdf_lut: TargetVersion::default(),
            taa_version: TargetVersion::default(),
        }
    }

    pub fn shading(&self) -> &ShadingConfig {
        &self.shading
    }

    pub fn taa(&self) -> &TaaSettings {
        &self.taa
    }

    /// Apply one option. Returns `false` if the value was already current.
    pub fn set_option(&mut self, option: ShadingOption) -> bool {
        let main_only = Targets {
            main: true,
            ..Default::default()
        };
        let taa_only = Targets {
            taa: true,
            ..Default::default()
        };

        let s = &mut self.shading;
        let t = &mut self.taa;
        let (changed, targets) = match option {
            // the LUT integrates the diffuse BRDF, so it is stale as well
            ShadingOption::DiffuseBrdf(v) => (
                replace(&mut s.diffuse_brdf, v),
                Targets {
                    main: true,
                    brdf_lut: true,
                    taa: false,
                },
            ),
            ShadingOption::DirectMultiscatter(v) => {
                (replace(&mut s.direct_multiscatter, v), main_only)
            }
            ShadingOption::IndirectMultiscatter(v) => {
                (replace(&mut s.use_indirect_multiscatter, v), main_only)
            }
            ShadingOption::GeometricAa(v) => (replace(&mut s.use_geometry_aa, v), main_only),
            ShadingOption::SkyOcclusion(v) => (replace(&mut s.use_sky_occlusion, v), main_only),
            ShadingOption::SkyOcclusionDirection(v) => {
                (replace(&mut s.use_sky_occlusion_direction, v), main_only)
            }
            ShadingOption::TaaClipping(v) => (replace(&mut t.use_clipping, v), taa_only),
            ShadingOption::TaaVarianceClipping(v) => {
                (replace(&mut t.use_variance_clipping, v), taa_only)
            }
            ShadingOption::TaaYCoCg(v) => (replace(&mut t.use_ycocg, v), taa_only),
            ShadingOption::TaaMotionVectorDilation(v) => {
                (replace(&mut t.use_motion_vector_dilation, v), taa_only)
            }
            ShadingOption::TextureLodBias(v) => (replace(&mut t.texture_lod_bias, v), main_only),
        };

        if changed {
            if targets.main {
                self.main.bump();
            }
            if targets.brdf_lut {
                self.brdf_lut.bump();
            }
            if targets.taa {
                self.taa_version.bump();
            }
        }
        changed
    }

    pub fn is_main_pass_stale(&self) -> bool {
        self.main.is_stale()
    }

    pub fn is_brdf_lut_stale(&self) -> bool {
        self.brdf_lut.is_stale()
    }

    pub fn is_taa_stale(&self) -> bool {
        self.taa_version.is_stale()
    }

    /// Push the descriptions of stale pipelines to the backend.
    ///
    /// Main pass and TAA staleness clear here. The LUT stays stale until
    /// [`mark_brdf_lut_executed`](Self::mark_brdf_lut_executed).
    pub fn reconcile(&mut self, backend: &dyn RenderBackend, passes: &Passes) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if self.main.is_stale() {
            backend.update_graphic_pass_shader_description(
                passes.forward,
                &self.forward_shader_description(),
            );
            self.main.mark_applied();
            report.main_pass = true;
        }
        if self.brdf_lut.is_stale() {
            backend.update_compute_pass_shader_description(
                passes.brdf_lut,
                &self.brdf_lut_shader_description(),
            );
            report.brdf_lut = true;
        }
        report.brdf_lut_version = self.brdf_lut.current;
        if self.taa_version.is_stale() {
            backend.update_compute_pass_shader_description(passes.taa, &self.taa_shader_description());
            self.taa_version.mark_applied();
            report.taa = true;
        }

        if report.any() {
            log::debug!("Reconciled shader variants: {:?}", report);
        }
        report
    }

    /// Record that the LUT pass ran with the configuration `version`
    /// reported by [`reconcile`](Self::reconcile).
    pub fn mark_brdf_lut_executed(&mut self, version: u64) {
        self.brdf_lut.mark_applied_at(version);
    }

    /// Forward pass shaders with the current configuration baked in.
    pub fn forward_shader_description(&self) -> GraphicPassShaderDescriptions {
        let mut desc = GraphicPassShaderDescriptions::from_name("triangle");
        let s = &self.shading;
        desc.fragment = desc
            .fragment
            .with_constant(0, s.diffuse_brdf as u32)
            .with_constant(1, s.direct_multiscatter as u32)
            .with_constant(2, s.use_indirect_multiscatter)
            .with_constant(3, s.use_geometry_aa)
            .with_constant(4, self.specular_probe_mip_count)
            .with_constant(5, self.taa.texture_lod_bias)
            .with_constant(6, s.use_sky_occlusion)
            .with_constant(7, s.use_sky_occlusion_direction);
        desc
    }

    pub fn brdf_lut_shader_description(&self) -> ShaderDescription {
        ShaderDescription::new("brdfLut.comp").with_constant(0, self.shading.diffuse_brdf as u32)
    }

    pub fn taa_shader_description(&self) -> ShaderDescription {
        let t = &self.taa;
        ShaderDescription::new("taa.comp")
            .with_constant(0, t.use_clipping)
            .with_constant(1, t.use_variance_clipping)
            .with_constant(2, t.use_ycocg)
            .with_constant(3, t.use_motion_vector_dilation)
    }
}

/// Depth pyramid shader for a `width` × `height` screen.
pub fn depth_pyramid_shader_description(width: u32, height: u32) -> ShaderDescription {
    let layout = DepthPyramidLayout::new(width, height);
    ShaderDescription::new("depthHiZPyramid.comp")
        .with_constant(0, layout.mip_count)
        .with_constant(1, width)
        .with_constant(2, height)
        .with_constant(3, layout.thread_group_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dummy::{DummyBackend, RecordedShaders};
    use crate::catalog::FrameResources;
    use crate::settings::RendererSettings;
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

    fn tracker() -> ShaderVariantTracker {
        ShaderVariantTracker::new(ShadingConfig::default(), TaaSettings::default(), 6)
    }

    fn declare_passes(backend: &DummyBackend) -> Passes {
        let settings = RendererSettings::default();
        let resources =
            FrameResources::create(backend, &NoImages, &settings, 1920, 1080).unwrap();
        Passes::declare(backend, &settings, &resources, &tracker(), 1920, 1080).unwrap()
    }

    #[test]
    fn test_fresh_tracker_is_not_stale() {
        let t = tracker();
        assert!(!t.is_main_pass_stale());
        assert!(!t.is_brdf_lut_stale());
        assert!(!t.is_taa_stale());
    }

    #[test]
    fn test_diffuse_brdf_raises_main_and_lut() {
        let mut t = tracker();
        assert!(t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Lambert)));
        assert!(t.is_main_pass_stale());
        assert!(t.is_brdf_lut_stale());
        assert!(!t.is_taa_stale());
    }

    #[test]
    fn test_same_value_raises_nothing() {
        let mut t = tracker();
        assert!(!t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Titanfall2)));
        assert!(!t.set_option(ShadingOption::TaaClipping(true)));
        assert!(!t.set_option(ShadingOption::TextureLodBias(-0.5)));
        assert!(!t.is_main_pass_stale());
        assert!(!t.is_brdf_lut_stale());
        assert!(!t.is_taa_stale());
    }

    #[test]
    fn test_option_targets() {
        let mut t = tracker();
        t.set_option(ShadingOption::TaaYCoCg(false));
        assert!(t.is_taa_stale());
        assert!(!t.is_main_pass_stale());

        let mut t = tracker();
        t.set_option(ShadingOption::TextureLodBias(0.0));
        assert!(t.is_main_pass_stale());
        assert!(!t.is_taa_stale());

        let mut t = tracker();
        t.set_option(ShadingOption::GeometricAa(false));
        assert!(t.is_main_pass_stale());
        assert!(!t.is_brdf_lut_stale());
    }

    #[test]
    fn test_lut_clears_only_when_executed() {
        let mut t = tracker();
        t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Disney));
        t.main.mark_applied();
        assert!(t.is_brdf_lut_stale());
        t.mark_brdf_lut_executed(t.brdf_lut.current);
        assert!(!t.is_brdf_lut_stale());
    }

    #[test]
    fn test_lut_change_after_reconcile_stays_stale() {
        let backend = DummyBackend::new();
        let passes = declare_passes(&backend);
        let mut t = tracker();

        t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Lambert));
        let report = t.reconcile(&backend, &passes);
        assert!(report.brdf_lut);

        // changed again before the frame holding the Lambert LUT ran
        t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::Disney));
        t.mark_brdf_lut_executed(report.brdf_lut_version);
        assert!(t.is_brdf_lut_stale());

        let report = t.reconcile(&backend, &passes);
        assert!(report.brdf_lut);
        t.mark_brdf_lut_executed(report.brdf_lut_version);
        assert!(!t.is_brdf_lut_stale());
        match backend.pass(passes.brdf_lut).map(|p| p.shaders) {
            Some(RecordedShaders::Compute(lut)) => assert_eq!(lut.constant_u32(0), Some(1)),
            other => panic!("unexpected LUT pass: {other:?}"),
        }
    }

    #[test]
    fn test_forward_slot_map() {
        let mut t = tracker();
        t.set_option(ShadingOption::DirectMultiscatter(DirectMultiscatterBrdf::ScaledGgxLobe));
        t.set_option(ShadingOption::TextureLodBias(0.25));
        let desc = t.forward_shader_description();

        assert_eq!(desc.vertex.src_path_relative, "triangle.vert");
        let f = &desc.fragment;
        assert_eq!(f.constant_u32(0), Some(3));
        assert_eq!(f.constant_u32(1), Some(2));
        assert_eq!(f.constant_u32(2), Some(1));
        assert_eq!(f.constant_u32(3), Some(1));
        assert_eq!(f.constant_u32(4), Some(6));
        assert_eq!(f.constant_f32(5), Some(0.25));
        assert_eq!(f.constant_u32(6), Some(1));
        assert_eq!(f.constant_u32(7), Some(0));
        let locations: Vec<u32> = f.specialisation_constants.iter().map(|c| c.location).collect();
        assert_eq!(locations, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_brdf_lut_and_taa_slot_maps() {
        let mut t = tracker();
        t.set_option(ShadingOption::DiffuseBrdf(DiffuseBrdf::CoDWWII));
        t.set_option(ShadingOption::TaaVarianceClipping(false));

        assert_eq!(t.brdf_lut_shader_description().constant_u32(0), Some(2));
        let taa = t.taa_shader_description();
        assert_eq!(taa.src_path_relative, "taa.comp");
        assert_eq!(taa.constant_u32(0), Some(1));
        assert_eq!(taa.constant_u32(1), Some(0));
        assert_eq!(taa.constant_u32(2), Some(1));
        assert_eq!(taa.constant_u32(3), Some(1));
    }

    #[test]
    fn test_depth_pyramid_description() {
        let desc = depth_pyramid_shader_description(1920, 1080);
        assert_eq!(desc.constant_u32(0), Some(10));
        assert_eq!(desc.constant_u32(1), Some(1920));
        assert_eq!(desc.constant_u32(2), Some(1080));
        assert_eq!(desc.constant_u32(3), Some(60 * 34));
    }
}
