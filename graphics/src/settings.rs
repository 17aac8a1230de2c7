//! Renderer configuration.

use std::path::PathBuf;

use glam::{Vec2, Vec3};
use plain_core::math::mip_count_from_resolution;

/// Number of mips too small to be worth convolving.
const SPECULAR_PROBE_SMALL_MIP_COUNT: u32 = 4;

/// Reference resolution the per-tile histogram buffer is sized for.
pub const HISTOGRAM_REFERENCE_RESOLUTION: (u32, u32) = (1920, 1080);

/// Fixed resolutions, counts and sample counts.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub shadow_map_resolution: u32,
    pub shadow_cascade_count: u32,
    pub sky_texture_resolution: u32,
    pub sky_texture_mip_count: u32,
    pub specular_probe_resolution: u32,
    pub diffuse_probe_resolution: u32,
    pub brdf_lut_resolution: u32,
    pub histogram_bin_count: u32,
    pub histogram_tile_size: u32,
    pub sky_shadow_map_resolution: u32,
    pub sky_occlusion_volume_max_resolution: u32,
    /// World units per sky occlusion texel.
    pub sky_occlusion_target_density: f32,
    pub sky_occlusion_sample_count: u32,
    /// Equirectangular HDR environment; the default sky texture is used when
    /// unset or unreadable.
    pub environment_map_path: Option<PathBuf>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shadow_map_resolution: 2048,
            shadow_cascade_count: 4,
            sky_texture_resolution: 1024,
            sky_texture_mip_count: 8,
            specular_probe_resolution: 512,
            diffuse_probe_resolution: 256,
            brdf_lut_resolution: 512,
            histogram_bin_count: 128,
            histogram_tile_size: 32,
            sky_shadow_map_resolution: 1024,
            sky_occlusion_volume_max_resolution: 256,
            sky_occlusion_target_density: 0.5,
            sky_occlusion_sample_count: 1024,
            environment_map_path: None,
        }
    }
}

impl RendererSettings {
    pub fn with_environment_map(mut self, path: impl Into<PathBuf>) -> Self {
        self.environment_map_path = Some(path.into());
        self
    }

    pub fn with_sky_occlusion_sample_count(mut self, count: u32) -> Self {
        self.sky_occlusion_sample_count = count;
        self
    }

    pub fn with_shadow_map_resolution(mut self, resolution: u32) -> Self {
        self.shadow_map_resolution = resolution;
        self
    }

    /// Mip levels of the specular probe that get convolved.
    pub fn specular_probe_mip_count(&self) -> u32 {
        specular_probe_mip_count(self.specular_probe_resolution)
    }

    pub fn histogram_settings(&self) -> HistogramSettings {
        HistogramSettings::new(self.histogram_tile_size)
    }
}

/// Full mip chain of a square probe minus the mips too small to convolve.
pub fn specular_probe_mip_count(resolution: u32) -> u32 {
    mip_count_from_resolution(resolution, resolution, 1)
        .saturating_sub(SPECULAR_PROBE_SMALL_MIP_COUNT)
}

/// Luminance histogram configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramSettings {
    pub min_value: f32,
    pub max_value: f32,
    /// Number of tiles the per-tile buffer has room for.
    pub max_tile_count: u32,
}

impl HistogramSettings {
    /// Sized for [`HISTOGRAM_REFERENCE_RESOLUTION`], not the live resolution.
    pub fn new(tile_size: u32) -> Self {
        let (width, height) = HISTOGRAM_REFERENCE_RESOLUTION;
        let pixels_per_tile = tile_size * tile_size;
        Self {
            min_value: 0.001,
            max_value: 200_000.0,
            max_tile_count: width * height / pixels_per_tile,
        }
    }
}

/// Sun and exposure parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingSettings {
    /// Sun direction as angles in degrees.
    pub sun_direction: Vec2,
    pub sun_color: Vec3,
    pub sun_illuminance_lux: f32,
    pub sky_illuminance: f32,
    pub exposure_offset: f32,
    pub exposure_adaption_speed_ev_per_second: f32,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            sun_direction: Vec2::new(-120.0, 150.0),
            sun_color: Vec3::ONE,
            sun_illuminance_lux: 100_000.0,
            sky_illuminance: 8_000.0,
            exposure_offset: 0.0,
            exposure_adaption_speed_ev_per_second: 2.0,
        }
    }
}

/// Debug geometry toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugSettings {
    pub draw_bounding_boxes: bool,
    /// Stop updating the camera frustum and draw it.
    pub freeze_and_draw_camera_frustum: bool,
    pub draw_shadow_frustum: bool,
}

impl DebugSettings {
    /// Whether any debug geometry is drawn this frame.
    pub fn any(&self) -> bool {
        self.draw_bounding_boxes || self.freeze_and_draw_camera_frustum || self.draw_shadow_frustum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specular_probe_mip_count() {
        // 512 has a 10 mip chain
        assert_eq!(specular_probe_mip_count(512), 6);
        assert_eq!(RendererSettings::default().specular_probe_mip_count(), 6);
    }

    #[test]
    fn test_specular_probe_mip_count_saturates() {
        assert_eq!(specular_probe_mip_count(8), 0);
        assert_eq!(specular_probe_mip_count(1), 0);
    }

    #[test]
    fn test_histogram_settings() {
        let settings = RendererSettings::default().histogram_settings();
        assert_eq!(settings.min_value, 0.001);
        assert_eq!(settings.max_value, 200_000.0);
        assert_eq!(settings.max_tile_count, 1920 * 1080 / (32 * 32));
    }

    #[test]
    fn test_debug_settings_any() {
        assert!(!DebugSettings::default().any());
        let settings = DebugSettings {
            draw_shadow_frustum: true,
            ..Default::default()
        };
        assert!(settings.any());
    }
}
