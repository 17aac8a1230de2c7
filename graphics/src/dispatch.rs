//! Thread group counts of the compute passes.
//!
//! All functions are pure; resolution dependent counts are recomputed every
//! frame from the live screen size.

use glam::UVec3;
use plain_core::math::mip_count_from_resolution;

use crate::bindings::MAX_DEPTH_PYRAMID_MIPS;

/// Local size of the full-screen and probe compute shaders.
const SCREEN_GROUP_SIZE: u32 = 8;
/// Histogram bins handled per thread group.
const HISTOGRAM_BINS_PER_GROUP: u32 = 64;
/// Local size of the sky occlusion gather shader on each axis.
const SKY_OCCLUSION_GROUP_SIZE: u32 = 4;
/// Unused mips from which the pyramid is reduced by a single group.
const DEPTH_PYRAMID_SINGLE_GROUP_UNUSED_MIPS: u32 = 6;
/// Mip 0 area covered by one full size pyramid group.
const DEPTH_PYRAMID_GROUP_EXTENT: u32 = 32;

fn ceil_div(value: u32, divisor: u32) -> u32 {
    value.div_ceil(divisor)
}

/// Number of histogram tiles covering the screen.
pub fn histogram_tile_count(width: u32, height: u32, tile_size: u32) -> u32 {
    ceil_div(width, tile_size) * ceil_div(height, tile_size)
}

pub fn histogram_per_tile(width: u32, height: u32, tile_size: u32) -> [u32; 3] {
    [ceil_div(width, tile_size), ceil_div(height, tile_size), 1]
}

pub fn histogram_reset(bin_count: u32) -> [u32; 3] {
    [ceil_div(bin_count, HISTOGRAM_BINS_PER_GROUP), 1, 1]
}

pub fn histogram_combine(width: u32, height: u32, tile_size: u32, bin_count: u32) -> [u32; 3] {
    [
        histogram_tile_count(width, height, tile_size),
        ceil_div(bin_count, HISTOGRAM_BINS_PER_GROUP),
        1,
    ]
}

/// One group per full-screen 8×8 block (TAA, history copy, tonemapping).
pub fn screen_space(width: u32, height: u32) -> [u32; 3] {
    [
        ceil_div(width, SCREEN_GROUP_SIZE),
        ceil_div(height, SCREEN_GROUP_SIZE),
        1,
    ]
}

/// Layout of the half resolution min/max depth pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthPyramidLayout {
    /// Full mip chain of the pyramid.
    pub mip_count: u32,
    /// Shader mip slots left unused by this resolution.
    pub unused_mips: u32,
    /// Thread groups along x and y.
    pub dispatch: [u32; 2],
}

impl DepthPyramidLayout {
    /// Layout for a `width` × `height` screen; the pyramid itself is half that.
    pub fn new(width: u32, height: u32) -> Self {
        let mip_count = mip_count_from_resolution(width / 2, height / 2, 1);
        if mip_count > MAX_DEPTH_PYRAMID_MIPS {
            log::warn!(
                "Depth pyramid mip count {} exceeds the shader maximum of {}",
                mip_count,
                MAX_DEPTH_PYRAMID_MIPS
            );
        }
        let unused_mips = MAX_DEPTH_PYRAMID_MIPS.saturating_sub(mip_count);

        let dispatch = if unused_mips >= DEPTH_PYRAMID_SINGLE_GROUP_UNUSED_MIPS {
            [1, 1]
        } else {
            let extent = (DEPTH_PYRAMID_GROUP_EXTENT >> unused_mips) as f32;
            [
                (width as f32 * 0.5 / extent).ceil() as u32,
                (height as f32 * 0.5 / extent).ceil() as u32,
            ]
        };

        Self {
            mip_count,
            unused_mips,
            dispatch,
        }
    }

    pub fn dispatch_count(&self) -> [u32; 3] {
        [self.dispatch[0], self.dispatch[1], 1]
    }

    /// Total thread groups, baked into the shader for its completion counter.
    pub fn thread_group_count(&self) -> u32 {
        self.dispatch[0] * self.dispatch[1]
    }

    /// Pyramid mip written through shader storage slot `slot`.
    pub fn mip_for_slot(&self, slot: u32) -> u32 {
        slot.checked_sub(self.unused_mips).unwrap_or(0)
    }

    /// Coarsest mip, read by the light matrix pass.
    pub fn lowest_mip(&self) -> u32 {
        self.mip_count.saturating_sub(1)
    }
}

pub fn cubemap_copy(sky_resolution: u32) -> [u32; 3] {
    let groups = sky_resolution / SCREEN_GROUP_SIZE;
    [groups, groups, 6]
}

/// Groups for writing sky cubemap mip `mip` (at least 1).
pub fn cubemap_mip(sky_resolution: u32, mip: u32) -> [u32; 3] {
    let groups = (sky_resolution / SCREEN_GROUP_SIZE >> mip).max(1);
    [groups, groups, 6]
}

pub fn diffuse_convolution(probe_resolution: u32) -> [u32; 3] {
    let groups = probe_resolution / SCREEN_GROUP_SIZE;
    [groups, groups, 6]
}

/// Groups for convolving specular probe mip `mip` (at least 1).
pub fn specular_convolution(probe_resolution: u32, mip: u32) -> [u32; 3] {
    let groups = ((probe_resolution >> mip) / SCREEN_GROUP_SIZE).max(1);
    [groups, groups, 6]
}

pub fn brdf_lut(lut_resolution: u32) -> [u32; 3] {
    let groups = lut_resolution / SCREEN_GROUP_SIZE;
    [groups, groups, 1]
}

pub fn sky_occlusion_gather(volume_resolution: UVec3) -> [u32; 3] {
    [
        ceil_div(volume_resolution.x, SKY_OCCLUSION_GROUP_SIZE),
        ceil_div(volume_resolution.y, SKY_OCCLUSION_GROUP_SIZE),
        ceil_div(volume_resolution.z, SKY_OCCLUSION_GROUP_SIZE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_dispatch() {
        assert_eq!(histogram_per_tile(1920, 1080, 32), [60, 34, 1]);
        assert_eq!(histogram_reset(128), [2, 1, 1]);
        assert_eq!(histogram_combine(1920, 1080, 32, 128), [60 * 34, 2, 1]);
    }

    #[test]
    fn test_screen_space_dispatch() {
        assert_eq!(screen_space(1920, 1080), [240, 135, 1]);
        assert_eq!(screen_space(1, 1), [1, 1, 1]);
        assert_eq!(screen_space(1921, 1081), [241, 136, 1]);
    }

    #[test]
    fn test_depth_pyramid_full_hd() {
        // 960x540 has a 10 mip chain, one unused slot
        let layout = DepthPyramidLayout::new(1920, 1080);
        assert_eq!(layout.mip_count, 10);
        assert_eq!(layout.unused_mips, 1);
        assert_eq!(layout.dispatch, [60, 34]);
        assert_eq!(layout.thread_group_count(), 60 * 34);
        assert_eq!(layout.lowest_mip(), 9);
    }

    #[test]
    fn test_depth_pyramid_small_screen_single_group() {
        // 32x32 pyramid: 6 mips, 5 unused, one texel per group
        let layout = DepthPyramidLayout::new(64, 64);
        assert_eq!(layout.unused_mips, 5);
        assert_eq!(layout.dispatch, [32, 32]);

        // 16x16 pyramid: 5 mips, 6 unused
        let layout = DepthPyramidLayout::new(32, 32);
        assert_eq!(layout.unused_mips, 6);
        assert_eq!(layout.dispatch, [1, 1]);
    }

    #[test]
    fn test_depth_pyramid_dispatch_law() {
        for &(w, h) in &[(1, 1), (7, 3), (640, 480), (1280, 720), (2560, 1440), (3840, 2160)] {
            let layout = DepthPyramidLayout::new(w, h);
            let unused = 11 - mip_count_from_resolution(w / 2, h / 2, 1);
            if unused >= 6 {
                assert_eq!(layout.dispatch, [1, 1], "{w}x{h}");
            } else {
                let extent = 32.0 / 2f32.powi(unused as i32);
                let expected = [
                    (w as f32 / 2.0 / extent).ceil() as u32,
                    (h as f32 / 2.0 / extent).ceil() as u32,
                ];
                assert_eq!(layout.dispatch, expected, "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_depth_pyramid_too_many_mips_clamps() {
        // 8192x8192 pyramid has 14 mips
        let layout = DepthPyramidLayout::new(16384, 16384);
        assert_eq!(layout.mip_count, 14);
        assert_eq!(layout.unused_mips, 0);
        assert_eq!(layout.dispatch, [256, 256]);
    }

    #[test]
    fn test_depth_pyramid_slot_mapping() {
        let layout = DepthPyramidLayout::new(1920, 1080);
        assert_eq!(layout.mip_for_slot(0), 0);
        assert_eq!(layout.mip_for_slot(1), 0);
        assert_eq!(layout.mip_for_slot(2), 1);
        assert_eq!(layout.mip_for_slot(10), 9);
    }

    #[test]
    fn test_ibl_dispatch() {
        assert_eq!(cubemap_copy(1024), [128, 128, 6]);
        assert_eq!(cubemap_mip(1024, 1), [64, 64, 6]);
        assert_eq!(cubemap_mip(1024, 7), [1, 1, 6]);
        assert_eq!(diffuse_convolution(256), [32, 32, 6]);
        assert_eq!(specular_convolution(512, 0), [64, 64, 6]);
        assert_eq!(specular_convolution(512, 5), [2, 2, 6]);
        assert_eq!(specular_convolution(512, 9), [1, 1, 6]);
        assert_eq!(brdf_lut(512), [64, 64, 1]);
    }

    #[test]
    fn test_sky_occlusion_gather_dispatch() {
        assert_eq!(sky_occlusion_gather(UVec3::new(256, 16, 2)), [64, 4, 1]);
    }
}
