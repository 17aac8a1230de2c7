//! GPU-visible data layouts.
//!
//! These structs are uploaded verbatim, so their layout matches the shader
//! side and their sizes are pinned below.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

/// Per-frame values shared by every shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GlobalShaderInfo {
    /// Direction towards the sun, `w` unused.
    pub sun_direction: Vec4,
    pub sun_color: Vec4,
    pub camera_position: Vec4,
    pub camera_right: Vec4,
    pub camera_up: Vec4,
    pub camera_forward: Vec4,
    pub sun_illuminance_lux: f32,
    pub sky_illuminance: f32,
    pub exposure_offset: f32,
    pub exposure_adaption_speed_ev_per_second: f32,
    pub delta_time: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_tan_fov_half: f32,
    pub camera_aspect_ratio: f32,
    pub _padding0: f32,
    pub current_frame_camera_jitter: Vec2,
    pub previous_frame_camera_jitter: Vec2,
    pub _padding1: [f32; 2],
}

/// Per-sample data of the sky occlusion bake.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SkyOcclusionRenderData {
    pub shadow_matrix: Mat4,
    pub sample_direction: Vec4,
    /// Volume center in world space.
    pub offset: Vec4,
    /// Volume extent in world space.
    pub extends: Vec4,
    /// Contribution of one sample, `1 / sample count`.
    pub weight: f32,
    pub _padding: [f32; 3],
}

/// The two matrices pushed per draw call.
///
/// Their meaning depends on the pass: forward shading takes `{mvp, model}`,
/// the depth prepass `{mvp, previous mvp}`, shadow cascades
/// `{identity, model}` and debug geometry `{view projection, identity}`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawTransform {
    pub primary: Mat4,
    pub secondary: Mat4,
}

impl DrawTransform {
    pub fn new(primary: Mat4, secondary: Mat4) -> Self {
        Self { primary, secondary }
    }
}

impl Default for DrawTransform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

static_assertions::const_assert_eq!(std::mem::size_of::<GlobalShaderInfo>(), 160);
static_assertions::const_assert_eq!(std::mem::size_of::<SkyOcclusionRenderData>(), 128);
static_assertions::const_assert_eq!(std::mem::size_of::<DrawTransform>(), 128);
