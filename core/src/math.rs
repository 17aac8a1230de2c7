//! Math type re-exports and helper functions.
//!
//! Rendering math is `f32` [`glam`] throughout. The helpers here are the small
//! pieces of numeric glue the frame orchestration needs: mip chain lengths,
//! low-discrepancy sample sequences and angle-to-direction conversion.

pub use glam::{IVec3, Mat4, UVec2, UVec3, Vec2, Vec3, Vec4};

// ===== Mip chains =====

/// Number of mip levels in a full chain for an image of the given extent.
///
/// A 1×1×1 image has one level. Zero-sized axes are treated as one texel.
pub fn mip_count_from_resolution(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    32 - largest.leading_zeros()
}

/// Smallest power of two that is greater than or equal to `value`.
///
/// Values at or below one map to one.
pub fn next_power_of_two_f32(value: f32) -> u32 {
    if value <= 1.0 {
        return 1;
    }
    let exponent = value.log2().ceil() as u32;
    1u32.checked_shl(exponent).unwrap_or(u32::MAX)
}

// ===== Sampling =====

/// Van der Corput radical inverse in base 2.
pub fn radical_inverse_vdc(index: u32) -> f32 {
    // 2^-32
    index.reverse_bits() as f32 * 2.328_306_4e-10
}

/// The `index`-th point of a `count`-point Hammersley set in `[0, 1)^2`.
pub fn hammersley_2d(index: u32, count: u32) -> Vec2 {
    let count = count.max(1);
    Vec2::new(index as f32 / count as f32, radical_inverse_vdc(index))
}

/// Map a unit-square sample to a direction on the upper (+Y) hemisphere with
/// uniform solid-angle density.
pub fn uniform_hemisphere_direction(sample: Vec2) -> Vec3 {
    let cos_theta = 1.0 - sample.x;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * std::f32::consts::PI * sample.y;
    Vec3::new(phi.cos() * sin_theta, cos_theta, phi.sin() * sin_theta)
}

// ===== Directions =====

/// Convert a pair of angles in degrees (azimuth, elevation) to a unit vector.
///
/// `x` rotates around the vertical axis, `y` tilts up from the horizon.
pub fn direction_to_vector(angles_degrees: Vec2) -> Vec3 {
    let azimuth = angles_degrees.x.to_radians();
    let elevation = angles_degrees.y.to_radians();
    Vec3::new(
        elevation.cos() * azimuth.cos(),
        elevation.sin(),
        elevation.cos() * azimuth.sin(),
    )
    .normalize_or_zero()
}

/// Pick an up vector that is not parallel to `forward`.
pub fn stable_up_vector(forward: Vec3) -> Vec3 {
    if forward.normalize_or_zero().y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    }
}
