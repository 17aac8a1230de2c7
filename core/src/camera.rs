//! Perspective camera description.
//!
//! A camera is split into its extrinsic part (pose in the world) and its
//! intrinsic part (projection parameters), mirroring how a renderer receives
//! them: the pose changes every frame, the projection only on resize.

use glam::{Mat4, Vec3};

use crate::math::stable_up_vector;

/// Camera pose in world space.
///
/// `forward`, `up` and `right` form a right-handed orthonormal basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraExtrinsic {
    /// World space position.
    pub position: Vec3,
    /// Viewing direction.
    pub forward: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Right direction.
    pub right: Vec3,
}

impl Default for CameraExtrinsic {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
        }
    }
}

impl CameraExtrinsic {
    /// Pose at `position` looking at `target`.
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Self {
                position,
                ..Self::default()
            };
        }
        let right = forward.cross(stable_up_vector(forward)).normalize();
        let up = right.cross(forward);
        Self {
            position,
            forward,
            up,
            right,
        }
    }

    /// World to view space transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }
}

/// Projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsic {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Width divided by height.
    pub aspect_ratio: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

impl Default for CameraIntrinsic {
    fn default() -> Self {
        Self {
            fov: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl CameraIntrinsic {
    /// Perspective projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    /// `tan(fov / 2)`, used to reconstruct view rays in shaders.
    pub fn tan_half_fov(&self) -> f32 {
        (self.fov.to_radians() * 0.5).tan()
    }
}

/// A complete camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub extrinsic: CameraExtrinsic,
    pub intrinsic: CameraIntrinsic,
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        self.extrinsic.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.intrinsic.projection_matrix()
    }

    /// Projection times view, without jitter.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_builds_orthonormal_basis() {
        let e = CameraExtrinsic::look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        assert!((e.forward.length() - 1.0).abs() < 1e-5);
        assert!(e.forward.dot(e.up).abs() < 1e-5);
        assert!(e.forward.dot(e.right).abs() < 1e-5);
        assert!((e.right.cross(e.up) - (-e.forward)).length() < 1e-4);
    }

    #[test]
    fn test_look_at_straight_down() {
        let e = CameraExtrinsic::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert!(e.up.is_finite());
        assert!(e.right.is_finite());
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let e = CameraExtrinsic::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let p = e.view_matrix().transform_point3(Vec3::ZERO);
        // Right-handed view space looks down -Z.
        assert!((p.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_tan_half_fov() {
        let intrinsic = CameraIntrinsic {
            fov: 90.0,
            ..Default::default()
        };
        assert!((intrinsic.tan_half_fov() - 1.0).abs() < 1e-5);
    }
}
