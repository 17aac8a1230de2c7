//! View frusta and frustum vs. bounding box tests.
//!
//! A [`ViewFrustum`] keeps both its eight corner points and the six planes
//! derived from them. The points are what debug drawing and frustum fitting
//! need, the planes are what culling needs. Planes are always rebuilt from the
//! points, so moving corners (see [`ViewFrustum::with_near_plane_offset`])
//! yields a consistent frustum.

use glam::{Mat4, Vec3};

use crate::bounds::{AxisAlignedBoundingBox, BOX_EDGE_INDICES};
use crate::camera::Camera;
use crate::math::stable_up_vector;
use crate::mesh::LineMesh;

/// The eight corners of a frustum.
///
/// Naming is `{left|right}_{lower|upper}_{near|far}`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrustumPoints {
    pub l_l_n: Vec3,
    pub r_l_n: Vec3,
    pub l_u_n: Vec3,
    pub r_u_n: Vec3,
    pub l_l_f: Vec3,
    pub r_l_f: Vec3,
    pub l_u_f: Vec3,
    pub r_u_f: Vec3,
}

impl FrustumPoints {
    /// Corners in the same order as [`AxisAlignedBoundingBox::corners`].
    pub fn to_array(&self) -> [Vec3; 8] {
        [
            self.l_l_n, self.r_l_n, self.l_u_n, self.r_u_n, self.l_l_f, self.r_l_f, self.l_u_f,
            self.r_u_f,
        ]
    }

    /// Average of all corners.
    pub fn center(&self) -> Vec3 {
        self.to_array().iter().copied().sum::<Vec3>() / 8.0
    }
}

/// A plane in Hessian normal form: `normal · p + distance = 0`.
///
/// Points with a positive signed distance are on the inner side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    /// Plane through three points, oriented so that `inside` has a
    /// non-negative signed distance.
    ///
    /// Degenerate (collinear) input yields a zero normal, which classifies
    /// every point as on the plane and therefore never culls.
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3, inside: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let plane = Self {
            normal,
            distance: -normal.dot(a),
        };
        if plane.signed_distance(inside) < 0.0 {
            Self {
                normal: -plane.normal,
                distance: -plane.distance,
            }
        } else {
            plane
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// A convex frustum given by corners and inward facing planes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewFrustum {
    pub points: FrustumPoints,
    /// Near, far, left, right, bottom, top.
    pub planes: [Plane; 6],
}

impl ViewFrustum {
    /// Build a frustum from its corners, deriving the planes.
    pub fn from_points(points: FrustumPoints) -> Self {
        let c = points.center();
        let p = &points;
        let planes = [
            Plane::from_points(p.l_l_n, p.r_l_n, p.l_u_n, c),
            Plane::from_points(p.l_l_f, p.r_l_f, p.l_u_f, c),
            Plane::from_points(p.l_l_n, p.l_u_n, p.l_l_f, c),
            Plane::from_points(p.r_l_n, p.r_u_n, p.r_l_f, c),
            Plane::from_points(p.l_l_n, p.r_l_n, p.l_l_f, c),
            Plane::from_points(p.l_u_n, p.r_u_n, p.l_u_f, c),
        ];
        Self { points, planes }
    }

    /// Perspective frustum of a camera.
    pub fn from_camera(camera: &Camera) -> Self {
        let e = &camera.extrinsic;
        let i = &camera.intrinsic;

        let tan = i.tan_half_fov();
        let corners_at = |distance: f32| {
            let center = e.position + e.forward * distance;
            let half_up = e.up * (distance * tan);
            let half_right = e.right * (distance * tan * i.aspect_ratio);
            (
                center - half_right - half_up,
                center + half_right - half_up,
                center - half_right + half_up,
                center + half_right + half_up,
            )
        };

        let (l_l_n, r_l_n, l_u_n, r_u_n) = corners_at(i.near);
        let (l_l_f, r_l_f, l_u_f, r_u_f) = corners_at(i.far);

        Self::from_points(FrustumPoints {
            l_l_n,
            r_l_n,
            l_u_n,
            r_u_n,
            l_l_f,
            r_l_f,
            l_u_f,
            r_u_f,
        })
    }

    /// Box shaped (orthographic) frustum looking along `-sun_direction` that
    /// tightly encloses `camera_frustum`.
    ///
    /// The near face lies on the sun side.
    pub fn orthogonal_fitted_to(camera_frustum: &ViewFrustum, sun_direction: Vec3) -> Self {
        let forward = (-sun_direction).normalize_or_zero();
        let forward = if forward == Vec3::ZERO { Vec3::NEG_Y } else { forward };
        let right = forward.cross(stable_up_vector(forward)).normalize();
        let up = right.cross(forward);

        let to_light = |p: Vec3| Vec3::new(p.dot(right), p.dot(up), p.dot(forward));
        let corners = camera_frustum.points.to_array().map(to_light);
        let bounds = AxisAlignedBoundingBox::from_points(corners).unwrap_or_default();
        let (min, max) = (bounds.min, bounds.max);

        let to_world = |x: f32, y: f32, z: f32| right * x + up * y + forward * z;

        Self::from_points(FrustumPoints {
            l_l_n: to_world(min.x, min.y, min.z),
            r_l_n: to_world(max.x, min.y, min.z),
            l_u_n: to_world(min.x, max.y, min.z),
            r_u_n: to_world(max.x, max.y, min.z),
            l_l_f: to_world(min.x, min.y, max.z),
            r_l_f: to_world(max.x, min.y, max.z),
            l_u_f: to_world(min.x, max.y, max.z),
            r_u_f: to_world(max.x, max.y, max.z),
        })
    }

    /// Copy of this frustum with the four near corners moved by `offset`.
    pub fn with_near_plane_offset(&self, offset: Vec3) -> Self {
        let mut points = self.points;
        points.l_l_n += offset;
        points.r_l_n += offset;
        points.l_u_n += offset;
        points.r_u_n += offset;
        Self::from_points(points)
    }

    /// Conservative test: `false` only if all eight box corners lie outside
    /// a single frustum plane.
    pub fn intersects_aabb(&self, bb: &AxisAlignedBoundingBox) -> bool {
        let corners = bb.corners();
        !self
            .planes
            .iter()
            .any(|plane| corners.iter().all(|&c| plane.signed_distance(c) < 0.0))
    }

    /// Wireframe of the twelve frustum edges.
    pub fn to_line_mesh(&self) -> LineMesh {
        LineMesh {
            positions: self.points.to_array().to_vec(),
            indices: BOX_EDGE_INDICES.to_vec(),
        }
    }
}

/// Orthographic view-projection looking at `bb` from `direction`.
///
/// The projection volume is a cube of the box's bounding sphere, so every
/// direction sees the whole box.
pub fn view_projection_around_bb(bb: &AxisAlignedBoundingBox, direction: Vec3) -> Mat4 {
    let center = bb.center();
    let radius = (bb.extent().length() * 0.5).max(f32::EPSILON);
    let direction = direction.normalize_or_zero();
    let direction = if direction == Vec3::ZERO { Vec3::Y } else { direction };

    let eye = center + direction * radius;
    let view = Mat4::look_at_rh(eye, center, stable_up_vector(direction));
    let projection = Mat4::orthographic_rh(-radius, radius, -radius, radius, 0.0, 2.0 * radius);
    projection * view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraExtrinsic, CameraIntrinsic};

    fn camera_looking_down_neg_z() -> Camera {
        Camera {
            extrinsic: CameraExtrinsic::default(),
            intrinsic: CameraIntrinsic {
                fov: 90.0,
                aspect_ratio: 1.0,
                near: 0.1,
                far: 100.0,
            },
        }
    }

    fn unit_box_at(center: Vec3) -> AxisAlignedBoundingBox {
        AxisAlignedBoundingBox::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    #[test]
    fn test_box_in_front_is_inside() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        assert!(frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, 0.0, -10.0))));
    }

    #[test]
    fn test_box_behind_is_outside() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, 0.0, 10.0))));
    }

    #[test]
    fn test_box_beyond_far_plane_is_outside() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(0.0, 0.0, -200.0))));
    }

    #[test]
    fn test_box_to_the_side_is_outside() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        // 90 degree fov: at z = -10 the frustum spans x in [-10, 10].
        assert!(!frustum.intersects_aabb(&unit_box_at(Vec3::new(20.0, 0.0, -10.0))));
    }

    #[test]
    fn test_partially_inside_box_is_kept() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        let straddling =
            AxisAlignedBoundingBox::new(Vec3::new(9.0, -1.0, -11.0), Vec3::new(30.0, 1.0, -9.0));
        assert!(frustum.intersects_aabb(&straddling));
    }

    #[test]
    fn test_planes_face_inward() {
        let frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        let center = frustum.points.center();
        for plane in &frustum.planes {
            assert!(plane.signed_distance(center) > 0.0);
        }
    }

    #[test]
    fn test_orthogonal_frustum_encloses_camera_frustum() {
        let camera_frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        let sun = Vec3::new(0.3, 1.0, 0.2).normalize();
        let shadow = ViewFrustum::orthogonal_fitted_to(&camera_frustum, sun);
        for corner in camera_frustum.points.to_array() {
            for plane in &shadow.planes {
                assert!(plane.signed_distance(corner) > -1e-2);
            }
        }
    }

    #[test]
    fn test_orthogonal_frustum_near_face_is_on_sun_side() {
        let camera_frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        let shadow = ViewFrustum::orthogonal_fitted_to(&camera_frustum, Vec3::Y);
        assert!(shadow.points.l_l_n.y > shadow.points.l_l_f.y);
    }

    #[test]
    fn test_near_plane_offset_leaves_original_untouched() {
        let camera_frustum = ViewFrustum::from_camera(&camera_looking_down_neg_z());
        let shadow = ViewFrustum::orthogonal_fitted_to(&camera_frustum, Vec3::Y);
        let before = shadow;
        let extruded = shadow.with_near_plane_offset(Vec3::Y * 10_000.0);
        assert_eq!(shadow, before);
        assert!(extruded.points.l_l_n.y > 9_000.0);
        assert_eq!(extruded.points.l_l_f, shadow.points.l_l_f);
    }

    #[test]
    fn test_view_projection_around_bb_contains_box() {
        let bb = AxisAlignedBoundingBox::new(Vec3::splat(-3.0), Vec3::new(5.0, 2.0, 1.0));
        let matrix = view_projection_around_bb(&bb, Vec3::new(0.2, 1.0, -0.4));
        for corner in bb.corners() {
            let clip = matrix.project_point3(corner);
            assert!(clip.x.abs() <= 1.0 + 1e-4);
            assert!(clip.y.abs() <= 1.0 + 1e-4);
            assert!((-1e-4..=1.0 + 1e-4).contains(&clip.z));
        }
    }
}
