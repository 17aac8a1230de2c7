//! Axis aligned bounding boxes.

use glam::{Mat4, Vec3};

use crate::mesh::LineMesh;

/// An axis aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBoundingBox {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Default for AxisAlignedBoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl AxisAlignedBoundingBox {
    /// Create a box from two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing all `points`, or `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Smallest box containing every box in `boxes`, or `None` for an empty set.
    pub fn combine<'a>(boxes: impl IntoIterator<Item = &'a AxisAlignedBoundingBox>) -> Option<Self> {
        boxes.into_iter().copied().reduce(|a, b| Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        })
    }

    /// The eight corners, near face (min z) first.
    pub fn corners(&self) -> [Vec3; 8] {
        let (l, h) = (self.min, self.max);
        [
            Vec3::new(l.x, l.y, l.z),
            Vec3::new(h.x, l.y, l.z),
            Vec3::new(l.x, h.y, l.z),
            Vec3::new(h.x, h.y, l.z),
            Vec3::new(l.x, l.y, h.z),
            Vec3::new(h.x, l.y, h.z),
            Vec3::new(l.x, h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
        ]
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// The box grown by `amount` on every side.
    pub fn padded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Bounding box of this box after transforming it by `matrix`.
    ///
    /// All eight corners are transformed, so rotations produce a conservative
    /// (possibly larger) world space box.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        // Eight corners, never empty.
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Wireframe of the twelve box edges for debug drawing.
    pub fn to_line_mesh(&self) -> LineMesh {
        LineMesh {
            positions: self.corners().to_vec(),
            indices: BOX_EDGE_INDICES.to_vec(),
        }
    }
}

/// Line list indices over [`AxisAlignedBoundingBox::corners`].
pub const BOX_EDGE_INDICES: [u32; 24] = [
    0, 1, 1, 3, 3, 2, 2, 0, // near face
    4, 5, 5, 7, 7, 6, 6, 4, // far face
    0, 4, 1, 5, 2, 6, 3, 7, // connecting edges
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_corners() {
        let bb = AxisAlignedBoundingBox::new(Vec3::ONE, -Vec3::ONE);
        assert_eq!(bb.min, -Vec3::ONE);
        assert_eq!(bb.max, Vec3::ONE);
    }

    #[test]
    fn test_combine() {
        let a = AxisAlignedBoundingBox::new(Vec3::ZERO, Vec3::ONE);
        let b = AxisAlignedBoundingBox::new(Vec3::splat(-2.0), Vec3::splat(-1.0));
        let c = AxisAlignedBoundingBox::combine([&a, &b]).unwrap();
        assert_eq!(c.min, Vec3::splat(-2.0));
        assert_eq!(c.max, Vec3::ONE);

        assert!(AxisAlignedBoundingBox::combine(std::iter::empty()).is_none());
    }

    #[test]
    fn test_transformed_translation() {
        let bb = AxisAlignedBoundingBox::new(-Vec3::ONE, Vec3::ONE);
        let moved = bb.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_transformed_rotation_is_conservative() {
        let bb = AxisAlignedBoundingBox::new(-Vec3::ONE, Vec3::ONE);
        let rotated = bb.transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4));
        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_padded_and_extent() {
        let bb = AxisAlignedBoundingBox::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)).padded(1.0);
        assert_eq!(bb.extent(), Vec3::new(4.0, 6.0, 8.0));
        assert_eq!(bb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_line_mesh_has_twelve_edges() {
        let mesh = AxisAlignedBoundingBox::default().to_line_mesh();
        assert_eq!(mesh.positions.len(), 8);
        assert_eq!(mesh.indices.len(), 24);
    }
}
