//! # Plain Demos
//!
//! Headless scenes exercising the Plain frame orchestration.
//!
//! ## Available Demos
//!
//! - `headless_frames` - Renders frames of a box grid over the recording backend

use glam::{Mat4, Vec3};
use plain_core::mesh::{generators, meshes_to_binary, MeshBinary};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Spacing between grid cells in world units.
const GRID_SPACING: f32 = 3.0;

/// A `side` × `side` grid of unit boxes on the ground plane, centred on the
/// origin, with box heights varying per row.
pub fn box_grid(side: u32) -> (Vec<MeshBinary>, Vec<Mat4>) {
    let half = (side.saturating_sub(1)) as f32 * GRID_SPACING * 0.5;
    let mut meshes = Vec::with_capacity((side * side) as usize);
    let mut transforms = Vec::with_capacity(meshes.capacity());

    for row in 0..side {
        let height = 0.5 + (row % 4) as f32 * 0.5;
        let mesh = generators::generate_box(Vec3::new(0.5, height, 0.5));
        for column in 0..side {
            meshes.push(mesh.clone());
            transforms.push(Mat4::from_translation(Vec3::new(
                column as f32 * GRID_SPACING - half,
                height,
                row as f32 * GRID_SPACING - half,
            )));
        }
    }

    (meshes_to_binary(&meshes), transforms)
}

/// Camera position on a circle of `radius` around the origin.
pub fn orbit_position(frame: u64, radius: f32) -> Vec3 {
    let angle = frame as f32 * 0.05;
    Vec3::new(angle.sin() * radius, radius * 0.4, angle.cos() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_grid() {
        let (meshes, transforms) = box_grid(3);
        assert_eq!(meshes.len(), 9);
        assert_eq!(transforms.len(), 9);
        // centred around the origin
        let center = transforms[4].transform_point3(Vec3::ZERO);
        assert_eq!((center.x, center.z), (0.0, 0.0));
    }

    #[test]
    fn test_box_grid_empty() {
        let (meshes, transforms) = box_grid(0);
        assert!(meshes.is_empty());
        assert!(transforms.is_empty());
    }

    #[test]
    fn test_orbit_position_radius() {
        let p = orbit_position(17, 10.0);
        assert!((Vec3::new(p.x, 0.0, p.z).length() - 10.0).abs() < 1e-4);
    }
}
