//! # Plain Core
//!
//! Math, geometry and asset data primitives shared by the Plain renderer.
//!
//! Everything in this crate is a pure function or plain data: bounding boxes,
//! view frusta, camera matrices, low-discrepancy sampling, mip chain math, and
//! the CPU-side descriptions of meshes and images handed to a GPU backend.

pub mod bounds;
pub mod camera;
pub mod frustum;
pub mod math;
pub mod mesh;
pub mod texture;

pub use bounds::AxisAlignedBoundingBox;
pub use camera::{Camera, CameraExtrinsic, CameraIntrinsic};
pub use frustum::{FrustumPoints, Plane, ViewFrustum};
pub use mesh::{LineMesh, MaterialTexturePaths, MeshBinary, MeshData};
#[cfg(feature = "image-loader")]
pub use texture::FileImageLoader;
pub use texture::{
    ImageDescription, ImageFormat, ImageLoadError, ImageLoader, ImageType, ImageUsageFlags,
    MipCount,
};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version. Call once at startup.
pub fn init() {
    log::info!("Plain Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
