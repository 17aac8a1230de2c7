//! CPU-side image descriptions and loading.
//!
//! Provides [`ImageDescription`] for describing images handed to a backend,
//! the format/type enums shared between CPU and GPU code, and the
//! [`ImageLoader`] trait with a file based implementation behind the
//! `image-loader` feature.

mod loader;
mod types;

#[cfg(feature = "image-loader")]
pub use loader::FileImageLoader;
pub use loader::{ImageLoadError, ImageLoader};
pub use types::{ImageDescription, ImageFormat, ImageType, ImageUsageFlags, MipCount};
