//! Image loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::ImageDescription;

/// Errors that can occur while loading an image.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// No path was given.
    #[error("empty image path")]
    EmptyPath,

    /// The file could not be opened or decoded.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The decoded image has a layout the renderer cannot upload.
    #[error("unsupported image layout in {}: {reason}", path.display())]
    Unsupported { path: PathBuf, reason: String },
}

/// Source of decoded images.
pub trait ImageLoader: Send + Sync {
    /// Load the image at `path` as a sampled 2D texture.
    fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError>;
}

/// Loads images from disk with the `image` crate.
///
/// Low dynamic range files become RGBA8 with a full, automatically generated
/// mip chain. HDR files become RGBA32 float with a single mip.
#[cfg(feature = "image-loader")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

#[cfg(feature = "image-loader")]
impl ImageLoader for FileImageLoader {
    fn load_image(&self, path: &Path) -> Result<ImageDescription, ImageLoadError> {
        use super::types::{ImageFormat, ImageUsageFlags};

        if path.as_os_str().is_empty() {
            return Err(ImageLoadError::EmptyPath);
        }

        let img = image::open(path).map_err(|e| ImageLoadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(ImageLoadError::Unsupported {
                path: path.to_path_buf(),
                reason: format!("zero sized image {width}x{height}"),
            });
        }

        let is_hdr = matches!(
            img.color(),
            image::ColorType::Rgb32F | image::ColorType::Rgba32F
        );

        let desc = if is_hdr {
            let texels: Vec<f32> = img.to_rgba32f().into_raw();
            ImageDescription {
                initial_data: bytemuck::cast_slice(&texels).to_vec(),
                ..ImageDescription::new_2d(
                    width,
                    height,
                    ImageFormat::RGBA32_sFloat,
                    ImageUsageFlags::SAMPLED,
                )
            }
        } else {
            ImageDescription {
                initial_data: img.to_rgba8().into_raw(),
                auto_create_mips: true,
                ..ImageDescription::new_2d(width, height, ImageFormat::RGBA8, ImageUsageFlags::SAMPLED)
            }
            .with_full_mip_chain()
        };

        log::debug!(
            "Loaded image {} ({}x{}, {:?})",
            path.display(),
            width,
            height,
            desc.format
        );
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImageLoadError::Decode {
            path: PathBuf::from("textures/missing.png"),
            reason: "not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode textures/missing.png: not found"
        );
    }

    #[cfg(feature = "image-loader")]
    #[test]
    fn test_empty_path() {
        let result = FileImageLoader.load_image(Path::new(""));
        assert!(matches!(result, Err(ImageLoadError::EmptyPath)));
    }

    #[cfg(feature = "image-loader")]
    #[test]
    fn test_missing_file() {
        let result = FileImageLoader.load_image(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(ImageLoadError::Decode { .. })));
    }
}
