//! Image description types.

use bitflags::bitflags;

/// Pixel formats understood by the backend.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    RGBA8,
    RG8,
    R11G11B10_uFloat,
    Depth32,
    Depth16,
    RG16_sFloat,
    RGBA16_sFloat,
    RGBA16_sNorm,
    RG32_sFloat,
    RGBA32_sFloat,
}

impl ImageFormat {
    /// Size of one texel in bytes.
    pub fn bytes_per_texel(self) -> u32 {
        match self {
            ImageFormat::RG8 | ImageFormat::Depth16 => 2,
            ImageFormat::RGBA8
            | ImageFormat::R11G11B10_uFloat
            | ImageFormat::Depth32
            | ImageFormat::RG16_sFloat => 4,
            ImageFormat::RGBA16_sFloat | ImageFormat::RGBA16_sNorm | ImageFormat::RG32_sFloat => 8,
            ImageFormat::RGBA32_sFloat => 16,
        }
    }

    pub fn is_depth(self) -> bool {
        matches!(self, ImageFormat::Depth16 | ImageFormat::Depth32)
    }
}

/// Image dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    #[default]
    Type2D,
    Type3D,
    TypeCube,
}

/// How many mip levels an image gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MipCount {
    #[default]
    One,
    /// Use [`ImageDescription::manual_mip_count`].
    Manual,
    /// Full chain down to 1×1.
    FullChain,
}

bitflags! {
    /// How an image may be used by passes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsageFlags: u32 {
        const SAMPLED = 1 << 0;
        const STORAGE = 1 << 1;
        const ATTACHMENT = 1 << 2;
    }
}

/// Everything a backend needs to create an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescription {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub image_type: ImageType,
    pub format: ImageFormat,
    pub usage: ImageUsageFlags,
    pub mip_count: MipCount,
    pub manual_mip_count: u32,
    /// Generate mips from level 0 on upload.
    pub auto_create_mips: bool,
    /// Level 0 texel data, empty for uninitialised images.
    pub initial_data: Vec<u8>,
}

impl ImageDescription {
    /// A 2D single mip image with no initial data.
    pub fn new_2d(width: u32, height: u32, format: ImageFormat, usage: ImageUsageFlags) -> Self {
        Self {
            width,
            height,
            depth: 1,
            image_type: ImageType::Type2D,
            format,
            usage,
            mip_count: MipCount::One,
            manual_mip_count: 1,
            auto_create_mips: false,
            initial_data: Vec::new(),
        }
    }

    /// A 1×1 sampled texture with a full (trivial) mip chain holding `texel`.
    pub fn single_texel(format: ImageFormat, texel: &[u8]) -> Self {
        Self {
            mip_count: MipCount::FullChain,
            auto_create_mips: true,
            initial_data: texel.to_vec(),
            ..Self::new_2d(1, 1, format, ImageUsageFlags::SAMPLED)
        }
    }

    pub fn with_type(mut self, image_type: ImageType) -> Self {
        self.image_type = image_type;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_manual_mips(mut self, count: u32) -> Self {
        self.mip_count = MipCount::Manual;
        self.manual_mip_count = count;
        self
    }

    pub fn with_full_mip_chain(mut self) -> Self {
        self.mip_count = MipCount::FullChain;
        self
    }

    /// Resolved number of mip levels.
    pub fn resolved_mip_count(&self) -> u32 {
        match self.mip_count {
            MipCount::One => 1,
            MipCount::Manual => self.manual_mip_count.max(1),
            MipCount::FullChain => {
                crate::math::mip_count_from_resolution(self.width, self.height, self.depth)
            }
        }
    }

    /// Byte size of level 0 for one layer.
    pub fn level_zero_size(&self) -> u64 {
        self.width as u64
            * self.height as u64
            * self.depth.max(1) as u64
            * self.format.bytes_per_texel() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_texel() {
        let desc = ImageDescription::single_texel(ImageFormat::RG8, &[128, 128]);
        assert_eq!(desc.width, 1);
        assert_eq!(desc.mip_count, MipCount::FullChain);
        assert_eq!(desc.resolved_mip_count(), 1);
        assert_eq!(desc.initial_data, vec![128, 128]);
        assert!(desc.usage.contains(ImageUsageFlags::SAMPLED));
    }

    #[test]
    fn test_resolved_mip_count() {
        let desc = ImageDescription::new_2d(
            512,
            512,
            ImageFormat::R11G11B10_uFloat,
            ImageUsageFlags::SAMPLED | ImageUsageFlags::STORAGE,
        );
        assert_eq!(desc.resolved_mip_count(), 1);
        assert_eq!(desc.clone().with_full_mip_chain().resolved_mip_count(), 10);
        assert_eq!(desc.with_manual_mips(8).resolved_mip_count(), 8);
    }

    #[test]
    fn test_level_zero_size() {
        let desc = ImageDescription::new_2d(4, 4, ImageFormat::RGBA32_sFloat, ImageUsageFlags::SAMPLED);
        assert_eq!(desc.level_zero_size(), 256);
    }

    #[test]
    fn test_depth_formats() {
        assert!(ImageFormat::Depth16.is_depth());
        assert!(!ImageFormat::RG16_sFloat.is_depth());
    }
}
