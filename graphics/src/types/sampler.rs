//! Sampler types and descriptors.

/// Texel filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerInterpolation {
    #[default]
    Nearest,
    Linear,
}

/// Addressing outside of `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerWrapping {
    #[default]
    Clamp,
    /// Clamp to the border color.
    Color,
    Repeat,
}

/// Border color used with [`SamplerWrapping::Color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerBorderColor {
    #[default]
    White,
    Black,
}

/// Descriptor for creating a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplerDescription {
    pub interpolation: SamplerInterpolation,
    pub wrapping: SamplerWrapping,
    pub border_color: SamplerBorderColor,
    pub use_anisotropy: bool,
    pub max_anisotropy: f32,
    /// Highest mip level that may be sampled.
    pub max_mip: u32,
}

impl SamplerDescription {
    /// Create a nearest neighbor sampler.
    pub fn nearest(wrapping: SamplerWrapping) -> Self {
        Self {
            interpolation: SamplerInterpolation::Nearest,
            wrapping,
            ..Default::default()
        }
    }

    /// Create a linear filtering sampler.
    pub fn linear(wrapping: SamplerWrapping) -> Self {
        Self {
            interpolation: SamplerInterpolation::Linear,
            wrapping,
            ..Default::default()
        }
    }

    /// Set the border color.
    pub fn with_border_color(mut self, color: SamplerBorderColor) -> Self {
        self.border_color = color;
        self
    }

    /// Set the highest sampled mip.
    pub fn with_max_mip(mut self, max_mip: u32) -> Self {
        self.max_mip = max_mip;
        self
    }
}
