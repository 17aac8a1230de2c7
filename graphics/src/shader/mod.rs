//! Shader descriptions and specialisation constants.
//!
//! A [`ShaderDescription`] names a shader source file (relative to the
//! backend's shader directory) and the specialisation constants baked into
//! the pipeline built from it. Shader compilation itself is the backend's
//! job; this module only describes what to build.
//!
//! Constant slots are fixed per shader. Builders push constants in slot order
//! so descriptions for the same pass compare equal when nothing changed.

/// Value of a specialisation constant.
///
/// Booleans are marshalled as 32-bit integers, matching GLSL `bool`
/// specialisation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    Bool(bool),
    UInt(u32),
    Float(f32),
}

impl ConstantValue {
    /// Little-endian bytes as uploaded to the backend.
    pub fn to_bytes(self) -> Vec<u8> {
        match self {
            ConstantValue::Bool(v) => u32::from(v).to_le_bytes().to_vec(),
            ConstantValue::UInt(v) => v.to_le_bytes().to_vec(),
            ConstantValue::Float(v) => v.to_le_bytes().to_vec(),
        }
    }
}

impl From<bool> for ConstantValue {
    fn from(v: bool) -> Self {
        ConstantValue::Bool(v)
    }
}

impl From<u32> for ConstantValue {
    fn from(v: u32) -> Self {
        ConstantValue::UInt(v)
    }
}

impl From<f32> for ConstantValue {
    fn from(v: f32) -> Self {
        ConstantValue::Float(v)
    }
}

/// A specialisation constant: slot index plus raw value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialisationConstant {
    pub location: u32,
    pub data: Vec<u8>,
}

/// One shader stage: source path plus specialisation constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderDescription {
    /// Path relative to the backend's shader root, e.g. `"taa.comp"`.
    pub src_path_relative: String,
    pub specialisation_constants: Vec<SpecialisationConstant>,
}

impl ShaderDescription {
    /// A shader without specialisation constants.
    pub fn new(src_path_relative: impl Into<String>) -> Self {
        Self {
            src_path_relative: src_path_relative.into(),
            specialisation_constants: Vec::new(),
        }
    }

    /// Append a constant at `location`.
    pub fn with_constant(mut self, location: u32, value: impl Into<ConstantValue>) -> Self {
        self.push_constant(location, value);
        self
    }

    /// Append a constant at `location`.
    pub fn push_constant(&mut self, location: u32, value: impl Into<ConstantValue>) {
        self.specialisation_constants.push(SpecialisationConstant {
            location,
            data: value.into().to_bytes(),
        });
    }

    /// Raw bytes of the constant at `location`, if present.
    pub fn constant(&self, location: u32) -> Option<&[u8]> {
        self.specialisation_constants
            .iter()
            .find(|c| c.location == location)
            .map(|c| c.data.as_slice())
    }

    /// The constant at `location` read as a `u32`.
    pub fn constant_u32(&self, location: u32) -> Option<u32> {
        let bytes: [u8; 4] = self.constant(location)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// The constant at `location` read as an `f32`.
    pub fn constant_f32(&self, location: u32) -> Option<f32> {
        let bytes: [u8; 4] = self.constant(location)?.try_into().ok()?;
        Some(f32::from_le_bytes(bytes))
    }
}

/// Vertex and fragment shader of a graphic pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicPassShaderDescriptions {
    pub vertex: ShaderDescription,
    pub fragment: ShaderDescription,
}

impl GraphicPassShaderDescriptions {
    /// Both stages from `<name>.vert` and `<name>.frag`.
    pub fn from_name(name: &str) -> Self {
        Self {
            vertex: ShaderDescription::new(format!("{name}.vert")),
            fragment: ShaderDescription::new(format!("{name}.frag")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_is_four_bytes() {
        assert_eq!(ConstantValue::from(true).to_bytes(), vec![1, 0, 0, 0]);
        assert_eq!(ConstantValue::from(false).to_bytes(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_constant_lookup() {
        let desc = ShaderDescription::new("histogramPerTile.comp")
            .with_constant(0, 128u32)
            .with_constant(1, 0.001f32);
        assert_eq!(desc.constant_u32(0), Some(128));
        assert_eq!(desc.constant_f32(1), Some(0.001));
        assert_eq!(desc.constant(2), None);
    }

    #[test]
    fn test_from_name() {
        let desc = GraphicPassShaderDescriptions::from_name("sky");
        assert_eq!(desc.vertex.src_path_relative, "sky.vert");
        assert_eq!(desc.fragment.src_path_relative, "sky.frag");
    }
}
