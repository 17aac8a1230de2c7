//! Buffer descriptors.

/// Descriptor for creating a storage buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageBufferDescription {
    /// Size in bytes.
    pub size: u64,
    /// Optional initial contents, at most `size` bytes.
    pub initial_data: Vec<u8>,
}

impl StorageBufferDescription {
    /// An uninitialised buffer of `size` bytes.
    pub fn new(size: u64) -> Self {
        Self {
            size,
            initial_data: Vec::new(),
        }
    }

    /// Set the initial contents.
    pub fn with_initial_data(mut self, data: &[u8]) -> Self {
        self.initial_data = data.to_vec();
        self
    }
}

/// Descriptor for creating a uniform buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformBufferDescription {
    /// Size in bytes.
    pub size: u64,
}

impl UniformBufferDescription {
    pub fn new(size: u64) -> Self {
        Self { size }
    }
}
