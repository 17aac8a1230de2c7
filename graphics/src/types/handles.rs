//! Opaque resource handles.
//!
//! Handles are created by a backend and are only meaningful to the backend
//! that created them. They are `Copy` and cheap to pass around.

macro_rules! resource_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a backend specific index.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// The backend specific index.
            pub const fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

resource_handle!(
    /// Handle to a backend image.
    ImageHandle
);
resource_handle!(
    /// Handle to a backend sampler.
    SamplerHandle
);
resource_handle!(
    /// Handle to a backend storage buffer.
    StorageBufferHandle
);
resource_handle!(
    /// Handle to a backend uniform buffer.
    UniformBufferHandle
);
resource_handle!(
    /// Handle to an immutable mesh with material.
    MeshHandle
);
resource_handle!(
    /// Handle to a position-only mesh whose contents can be replaced.
    DynamicMeshHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip_and_ordering() {
        let a = ImageHandle::from_raw(3);
        let b = ImageHandle::from_raw(4);
        assert_eq!(a.raw(), 3);
        assert!(a < b);
        assert_ne!(a, b);
    }
}
