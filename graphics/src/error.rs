//! Graphics error types.

use thiserror::Error;

use crate::compiler::GraphError;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// Failed to initialize the graphics system.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// Failed to create a resource.
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// The backend rejected a pass declaration.
    #[error("failed to create pass '{name}': {reason}")]
    PassCreationFailed { name: String, reason: String },

    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation is not valid in the current renderer state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Two named bindings of one layout share a slot.
    #[error("binding layout '{layout}': slot {binding} used by both {first} and {second}")]
    BindingCollision {
        layout: String,
        binding: u32,
        first: String,
        second: String,
    },

    /// A binding name was looked up in a layout that does not declare it.
    #[error("binding layout '{layout}' has no binding named {name}")]
    MissingBinding { layout: String, name: String },

    /// The GPU device was lost.
    #[error("GPU device lost")]
    DeviceLost,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),

    /// The submitted frame graph is malformed.
    #[error("frame graph error: {0}")]
    Graph(#[from] GraphError),
}
