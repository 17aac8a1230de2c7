//! CPU-side mesh types and generators.
//!
//! This module provides the GPU-agnostic mesh data handed to a backend:
//!
//! - [`MeshData`] - Per-attribute vertex streams as produced by a loader
//! - [`MeshBinary`] - Interleaved vertex and index bytes plus bounds
//! - [`LineMesh`] - Position-only line lists for debug geometry
//! - Generators for common shapes (sky cube, box)

mod data;
pub mod generators;

pub use data::{
    meshes_to_binary, FullVertex, LineMesh, MaterialTexturePaths, MeshBinary, MeshData,
};
