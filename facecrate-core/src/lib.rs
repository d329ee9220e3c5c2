//! Core data structures for facecrate
//!
//! This crate provides the fundamental types shared by the repair,
//! reconstruction and simplification crates: the indexed triangle mesh and
//! its provenance, polygon faces, edge adjacency, bounding boxes, the exploded
//! viewing buffer, cooperative operation control and the error type.

pub mod point;
pub mod mesh;
pub mod polygon;
pub mod topology;
pub mod traits;
pub mod view;
pub mod control;
pub mod stats;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use polygon::*;
pub use topology::*;
pub use traits::*;
pub use view::*;
pub use control::*;
pub use stats::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

// Type aliases for easier imports
pub type Mesh = IndexedMesh;
