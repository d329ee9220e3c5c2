//! # facecrate Reconstruction
//!
//! Polygon face recovery for triangulated meshes.
//!
//! STL and most exchange formats keep only triangles, so a cube arrives as
//! twelve faces instead of six. This crate groups triangles back into
//! polygon faces:
//! - [`PolygonReconstructor`] grows patches under angle and plane tolerances
//!   and accepts a patch only if its boundary is one simple loop.
//! - [`CoplanarMerger`] merges exact planes of generated meshes.
//!
//! [`reconstruct_faces`] picks between them from the mesh provenance. Every
//! outcome partitions the mesh's triangles exactly, falling back to one face
//! per triangle wherever a patch is rejected.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod boundary;
pub mod config;
pub mod coplanar;
pub mod outcome;
mod patches;
pub mod pipeline;
pub mod reconstructor;

pub use boundary::{LoopChecks, LoopRejection};
pub use config::ReconstructionConfig;
pub use coplanar::CoplanarMerger;
pub use outcome::{FaceCapability, FaceReconstructor, ReconstructionOutcome};
pub use pipeline::{reconstruct_faces, select_reconstructor};
pub use reconstructor::PolygonReconstructor;
