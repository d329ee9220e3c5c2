//! # facecrate Record
//!
//! [`GeometryRecord`] owns the one live mesh of an editing session together
//! with its derived forms: the polygon faces recovered from its triangles and
//! the exploded [`ViewingMesh`](facecrate_core::ViewingMesh) a renderer
//! consumes. Edits (batch decimation, single edge collapse) commit all three
//! at once and keep one step of undo.
//!
//! [`EngineConfig`] gathers the repair, reconstruction and decimation
//! parameters the record passes down.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod record;

pub use config::EngineConfig;
pub use record::{EditOutcome, GeometryRecord};
