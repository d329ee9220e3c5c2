//! Geometry repair for facecrate
//!
//! Best-effort fixes applied to every mesh before it is reconstructed or
//! simplified:
//! - Non-finite coordinate replacement
//! - Position welding into canonical indexed form
//! - Degenerate triangle removal
//! - Unreferenced vertex compaction
//! - Global winding correction
//!
//! None of the repair functions fail. [`validate_geometry`] decides afterwards
//! whether what is left is worth keeping.
//!
//! # Example
//!
//! ```
//! use facecrate_core::{IndexedMesh, Point3f};
//! use facecrate_repair::{repair, validate_geometry, RepairParams};
//!
//! let mut mesh = IndexedMesh::from_vertices_and_faces(
//!     vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.0),
//!         Point3f::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 0, 1]],
//! );
//! let params = RepairParams::default();
//! let report = repair(&mut mesh, &params);
//! assert_eq!(report.degenerates_removed, 1);
//! assert!(validate_geometry(&mesh, &report, &params).is_ok());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod params;
mod repair;
mod repairer;
mod validate;
pub mod winding;

pub use params::{RepairParams, WindingConfig};
pub use repair::{
    ensure_indexed, recompute_normals, remove_degenerate_triangles, remove_unreferenced_vertices,
    sanitize_numeric,
};
pub use repairer::{repair, GeometryRepairer, RepairReport};
pub use validate::validate_geometry;
pub use winding::{correct_winding_orientation, WindingReport};
