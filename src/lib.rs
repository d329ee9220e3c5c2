//! # facecrate
//!
//! Mesh repair, polygon-face reconstruction and simplification for 3D mesh
//! viewers.
//!
//! This is the umbrella crate that re-exports the member crates behind
//! feature flags. Use the individual crates for finer control over
//! dependencies.
//!
//! ## Features
//!
//! - **Core**: Indexed meshes, polygon faces, viewing meshes, progress and cancellation
//! - **Repair**: Vertex welding, degenerate removal, winding orientation
//! - **Reconstruction**: Merging coplanar triangles back into polygon faces
//! - **Simplification**: Quadric edge collapse, vertex clustering, single edge collapse
//! - **Record**: A live mesh with its derived forms and one-level undo
//!
//! ## Quick Start
//!
//! ```rust
//! use facecrate::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! // A unit square split into two triangles
//! let mesh = IndexedMesh::from_vertices_and_faces(
//!     vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.0),
//!         Point3f::new(1.0, 1.0, 0.0),
//!         Point3f::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! );
//!
//! let record = GeometryRecord::load(mesh, EngineConfig::default())?;
//! assert_eq!(record.faces().len(), 1);
//! assert_eq!(record.faces()[0].kind, FaceKind::Quad);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables everything
//! - `repair`: Geometry repair
//! - `reconstruction`: Polygon-face reconstruction
//! - `simplification`: Decimation and edge collapse
//! - `record`: The geometry record (pulls in the three above)
//! - `all`: Enables all features

// Re-export core functionality
pub use facecrate_core::*;

// Re-export sub-crates
#[cfg(feature = "repair")]
pub use facecrate_repair as repair;

#[cfg(feature = "reconstruction")]
pub use facecrate_reconstruction as reconstruction;

#[cfg(feature = "simplification")]
pub use facecrate_simplification as simplification;

#[cfg(feature = "record")]
pub use facecrate_record as record;

/// Convenient imports for common use cases
pub mod prelude {
    pub use facecrate_core::*;

    #[cfg(feature = "repair")]
    pub use facecrate_repair::{repair, validate_geometry, GeometryRepairer, RepairParams};

    #[cfg(feature = "reconstruction")]
    pub use facecrate_reconstruction::{
        reconstruct_faces, CoplanarMerger, FaceCapability, PolygonReconstructor,
        ReconstructionConfig,
    };

    #[cfg(feature = "simplification")]
    pub use facecrate_simplification::{
        DecimateParams, DecimationMethod, Decimator, EdgeDecimator, MeshSimplifier,
    };

    #[cfg(feature = "record")]
    pub use facecrate_record::{EditOutcome, EngineConfig, GeometryRecord};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
