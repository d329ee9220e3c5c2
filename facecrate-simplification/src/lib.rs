//! Mesh simplification and decimation
//!
//! This crate reduces triangle counts while keeping the shape:
//! - Quadric error metric edge collapse ([`EdgeCollapseSimplifier`])
//! - Uniform grid vertex clustering ([`ClusteringSimplifier`])
//! - Seeded stride removal for debugging ([`RandomDecimator`])
//!
//! [`Decimator`] is the batch entry point: it validates the request, runs one
//! of the methods and passes the result through repair and face
//! reconstruction. [`EdgeDecimator`] collapses a single picked edge.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod clustering;
pub mod decimator;
pub mod edge_collapse;
pub mod params;
pub mod quadric;
pub mod random;
pub mod simplifier;
pub mod single_edge;

pub use clustering::ClusteringSimplifier;
pub use decimator::{DecimationOutput, Decimator, TargetPlan};
pub use edge_collapse::EdgeCollapseSimplifier;
pub use params::{DecimateParams, DecimationMethod};
pub use quadric::Quadric;
pub use random::RandomDecimator;
pub use simplifier::{MeshSimplifier, Simplified};
pub use single_edge::{EdgeCollapseOutput, EdgeDecimator};
