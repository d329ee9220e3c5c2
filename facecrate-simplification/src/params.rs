//! Parameters for mesh decimation.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// How triangles are removed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DecimationMethod {
    /// Quadric error metric edge collapse. The production method.
    #[default]
    QuadricEdgeCollapse,

    /// Uniform grid vertex clustering. `cell_size` is the tolerance distance;
    /// when `None` it is derived from the fraction and bounding box.
    VertexClustering { cell_size: Option<f32> },

    /// Stride-based triangle removal from a seeded phase.
    ///
    /// For debugging only: there is no quality metric, and the result is
    /// usually full of holes.
    Random { seed: u64 },
}

impl DecimationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            DecimationMethod::QuadricEdgeCollapse => "quadric_edge_collapse",
            DecimationMethod::VertexClustering { .. } => "vertex_clustering",
            DecimationMethod::Random { .. } => "random",
        }
    }
}

/// Parameters for mesh decimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimateParams {
    /// Weight of the constraint planes added along open borders. Higher
    /// values keep borders in place. Default: 0.3
    pub boundary_weight: f64,

    /// Never collapse an edge touching a boundary vertex. Default: false
    pub preserve_boundary: bool,

    /// Maximum quadric error allowed for a collapse. If None, no limit.
    ///
    /// Default: None, so the requested fraction is pursued until the queue
    /// runs dry. A fixed budget such as `Some(0.01)` (what
    /// [`conservative`](Self::conservative) uses) can stop a pass early and
    /// report [`QueueExhausted`](facecrate_core::PartialReason::QueueExhausted).
    pub max_error: Option<f64>,

    /// Largest rotation of a surviving triangle's normal, in radians.
    /// Default: π/2 (90 degrees)
    pub max_normal_flip: f32,

    /// Triangle count never decimated below. Default: 4 (a tetrahedron)
    pub min_triangles: usize,

    /// Largest reduction fraction applied; larger requests are clamped.
    /// Default: 0.95
    pub max_reduction: f64,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            boundary_weight: 0.3,
            preserve_boundary: false,
            max_error: None,
            max_normal_flip: FRAC_PI_2,
            min_triangles: 4,
            max_reduction: 0.95,
        }
    }
}

impl DecimateParams {
    /// Conservative decimation: borders fixed, collapses above a small
    /// error refused.
    pub fn conservative() -> Self {
        Self {
            preserve_boundary: true,
            max_error: Some(0.01),
            max_normal_flip: std::f32::consts::FRAC_PI_4,
            ..Default::default()
        }
    }

    /// Aggressive decimation: no border constraints, up to 99% reduction.
    pub fn aggressive() -> Self {
        Self {
            boundary_weight: 0.0,
            max_reduction: 0.99,
            ..Default::default()
        }
    }

    pub fn with_boundary_weight(mut self, weight: f64) -> Self {
        self.boundary_weight = weight.max(0.0);
        self
    }

    pub fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    pub fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = Some(max_error);
        self
    }

    pub fn with_max_normal_flip(mut self, radians: f32) -> Self {
        self.max_normal_flip = radians;
        self
    }

    pub fn with_min_triangles(mut self, count: usize) -> Self {
        self.min_triangles = count;
        self
    }

    pub fn with_max_reduction(mut self, fraction: f64) -> Self {
        self.max_reduction = fraction.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = DecimateParams::default();
        assert!((params.boundary_weight - 0.3).abs() < 1e-12);
        assert!(!params.preserve_boundary);
        assert_eq!(params.max_error, None);
        assert_eq!(params.min_triangles, 4);
    }

    #[test]
    fn test_presets() {
        let conservative = DecimateParams::conservative();
        assert!(conservative.preserve_boundary);
        assert_eq!(conservative.max_error, Some(0.01));

        let aggressive = DecimateParams::aggressive();
        assert_eq!(aggressive.boundary_weight, 0.0);
        assert!(aggressive.max_reduction > 0.95);
    }

    #[test]
    fn test_builder() {
        let params = DecimateParams::default()
            .with_preserve_boundary(true)
            .with_max_error(0.5)
            .with_max_reduction(1.5)
            .with_boundary_weight(-1.0);

        assert!(params.preserve_boundary);
        assert_eq!(params.max_error, Some(0.5));
        assert_eq!(params.max_reduction, 1.0);
        assert_eq!(params.boundary_weight, 0.0);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(DecimationMethod::default().name(), "quadric_edge_collapse");
        assert_eq!(
            DecimationMethod::VertexClustering { cell_size: None }.name(),
            "vertex_clustering"
        );
    }
}
