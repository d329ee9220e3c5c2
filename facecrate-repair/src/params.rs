//! Parameters for geometry repair.

use serde::{Deserialize, Serialize};

/// Thresholds for global winding correction.
///
/// The defaults are empirically tuned; they stay configurable rather than
/// being derived from the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindingConfig {
    /// Maximum number of triangles sampled. Default: 500
    pub max_samples: usize,

    /// `|dot(normal, direction)|` below this is treated as near-tangent and
    /// ignored. Default: 0.1
    pub tangent_threshold: f32,

    /// Share of inward samples above which the mesh is flipped. Default: 0.6
    pub flip_ratio: f32,

    /// Classified samples required before any flip. Default: 10
    pub min_classified: usize,
}

impl Default for WindingConfig {
    fn default() -> Self {
        Self {
            max_samples: 500,
            tangent_threshold: 0.1,
            flip_ratio: 0.6,
            min_classified: 10,
        }
    }
}

/// Configuration parameters for mesh repair operations.
///
/// Thresholds are in mesh coordinate units.
///
/// # Example
///
/// ```
/// use facecrate_repair::RepairParams;
///
/// let params = RepairParams {
///     quantize_decimals: 4,
///     ..Default::default()
/// };
/// assert!(params.remove_unreferenced);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairParams {
    /// Magnitude written in place of infinite coordinates (sign kept).
    /// NaN always becomes `0.0`. Default: `1.0e6`
    pub sentinel: f32,

    /// Merge vertices that share a quantized position. Default: `true`
    pub weld_vertices: bool,

    /// Decimal places kept when welding vertices by position. Default: 6
    pub quantize_decimals: u32,

    /// Triangles with smaller area are removed. Default: `1e-12`
    pub area_epsilon: f32,

    /// Triangles with any shorter edge are removed. Default: `1e-9`
    pub length_epsilon: f32,

    /// Compact the vertex buffer after triangle removal. Default: `true`
    pub remove_unreferenced: bool,

    /// Run global winding correction. Default: `true`
    pub correct_winding: bool,

    pub winding: WindingConfig,

    /// Recompute vertex normals at the end of the pipeline. Default: `true`
    pub recompute_normals: bool,

    /// Share of removed triangles above which the geometry is reported as
    /// degenerate by validation. Default: 0.5
    pub max_degenerate_fraction: f64,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            sentinel: 1.0e6,
            weld_vertices: true,
            quantize_decimals: 6,
            area_epsilon: 1e-12,
            length_epsilon: 1e-9,
            remove_unreferenced: true,
            correct_winding: true,
            winding: WindingConfig::default(),
            recompute_normals: true,
            max_degenerate_fraction: 0.5,
        }
    }
}

impl RepairParams {
    /// Params for repairing after a single interactive edge collapse.
    ///
    /// The vertex buffer is left as the collapse produced it so that vertex
    /// indices chosen by the user stay meaningful.
    pub fn for_single_collapse() -> Self {
        Self::default().without_compaction()
    }

    /// These params with welding and vertex compaction switched off, so the
    /// vertex buffer keeps its length and order.
    pub fn without_compaction(self) -> Self {
        Self {
            weld_vertices: false,
            remove_unreferenced: false,
            ..self
        }
    }

    /// Params for meshes that are exact by construction: no winding guesswork.
    pub fn for_generated() -> Self {
        Self {
            correct_winding: false,
            ..Default::default()
        }
    }

    pub fn with_quantize_decimals(mut self, decimals: u32) -> Self {
        self.quantize_decimals = decimals;
        self
    }

    pub fn with_epsilons(mut self, area_epsilon: f32, length_epsilon: f32) -> Self {
        self.area_epsilon = area_epsilon;
        self.length_epsilon = length_epsilon;
        self
    }

    pub fn with_winding(mut self, winding: WindingConfig) -> Self {
        self.winding = winding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let params = RepairParams::default();
        assert_eq!(params.quantize_decimals, 6);
        assert!(params.correct_winding);
        assert_eq!(params.winding.max_samples, 500);
        assert_eq!(params.winding.min_classified, 10);
        assert_relative_eq!(params.winding.flip_ratio, 0.6);
    }

    #[test]
    fn test_presets() {
        assert!(!RepairParams::for_single_collapse().remove_unreferenced);
        assert!(!RepairParams::for_single_collapse().weld_vertices);
        assert!(!RepairParams::for_generated().correct_winding);

        let params = RepairParams::default()
            .with_quantize_decimals(3)
            .with_epsilons(1e-6, 1e-4);
        assert_eq!(params.quantize_decimals, 3);
        assert_eq!(params.area_epsilon, 1e-6);
    }
}
