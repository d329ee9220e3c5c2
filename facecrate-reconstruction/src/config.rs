//! Tolerances for face reconstruction.

use serde::{Deserialize, Serialize};

/// Configuration shared by [`PolygonReconstructor`](crate::PolygonReconstructor)
/// and [`CoplanarMerger`](crate::CoplanarMerger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// Maximum angle in radians between a triangle normal and the seed
    /// normal of its patch. Default: `1e-3`
    pub angle_tolerance: f32,

    /// Maximum distance of a vertex from the seed plane, as a fraction of the
    /// bounding-box diagonal. Default: `1e-5`
    pub plane_tolerance: f32,

    /// Patches with a smaller total area are split into single triangles.
    /// Default: `1e-12`
    pub min_area: f32,

    /// Allowed relative disagreement between the boundary loop area and the
    /// summed triangle area. Default: `0.01`
    pub area_tolerance: f32,

    /// Above this triangle count reconstruction is skipped entirely.
    /// Default: 40 000
    pub max_triangles: usize,

    /// Grid step for normal components when merging exact planes.
    /// Default: `1e-4`
    pub normal_quantum: f32,

    /// Grid step for plane offsets, relative to the bounding-box diagonal.
    /// Default: `1e-4`
    pub offset_quantum: f32,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            angle_tolerance: 1e-3,
            plane_tolerance: 1e-5,
            min_area: 1e-12,
            area_tolerance: 0.01,
            max_triangles: 40_000,
            normal_quantum: 1e-4,
            offset_quantum: 1e-4,
        }
    }
}

impl ReconstructionConfig {
    /// Looser tolerances for scanned or re-exported meshes whose flat regions
    /// carry visible noise.
    pub fn noisy() -> Self {
        Self {
            angle_tolerance: 1e-2,
            plane_tolerance: 1e-4,
            ..Default::default()
        }
    }

    pub fn with_angle_tolerance(mut self, radians: f32) -> Self {
        self.angle_tolerance = radians;
        self
    }

    pub fn with_plane_tolerance(mut self, tolerance: f32) -> Self {
        self.plane_tolerance = tolerance;
        self
    }

    pub fn with_max_triangles(mut self, max_triangles: usize) -> Self {
        self.max_triangles = max_triangles;
        self
    }
}
