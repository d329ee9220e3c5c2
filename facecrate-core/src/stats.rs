//! Operation statistics and completion status

use crate::mesh::IndexedMesh;
use serde::{Deserialize, Serialize};

/// Why an operation finished short of its requested target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartialReason {
    /// No valid collapse remained before the target was reached.
    QueueExhausted,
    /// A cancellation request stopped the operation.
    Cancelled,
    /// The requested fraction exceeded the configured maximum and was clamped.
    TargetClamped { requested: f64, applied: f64 },
    /// More triangles were removed than requested.
    Overshoot,
    /// A sub-step failed; the previous state was kept.
    Recovered(String),
}

/// Whether an operation reached its requested target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Completion {
    #[default]
    Complete,
    Partial(PartialReason),
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }

    pub fn is_partial(&self) -> bool {
        !self.is_complete()
    }
}

/// Vertex and triangle counts of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
}

impl MeshStats {
    pub fn of(mesh: &IndexedMesh) -> Self {
        Self {
            vertices: mesh.vertex_count(),
            triangles: mesh.face_count(),
        }
    }
}

/// Before/after counts of a simplification.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DecimationStats {
    pub vertices_before: usize,
    pub triangles_before: usize,
    pub vertices_after: usize,
    pub triangles_after: usize,
    /// `1 - triangles_after / triangles_before`.
    pub achieved_reduction_fraction: f64,
    pub processing_time_ms: f64,
}

impl DecimationStats {
    pub fn new(before: MeshStats, after: MeshStats, processing_time_ms: f64) -> Self {
        let achieved_reduction_fraction = if before.triangles == 0 {
            0.0
        } else {
            1.0 - after.triangles as f64 / before.triangles as f64
        };
        Self {
            vertices_before: before.vertices,
            triangles_before: before.triangles,
            vertices_after: after.vertices,
            triangles_after: after.triangles,
            achieved_reduction_fraction,
            processing_time_ms,
        }
    }

    /// Share of vertices removed.
    pub fn vertex_reduction_fraction(&self) -> f64 {
        if self.vertices_before == 0 {
            0.0
        } else {
            1.0 - self.vertices_after as f64 / self.vertices_before as f64
        }
    }
}

impl std::fmt::Display for DecimationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decimation: {} → {} triangles, {} → {} vertices ({:.1}% reduction, {:.1} ms)",
            self.triangles_before,
            self.triangles_after,
            self.vertices_before,
            self.vertices_after,
            self.achieved_reduction_fraction * 100.0,
            self.processing_time_ms
        )
    }
}
