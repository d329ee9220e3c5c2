//! Global winding correction.
//!
//! Loaded meshes sometimes come with every triangle wound clockwise. A sample
//! of triangles is classified by comparing its normal against the direction
//! from the bounding-box center; if most point inward, the whole mesh is
//! flipped.

use facecrate_core::{triangle_centroid, triangle_normal, Aabb, IndexedMesh};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::params::WindingConfig;

/// Outcome of a winding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindingReport {
    /// Triangles looked at.
    pub sampled: usize,
    /// Samples that were neither degenerate nor near-tangent.
    pub classified: usize,
    pub outward: usize,
    pub inward: usize,
    /// Whether every triangle was flipped.
    pub flipped: bool,
}

/// Classify a strided sample of triangles as facing outward or inward.
pub fn classify_winding(mesh: &IndexedMesh, config: &WindingConfig) -> WindingReport {
    let mut report = WindingReport::default();
    let n = mesh.faces.len();
    if n == 0 || config.max_samples == 0 || !mesh.indices_in_range() {
        return report;
    }
    let Some(center) = Aabb::from_points(&mesh.vertices).map(|b| b.center()) else {
        return report;
    };

    let stride = n.div_ceil(config.max_samples).max(1);
    for face in mesh.faces.iter().step_by(stride).take(config.max_samples) {
        report.sampled += 1;
        let [a, b, c] = face.map(|i| mesh.vertices[i]);
        let Some(normal) = triangle_normal(&a, &b, &c) else {
            continue;
        };
        let offset = triangle_centroid(&a, &b, &c) - center;
        let len = offset.norm();
        if !(len > 1e-12) {
            continue;
        }
        let dot = normal.dot(&(offset / len));
        if dot > config.tangent_threshold {
            report.outward += 1;
            report.classified += 1;
        } else if dot < -config.tangent_threshold {
            report.inward += 1;
            report.classified += 1;
        }
    }
    report
}

/// Reverse every triangle and polygon face, then recompute vertex normals.
pub fn flip_all(mesh: &mut IndexedMesh) {
    for face in &mut mesh.faces {
        face.swap(1, 2);
    }
    if let Some(faces) = mesh.polygon_faces.as_mut() {
        for face in faces.iter_mut() {
            face.reverse();
        }
    }
    mesh.normals = Some(mesh.calculate_vertex_normals());
}

/// Flip the mesh when the sampled majority of triangles faces inward.
///
/// A second call on the result never flips again: inward and outward counts
/// swap under a flip, and the flip threshold is above one half.
pub fn correct_winding_orientation(mesh: &mut IndexedMesh, config: &WindingConfig) -> WindingReport {
    let mut report = classify_winding(mesh, config);
    let threshold = config.flip_ratio as f64 * report.classified as f64;

    if report.classified > config.min_classified && report.inward as f64 > threshold {
        flip_all(mesh);
        report.flipped = true;
        info!(
            inward = report.inward,
            classified = report.classified,
            "Flipped inverted mesh winding"
        );
    } else {
        debug!(
            outward = report.outward,
            inward = report.inward,
            sampled = report.sampled,
            "Winding kept"
        );
    }
    report
}
