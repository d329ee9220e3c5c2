//! The full repair pipeline and the [`GeometryRepairer`] facade.

use std::fmt;

use facecrate_core::IndexedMesh;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::params::RepairParams;
use crate::repair::{
    ensure_indexed, recompute_normals, remove_degenerate_triangles, remove_unreferenced_vertices,
    sanitize_numeric,
};
use crate::winding::{correct_winding_orientation, WindingReport};

/// Defect counts from one [`repair`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairReport {
    pub initial_vertices: usize,
    pub initial_triangles: usize,
    pub final_vertices: usize,
    pub final_triangles: usize,
    /// Non-finite coordinates and normals replaced.
    pub non_finite_fixed: usize,
    /// Vertices merged by position welding.
    pub vertices_welded: usize,
    pub degenerates_removed: usize,
    pub unreferenced_removed: usize,
    /// `None` when winding correction was disabled.
    pub winding: Option<WindingReport>,
}

impl RepairReport {
    /// Whether anything was changed.
    #[must_use]
    pub fn had_repairs(&self) -> bool {
        self.non_finite_fixed > 0
            || self.vertices_welded > 0
            || self.degenerates_removed > 0
            || self.unreferenced_removed > 0
            || self.winding.is_some_and(|w| w.flipped)
    }

    /// Share of the input triangles that were removed as degenerate.
    pub fn degenerate_fraction(&self) -> f64 {
        if self.initial_triangles == 0 {
            0.0
        } else {
            self.degenerates_removed as f64 / self.initial_triangles as f64
        }
    }
}

impl fmt::Display for RepairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repair: {} → {} vertices, {} → {} triangles",
            self.initial_vertices, self.final_vertices, self.initial_triangles, self.final_triangles
        )?;
        if self.non_finite_fixed > 0 {
            write!(f, ", {} non-finite values fixed", self.non_finite_fixed)?;
        }
        if self.vertices_welded > 0 {
            write!(f, ", {} vertices welded", self.vertices_welded)?;
        }
        if self.degenerates_removed > 0 {
            write!(f, ", {} degenerate triangles removed", self.degenerates_removed)?;
        }
        if self.unreferenced_removed > 0 {
            write!(f, ", {} unreferenced vertices removed", self.unreferenced_removed)?;
        }
        if self.winding.is_some_and(|w| w.flipped) {
            write!(f, ", winding flipped")?;
        }
        Ok(())
    }
}

/// Run the whole repair pipeline in place.
///
/// Order: sanitize, weld, drop degenerates, compact, fix winding, normals.
/// Never fails; the worst case is an empty mesh.
pub fn repair(mesh: &mut IndexedMesh, params: &RepairParams) -> RepairReport {
    let mut report = RepairReport {
        initial_vertices: mesh.vertex_count(),
        initial_triangles: mesh.face_count(),
        ..Default::default()
    };

    report.non_finite_fixed = sanitize_numeric(mesh, params.sentinel);
    if params.weld_vertices {
        report.vertices_welded = ensure_indexed(mesh, params.quantize_decimals);
    }

    let (cleaned, removed) =
        remove_degenerate_triangles(mesh, params.area_epsilon, params.length_epsilon);
    *mesh = cleaned;
    report.degenerates_removed = removed;

    if params.remove_unreferenced {
        report.unreferenced_removed = remove_unreferenced_vertices(mesh);
    }

    if params.correct_winding {
        report.winding = Some(correct_winding_orientation(mesh, &params.winding));
    }

    if params.recompute_normals {
        recompute_normals(mesh);
    }

    report.final_vertices = mesh.vertex_count();
    report.final_triangles = mesh.face_count();

    if report.degenerates_removed > 0 || report.non_finite_fixed > 0 {
        warn!(
            non_finite = report.non_finite_fixed,
            degenerate = report.degenerates_removed,
            "Repaired geometry defects"
        );
    }
    debug!(%report, "Repair finished");
    report
}

/// Best-effort geometry fixer holding its parameters.
///
/// # Example
///
/// ```
/// use facecrate_core::{IndexedMesh, Point3f};
/// use facecrate_repair::GeometryRepairer;
///
/// let mut mesh = IndexedMesh::from_vertices_and_faces(
///     vec![
///         Point3f::new(0.0, 0.0, 0.0),
///         Point3f::new(1.0, f32::NAN, 0.0),
///         Point3f::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// let report = GeometryRepairer::default().repair(&mut mesh);
/// assert_eq!(report.non_finite_fixed, 1);
/// assert_eq!(mesh.vertices[1].y, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometryRepairer {
    params: RepairParams,
}

impl GeometryRepairer {
    pub fn new(params: RepairParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RepairParams {
        &self.params
    }

    pub fn repair(&self, mesh: &mut IndexedMesh) -> RepairReport {
        repair(mesh, &self.params)
    }

    pub fn sanitize_numeric(&self, mesh: &mut IndexedMesh) -> usize {
        sanitize_numeric(mesh, self.params.sentinel)
    }

    pub fn remove_degenerate_triangles(&self, mesh: &IndexedMesh) -> (IndexedMesh, usize) {
        remove_degenerate_triangles(mesh, self.params.area_epsilon, self.params.length_epsilon)
    }

    pub fn ensure_indexed(&self, mesh: &mut IndexedMesh) -> usize {
        ensure_indexed(mesh, self.params.quantize_decimals)
    }

    pub fn correct_winding_orientation(&self, mesh: &mut IndexedMesh) -> WindingReport {
        correct_winding_orientation(mesh, &self.params.winding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrate_core::Point3f;

    fn dirty_mesh() -> IndexedMesh {
        IndexedMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, f32::INFINITY),
                Point3f::new(5.0, 5.0, 5.0),
            ],
            vec![[0, 1, 2], [3, 4, 5], [0, 1, 1]],
        )
    }

    #[test]
    fn test_pipeline_counts() {
        let mut mesh = dirty_mesh();
        let report = repair(&mut mesh, &RepairParams::default());

        assert_eq!(report.non_finite_fixed, 1);
        assert_eq!(report.vertices_welded, 2);
        assert_eq!(report.degenerates_removed, 1);
        assert_eq!(report.unreferenced_removed, 1);
        assert_eq!(report.final_triangles, 2);
        assert_eq!(report.final_vertices, 4);
        assert!(report.had_repairs());
        assert!(mesh.normals.is_some());
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_pipeline_without_compaction() {
        let mut mesh = dirty_mesh();
        let report = repair(&mut mesh, &RepairParams::for_single_collapse());
        assert_eq!(report.vertices_welded, 0);
        assert_eq!(report.unreferenced_removed, 0);
        assert_eq!(report.degenerates_removed, 1);
        assert_eq!(mesh.vertex_count(), 7);
    }

    #[test]
    fn test_clean_mesh_untouched() {
        let mut mesh = IndexedMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let report = GeometryRepairer::default().repair(&mut mesh);
        assert!(!report.had_repairs());
        assert_eq!(report.degenerate_fraction(), 0.0);
    }

    #[test]
    fn test_report_display() {
        let mut mesh = dirty_mesh();
        let report = repair(&mut mesh, &RepairParams::default());
        let text = format!("{report}");
        assert!(text.contains("7 → 4 vertices"));
        assert!(text.contains("1 degenerate triangles removed"));
    }
}
