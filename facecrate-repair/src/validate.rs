//! Post-repair validation.

use facecrate_core::{Bounded, Error, IndexedMesh, Result};

use crate::params::RepairParams;
use crate::repairer::RepairReport;

/// Check that a repaired mesh is usable.
///
/// Fails with [`Error::DegenerateGeometry`] when nothing is left, when the
/// bounding box has no extent, or when repair had to remove more than
/// `max_degenerate_fraction` of the input triangles.
pub fn validate_geometry(
    mesh: &IndexedMesh,
    report: &RepairReport,
    params: &RepairParams,
) -> Result<()> {
    if mesh.face_count() == 0 || mesh.vertex_count() == 0 {
        return Err(Error::DegenerateGeometry(format!(
            "no triangles left after repair ({} in input)",
            report.initial_triangles
        )));
    }

    let fraction = report.degenerate_fraction();
    if fraction > params.max_degenerate_fraction {
        return Err(Error::DegenerateGeometry(format!(
            "{:.1}% of triangles were degenerate",
            fraction * 100.0
        )));
    }

    match mesh.aabb() {
        Some(bbox) if !bbox.is_degenerate() => Ok(()),
        _ => Err(Error::DegenerateGeometry(
            "bounding box has zero extent".to_string(),
        )),
    }
}
