//! Tolerance-based polygon reconstruction for loaded and decimated meshes.

use std::time::Instant;

use facecrate_core::{Bounded, Error, IndexedMesh, OperationControl, Result, Vector3f};
use tracing::{info, warn};

use crate::boundary::LoopChecks;
use crate::config::ReconstructionConfig;
use crate::outcome::{FaceCapability, FaceReconstructor, ReconstructionOutcome};
use crate::patches::{assemble_faces, grow_patches};

/// Recovers n-gon faces from a triangulated mesh by growing coplanar patches.
///
/// Each patch is seeded from the lowest unvisited triangle. A neighbor joins
/// when its normal is within `angle_tolerance` of the seed normal and all its
/// vertices lie within `plane_tolerance × diagonal` of the seed plane.
/// Comparing against the seed rather than the neighbor keeps slowly curving
/// surfaces from collapsing into one face.
#[derive(Debug, Clone, Default)]
pub struct PolygonReconstructor {
    config: ReconstructionConfig,
}

impl PolygonReconstructor {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    fn loop_checks(&self) -> LoopChecks {
        LoopChecks {
            min_area: self.config.min_area,
            area_tolerance: Some(self.config.area_tolerance),
            check_self_intersection: true,
        }
    }
}

impl FaceReconstructor for PolygonReconstructor {
    fn reconstruct(
        &self,
        mesh: &IndexedMesh,
        control: &OperationControl,
    ) -> Result<ReconstructionOutcome> {
        if !mesh.indices_in_range() {
            return Err(Error::InvalidInput(
                "triangle indices out of range".to_string(),
            ));
        }
        let n = mesh.face_count();
        if n > self.config.max_triangles {
            warn!(
                triangles = n,
                limit = self.config.max_triangles,
                "Mesh too large for face reconstruction"
            );
            return Ok(ReconstructionOutcome::trivial(mesh, FaceCapability::Unavailable));
        }

        let start = Instant::now();
        let normals: Vec<Option<Vector3f>> = (0..n).map(|t| mesh.triangle_normal(t)).collect();
        let diagonal = mesh.aabb().map_or(0.0, |b| b.diagonal());
        let plane_tolerance = self.config.plane_tolerance * diagonal;
        let min_cos = self.config.angle_tolerance.cos();

        let joins = |seed: usize, candidate: usize| {
            let (Some(seed_normal), Some(normal)) = (normals[seed], normals[candidate]) else {
                return false;
            };
            if seed_normal.dot(&normal) < min_cos {
                return false;
            }
            let offset = seed_normal.dot(&mesh.vertices[mesh.faces[seed][0]].coords);
            mesh.faces[candidate]
                .iter()
                .all(|&v| (seed_normal.dot(&mesh.vertices[v].coords) - offset).abs() <= plane_tolerance)
        };

        let patches = grow_patches(mesh, &normals, joins, control, "reconstruct faces");
        let assembled = assemble_faces(mesh, &patches.patches, &normals, &self.loop_checks());

        if assembled.rejected > 0 {
            warn!(rejected = assembled.rejected, "Patches split back into triangles");
        }
        info!(
            triangles = n,
            faces = assembled.faces.len(),
            merged = assembled.merged,
            time_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Polygon faces reconstructed"
        );

        Ok(ReconstructionOutcome {
            faces: assembled.faces,
            capability: FaceCapability::Available,
            rejected_patches: assembled.rejected,
            merged_faces: assembled.merged,
            completion: patches.completion,
        })
    }

    fn name(&self) -> &'static str {
        "polygon"
    }
}
