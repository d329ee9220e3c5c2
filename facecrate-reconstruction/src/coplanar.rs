//! Exact-plane merging for procedurally generated meshes.

use facecrate_core::{Bounded, Error, IndexedMesh, OperationControl, Result, Vector3f};
use tracing::debug;

use crate::boundary::LoopChecks;
use crate::config::ReconstructionConfig;
use crate::outcome::{FaceCapability, FaceReconstructor, ReconstructionOutcome};
use crate::patches::{assemble_faces, grow_patches};

/// Supporting plane rounded to a fixed grid.
type PlaneKey = [i64; 4];

/// Merges adjacent triangles that share the same quantized supporting plane.
///
/// Generated primitives are planar and convex by construction, so there is
/// no angular search and no area check; only the loop walk can still reject
/// a patch.
#[derive(Debug, Clone, Default)]
pub struct CoplanarMerger {
    config: ReconstructionConfig,
}

impl CoplanarMerger {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    fn plane_key(&self, normal: &Vector3f, offset: f32, scale: f32) -> PlaneKey {
        let nq = self.config.normal_quantum.max(f32::EPSILON) as f64;
        let dq = self.config.offset_quantum.max(f32::EPSILON) as f64;
        [
            (normal.x as f64 / nq).round() as i64,
            (normal.y as f64 / nq).round() as i64,
            (normal.z as f64 / nq).round() as i64,
            (offset as f64 / scale as f64 / dq).round() as i64,
        ]
    }
}

impl FaceReconstructor for CoplanarMerger {
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
        let normals: Vec<Option<Vector3f>> = (0..n).map(|t| mesh.triangle_normal(t)).collect();
        let scale = mesh
            .aabb()
            .map(|b| b.diagonal())
            .filter(|d| *d > 0.0)
            .unwrap_or(1.0);
        let keys: Vec<Option<PlaneKey>> = normals
            .iter()
            .enumerate()
            .map(|(t, normal)| {
                normal.map(|nrm| {
                    let offset = nrm.dot(&mesh.vertices[mesh.faces[t][0]].coords);
                    self.plane_key(&nrm, offset, scale)
                })
            })
            .collect();

        let joins = |seed: usize, candidate: usize| {
            keys[seed].is_some() && keys[seed] == keys[candidate]
        };
        let patches = grow_patches(mesh, &normals, joins, control, "merge coplanar faces");
        let assembled = assemble_faces(
            mesh,
            &patches.patches,
            &normals,
            &LoopChecks::topology_only(),
        );

        debug!(
            triangles = n,
            faces = assembled.faces.len(),
            rejected = assembled.rejected,
            "Coplanar faces merged"
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
        "coplanar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrate_core::{check_partition, FaceKind, Point3f};

    /// Regular hexagon as a fan around its center, with a pyramid apex
    /// triangle glued to one side.
    fn hexagon_fan() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        let center = mesh.add_vertex(Point3f::new(0.0, 0.0, 0.0));
        for i in 0..6 {
            let a = std::f32::consts::TAU * i as f32 / 6.0;
            mesh.add_vertex(Point3f::new(a.cos(), a.sin(), 0.0));
        }
        for i in 0..6 {
            mesh.add_face([center, 1 + i, 1 + (i + 1) % 6]);
        }
        mesh
    }

    #[test]
    fn test_fan_merges_into_hexagon() {
        let outcome = CoplanarMerger::default()
            .reconstruct(&hexagon_fan(), &OperationControl::new())
            .unwrap();
        assert_eq!(outcome.faces.len(), 1);
        let face = &outcome.faces[0];
        assert_eq!(face.kind, FaceKind::Hexagon);
        assert_eq!(face.vertices, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(face.triangles, (0..6).collect::<Vec<_>>());
        assert!((face.normal.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_different_planes_stay_apart() {
        let mut mesh = hexagon_fan();
        let apex = mesh.add_vertex(Point3f::new(0.8, 0.5, 1.0));
        mesh.add_face([2, 1, apex]);
        let outcome = CoplanarMerger::default()
            .reconstruct(&mesh, &OperationControl::new())
            .unwrap();
        assert_eq!(outcome.faces.len(), 2);
        assert!(check_partition(&outcome.faces, 7).is_ok());
    }

    #[test]
    fn test_parallel_planes_not_merged() {
        // Same normal, different offsets
        let mesh = IndexedMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(5.0, 0.0, 1.0),
                Point3f::new(6.0, 0.0, 1.0),
                Point3f::new(5.0, 1.0, 1.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let merger = CoplanarMerger::default();
        let outcome = merger.reconstruct(&mesh, &OperationControl::new()).unwrap();
        assert_eq!(outcome.faces.len(), 2);
        assert_eq!(merger.name(), "coplanar");
    }
}
