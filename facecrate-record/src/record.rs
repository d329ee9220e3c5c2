//! The live mesh with its derived forms and one-level undo.

use std::time::Instant;

use facecrate_core::{
    Completion, DecimationStats, Error, FaceMetadataMapper, IndexedMesh, MeshStats,
    OperationControl, PartialReason, PolygonFace, Result, ViewingMesh,
};
use facecrate_reconstruction::{reconstruct_faces, FaceCapability};
use facecrate_repair::{repair, validate_geometry};
use facecrate_simplification::{DecimationMethod, Decimator, EdgeDecimator};
use tracing::{info, warn};

use crate::config::EngineConfig;

/// Result of an edit on a [`GeometryRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// Counts before and after; `None` when nothing was committed.
    pub stats: Option<DecimationStats>,
    pub completion: Completion,
}

impl EditOutcome {
    fn recovered(reason: String) -> Self {
        Self {
            stats: None,
            completion: Completion::Partial(PartialReason::Recovered(reason)),
        }
    }

    /// Whether the edit replaced the live geometry.
    pub fn committed(&self) -> bool {
        !matches!(
            self.completion,
            Completion::Partial(PartialReason::Recovered(_))
        )
    }
}

/// Indexed mesh, viewing mesh and face capability that always change together.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    mesh: IndexedMesh,
    view: ViewingMesh,
    capability: FaceCapability,
}

impl Snapshot {
    fn new(mesh: IndexedMesh, capability: FaceCapability) -> Self {
        let view = FaceMetadataMapper::explode(&mesh);
        Self {
            mesh,
            view,
            capability,
        }
    }
}

/// Owner of one live mesh.
///
/// Loading repairs, validates and reconstructs faces once. Edits run on a
/// working copy and commit the indexed mesh, its faces and its viewing mesh
/// together, keeping the previous state as the single undo step. Mutation
/// needs `&mut self`, so a record is never observed half-edited.
///
/// # Example
///
/// ```
/// use facecrate_core::{IndexedMesh, Point3f};
/// use facecrate_record::{EngineConfig, GeometryRecord};
///
/// let mesh = IndexedMesh::from_vertices_and_faces(
///     vec![
///         Point3f::new(0.0, 0.0, 0.0),
///         Point3f::new(1.0, 0.0, 0.0),
///         Point3f::new(0.5, 1.0, 0.0),
///         Point3f::new(0.5, 0.5, 1.0),
///     ],
///     vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
/// );
/// let mut record = GeometryRecord::load(mesh, EngineConfig::default()).unwrap();
/// assert_eq!(record.faces().len(), 4);
///
/// record.collapse_edge(0, 1).unwrap();
/// assert_eq!(record.mesh().vertex_count(), 3);
/// assert!(record.undo());
/// assert_eq!(record.mesh().vertex_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GeometryRecord {
    config: EngineConfig,
    live: Snapshot,
    backup: Option<Snapshot>,
    original: Snapshot,
}

impl GeometryRecord {
    /// Repair, validate and reconstruct `mesh`.
    ///
    /// Fails with [`Error::InvalidInput`] for out-of-range indices and with
    /// [`Error::DegenerateGeometry`] when repair leaves nothing usable.
    pub fn load(mesh: IndexedMesh, config: EngineConfig) -> Result<Self> {
        let live = Self::prepare(mesh, &config)?;
        info!(
            vertices = live.mesh.vertex_count(),
            triangles = live.mesh.face_count(),
            faces = live.view.faces.len(),
            provenance = ?live.mesh.provenance,
            "Geometry loaded"
        );
        Ok(Self {
            config,
            original: live.clone(),
            live,
            backup: None,
        })
    }

    fn prepare(mut mesh: IndexedMesh, config: &EngineConfig) -> Result<Snapshot> {
        if !mesh.indices_in_range() {
            return Err(Error::InvalidInput(
                "Triangle references a vertex out of range".to_string(),
            ));
        }

        let mut params = config.repair.clone();
        if mesh.provenance.is_exact() {
            params.correct_winding = false;
        }
        let report = repair(&mut mesh, &params);
        validate_geometry(&mesh, &report, &params)?;

        let outcome = reconstruct_faces(&mesh, &config.reconstruction, &OperationControl::new())?;
        if outcome.rejected_patches > 0 {
            warn!(
                rejected = outcome.rejected_patches,
                "Patches split back into triangles"
            );
        }
        let capability = outcome.apply_to(&mut mesh);
        Ok(Snapshot::new(mesh, capability))
    }

    /// Load a new mesh in place of the current one, keeping the config.
    /// On error the record is left as it was.
    pub fn replace(&mut self, mesh: IndexedMesh) -> Result<()> {
        let live = Self::prepare(mesh, &self.config)?;
        info!(
            vertices = live.mesh.vertex_count(),
            triangles = live.mesh.face_count(),
            "Geometry replaced"
        );
        self.original = live.clone();
        self.live = live;
        self.backup = None;
        Ok(())
    }

    /// Remove about `fraction` of the triangles.
    ///
    /// Invalid requests return `Err` and change nothing. A failure inside
    /// the pipeline keeps the current geometry and is reported as
    /// [`PartialReason::Recovered`].
    pub fn decimate(
        &mut self,
        fraction: f64,
        method: DecimationMethod,
        control: &OperationControl,
    ) -> Result<EditOutcome> {
        Decimator::validate(&self.live.mesh, fraction, &method)?;

        let decimator = Decimator::new(self.config.decimation.clone())
            .with_repair_params(self.config.repair.clone())
            .with_reconstruction_config(self.config.reconstruction.clone());

        match decimator.decimate(&self.live.mesh, fraction, method, control) {
            Ok(output) if output.mesh.face_count() == 0 => Ok(self.recover(
                "decimate",
                "decimation removed every triangle".to_string(),
            )),
            Ok(output) => {
                self.commit(output.mesh, output.capability);
                info!(stats = %output.stats, completion = ?output.completion, "Decimation committed");
                Ok(EditOutcome {
                    stats: Some(output.stats),
                    completion: output.completion,
                })
            }
            Err(err) => Ok(self.recover("decimate", err.to_string())),
        }
    }

    /// Collapse the edge `v1`–`v2`, keeping `v1`.
    ///
    /// Fails with [`Error::InvalidEdge`] and no side effects when the pair is
    /// not an edge of the live mesh.
    pub fn collapse_edge(&mut self, v1: usize, v2: usize) -> Result<EditOutcome> {
        EdgeDecimator::validate(&self.live.mesh, v1, v2)?;

        let start = Instant::now();
        let before = MeshStats::of(&self.live.mesh);
        let decimator = EdgeDecimator::new()
            .with_repair_params(self.config.repair.clone())
            .with_reconstruction_config(self.config.reconstruction.clone());

        match decimator.collapse(&self.live.mesh, v1, v2) {
            Ok(output) => {
                let stats = DecimationStats::new(
                    before,
                    MeshStats::of(&output.mesh),
                    start.elapsed().as_secs_f64() * 1000.0,
                );
                self.commit(output.mesh, output.capability);
                info!(v1, v2, %stats, "Edge collapse committed");
                Ok(EditOutcome {
                    stats: Some(stats),
                    completion: Completion::Complete,
                })
            }
            Err(err) => Ok(self.recover("collapse_edge", err.to_string())),
        }
    }

    fn commit(&mut self, mesh: IndexedMesh, capability: FaceCapability) {
        let next = Snapshot::new(mesh, capability);
        self.backup = Some(std::mem::replace(&mut self.live, next));
    }

    fn recover(&self, operation: &str, reason: String) -> EditOutcome {
        warn!(operation, %reason, "Edit failed, previous geometry kept");
        EditOutcome::recovered(reason)
    }

    /// Restore the state before the last committed edit. Returns `false`
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.backup.take() {
            Some(previous) => {
                self.live = previous;
                info!(vertices = self.live.mesh.vertex_count(), "Edit undone");
                true
            }
            None => false,
        }
    }

    /// Go back to the geometry as loaded. Clears the undo step.
    pub fn reset(&mut self) {
        self.live = self.original.clone();
        self.backup = None;
        info!(vertices = self.live.mesh.vertex_count(), "Geometry reset");
    }

    pub fn mesh(&self) -> &IndexedMesh {
        &self.live.mesh
    }

    pub fn viewing_mesh(&self) -> &ViewingMesh {
        &self.live.view
    }

    /// Polygon faces of the live mesh; one per triangle when reconstruction
    /// was unavailable.
    pub fn faces(&self) -> &[PolygonFace] {
        self.live.mesh.polygon_faces.as_deref().unwrap_or(&[])
    }

    pub fn capability(&self) -> FaceCapability {
        self.live.capability
    }

    pub fn can_undo(&self) -> bool {
        self.backup.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the indexed mesh, faces and viewing mesh describe the same
    /// geometry.
    pub fn is_consistent(&self) -> bool {
        let mesh = &self.live.mesh;
        let view = &self.live.view;
        view.triangle_count() == mesh.face_count()
            && facecrate_core::check_partition(self.faces(), mesh.face_count()).is_ok()
            && view.faces.len() == self.faces().len()
    }
}
