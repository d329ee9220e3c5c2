//! Batch decimation entry point.
//!
//! [`Decimator::decimate`] validates the request, picks the method, runs it
//! on a copy of the mesh and hands the result through repair and face
//! reconstruction, so the returned mesh is always in canonical form with a
//! fresh face list.

use std::time::Instant;

use facecrate_core::{
    Completion, DecimationStats, Error, IndexedMesh, MeshStats, OperationControl, PartialReason,
    Provenance, Result,
};
use facecrate_reconstruction::{reconstruct_faces, FaceCapability, ReconstructionConfig};
use facecrate_repair::{repair, sanitize_numeric, RepairParams};
use tracing::{debug, info};

use crate::clustering::ClusteringSimplifier;
use crate::edge_collapse::EdgeCollapseSimplifier;
use crate::params::{DecimateParams, DecimationMethod};
use crate::random::RandomDecimator;
use crate::simplifier::MeshSimplifier;

/// Reductions above the request by more than this count as overshoot.
const OVERSHOOT_EPSILON: f64 = 1e-9;

/// Result of a batch decimation.
#[derive(Debug, Clone)]
pub struct DecimationOutput {
    /// Repaired mesh with reconstructed polygon faces.
    pub mesh: IndexedMesh,
    pub stats: DecimationStats,
    pub completion: Completion,
    /// Whether the face list holds reconstructed faces or one per triangle.
    pub capability: FaceCapability,
}

/// Triangle target derived from a requested fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPlan {
    pub target: usize,
    /// Set when the fraction was clamped by `max_reduction` or the
    /// `min_triangles` floor.
    pub clamped: Option<PartialReason>,
}

/// Whole-mesh simplification to a requested reduction fraction.
///
/// # Example
///
/// ```
/// use facecrate_core::{IndexedMesh, OperationControl, Point3f};
/// use facecrate_simplification::{DecimationMethod, Decimator};
///
/// let mut mesh = IndexedMesh::new();
/// for y in 0..6 {
///     for x in 0..6 {
///         mesh.add_vertex(Point3f::new(x as f32, y as f32, 0.0));
///     }
/// }
/// for y in 0..5 {
///     for x in 0..5 {
///         let i = y * 6 + x;
///         mesh.add_face([i, i + 6, i + 1]);
///         mesh.add_face([i + 1, i + 6, i + 7]);
///     }
/// }
///
/// let output = Decimator::default()
///     .decimate(&mesh, 0.5, DecimationMethod::QuadricEdgeCollapse, &OperationControl::new())
///     .unwrap();
/// assert!(output.stats.triangles_after < output.stats.triangles_before);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decimator {
    params: DecimateParams,
    repair: RepairParams,
    reconstruction: ReconstructionConfig,
}

impl Decimator {
    pub fn new(params: DecimateParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn with_repair_params(mut self, repair: RepairParams) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_reconstruction_config(mut self, config: ReconstructionConfig) -> Self {
        self.reconstruction = config;
        self
    }

    pub fn params(&self) -> &DecimateParams {
        &self.params
    }

    /// Check a request without touching the mesh.
    pub fn validate(mesh: &IndexedMesh, fraction: f64, method: &DecimationMethod) -> Result<()> {
        if mesh.vertex_count() < 4 {
            return Err(Error::InvalidInput(format!(
                "Decimation needs at least 4 vertices, mesh has {}",
                mesh.vertex_count()
            )));
        }
        if mesh.face_count() == 0 {
            return Err(Error::InvalidInput("Mesh has no triangles".to_string()));
        }
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(Error::InvalidInput(format!(
                "Reduction fraction must lie in (0, 1), got {fraction}"
            )));
        }
        if !mesh.indices_in_range() {
            return Err(Error::InvalidInput(
                "Triangle references a vertex out of range".to_string(),
            ));
        }
        if let DecimationMethod::VertexClustering {
            cell_size: Some(size),
        } = method
        {
            if !(*size > 0.0 && size.is_finite()) {
                return Err(Error::InvalidInput(format!(
                    "Clustering tolerance must be positive, got {size}"
                )));
            }
        }
        Ok(())
    }

    /// Triangle count to aim for when removing `fraction` of `triangles`.
    pub fn plan_target(&self, triangles: usize, fraction: f64) -> TargetPlan {
        let applied = fraction.min(self.params.max_reduction);
        let raw = ((1.0 - applied) * triangles as f64).ceil() as usize;
        let floor = self.params.min_triangles.min(triangles);
        let target = raw.max(floor).min(triangles);

        let clamped = (applied < fraction || target > raw).then(|| PartialReason::TargetClamped {
            requested: fraction,
            applied: if triangles == 0 {
                0.0
            } else {
                1.0 - target as f64 / triangles as f64
            },
        });
        TargetPlan { target, clamped }
    }

    /// Remove about `fraction` of the triangles of `mesh`.
    ///
    /// Invalid requests fail before any work. Everything that keeps the
    /// target from being met exactly is reported in the output's
    /// `completion`; on cancellation the mesh as of the last finished step is
    /// returned, still repaired and with faces.
    pub fn decimate(
        &self,
        mesh: &IndexedMesh,
        fraction: f64,
        method: DecimationMethod,
        control: &OperationControl,
    ) -> Result<DecimationOutput> {
        Self::validate(mesh, fraction, &method)?;

        let start = Instant::now();
        let before = MeshStats::of(mesh);
        let plan = self.plan_target(before.triangles, fraction);
        info!(
            method = method.name(),
            fraction,
            target = plan.target,
            vertices = before.vertices,
            triangles = before.triangles,
            "Decimation started"
        );

        let mut working = mesh.clone();
        working.strip_polygon_faces();
        let fixed = sanitize_numeric(&mut working, self.repair.sentinel);
        if fixed > 0 {
            debug!(fixed, "Sanitized coordinates before decimation");
        }

        let simplifier: Box<dyn MeshSimplifier + '_> = match method {
            DecimationMethod::QuadricEdgeCollapse => {
                Box::new(EdgeCollapseSimplifier::new(&self.params))
            }
            DecimationMethod::VertexClustering { cell_size } => {
                Box::new(ClusteringSimplifier::with_cell_size(cell_size))
            }
            DecimationMethod::Random { seed } => Box::new(RandomDecimator::new(seed)),
        };
        let simplified = simplifier.simplify(&working, plan.target, control);

        let mut result = simplified.mesh;
        let report = repair(&mut result, &self.repair);
        debug!(%report, "Post-decimation repair");

        result.provenance = Provenance::Decimated;
        let outcome = reconstruct_faces(&result, &self.reconstruction, control)?;
        debug!(
            faces = outcome.faces.len(),
            merged = outcome.merged_faces,
            rejected = outcome.rejected_patches,
            "Faces rebuilt after decimation"
        );
        let capability = outcome.apply_to(&mut result);

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let stats = DecimationStats::new(before, MeshStats::of(&result), elapsed_ms);

        let completion = if simplified.completion.is_partial() {
            simplified.completion
        } else if let Some(reason) = plan.clamped {
            Completion::Partial(reason)
        } else if stats.achieved_reduction_fraction > fraction + OVERSHOOT_EPSILON {
            Completion::Partial(PartialReason::Overshoot)
        } else {
            Completion::Complete
        };

        info!(
            method = simplifier.name(),
            vertices = stats.vertices_after,
            triangles = stats.triangles_after,
            reduction = stats.achieved_reduction_fraction,
            elapsed_ms,
            ?completion,
            "Decimation finished"
        );

        Ok(DecimationOutput {
            mesh: result,
            stats,
            completion,
            capability,
        })
    }
}
