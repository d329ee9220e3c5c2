//! Random decimation, for debugging only.
//!
//! Removes evenly spaced triangles starting from a seeded phase. There is no
//! error metric: the result is full of holes and only useful for exercising
//! the repair and reconstruction stages on cheaply perturbed meshes.

use facecrate_core::{Completion, IndexedMesh, OperationControl, PartialReason};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simplifier::{MeshSimplifier, Simplified};

/// Stride-based triangle removal. Not for production use.
#[derive(Debug, Clone, Copy)]
pub struct RandomDecimator {
    seed: u64,
}

impl RandomDecimator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Indices of the triangles to drop: `remove` evenly spaced picks out of
    /// `count`, shifted by a phase drawn from the seed.
    pub fn removal_indices(&self, count: usize, remove: usize) -> Vec<usize> {
        if remove == 0 || count == 0 {
            return Vec::new();
        }
        let remove = remove.min(count);
        let stride = count / remove;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let phase = rng.gen_range(0..stride);
        (0..remove).map(|k| phase + k * count / remove).collect()
    }
}

impl MeshSimplifier for RandomDecimator {
    fn simplify(&self, mesh: &IndexedMesh, target: usize, control: &OperationControl) -> Simplified {
        let count = mesh.face_count();
        let picks = self.removal_indices(count, count.saturating_sub(target));

        let mut removed = vec![false; count];
        for (done, &t) in picks.iter().enumerate() {
            if !control.checkpoint(done, picks.len(), "random") {
                return Simplified::unchanged(mesh, Completion::Partial(PartialReason::Cancelled));
            }
            removed[t] = true;
        }
        control.finish(picks.len(), "random");

        let mut result = mesh.clone();
        result.polygon_faces = None;
        result.faces = mesh
            .faces
            .iter()
            .zip(&removed)
            .filter(|&(_, &gone)| !gone)
            .map(|(face, _)| *face)
            .collect();
        Simplified {
            mesh: result,
            completion: Completion::Complete,
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
