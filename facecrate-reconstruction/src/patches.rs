//! Patch growing and face assembly shared by both reconstructors.

use std::collections::VecDeque;

use facecrate_core::{
    triangle_cross, Completion, IndexedMesh, MeshAdjacency, OperationControl, PartialReason,
    PolygonFace, Vector3f,
};
use tracing::{debug, trace};

use crate::boundary::{trace_patch, LoopChecks};

/// Triangle groups in seed order, each sorted ascending.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatchSet {
    pub patches: Vec<Vec<usize>>,
    pub completion: Completion,
}

/// Breadth-first region growing over manifold triangle adjacency.
///
/// `joins(seed, candidate)` decides membership; it is only asked about
/// triangles that have a normal. Triangles without one stay alone. On
/// cancellation every remaining triangle becomes its own patch.
pub(crate) fn grow_patches<F>(
    mesh: &IndexedMesh,
    normals: &[Option<Vector3f>],
    mut joins: F,
    control: &OperationControl,
    stage: &str,
) -> PatchSet
where
    F: FnMut(usize, usize) -> bool,
{
    let n = mesh.face_count();
    let adjacency = MeshAdjacency::build(&mesh.faces, mesh.vertex_count());
    let mut visited = vec![false; n];
    let mut set = PatchSet::default();
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        if set.completion.is_complete() && !control.checkpoint(set.patches.len(), n, stage) {
            debug!(stage, patches = set.patches.len(), "Reconstruction cancelled");
            set.completion = Completion::Partial(PartialReason::Cancelled);
        }
        visited[seed] = true;
        let mut patch = vec![seed];

        if set.completion.is_complete() && normals[seed].is_some() {
            queue.push_back(seed);
            while let Some(t) = queue.pop_front() {
                for neighbor in adjacency.face_neighbors(&mesh.faces, t) {
                    if !visited[neighbor] && normals[neighbor].is_some() && joins(seed, neighbor) {
                        visited[neighbor] = true;
                        patch.push(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        patch.sort_unstable();
        set.patches.push(patch);
    }
    control.finish(n, stage);
    set
}

/// Faces built from patches, plus rejection and merge counts.
#[derive(Debug, Clone, Default)]
pub(crate) struct AssembledFaces {
    pub faces: Vec<PolygonFace>,
    pub rejected: usize,
    pub merged: usize,
}

/// Area-weighted unit normal of a patch.
fn patch_normal(mesh: &IndexedMesh, patch: &[usize], fallback: Vector3f) -> Vector3f {
    let sum: Vector3f = patch
        .iter()
        .map(|&t| {
            let [a, b, c] = mesh.triangle(t);
            triangle_cross(&a, &b, &c)
        })
        .sum();
    let len = sum.norm();
    if len > 1e-12 && len.is_finite() {
        sum / len
    } else {
        fallback
    }
}

/// Turn each patch into one polygon face, or into one face per triangle when
/// its boundary does not form a single simple loop.
pub(crate) fn assemble_faces(
    mesh: &IndexedMesh,
    patches: &[Vec<usize>],
    normals: &[Option<Vector3f>],
    checks: &LoopChecks,
) -> AssembledFaces {
    let mut out = AssembledFaces {
        faces: Vec::with_capacity(patches.len()),
        ..Default::default()
    };

    for patch in patches {
        if let [single] = patch.as_slice() {
            out.faces
                .push(PolygonFace::from_triangle(&mesh.vertices, mesh.faces[*single], *single));
            continue;
        }

        let fallback = normals[patch[0]].unwrap_or_else(Vector3f::z);
        let normal = patch_normal(mesh, patch, fallback);
        match trace_patch(&mesh.vertices, &mesh.faces, patch, &normal, checks) {
            Ok(perimeter) => {
                out.faces.push(PolygonFace::new(perimeter, normal, patch.clone()));
                out.merged += 1;
            }
            Err(reason) => {
                trace!(%reason, triangles = patch.len(), "Patch split into triangles");
                out.rejected += 1;
                out.faces.extend(
                    patch
                        .iter()
                        .map(|&t| PolygonFace::from_triangle(&mesh.vertices, mesh.faces[t], t)),
                );
            }
        }
    }
    out
}
