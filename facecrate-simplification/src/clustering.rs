//! Clustering-based mesh simplification
//!
//! Rossignac & Borrel (1993) vertex clustering on a uniform grid: every
//! vertex falls into a cubic cell, each occupied cell becomes one vertex at
//! the centroid of its members, and triangles are re-indexed onto the cells.
//! Triangles whose corners land in fewer than three distinct cells vanish,
//! as do duplicates.

use std::collections::{HashMap, HashSet};

use facecrate_core::{Aabb, Completion, IndexedMesh, OperationControl, PartialReason, Point3f, Vector3f};
use tracing::debug;

use crate::simplifier::{MeshSimplifier, Simplified};

/// Derived cell sizes are halved at most this many times when a grid
/// swallows the whole mesh.
const MAX_REFINEMENTS: usize = 4;

/// Fewest triangles a derived grid may leave behind.
const MIN_SURVIVING_TRIANGLES: usize = 4;

/// Uniform grid vertex clustering.
#[derive(Debug, Clone, Default)]
pub struct ClusteringSimplifier {
    /// Tolerance distance; derived from the target when `None`.
    cell_size: Option<f32>,
}

impl ClusteringSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_size(cell_size: Option<f32>) -> Self {
        Self { cell_size }
    }

    /// Cell size that leaves about `target_clusters` occupied cells.
    /// Flat and linear meshes use only their non-degenerate extents.
    pub fn compute_cell_size(bbox: &Aabb, target_clusters: usize) -> f64 {
        let extent = bbox.extent();
        let eps = 1e-6;

        let extents: Vec<f64> = extent
            .iter()
            .map(|&d| d as f64)
            .filter(|&d| d > eps)
            .collect();
        if extents.is_empty() {
            // All vertices at one point; any cell size works
            return 1.0;
        }

        // product(extents) / cell_size^dim ≈ target_clusters
        let product: f64 = extents.iter().product();
        (product / target_clusters.max(1) as f64).powf(1.0 / extents.len() as f64)
    }

    /// Group vertex indices by grid cell, in first-seen cell order.
    fn uniform_clustering(
        mesh: &IndexedMesh,
        cell_size: f64,
        origin: &Point3f,
        control: &OperationControl,
    ) -> Option<Vec<Vec<usize>>> {
        let mut cell_index: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for (vi, v) in mesh.vertices.iter().enumerate() {
            if !control.checkpoint(vi, mesh.vertices.len(), "cluster") {
                return None;
            }
            let key = (
                ((v.x as f64 - origin.x as f64) / cell_size).floor() as i64,
                ((v.y as f64 - origin.y as f64) / cell_size).floor() as i64,
                ((v.z as f64 - origin.z as f64) / cell_size).floor() as i64,
            );
            let ci = *cell_index.entry(key).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            clusters[ci].push(vi);
        }
        Some(clusters)
    }

    /// Build the simplified mesh from clusters.
    fn build_simplified_mesh(mesh: &IndexedMesh, clusters: &[Vec<usize>]) -> IndexedMesh {
        let mut vertex_to_cluster = vec![0usize; mesh.vertices.len()];
        for (ci, cluster) in clusters.iter().enumerate() {
            for &vi in cluster {
                vertex_to_cluster[vi] = ci;
            }
        }

        // Remap faces, dropping collapsed and duplicate triangles
        let mut new_faces: Vec<[usize; 3]> = Vec::new();
        let mut seen_faces: HashSet<[usize; 3]> = HashSet::new();
        for face in &mesh.faces {
            let mapped = face.map(|v| vertex_to_cluster[v]);
            let [a, b, c] = mapped;
            if a == b || b == c || c == a {
                continue;
            }
            let mut sorted = mapped;
            sorted.sort_unstable();
            if seen_faces.insert(sorted) {
                new_faces.push(mapped);
            }
        }

        let mut used = vec![false; clusters.len()];
        for face in &new_faces {
            for &ci in face {
                used[ci] = true;
            }
        }

        let mut cluster_to_vertex = vec![usize::MAX; clusters.len()];
        let mut vertices = Vec::new();
        let mut normals: Option<Vec<Vector3f>> = mesh.normals.as_ref().map(|_| Vec::new());
        let mut colors: Option<Vec<[u8; 3]>> = mesh.colors.as_ref().map(|_| Vec::new());

        for (ci, cluster) in clusters.iter().enumerate() {
            if !used[ci] {
                continue;
            }
            cluster_to_vertex[ci] = vertices.len();

            let sum = cluster
                .iter()
                .fold(Vector3f::zeros(), |acc, &vi| acc + mesh.vertices[vi].coords);
            vertices.push(Point3f::from(sum / cluster.len() as f32));

            if let (Some(out), Some(src)) = (normals.as_mut(), mesh.normals.as_ref()) {
                let avg: Vector3f = cluster.iter().map(|&vi| src[vi]).sum();
                let len = avg.norm();
                out.push(if len > 1e-12 { avg / len } else { avg });
            }

            if let (Some(out), Some(src)) = (colors.as_mut(), mesh.colors.as_ref()) {
                let mut rgb = [0u32; 3];
                for &vi in cluster {
                    for (channel, value) in rgb.iter_mut().zip(src[vi]) {
                        *channel += value as u32;
                    }
                }
                let n = cluster.len() as u32;
                out.push(rgb.map(|c| (c / n) as u8));
            }
        }

        let faces = new_faces
            .into_iter()
            .map(|face| face.map(|ci| cluster_to_vertex[ci]))
            .collect();

        let mut result = IndexedMesh::from_vertices_and_faces(vertices, faces);
        result.normals = normals;
        result.colors = colors;
        result
    }
}

impl MeshSimplifier for ClusteringSimplifier {
    fn simplify(&self, mesh: &IndexedMesh, target: usize, control: &OperationControl) -> Simplified {
        let Some(bbox) = Aabb::from_points(&mesh.vertices) else {
            return Simplified::unchanged(mesh, Completion::Complete);
        };

        let (mut cell_size, refinements) = match self.cell_size {
            Some(size) => (size as f64, 0),
            None => {
                // Clusters kept in proportion to the triangles kept
                let keep = target as f64 / mesh.face_count().max(1) as f64;
                let clusters = (mesh.vertex_count() as f64 * keep).ceil() as usize;
                (Self::compute_cell_size(&bbox, clusters), MAX_REFINEMENTS)
            }
        };

        let mut attempt = 0;
        loop {
            let Some(clusters) = Self::uniform_clustering(mesh, cell_size, &bbox.min, control)
            else {
                return Simplified::unchanged(mesh, Completion::Partial(PartialReason::Cancelled));
            };
            let simplified = Self::build_simplified_mesh(mesh, &clusters);
            debug!(
                cell_size,
                clusters = clusters.len(),
                triangles = simplified.face_count(),
                "Vertex clustering pass"
            );

            let too_coarse = simplified.face_count() < MIN_SURVIVING_TRIANGLES.min(mesh.face_count());
            if !too_coarse || attempt >= refinements {
                control.finish(mesh.vertex_count(), "cluster");
                return Simplified {
                    mesh: simplified,
                    completion: Completion::Complete,
                };
            }
            attempt += 1;
            cell_size *= 0.5;
        }
    }

    fn name(&self) -> &'static str {
        "vertex_clustering"
    }
}
