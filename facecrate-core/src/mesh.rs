//! Indexed triangle mesh, the canonical representation

use crate::point::*;
use crate::polygon::PolygonFace;
use serde::{Deserialize, Serialize};

/// Where the current geometry came from.
///
/// Components branch on this instead of testing loose flags: procedurally
/// generated meshes take the exact coplanar fast path, everything else goes
/// through tolerance-based reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provenance {
    /// Parsed from an external file.
    #[default]
    Loaded,
    /// Built by a parametric generator; faces are exactly planar and convex.
    ProcedurallyGenerated,
    /// Output of a batch decimation or a single edge collapse.
    Decimated,
    /// Triangles rebuilt by a reconstruction step upstream of this crate.
    Reconstructed,
}

impl Provenance {
    /// Whether faces are planar by construction, with no floating-point drift.
    pub fn is_exact(&self) -> bool {
        matches!(self, Provenance::ProcedurallyGenerated)
    }
}

/// A vertex-indexed triangle mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedMesh {
    pub vertices: Vec<Point3f>,
    /// Triangles as index triples into `vertices`.
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub colors: Option<Vec<[u8; 3]>>,
    /// Polygon grouping of `faces`; `None` once a topology change invalidates it.
    pub polygon_faces: Option<Vec<PolygonFace>>,
    pub provenance: Provenance,
}

impl IndexedMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            colors: None,
            polygon_faces: None,
            provenance: Provenance::Loaded,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::new()
        }
    }

    /// Set the provenance tag, builder style.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// The three corner positions of triangle `index`.
    pub fn triangle(&self, index: usize) -> [Point3f; 3] {
        let f = self.faces[index];
        [self.vertices[f[0]], self.vertices[f[1]], self.vertices[f[2]]]
    }

    pub fn triangle_area(&self, index: usize) -> f32 {
        let [a, b, c] = self.triangle(index);
        triangle_area(&a, &b, &c)
    }

    /// Unit normal of triangle `index`, `None` when it has no area.
    pub fn triangle_normal(&self, index: usize) -> Option<Vector3f> {
        let [a, b, c] = self.triangle(index);
        triangle_normal(&a, &b, &c)
    }

    /// Calculate face normals; degenerate triangles get a zero vector
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        (0..self.faces.len())
            .map(|i| self.triangle_normal(i).unwrap_or_else(Vector3f::zeros))
            .collect()
    }

    /// Area-weighted vertex normals
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for face in &self.faces {
            let n = triangle_cross(
                &self.vertices[face[0]],
                &self.vertices[face[1]],
                &self.vertices[face[2]],
            );
            if !n.iter().all(|x| x.is_finite()) {
                continue;
            }
            for &vi in face {
                normals[vi] += n;
            }
        }
        for n in &mut normals {
            let len = n.norm();
            *n = if len > 1e-12 { *n / len } else { Vector3f::z() };
        }
        normals
    }

    /// Whether every triangle index points into the vertex buffer.
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertices.len();
        self.faces.iter().all(|f| f.iter().all(|&i| i < n))
    }

    /// Number of coordinates that are NaN or infinite.
    pub fn non_finite_count(&self) -> usize {
        self.vertices
            .iter()
            .flat_map(|v| v.iter())
            .filter(|c| !c.is_finite())
            .count()
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<[u8; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    pub fn has_polygon_faces(&self) -> bool {
        self.polygon_faces.is_some()
    }

    /// Drop polygon grouping so algorithms see raw triangles only.
    pub fn strip_polygon_faces(&mut self) -> Option<Vec<PolygonFace>> {
        self.polygon_faces.take()
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
        self.colors = None;
        self.polygon_faces = None;
    }
}

impl Default for IndexedMesh {
    fn default() -> Self {
        Self::new()
    }
}
