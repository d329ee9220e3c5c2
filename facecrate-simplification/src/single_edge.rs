//! Interactive single edge collapse.

use facecrate_core::{
    triangle_normal, Error, IndexedMesh, OperationControl, Point3f, Provenance, Result,
};
use facecrate_reconstruction::{reconstruct_faces, FaceCapability, ReconstructionConfig};
use facecrate_repair::{repair, RepairParams};
use tracing::debug;

use crate::quadric::Quadric;

/// Mesh after one edge collapse, with its rebuilt faces.
#[derive(Debug, Clone)]
pub struct EdgeCollapseOutput {
    pub mesh: IndexedMesh,
    pub capability: FaceCapability,
    /// Where the surviving vertex ended up.
    pub position: Point3f,
}

/// Collapses one user-picked edge at a time.
///
/// The surviving vertex `v1` moves to the quadric-optimal point of the two
/// endpoints, `v2` is spliced out of the vertex buffer and every higher index
/// shifts down by one. The vertex count always drops by exactly one.
#[derive(Debug, Clone)]
pub struct EdgeDecimator {
    repair: RepairParams,
    reconstruction: ReconstructionConfig,
}

impl Default for EdgeDecimator {
    fn default() -> Self {
        Self {
            repair: RepairParams::for_single_collapse(),
            reconstruction: ReconstructionConfig::default(),
        }
    }
}

impl EdgeDecimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repair settings for the post-collapse pass. Welding and vertex
    /// compaction are always switched off so the vertex count drops by
    /// exactly one.
    pub fn with_repair_params(mut self, repair: RepairParams) -> Self {
        self.repair = repair.without_compaction();
        self
    }

    pub fn with_reconstruction_config(mut self, config: ReconstructionConfig) -> Self {
        self.reconstruction = config;
        self
    }

    /// Check that `v1`–`v2` is an edge of `mesh`.
    ///
    /// Fails with [`Error::InvalidInput`] when any triangle references a
    /// vertex out of range, and with [`Error::InvalidEdge`] otherwise.
    pub fn validate(mesh: &IndexedMesh, v1: usize, v2: usize) -> Result<()> {
        if !mesh.indices_in_range() {
            return Err(Error::InvalidInput(
                "Triangle references a vertex out of range".to_string(),
            ));
        }
        if v1 == v2 {
            return Err(Error::invalid_edge(v1, v2, "endpoints are the same vertex"));
        }
        let n = mesh.vertex_count();
        if v1 >= n || v2 >= n {
            return Err(Error::invalid_edge(
                v1,
                v2,
                format!("vertex index out of range for {n} vertices"),
            ));
        }
        if !mesh.faces.iter().any(|f| f.contains(&v1) && f.contains(&v2)) {
            return Err(Error::invalid_edge(v1, v2, "vertices share no triangle"));
        }
        Ok(())
    }

    /// Collapse `v2` into `v1` and return the repaired mesh with faces.
    pub fn collapse_edge(&self, mesh: &IndexedMesh, v1: usize, v2: usize) -> Result<IndexedMesh> {
        Ok(self.collapse(mesh, v1, v2)?.mesh)
    }

    /// Like [`collapse_edge`](Self::collapse_edge), also reporting the face
    /// capability and the new vertex position.
    pub fn collapse(&self, mesh: &IndexedMesh, v1: usize, v2: usize) -> Result<EdgeCollapseOutput> {
        Self::validate(mesh, v1, v2)?;

        let mut working = mesh.clone();
        working.strip_polygon_faces();

        let position = collapse_position(&working, v1, v2);
        working.vertices[v1] = position;

        working.faces = working
            .faces
            .iter()
            .filter(|f| !(f.contains(&v1) && f.contains(&v2)))
            .map(|f| f.map(|v| if v == v2 { v1 } else { v }))
            .map(|f| f.map(|v| if v > v2 { v - 1 } else { v }))
            .collect();
        working.vertices.remove(v2);
        if let Some(normals) = working.normals.as_mut() {
            normals.remove(v2);
        }
        if let Some(colors) = working.colors.as_mut() {
            colors.remove(v2);
        }

        let report = repair(&mut working, &self.repair);
        working.provenance = Provenance::Decimated;

        let outcome = reconstruct_faces(&working, &self.reconstruction, &OperationControl::new())?;
        let capability = outcome.apply_to(&mut working);
        debug!(
            v1,
            v2,
            vertices = working.vertex_count(),
            triangles = working.face_count(),
            degenerate = report.degenerates_removed,
            "Edge collapsed"
        );

        Ok(EdgeCollapseOutput {
            mesh: working,
            capability,
            position,
        })
    }
}

/// Quadric-optimal target for merging `v1` and `v2`, or their midpoint when
/// the optimum would flatten a surviving triangle.
fn collapse_position(mesh: &IndexedMesh, v1: usize, v2: usize) -> Point3f {
    let (a, b) = (mesh.vertices[v1], mesh.vertices[v2]);
    let mut quadric = Quadric::zero();
    for face in &mesh.faces {
        let [p, q, r] = face.map(|v| mesh.vertices[v]);
        if let Some(plane) = Quadric::from_triangle(&p, &q, &r) {
            // Counted once per endpoint, as per-vertex quadrics would be
            let weight = face.iter().filter(|&&v| v == v1 || v == v2).count();
            if weight > 0 {
                quadric += plane * weight as f64;
            }
        }
    }

    let (optimal, _) = quadric.collapse_target(&a, &b);
    let keeps_area = mesh
        .faces
        .iter()
        .filter(|f| (f.contains(&v1) || f.contains(&v2)) && !(f.contains(&v1) && f.contains(&v2)))
        .all(|f| {
            let [p, q, r] = f.map(|v| if v == v1 || v == v2 { optimal } else { mesh.vertices[v] });
            triangle_normal(&p, &q, &r).is_some()
        });

    if keeps_area {
        optimal
    } else {
        nalgebra::center(&a, &b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrate_core::Vector3f;

    fn make_tetrahedron() -> IndexedMesh {
        IndexedMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
                Point3f::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    fn make_fan() -> IndexedMesh {
        // Hexagon around a center vertex 0
        let mut mesh = IndexedMesh::new();
        mesh.add_vertex(Point3f::origin());
        for i in 0..6 {
            let a = std::f32::consts::TAU * i as f32 / 6.0;
            mesh.add_vertex(Point3f::new(a.cos(), a.sin(), 0.0));
        }
        for i in 0..6 {
            mesh.add_face([0, 1 + i, 1 + (i + 1) % 6]);
        }
        mesh
    }

    #[test]
    fn test_invalid_edges() {
        let mesh = make_fan();
        let decimator = EdgeDecimator::new();
        for (v1, v2) in [(2, 2), (0, 7), (9, 1), (1, 4)] {
            let err = decimator.collapse_edge(&mesh, v1, v2).unwrap_err();
            assert!(matches!(err, Error::InvalidEdge { .. }), "{v1}-{v2}");
        }
    }

    #[test]
    fn test_tetrahedron_collapse() {
        let mesh = make_tetrahedron();
        let collapsed = EdgeDecimator::new().collapse_edge(&mesh, 0, 1).unwrap();
        assert_eq!(collapsed.vertex_count(), 3);
        assert_eq!(collapsed.face_count(), 2);
        for i in 0..collapsed.face_count() {
            assert!(collapsed.triangle_area(i) > 1e-6);
        }
    }

    #[test]
    fn test_higher_indices_shift_down() {
        let mesh = make_fan();
        let collapsed = EdgeDecimator::new().collapse_edge(&mesh, 1, 2).unwrap();
        assert_eq!(collapsed.vertex_count(), 6);
        assert_eq!(collapsed.face_count(), 5);
        // Old vertex 3 is now 2
        assert_eq!(collapsed.vertices[2], mesh.vertices[3]);
        assert!(collapsed.indices_in_range());
    }

    #[test]
    fn test_surviving_vertex_moves() {
        let mesh = make_fan();
        let output = EdgeDecimator::new().collapse(&mesh, 0, 1).unwrap();
        // Flat fan: singular quadric, midpoint
        assert_eq!(output.position, nalgebra::center(&mesh.vertices[0], &mesh.vertices[1]));
        assert_eq!(output.mesh.vertices[0], output.position);
    }

    #[test]
    fn test_faces_rebuilt() {
        let mesh = make_fan();
        let collapsed = EdgeDecimator::new().collapse_edge(&mesh, 1, 2).unwrap();
        let faces = collapsed.polygon_faces.as_ref().unwrap();
        assert!(facecrate_core::check_partition(faces, collapsed.face_count()).is_ok());
        assert_eq!(collapsed.provenance, Provenance::Decimated);
    }

    #[test]
    fn test_repair_params_keep_vertex_buffer() {
        let decimator = EdgeDecimator::new().with_repair_params(RepairParams {
            correct_winding: false,
            ..Default::default()
        });
        assert!(!decimator.repair.weld_vertices);
        assert!(!decimator.repair.remove_unreferenced);
        assert!(!decimator.repair.correct_winding);

        let mesh = make_fan();
        let collapsed = decimator.collapse_edge(&mesh, 1, 2).unwrap();
        assert_eq!(collapsed.vertex_count(), 6);
    }

    #[test]
    fn test_attributes_spliced() {
        let mut mesh = make_fan();
        mesh.set_colors((0..7).map(|i| [i as u8, 0, 0]).collect());
        mesh.set_normals(vec![Vector3f::z(); 7]);
        let collapsed = EdgeDecimator::new().collapse_edge(&mesh, 1, 2).unwrap();
        let colors = collapsed.colors.as_ref().unwrap();
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[2], [3, 0, 0]);
        assert_eq!(collapsed.normals.as_ref().unwrap().len(), 6);
    }
}
