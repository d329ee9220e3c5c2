//! Whole-session tests for GeometryRecord: load, edit, undo.

use approx::assert_relative_eq;
use facecrate_core::{Bounded, Completion, FaceKind, IndexedMesh, OperationControl, Point3f, Provenance};
use facecrate_record::{EngineConfig, GeometryRecord};
use facecrate_repair::RepairParams;
use facecrate_simplification::DecimationMethod;

/// Closed cylinder: `segments` around, `rings` vertex rings, fan caps.
fn create_cylinder(segments: usize, rings: usize) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for r in 0..rings {
        let z = r as f32 / (rings - 1) as f32 * 2.0;
        for s in 0..segments {
            let a = std::f32::consts::TAU * s as f32 / segments as f32;
            mesh.add_vertex(Point3f::new(a.cos(), a.sin(), z));
        }
    }
    let bottom = mesh.add_vertex(Point3f::new(0.0, 0.0, 0.0));
    let top = mesh.add_vertex(Point3f::new(0.0, 0.0, 2.0));
    let at = |r: usize, s: usize| r * segments + s % segments;

    for r in 0..rings - 1 {
        for s in 0..segments {
            mesh.add_face([at(r, s), at(r, s + 1), at(r + 1, s + 1)]);
            mesh.add_face([at(r, s), at(r + 1, s + 1), at(r + 1, s)]);
        }
    }
    for s in 0..segments {
        mesh.add_face([bottom, at(0, s + 1), at(0, s)]);
        mesh.add_face([top, at(rings - 1, s), at(rings - 1, s + 1)]);
    }
    mesh
}

/// Unit cube as an STL reader would deliver it: 36 unshared corners.
fn create_triangle_soup_cube() -> IndexedMesh {
    let corners = [
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(1.0, 0.0, 0.0),
        Point3f::new(1.0, 1.0, 0.0),
        Point3f::new(0.0, 1.0, 0.0),
        Point3f::new(0.0, 0.0, 1.0),
        Point3f::new(1.0, 0.0, 1.0),
        Point3f::new(1.0, 1.0, 1.0),
        Point3f::new(0.0, 1.0, 1.0),
    ];
    let triangles = [
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [2, 3, 7],
        [2, 7, 6],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    let mut mesh = IndexedMesh::new();
    for t in triangles {
        let a = mesh.add_vertex(corners[t[0]]);
        let b = mesh.add_vertex(corners[t[1]]);
        let c = mesh.add_vertex(corners[t[2]]);
        mesh.add_face([a, b, c]);
    }
    mesh
}

#[test]
fn test_soup_cube_loads_as_six_quads() {
    let record = GeometryRecord::load(create_triangle_soup_cube(), EngineConfig::default()).unwrap();
    assert_eq!(record.mesh().vertex_count(), 8);
    assert_eq!(record.mesh().face_count(), 12);
    assert_eq!(record.faces().len(), 6);
    for face in record.faces() {
        assert_eq!(face.kind, FaceKind::Quad);
        assert_eq!(face.vertices.len(), 4);
        assert_eq!(face.triangles.len(), 2);
    }

    let view = record.viewing_mesh();
    assert_eq!(view.corners.len(), 36);
    let face = view.face_at_corner(7).unwrap();
    assert!(face.triangles.contains(&2));
}

#[test]
fn test_nan_triangle_loads() {
    let mesh = IndexedMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, f32::NAN, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    );
    let record = GeometryRecord::load(mesh, EngineConfig::default()).unwrap();
    assert_eq!(record.mesh().vertices[1], Point3f::new(1.0, 0.0, 0.0));

    let bbox = record.mesh().aabb().unwrap();
    assert_eq!(bbox.min, Point3f::new(0.0, 0.0, 0.0));
    assert_eq!(bbox.max, Point3f::new(1.0, 1.0, 0.0));
    assert_eq!(record.faces().len(), 1);
}

#[test]
fn test_decimate_cylinder_session() {
    let mut record = GeometryRecord::load(create_cylinder(24, 23), EngineConfig::default()).unwrap();
    assert_eq!(record.mesh().face_count(), 1104);
    let loaded = record.mesh().clone();

    let outcome = record
        .decimate(0.5, DecimationMethod::QuadricEdgeCollapse, &OperationControl::new())
        .unwrap();
    assert!(outcome.committed());
    let stats = outcome.stats.unwrap();
    assert_eq!(stats.triangles_before, 1104);
    assert_eq!(stats.triangles_after, record.mesh().face_count());
    assert_relative_eq!(
        stats.achieved_reduction_fraction,
        1.0 - stats.triangles_after as f64 / 1104.0
    );
    assert!(record.mesh().face_count() <= 607);
    assert_eq!(record.mesh().provenance, Provenance::Decimated);
    assert!(record.is_consistent());

    assert!(record.undo());
    assert_eq!(record.mesh(), &loaded);
}

/// Six times the enclosed volume; negative when triangles face inward.
fn signed_volume(mesh: &IndexedMesh) -> f32 {
    mesh.faces
        .iter()
        .map(|&[a, b, c]| {
            let (p, q, r) = (mesh.vertices[a].coords, mesh.vertices[b].coords, mesh.vertices[c].coords);
            p.dot(&q.cross(&r))
        })
        .sum()
}

#[test]
fn test_collapse_follows_repair_config() {
    let mut mesh = create_cylinder(24, 23);
    for face in &mut mesh.faces {
        face.swap(1, 2);
    }
    let config = EngineConfig::default().with_repair(RepairParams {
        correct_winding: false,
        ..Default::default()
    });
    let mut record = GeometryRecord::load(mesh, config).unwrap();
    assert!(signed_volume(record.mesh()) < 0.0);

    let [v1, v2, _] = record.mesh().faces[0];
    let before = record.mesh().vertex_count();
    assert!(record.collapse_edge(v1, v2).unwrap().committed());
    // Winding correction is off in the config, so the inside-out mesh stays so
    assert!(signed_volume(record.mesh()) < 0.0);
    assert_eq!(record.mesh().vertex_count(), before - 1);
}

#[test]
fn test_generated_mesh_takes_exact_path() {
    let mesh = create_cylinder(8, 2).with_provenance(Provenance::ProcedurallyGenerated);
    let record = GeometryRecord::load(mesh, EngineConfig::default()).unwrap();
    // Eight side quads and two octagon caps
    assert_eq!(record.faces().len(), 10);
    assert_eq!(
        record.faces().iter().filter(|f| f.kind == FaceKind::Polygon(8)).count(),
        2
    );
}

#[test]
fn test_clustering_then_collapse() {
    let mut record = GeometryRecord::load(create_cylinder(16, 9), EngineConfig::default()).unwrap();
    let outcome = record
        .decimate(
            0.5,
            DecimationMethod::VertexClustering { cell_size: None },
            &OperationControl::new(),
        )
        .unwrap();
    assert!(outcome.committed());
    assert!(record.is_consistent());

    let [v1, v2, _] = record.mesh().faces[0];
    let before = record.mesh().vertex_count();
    let outcome = record.collapse_edge(v1, v2).unwrap();
    assert_eq!(outcome.completion, Completion::Complete);
    assert_eq!(record.mesh().vertex_count(), before - 1);
    assert!(record.is_consistent());
}
