//! Integration tests for facecrate-reconstruction
//!
//! Whole-mesh reconstruction on closed solids and the partition property on
//! arbitrary triangle sets.

use facecrate_core::{check_partition, FaceKind, IndexedMesh, OperationControl, Point3f, Provenance};
use facecrate_reconstruction::*;
use proptest::prelude::*;

/// Unit cube with 8 shared vertices and 12 outward triangles.
fn create_cube() -> IndexedMesh {
    let vertices = vec![
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(1.0, 0.0, 0.0),
        Point3f::new(1.0, 1.0, 0.0),
        Point3f::new(0.0, 1.0, 0.0),
        Point3f::new(0.0, 0.0, 1.0),
        Point3f::new(1.0, 0.0, 1.0),
        Point3f::new(1.0, 1.0, 1.0),
        Point3f::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
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
    IndexedMesh::from_vertices_and_faces(vertices, faces)
}

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

#[test]
fn test_cube_yields_six_quads() {
    let mesh = create_cube();
    let outcome = reconstruct_faces(
        &mesh,
        &ReconstructionConfig::default(),
        &OperationControl::new(),
    )
    .unwrap();

    assert_eq!(outcome.capability, FaceCapability::Available);
    assert_eq!(outcome.faces.len(), 6);
    for face in &outcome.faces {
        assert_eq!(face.kind, FaceKind::Quad);
        assert_eq!(face.vertices.len(), 4);
        assert_eq!(face.triangles.len(), 2);
    }
    assert!(check_partition(&outcome.faces, 12).is_ok());
}

#[test]
fn test_generated_cube_takes_exact_path() {
    let mesh = create_cube().with_provenance(Provenance::ProcedurallyGenerated);
    let outcome = reconstruct_faces(
        &mesh,
        &ReconstructionConfig::default(),
        &OperationControl::new(),
    )
    .unwrap();
    assert_eq!(outcome.faces.len(), 6);
    assert_eq!(outcome.merged_faces, 6);
}

#[test]
fn test_face_normals_point_outward() {
    let mesh = create_cube();
    let outcome = PolygonReconstructor::default()
        .reconstruct(&mesh, &OperationControl::new())
        .unwrap();
    let center = Point3f::new(0.5, 0.5, 0.5);
    for face in &outcome.faces {
        let p = mesh.vertices[face.vertices[0]];
        assert!(face.normal.dot(&(p - center)) > 0.0);
    }
}

#[test]
fn test_cylinder_caps_and_strips() {
    let mesh = create_cylinder(24, 23);
    assert_eq!(mesh.face_count(), 1104);
    let outcome = PolygonReconstructor::default()
        .reconstruct(&mesh, &OperationControl::new())
        .unwrap();

    // 24 side strips plus two caps
    assert_eq!(outcome.faces.len(), 26);
    let caps: Vec<_> = outcome
        .faces
        .iter()
        .filter(|f| f.triangles.len() == 24)
        .collect();
    assert_eq!(caps.len(), 2);
    for cap in caps {
        assert_eq!(cap.kind, FaceKind::Polygon(24));
    }
    assert!(check_partition(&outcome.faces, mesh.face_count()).is_ok());
}

#[test]
fn test_cube_faces_map_to_view() {
    let mut mesh = create_cube();
    let outcome = reconstruct_faces(
        &mesh,
        &ReconstructionConfig::default(),
        &OperationControl::new(),
    )
    .unwrap();
    outcome.apply_to(&mut mesh);

    let view = facecrate_core::FaceMetadataMapper::explode(&mesh);
    assert!(!view.synthesized_faces);
    assert_eq!(view.faces.len(), 6);
    assert_eq!(view.corners.len(), 36);
    assert!(view.faces.iter().all(|f| f.corner_count() == 6));
}

// =============================================================================
// Partition property
// =============================================================================

fn arb_mesh() -> impl Strategy<Value = IndexedMesh> {
    (4usize..16).prop_flat_map(|n| {
        let vertices = prop::collection::vec(
            prop::array::uniform3(-2i32..3).prop_map(|[x, y, z]| {
                Point3f::new(x as f32, y as f32, z as f32 * 0.5)
            }),
            n,
        );
        let faces = prop::collection::vec(prop::array::uniform3(0..n), 0..24);
        (vertices, faces, any::<bool>()).prop_map(|(v, f, exact)| {
            let provenance = if exact {
                Provenance::ProcedurallyGenerated
            } else {
                Provenance::Loaded
            };
            IndexedMesh::from_vertices_and_faces(v, f).with_provenance(provenance)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn proptest_faces_partition_triangles(mesh in arb_mesh()) {
        let outcome = reconstruct_faces(
            &mesh,
            &ReconstructionConfig::default(),
            &OperationControl::new(),
        ).unwrap();
        prop_assert!(check_partition(&outcome.faces, mesh.face_count()).is_ok());
        for face in &outcome.faces {
            prop_assert_eq!(face.kind, FaceKind::from_vertex_count(face.vertices.len()));
        }
    }
}
