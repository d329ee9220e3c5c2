//! Integration tests for facecrate-simplification
//!
//! Batch decimation of a closed cylinder, single edge collapses on a
//! tetrahedron, and the reduction and edge validity properties on
//! generated height fields.

use facecrate_core::{
    check_partition, connected_components, Error, IndexedMesh, OperationControl, Point3f,
};
use facecrate_simplification::*;
use proptest::prelude::*;

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

fn create_tetrahedron() -> IndexedMesh {
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

/// Grid of `size` x `size` vertices with the given heights.
fn height_field(size: usize, heights: &[f32]) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    for y in 0..size {
        for x in 0..size {
            mesh.add_vertex(Point3f::new(x as f32, y as f32, heights[y * size + x]));
        }
    }
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let i = y * size + x;
            mesh.add_face([i, i + size, i + 1]);
            mesh.add_face([i + 1, i + size, i + size + 1]);
        }
    }
    mesh
}

#[test]
fn test_cylinder_halved() {
    let mesh = create_cylinder(24, 23);
    assert_eq!(mesh.vertex_count(), 554);
    assert_eq!(mesh.face_count(), 1104);

    let output = Decimator::default()
        .decimate(&mesh, 0.5, DecimationMethod::QuadricEdgeCollapse, &OperationControl::new())
        .unwrap();

    let triangles = output.mesh.face_count();
    assert!((497..=607).contains(&triangles), "got {triangles} triangles");
    assert_eq!(connected_components(&output.mesh.faces, output.mesh.vertex_count()), 1);
    assert_eq!(output.mesh.non_finite_count(), 0);
    assert_eq!(output.stats.triangles_before, 1104);
    assert_eq!(output.stats.triangles_after, triangles);
    assert!(output.stats.processing_time_ms >= 0.0);

    let faces = output.mesh.polygon_faces.as_ref().unwrap();
    assert!(check_partition(faces, triangles).is_ok());
}

#[test]
fn test_cylinder_keeps_its_extent() {
    let mesh = create_cylinder(24, 23);
    let output = Decimator::default()
        .decimate(&mesh, 0.7, DecimationMethod::QuadricEdgeCollapse, &OperationControl::new())
        .unwrap();
    for v in &output.mesh.vertices {
        assert!(v.z > -0.05 && v.z < 2.05);
        assert!((v.x * v.x + v.y * v.y).sqrt() < 1.05);
    }
}

#[test]
fn test_tetrahedron_edge_collapse() {
    let mesh = create_tetrahedron();
    let collapsed = EdgeDecimator::new().collapse_edge(&mesh, 0, 1).unwrap();
    assert_eq!(collapsed.vertex_count(), 3);
    assert_eq!(collapsed.face_count(), 2);
    for i in 0..collapsed.face_count() {
        assert!(collapsed.triangle_area(i) > f32::EPSILON);
    }
}

#[test]
fn test_non_edge_rejected() {
    let mesh = height_field(4, &[0.0; 16]);
    // Opposite corners of the grid
    let err = EdgeDecimator::new().collapse_edge(&mesh, 0, 15).unwrap_err();
    assert!(matches!(err, Error::InvalidEdge { v1: 0, v2: 15, .. }));
}

#[test]
fn test_collapse_rejects_stray_index() {
    let mut mesh = height_field(3, &[0.0; 9]);
    mesh.add_face([0, 1, 42]);
    let copy = mesh.clone();
    let err = EdgeDecimator::new().collapse_edge(&mesh, 1, 2).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(mesh, copy);
}

#[test]
fn test_repeated_single_collapses() {
    let mut mesh = create_cylinder(12, 4);
    let decimator = EdgeDecimator::new();
    for _ in 0..10 {
        let [v1, v2, _] = mesh.faces[0];
        let before = mesh.vertex_count();
        mesh = decimator.collapse_edge(&mesh, v1, v2).unwrap();
        assert_eq!(mesh.vertex_count(), before - 1);
        assert!(mesh.indices_in_range());
    }
}

// =============================================================================
// Properties
// =============================================================================

fn arb_height_field() -> impl Strategy<Value = IndexedMesh> {
    (3usize..9).prop_flat_map(|size| {
        prop::collection::vec(-2i32..3, size * size).prop_map(move |h| {
            let heights: Vec<f32> = h.into_iter().map(|z| z as f32 * 0.5).collect();
            height_field(size, &heights)
        })
    })
}

fn arb_method() -> impl Strategy<Value = DecimationMethod> {
    prop_oneof![
        Just(DecimationMethod::QuadricEdgeCollapse),
        Just(DecimationMethod::VertexClustering { cell_size: None }),
        any::<u64>().prop_map(|seed| DecimationMethod::Random { seed }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_reduction_bound(
        mesh in arb_height_field(),
        fraction in 0.05f64..0.95,
        method in arb_method(),
    ) {
        let output = Decimator::default()
            .decimate(&mesh, fraction, method, &OperationControl::new())
            .unwrap();
        prop_assert!(output.stats.triangles_after <= output.stats.triangles_before);
        prop_assert!(
            output.stats.achieved_reduction_fraction <= fraction + 1e-9
                || output.completion.is_partial()
        );
        prop_assert_eq!(output.mesh.non_finite_count(), 0);
        prop_assert!(output.mesh.indices_in_range());
        let faces = output.mesh.polygon_faces.as_ref().unwrap();
        prop_assert!(check_partition(faces, output.mesh.face_count()).is_ok());
    }

    #[test]
    fn proptest_edge_validity(
        mesh in arb_height_field(),
        a in 0usize..90,
        b in 0usize..90,
    ) {
        let is_edge = a != b && mesh.faces.iter().any(|f| f.contains(&a) && f.contains(&b));
        match EdgeDecimator::new().collapse_edge(&mesh, a, b) {
            Ok(collapsed) => {
                prop_assert!(is_edge);
                prop_assert_eq!(collapsed.vertex_count(), mesh.vertex_count() - 1);
                prop_assert!(collapsed.face_count() < mesh.face_count());
                prop_assert!(collapsed.indices_in_range());
            }
            Err(err) => {
                prop_assert!(!is_edge);
                let is_invalid_edge = matches!(err, Error::InvalidEdge { .. });
                prop_assert!(is_invalid_edge);
            }
        }
    }
}
