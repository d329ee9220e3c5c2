//! Basic usage example for facecrate
//!
//! This example demonstrates fundamental operations:
//! - Loading a triangle soup into a geometry record
//! - Inspecting the reconstructed polygon faces
//! - Collapsing an edge and undoing it

use facecrate_core::{FaceMetadataMapper, IndexedMesh, Point3f};
use facecrate_record::{EngineConfig, GeometryRecord};

/// Unit cube as an unwelded triangle soup, the way a file loader hands it over.
fn cube_soup() -> IndexedMesh {
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
    let quads = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [1, 2, 6, 5],
        [0, 4, 7, 3],
    ];

    let mut mesh = IndexedMesh::new();
    for [a, b, c, d] in quads {
        for tri in [[a, b, c], [a, c, d]] {
            let base = mesh.vertex_count();
            for v in tri {
                mesh.add_vertex(corners[v]);
            }
            mesh.add_face([base, base + 1, base + 2]);
        }
    }
    mesh
}

fn main() -> anyhow::Result<()> {
    println!("facecrate Example");
    println!("=================");

    let soup = cube_soup();
    println!(
        "Triangle soup: {} vertices, {} triangles",
        soup.vertex_count(),
        soup.face_count()
    );

    let mut record = GeometryRecord::load(soup, EngineConfig::default())?;
    println!(
        "\nAfter repair: {} vertices, {} triangles",
        record.mesh().vertex_count(),
        record.mesh().face_count()
    );
    println!("Face capability: {:?}", record.capability());
    for (i, face) in record.faces().iter().enumerate() {
        println!(
            "- face {}: {:?}, {} vertices, triangles {:?}",
            i,
            face.kind,
            face.vertices.len(),
            face.triangles
        );
    }

    let view = record.viewing_mesh();
    println!(
        "\nViewing mesh: {} corners, {} triangles",
        view.corners.len(),
        view.triangle_count()
    );
    let corner = FaceMetadataMapper::corner_range(7).start;
    if let Some(face) = view.face_at_corner(corner) {
        println!("Corner {} belongs to face {} ({:?})", corner, face.index, face.kind);
    }

    let [v1, v2, _] = record.mesh().faces[0];
    let outcome = record.collapse_edge(v1, v2)?;
    println!("\nCollapsed edge {}-{}: {:?}", v1, v2, outcome.completion);
    if let Some(stats) = outcome.stats {
        println!("{}", stats);
    }
    println!("Faces now: {}", record.faces().len());

    if record.undo() {
        println!("Undone, back to {} faces", record.faces().len());
    }

    Ok(())
}
