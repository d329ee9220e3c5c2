//! Exploded viewing buffers and the face metadata that travels with them.
//!
//! A [`ViewingMesh`] has one independent vertex per triangle corner so every
//! face can be flat-shaded and colored on its own. Triangle `i` of the indexed
//! mesh always owns corners `3i..3i + 3`, which is all the
//! [`FaceMetadataMapper`] needs to carry polygon faces across.

use crate::mesh::IndexedMesh;
use crate::point::*;
use crate::polygon::{check_partition, triangle_faces, FaceKind, PolygonFace};
use bytemuck::{Pod, Zeroable};
use std::ops::Range;

/// One triangle corner of the viewing buffer, laid out for direct upload.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct CornerVertex {
    pub position: [f32; 3],
    /// Flat normal of the owning face.
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// A polygon face expressed in viewing-buffer corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFace {
    /// Index of the face in the indexed mesh's face list.
    pub index: usize,
    pub kind: FaceKind,
    pub normal: Vector3f,
    pub triangles: Vec<usize>,
    /// One `[3i, 3i + 3)` corner range per triangle.
    pub corners: Vec<Range<usize>>,
}

impl ViewFace {
    pub fn corner_count(&self) -> usize {
        self.corners.len() * 3
    }
}

/// Exploded per-corner mesh derived from an [`IndexedMesh`]; never edited directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewingMesh {
    pub corners: Vec<CornerVertex>,
    pub faces: Vec<ViewFace>,
    triangle_to_face: Vec<usize>,
    /// True when the face list was synthesized one-per-triangle.
    pub synthesized_faces: bool,
}

impl ViewingMesh {
    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    /// The face owning triangle `triangle`.
    pub fn face_of_triangle(&self, triangle: usize) -> Option<&ViewFace> {
        self.triangle_to_face
            .get(triangle)
            .and_then(|&f| self.faces.get(f))
    }

    /// The face owning viewing-buffer corner `corner`, for picking.
    pub fn face_at_corner(&self, corner: usize) -> Option<&ViewFace> {
        self.face_of_triangle(corner / 3)
    }

    /// Flat-color every face's corners with `color_of(face)`.
    pub fn paint_faces<F>(&mut self, mut color_of: F)
    where
        F: FnMut(&ViewFace) -> [f32; 3],
    {
        for face in &self.faces {
            let color = color_of(face);
            for range in &face.corners {
                for corner in &mut self.corners[range.clone()] {
                    corner.color = color;
                }
            }
        }
    }

    /// Raw bytes of the corner buffer.
    pub fn corner_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.corners)
    }
}

/// Translates polygon-face metadata between the indexed and exploded forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceMetadataMapper;

impl FaceMetadataMapper {
    /// Corner range of triangle `triangle` in the viewing buffer.
    #[inline]
    pub fn corner_range(triangle: usize) -> Range<usize> {
        3 * triangle..3 * triangle + 3
    }

    /// Map polygon faces onto corner ranges.
    pub fn map_faces(faces: &[PolygonFace]) -> Vec<ViewFace> {
        faces
            .iter()
            .enumerate()
            .map(|(index, face)| ViewFace {
                index,
                kind: face.kind,
                normal: face.normal,
                triangles: face.triangles.clone(),
                corners: face
                    .triangles
                    .iter()
                    .map(|&t| Self::corner_range(t))
                    .collect(),
            })
            .collect()
    }

    /// The mesh's polygon faces if they partition its triangles, otherwise one
    /// face per triangle. The flag is true when faces were synthesized.
    pub fn faces_or_triangles(mesh: &IndexedMesh) -> (Vec<PolygonFace>, bool) {
        match &mesh.polygon_faces {
            Some(faces) if check_partition(faces, mesh.face_count()).is_ok() => {
                (faces.clone(), false)
            }
            _ => (triangle_faces(&mesh.vertices, &mesh.faces), true),
        }
    }

    /// Explode `mesh` into a viewing mesh with flat face normals.
    ///
    /// Expects a repaired mesh: every triangle index must be in range, as
    /// checked by [`IndexedMesh::indices_in_range`].
    pub fn explode(mesh: &IndexedMesh) -> ViewingMesh {
        debug_assert!(
            mesh.indices_in_range(),
            "explode needs triangle indices within the vertex buffer"
        );
        let (faces, synthesized_faces) = Self::faces_or_triangles(mesh);
        let view_faces = Self::map_faces(&faces);

        let mut triangle_to_face = vec![0; mesh.face_count()];
        for face in &view_faces {
            for &t in &face.triangles {
                triangle_to_face[t] = face.index;
            }
        }

        let mut corners = Vec::with_capacity(mesh.face_count() * 3);
        for (t, tri) in mesh.faces.iter().enumerate() {
            let normal = view_faces[triangle_to_face[t]].normal;
            for &vi in tri {
                let p = mesh.vertices[vi];
                let color = mesh
                    .colors
                    .as_ref()
                    .map(|c| {
                        let [r, g, b] = c[vi];
                        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
                    })
                    .unwrap_or([1.0, 1.0, 1.0]);
                corners.push(CornerVertex {
                    position: [p.x, p.y, p.z],
                    normal: [normal.x, normal.y, normal.z],
                    color,
                });
            }
        }

        ViewingMesh {
            corners,
            faces: view_faces,
            triangle_to_face,
            synthesized_faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> IndexedMesh {
        IndexedMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(2.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3], [1, 4, 2]],
        )
    }

    #[test]
    fn test_corner_range() {
        assert_eq!(FaceMetadataMapper::corner_range(0), 0..3);
        assert_eq!(FaceMetadataMapper::corner_range(5), 15..18);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "explode needs triangle indices")]
    fn test_explode_rejects_stray_index() {
        let mut mesh = quad_mesh();
        mesh.add_face([0, 1, 99]);
        FaceMetadataMapper::explode(&mesh);
    }

    #[test]
    fn test_explode_synthesizes_faces() {
        let view = FaceMetadataMapper::explode(&quad_mesh());
        assert!(view.synthesized_faces);
        assert_eq!(view.corners.len(), 9);
        assert_eq!(view.faces.len(), 3);
        assert_eq!(view.triangle_count(), 3);
        assert_eq!(view.face_at_corner(7).unwrap().index, 2);
    }

    #[test]
    fn test_explode_maps_polygon_faces() {
        let mut mesh = quad_mesh();
        mesh.polygon_faces = Some(vec![
            PolygonFace::new(vec![0, 1, 2, 3], Vector3f::z(), vec![0, 1]),
            PolygonFace::from_triangle(&mesh.vertices, [1, 4, 2], 2),
        ]);
        let view = FaceMetadataMapper::explode(&mesh);
        assert!(!view.synthesized_faces);
        assert_eq!(view.faces.len(), 2);
        assert_eq!(view.faces[0].corners, vec![0..3, 3..6]);
        assert_eq!(view.faces[0].corner_count(), 6);
        assert_eq!(view.face_at_corner(4).unwrap().kind, FaceKind::Quad);
        assert_eq!(view.face_of_triangle(2).unwrap().index, 1);
        assert!(view.face_of_triangle(3).is_none());
        for corner in &view.corners[0..6] {
            assert_eq!(corner.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_stale_faces_replaced() {
        let mut mesh = quad_mesh();
        mesh.polygon_faces = Some(vec![PolygonFace::new(
            vec![0, 1, 2, 3],
            Vector3f::z(),
            vec![0, 1],
        )]);
        let view = FaceMetadataMapper::explode(&mesh);
        assert!(view.synthesized_faces);
        assert_eq!(view.faces.len(), 3);
    }

    #[test]
    fn test_paint_and_bytes() {
        let mut view = FaceMetadataMapper::explode(&quad_mesh());
        view.paint_faces(|face| [face.index as f32, 0.0, 0.0]);
        assert_eq!(view.corners[8].color, [2.0, 0.0, 0.0]);
        assert_eq!(view.corner_bytes().len(), 9 * std::mem::size_of::<CornerVertex>());
    }

    #[test]
    fn test_vertex_colors_carried() {
        let mut mesh = quad_mesh();
        mesh.set_colors(vec![[255, 0, 0]; 5]);
        let view = FaceMetadataMapper::explode(&mesh);
        assert_eq!(view.corners[0].color, [1.0, 0.0, 0.0]);
    }
}
