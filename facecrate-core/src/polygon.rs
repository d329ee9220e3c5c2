//! Semantic polygon faces recovered from triangle groups

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// Type tag of a polygon face, derived from its perimeter vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    Triangle,
    Quad,
    Pentagon,
    Hexagon,
    /// Any face with more than six perimeter vertices.
    Polygon(usize),
}

impl FaceKind {
    /// Tag for a perimeter with `count` vertices. Counts below three are
    /// tagged as triangles; such faces are never produced by reconstruction.
    pub fn from_vertex_count(count: usize) -> Self {
        match count {
            0..=3 => FaceKind::Triangle,
            4 => FaceKind::Quad,
            5 => FaceKind::Pentagon,
            6 => FaceKind::Hexagon,
            n => FaceKind::Polygon(n),
        }
    }

    /// Number of perimeter vertices this tag stands for.
    pub fn vertex_count(&self) -> usize {
        match self {
            FaceKind::Triangle => 3,
            FaceKind::Quad => 4,
            FaceKind::Pentagon => 5,
            FaceKind::Hexagon => 6,
            FaceKind::Polygon(n) => *n,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FaceKind::Triangle => "triangle",
            FaceKind::Quad => "quad",
            FaceKind::Pentagon => "pentagon",
            FaceKind::Hexagon => "hexagon",
            FaceKind::Polygon(_) => "polygon",
        }
    }
}

/// A semantic n-gon made of one or more coplanar triangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonFace {
    /// Perimeter vertex indices, counter-clockwise around `normal`.
    pub vertices: Vec<usize>,
    /// Unit face normal.
    pub normal: Vector3f,
    /// Indices of the triangles composing the face.
    pub triangles: Vec<usize>,
    pub kind: FaceKind,
}

impl PolygonFace {
    /// Create a face, deriving the kind from the perimeter length.
    pub fn new(vertices: Vec<usize>, normal: Vector3f, triangles: Vec<usize>) -> Self {
        let kind = FaceKind::from_vertex_count(vertices.len());
        Self {
            vertices,
            normal,
            triangles,
            kind,
        }
    }

    /// One-triangle face for triangle `index` of the given buffers.
    pub fn from_triangle(positions: &[Point3f], triangle: [usize; 3], index: usize) -> Self {
        let normal = triangle_normal(
            &positions[triangle[0]],
            &positions[triangle[1]],
            &positions[triangle[2]],
        )
        .unwrap_or_else(Vector3f::z);
        Self::new(triangle.to_vec(), normal, vec![index])
    }

    /// Reverse the perimeter order and the normal, following a winding flip.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
        self.normal = -self.normal;
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_single_triangle(&self) -> bool {
        self.triangles.len() == 1
    }
}

/// One face per triangle; the fallback used whenever no polygon data exists.
pub fn triangle_faces(positions: &[Point3f], triangles: &[[usize; 3]]) -> Vec<PolygonFace> {
    triangles
        .iter()
        .enumerate()
        .map(|(i, t)| PolygonFace::from_triangle(positions, *t, i))
        .collect()
}

/// Check that the faces' triangle lists partition `0..triangle_count` exactly.
pub fn check_partition(faces: &[PolygonFace], triangle_count: usize) -> Result<()> {
    let mut owner: Vec<Option<usize>> = vec![None; triangle_count];
    for (fi, face) in faces.iter().enumerate() {
        if face.triangles.is_empty() {
            return Err(Error::InvalidInput(format!("face {fi} has no triangles")));
        }
        for &t in &face.triangles {
            let slot = owner.get_mut(t).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "face {fi} references triangle {t} of {triangle_count}"
                ))
            })?;
            if let Some(previous) = slot.replace(fi) {
                return Err(Error::InvalidInput(format!(
                    "triangle {t} belongs to faces {previous} and {fi}"
                )));
            }
        }
    }
    if let Some(missing) = owner.iter().position(Option::is_none) {
        return Err(Error::InvalidInput(format!(
            "triangle {missing} belongs to no face"
        )));
    }
    Ok(())
}
