//! Core mesh repair operations.
//!
//! Every function here is best-effort: it fixes what it can, reports how much
//! it fixed, and always leaves a usable mesh behind.

use std::collections::HashMap;

use facecrate_core::{is_finite_point, triangle_area, IndexedMesh, PolygonFace, Vector3f};
use tracing::{debug, warn};

/// Replace non-finite coordinates: NaN becomes `0.0`, infinities become
/// `±sentinel`. Non-finite normals are reset to `+Z`.
///
/// Returns the number of corrected values.
pub fn sanitize_numeric(mesh: &mut IndexedMesh, sentinel: f32) -> usize {
    let bound = if sentinel.is_finite() { sentinel.abs() } else { 1.0e6 };
    let mut fixed = 0;

    for v in &mut mesh.vertices {
        for c in v.iter_mut() {
            if c.is_nan() {
                *c = 0.0;
                fixed += 1;
            } else if c.is_infinite() {
                *c = bound.copysign(*c);
                fixed += 1;
            }
        }
    }

    if let Some(normals) = mesh.normals.as_mut() {
        for n in normals.iter_mut() {
            if !n.iter().all(|x| x.is_finite()) {
                *n = Vector3f::z();
                fixed += 1;
            }
        }
    }

    if fixed > 0 {
        warn!(fixed, "Replaced non-finite mesh values");
    }
    fixed
}

fn is_degenerate(mesh: &IndexedMesh, face: &[usize; 3], area_eps: f32, len_eps: f32) -> bool {
    let n = mesh.vertices.len();
    if face.iter().any(|&i| i >= n) {
        return true;
    }
    if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
        return true;
    }
    let a = mesh.vertices[face[0]];
    let b = mesh.vertices[face[1]];
    let c = mesh.vertices[face[2]];
    if !(is_finite_point(&a) && is_finite_point(&b) && is_finite_point(&c)) {
        return true;
    }
    if (b - a).norm() < len_eps || (c - b).norm() < len_eps || (a - c).norm() < len_eps {
        return true;
    }
    let area = triangle_area(&a, &b, &c);
    !(area >= area_eps)
}

/// Drop triangles with area below `area_eps`, an edge shorter than `len_eps`,
/// repeated or out-of-range indices.
///
/// The vertex buffer is left untouched. Polygon faces refer to triangle
/// indices, so they are dropped whenever a triangle is removed.
pub fn remove_degenerate_triangles(
    mesh: &IndexedMesh,
    area_eps: f32,
    len_eps: f32,
) -> (IndexedMesh, usize) {
    let kept: Vec<[usize; 3]> = mesh
        .faces
        .iter()
        .filter(|f| !is_degenerate(mesh, f, area_eps, len_eps))
        .copied()
        .collect();
    let removed = mesh.faces.len() - kept.len();

    let mut result = mesh.clone();
    result.faces = kept;
    if removed > 0 {
        result.polygon_faces = None;
        debug!(removed, "Removed degenerate triangles");
    }
    (result, removed)
}

fn quantize(value: f32, scale: f64) -> i64 {
    (value as f64 * scale).round() as i64
}

/// Apply a vertex remap to a polygon perimeter, dropping vertices that merged
/// into their predecessor. Indices outside the remap are left as they are.
fn remap_perimeter(face: &mut PolygonFace, remap: &[usize]) {
    let mut vertices: Vec<usize> = Vec::with_capacity(face.vertices.len());
    for &v in &face.vertices {
        let nv = remap.get(v).copied().unwrap_or(v);
        if vertices.last() != Some(&nv) {
            vertices.push(nv);
        }
    }
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    *face = PolygonFace::new(vertices, face.normal, std::mem::take(&mut face.triangles));
}

/// Weld vertices whose coordinates agree to `decimals` decimal places.
///
/// A mesh with no coincident vertices is left untouched. Normals and colors
/// of the first occurrence are kept. Returns the number of merged vertices.
/// Run [`sanitize_numeric`] first: NaN coordinates quantize to zero.
pub fn ensure_indexed(mesh: &mut IndexedMesh, decimals: u32) -> usize {
    let scale = 10f64.powi(decimals.min(12) as i32);
    let mut first: HashMap<(i64, i64, i64), usize> = HashMap::with_capacity(mesh.vertices.len());
    let mut remap = Vec::with_capacity(mesh.vertices.len());
    let mut kept = Vec::new();

    for (i, v) in mesh.vertices.iter().enumerate() {
        let key = (quantize(v.x, scale), quantize(v.y, scale), quantize(v.z, scale));
        let next = kept.len();
        let target = *first.entry(key).or_insert(next);
        if target == next {
            kept.push(i);
        }
        remap.push(target);
    }

    let merged = mesh.vertices.len() - kept.len();
    if merged == 0 {
        return 0;
    }

    mesh.vertices = kept.iter().map(|&i| mesh.vertices[i]).collect();
    if let Some(normals) = mesh.normals.as_mut() {
        *normals = kept.iter().map(|&i| normals[i]).collect();
    }
    if let Some(colors) = mesh.colors.as_mut() {
        *colors = kept.iter().map(|&i| colors[i]).collect();
    }
    let n = remap.len();
    for face in &mut mesh.faces {
        for idx in face.iter_mut() {
            if *idx < n {
                *idx = remap[*idx];
            }
        }
    }
    if let Some(faces) = mesh.polygon_faces.as_mut() {
        for face in faces.iter_mut() {
            remap_perimeter(face, &remap);
        }
    }

    debug!(merged, remaining = mesh.vertices.len(), "Welded coincident vertices");
    merged
}

/// Remove vertices no triangle references, compacting every per-vertex buffer.
///
/// Returns the number of removed vertices.
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let n = mesh.vertices.len();
    let mut used = vec![false; n];
    for face in &mesh.faces {
        for &v in face {
            if v < n {
                used[v] = true;
            }
        }
    }

    let removed = used.iter().filter(|u| !**u).count();
    if removed == 0 {
        return 0;
    }

    let mut remap = vec![usize::MAX; n];
    let mut next = 0;
    for (i, &u) in used.iter().enumerate() {
        if u {
            remap[i] = next;
            next += 1;
        }
    }

    let keep = |i: &usize| used[*i];
    mesh.vertices = (0..n).filter(keep).map(|i| mesh.vertices[i]).collect();
    if let Some(normals) = mesh.normals.as_mut() {
        *normals = (0..n).filter(keep).map(|i| normals[i]).collect();
    }
    if let Some(colors) = mesh.colors.as_mut() {
        *colors = (0..n).filter(keep).map(|i| colors[i]).collect();
    }
    for face in &mut mesh.faces {
        for idx in face.iter_mut() {
            if *idx < n {
                *idx = remap[*idx];
            }
        }
    }
    if let Some(faces) = mesh.polygon_faces.as_mut() {
        for face in faces.iter_mut() {
            for v in face.vertices.iter_mut() {
                *v = remap[*v];
            }
        }
    }

    debug!(removed, "Removed unreferenced vertices");
    removed
}

/// Replace vertex normals with area-weighted normals of the current triangles.
pub fn recompute_normals(mesh: &mut IndexedMesh) {
    mesh.normals = Some(mesh.calculate_vertex_normals());
}
