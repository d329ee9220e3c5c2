//! Boundary loops of triangle patches.
//!
//! A patch is a set of triangles that should form one polygon. Its boundary
//! is every edge used by exactly one patch triangle, kept in the direction the
//! triangle winds it, so a well-formed patch yields a single loop running
//! counter-clockwise around the patch normal.

use std::collections::HashMap;
use std::fmt;

use facecrate_core::{triangle_area, Edge, Point3f, Vector3f};
use itertools::Itertools;

/// Why a patch could not become a single polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopRejection {
    /// The walk hit a vertex with no outgoing boundary edge, or the patch has
    /// no boundary at all.
    Open,
    /// A vertex has two outgoing boundary edges.
    Branching,
    /// Boundary edges are left after the first loop closed.
    Holes,
    /// Two non-adjacent loop segments touch in the projected plane.
    SelfIntersecting,
    /// Total triangle area is below the minimum.
    TooSmall,
    /// Loop area and summed triangle area disagree.
    AreaMismatch,
}

impl fmt::Display for LoopRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            LoopRejection::Open => "boundary does not close",
            LoopRejection::Branching => "boundary branches",
            LoopRejection::Holes => "patch has holes",
            LoopRejection::SelfIntersecting => "boundary self-intersects",
            LoopRejection::TooSmall => "patch area too small",
            LoopRejection::AreaMismatch => "loop area disagrees with triangle area",
        };
        f.write_str(reason)
    }
}

/// Limits applied by [`trace_patch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopChecks {
    pub min_area: f32,
    /// Relative area disagreement tolerated; `None` skips the check.
    pub area_tolerance: Option<f32>,
    pub check_self_intersection: bool,
}

impl Default for LoopChecks {
    fn default() -> Self {
        Self {
            min_area: 1e-12,
            area_tolerance: Some(0.01),
            check_self_intersection: true,
        }
    }
}

impl LoopChecks {
    /// Only the topological checks: used for exact geometry.
    pub fn topology_only() -> Self {
        Self {
            min_area: 0.0,
            area_tolerance: None,
            check_self_intersection: false,
        }
    }
}

/// Directed boundary edges of the patch, in triangle order.
pub fn boundary_edges(faces: &[[usize; 3]], patch: &[usize]) -> Vec<(usize, usize)> {
    let mut uses: HashMap<Edge, usize> = HashMap::with_capacity(patch.len() * 3);
    for &t in patch {
        for (a, b) in faces[t].iter().circular_tuple_windows() {
            *uses.entry(Edge::new(*a, *b)).or_insert(0) += 1;
        }
    }

    patch
        .iter()
        .flat_map(|&t| faces[t].iter().copied().circular_tuple_windows::<(usize, usize)>())
        .filter(|&(a, b)| uses.get(&Edge::new(a, b)) == Some(&1))
        .collect()
}

/// Chain directed edges into a single closed loop of vertex indices.
///
/// The loop starts at the smallest vertex index so the result does not
/// depend on triangle order.
pub fn walk_boundary(edges: &[(usize, usize)]) -> Result<Vec<usize>, LoopRejection> {
    let mut next: HashMap<usize, usize> = HashMap::with_capacity(edges.len());
    for &(a, b) in edges {
        if next.insert(a, b).is_some() {
            return Err(LoopRejection::Branching);
        }
    }

    let start = *next.keys().min().ok_or(LoopRejection::Open)?;
    let mut vertices = vec![start];
    let mut current = start;
    loop {
        current = *next.get(&current).ok_or(LoopRejection::Open)?;
        if current == start {
            break;
        }
        if vertices.len() >= edges.len() {
            return Err(LoopRejection::Open);
        }
        vertices.push(current);
    }

    if vertices.len() < edges.len() {
        return Err(LoopRejection::Holes);
    }
    if vertices.len() < 3 {
        return Err(LoopRejection::Open);
    }
    Ok(vertices)
}

/// Signed area of a closed loop measured around `normal` (Newell's method).
/// Positive when the loop runs counter-clockwise about the normal.
pub fn loop_area(positions: &[Point3f], vertices: &[usize], normal: &Vector3f) -> f32 {
    let Some(&first) = vertices.first() else {
        return 0.0;
    };
    let origin = positions[first];
    let mut sum = Vector3f::zeros();
    for (&a, &b) in vertices.iter().circular_tuple_windows() {
        sum += (positions[a] - origin).cross(&(positions[b] - origin));
    }
    0.5 * sum.dot(normal)
}

fn project(p: &Point3f, drop_axis: usize) -> (f64, f64) {
    match drop_axis {
        0 => (p.y as f64, p.z as f64),
        1 => (p.z as f64, p.x as f64),
        _ => (p.x as f64, p.y as f64),
    }
}

fn orient(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

fn segments_touch(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64), eps: f64) -> bool {
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);

    if ((o1 > eps && o2 < -eps) || (o1 < -eps && o2 > eps))
        && ((o3 > eps && o4 < -eps) || (o3 < -eps && o4 > eps))
    {
        return true;
    }
    (o1.abs() <= eps && on_segment(a, b, c))
        || (o2.abs() <= eps && on_segment(a, b, d))
        || (o3.abs() <= eps && on_segment(c, d, a))
        || (o4.abs() <= eps && on_segment(c, d, b))
}

/// Whether any two non-adjacent segments of the loop touch after projecting
/// along the dominant axis of `normal`.
pub fn self_intersects(positions: &[Point3f], vertices: &[usize], normal: &Vector3f) -> bool {
    let n = vertices.len();
    if n < 4 {
        return false;
    }
    let drop_axis = normal.iamax();
    let points: Vec<(f64, f64)> = vertices
        .iter()
        .map(|&v| project(&positions[v], drop_axis))
        .collect();

    let (min, max) = points.iter().fold(
        ((f64::MAX, f64::MAX), (f64::MIN, f64::MIN)),
        |(lo, hi), p| ((lo.0.min(p.0), lo.1.min(p.1)), (hi.0.max(p.0), hi.1.max(p.1))),
    );
    let scale = (max.0 - min.0).max(max.1 - min.1);
    let eps = 1e-12 * scale * scale;

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_touch(points[i], points[(i + 1) % n], points[j], points[(j + 1) % n], eps) {
                return true;
            }
        }
    }
    false
}

/// Summed area of the patch triangles.
pub fn patch_area(positions: &[Point3f], faces: &[[usize; 3]], patch: &[usize]) -> f32 {
    patch
        .iter()
        .map(|&t| {
            let [a, b, c] = faces[t];
            triangle_area(&positions[a], &positions[b], &positions[c])
        })
        .sum()
}

/// Trace the single boundary loop of a patch and check it is a simple polygon.
pub fn trace_patch(
    positions: &[Point3f],
    faces: &[[usize; 3]],
    patch: &[usize],
    normal: &Vector3f,
    checks: &LoopChecks,
) -> Result<Vec<usize>, LoopRejection> {
    let vertices = walk_boundary(&boundary_edges(faces, patch))?;

    let area = patch_area(positions, faces, patch);
    if area < checks.min_area {
        return Err(LoopRejection::TooSmall);
    }
    if checks.check_self_intersection && self_intersects(positions, &vertices, normal) {
        return Err(LoopRejection::SelfIntersecting);
    }
    if let Some(tolerance) = checks.area_tolerance {
        let enclosed = loop_area(positions, &vertices, normal);
        if (enclosed - area).abs() > tolerance * area {
            return Err(LoopRejection::AreaMismatch);
        }
    }
    Ok(vertices)
}
