//! Edge collapse simplification
//!
//! Iterative edge collapse driven by quadric error metrics (QEM). Candidate
//! edges wait in a min-priority queue keyed by entry id; every vertex carries
//! a version stamp so entries queued before one of their endpoints changed
//! are recognized as stale and dropped on pop.
//!
//! Topology is kept as plain vertex-to-triangle incidence lists rather than a
//! half-edge structure, so non-manifold input is simplified around instead of
//! rejected.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use facecrate_core::{
    triangle_normal, Completion, IndexedMesh, OperationControl, PartialReason, Point3f, Vector3f,
};
use priority_queue::PriorityQueue;
use tracing::{debug, trace};

use crate::params::DecimateParams;
use crate::quadric::Quadric;
use crate::simplifier::{MeshSimplifier, Simplified};

// ============================================================
// Incidence mesh
// ============================================================

/// Working copy of a mesh that supports edge collapses in place.
pub(crate) struct CollapseMesh {
    positions: Vec<Point3f>,
    faces: Vec<[usize; 3]>,
    face_alive: Vec<bool>,
    /// Triangles touching each vertex; may hold dead triangles until cleaned.
    vertex_faces: Vec<Vec<usize>>,
    quadrics: Vec<Quadric>,
    version: Vec<u32>,
    removed: Vec<bool>,
    normals: Option<Vec<Vector3f>>,
    colors: Option<Vec<[u8; 3]>>,
    active_faces: usize,
}

impl CollapseMesh {
    pub(crate) fn from_mesh(mesh: &IndexedMesh, boundary_weight: f64) -> Self {
        let nv = mesh.vertices.len();
        let mut vertex_faces = vec![Vec::new(); nv];
        for (fi, face) in mesh.faces.iter().enumerate() {
            for &v in face {
                vertex_faces[v].push(fi);
            }
        }

        let mut cm = CollapseMesh {
            positions: mesh.vertices.clone(),
            faces: mesh.faces.clone(),
            face_alive: vec![true; mesh.faces.len()],
            vertex_faces,
            quadrics: vec![Quadric::zero(); nv],
            version: vec![0; nv],
            removed: vec![false; nv],
            normals: mesh.normals.clone(),
            colors: mesh.colors.clone(),
            active_faces: mesh.faces.len(),
        };
        cm.initialize_quadrics(boundary_weight);
        cm
    }

    fn initialize_quadrics(&mut self, boundary_weight: f64) {
        for face in &self.faces {
            let [a, b, c] = face.map(|v| self.positions[v]);
            if let Some(q) = Quadric::from_triangle(&a, &b, &c) {
                for &v in face {
                    self.quadrics[v] += q;
                }
            }
        }

        if boundary_weight <= 0.0 {
            return;
        }
        let mut edge_uses: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &self.faces {
            for (a, b) in directed(face) {
                *edge_uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        for face in &self.faces {
            let [pa, pb, pc] = face.map(|v| self.positions[v]);
            let Some(normal) = triangle_normal(&pa, &pb, &pc) else {
                continue;
            };
            for (a, b) in directed(face) {
                if edge_uses.get(&(a.min(b), a.max(b))) != Some(&1) {
                    continue;
                }
                let constraint = Quadric::boundary_constraint(
                    &self.positions[a],
                    &self.positions[b],
                    &normal,
                    boundary_weight,
                );
                if let Some(q) = constraint {
                    self.quadrics[a] += q;
                    self.quadrics[b] += q;
                }
            }
        }
    }

    pub(crate) fn active_faces(&self) -> usize {
        self.active_faces
    }

    fn is_live(&self, v: usize) -> bool {
        !self.removed[v]
    }

    fn incident(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_faces[v]
            .iter()
            .copied()
            .filter(move |&f| self.face_alive[f])
    }

    /// Neighbor vertices of `v` with the number of live triangles along each edge.
    fn edge_valence(&self, v: usize) -> HashMap<usize, usize> {
        let mut valence = HashMap::new();
        for f in self.incident(v) {
            for &u in &self.faces[f] {
                if u != v {
                    *valence.entry(u).or_insert(0) += 1;
                }
            }
        }
        valence
    }

    fn neighbors(&self, v: usize) -> HashSet<usize> {
        self.edge_valence(v).into_keys().collect()
    }

    fn is_boundary_vertex(&self, v: usize) -> bool {
        self.edge_valence(v).values().any(|&n| n == 1)
    }

    /// Live triangles containing both `v1` and `v2`.
    fn shared_faces(&self, v1: usize, v2: usize) -> Vec<usize> {
        self.incident(v1)
            .filter(|&f| self.faces[f].contains(&v2))
            .collect()
    }

    /// Collapsing keeps the surface manifold only when the endpoints' common
    /// neighbors are exactly the apices of the triangles on the edge.
    fn check_link_condition(&self, v1: usize, v2: usize) -> bool {
        let shared = self.shared_faces(v1, v2);
        if shared.is_empty() || shared.len() > 2 {
            return false;
        }
        let common = self.neighbors(v1).intersection(&self.neighbors(v2)).count();
        common == shared.len()
    }

    fn compute_collapse_cost(&self, v1: usize, v2: usize) -> (Point3f, f64) {
        let q = self.quadrics[v1] + self.quadrics[v2];
        q.collapse_target(&self.positions[v1], &self.positions[v2])
    }

    /// Whether moving `v1` and `v2` to `position` keeps every surviving
    /// triangle non-degenerate and within `min_cos` of its old orientation.
    fn preserves_orientation(&self, v1: usize, v2: usize, position: &Point3f, min_cos: f32) -> bool {
        for f in self.incident(v1).chain(self.incident(v2)) {
            let face = self.faces[f];
            if face.contains(&v1) && face.contains(&v2) {
                continue;
            }
            let old = face.map(|v| self.positions[v]);
            let new = face.map(|v| if v == v1 || v == v2 { *position } else { self.positions[v] });
            let Some(after) = triangle_normal(&new[0], &new[1], &new[2]) else {
                return false;
            };
            if let Some(before) = triangle_normal(&old[0], &old[1], &old[2]) {
                if before.dot(&after) < min_cos {
                    return false;
                }
            }
        }
        true
    }

    /// Merge `v2` into `v1` at `position`; returns the number of removed triangles.
    fn collapse(&mut self, v1: usize, v2: usize, position: Point3f) -> usize {
        let mut dropped = 0;
        let v2_faces: Vec<usize> = self.incident(v2).collect();
        for f in v2_faces {
            if self.faces[f].contains(&v1) {
                self.face_alive[f] = false;
                dropped += 1;
            } else {
                for v in self.faces[f].iter_mut() {
                    if *v == v2 {
                        *v = v1;
                    }
                }
                self.vertex_faces[v1].push(f);
            }
        }
        self.active_faces -= dropped;

        let face_alive = &self.face_alive;
        self.vertex_faces[v1].retain(|&f| face_alive[f]);
        self.vertex_faces[v2].clear();
        self.removed[v2] = true;

        let q2 = self.quadrics[v2];
        self.quadrics[v1] += q2;
        self.positions[v1] = position;
        self.version[v1] = self.version[v1].wrapping_add(1);
        self.version[v2] = self.version[v2].wrapping_add(1);

        if let Some(normals) = self.normals.as_mut() {
            let avg = normals[v1] + normals[v2];
            let len = avg.norm();
            if len > 1e-12 && len.is_finite() {
                normals[v1] = avg / len;
            }
        }
        if let Some(colors) = self.colors.as_mut() {
            let (c1, c2) = (colors[v1], colors[v2]);
            colors[v1] = [
                ((c1[0] as u16 + c2[0] as u16) / 2) as u8,
                ((c1[1] as u16 + c2[1] as u16) / 2) as u8,
                ((c1[2] as u16 + c2[2] as u16) / 2) as u8,
            ];
        }
        dropped
    }

    /// Compact live vertices and triangles back into an indexed mesh.
    pub(crate) fn into_mesh(self) -> IndexedMesh {
        let mut used = vec![false; self.positions.len()];
        for (f, face) in self.faces.iter().enumerate() {
            if self.face_alive[f] {
                for &v in face {
                    used[v] = true;
                }
            }
        }

        let mut old_to_new = vec![usize::MAX; self.positions.len()];
        let mut positions = Vec::new();
        let mut normals = self.normals.as_ref().map(|_| Vec::new());
        let mut colors = self.colors.as_ref().map(|_| Vec::new());
        for (i, &u) in used.iter().enumerate() {
            if !u || self.removed[i] {
                continue;
            }
            old_to_new[i] = positions.len();
            positions.push(self.positions[i]);
            if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                out.push(src[i]);
            }
            if let (Some(out), Some(src)) = (colors.as_mut(), self.colors.as_ref()) {
                out.push(src[i]);
            }
        }

        let faces = self
            .faces
            .iter()
            .enumerate()
            .filter(|(f, _)| self.face_alive[*f])
            .map(|(_, face)| face.map(|v| old_to_new[v]))
            .filter(|face| face.iter().all(|&v| v != usize::MAX))
            .collect();

        let mut mesh = IndexedMesh::from_vertices_and_faces(positions, faces);
        mesh.normals = normals;
        mesh.colors = colors;
        mesh
    }
}

fn directed(face: &[usize; 3]) -> [(usize, usize); 3] {
    [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])]
}

// ============================================================
// Edge Cost for Priority Queue
// ============================================================

#[derive(Debug, Clone)]
struct EdgeCost {
    v1: usize,
    v2: usize,
    stamps: (u32, u32),
    position: Point3f,
    cost: f64,
}

impl PartialEq for EdgeCost {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}
impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost first
        other.cost.total_cmp(&self.cost)
    }
}

// ============================================================
// Edge Collapse Simplifier
// ============================================================

/// Outcome of a collapse run before repair.
pub(crate) struct CollapseRun {
    pub mesh: IndexedMesh,
    pub collapses: usize,
    pub completion: Completion,
}

/// QEM edge collapse down to a triangle target.
pub struct EdgeCollapseSimplifier<'a> {
    params: &'a DecimateParams,
}

impl<'a> EdgeCollapseSimplifier<'a> {
    pub fn new(params: &'a DecimateParams) -> Self {
        Self { params }
    }

    fn edge_allowed(&self, cm: &CollapseMesh, v1: usize, v2: usize) -> bool {
        !self.params.preserve_boundary
            || !(cm.is_boundary_vertex(v1) || cm.is_boundary_vertex(v2))
    }

    fn make_entry(&self, cm: &CollapseMesh, v1: usize, v2: usize) -> EdgeCost {
        let (position, cost) = cm.compute_collapse_cost(v1, v2);
        EdgeCost {
            v1,
            v2,
            stamps: (cm.version[v1], cm.version[v2]),
            position,
            cost,
        }
    }

    /// Build the initial priority queue of edge collapse candidates.
    fn build_queue(&self, cm: &CollapseMesh, next_id: &mut usize) -> PriorityQueue<usize, EdgeCost> {
        let mut queue = PriorityQueue::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for (f, face) in cm.faces.iter().enumerate() {
            if !cm.face_alive[f] {
                continue;
            }
            for (a, b) in directed(face) {
                let key = (a.min(b), a.max(b));
                if a == b || !seen.insert(key) || !self.edge_allowed(cm, key.0, key.1) {
                    continue;
                }
                queue.push(*next_id, self.make_entry(cm, key.0, key.1));
                *next_id += 1;
            }
        }
        queue
    }

    /// Collapse edges until `target` triangles remain, the queue runs dry,
    /// the error threshold is hit, or the control asks to stop.
    pub(crate) fn run(
        &self,
        mesh: &IndexedMesh,
        target: usize,
        control: &OperationControl,
    ) -> CollapseRun {
        let mut cm = CollapseMesh::from_mesh(mesh, self.params.boundary_weight);
        let mut next_id = 0usize;
        let mut queue = self.build_queue(&cm, &mut next_id);
        let min_cos = self.params.max_normal_flip.cos();
        let planned = cm.active_faces().saturating_sub(target);
        // Progress counts collapses; an interior one removes two triangles
        let expected = planned.div_ceil(2);
        let mut collapses = 0usize;
        let mut completion = Completion::Complete;

        debug!(
            candidates = queue.len(),
            target,
            triangles = cm.active_faces(),
            "Edge collapse queue built"
        );

        while cm.active_faces() > target {
            if control.is_cancelled() {
                completion = Completion::Partial(PartialReason::Cancelled);
                break;
            }

            let Some((_, entry)) = queue.pop() else {
                break;
            };

            let (v1, v2) = (entry.v1, entry.v2);
            if !cm.is_live(v1) || !cm.is_live(v2) || entry.stamps != (cm.version[v1], cm.version[v2]) {
                continue;
            }
            if let Some(max_error) = self.params.max_error {
                if entry.cost > max_error {
                    trace!(cost = entry.cost, max_error, "Error threshold reached");
                    completion = Completion::Partial(PartialReason::QueueExhausted);
                    break;
                }
            }

            let shared = cm.shared_faces(v1, v2).len();
            if shared == 0 || cm.active_faces() - shared < target {
                continue;
            }
            if !cm.check_link_condition(v1, v2) {
                continue;
            }
            if !cm.preserves_orientation(v1, v2, &entry.position, min_cos) {
                continue;
            }

            cm.collapse(v1, v2, entry.position);
            collapses += 1;

            for n in cm.neighbors(v1) {
                if self.edge_allowed(&cm, v1, n) {
                    queue.push(next_id, self.make_entry(&cm, v1.min(n), v1.max(n)));
                    next_id += 1;
                }
            }

            if !control.checkpoint(collapses, expected, "decimate") {
                completion = Completion::Partial(PartialReason::Cancelled);
                break;
            }
        }

        // An interior collapse removes two triangles, so one over target is done
        if completion.is_complete() && cm.active_faces() > target + 1 {
            completion = Completion::Partial(PartialReason::QueueExhausted);
        }
        control.finish(expected, "decimate");

        CollapseRun {
            mesh: cm.into_mesh(),
            collapses,
            completion,
        }
    }
}

impl MeshSimplifier for EdgeCollapseSimplifier<'_> {
    fn simplify(&self, mesh: &IndexedMesh, target: usize, control: &OperationControl) -> Simplified {
        let run = self.run(mesh, target, control);
        debug!(
            collapses = run.collapses,
            triangles = run.mesh.face_count(),
            completion = ?run.completion,
            "Edge collapse finished"
        );
        Simplified {
            mesh: run.mesh,
            completion: run.completion,
        }
    }

    fn name(&self) -> &'static str {
        "quadric_edge_collapse"
    }
}
