//! Edge and adjacency lookups over an indexed triangle list

use std::collections::HashMap;

/// An undirected edge, stored with the smaller vertex index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    pub fn contains(&self, v: usize) -> bool {
        self.0 == v || self.1 == v
    }
}

/// The three undirected edges of a triangle.
#[inline]
pub fn triangle_edges(t: &[usize; 3]) -> [Edge; 3] {
    [Edge::new(t[0], t[1]), Edge::new(t[1], t[2]), Edge::new(t[2], t[0])]
}

/// The three directed edges of a triangle, following its winding.
#[inline]
pub fn directed_edges(t: &[usize; 3]) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

/// Edge-to-triangle and vertex-to-triangle lookups.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    edge_to_faces: HashMap<Edge, Vec<usize>>,
    vertex_to_faces: Vec<Vec<usize>>,
}

impl MeshAdjacency {
    /// Build adjacency for `faces` over a buffer of `vertex_count` vertices.
    /// Out-of-range indices are ignored for the vertex lookup.
    pub fn build(faces: &[[usize; 3]], vertex_count: usize) -> Self {
        let mut edge_to_faces: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(faces.len() * 2);
        let mut vertex_to_faces = vec![Vec::new(); vertex_count];

        for (face_idx, face) in faces.iter().enumerate() {
            for &v in face {
                if let Some(list) = vertex_to_faces.get_mut(v) {
                    if list.last() != Some(&face_idx) {
                        list.push(face_idx);
                    }
                }
            }
            for edge in triangle_edges(face) {
                if edge.0 != edge.1 {
                    edge_to_faces.entry(edge).or_default().push(face_idx);
                }
            }
        }

        Self {
            edge_to_faces,
            vertex_to_faces,
        }
    }

    /// Triangles incident to the edge `(a, b)`; empty when it is not an edge.
    pub fn faces_for_edge(&self, a: usize, b: usize) -> &[usize] {
        self.edge_to_faces
            .get(&Edge::new(a, b))
            .map_or(&[], Vec::as_slice)
    }

    /// Triangles incident to vertex `v`.
    pub fn faces_for_vertex(&self, v: usize) -> &[usize] {
        self.vertex_to_faces.get(v).map_or(&[], Vec::as_slice)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Edge, &Vec<usize>)> + '_ {
        self.edge_to_faces.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Edges with exactly one incident triangle.
    pub fn boundary_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Edges with more than two incident triangles.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces.values().filter(|f| f.len() > 2).count()
    }

    /// Triangles sharing a manifold edge with `face`, one entry per edge.
    pub fn face_neighbors(&self, faces: &[[usize; 3]], face: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(3);
        for edge in triangle_edges(&faces[face]) {
            if let Some(adjacent) = self.edge_to_faces.get(&edge) {
                if adjacent.len() == 2 {
                    let other = if adjacent[0] == face { adjacent[1] } else { adjacent[0] };
                    if other != face {
                        out.push(other);
                    }
                }
            }
        }
        out
    }
}

/// Number of connected components of the triangle set, where triangles sharing
/// a vertex are connected. Vertices referenced by no triangle are ignored.
pub fn connected_components(faces: &[[usize; 3]], vertex_count: usize) -> usize {
    let mut parent: Vec<usize> = (0..vertex_count).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    let mut used = vec![false; vertex_count];
    for f in faces {
        if f.iter().any(|&v| v >= vertex_count) {
            continue;
        }
        for &v in f {
            used[v] = true;
        }
        let r0 = find(&mut parent, f[0]);
        for &v in &f[1..] {
            let r = find(&mut parent, v);
            if r != r0 {
                parent[r] = r0;
            }
        }
    }

    (0..vertex_count)
        .filter(|&v| used[v] && find(&mut parent, v) == v)
        .count()
}
