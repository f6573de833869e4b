//! Decorated-tree representation of a torus fixed locus.
//!
//! A fixed locus of the torus action on the moduli space of genus-zero
//! stable maps is indexed by a tree whose edges carry positive multiple-cover
//! degrees summing to the total degree, with the marked points distributed
//! over the vertices. Vertices are contracted components (or mere attachment
//! points); edges are multiple covers of torus-invariant lines.

use serde::{Deserialize, Serialize};

use abel_core::errors::{AbelError, Result};

/// An edge of a decorated tree: unordered endpoints plus the degree of the
/// multiple cover it represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub degree: u32,
}

impl Edge {
    /// The endpoint opposite to `vertex`.
    pub fn other(&self, vertex: usize) -> usize {
        if vertex == self.u {
            self.v
        } else {
            self.u
        }
    }
}

/// A decorated tree indexing one torus fixed locus.
///
/// Immutable after construction; the automorphism order and the canonical
/// code are computed once, at enumeration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StableGraph {
    num_vertices: usize,
    edges: Vec<Edge>,
    /// vertex -> neighbor list
    adjacency: Vec<Vec<usize>>,
    /// vertex -> (edge id, neighbor) flags
    flags: Vec<Vec<(usize, usize)>>,
    /// mark index (0-based) -> vertex carrying it
    marks: Vec<usize>,
    marks_by_vertex: Vec<Vec<usize>>,
    total_degree: u32,
    aut_order: u64,
    code: String,
}

impl StableGraph {
    /// Builds a graph and checks its invariants: the edge set forms a tree,
    /// every edge degree is positive, and every mark lies on a vertex.
    pub fn new(
        num_vertices: usize,
        edges: Vec<Edge>,
        marks: Vec<usize>,
        aut_order: u64,
        code: String,
    ) -> Result<Self> {
        if num_vertices < 2 {
            return Err(AbelError::internal(
                "a fixed-locus tree needs at least two vertices",
            ));
        }
        if edges.len() != num_vertices - 1 {
            return Err(AbelError::internal(format!(
                "{} edges on {} vertices is not a tree",
                edges.len(),
                num_vertices
            )));
        }

        let mut adjacency = vec![Vec::new(); num_vertices];
        let mut flags = vec![Vec::new(); num_vertices];
        let mut total_degree = 0u32;
        for (id, e) in edges.iter().enumerate() {
            if e.u >= num_vertices || e.v >= num_vertices || e.u == e.v {
                return Err(AbelError::internal(format!(
                    "edge ({}, {}) has invalid endpoints",
                    e.u, e.v
                )));
            }
            if e.degree == 0 {
                return Err(AbelError::internal("edge degree must be positive"));
            }
            adjacency[e.u].push(e.v);
            adjacency[e.v].push(e.u);
            flags[e.u].push((id, e.v));
            flags[e.v].push((id, e.u));
            total_degree += e.degree;
        }

        // Connectivity; acyclicity follows from the edge count.
        let mut seen = vec![false; num_vertices];
        let mut stack = vec![0usize];
        seen[0] = true;
        while let Some(v) = stack.pop() {
            for &w in &adjacency[v] {
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
        if seen.iter().any(|s| !s) {
            return Err(AbelError::internal("fixed-locus tree is disconnected"));
        }

        let mut marks_by_vertex = vec![Vec::new(); num_vertices];
        for (i, &v) in marks.iter().enumerate() {
            if v >= num_vertices {
                return Err(AbelError::internal(format!(
                    "mark {} attached to missing vertex {}",
                    i + 1,
                    v
                )));
            }
            marks_by_vertex[v].push(i);
        }

        Ok(StableGraph {
            num_vertices,
            edges,
            adjacency,
            flags,
            marks,
            marks_by_vertex,
            total_degree,
            aut_order,
            code,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }

    /// `(edge id, neighbor)` flags at a vertex.
    pub fn flags(&self, vertex: usize) -> &[(usize, usize)] {
        &self.flags[vertex]
    }

    /// Number of edges at a vertex.
    pub fn valence(&self, vertex: usize) -> usize {
        self.adjacency[vertex].len()
    }

    /// mark index (0-based) -> vertex.
    pub fn marks(&self) -> &[usize] {
        &self.marks
    }

    pub fn num_marks(&self) -> usize {
        self.marks.len()
    }

    /// Marks carried by a vertex (0-based indices).
    pub fn marks_at(&self, vertex: usize) -> &[usize] {
        &self.marks_by_vertex[vertex]
    }

    /// Number of special points at a vertex: edges plus marks. A vertex
    /// with three or more special points is a contracted component with
    /// moduli; fewer means a mere point on an edge component.
    pub fn special_points(&self, vertex: usize) -> usize {
        self.valence(vertex) + self.marks_by_vertex[vertex].len()
    }

    pub fn total_degree(&self) -> u32 {
        self.total_degree
    }

    /// Product of the edge degrees: the order of the deck-transformation
    /// part of the fixed-locus stabilizer.
    pub fn deck_order(&self) -> u64 {
        self.edges.iter().map(|e| e.degree as u64).product()
    }

    /// Order of the automorphism group of the decorated tree (fixing edge
    /// degrees and mark labels).
    pub fn aut_order(&self) -> u64 {
        self.aut_order
    }

    /// Canonical code identifying the isomorphism class; stable across
    /// enumeration runs.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Preorder traversal from vertex 0: `(vertex, parent)` pairs with the
    /// parent of the root set to `None`. Parents always precede children.
    pub fn dfs_order(&self) -> Vec<(usize, Option<usize>)> {
        let mut order = Vec::with_capacity(self.num_vertices);
        let mut stack = vec![(0usize, None)];
        let mut seen = vec![false; self.num_vertices];
        while let Some((v, parent)) = stack.pop() {
            if seen[v] {
                continue;
            }
            seen[v] = true;
            order.push((v, parent));
            for &w in self.adjacency[v].iter().rev() {
                if !seen[w] {
                    stack.push((w, Some(v)));
                }
            }
        }
        order
    }

    /// Prüfer sequence of the underlying tree in its canonical labeling;
    /// empty for the two-vertex tree.
    pub fn prufer_sequence(&self) -> Vec<usize> {
        let mut degree: Vec<usize> = self.adjacency.iter().map(|a| a.len()).collect();
        let mut alive = vec![true; self.num_vertices];
        let mut sequence = Vec::with_capacity(self.num_vertices.saturating_sub(2));
        for _ in 0..self.num_vertices.saturating_sub(2) {
            let leaf = (0..self.num_vertices)
                .find(|&v| alive[v] && degree[v] == 1)
                .unwrap_or(0);
            let parent = self.adjacency[leaf]
                .iter()
                .copied()
                .find(|&w| alive[w])
                .unwrap_or(0);
            sequence.push(parent);
            alive[leaf] = false;
            degree[parent] -= 1;
        }
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3() -> StableGraph {
        StableGraph::new(
            3,
            vec![
                Edge { u: 0, v: 1, degree: 1 },
                Edge { u: 1, v: 2, degree: 2 },
            ],
            vec![2],
            1,
            "test-path".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_basic_accessors() {
        let g = path3();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.total_degree(), 3);
        assert_eq!(g.deck_order(), 2);
        assert_eq!(g.valence(1), 2);
        assert_eq!(g.special_points(2), 2);
        assert_eq!(g.marks_at(2), &[0]);
    }

    #[test]
    fn test_invariants_rejected() {
        // Wrong edge count for a tree.
        assert!(StableGraph::new(3, vec![Edge { u: 0, v: 1, degree: 1 }], vec![], 1, "x".into())
            .is_err());
        // Zero-degree edge.
        assert!(StableGraph::new(2, vec![Edge { u: 0, v: 1, degree: 0 }], vec![], 1, "x".into())
            .is_err());
        // Mark off the end.
        assert!(StableGraph::new(2, vec![Edge { u: 0, v: 1, degree: 1 }], vec![5], 1, "x".into())
            .is_err());
    }

    #[test]
    fn test_dfs_order_parents_first() {
        let g = path3();
        let order = g.dfs_order();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], (0, None));
        for (pos, &(_, parent)) in order.iter().enumerate().skip(1) {
            let p = parent.unwrap();
            assert!(order[..pos].iter().any(|&(v, _)| v == p));
        }
    }

    #[test]
    fn test_prufer_sequence() {
        let g = path3();
        // Path 0-1-2: removing leaf 0 records 1, leaving the two-vertex tree.
        assert_eq!(g.prufer_sequence(), vec![1]);
    }
}
