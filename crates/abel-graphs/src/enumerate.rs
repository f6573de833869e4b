//! Enumeration of the decorated trees indexing torus fixed loci.
//!
//! For total degree `d` and `m` marked points the fixed loci are the
//! isomorphism classes of trees with positive edge degrees summing to `d`
//! and the marks distributed over the vertices. The enumeration proceeds in
//! three stages: free tree shapes by vertex count, then edge-degree
//! compositions and mark placements on each shape, with isomorphic
//! decorations merged through a canonical code. The automorphism order of
//! each class is a by-product of the canonicalization.

use std::collections::HashSet;

use log::debug;

use abel_core::errors::{AbelError, Result};

use crate::graph::{Edge, StableGraph};

/// A rooted tree shape, identified by its canonical parenthesis code.
#[derive(Debug, Clone)]
struct Rooted {
    size: usize,
    children: Vec<Rooted>,
}

/// All rooted tree shapes of each size up to `max_size`, generated by
/// choosing child multisets in a fixed order so every shape appears once.
fn rooted_by_size(max_size: usize) -> Vec<Vec<Rooted>> {
    let mut by_size: Vec<Vec<Rooted>> = vec![Vec::new(); max_size + 1];
    if max_size >= 1 {
        by_size[1].push(Rooted { size: 1, children: Vec::new() });
    }
    for s in 2..=max_size {
        let pool: Vec<Rooted> = (1..s).flat_map(|k| by_size[k].iter().cloned()).collect();
        let mut out = Vec::new();
        let mut chosen: Vec<usize> = Vec::new();
        pick_children(&pool, 0, s - 1, &mut chosen, &mut out);
        by_size[s] = out;
    }
    by_size
}

/// Extends `chosen` with pool indices in non-decreasing order until the
/// child sizes sum to `remaining`; each completed multiset yields one tree.
fn pick_children(
    pool: &[Rooted],
    start: usize,
    remaining: usize,
    chosen: &mut Vec<usize>,
    out: &mut Vec<Rooted>,
) {
    if remaining == 0 {
        let children: Vec<Rooted> = chosen.iter().map(|&i| pool[i].clone()).collect();
        let size = 1 + children.iter().map(|c| c.size).sum::<usize>();
        out.push(Rooted { size, children });
        return;
    }
    for i in start..pool.len() {
        if pool[i].size <= remaining {
            chosen.push(i);
            pick_children(pool, i, remaining - pool[i].size, chosen, out);
            chosen.pop();
        }
    }
}

/// A free tree shape as a labeled edge list on vertices `0..num_vertices`.
#[derive(Debug, Clone)]
struct FreeShape {
    num_vertices: usize,
    edges: Vec<(usize, usize)>,
}

fn emit_edges(tree: &Rooted, root: usize, next: &mut usize, edges: &mut Vec<(usize, usize)>) {
    for child in &tree.children {
        let id = *next;
        *next += 1;
        edges.push((root, id));
        emit_edges(child, id, next, edges);
    }
}

/// Free trees on `v` vertices, one labeled representative per shape.
///
/// A tree with a unique centroid is rooted there, so its shapes are the
/// rooted trees whose child subtrees all have at most `(v - 1) / 2`
/// vertices. A tree with two centroids splits along the central edge into
/// an unordered pair of rooted trees on `v / 2` vertices each.
fn free_shapes(v: usize) -> Vec<FreeShape> {
    let by_size = rooted_by_size(v);
    let mut shapes = Vec::new();

    for tree in &by_size[v] {
        if tree.children.iter().all(|c| c.size <= (v - 1) / 2) {
            let mut edges = Vec::with_capacity(v - 1);
            let mut next = 1usize;
            emit_edges(tree, 0, &mut next, &mut edges);
            shapes.push(FreeShape { num_vertices: v, edges });
        }
    }

    if v % 2 == 0 {
        let half = &by_size[v / 2];
        for i in 0..half.len() {
            for j in i..half.len() {
                let mut edges = Vec::with_capacity(v - 1);
                let mut next = 1usize;
                emit_edges(&half[i], 0, &mut next, &mut edges);
                let other_root = next;
                next += 1;
                emit_edges(&half[j], other_root, &mut next, &mut edges);
                edges.push((0, other_root));
                shapes.push(FreeShape { num_vertices: v, edges });
            }
        }
    }

    shapes
}

/// Ordered splits of `total` into `parts` positive summands.
fn compositions(total: u32, parts: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(parts);
    fn descend(total: u32, parts: usize, current: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
        if parts == 1 {
            if total >= 1 {
                current.push(total);
                out.push(current.clone());
                current.pop();
            }
            return;
        }
        for first in 1..=total.saturating_sub(parts as u32 - 1) {
            current.push(first);
            descend(total - first, parts - 1, current, out);
            current.pop();
        }
    }
    descend(total, parts, &mut current, &mut out);
    out
}

/// Vertices minimizing the largest component left by their removal. Every
/// tree has one centroid, or two adjacent ones.
fn centroids(num_vertices: usize, adjacency: &[Vec<(usize, u32)>]) -> Vec<usize> {
    let mut best = usize::MAX;
    let mut found = Vec::new();
    for v in 0..num_vertices {
        let mut largest = 0;
        let mut seen = vec![false; num_vertices];
        seen[v] = true;
        for &(w, _) in &adjacency[v] {
            if seen[w] {
                continue;
            }
            let mut size = 0;
            let mut stack = vec![w];
            seen[w] = true;
            while let Some(x) = stack.pop() {
                size += 1;
                for &(y, _) in &adjacency[x] {
                    if !seen[y] {
                        seen[y] = true;
                        stack.push(y);
                    }
                }
            }
            largest = largest.max(size);
        }
        if largest < best {
            best = largest;
            found.clear();
            found.push(v);
        } else if largest == best {
            found.push(v);
        }
    }
    found
}

/// Canonical code and automorphism order of the subtree rooted at `v`,
/// descending away from `parent`. Child entries carry the edge degree, so
/// two entries compare equal exactly when the decorated subtrees (degrees
/// and mark labels included) are isomorphic.
fn rooted_decorated(
    v: usize,
    parent: Option<usize>,
    adjacency: &[Vec<(usize, u32)>],
    marks_by_vertex: &[Vec<usize>],
) -> (String, u64) {
    let mut entries: Vec<(String, u64)> = Vec::new();
    for &(w, degree) in &adjacency[v] {
        if Some(w) == parent {
            continue;
        }
        let (code, aut) = rooted_decorated(w, Some(v), adjacency, marks_by_vertex);
        entries.push((format!("{}>{}", degree, code), aut));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut aut = 1u64;
    let mut run = 1u64;
    for (i, entry) in entries.iter().enumerate() {
        aut *= entry.1;
        if i > 0 {
            if entry.0 == entries[i - 1].0 {
                run += 1;
            } else {
                run = 1;
            }
        }
        aut *= run;
    }

    let marks: Vec<String> = marks_by_vertex[v].iter().map(|i| i.to_string()).collect();
    let children: Vec<&str> = entries.iter().map(|(c, _)| c.as_str()).collect();
    let code = format!("[{}|{}]", marks.join(","), children.join(";"));
    (code, aut)
}

/// Canonical code and automorphism order of a full decorated tree, rooted
/// at the centroid (or split over the two centroids) of the underlying
/// shape so that isomorphic decorations produce identical codes.
fn canonical_decorated(
    num_vertices: usize,
    adjacency: &[Vec<(usize, u32)>],
    marks_by_vertex: &[Vec<usize>],
) -> (String, u64) {
    let centers = centroids(num_vertices, adjacency);
    if centers.len() == 1 {
        return rooted_decorated(centers[0], None, adjacency, marks_by_vertex);
    }

    let (c1, c2) = (centers[0], centers[1]);
    let central_degree = adjacency[c1]
        .iter()
        .find(|&&(w, _)| w == c2)
        .map(|&(_, d)| d)
        .unwrap_or(0);
    let (code1, aut1) = rooted_decorated(c1, Some(c2), adjacency, marks_by_vertex);
    let (code2, aut2) = rooted_decorated(c2, Some(c1), adjacency, marks_by_vertex);
    let swap = if code1 == code2 { 2 } else { 1 };
    let (lo, hi) = if code1 <= code2 {
        (code1, code2)
    } else {
        (code2, code1)
    };
    (format!("<{}|{}|{}>", central_degree, lo, hi), aut1 * aut2 * swap)
}

/// Enumerates the decorated trees of total degree `d` with `m` labeled
/// marks, one representative per isomorphism class, sorted by canonical
/// code.
pub fn enumerate_graphs(d: u32, m: usize) -> Result<Vec<StableGraph>> {
    if d == 0 {
        return Err(AbelError::input_range("degree must be positive"));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut graphs = Vec::new();

    for v in 2..=(d as usize + 1) {
        for shape in free_shapes(v) {
            let num_edges = shape.num_vertices - 1;
            for degrees in compositions(d, num_edges) {
                // Odometer over the m-fold choice of mark vertices.
                let mut placement = vec![0usize; m];
                loop {
                    let mut adjacency: Vec<Vec<(usize, u32)>> = vec![Vec::new(); v];
                    for (id, &(a, b)) in shape.edges.iter().enumerate() {
                        adjacency[a].push((b, degrees[id]));
                        adjacency[b].push((a, degrees[id]));
                    }
                    let mut marks_by_vertex: Vec<Vec<usize>> = vec![Vec::new(); v];
                    for (i, &vertex) in placement.iter().enumerate() {
                        marks_by_vertex[vertex].push(i);
                    }

                    let (code, aut) = canonical_decorated(v, &adjacency, &marks_by_vertex);
                    if seen.insert(code.clone()) {
                        let edges: Vec<Edge> = shape
                            .edges
                            .iter()
                            .zip(&degrees)
                            .map(|(&(a, b), &deg)| Edge { u: a, v: b, degree: deg })
                            .collect();
                        graphs.push(StableGraph::new(
                            v,
                            edges,
                            placement.clone(),
                            aut,
                            code,
                        )?);
                    }

                    // Advance the placement; stop after the last one.
                    let mut pos = m;
                    loop {
                        if pos == 0 {
                            break;
                        }
                        pos -= 1;
                        placement[pos] += 1;
                        if placement[pos] < v {
                            break;
                        }
                        placement[pos] = 0;
                        if pos == 0 {
                            pos = usize::MAX;
                            break;
                        }
                    }
                    if m == 0 || pos == usize::MAX {
                        break;
                    }
                }
            }
        }
    }

    graphs.sort_by(|a, b| a.code().cmp(b.code()));
    debug!(
        "enumerated {} fixed-locus graphs for d = {}, m = {}",
        graphs.len(),
        d,
        m
    );
    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_tree_counts() {
        // 1, 1, 2, 4, 9, 20 rooted trees on 1..=6 vertices.
        let by_size = rooted_by_size(6);
        let counts: Vec<usize> = (1..=6).map(|s| by_size[s].len()).collect();
        assert_eq!(counts, vec![1, 1, 2, 4, 9, 20]);
    }

    #[test]
    fn test_free_shape_counts() {
        // 1, 1, 2, 3, 6 free trees on 2..=6 vertices.
        let counts: Vec<usize> = (2..=6).map(|v| free_shapes(v).len()).collect();
        assert_eq!(counts, vec![1, 1, 2, 3, 6]);
    }

    #[test]
    fn test_compositions() {
        assert_eq!(compositions(3, 1), vec![vec![3]]);
        assert_eq!(compositions(3, 2), vec![vec![1, 2], vec![2, 1]]);
        assert_eq!(compositions(4, 3).len(), 3);
        assert!(compositions(2, 3).is_empty());
    }

    #[test]
    fn test_enumerate_unmarked() {
        assert_eq!(enumerate_graphs(1, 0).unwrap().len(), 1);
        assert_eq!(enumerate_graphs(2, 0).unwrap().len(), 2);
        assert_eq!(enumerate_graphs(3, 0).unwrap().len(), 4);
    }

    #[test]
    fn test_enumerate_degree_three_aut_orders() {
        let graphs = enumerate_graphs(3, 0).unwrap();
        let mut summary: Vec<(usize, u64, u64)> = graphs
            .iter()
            .map(|g| (g.num_vertices(), g.aut_order(), g.deck_order()))
            .collect();
        summary.sort();
        // Single edge of degree 3; path with degrees 1,2; path with
        // degrees 1,1,1; star with three unit edges.
        assert_eq!(summary, vec![(2, 2, 3), (3, 1, 2), (4, 2, 1), (4, 6, 1)]);
    }

    #[test]
    fn test_enumerate_marked() {
        assert_eq!(enumerate_graphs(2, 1).unwrap().len(), 3);
        assert_eq!(enumerate_graphs(1, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_total_degree_is_preserved() {
        for g in enumerate_graphs(4, 0).unwrap() {
            assert_eq!(g.total_degree(), 4);
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let graphs = enumerate_graphs(4, 1).unwrap();
        let codes: HashSet<&str> = graphs.iter().map(|g| g.code()).collect();
        assert_eq!(codes.len(), graphs.len());
    }

    #[test]
    fn test_rejects_zero_degree() {
        assert!(enumerate_graphs(0, 0).is_err());
    }
}
