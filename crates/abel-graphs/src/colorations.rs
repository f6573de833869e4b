//! Proper colorations of a fixed-locus tree.
//!
//! A coloration assigns each vertex one of the `n + 1` torus fixed points
//! of projective space so that adjacent vertices get distinct fixed points.
//! On a tree these are counted exactly by `(n + 1) * n^(V - 1)` and can be
//! walked with an odometer over per-vertex digits: the root digit picks any
//! fixed point, every other digit picks one of the `n` fixed points other
//! than the parent's.

use abel_core::errors::{AbelError, Result};

use crate::graph::StableGraph;
use crate::store::ColorationStore;

/// A proper coloration: vertex index -> fixed-point color in `0..=n`.
pub type Coloration = Vec<u8>;

/// Largest coloration count walked in place. Beyond this the engine asks a
/// [`ColorationStore`] for a precomputed list instead.
pub const DIRECT_ENUMERATION_LIMIT: u128 = 1 << 27;

/// Number of proper colorations of a tree on `num_vertices` vertices with
/// `n + 1` colors, saturating at `u128::MAX`.
pub fn coloration_count(num_vertices: usize, n: usize) -> u128 {
    let mut count = (n as u128) + 1;
    for _ in 1..num_vertices {
        count = count.saturating_mul(n as u128);
    }
    count
}

/// In-place odometer over the proper colorations of a tree.
#[derive(Debug)]
pub struct DirectColorations {
    /// `(vertex, parent)` pairs, parents first.
    order: Vec<(usize, Option<usize>)>,
    n: usize,
    digits: Vec<usize>,
    exhausted: bool,
}

impl DirectColorations {
    pub fn new(graph: &StableGraph, n: usize) -> Self {
        DirectColorations {
            order: graph.dfs_order(),
            n,
            digits: vec![0; graph.num_vertices()],
            exhausted: n == 0 && graph.num_vertices() > 1,
        }
    }

    fn materialize(&self) -> Coloration {
        let mut colors = vec![0u8; self.order.len()];
        for (pos, &(vertex, parent)) in self.order.iter().enumerate() {
            let digit = self.digits[pos];
            let color = match parent {
                None => digit as u8,
                Some(p) => {
                    // Digits `0..n` skip over the parent's color.
                    let parent_color = colors[p] as usize;
                    if digit >= parent_color {
                        (digit + 1) as u8
                    } else {
                        digit as u8
                    }
                }
            };
            colors[vertex] = color;
        }
        colors
    }

    fn advance(&mut self) {
        for pos in (0..self.digits.len()).rev() {
            let radix = if pos == 0 { self.n + 1 } else { self.n };
            self.digits[pos] += 1;
            if self.digits[pos] < radix {
                return;
            }
            self.digits[pos] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for DirectColorations {
    type Item = Coloration;

    fn next(&mut self) -> Option<Coloration> {
        if self.exhausted {
            return None;
        }
        let coloration = self.materialize();
        self.advance();
        Some(coloration)
    }
}

/// Source of the colorations of one graph, either walked in place or
/// pulled from a store.
#[derive(Debug)]
pub enum ColorationSource {
    Direct(DirectColorations),
    Stored(std::vec::IntoIter<Coloration>),
}

impl Iterator for ColorationSource {
    type Item = Coloration;

    fn next(&mut self) -> Option<Coloration> {
        match self {
            ColorationSource::Direct(it) => it.next(),
            ColorationSource::Stored(it) => it.next(),
        }
    }
}

/// Colorations of `graph` with `n + 1` colors, with an explicit cutoff
/// between direct enumeration and store lookup.
pub fn colorations_with_limit(
    graph: &StableGraph,
    n: usize,
    limit: u128,
    store: Option<&dyn ColorationStore>,
    auto_fetch: bool,
) -> Result<ColorationSource> {
    if coloration_count(graph.num_vertices(), n) <= limit {
        return Ok(ColorationSource::Direct(DirectColorations::new(graph, n)));
    }

    let store = store.ok_or_else(|| AbelError::DataUnavailable {
        vertices: graph.num_vertices(),
        n,
        reason: "coloration count exceeds the direct enumeration limit and no store is configured"
            .to_string(),
    })?;

    if !store.has(graph.num_vertices(), n) {
        if auto_fetch {
            store.fetch(graph.num_vertices(), n)?;
        } else {
            return Err(AbelError::DataUnavailable {
                vertices: graph.num_vertices(),
                n,
                reason: "coloration data is not present and automatic fetching is disabled"
                    .to_string(),
            });
        }
    }

    let list = store.load(graph.num_vertices(), n, graph.code())?;
    Ok(ColorationSource::Stored(list.into_iter()))
}

/// Colorations of `graph` with `n + 1` colors, using the default cutoff.
pub fn colorations_for(
    graph: &StableGraph,
    n: usize,
    store: Option<&dyn ColorationStore>,
    auto_fetch: bool,
) -> Result<ColorationSource> {
    colorations_with_limit(graph, n, DIRECT_ENUMERATION_LIMIT, store, auto_fetch)
}
