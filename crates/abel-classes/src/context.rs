//! Evaluation context for one torus fixed point.
//!
//! A fixed point of the localized integrand is a decorated tree together
//! with a proper coloration mapping its vertices to the fixed points of
//! projective space. [`FixedPoint`] bundles the tree, the coloration and the
//! torus weights, and provides the recurring localization quantities: flag
//! weights, flag inverse sums, the total tangent weight of an ambient fixed
//! point, and descendant (psi) powers at a vertex.

use num_bigint::BigInt;
use num_traits::Zero;

use abel_core::errors::{AbelError, Result};
use abel_core::rational::{binomial, invert, pow_int, rat, Rat};
use abel_core::weights::TorusWeights;
use abel_graphs::graph::StableGraph;

/// A decorated tree pinned to ambient fixed points by a coloration.
pub struct FixedPoint<'a> {
    graph: &'a StableGraph,
    coloring: &'a [u8],
    weights: &'a TorusWeights,
}

impl<'a> FixedPoint<'a> {
    pub fn new(
        graph: &'a StableGraph,
        coloring: &'a [u8],
        weights: &'a TorusWeights,
    ) -> Result<Self> {
        if coloring.len() != graph.num_vertices() {
            return Err(AbelError::internal(format!(
                "coloration length {} does not match {} vertices",
                coloring.len(),
                graph.num_vertices()
            )));
        }
        Ok(FixedPoint {
            graph,
            coloring,
            weights,
        })
    }

    pub fn graph(&self) -> &StableGraph {
        self.graph
    }

    pub fn weights(&self) -> &TorusWeights {
        self.weights
    }

    /// Ambient fixed point carrying `vertex`.
    pub fn color(&self, vertex: usize) -> u8 {
        self.coloring[vertex]
    }

    /// Torus weight of the fixed point carrying `vertex`.
    pub fn lambda(&self, vertex: usize) -> &Rat {
        self.weights.lambda(self.coloring[vertex])
    }

    /// Torus weight at the vertex carrying mark `i` (0-based).
    pub fn lambda_of_mark(&self, mark: usize) -> &Rat {
        self.lambda(self.graph.marks()[mark])
    }

    /// Weight of the flag `(vertex, edge)`: the tangent weight of the edge
    /// component at the end sitting over `vertex`,
    /// `(lambda(vertex) - lambda(other end)) / degree`.
    pub fn omega(&self, vertex: usize, edge_id: usize) -> Rat {
        let edge = self.graph.edge(edge_id);
        let other = edge.other(vertex);
        (self.lambda(vertex) - self.lambda(other)) / rat(edge.degree as i64)
    }

    /// `sum over flags F at vertex of 1 / omega_F`.
    pub fn flag_inverse_sum(&self, vertex: usize) -> Result<Rat> {
        let mut sum = Rat::zero();
        for &(edge_id, _) in self.graph.flags(vertex) {
            sum += invert(&self.omega(vertex, edge_id))?;
        }
        Ok(sum)
    }

    /// Total weight of the tangent space of projective space at the fixed
    /// point `color`: the product of `lambda(color) - lambda(k)` over all
    /// other fixed points `k`.
    pub fn total_tangent_weight(&self, color: u8) -> Rat {
        let own = self.weights.lambda(color);
        let mut product = rat(1);
        for (k, other) in self.weights.values().iter().enumerate() {
            if k != color as usize {
                product *= own - other;
            }
        }
        product
    }

    /// Localized value of the `t`-th power of the psi class of one special
    /// point at `vertex`.
    ///
    /// On a vertex with moduli (three or more special points) this is the
    /// normalized vertex integral `C(s - 3, t)` times the inverse `t`-th
    /// power of the flag inverse sum; it vanishes when `t` exceeds the
    /// vertex dimension. On an unstable vertex with one edge and one mark
    /// the psi class restricts to `-omega` of the unique flag.
    pub fn psi_power(&self, vertex: usize, t: u64) -> Result<Rat> {
        if t == 0 {
            return Ok(rat(1));
        }
        let s = self.graph.special_points(vertex);
        if s >= 3 {
            let coefficient = binomial(s as u64 - 3, t);
            if coefficient.is_zero() {
                return Ok(Rat::zero());
            }
            let sum = self.flag_inverse_sum(vertex)?;
            Ok(Rat::from_integer(coefficient) * pow_int(&sum, -(t as i64))?)
        } else {
            // One edge and one mark: the psi class at the mark is minus the
            // flag weight.
            let (edge_id, _) = self.graph.flags(vertex)[0];
            pow_int(&(-self.omega(vertex, edge_id)), t as i64)
        }
    }
}

/// Converts a big-integer factorial or coefficient into a rational.
pub(crate) fn rat_of(value: BigInt) -> Rat {
    Rat::from_integer(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abel_core::rational::rat_frac;
    use abel_graphs::enumerate::enumerate_graphs;

    fn single_edge() -> StableGraph {
        enumerate_graphs(1, 0).unwrap().into_iter().next().unwrap()
    }

    #[test]
    fn test_omega_and_total_weight() {
        let g = single_edge();
        let w = TorusWeights::from_values(vec![rat(1), rat(3)]).unwrap();
        let coloring = vec![0u8, 1u8];
        let fp = FixedPoint::new(&g, &coloring, &w).unwrap();

        assert_eq!(fp.omega(0, 0), rat(-2));
        assert_eq!(fp.omega(1, 0), rat(2));
        assert_eq!(fp.total_tangent_weight(0), rat(-2));
        assert_eq!(fp.total_tangent_weight(1), rat(2));
        assert_eq!(fp.flag_inverse_sum(1).unwrap(), rat_frac(1, 2).unwrap());
    }

    #[test]
    fn test_psi_power_on_unstable_vertex() {
        // Single edge with a mark on vertex 0: one edge plus one mark.
        let graphs = enumerate_graphs(1, 1).unwrap();
        let g = &graphs[0];
        let marked = g.marks()[0];
        let w = TorusWeights::from_values(vec![rat(1), rat(3)]).unwrap();
        let coloring = vec![0u8, 1u8];
        let fp = FixedPoint::new(g, &coloring, &w).unwrap();

        let omega = fp.omega(marked, 0);
        assert_eq!(fp.psi_power(marked, 1).unwrap(), -omega);
        assert_eq!(fp.psi_power(marked, 0).unwrap(), rat(1));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let g = single_edge();
        let w = TorusWeights::from_values(vec![rat(1), rat(3)]).unwrap();
        let coloring = vec![0u8];
        assert!(FixedPoint::new(&g, &coloring, &w).is_err());
    }
}
