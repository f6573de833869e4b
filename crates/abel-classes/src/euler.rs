//! Inverse Euler class of the virtual normal bundle.
//!
//! Every localized integral divides by the equivariant Euler class of the
//! normal bundle of the fixed locus. The class factors over the edges and
//! vertices of the decorated tree, so its inverse is assembled as a product
//! of local terms. Any vanishing divisor here means the weight tuple is
//! degenerate for this coloration and is reported as retriable.

use abel_core::errors::Result;
use abel_core::rational::{factorial, invert, pow_int, rat, Rat};

use crate::context::{rat_of, FixedPoint};

/// Inverse Euler class of the virtual normal bundle at one fixed point.
pub fn euler_inverse(fp: &FixedPoint) -> Result<Rat> {
    let g = fp.graph();
    let mut result = rat(1);

    for e in g.edges() {
        let a = e.degree as i64;
        let li = fp.lambda(e.u).clone();
        let lj = fp.lambda(e.v).clone();

        // (-1)^a a^{2a} / ((a!)^2 (li - lj)^{2a})
        let sign = if a % 2 == 0 { rat(1) } else { rat(-1) };
        let numerator = sign * pow_int(&rat(a), 2 * a)?;
        let fact = rat_of(factorial(a as u64));
        let denominator = &fact * &fact * pow_int(&(&li - &lj), 2 * a)?;
        result *= numerator * invert(&denominator)?;

        // Tangent directions away from the invariant line through the two
        // fixed points of the edge.
        let ci = fp.color(e.u) as usize;
        let cj = fp.color(e.v) as usize;
        for (k, lk) in fp.weights().values().iter().enumerate() {
            if k == ci || k == cj {
                continue;
            }
            for alpha in 0..=a {
                let beta = a - alpha;
                let term = (rat(alpha) * &li + rat(beta) * &lj) / rat(a) - lk;
                result *= invert(&term)?;
            }
        }
    }

    for v in 0..g.num_vertices() {
        let valence = g.valence(v) as i64;
        let s = g.special_points(v) as i64;

        result *= pow_int(&fp.total_tangent_weight(fp.color(v)), valence - 1)?;
        result *= pow_int(&fp.flag_inverse_sum(v)?, s - 3)?;
        for &(edge_id, _) in g.flags(v) {
            result *= invert(&fp.omega(v, edge_id))?;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abel_core::rational::rat_frac;
    use abel_core::weights::TorusWeights;
    use abel_graphs::enumerate::enumerate_graphs;

    fn weights_13() -> TorusWeights {
        TorusWeights::from_values(vec![rat(1), rat(3)]).unwrap()
    }

    #[test]
    fn test_single_edge_is_trivial() {
        // A degree-one edge in P^1 has trivial normal bundle.
        let g = enumerate_graphs(1, 0).unwrap().into_iter().next().unwrap();
        let w = weights_13();
        for coloring in [vec![0u8, 1u8], vec![1u8, 0u8]] {
            let fp = FixedPoint::new(&g, &coloring, &w).unwrap();
            assert_eq!(euler_inverse(&fp).unwrap(), rat(1));
        }
    }

    #[test]
    fn test_degree_two_edge() {
        // Double cover of a line in P^1: -1 / (l0 - l1)^2 = -1/4 for
        // weights (1, 3).
        let g = enumerate_graphs(2, 0)
            .unwrap()
            .into_iter()
            .find(|g| g.num_vertices() == 2)
            .unwrap();
        let w = weights_13();
        let fp = FixedPoint::new(&g, &[0, 1], &w).unwrap();
        assert_eq!(euler_inverse(&fp).unwrap(), rat_frac(-1, 4).unwrap());
    }

    #[test]
    fn test_degree_two_path() {
        // Two unit edges meeting at a vertex: 1 / (2 (l0 - l1)^2) = 1/8.
        let g = enumerate_graphs(2, 0)
            .unwrap()
            .into_iter()
            .find(|g| g.num_vertices() == 3)
            .unwrap();
        let w = weights_13();
        // The middle vertex of the path is the one with valence 2.
        let middle = (0..3).find(|&v| g.valence(v) == 2).unwrap();
        let mut coloring = vec![0u8; 3];
        coloring[middle] = 1;
        let fp = FixedPoint::new(&g, &coloring, &w).unwrap();
        assert_eq!(euler_inverse(&fp).unwrap(), rat_frac(1, 8).unwrap());
    }
}
