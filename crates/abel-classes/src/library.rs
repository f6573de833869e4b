//! Localized values of the primitive equivariant classes.
//!
//! Each function evaluates one primitive class at a fixed point, as a
//! product of edge terms and vertex terms over the decorated tree. The
//! class algebra dispatches here; the inverse Euler class lives in
//! [`crate::euler`].

use num_bigint::BigInt;
use num_traits::{One, Zero};

use abel_core::errors::Result;
use abel_core::rational::{factorial, invert, pow_int, rat, Rat};

use crate::context::{rat_of, FixedPoint};

/// Equivariant hyperplane class pulled back through the `i`-th evaluation
/// map (0-based mark index): the weight at the vertex carrying the mark.
pub fn o1_at_mark(fp: &FixedPoint, mark: usize) -> Rat {
    fp.lambda_of_mark(mark).clone()
}

/// Product of the hyperplane classes of all marks.
pub fn o1_all(fp: &FixedPoint) -> Rat {
    let mut product = rat(1);
    for mark in 0..fp.graph().num_marks() {
        product *= fp.lambda_of_mark(mark);
    }
    product
}

/// Euler class of the bundle of degree-`b` hypersurface sections.
pub fn hypersurface_value(fp: &FixedPoint, b: i64) -> Result<Rat> {
    let g = fp.graph();
    let mut result = rat(1);

    for e in g.edges() {
        let a = e.degree as i64;
        let li = fp.lambda(e.u).clone();
        let lj = fp.lambda(e.v).clone();
        for alpha in 0..=(a * b) {
            let beta = a * b - alpha;
            result *= (rat(alpha) * &li + rat(beta) * &lj) / rat(a);
        }
    }
    for v in 0..g.num_vertices() {
        let exponent = g.valence(v) as i64 - 1;
        result *= invert(&pow_int(&(rat(b) * fp.lambda(v)), exponent)?)?;
    }
    Ok(result)
}

/// Class of maps incident to a linear subspace of codimension `r`.
pub fn incidency_value(fp: &FixedPoint, r: i64) -> Result<Rat> {
    let g = fp.graph();
    let mut result = Rat::zero();

    for e in g.edges() {
        let li = fp.lambda(e.u).clone();
        let lj = fp.lambda(e.v).clone();
        let mut edge_sum = Rat::zero();
        for alpha in 0..=(r - 1) {
            let beta = r - 1 - alpha;
            edge_sum += pow_int(&li, alpha)? * pow_int(&lj, beta)?;
        }
        result += rat(e.degree as i64) * edge_sum;
    }
    Ok(result)
}

/// Euler class of the bundle of contact conditions against a plane curve,
/// twisting by twice the hyperplane class.
pub fn contact_value(fp: &FixedPoint) -> Result<Rat> {
    let g = fp.graph();
    let mut result = rat(1);

    for e in g.edges() {
        let a = e.degree as i64;
        let li = fp.lambda(e.u).clone();
        let lj = fp.lambda(e.v).clone();
        for alpha in 1..(2 * a) {
            let beta = 2 * a - alpha;
            result *= (rat(alpha) * &li + rat(beta) * &lj) / rat(a);
        }
    }
    for v in 0..g.num_vertices() {
        let exponent = g.valence(v) as i64 - 1;
        result *= pow_int(&(rat(2) * fp.lambda(v)), exponent)?;
    }
    Ok(result)
}

/// Euler class of the first derived pushforward of the `k`-th power of the
/// dualized hyperplane bundle.
pub fn r1_value(fp: &FixedPoint, k: i64) -> Result<Rat> {
    let g = fp.graph();
    let mut result = rat(1);

    for e in g.edges() {
        let a = e.degree as i64;
        let li = fp.lambda(e.u).clone();
        let lj = fp.lambda(e.v).clone();
        for alpha in 1..(k * a) {
            let beta = k * a - alpha;
            result *= -((rat(alpha) * &li + rat(beta) * &lj) / rat(a));
        }
    }
    for v in 0..g.num_vertices() {
        let exponent = g.valence(v) as i64 - 1;
        result *= pow_int(&(rat(-k) * fp.lambda(v)), exponent)?;
    }
    Ok(result)
}

/// Product of psi classes, mark `i` raised to `exponents[i]`.
///
/// Factors over the vertices: a vertex with moduli contributes the
/// normalized descendant integral against the inverse flag sum, an
/// unstable vertex with one edge and one mark contributes a pure power of
/// minus the flag weight.
pub fn psi_value(fp: &FixedPoint, exponents: &[u64]) -> Result<Rat> {
    let g = fp.graph();
    let mut result = rat(1);

    for v in 0..g.num_vertices() {
        let local: Vec<u64> = g
            .marks_at(v)
            .iter()
            .map(|&mark| exponents[mark])
            .filter(|&a| a > 0)
            .collect();
        let total: u64 = local.iter().sum();
        if total == 0 {
            continue;
        }

        let s = g.special_points(v) as u64;
        if s >= 3 {
            let dimension = s - 3;
            if total > dimension {
                return Ok(Rat::zero());
            }
            let mut coefficient = factorial(dimension);
            coefficient /= factorial(dimension - total);
            for &a in &local {
                coefficient /= factorial(a);
            }
            let sum = fp.flag_inverse_sum(v)?;
            result *= rat_of(coefficient) * pow_int(&sum, -(total as i64))?;
        } else {
            // One edge, one mark.
            let (edge_id, _) = fp.graph().flags(v)[0];
            result *= pow_int(&(-fp.omega(v, edge_id)), total as i64)?;
        }
    }
    Ok(result)
}

/// Row `n` of the unsigned Stirling numbers of the first kind,
/// `c(n, 0..=n)`, from `c(n+1, k) = c(n, k-1) + n c(n, k)`.
fn stirling_first_unsigned_row(n: u64) -> Vec<BigInt> {
    let mut row = vec![BigInt::one()];
    for i in 0..n {
        let mut next = vec![BigInt::zero(); row.len() + 1];
        for (k, value) in row.iter().enumerate() {
            next[k + 1] += value;
            next[k] += BigInt::from(i) * value;
        }
        row = next;
    }
    row
}

/// Euler class of the jet bundle of order `p` of the pullback of the
/// `q`-th power of the hyperplane bundle, evaluated against the first
/// mark.
pub fn jet_value(fp: &FixedPoint, p: i64, q: i64) -> Result<Rat> {
    let vertex = fp.graph().marks()[0];
    let weight = rat(q) * fp.lambda(vertex);
    let row = stirling_first_unsigned_row(p as u64 + 1);

    let mut result = Rat::zero();
    for k in 1..=(p as u64 + 1) {
        result += rat_of(row[k as usize].clone())
            * pow_int(&weight, k as i64)?
            * fp.psi_power(vertex, p as u64 + 1 - k)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abel_core::weights::TorusWeights;
    use abel_graphs::enumerate::enumerate_graphs;
    use abel_graphs::graph::StableGraph;

    fn single_edge() -> StableGraph {
        enumerate_graphs(1, 0).unwrap().into_iter().next().unwrap()
    }

    fn weights_13() -> TorusWeights {
        TorusWeights::from_values(vec![rat(1), rat(3)]).unwrap()
    }

    #[test]
    fn test_incidency_codim_one_is_degree() {
        let w = weights_13();
        for g in enumerate_graphs(3, 0).unwrap() {
            // Any proper coloration will do for this identity; alternate
            // colors along the dfs order.
            let mut colors = vec![0u8; g.num_vertices()];
            for &(v, parent) in &g.dfs_order() {
                colors[v] = match parent {
                    None => 0,
                    Some(p) => 1 - colors[p],
                };
            }
            let fp = FixedPoint::new(&g, &colors, &w).unwrap();
            assert_eq!(incidency_value(&fp, 1).unwrap(), rat(3));
        }
    }

    #[test]
    fn test_incidency_codim_two() {
        let g = single_edge();
        let w = weights_13();
        let fp = FixedPoint::new(&g, &[0, 1], &w).unwrap();
        // d (l0 + l1) for r = 2.
        assert_eq!(incidency_value(&fp, 2).unwrap(), rat(4));
    }

    #[test]
    fn test_hypersurface_on_a_line() {
        let g = single_edge();
        let w = weights_13();
        let fp = FixedPoint::new(&g, &[0, 1], &w).unwrap();
        // Product of (alpha l0 + beta l1) over alpha + beta = 2:
        // 2*3 * (1+3) * 2*1 = 48.
        assert_eq!(hypersurface_value(&fp, 2).unwrap(), rat(48));
    }

    #[test]
    fn test_contact_and_r1_on_a_line() {
        let g = single_edge();
        let w = weights_13();
        let fp = FixedPoint::new(&g, &[0, 1], &w).unwrap();
        // Contact: interior term l0 + l1 = 4.
        assert_eq!(contact_value(&fp).unwrap(), rat(4));
        // R1(1): empty interior product.
        assert_eq!(r1_value(&fp, 1).unwrap(), rat(1));
        // R1(2): -(l0 + l1) = -4.
        assert_eq!(r1_value(&fp, 2).unwrap(), rat(-4));
    }

    #[test]
    fn test_psi_on_unstable_vertex() {
        let graphs = enumerate_graphs(1, 1).unwrap();
        let g = &graphs[0];
        let w = weights_13();
        let fp = FixedPoint::new(g, &[0, 1], &w).unwrap();
        let marked = g.marks()[0];
        let omega = fp.omega(marked, 0);
        assert_eq!(psi_value(&fp, &[1]).unwrap(), -omega.clone());
        assert_eq!(psi_value(&fp, &[3]).unwrap(), pow_int(&(-omega), 3).unwrap());
        assert_eq!(psi_value(&fp, &[0]).unwrap(), rat(1));
    }

    #[test]
    fn test_stirling_row() {
        // n = 4: 0, 6, 11, 6, 1.
        let row = stirling_first_unsigned_row(4);
        let expected: Vec<BigInt> =
            [0, 6, 11, 6, 1].iter().map(|&x| BigInt::from(x)).collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn test_o1_is_the_product_over_marks() {
        let w = weights_13();
        for g in enumerate_graphs(2, 2).unwrap() {
            let mut colors = vec![0u8; g.num_vertices()];
            for &(v, parent) in &g.dfs_order() {
                colors[v] = match parent {
                    None => 0,
                    Some(p) => 1 - colors[p],
                };
            }
            let fp = FixedPoint::new(&g, &colors, &w).unwrap();
            let product = o1_at_mark(&fp, 0) * o1_at_mark(&fp, 1);
            assert_eq!(o1_all(&fp), product);
        }
    }

    #[test]
    fn test_o1_reads_the_mark_vertex() {
        let graphs = enumerate_graphs(1, 1).unwrap();
        let g = &graphs[0];
        let w = weights_13();
        let fp = FixedPoint::new(g, &[0, 1], &w).unwrap();
        let expected = fp.lambda(g.marks()[0]).clone();
        assert_eq!(o1_at_mark(&fp, 0), expected);
        assert_eq!(o1_all(&fp), expected);
    }
}
