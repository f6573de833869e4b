//! Torus weight tuples.
//!
//! The localization formula is evaluated with respect to an `(n+1)`-tuple of
//! rational weights, one per fixed point of the torus action on projective
//! space. The final invariant is independent of the tuple as long as no
//! intermediate divisor vanishes, so candidate tuples are drawn from a
//! seeded generator and the integrator retries with the next tuple whenever
//! a vanishing divisor is detected.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::{AbelError, Result};
use crate::rational::{rat, Rat};

/// Base seed for the candidate generator; the attempt index is added so
/// successive retries are deterministic but distinct.
const WEIGHT_SEED: u64 = 0x00ab_e100;

/// An immutable tuple of `n + 1` pairwise distinct positive torus weights.
#[derive(Debug, Clone)]
pub struct TorusWeights {
    values: Vec<Rat>,
}

impl TorusWeights {
    /// Builds a tuple from explicit values. All entries must be positive
    /// and pairwise distinct.
    pub fn from_values(values: Vec<Rat>) -> Result<Self> {
        if values.len() < 2 {
            return Err(AbelError::input_range(
                "torus weights require at least two fixed points",
            ));
        }
        for (i, a) in values.iter().enumerate() {
            if *a <= rat(0) {
                return Err(AbelError::input_range(format!(
                    "torus weight {} is not positive",
                    i
                )));
            }
            for b in values.iter().skip(i + 1) {
                if a == b {
                    return Err(AbelError::input_range(
                        "torus weights must be pairwise distinct",
                    ));
                }
            }
        }
        Ok(TorusWeights { values })
    }

    /// Deterministic candidate tuple number `attempt` for projective
    /// dimension `n`.
    pub fn candidate(n: usize, attempt: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(WEIGHT_SEED.wrapping_add(attempt));
        let mut seen = HashSet::new();
        let mut values = Vec::with_capacity(n + 1);
        while values.len() < n + 1 {
            let v: i64 = rng.gen_range(1..(1i64 << 31));
            if seen.insert(v) {
                values.push(rat(v));
            }
        }
        TorusWeights { values }
    }

    /// Weight of the fixed point carrying `color`.
    pub fn lambda(&self, color: u8) -> &Rat {
        &self.values[color as usize]
    }

    /// The projective dimension `n` (one less than the tuple length).
    pub fn dimension(&self) -> usize {
        self.values.len() - 1
    }

    /// All weights, in fixed-point order.
    pub fn values(&self) -> &[Rat] {
        &self.values
    }
}
