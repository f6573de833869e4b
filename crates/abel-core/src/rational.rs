//! Exact-rational helpers.
//!
//! Every quantity in the localization sum is a `BigRational`; nothing in the
//! workspace ever rounds. The helpers here exist so that division and
//! negative powers are always guarded: a vanishing divisor is reported as a
//! retriable [`AbelError::DegenerateWeights`] instead of a panic.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::errors::{AbelError, Result};

/// Exact rational number used throughout the engine.
pub type Rat = BigRational;

/// A rational from a machine integer.
pub fn rat(value: i64) -> Rat {
    BigRational::from_integer(BigInt::from(value))
}

/// A rational fraction `num / den`. `den` must be non-zero.
pub fn rat_frac(num: i64, den: i64) -> Result<Rat> {
    if den == 0 {
        return Err(AbelError::internal("rational with zero denominator"));
    }
    Ok(BigRational::new(BigInt::from(num), BigInt::from(den)))
}

/// Multiplicative inverse, guarding against zero.
pub fn invert(value: &Rat) -> Result<Rat> {
    if value.is_zero() {
        return Err(AbelError::degenerate("division by a vanishing factor"));
    }
    Ok(value.recip())
}

/// Integer power with a guarded negative branch.
///
/// `0^0 = 1`; a negative exponent on zero is a degenerate-weights condition.
pub fn pow_int(base: &Rat, exponent: i64) -> Result<Rat> {
    if exponent == 0 {
        return Ok(Rat::one());
    }
    let positive = if exponent < 0 {
        invert(base)?
    } else {
        base.clone()
    };
    let mut result = Rat::one();
    for _ in 0..exponent.unsigned_abs() {
        result *= &positive;
    }
    Ok(result)
}

/// `k!` as a big integer.
pub fn factorial(k: u64) -> BigInt {
    let mut out = BigInt::one();
    for i in 2..=k {
        out *= BigInt::from(i);
    }
    out
}

/// Binomial coefficient `C(n, k)`; zero when `k > n`.
pub fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::zero();
    }
    let k = k.min(n - k);
    let mut out = BigInt::one();
    for i in 0..k {
        out *= BigInt::from(n - i);
        out /= BigInt::from(i + 1);
    }
    out
}

/// True if the rational is a (positive or negative) integer.
pub fn is_integer(value: &Rat) -> bool {
    value.denom().abs() == BigInt::one()
}
