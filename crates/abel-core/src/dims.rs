//! Dimension bookkeeping for the moduli space of stable maps.

use crate::errors::{AbelError, Result};

/// Largest supported projective dimension.
pub const MAX_DIMENSION: i64 = 254;

/// Largest supported curve degree.
pub const MAX_DEGREE: i64 = 13;

/// Dimension of the moduli space of genus-zero, degree-`d` stable maps to
/// `P^n` with `m` marked points: `n + (n+1)d + m - 3`.
pub fn moduli_dimension(n: i64, d: i64, m: i64) -> i64 {
    n + (n + 1) * d + m - 3
}

/// Validates the supported argument ranges for a top-level computation.
pub fn validate_bounds(n: i64, d: i64, m: i64) -> Result<()> {
    if !(1..=MAX_DIMENSION).contains(&n) {
        return Err(AbelError::input_range(format!(
            "projective dimension n = {} must be between 1 and {}",
            n, MAX_DIMENSION
        )));
    }
    if !(1..=MAX_DEGREE).contains(&d) {
        return Err(AbelError::input_range(format!(
            "degree d = {} must be between 1 and {}",
            d, MAX_DEGREE
        )));
    }
    if m < 0 {
        return Err(AbelError::input_range(format!(
            "number of marks m = {} must be non-negative",
            m
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moduli_dimension() {
        assert_eq!(moduli_dimension(2, 2, 5), 10);
        assert_eq!(moduli_dimension(4, 1, 0), 6);
        assert_eq!(moduli_dimension(1, 1, 0), 0);
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(1, 1, 0).is_ok());
        assert!(validate_bounds(254, 13, 7).is_ok());
        assert!(validate_bounds(0, 1, 0).is_err());
        assert!(validate_bounds(255, 1, 0).is_err());
        assert!(validate_bounds(3, 0, 0).is_err());
        assert!(validate_bounds(3, 14, 0).is_err());
        assert!(validate_bounds(3, 1, -1).is_err());
    }
}
