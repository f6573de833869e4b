//! Error types for ABEL.
//!
//! A single unified error enum is shared by every crate in the workspace so
//! that the integrator can distinguish fatal user errors from retriable
//! internal conditions.

use thiserror::Error;

/// Unified error type for all ABEL operations.
///
/// Provides structured, actionable error messages with context.
#[derive(Error, Debug)]
pub enum AbelError {
    /// A top-level argument (n, d, m) is outside the supported range.
    #[error("input out of range: {0}")]
    InputRange(String),

    /// An equivariant class was built with an argument outside its
    /// documented range (non-positive degree, out-of-range mark index, ...).
    #[error("invalid class argument: {0}")]
    ClassArgument(String),

    /// The class expression violates a composition rule (psi-class
    /// singleton, psi/jet exclusion, mismatched shapes or codimensions).
    #[error("class composition error: {0}")]
    Composition(String),

    /// A precomputed coloration table is required but missing, and
    /// fetching it was disabled or failed.
    #[error("coloration data unavailable for {vertices} vertices, n = {n}: {reason}")]
    DataUnavailable {
        vertices: usize,
        n: usize,
        reason: String,
    },

    /// The chosen torus weights produced a vanishing divisor somewhere in
    /// the localization sum. Retriable: the computation is repeated with
    /// the next candidate weight tuple.
    #[error("degenerate torus weights: {0}")]
    DegenerateWeights(String),

    /// Generic errors (fallback).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AbelError {
    /// Creates an input-range error.
    pub fn input_range(message: impl Into<String>) -> Self {
        AbelError::InputRange(message.into())
    }

    /// Creates a class-argument error.
    pub fn class_argument(message: impl Into<String>) -> Self {
        AbelError::ClassArgument(message.into())
    }

    /// Creates a class-composition error.
    pub fn composition(message: impl Into<String>) -> Self {
        AbelError::Composition(message.into())
    }

    /// Creates a data-unavailable error.
    pub fn data_unavailable(
        vertices: usize,
        n: usize,
        reason: impl Into<String>,
    ) -> Self {
        AbelError::DataUnavailable {
            vertices,
            n,
            reason: reason.into(),
        }
    }

    /// Creates a degenerate-weights error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        AbelError::DegenerateWeights(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AbelError::Internal(message.into())
    }

    /// Checks if this is a retriable error.
    ///
    /// Retriable errors trigger a rerun with a fresh torus-weight tuple.
    pub fn is_retriable(&self) -> bool {
        matches!(self, AbelError::DegenerateWeights(_))
    }
}

/// Result type alias for ABEL operations.
pub type Result<T> = std::result::Result<T, AbelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let range = AbelError::input_range("d must be between 1 and 13");
        assert!(matches!(range, AbelError::InputRange(_)));

        let arg = AbelError::class_argument("hypersurface degree must be positive");
        assert!(matches!(arg, AbelError::ClassArgument(_)));

        let data = AbelError::data_unavailable(9, 30, "fetch disabled");
        assert!(matches!(data, AbelError::DataUnavailable { .. }));
    }

    #[test]
    fn test_retriable_errors() {
        assert!(AbelError::degenerate("flag sum vanished").is_retriable());
        assert!(!AbelError::input_range("n too large").is_retriable());
        assert!(!AbelError::composition("psi used twice").is_retriable());
    }
}
