//! # abel-core
//!
//! Core types and errors for the ABEL localization engine.
//!
//! This crate defines the abstractions shared across all ABEL components:
//! - **Rational**: exact big-rational arithmetic helpers with guarded division
//! - **Weights**: deterministic torus-weight tuples
//! - **Dims**: moduli-space dimension formulas and supported bounds
//! - **Errors**: unified error handling with `AbelError`
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  abel-core   │  ← rationals / weights / errors
//! └──────────────┘
//!        ▲
//!   ┌────┴─────────────┐
//!   │                  │
//! ┌─▼────────────┐  ┌──▼───────────┐
//! │ abel-graphs  │  │ abel-classes │
//! └──────────────┘  └──────────────┘
//!        ▲                  ▲
//!        └────────┬─────────┘
//!                 │
//!         ┌───────▼──────┐
//!         │ abel-engine  │
//!         └──────────────┘
//! ```

pub mod dims;
pub mod errors;
pub mod rational;
pub mod weights;

// Re-export commonly used items
pub use dims::{moduli_dimension, validate_bounds, MAX_DEGREE, MAX_DIMENSION};
pub use errors::{AbelError, Result};
pub use rational::Rat;
pub use weights::TorusWeights;
