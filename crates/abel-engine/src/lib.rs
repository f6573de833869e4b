//! # abel-engine
//!
//! The Atiyah-Bott integrator: enumerates the torus fixed loci, evaluates
//! the localized integrand at every fixed point across a rayon pool, and
//! assembles the exact rational intersection number. Degenerate torus
//! weights are detected mid-sum and the whole computation is retried with
//! the next candidate tuple.

pub mod integrator;
pub mod progress;

// Re-export commonly used items
pub use integrator::{
    atiyah_bott, graph_contribution, is_zero_cycle, ComputeOptions, ComputeOutcome, Integrator,
    Value,
};
pub use progress::{LogProgress, NullProgress, ProgressSink};
