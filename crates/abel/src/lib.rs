//! # ABEL
//!
//! Exact Gromov-Witten-type intersection numbers on the moduli space of
//! genus-zero stable maps to projective space, computed by Atiyah-Bott
//! localization with respect to the standard torus action. All arithmetic
//! is exact big-rational arithmetic; answers are numbers, not floats.
//!
//! ```
//! use abel::prelude::*;
//!
//! // 2875 lines on a quintic threefold.
//! let class = hypersurface(&[5]);
//! let outcome = atiyah_bott(4, 1, 0, &class).unwrap();
//! assert_eq!(outcome, ComputeOutcome::Value(Value::Scalar(rat(2875))));
//! ```

pub use abel_classes as classes;
pub use abel_engine as engine;
pub use abel_graphs as graphs;

pub use abel_core::dims::{moduli_dimension, MAX_DEGREE, MAX_DIMENSION};
pub use abel_core::errors::{AbelError, Result};
pub use abel_core::rational::Rat;
pub use abel_core::weights::TorusWeights;

/// Everything needed for a typical computation.
pub mod prelude {
    pub use abel_classes::algebra::{
        contact, hypersurface, incidency, jet, o1, o1_i, psi, r1, scalar, vector, ClassExpr,
        Value,
    };
    pub use abel_core::dims::moduli_dimension;
    pub use abel_core::errors::{AbelError, Result};
    pub use abel_core::rational::{rat, rat_frac, Rat};
    pub use abel_core::weights::TorusWeights;
    pub use abel_engine::integrator::{
        atiyah_bott, is_zero_cycle, ComputeOptions, ComputeOutcome, Integrator,
    };
    pub use abel_engine::progress::{LogProgress, NullProgress, ProgressSink};
    pub use abel_graphs::enumerate::enumerate_graphs;
    pub use abel_graphs::store::{ColorationStore, MemoryColorationStore};
}
