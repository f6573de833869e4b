//! The Atiyah-Bott integrator.
//!
//! Computes an intersection number on the moduli space of genus-zero
//! stable maps as a sum of local contributions over the torus fixed loci:
//!
//! 1. validate the argument ranges and the class expression,
//! 2. compare the class codimension against the moduli dimension,
//! 3. enumerate the decorated trees for `(d, m)`,
//! 4. sum the per-graph contributions across a rayon pool,
//! 5. divide each contribution by the order of its stabilizer.
//!
//! The sum is evaluated at a concrete torus-weight tuple. When a tuple
//! turns out degenerate for some coloration the whole sum is repeated with
//! the next candidate tuple; the result itself does not depend on the
//! tuple.

use log::warn;
use num_traits::Zero;
use rayon::prelude::*;

use abel_classes::algebra::{
    check_arguments, check_psi_usage, codimension, evaluate, is_vector_valued, ClassExpr,
};
use abel_classes::context::FixedPoint;
use abel_classes::euler::euler_inverse;
use abel_core::dims::{moduli_dimension, validate_bounds};
use abel_core::errors::{AbelError, Result};
use abel_core::rational::{rat, Rat};
use abel_core::weights::TorusWeights;
use abel_graphs::colorations::colorations_for;
use abel_graphs::enumerate::enumerate_graphs;
use abel_graphs::graph::StableGraph;
use abel_graphs::store::ColorationStore;

use crate::progress::{NullProgress, ProgressSink};

pub use abel_classes::algebra::Value;

/// Knobs of a single computation.
#[derive(Debug, Clone)]
pub struct ComputeOptions {
    /// Verify that the class codimension equals the moduli dimension and
    /// bail out with [`ComputeOutcome::NotZeroCycle`] when it does not.
    /// With the check disabled the sum is evaluated anyway; the result is
    /// then weight-dependent and not an invariant.
    pub check_zero_cycle: bool,
    /// Ask the coloration store to fetch missing tables instead of
    /// failing.
    pub auto_fetch_data: bool,
    /// How many candidate weight tuples to try before giving up on
    /// degenerate-weight failures.
    pub max_weight_attempts: u64,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        ComputeOptions {
            check_zero_cycle: true,
            auto_fetch_data: true,
            max_weight_attempts: 8,
        }
    }
}

/// Outcome of a computation that passed all static checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputeOutcome {
    /// The intersection number(s).
    Value(Value),
    /// The class does not match the moduli dimension, so the integral is
    /// not a number.
    NotZeroCycle { codimension: i64, dimension: i64 },
}

static SILENT: NullProgress = NullProgress;

/// Configured entry point for localization computations.
pub struct Integrator<'a> {
    options: ComputeOptions,
    store: Option<&'a dyn ColorationStore>,
    progress: &'a dyn ProgressSink,
}

impl Default for Integrator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Integrator<'a> {
    pub fn new() -> Self {
        Integrator {
            options: ComputeOptions::default(),
            store: None,
            progress: &SILENT,
        }
    }

    pub fn with_options(mut self, options: ComputeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_store(mut self, store: &'a dyn ColorationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    /// Computes the integral of `class` over the moduli space of
    /// genus-zero, degree-`d` stable maps to `P^n` with `m` marks.
    pub fn integrate(
        &self,
        n: i64,
        d: i64,
        m: i64,
        class: &ClassExpr,
    ) -> Result<ComputeOutcome> {
        validate_bounds(n, d, m)?;
        let num_marks = m as usize;
        check_arguments(class, num_marks)?;
        check_psi_usage(class)?;

        let slots = codimension(class, d, num_marks)?;
        let dimension = moduli_dimension(n, d, m);
        let mut active = vec![true; slots.len()];
        if self.options.check_zero_cycle {
            for (i, &codim) in slots.iter().enumerate() {
                if codim != dimension {
                    warn!(
                        "slot {} has codimension {} on a {}-dimensional moduli space",
                        i, codim, dimension
                    );
                    active[i] = false;
                }
            }
            if active.iter().all(|a| !a) {
                return Ok(ComputeOutcome::NotZeroCycle {
                    codimension: slots[0],
                    dimension,
                });
            }
        }

        let graphs = enumerate_graphs(d as u32, num_marks)?;

        let mut last_failure: Option<AbelError> = None;
        for attempt in 0..self.options.max_weight_attempts {
            let weights = TorusWeights::candidate(n as usize, attempt);
            match self.sum_over_graphs(&graphs, n as usize, &weights, class, &active) {
                Ok(totals) => {
                    self.progress.finish();
                    let value = if is_vector_valued(class) {
                        Value::Vector(totals)
                    } else {
                        let single = totals.into_iter().next().ok_or_else(|| {
                            AbelError::internal("scalar computation produced no value")
                        })?;
                        Value::Scalar(single)
                    };
                    return Ok(ComputeOutcome::Value(value));
                }
                Err(e) if e.is_retriable() => {
                    warn!("weight tuple {} was degenerate: {}", attempt, e);
                    last_failure = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_failure
            .unwrap_or_else(|| AbelError::internal("no weight attempts were made")))
    }

    fn sum_over_graphs(
        &self,
        graphs: &[StableGraph],
        n: usize,
        weights: &TorusWeights,
        class: &ClassExpr,
        active: &[bool],
    ) -> Result<Vec<Rat>> {
        self.progress.begin(graphs.len());
        graphs
            .par_iter()
            .map(|graph| {
                let contribution = graph_contribution(
                    graph,
                    n,
                    weights,
                    class,
                    active,
                    self.store,
                    self.options.auto_fetch_data,
                );
                self.progress.graph_done();
                contribution
            })
            .try_reduce(
                || vec![Rat::zero(); active.len()],
                |mut acc, item| {
                    for (a, b) in acc.iter_mut().zip(item) {
                        *a += b;
                    }
                    Ok(acc)
                },
            )
    }
}

/// Contribution of a single decorated tree to the localization sum: the
/// class values times the inverse Euler class, summed over the proper
/// colorations and divided by the order of the stabilizer. One slot per
/// output of the class; inactive slots stay zero.
pub fn graph_contribution(
    graph: &StableGraph,
    n: usize,
    weights: &TorusWeights,
    class: &ClassExpr,
    active: &[bool],
    store: Option<&dyn ColorationStore>,
    auto_fetch: bool,
) -> Result<Vec<Rat>> {
    let mut subtotals = vec![Rat::zero(); active.len()];
    for coloring in colorations_for(graph, n, store, auto_fetch)? {
        let fp = FixedPoint::new(graph, &coloring, weights)?;
        let euler = euler_inverse(&fp)?;

        // A top-level vector is evaluated component by component so
        // inactive slots cost nothing; any other shape is evaluated once
        // and broadcast.
        match class {
            ClassExpr::Vector(components) => {
                for (i, component) in components.iter().enumerate() {
                    if !active[i] {
                        continue;
                    }
                    match evaluate(component, &fp)? {
                        Value::Scalar(v) => subtotals[i] += v * &euler,
                        Value::Vector(_) => {
                            return Err(AbelError::composition(
                                "vector components must be scalar-valued",
                            ));
                        }
                    }
                }
            }
            other => {
                let values = evaluate(other, &fp)?.into_slots(active.len());
                for (i, v) in values.into_iter().enumerate() {
                    if active[i] {
                        subtotals[i] += v * &euler;
                    }
                }
            }
        }
    }

    let stabilizer = rat((graph.aut_order() * graph.deck_order()) as i64);
    for subtotal in subtotals.iter_mut() {
        *subtotal /= &stabilizer;
    }
    Ok(subtotals)
}

/// Whether the integral of `class` over the moduli space for `(n, d, m)`
/// is a number: every output slot must have codimension equal to the
/// moduli dimension.
pub fn is_zero_cycle(n: i64, d: i64, m: i64, class: &ClassExpr) -> Result<bool> {
    validate_bounds(n, d, m)?;
    let num_marks = m as usize;
    check_arguments(class, num_marks)?;
    let dimension = moduli_dimension(n, d, m);
    Ok(codimension(class, d, num_marks)?
        .into_iter()
        .all(|codim| codim == dimension))
}

/// Runs a computation with the default options and no coloration store.
pub fn atiyah_bott(n: i64, d: i64, m: i64, class: &ClassExpr) -> Result<ComputeOutcome> {
    Integrator::new().integrate(n, d, m, class)
}
