/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Jacobi PageRank.
//!
//! PageRank is the fixed point of the recurrence
//!
//! > *xₚ*⁽*ᵗ* ⁺ ¹⁾ = (1 − α) / *n*  +  α ∑_(*i* → *p*) *xᵢ*⁽*ᵗ*⁾ / *dᵢ*,
//!
//! where *dᵢ* is the outdegree of *i*, the sum ranges over the predecessors of
//! *p*, and dangling pages are considered as linking to every page (so they
//! are predecessors of every page, and their outdegree is *n*).
//!
//! # The Jacobi method
//!
//! Starting from the uniform vector, each _pass_ computes all new values from
//! a single snapshot of the previous ones, which are kept in a separate
//! buffer. This is the Jacobi method, as opposed to Gauss–Seidel, in which
//! updated values are used as soon as they are available.
//!
//! Instead of materializing the links of dangling pages, at each pass we
//! accumulate the _dangling rank_ (the rank of all dangling pages) and
//! spread α / *n* times it over all pages. The result is the same as
//! iterating on the graph returned by
//! [`with_dangling_patched`](LinkGraph::with_dangling_patched).
//!
//! # Stopping criteria
//!
//! After each full pass, the largest absolute change of a rank (the _max
//! delta_) is passed to two [predicates](preds): the computation converges
//! when the max delta is below a [tolerance](preds::MaxDelta), and fails
//! with [`RankError::NotConverged`] if the number of passes reaches a
//! [cap](preds::MaxIter). Since each pass is a contraction by α in ℓ₁
//! norm, the cap is never hit on reasonable inputs.

pub mod preds {
    //! Predicates implementing stopping conditions.
    //!
    //! The [iterative PageRank](super::IterativeRank) evaluates these
    //! predicates after each full pass: they evaluate to true if the
    //! computation should be stopped. You can combine the predicates using
    //! the `and` and `or` methods provided by the [`Predicate`] trait.
    //!
    //! # Examples
    //! ```
    //! use predicates::prelude::*;
    //! use webrank::rank::iterative::preds::{MaxDelta, MaxIter, PredParams};
    //!
    //! let predicate = MaxDelta::try_from(1E-3)?.or(MaxIter::from(100));
    //! assert!(predicate.eval(&PredParams { iteration: 100, max_delta: 1.0 }));
    //! assert!(predicate.eval(&PredParams { iteration: 3, max_delta: 1E-4 }));
    //! assert!(!predicate.eval(&PredParams { iteration: 3, max_delta: 1.0 }));
    //! # Ok::<(), webrank::rank::RankError>(())
    //! ```

    use crate::rank::{RankError, DEFAULT_TOLERANCE};
    use predicates::{reflection::PredicateReflection, Predicate};
    use std::fmt::Display;

    /// This structure is passed to stopping predicates to provide the
    /// information that is needed to evaluate them.
    #[derive(Debug, Clone, Copy)]
    pub struct PredParams {
        /// The number of completed passes.
        pub iteration: usize,
        /// The largest absolute change of a rank during the last pass.
        pub max_delta: f64,
    }

    /// Stops when the number of completed passes reaches the provided value.
    ///
    /// As the predicate is evaluated after each pass, a value of zero stops
    /// after the first pass.
    #[derive(Debug, Clone)]
    pub struct MaxIter {
        max_iter: usize,
    }

    impl MaxIter {
        pub const DEFAULT_MAX_ITER: usize = 10_000;
    }

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            MaxIter { max_iter }
        }
    }

    impl Default for MaxIter {
        fn default() -> Self {
            Self::from(Self::DEFAULT_MAX_ITER)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max iter: {})", self.max_iter))
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.iteration >= self.max_iter
        }
    }

    /// Stops when no rank changed by more than a given tolerance during the
    /// last pass.
    #[derive(Debug, Clone)]
    pub struct MaxDelta {
        tolerance: f64,
    }

    impl TryFrom<f64> for MaxDelta {
        type Error = RankError;
        fn try_from(tolerance: f64) -> Result<Self, RankError> {
            // Also rejects NaN
            if !(tolerance > 0.0) {
                return Err(RankError::InvalidTolerance(tolerance));
            }
            Ok(MaxDelta { tolerance })
        }
    }

    impl Default for MaxDelta {
        fn default() -> Self {
            MaxDelta {
                tolerance: DEFAULT_TOLERANCE,
            }
        }
    }

    impl Display for MaxDelta {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_fmt(format_args!("(max delta: {})", self.tolerance))
        }
    }

    impl PredicateReflection for MaxDelta {}

    impl Predicate<PredParams> for MaxDelta {
        fn eval(&self, pred_params: &PredParams) -> bool {
            pred_params.max_delta <= self.tolerance
        }
    }
}

use super::{check_damping, check_graph, RankError, Ranks, DEFAULT_DAMPING, DEFAULT_TOLERANCE};
use crate::graphs::link_graph::LinkGraph;
use dsi_progress_logger::{no_logging, ProgressLog};
use kahan::KahanSum;
use predicates::Predicate;

/// Computes PageRank by Jacobi iteration with the [default
/// tolerance](DEFAULT_TOLERANCE).
///
/// This is a shortcut for [`IterativeRank`] with the given damping factor.
///
/// # Errors
///
/// Fails if the graph is empty, if `damping` is not in (0 . . 1), or if
/// the computation does not converge within the [default
/// cap](preds::MaxIter::DEFAULT_MAX_ITER) on the number of passes.
pub fn iterate_rank(graph: &LinkGraph, damping: f64) -> Result<Ranks, RankError> {
    IterativeRank::new(graph).damping(damping).run()
}

/// Computes PageRank using a Jacobi iteration.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run), which returns the rank vector. After completion, the
/// number of passes and the last max delta are available via
/// [`iterations`](Self::iterations) and [`max_delta`](Self::max_delta).
///
/// # Examples
///
/// ```
/// use webrank::prelude::*;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])]);
/// let mut pr = IterativeRank::new(&g);
/// pr.damping(0.85).tolerance(1E-9);
/// let ranks = pr.run()?;
///
/// assert!(ranks.get("b").unwrap() > ranks.get("a").unwrap());
/// assert!((ranks.sum() - 1.0).abs() < 1E-9);
/// assert!(pr.max_delta() <= 1E-9);
/// # Ok::<(), webrank::rank::RankError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IterativeRank<'a> {
    graph: &'a LinkGraph,
    damping: f64,
    tolerance: f64,
    max_iter: usize,

    iteration: usize,
    max_delta: f64,
}

impl<'a> IterativeRank<'a> {
    /// Creates a new computation with [default damping](DEFAULT_DAMPING),
    /// [default tolerance](DEFAULT_TOLERANCE) and [default
    /// cap](preds::MaxIter::DEFAULT_MAX_ITER) on the number of passes.
    pub fn new(graph: &'a LinkGraph) -> Self {
        Self {
            graph,
            damping: DEFAULT_DAMPING,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: preds::MaxIter::DEFAULT_MAX_ITER,
            iteration: 0,
            max_delta: f64::INFINITY,
        }
    }

    /// Sets the damping factor.
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        self.damping = damping;
        self
    }

    /// Sets the tolerance: the computation stops after the first pass in
    /// which no rank changed by more than `tolerance`.
    pub fn tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of passes.
    ///
    /// The cap is checked against the number of completed passes after each
    /// pass, so at least one pass is always performed, and a cap of zero
    /// behaves as a cap of one.
    pub fn max_iter(&mut self, max_iter: usize) -> &mut Self {
        self.max_iter = max_iter;
        self
    }

    /// Returns the number of passes performed by the last call to
    /// [`run`](Self::run).
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the largest absolute change of a rank during the last pass.
    pub fn max_delta(&self) -> f64 {
        self.max_delta
    }

    /// Runs the computation until convergence.
    pub fn run(&mut self) -> Result<Ranks, RankError> {
        self.run_with_logging(no_logging![])
    }

    /// Runs the computation until convergence, logging passes on `pl`.
    ///
    /// Its options will be preserved, making thus possible to customize the
    /// logs.
    pub fn run_with_logging(&mut self, pl: &mut impl ProgressLog) -> Result<Ranks, RankError> {
        self.iteration = 0;
        self.max_delta = f64::INFINITY;

        check_graph(self.graph)?;
        check_damping(self.damping)?;
        let converged = preds::MaxDelta::try_from(self.tolerance)?;
        let exhausted = preds::MaxIter::from(self.max_iter);

        log::info!("Damping: {}", self.damping);
        log::info!("Stopping criterion: {} or fail at {}", converged, exhausted);

        let recurrence = Recurrence::new(self.graph, self.damping);
        log::info!("{} dangling pages", recurrence.dangling.len());

        let n = self.graph.num_pages();
        let mut rank = vec![1.0 / n as f64; n].into_boxed_slice();
        let mut next = vec![0.0; n].into_boxed_slice();

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!("Computing PageRank (damping={})...", self.damping));

        loop {
            self.max_delta = recurrence.pass(&rank, &mut next);
            std::mem::swap(&mut rank, &mut next);
            self.iteration += 1;

            log::debug!(
                "Iteration {}: max delta = {}",
                self.iteration,
                self.max_delta
            );
            pl.update_and_display();

            let pred_params = preds::PredParams {
                iteration: self.iteration,
                max_delta: self.max_delta,
            };
            if converged.eval(&pred_params) {
                break;
            }
            if exhausted.eval(&pred_params) {
                pl.done();
                log::warn!(
                    "No convergence after {} iterations (max delta: {})",
                    self.iteration,
                    self.max_delta
                );
                return Err(RankError::NotConverged {
                    iterations: self.iteration,
                    max_delta: self.max_delta,
                });
            }
        }

        pl.done();
        log::info!("Converged after {} iterations", self.iteration);

        Ok(Ranks::new(self.graph, rank))
    }
}

/// The PageRank recurrence of a graph, with precomputed predecessors.
struct Recurrence {
    damping: f64,
    /// For each page, the non-dangling pages linking to it.
    predecessors: Box<[Vec<usize>]>,
    /// The inverse of each outdegree, or zero for dangling pages.
    inv_outdegrees: Box<[f64]>,
    dangling: Box<[usize]>,
}

impl Recurrence {
    fn new(graph: &LinkGraph, damping: f64) -> Self {
        let n = graph.num_pages();
        let mut predecessors = vec![Vec::new(); n].into_boxed_slice();
        let mut inv_outdegrees = vec![0.0; n].into_boxed_slice();
        let mut dangling = Vec::new();

        for node in 0..n {
            if graph.is_dangling(node) {
                dangling.push(node);
                continue;
            }
            inv_outdegrees[node] = 1.0 / graph.outdegree(node) as f64;
            for succ in graph.successors(node) {
                predecessors[succ].push(node);
            }
        }

        Self {
            damping,
            predecessors,
            inv_outdegrees,
            dangling: dangling.into_boxed_slice(),
        }
    }

    /// Computes in `next` the values following `rank`, and returns the max
    /// delta.
    fn pass(&self, rank: &[f64], next: &mut [f64]) -> f64 {
        let inv_n = 1.0 / rank.len() as f64;

        let mut dangling_rank = KahanSum::<f64>::new();
        for &node in self.dangling.iter() {
            dangling_rank += rank[node];
        }
        let base = (1.0 - self.damping) * inv_n + self.damping * dangling_rank.sum() * inv_n;

        let mut max_delta = 0.0_f64;
        for (node, new_rank) in next.iter_mut().enumerate() {
            let mut sigma = KahanSum::<f64>::new();
            for &pred in &self.predecessors[node] {
                sigma += rank[pred] * self.inv_outdegrees[pred];
            }
            *new_rank = base + self.damping * sigma.sum();
            max_delta = max_delta.max((*new_rank - rank[node]).abs());
        }
        max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> LinkGraph {
        LinkGraph::from_links([("a", vec!["b"]), ("b", vec![]), ("c", vec!["a", "b"])])
    }

    #[test]
    fn test_one_more_pass_stays_within_tolerance() -> anyhow::Result<()> {
        let g = sink();
        for tolerance in [1E-2, 1E-3, 1E-6] {
            let mut pr = IterativeRank::new(&g);
            pr.tolerance(tolerance);
            let ranks = pr.run()?;

            let recurrence = Recurrence::new(&g, DEFAULT_DAMPING);
            let mut next = vec![0.0; g.num_pages()];
            let max_delta = recurrence.pass(ranks.values(), &mut next);
            assert!(max_delta <= tolerance, "{max_delta} > {tolerance}");
            assert!(max_delta <= pr.max_delta());
        }
        Ok(())
    }

    #[test]
    fn test_pass_preserves_mass() {
        let g = sink();
        let recurrence = Recurrence::new(&g, 0.5);
        let rank = [0.5, 0.25, 0.25];
        let mut next = [0.0; 3];
        recurrence.pass(&rank, &mut next);
        assert!((next.iter().sum::<f64>() - 1.0).abs() < 1E-12);
    }

    #[test]
    fn test_recurrence_skips_dangling_links() {
        let recurrence = Recurrence::new(&sink(), 0.85);
        assert_eq!(&*recurrence.dangling, &[1]);
        assert_eq!(recurrence.predecessors[0], vec![2]);
        assert_eq!(recurrence.predecessors[1], vec![0, 2]);
        assert!(recurrence.predecessors[2].is_empty());
        assert_eq!(&*recurrence.inv_outdegrees, &[1.0, 0.0, 0.5]);
    }
}
