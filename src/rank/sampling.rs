/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Monte Carlo estimation of PageRank.
//!
//! The random surfer starts from a page chosen uniformly at random and
//! performs *n* − 1 steps following the [transition
//! model](super::transition). The rank of a page is the fraction of the *n*
//! visited pages (the starting one included) that were that page. As *n*
//! grows the estimate converges in probability to PageRank, with an error of
//! order 1/√*n*.
//!
//! The next page is drawn by inverting the cumulative distribution: we
//! compute the prefix sums of the transition probabilities and look for a
//! uniform draw in [0 . . total) by binary search.
//!
//! The source of randomness is passed explicitly, so seeding it (e.g., with
//! [`SmallRng::seed_from_u64`](rand::SeedableRng::seed_from_u64)) makes the
//! estimate reproducible.

use super::transition::fill_transition;
use super::{check_damping, check_graph, RankError, Ranks, DEFAULT_DAMPING, DEFAULT_SAMPLES};
use crate::graphs::link_graph::LinkGraph;
use dsi_progress_logger::{no_logging, ProgressLog};
use rand::Rng;

/// Estimates PageRank by sampling `samples` pages with a random surfer.
///
/// This is a shortcut for [`MonteCarlo`] with the given parameters.
///
/// # Errors
///
/// Fails if the graph is empty, if `damping` is not in (0 . . 1), or if
/// `samples` is zero.
pub fn sample_rank<R: Rng>(
    graph: &LinkGraph,
    damping: f64,
    samples: usize,
    rng: &mut R,
) -> Result<Ranks, RankError> {
    MonteCarlo::new(graph)
        .damping(damping)
        .samples(samples)
        .run(rng)
}

/// Estimates PageRank with a random surfer.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run). Parameters are checked when running, so that invalid
/// values are reported as [errors](RankError) rather than panics.
///
/// # Examples
///
/// ```
/// use rand::{rngs::SmallRng, SeedableRng};
/// use webrank::prelude::*;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a"])]);
/// let mut rng = SmallRng::seed_from_u64(0);
/// let ranks = MonteCarlo::new(&g).samples(1000).run(&mut rng)?;
///
/// assert!((ranks.sum() - 1.0).abs() < 1E-9);
/// # Ok::<(), webrank::rank::RankError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MonteCarlo<'a> {
    graph: &'a LinkGraph,
    damping: f64,
    samples: usize,
}

impl<'a> MonteCarlo<'a> {
    /// Creates a new estimator with [default damping](DEFAULT_DAMPING) and
    /// [default number of samples](DEFAULT_SAMPLES).
    pub fn new(graph: &'a LinkGraph) -> Self {
        Self {
            graph,
            damping: DEFAULT_DAMPING,
            samples: DEFAULT_SAMPLES,
        }
    }

    /// Sets the damping factor.
    pub fn damping(&mut self, damping: f64) -> &mut Self {
        self.damping = damping;
        self
    }

    /// Sets the number of samples, that is, the number of visited pages,
    /// including the starting one.
    pub fn samples(&mut self, samples: usize) -> &mut Self {
        self.samples = samples;
        self
    }

    /// Runs the random surfer.
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<Ranks, RankError> {
        self.run_with_logging(rng, no_logging![])
    }

    /// Runs the random surfer, logging progress on `pl`.
    ///
    /// Its options will be preserved, making thus possible to customize the
    /// logs.
    pub fn run_with_logging<R: Rng>(
        &self,
        rng: &mut R,
        pl: &mut impl ProgressLog,
    ) -> Result<Ranks, RankError> {
        check_graph(self.graph)?;
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(RankError::InvalidSamples);
        }

        log::info!("Damping: {}", self.damping);
        log::info!("Samples: {}", self.samples);

        let n = self.graph.num_pages();
        let mut visits = vec![0_usize; n];
        let mut cumulative = vec![0.0; n];

        pl.item_name("sample");
        pl.expected_updates(Some(self.samples));
        pl.start("Sampling pages...");

        let mut page = rng.random_range(0..n);
        visits[page] += 1;
        pl.light_update();

        for _ in 1..self.samples {
            fill_transition(self.graph, page, self.damping, &mut cumulative);
            prefix_sums(&mut cumulative);
            page = weighted_choice(&cumulative, rng);
            visits[page] += 1;
            pl.light_update();
        }

        pl.done();

        let inv_samples = 1.0 / self.samples as f64;
        Ok(Ranks::new(
            self.graph,
            visits
                .into_iter()
                .map(|count| count as f64 * inv_samples)
                .collect(),
        ))
    }
}

/// Replaces each value with the sum of the values up to it.
fn prefix_sums(values: &mut [f64]) {
    let mut acc = 0.0;
    for v in values.iter_mut() {
        acc += *v;
        *v = acc;
    }
}

/// Returns an index chosen with probability proportional to the
/// corresponding increment of `cumulative`, which must be nonempty and
/// nondecreasing.
fn weighted_choice<R: Rng>(cumulative: &[f64], rng: &mut R) -> usize {
    let total = cumulative[cumulative.len() - 1];
    let x = rng.random::<f64>() * total;
    // The first entry exceeding x; rounding might push x up to total
    cumulative
        .partition_point(|&c| c <= x)
        .min(cumulative.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_prefix_sums() {
        let mut v = [0.25, 0.5, 0.0, 0.25];
        prefix_sums(&mut v);
        assert_eq!(v, [0.25, 0.75, 0.75, 1.0]);
    }

    #[test]
    fn test_weighted_choice_skips_empty_slots() {
        let cumulative = [0.0, 0.5, 0.5, 1.0];
        let mut rng = SmallRng::seed_from_u64(0);
        let mut counts = [0; 4];
        for _ in 0..10_000 {
            counts[weighted_choice(&cumulative, &mut rng)] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert!((counts[1] as i64 - 5_000).abs() < 300, "{counts:?}");
    }
}
