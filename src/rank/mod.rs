/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank of a [`LinkGraph`].
//!
//! PageRank is the stationary distribution of a _random surfer_ that, at each
//! step, with probability α (the _damping factor_) follows a link of the
//! current page chosen uniformly at random, and with probability 1 − α jumps
//! to a page chosen uniformly at random among all pages. A dangling page
//! (i.e., a page without links) is treated as if it linked to every page,
//! itself included, so the surfer never gets stuck.
//!
//! Two estimators are available:
//! - [`sampling`] simulates the surfer with a [transition
//!   model](transition::transition) and counts visits; it is approximate, with
//!   an error of order 1/√*n* for *n* samples;
//! - [`iterative`] computes the fixed point of the PageRank recurrence with a
//!   synchronous (Jacobi) iteration, stopping when no page moves more than a
//!   given tolerance.
//!
//! Both return [`Ranks`], and both only borrow the graph, so they can be run
//! concurrently on the same [`LinkGraph`].

use crate::graphs::link_graph::LinkGraph;
use kahan::KahanSum;
use std::collections::BTreeMap;

pub mod iterative;
pub mod sampling;
pub mod transition;

/// The default damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;
/// The default number of samples of the [sampling](sampling) estimator.
pub const DEFAULT_SAMPLES: usize = 10_000;
/// The default tolerance of the [iterative](iterative) estimator.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Errors of the ranking functions.
///
/// A ranking function either returns a [`Ranks`] (or a
/// [`Distribution`](transition::Distribution)) satisfying all its invariants,
/// or one of these errors: partial results are never returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RankError {
    #[error("The graph has no pages")]
    EmptyGraph,
    #[error("Unknown page {0:?}")]
    UnknownPage(String),
    #[error("The damping factor must be in (0 . . 1), got {0}")]
    InvalidDamping(f64),
    #[error("The number of samples must be positive")]
    InvalidSamples,
    #[error("The tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    /// The iteration cap was hit before convergence.
    #[error("No convergence after {iterations} iterations (max delta: {max_delta})")]
    NotConverged { iterations: usize, max_delta: f64 },
    /// Serialized ranks that no ranking function could have produced.
    #[error("Malformed ranks: {0}")]
    MalformedRanks(String),
}

pub(crate) fn check_graph(graph: &LinkGraph) -> Result<(), RankError> {
    if graph.is_empty() {
        return Err(RankError::EmptyGraph);
    }
    Ok(())
}

pub(crate) fn check_damping(damping: f64) -> Result<(), RankError> {
    // Also rejects NaN
    if !(damping > 0.0 && damping < 1.0) {
        return Err(RankError::InvalidDamping(damping));
    }
    Ok(())
}

/// A rank value for each page of a graph.
///
/// Values are in [0 . . 1] and sum to one (modulo floating-point errors).
/// Iteration follows the index order of the originating [`LinkGraph`], that
/// is, the lexicographical order of page names.
///
/// With the `serde` feature, deserialization checks that page names are
/// sorted and unique, and that there is one value in [0 . . 1] per page.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RanksParts", into = "RanksParts")
)]
pub struct Ranks {
    pages: Box<[String]>,
    values: Box<[f64]>,
}

impl Ranks {
    pub(crate) fn new(graph: &LinkGraph, values: Box<[f64]>) -> Self {
        debug_assert_eq!(graph.num_pages(), values.len());
        Self {
            pages: graph.pages().map(str::to_owned).collect(),
            values,
        }
    }

    /// Returns the number of pages.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no pages.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the rank of a page, if the page exists.
    pub fn get(&self, page: &str) -> Option<f64> {
        self.pages
            .binary_search_by(|p| p.as_str().cmp(page))
            .ok()
            .map(|node| self.values[node])
    }

    /// Returns the rank values, indexed by page index.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates over pairs of page names and ranks.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, f64)> + '_ {
        self.pages
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Returns the sum of all ranks, computed with Kahan summation.
    pub fn sum(&self) -> f64 {
        let mut sum = KahanSum::<f64>::new();
        for &value in self.values.iter() {
            sum += value;
        }
        sum.sum()
    }

    /// Returns pairs of page names and ranks by decreasing rank; ties are
    /// broken by page name.
    pub fn by_rank(&self) -> Vec<(&str, f64)> {
        let mut sorted = self.iter().collect::<Vec<_>>();
        sorted.sort_by(|(p, x), (q, y)| y.total_cmp(x).then_with(|| p.cmp(q)));
        sorted
    }

    /// Returns the largest absolute difference between the ranks of the
    /// same page in `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two rankings are not about the same pages.
    pub fn max_distance(&self, other: &Ranks) -> f64 {
        assert_eq!(
            self.pages, other.pages,
            "The two rankings are about different pages"
        );
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

impl From<Ranks> for BTreeMap<String, f64> {
    fn from(ranks: Ranks) -> Self {
        ranks
            .pages
            .into_vec()
            .into_iter()
            .zip(ranks.values.into_vec())
            .collect()
    }
}

/// The serialized form of [`Ranks`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RanksParts {
    pages: Vec<String>,
    values: Vec<f64>,
}

#[cfg(feature = "serde")]
impl From<Ranks> for RanksParts {
    fn from(ranks: Ranks) -> Self {
        Self {
            pages: ranks.pages.into_vec(),
            values: ranks.values.into_vec(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RanksParts> for Ranks {
    type Error = RankError;

    fn try_from(parts: RanksParts) -> Result<Self, RankError> {
        let RanksParts { pages, values } = parts;
        if let Some(w) = pages.windows(2).find(|w| w[0] >= w[1]) {
            return Err(RankError::MalformedRanks(format!(
                "page names are not sorted and unique at {:?}",
                w[1]
            )));
        }
        if pages.len() != values.len() {
            return Err(RankError::MalformedRanks(format!(
                "{} pages but {} values",
                pages.len(),
                values.len()
            )));
        }
        // Also rejects NaN
        if let Some((page, value)) = pages
            .iter()
            .zip(values.iter())
            .find(|&(_, &value)| !(0.0..=1.0).contains(&value))
        {
            return Err(RankError::MalformedRanks(format!(
                "rank {value} of {page:?} is not in [0 . . 1]"
            )));
        }
        Ok(Self {
            pages: pages.into_boxed_slice(),
            values: values.into_boxed_slice(),
        })
    }
}

pub mod prelude {
    pub use super::iterative::{iterate_rank, IterativeRank};
    pub use super::sampling::{sample_rank, MonteCarlo};
    pub use super::transition::{transition, Distribution};
    pub use super::{RankError, Ranks};
    pub use super::{DEFAULT_DAMPING, DEFAULT_SAMPLES, DEFAULT_TOLERANCE};
}
