/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The transition model of the random surfer.
//!
//! If the surfer is on page *i* with effective link set *L* (the links of *i*,
//! or all pages if *i* is dangling), the probability of moving to page *j*
//! is
//!
//! > (1 − α) / *n*  +  [*j* ∈ *L*] α / |*L*|,
//!
//! where *n* is the number of pages and α is the damping factor.

use super::{check_damping, check_graph, RankError};
use crate::graphs::link_graph::LinkGraph;
use kahan::KahanSum;

/// A probability distribution over the pages of a graph.
///
/// Every page of the graph has a (possibly zero) probability, and
/// probabilities sum to one within 1E-9.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution<'a> {
    graph: &'a LinkGraph,
    probs: Box<[f64]>,
}

impl<'a> Distribution<'a> {
    /// Returns the probability of a page, if the page exists.
    pub fn get(&self, page: &str) -> Option<f64> {
        self.graph.page_index(page).map(|node| self.probs[node])
    }

    /// Returns the probabilities, indexed by page index.
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// Iterates over pairs of page names and probabilities.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a str, f64)> + '_ {
        self.graph.pages().zip(self.probs.iter().copied())
    }

    /// Returns the sum of all probabilities, computed with Kahan summation.
    pub fn sum(&self) -> f64 {
        let mut sum = KahanSum::<f64>::new();
        for &p in self.probs.iter() {
            sum += p;
        }
        sum.sum()
    }
}

/// Returns the distribution of the next page visited by the random surfer
/// standing on `page`.
///
/// # Errors
///
/// Fails if the graph is empty, if `page` is not a page of the graph, or if
/// `damping` is not in the open interval (0 . . 1).
///
/// # Examples
///
/// ```
/// use webrank::prelude::*;
///
/// let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])]);
/// let d = transition(&g, "a", 0.85)?;
/// assert!((d.get("a").unwrap() - 0.075).abs() < 1E-12);
/// assert!((d.get("b").unwrap() - 0.925).abs() < 1E-12);
/// # Ok::<(), webrank::rank::RankError>(())
/// ```
pub fn transition<'a>(
    graph: &'a LinkGraph,
    page: &str,
    damping: f64,
) -> Result<Distribution<'a>, RankError> {
    check_graph(graph)?;
    check_damping(damping)?;
    let node = graph
        .page_index(page)
        .ok_or_else(|| RankError::UnknownPage(page.to_owned()))?;
    let mut probs = vec![0.0; graph.num_pages()].into_boxed_slice();
    fill_transition(graph, node, damping, &mut probs);
    Ok(Distribution { graph, probs })
}

/// Writes into `probs` the transition distribution of `node`.
///
/// Parameters are not checked: the graph must be nonempty, `node` must be a
/// valid index, and `probs` must have one entry per page.
pub(crate) fn fill_transition(graph: &LinkGraph, node: usize, damping: f64, probs: &mut [f64]) {
    debug_assert_eq!(probs.len(), graph.num_pages());
    let inv_n = 1.0 / graph.num_pages() as f64;
    let jump = (1.0 - damping) * inv_n;

    if graph.is_dangling(node) {
        probs.fill(jump + damping * inv_n);
    } else {
        probs.fill(jump);
        let follow = damping / graph.outdegree(node) as f64;
        for succ in graph.successors(node) {
            probs[succ] += follow;
        }
    }
}
