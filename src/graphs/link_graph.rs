/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Inconsistencies found when rebuilding a [`LinkGraph`] from its parts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Page names are not sorted and unique at {0:?}")]
    UnsortedPages(String),
    #[error("There are {pages} pages but {succ} successor sets")]
    LengthMismatch { pages: usize, succ: usize },
    #[error("Page {page:?} links to nonexistent node {target}")]
    UnknownTarget { page: String, target: usize },
    #[error("Page {0:?} links to itself but not to every page")]
    SelfLink(String),
}

/// An immutable link graph whose nodes are named pages.
///
/// Pages are identified by strings, but internally each page has a dense
/// index in [0 . . *n*), assigned in lexicographical order of the names. All
/// methods working on nodes use such indices; use
/// [`page_index`](Self::page_index) and [`page_name`](Self::page_name) to move
/// between the two representations.
///
/// The graph is built once by [`from_links`](Self::from_links), which
/// normalizes the input:
/// - links to pages that are not part of the graph are dropped;
/// - self-links are dropped;
/// - duplicate links collapse.
///
/// Pages without outbound links are called _dangling_. Ranking algorithms
/// treat a dangling page as if it linked to every page of the graph, itself
/// included; [`with_dangling_patched`](Self::with_dangling_patched) makes
/// this rewrite explicit.
///
/// With the `serde` feature, a graph is serialized as its sorted page names
/// and successor sets; deserialization checks that these describe a graph
/// that could have been built by [`from_links`](Self::from_links), possibly
/// followed by [`with_dangling_patched`](Self::with_dangling_patched).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "LinkGraphParts", into = "LinkGraphParts")
)]
pub struct LinkGraph {
    /// The number of links in the graph.
    number_of_links: usize,
    /// Page names, sorted.
    names: Box<[String]>,
    /// Maps each page name to its index.
    index: HashMap<String, usize>,
    /// For each page, the indices of the pages it links to.
    succ: Box<[BTreeSet<usize>]>,
}

impl Default for LinkGraph {
    fn default() -> Self {
        Self::from_links(std::iter::empty::<(String, Vec<String>)>())
    }
}

impl LinkGraph {
    /// Creates a graph from pairs made of a page name and the names of the
    /// pages it links to.
    ///
    /// A page appearing more than once gets the union of its links. Link
    /// targets that do not appear as a page, and links from a page to itself,
    /// are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use webrank::graphs::link_graph::LinkGraph;
    ///
    /// let g = LinkGraph::from_links([
    ///     ("1.html", vec!["2.html", "1.html", "elsewhere.html"]),
    ///     ("2.html", vec![]),
    /// ]);
    /// assert_eq!(g.num_pages(), 2);
    /// assert_eq!(g.num_links(), 1);
    /// assert!(g.is_dangling(g.page_index("2.html").unwrap()));
    /// ```
    pub fn from_links<I, P, L, T>(pages: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut raw: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (page, links) in pages {
            raw.entry(page.into())
                .or_default()
                .extend(links.into_iter().map(|link| link.as_ref().to_owned()));
        }

        let names: Box<[String]> = raw.keys().cloned().collect();
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(node, name)| (name.clone(), node))
            .collect();

        // BTreeMap iteration order matches the order of names
        let succ: Box<[BTreeSet<usize>]> = raw
            .into_values()
            .enumerate()
            .map(|(node, links)| {
                links
                    .iter()
                    .filter_map(|link| index.get(link.as_str()).copied())
                    .filter(|&target| target != node)
                    .collect()
            })
            .collect();

        Self {
            number_of_links: succ.iter().map(BTreeSet::len).sum(),
            names,
            index,
            succ,
        }
    }

    /// Returns the number of pages.
    #[inline(always)]
    pub fn num_pages(&self) -> usize {
        self.names.len()
    }

    /// Returns the number of links.
    #[inline(always)]
    pub fn num_links(&self) -> usize {
        self.number_of_links
    }

    /// Returns true if the graph has no pages.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the name of a page.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not smaller than the number of pages.
    pub fn page_name(&self, node: usize) -> &str {
        &self.names[node]
    }

    /// Returns the index of the page with the given name, if any.
    pub fn page_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the page names in index order.
    pub fn pages(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Returns the indices of the pages `node` links to, in increasing order.
    pub fn successors(&self, node: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.succ[node].iter().copied()
    }

    /// Returns the names of the pages the page `name` links to, or `None` if
    /// there is no such page.
    pub fn links(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.page_index(name)
            .map(|node| self.successors(node).map(|succ| self.page_name(succ)))
    }

    /// Returns the number of outbound links of `node`.
    #[inline(always)]
    pub fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }

    /// Returns true if `node` has no outbound links.
    #[inline(always)]
    pub fn is_dangling(&self, node: usize) -> bool {
        self.succ[node].is_empty()
    }

    /// Returns the number of dangling pages.
    pub fn num_dangling(&self) -> usize {
        self.succ.iter().filter(|succ| succ.is_empty()).count()
    }

    /// Returns a copy of this graph in which every dangling page links to
    /// every page, itself included.
    ///
    /// This is the only way to obtain a graph containing self-links. The
    /// rewrite is idempotent, as a patched graph has no dangling pages.
    pub fn with_dangling_patched(&self) -> Self {
        let all: BTreeSet<usize> = (0..self.num_pages()).collect();
        let succ: Box<[BTreeSet<usize>]> = self
            .succ
            .iter()
            .map(|succ| if succ.is_empty() { all.clone() } else { succ.clone() })
            .collect();
        Self {
            number_of_links: succ.iter().map(BTreeSet::len).sum(),
            names: self.names.clone(),
            index: self.index.clone(),
            succ,
        }
    }
}

/// The serialized form of a [`LinkGraph`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct LinkGraphParts {
    pages: Vec<String>,
    succ: Vec<BTreeSet<usize>>,
}

#[cfg(feature = "serde")]
impl From<LinkGraph> for LinkGraphParts {
    fn from(graph: LinkGraph) -> Self {
        Self {
            pages: graph.names.into_vec(),
            succ: graph.succ.into_vec(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<LinkGraphParts> for LinkGraph {
    type Error = GraphError;

    fn try_from(parts: LinkGraphParts) -> Result<Self, GraphError> {
        let LinkGraphParts { pages, succ } = parts;
        if let Some(w) = pages.windows(2).find(|w| w[0] >= w[1]) {
            return Err(GraphError::UnsortedPages(w[1].clone()));
        }
        if pages.len() != succ.len() {
            return Err(GraphError::LengthMismatch {
                pages: pages.len(),
                succ: succ.len(),
            });
        }
        let n = pages.len();
        for (node, links) in succ.iter().enumerate() {
            if let Some(&target) = links.range(n..).next() {
                return Err(GraphError::UnknownTarget {
                    page: pages[node].clone(),
                    target,
                });
            }
            // Only patched dangling pages link to themselves
            if links.contains(&node) && links.len() != n {
                return Err(GraphError::SelfLink(pages[node].clone()));
            }
        }

        let index = pages
            .iter()
            .enumerate()
            .map(|(node, name)| (name.clone(), node))
            .collect();
        Ok(Self {
            number_of_links: succ.iter().map(BTreeSet::len).sum(),
            names: pages.into_boxed_slice(),
            index,
            succ: succ.into_boxed_slice(),
        })
    }
}
