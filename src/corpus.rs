/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Link graphs from directories of hypertext documents.
//!
//! A _corpus_ is a directory containing HTML files. Each file whose name ends
//! in `.html` is a page named after the file, and the targets of its
//! `<a href="...">` anchors are its links. Only links to other pages of the
//! corpus are kept (see [`LinkGraph::from_links`]); subdirectories are not
//! visited.

use crate::graphs::link_graph::LinkGraph;
use anyhow::{ensure, Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

fn anchor_href() -> &'static Regex {
    static ANCHOR_HREF: OnceLock<Regex> = OnceLock::new();
    ANCHOR_HREF.get_or_init(|| {
        Regex::new(r#"<a\s+(?:[^>]*?)href="([^"]*)""#).expect("The anchor regex is valid")
    })
}

/// Returns the set of targets of the anchors in an HTML document.
///
/// # Examples
///
/// ```
/// use webrank::corpus::extract_links;
///
/// let links = extract_links(r#"<p><a class="x" href="2.html">two</a> <a href="3.html">three</a></p>"#);
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["2.html", "3.html"]);
/// ```
pub fn extract_links(html: &str) -> BTreeSet<String> {
    anchor_href()
        .captures_iter(html)
        .map(|captures| captures[1].to_owned())
        .collect()
}

/// Builds the link graph of the corpus in `dir`.
///
/// # Errors
///
/// Fails if the directory or one of its HTML files cannot be read, or if the
/// directory contains no HTML file.
pub fn crawl(dir: impl AsRef<Path>) -> Result<LinkGraph> {
    let dir = dir.as_ref();
    let mut pages = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Could not read the corpus directory {}", dir.display()))?
    {
        let entry =
            entry.with_context(|| format!("Could not list the corpus directory {}", dir.display()))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            log::debug!("Skipping {}: not a valid UTF-8 name", path.display());
            continue;
        };
        if !name.ends_with(".html") || !path.is_file() {
            log::debug!("Skipping {}", path.display());
            continue;
        }

        let html = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read page {}", path.display()))?;
        pages.push((name.to_owned(), extract_links(&html)));
    }

    ensure!(!pages.is_empty(), "No HTML pages in {}", dir.display());

    let graph = LinkGraph::from_links(pages);
    log::info!(
        "Crawled {} pages with {} links ({} dangling)",
        graph.num_pages(),
        graph.num_links(),
        graph.num_dangling()
    );
    Ok(graph)
}
