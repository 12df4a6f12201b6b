/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use webrank::corpus::{crawl, extract_links};
use webrank::prelude::*;

fn write_page(dir: &Path, name: &str, links: &[&str]) -> Result<()> {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<body>\n");
    for link in links {
        html.push_str(&format!("<a class=\"link\" href=\"{link}\">{link}</a>\n"));
    }
    html.push_str("</body>\n</html>\n");
    fs::write(dir.join(name), html)?;
    Ok(())
}

#[test]
fn test_extract_links() {
    let html = r#"
        <a href="1.html">one</a>
        <a
          id="x" href="2.html">two</a>
        <a href="1.html">one again</a>
        <link href="style.css">
        <area href="3.html">
    "#;
    let links = extract_links(html);
    assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["1.html", "2.html"]);
}

#[test]
fn test_crawl() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_page(dir.path(), "1.html", &["1.html", "2.html", "https://example.com/", "3.html"])?;
    write_page(dir.path(), "2.html", &["1.html"])?;
    write_page(dir.path(), "3.html", &[])?;
    // Not pages
    fs::write(dir.path().join("notes.txt"), r#"<a href="1.html">one</a>"#)?;
    fs::create_dir(dir.path().join("sub.html"))?;
    write_page(&dir.path().join("sub.html"), "4.html", &["1.html"])?;

    let g = crawl(dir.path())?;
    assert_eq!(g.pages().collect::<Vec<_>>(), vec!["1.html", "2.html", "3.html"]);
    assert_eq!(g.links("1.html").unwrap().collect::<Vec<_>>(), vec!["2.html", "3.html"]);
    assert_eq!(g.links("2.html").unwrap().collect::<Vec<_>>(), vec!["1.html"]);
    assert_eq!(g.links("3.html").unwrap().count(), 0);
    Ok(())
}

#[test]
fn test_crawl_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(crawl(dir.path()).is_err());
    fs::write(dir.path().join("readme.md"), "nothing to see")?;
    assert!(crawl(dir.path()).is_err());
    assert!(crawl(dir.path().join("missing")).is_err());
    Ok(())
}

#[test]
fn test_crawl_and_rank() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_page(dir.path(), "1.html", &["2.html"])?;
    write_page(dir.path(), "2.html", &["1.html", "3.html"])?;
    write_page(dir.path(), "3.html", &["2.html", "4.html"])?;
    write_page(dir.path(), "4.html", &["2.html"])?;

    let g = crawl(dir.path())?;
    let iterated = iterate_rank(&g, DEFAULT_DAMPING)?;
    assert!((iterated.sum() - 1.0).abs() < 1E-6);
    let top = iterated.by_rank();
    assert_eq!(top[0].0, "2.html");
    assert_eq!(top[3].0, "4.html");
    Ok(())
}
