/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use webrank::prelude::*;

fn graphs() -> Vec<LinkGraph> {
    vec![
        LinkGraph::from_links([("a", Vec::<&str>::new())]),
        LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])]),
        LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])]),
        LinkGraph::from_links([
            ("1.html", vec!["2.html"]),
            ("2.html", vec!["1.html", "3.html"]),
            ("3.html", vec!["2.html", "4.html"]),
            ("4.html", vec!["2.html"]),
            ("5.html", vec![]),
            ("6.html", vec!["1.html", "2.html", "3.html", "4.html", "5.html"]),
        ]),
    ]
}

#[test]
fn test_distribution_sums_to_one() -> Result<()> {
    for g in graphs() {
        for damping in [1E-6, 0.15, 0.5, 0.85, 0.999999] {
            for page in g.pages() {
                let d = transition(&g, page, damping)?;
                assert_eq!(d.iter().len(), g.num_pages());
                assert!(d.as_slice().iter().all(|&p| p >= 0.0));
                assert!(
                    (d.sum() - 1.0).abs() < 1E-9,
                    "page {page}, damping {damping}: sum {}",
                    d.sum()
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_follows_links() -> Result<()> {
    let g = LinkGraph::from_links([("a", vec!["b", "c"]), ("b", vec!["a"]), ("c", vec!["a"]), ("d", vec!["a"])]);
    let d = transition(&g, "a", 0.8)?;
    assert!((d.get("a").unwrap() - 0.05).abs() < 1E-12);
    assert!((d.get("b").unwrap() - 0.45).abs() < 1E-12);
    assert!((d.get("c").unwrap() - 0.45).abs() < 1E-12);
    assert!((d.get("d").unwrap() - 0.05).abs() < 1E-12);
    assert_eq!(d.get("e"), None);
    Ok(())
}

#[test]
fn test_dangling_fallback_is_uniform() -> Result<()> {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![]), ("c", vec!["b"]), ("d", vec!["a"])]);
    for damping in [0.1, 0.85] {
        let d = transition(&g, "b", damping)?;
        // (1 - damping) / 4 for the jump, damping / 4 for the virtual links
        for (page, p) in d.iter() {
            assert!((p - 0.25).abs() < 1E-12, "{page}: {p}");
        }
    }
    Ok(())
}

#[test]
fn test_invalid_parameters() {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![])]);
    assert_eq!(
        transition(&g, "c", 0.85).unwrap_err(),
        RankError::UnknownPage("c".to_owned())
    );
    for damping in [0.0, 1.0, -0.5, 1.5] {
        assert_eq!(
            transition(&g, "a", damping).unwrap_err(),
            RankError::InvalidDamping(damping)
        );
    }
    assert!(matches!(
        transition(&g, "a", f64::NAN),
        Err(RankError::InvalidDamping(_))
    ));
    assert_eq!(
        transition(&LinkGraph::default(), "a", 0.85).unwrap_err(),
        RankError::EmptyGraph
    );
}
