/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use clap::Command;
use std::fs;
use std::path::Path;
use webrank::cli::{iterate, rank, sample, write_ranks, OutputArgs};
use webrank::prelude::*;

#[test]
fn test_write_ranks() -> Result<()> {
    let g = LinkGraph::from_links([("a.html", vec!["b.html"]), ("b.html", vec![])]);
    let ranks = IterativeRank::new(&g).tolerance(1E-10).run()?;

    let mut out = Vec::new();
    let output = OutputArgs {
        precision: 4,
        sort_by_rank: false,
    };
    write_ranks(&mut out, "PageRank Results from Iteration", &ranks, &output)?;
    assert_eq!(
        String::from_utf8(out)?,
        "PageRank Results from Iteration\n  a.html: 0.3509\n  b.html: 0.6491\n"
    );

    let mut out = Vec::new();
    let output = OutputArgs {
        precision: 2,
        sort_by_rank: true,
    };
    write_ranks(&mut out, "By rank", &ranks, &output)?;
    assert_eq!(String::from_utf8(out)?, "By rank\n  b.html: 0.65\n  a.html: 0.35\n");
    Ok(())
}

#[test]
fn test_main() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("1.html"), r#"<a href="2.html">2</a>"#)?;
    fs::write(dir.path().join("2.html"), r#"<a href="1.html">1</a>"#)?;
    let corpus = dir.path().to_string_lossy().into_owned();

    webrank::cli::main(["webrank", "iterate", corpus.as_str()])?;
    webrank::cli::main(["webrank", "sample", "-n", "500", "-s", "0", corpus.as_str()])?;
    webrank::cli::main(["webrank", "rank", "-d", "0.5", "-s", "1", "-t", "1E-6", corpus.as_str()])?;
    Ok(())
}

fn two_cycle_corpus(dir: &Path) -> Result<String> {
    fs::write(dir.join("1.html"), r#"<a href="2.html">2</a>"#)?;
    fs::write(dir.join("2.html"), r#"<a href="1.html">1</a>"#)?;
    Ok(dir.to_string_lossy().into_owned())
}

/// Runs a subcommand with the given arguments and returns its output.
fn run_command(
    cli: fn(Command) -> Command,
    run: fn(&clap::ArgMatches, &mut Vec<u8>) -> Result<()>,
    args: &[&str],
) -> Result<String> {
    let matches = cli(Command::new("webrank")).try_get_matches_from(args)?;
    let Some((_, submatches)) = matches.subcommand() else {
        anyhow::bail!("No subcommand in {args:?}");
    };
    let mut out = Vec::new();
    run(submatches, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_rank_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let corpus = two_cycle_corpus(dir.path())?;

    let output = run_command(
        rank::cli,
        |m, out| rank::run(m, out),
        &["webrank", "rank", "-n", "500", "-s", "0", "-t", "1E-9", &corpus],
    )?;
    let lines = output.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 6, "{output}");
    assert_eq!(lines[0], "PageRank Results from Sampling (n = 500)");
    assert!(lines[1].starts_with("  1.html: "), "{output}");
    assert!(lines[2].starts_with("  2.html: "), "{output}");
    let sampled = lines[1..3]
        .iter()
        .map(|line| line.rsplit(' ').next().unwrap_or("").parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    assert!((sampled.iter().sum::<f64>() - 1.0).abs() < 1E-3, "{output}");
    assert_eq!(
        &lines[3..],
        &[
            "PageRank Results from Iteration",
            "  1.html: 0.5000",
            "  2.html: 0.5000"
        ]
    );
    Ok(())
}

#[test]
fn test_sample_and_iterate_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let corpus = two_cycle_corpus(dir.path())?;

    let args = ["webrank", "sample", "-n", "1000", "-s", "42", "-p", "3", &corpus];
    let first = run_command(sample::cli, |m, out| sample::run(m, out), &args)?;
    let second = run_command(sample::cli, |m, out| sample::run(m, out), &args)?;
    assert_eq!(first, second);
    assert!(first.starts_with("PageRank Results from Sampling (n = 1000)\n  1.html: 0."));
    assert_eq!(first.lines().count(), 3);

    let output = run_command(
        iterate::cli,
        |m, out| iterate::run(m, out),
        &["webrank", "iterate", "--sort-by-rank", "-p", "2", &corpus],
    )?;
    assert_eq!(
        output,
        "PageRank Results from Iteration\n  1.html: 0.50\n  2.html: 0.50\n"
    );
    Ok(())
}
