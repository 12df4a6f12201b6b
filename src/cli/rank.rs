/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::cli::*;
use crate::corpus::crawl;
use anyhow::Result;
use clap::{ArgMatches, Args, Command, FromArgMatches};
use std::io::Write;
use std::path::PathBuf;

pub const COMMAND_NAME: &str = "rank";

#[derive(Args, Debug)]
#[command(about = "Ranks the pages of a corpus both by sampling and by iteration.", long_about = None)]
pub struct CliArgs {
    /// The directory containing the HTML pages.
    pub corpus: PathBuf,

    #[clap(flatten)]
    pub damping: DampingArg,

    #[clap(flatten)]
    pub sampling: SamplingArgs,

    #[clap(flatten)]
    pub iteration: IterationArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)).display_order(0))
}

pub fn main(submatches: &ArgMatches) -> Result<()> {
    with_stdout(|out| run(submatches, out))
}

/// Runs both estimators, writing their results on `out`.
pub fn run(submatches: &ArgMatches, mut out: impl Write) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;
    let graph = crawl(&args.corpus)?;
    let damping = args.damping.damping;

    // The two estimators only share the graph
    let (sampled, iterated) = rayon::join(
        || run_sampling(submatches, &graph, damping, &args.sampling),
        || run_iteration(submatches, &graph, damping, &args.iteration),
    );

    write_ranks(
        &mut out,
        &format!(
            "PageRank Results from Sampling (n = {})",
            args.sampling.samples
        ),
        &sampled?,
        &args.output,
    )?;
    write_ranks(
        &mut out,
        "PageRank Results from Iteration",
        &iterated?,
        &args.output,
    )
}
