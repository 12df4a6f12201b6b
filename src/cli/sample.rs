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

pub const COMMAND_NAME: &str = "sample";

#[derive(Args, Debug)]
#[command(about = "Estimates the PageRank of the pages of a corpus with a random surfer.", long_about = None)]
pub struct CliArgs {
    /// The directory containing the HTML pages.
    pub corpus: PathBuf,

    #[clap(flatten)]
    pub damping: DampingArg,

    #[clap(flatten)]
    pub sampling: SamplingArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

pub fn cli(command: Command) -> Command {
    command.subcommand(CliArgs::augment_args(Command::new(COMMAND_NAME)).display_order(0))
}

pub fn main(submatches: &ArgMatches) -> Result<()> {
    with_stdout(|out| run(submatches, out))
}

pub fn run(submatches: &ArgMatches, out: impl Write) -> Result<()> {
    let args = CliArgs::from_arg_matches(submatches)?;
    let graph = crawl(&args.corpus)?;
    let ranks = run_sampling(submatches, &graph, args.damping.damping, &args.sampling)?;
    write_ranks(
        out,
        &format!(
            "PageRank Results from Sampling (n = {})",
            args.sampling.samples
        ),
        &ranks,
        &args.output,
    )
}
