/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! Each command is implemented as a submodule exposing a `COMMAND_NAME`, a
//! `cli` function adding the command to a [`Command`], and a `main` function
//! executing it.

use crate::graphs::link_graph::LinkGraph;
use crate::rank::iterative::preds::MaxIter;
use crate::rank::prelude::*;
use anyhow::{bail, ensure, Result};
use clap::{Arg, ArgMatches, Args, Command};
use dsi_progress_logger::prelude::*;
use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
use jiff::SpanRound;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{BufWriter, Write};
use std::time::{Duration, SystemTime};

pub mod iterate;
pub mod rank;
pub mod sample;

/// Shared CLI argument for the damping factor.
#[derive(Args, Debug)]
pub struct DampingArg {
    #[arg(short, long, value_parser = damping_factor, default_value_t = DEFAULT_DAMPING)]
    /// The damping factor, that is, the probability of following a link
    /// instead of jumping to a random page.
    pub damping: f64,
}

/// Shared CLI arguments for the sampling estimator.
#[derive(Args, Debug)]
pub struct SamplingArgs {
    #[arg(short = 'n', long, value_parser = num_samples, default_value_t = DEFAULT_SAMPLES)]
    /// The number of pages visited by the random surfer.
    pub samples: usize,

    #[arg(short, long)]
    /// The seed to use for the PRNG. If not specified, the PRNG is seeded
    /// from the operating system.
    pub seed: Option<u64>,
}

/// Shared CLI arguments for the iterative estimator.
#[derive(Args, Debug)]
pub struct IterationArgs {
    #[arg(short, long, value_parser = tolerance, default_value_t = DEFAULT_TOLERANCE)]
    /// Stop iterating when no rank changes by more than this value.
    pub tolerance: f64,

    #[arg(long, default_value_t = MaxIter::DEFAULT_MAX_ITER)]
    /// Fail if the iteration did not converge after this number of passes.
    pub max_iter: usize,
}

/// Shared CLI arguments for printing ranks.
#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short, long, default_value_t = 4)]
    /// The number of decimal digits of printed ranks.
    pub precision: usize,

    #[arg(long)]
    /// Print pages by decreasing rank instead of by name.
    pub sort_by_rank: bool,
}

/// Parses a damping factor, which must be in (0 . . 1).
pub fn damping_factor(arg: &str) -> Result<f64> {
    let damping = arg.trim().parse::<f64>()?;
    ensure!(
        damping > 0.0 && damping < 1.0,
        "the damping factor must be in (0 . . 1), got {damping}"
    );
    Ok(damping)
}

/// Parses a number of samples, which must be positive.
pub fn num_samples(arg: &str) -> Result<usize> {
    let samples = arg.trim().replace('_', "").parse::<usize>()?;
    ensure!(samples > 0, "the number of samples must be positive");
    Ok(samples)
}

/// Parses a tolerance, which must be positive.
pub fn tolerance(arg: &str) -> Result<f64> {
    let tolerance = arg.trim().parse::<f64>()?;
    ensure!(tolerance > 0.0, "the tolerance must be positive, got {tolerance}");
    Ok(tolerance)
}

/// Parse a duration from a string.
/// If no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => bail!("Invalid duration suffix: {}", c),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Returns a progress logger honoring the global `log-interval` option.
fn progress_logger(submatches: &ArgMatches, item_name: &str) -> ProgressLogger {
    let mut pl = ProgressLogger::default();
    pl.item_name(item_name);
    if let Ok(Some(duration)) = submatches.try_get_one::<Duration>("log-interval") {
        pl.log_interval(*duration);
    }
    pl
}

/// Runs the sampling estimator as configured on the command line.
pub fn run_sampling(
    submatches: &ArgMatches,
    graph: &LinkGraph,
    damping: f64,
    args: &SamplingArgs,
) -> Result<Ranks> {
    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let mut pl = progress_logger(submatches, "sample");
    Ok(MonteCarlo::new(graph)
        .damping(damping)
        .samples(args.samples)
        .run_with_logging(&mut rng, &mut pl)?)
}

/// Runs the iterative estimator as configured on the command line.
pub fn run_iteration(
    submatches: &ArgMatches,
    graph: &LinkGraph,
    damping: f64,
    args: &IterationArgs,
) -> Result<Ranks> {
    let mut pl = progress_logger(submatches, "iteration");
    Ok(IterativeRank::new(graph)
        .damping(damping)
        .tolerance(args.tolerance)
        .max_iter(args.max_iter)
        .run_with_logging(&mut pl)?)
}

/// Writes a title followed by one indented `page: rank` line per page.
pub fn write_ranks(
    mut out: impl Write,
    title: &str,
    ranks: &Ranks,
    output: &OutputArgs,
) -> Result<()> {
    let lines = if output.sort_by_rank {
        ranks.by_rank()
    } else {
        ranks.iter().collect()
    };
    writeln!(out, "{title}")?;
    for (page, rank) in lines {
        writeln!(out, "  {page}: {rank:.prec$}", prec = output.precision)?;
    }
    Ok(())
}

/// Runs `run` on a buffered standard output.
fn with_stdout(run: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    let mut out = BufWriter::new(std::io::stdout().lock());
    run(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Formats a duration compactly, e.g., `1m3s250ms`.
fn format_elapsed(elapsed: Duration) -> String {
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();
    let span = jiff::Span::new()
        .seconds(elapsed.as_secs() as i64)
        .milliseconds(elapsed.subsec_millis() as i64);
    let span = span.round(span_round).unwrap_or(span);
    printer.span_to_string(&span)
}

pub fn init_envlogger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            format_elapsed(start.elapsed()),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

/// The entry point of the command-line interface.
pub fn main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();

    let command = Command::new("webrank")
        .about("Ranks the pages of a corpus of HTML files using PageRank.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-interval")
                .short('l')
                .long("log-interval")
                .value_parser(parse_duration)
                .help(
                    "How often to log progress. Default is 10s. You can use the suffixes `s` for seconds, `m` for minutes, `h` for hours, and `d` for days. If no suffix is provided it is assumed to be in milliseconds.",)
                .global(true),
        )
        .after_help(
            "Environment (noteworthy environment variables used):
RUST_LOG: configuration for env_logger, pass `info` to see the parameters and
  the progress of the computations, and `debug` to see the maximum change of
  each iteration. You can also use `RUST_LOG=webrank=debug` to see only the
  webrank logs.
",
        );

    macro_rules! impl_dispatch {
        ($command:expr, $($module:ident),*) => {{
            let command = $command;
            $(
                let command = $module::cli(command);
            )*
            let command = command.display_order(0); // sort args alphabetically
            let mut help_command = command.clone();
            let matches = command.get_matches_from(args);

            match matches.subcommand() {
                $(
                    Some(($module::COMMAND_NAME, sub_m)) => $module::main(sub_m),
                )*
                Some((command_name, _)) => {
                    // this shouldn't happen as clap should catch this
                    eprintln!("Unknown command: {:?}", command_name);
                    help_command.print_help()?;
                    std::process::exit(1);
                }
                // if no command is specified, print the help message
                None => {
                    help_command.print_help()?;
                    return Ok(());
                }
            }
        }};
    }

    impl_dispatch!(command, iterate, rank, sample)?;

    log::info!("The command took {}", format_elapsed(start.elapsed()));

    Ok(())
}
