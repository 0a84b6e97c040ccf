use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use tandem_io::{MatchArtifact, MatchWriter, TimestampReader};
use tandem_match::{
    delta_partitioned_timestamp_match, Delta, MatcherKind, Matching, TimestampSeries,
};

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Match source-sharing derivative timestamp series")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for partitioned matching (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Match two timestamp series and print or write the result
    Match {
        /// CSV file holding the first timestamp series
        series1: PathBuf,

        /// CSV file holding the second timestamp series
        series2: PathBuf,

        /// Maximum allowed difference between a matched pair
        #[arg(long)]
        delta: f64,

        /// Matching algorithm: popping-greedy, greedy, dynamic, hybrid,
        /// vertical, or delta-partitioned
        #[arg(long, default_value = "hybrid")]
        algorithm: String,

        /// Inner algorithm for delta-partitioned matching
        #[arg(long, default_value = "hybrid")]
        inner: String,

        /// Write the full matching as JSON to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run every algorithm on the same input and compare size and error
    Compare {
        /// CSV file holding the first timestamp series
        series1: PathBuf,

        /// CSV file holding the second timestamp series
        series2: PathBuf,

        /// Maximum allowed difference between a matched pair
        #[arg(long)]
        delta: f64,
    },
}

#[derive(Serialize)]
struct MatchSummary {
    algorithm: String,
    matched: usize,
    error: f64,
}

#[derive(Serialize)]
struct CompareOutput {
    series1_len: usize,
    series2_len: usize,
    delta: f64,
    results: Vec<MatchSummary>,
}

fn parse_matcher_kind(s: &str) -> Result<MatcherKind> {
    match s {
        "popping-greedy" => Ok(MatcherKind::PoppingGreedy),
        "greedy" => Ok(MatcherKind::Greedy),
        "dynamic" => Ok(MatcherKind::Dynamic),
        "hybrid" => Ok(MatcherKind::Hybrid),
        "vertical" => Ok(MatcherKind::VerticalAligned),
        other => anyhow::bail!(
            "unknown algorithm: {other} (expected popping-greedy, greedy, dynamic, hybrid, or vertical)"
        ),
    }
}

fn read_inputs(series1: &PathBuf, series2: &PathBuf) -> Result<(TimestampSeries, TimestampSeries)> {
    let a = TimestampReader::new(series1)
        .read()
        .context("failed to read first series")?;
    let b = TimestampReader::new(series2)
        .read()
        .context("failed to read second series")?;
    info!(series1_len = a.len(), series2_len = b.len(), "series loaded");
    Ok((a, b))
}

fn run_algorithm(
    name: &str,
    inner: &str,
    a: &TimestampSeries,
    b: &TimestampSeries,
    delta: Delta,
) -> Result<Matching> {
    if name == "delta-partitioned" {
        let inner_kind = parse_matcher_kind(inner)?;
        Ok(delta_partitioned_timestamp_match(
            a.as_view(),
            b.as_view(),
            delta,
            inner_kind,
        ))
    } else {
        let kind = parse_matcher_kind(name)?;
        Ok(kind.run(a.as_view(), b.as_view(), delta))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Match {
            series1,
            series2,
            delta,
            algorithm,
            inner,
            output,
        } => {
            let delta = Delta::new(delta).context("invalid delta")?;
            let (a, b) = read_inputs(&series1, &series2)?;

            let matching = run_algorithm(&algorithm, &inner, &a, &b, delta)?;
            info!(
                matched = matching.len(),
                error = matching.error(),
                "matching complete"
            );

            let artifact =
                MatchArtifact::new(&algorithm, delta.value(), a.len(), b.len(), &matching);
            if let Some(path) = output {
                MatchWriter::new(&path)
                    .write(&artifact)
                    .context("failed to write match artifact")?;
            } else {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            }
        }

        Command::Compare {
            series1,
            series2,
            delta,
        } => {
            let delta = Delta::new(delta).context("invalid delta")?;
            let (a, b) = read_inputs(&series1, &series2)?;

            let algorithms = [
                "popping-greedy",
                "greedy",
                "dynamic",
                "hybrid",
                "vertical",
                "delta-partitioned",
            ];
            let results = algorithms
                .iter()
                .map(|name| {
                    let matching = run_algorithm(name, "hybrid", &a, &b, delta)?;
                    Ok(MatchSummary {
                        algorithm: (*name).to_string(),
                        matched: matching.len(),
                        error: matching.error(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let output = CompareOutput {
                series1_len: a.len(),
                series2_len: b.len(),
                delta: delta.value(),
                results,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
