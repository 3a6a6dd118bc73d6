//! fuzzytrie - Fuzzy lookups over a prefix tree
//!
//! Answers single queries against a dataset and benchmarks the search with
//! generated typos.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use fuzzytrie::cli::commands;
use fuzzytrie::cli::{Cli, Commands, Config};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,fuzzytrie=info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Query {
            term,
            dict,
            max_distance,
            limit,
            show_distances,
        } => {
            let config = config.merge_query_options(max_distance, limit, show_distances)?;
            config.validate()?;

            let dataset = commands::load(&dict)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            commands::run_query(&dataset, &term, &config, &mut out)?;
            out.flush().context("Failed to write results")?;
        }
        Commands::Perf {
            dict,
            threads,
            max_results,
            seed,
            verify,
        } => {
            let config = config.merge_perf_options(threads, max_results);
            config.validate()?;

            let dataset = commands::load(&dict)?;
            let seed = seed.unwrap_or_else(rand::random);
            let summary = commands::run_perf(&dataset, &config, seed, verify)?;
            summary
                .write_report(&mut io::stdout().lock())
                .context("Failed to write report")?;
        }
    }

    Ok(())
}
