//! CLI argument definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fuzzytrie")]
#[command(about = "Fuzzy lookups in a prefix tree using Damerau-Levenshtein distance")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find the keys closest to a query term
    Query {
        /// Query term
        term: String,

        /// Dataset file (one `key` or `key<TAB>value` per line)
        #[arg(short, long)]
        dict: PathBuf,

        /// Maximum edit distance
        #[arg(short = 'm', long, allow_negative_numbers = true)]
        max_distance: Option<i64>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the distance of every match
        #[arg(short = 's', long)]
        show_distances: bool,
    },

    /// Benchmark search latency with randomly corrupted keys
    Perf {
        /// Dataset file (one `key` or `key<TAB>value` per line)
        #[arg(short, long)]
        dict: PathBuf,

        /// Number of worker threads
        #[arg(short, long)]
        threads: Option<usize>,

        /// Results to collect per query
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Seed for typo generation (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Also check that every corrupted key finds its original
        #[arg(long)]
        verify: bool,
    },
}
