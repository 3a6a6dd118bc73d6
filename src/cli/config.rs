//! JSON configuration with command-line overrides.

use crate::search::EditBudget;
use crate::workload::DEFAULT_ALPHABET;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings that are invalid regardless of the dataset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The benchmark needs at least one worker.
    #[error("at least one thread is required")]
    ZeroThreads,

    /// A result limit of zero would never report anything.
    #[error("result limit must be at least 1")]
    ZeroLimit,

    /// Typo generation needs letters to insert.
    #[error("alphabet must not be empty")]
    EmptyAlphabet,
}

/// User configuration, read from a JSON file.
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default max distance for `query`
    pub max_distance: usize,
    /// Default result limit for `query` (`None` for all matches)
    pub result_limit: Option<usize>,
    /// Print distances next to matches
    pub show_distances: bool,
    /// Worker threads for `perf`
    pub threads: usize,
    /// Results collected per query in `perf`
    pub perf_results: usize,
    /// Letters used to corrupt keys in `perf`
    pub alphabet: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_distance: 2,
            result_limit: Some(10),
            show_distances: false,
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            perf_results: 1,
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Merge with `query` options (CLI options take precedence).
    ///
    /// A negative distance is rejected here, before any search starts.
    pub fn merge_query_options(
        &self,
        max_distance: Option<i64>,
        limit: Option<usize>,
        show_distances: bool,
    ) -> Result<Self> {
        let max_distance = match max_distance {
            Some(distance) => EditBudget::try_from(distance)?.get(),
            None => self.max_distance,
        };

        Ok(Config {
            max_distance,
            result_limit: limit.or(self.result_limit),
            show_distances: show_distances || self.show_distances,
            ..self.clone()
        })
    }

    /// Merge with `perf` options (CLI options take precedence).
    pub fn merge_perf_options(&self, threads: Option<usize>, max_results: Option<usize>) -> Self {
        Config {
            threads: threads.unwrap_or(self.threads),
            perf_results: max_results.unwrap_or(self.perf_results),
            ..self.clone()
        }
    }

    /// Check settings that no dataset could make valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.result_limit == Some(0) || self.perf_results == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(())
    }
}
