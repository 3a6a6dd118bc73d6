//! Command-line front end for fuzzytrie.
//!
//! Loads a dataset into a [`PrefixTree`](crate::trie::PrefixTree) and either
//! answers a single query or runs a multi-threaded latency benchmark over
//! typo-corrupted keys.

pub mod args;
pub mod commands;
pub mod config;
pub mod loader;

pub use args::{Cli, Commands};
pub use config::{Config, ConfigError};
pub use loader::{load_dataset, Dataset, Entry, LoadError};
