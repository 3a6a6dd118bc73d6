//! Error types for search setup and asynchronous completion.
//!
//! The search itself never fails: running out of states, a collector that is
//! done and cancellation are all normal outcomes (see
//! [`SearchOutcome`](crate::search::SearchOutcome)). Errors only arise at the
//! boundary, when a caller hands in an invalid budget or when a background
//! search disappears without reporting.

use thiserror::Error;

/// Errors raised at the edges of the search API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edit budget below zero was requested.
    #[error("edit distance must not be negative, got {0}")]
    NegativeDistance(i64),

    /// A background search ended without delivering its completion, which only
    /// happens if the worker panicked.
    #[error("search worker exited without signalling completion")]
    WorkerDisconnected,
}

/// A specialized `Result` type for search operations.
pub type Result<T> = std::result::Result<T, Error>;
