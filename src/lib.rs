//! # fuzzytrie
//!
//! Approximate string matching over an in-memory prefix tree.
//!
//! Values are stored at the end of character chains in a
//! [`PrefixTree`](trie::PrefixTree). A query walks the tree best-first,
//! spending one unit of edit budget per substitution, insertion, deletion or
//! adjacent transposition (Damerau-Levenshtein), and reports every stored value
//! whose key lies within the budget. Matches reach the
//! [`ResultCollector`](collector::ResultCollector) in nondecreasing distance
//! order, so a collector that stops after `n` results holds the `n` closest
//! keys.
//!
//! ## Example
//!
//! ```rust
//! use fuzzytrie::prelude::*;
//!
//! let mut tree = PrefixTree::new();
//! for word in ["cat", "tat", "dog"] {
//!     tree.insert_with(word, word.to_string());
//! }
//!
//! let mut collector = ListCollector::with_limit(4);
//! search(&tree, "cat", 1, &mut collector);
//!
//! let found: Vec<_> = collector
//!     .results()
//!     .iter()
//!     .map(|m| (m.value.as_str(), m.distance))
//!     .collect();
//! assert_eq!(found, vec![("cat", 0), ("tat", 1)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collector;
pub mod distance;
pub mod error;
pub mod frontier;
pub mod search;
pub mod trie;
pub mod workload;

/// Command-line front end: dataset loader, configuration and subcommands
#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::collector::{CountCollector, ListCollector, Match, ResultCollector};
    pub use crate::error::Error;
    pub use crate::frontier::{PriorityFrontier, SearchState};
    pub use crate::search::{
        search, search_with_cancel, spawn_search, spawn_shared, CancellationToken, Completed,
        EditBudget, SearchOutcome, SearchStats, SearchTask,
    };
    pub use crate::trie::{NodeId, NodeRef, PrefixTree};
}
