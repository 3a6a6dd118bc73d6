//! Best-first Damerau-Levenshtein search over a [`PrefixTree`].
//!
//! A search walks the tree and the query together. Each [`SearchState`]
//! records how much of the query has been read, the current tree node and
//! the edit budget left. Popping a state from the [`PriorityFrontier`] expands
//! it into successors:
//!
//! | Operation     | Requires              | Successor                       |
//! |---------------|-----------------------|---------------------------------|
//! | substitution  | `b > 0`, `p < n`      | `(p + 1, child ≠ query[p], b - 1)` |
//! | insertion     | `b > 0`, `p < n`      | `(p + 1, node, b - 1)`          |
//! | deletion      | `b > 0`               | `(p, any child, b - 1)`         |
//! | transposition | `b > 0`, `p + 1 < n`  | `(p + 2, node·q[p+1]·q[p], b - 1)` |
//! | exact step    | `p < n`               | `(p + 1, node·q[p], b)`         |
//!
//! A state with `p == n` on a node that holds a value is a match at distance
//! `max_distance - b`. The frontier pops larger budgets first, so the first
//! time a node is accepted is also its cheapest, and later acceptances of the
//! same node are skipped.
//!
//! # Example
//!
//! ```rust
//! use fuzzytrie::prelude::*;
//!
//! let mut tree = PrefixTree::new();
//! tree.insert_with("dog", "dog");
//!
//! for typo in ["dogg", "dgo", "dod"] {
//!     let mut collector = ListCollector::with_limit(1);
//!     let stats = search(&tree, typo, 1, &mut collector);
//!
//!     assert_eq!(collector.results()[0].distance, 1);
//!     assert_eq!(stats.outcome, SearchOutcome::CollectorDone);
//! }
//! ```

mod cancel;
mod task;

pub use cancel::CancellationToken;
pub use task::{spawn_search, spawn_shared, Completed, SearchTask};

use crate::collector::ResultCollector;
use crate::error::Error;
use crate::frontier::{PriorityFrontier, SearchState};
use crate::trie::{NodeId, PrefixTree};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

/// A validated, non-negative edit budget.
///
/// The search API takes `usize` budgets directly. `EditBudget` is the
/// conversion point for signed input coming from outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EditBudget(usize);

impl EditBudget {
    /// The budget as an edit count.
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for EditBudget {
    fn from(distance: usize) -> Self {
        EditBudget(distance)
    }
}

impl TryFrom<i64> for EditBudget {
    type Error = Error;

    fn try_from(distance: i64) -> Result<Self, Self::Error> {
        usize::try_from(distance)
            .map(EditBudget)
            .map_err(|_| Error::NegativeDistance(distance))
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// Every state within the budget was explored.
    Exhausted,
    /// The collector reported it was done.
    CollectorDone,
    /// Cancellation was observed.
    Cancelled,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchOutcome::Exhausted => "exhausted",
            SearchOutcome::CollectorDone => "collector-done",
            SearchOutcome::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Counters describing one finished search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Why the search stopped
    pub outcome: SearchOutcome,
    /// States taken off the frontier
    pub popped: usize,
    /// States added to the frontier, including the initial one
    pub pushed: usize,
    /// Matches handed to the collector
    pub matches: usize,
    /// Largest frontier size reached
    pub peak_frontier: usize,
}

/// Search `tree` for keys within `max_distance` edits of `query`.
///
/// Matches go to `collector` in nondecreasing distance order; each stored key
/// is reported at most once. Returns once the frontier is empty or the
/// collector is done. Pass `&mut collector` to inspect it afterwards.
pub fn search<'t, V, C>(
    tree: &'t PrefixTree<V>,
    query: &str,
    max_distance: usize,
    collector: C,
) -> SearchStats
where
    C: ResultCollector<'t, V>,
{
    Search::new(tree, query, max_distance).run(collector, None)
}

/// Like [`search`], but also stops when `token` is cancelled.
///
/// The token is checked once per state taken off the frontier. The call
/// blocks until the loop has observed one of its exit conditions.
pub fn search_with_cancel<'t, V, C>(
    tree: &'t PrefixTree<V>,
    query: &str,
    max_distance: usize,
    collector: C,
    token: &CancellationToken,
) -> SearchStats
where
    C: ResultCollector<'t, V>,
{
    Search::new(tree, query, max_distance).run(collector, Some(token))
}

struct Search<'t, V> {
    tree: &'t PrefixTree<V>,
    query: SmallVec<[char; 32]>,
    max_distance: usize,
    frontier: PriorityFrontier,
    reported: FxHashSet<NodeId>,
    popped: usize,
    pushed: usize,
    matches: usize,
    peak_frontier: usize,
}

impl<'t, V> Search<'t, V> {
    fn new(tree: &'t PrefixTree<V>, query: &str, max_distance: usize) -> Self {
        let query: SmallVec<[char; 32]> = query.chars().collect();
        Search {
            tree,
            frontier: PriorityFrontier::with_capacity(query.len() * 4 + 16),
            query,
            max_distance,
            reported: FxHashSet::default(),
            popped: 0,
            pushed: 0,
            matches: 0,
            peak_frontier: 0,
        }
    }

    fn run<C>(mut self, mut collector: C, token: Option<&CancellationToken>) -> SearchStats
    where
        C: ResultCollector<'t, V>,
    {
        self.push(SearchState::new(0, NodeId::ROOT, self.max_distance));

        let outcome = loop {
            let Some(state) = self.frontier.pop() else {
                break SearchOutcome::Exhausted;
            };
            self.popped += 1;

            if token.is_some_and(CancellationToken::is_cancelled) {
                break SearchOutcome::Cancelled;
            }
            if collector.is_done() {
                break SearchOutcome::CollectorDone;
            }

            self.expand(state, &mut collector);
        };

        let stats = SearchStats {
            outcome,
            popped: self.popped,
            pushed: self.pushed,
            matches: self.matches,
            peak_frontier: self.peak_frontier,
        };
        debug!(
            query_len = self.query.len(),
            max_distance = self.max_distance,
            popped = stats.popped,
            matches = stats.matches,
            peak_frontier = stats.peak_frontier,
            %outcome,
            "search finished"
        );
        stats
    }

    fn expand<C>(&mut self, state: SearchState, collector: &mut C)
    where
        C: ResultCollector<'t, V>,
    {
        let tree = self.tree;
        let SearchState {
            position,
            node,
            budget,
        } = state;
        let len = self.query.len();

        if budget > 0 {
            let next_budget = budget - 1;

            if position < len {
                let expected = self.query[position];

                // substitution: the tree has a different character here
                for (label, child) in tree.children(node) {
                    if label != expected {
                        self.push(SearchState::new(position + 1, child, next_budget));
                    }
                }

                // insertion: query[position] is spurious
                self.push(SearchState::new(position + 1, node, next_budget));
            }

            // deletion: the query is missing the tree's next character
            for (_, child) in tree.children(node) {
                self.push(SearchState::new(position, child, next_budget));
            }

            // transposition: query[position] and query[position + 1] are swapped
            if position + 1 < len {
                let swapped = tree
                    .step(node, self.query[position + 1])
                    .and_then(|mid| tree.step(mid, self.query[position]));
                if let Some(target) = swapped {
                    self.push(SearchState::new(position + 2, target, next_budget));
                }
            }
        }

        if position == len {
            if let Some(value) = tree.value(node) {
                if self.reported.insert(node) {
                    let distance = self.max_distance - budget;
                    trace!(node = %node, distance, "match");
                    self.matches += 1;
                    collector.collect(value, distance);
                }
            }
        }

        if position < len {
            if let Some(child) = tree.step(node, self.query[position]) {
                self.push(SearchState::new(position + 1, child, budget));
            }
        }
    }

    #[inline]
    fn push(&mut self, state: SearchState) {
        self.frontier.add(state);
        self.pushed += 1;
        self.peak_frontier = self.peak_frontier.max(self.frontier.len());
    }
}
