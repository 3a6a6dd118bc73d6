//! Priority frontier of pending search states.
//!
//! The frontier hands out states with the most remaining edit budget first and,
//! among those, the state that has consumed the most of the query. Every edit
//! only ever lowers the budget, so once a state with budget `b` is popped no
//! state with a larger budget can appear later. That is what makes the search
//! report matches in nondecreasing distance order.

use crate::trie::NodeId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One in-flight position of the search: how much of the query has been read,
/// where in the tree we are, and how many edits are still allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchState {
    /// Number of query characters consumed (`0..=query.len()`)
    pub position: usize,
    /// Current node in the tree
    pub node: NodeId,
    /// Remaining edit allowance
    pub budget: usize,
}

impl SearchState {
    /// Create a new state.
    #[inline]
    pub fn new(position: usize, node: NodeId, budget: usize) -> Self {
        SearchState {
            position,
            node,
            budget,
        }
    }
}

impl Ord for SearchState {
    /// Larger budget first, then larger position. The node id only breaks ties
    /// so that `Ord` agrees with `Eq`; it carries no meaning for the search.
    fn cmp(&self, other: &Self) -> Ordering {
        self.budget
            .cmp(&other.budget)
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-heap of [`SearchState`]s with O(log n) `add` and `pop`.
#[derive(Debug, Clone, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<SearchState>,
}

impl PriorityFrontier {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty frontier with room for `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        PriorityFrontier {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Add a state. Passing `None` is a no-op, which lets callers push the
    /// result of a fallible step without branching.
    #[inline]
    pub fn add(&mut self, item: impl Into<Option<SearchState>>) {
        if let Some(state) = item.into() {
            self.heap.push(state);
        }
    }

    /// Remove and return the highest-priority state.
    #[inline]
    pub fn pop(&mut self) -> Option<SearchState> {
        self.heap.pop()
    }

    /// Number of pending states.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if no state is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
