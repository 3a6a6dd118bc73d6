//! End-to-end use of the public API.

use fuzzytrie::prelude::*;
use std::cell::Cell;

fn animals() -> PrefixTree<&'static str> {
    let mut tree = PrefixTree::new();
    for word in ["cat", "tat", "dog", "cart", "act", "doge", "do"] {
        tree.insert_with(word, word);
    }
    tree
}

fn found(tree: &PrefixTree<&'static str>, query: &str, max_distance: usize) -> Vec<(&'static str, usize)> {
    let mut collector = ListCollector::unbounded();
    search(tree, query, max_distance, &mut collector);
    collector.results().iter().map(|m| (*m.value, m.distance)).collect()
}

#[test]
fn test_walk_tree_by_hand() {
    let tree = animals();
    let d = tree.root().step('d').unwrap();
    let o = d.step('o').unwrap();

    assert_eq!(o.value(), Some(&"do"));
    assert_eq!(o.step('g').and_then(|g| g.value()), Some(&"dog"));
    assert!(d.value().is_none());
    assert!(tree.root().step('z').is_none());
    assert_eq!(tree.len(), 7);
}

#[test]
fn test_distance_one_from_cat() {
    let tree = animals();
    let mut results = found(&tree, "cat", 1);

    assert_eq!(results[0], ("cat", 0));
    results.sort();
    assert_eq!(results, vec![("act", 1), ("cart", 1), ("cat", 0), ("tat", 1)]);
}

#[test]
fn test_closest_first_with_limit() {
    let tree = animals();
    let mut collector = ListCollector::with_limit(2);
    let stats = search(&tree, "dog", 2, &mut collector);

    let distances: Vec<usize> = collector.results().iter().map(|m| m.distance).collect();
    assert_eq!(distances, vec![0, 1]);
    assert_eq!(collector.results()[0].value, &"dog");
    assert_eq!(stats.outcome, SearchOutcome::CollectorDone);
}

#[test]
fn test_budget_from_signed_input() {
    let tree = animals();
    let budget = EditBudget::try_from(1i64).unwrap();
    let mut results = found(&tree, "dgo", budget.get());
    results.sort();
    assert_eq!(results, vec![("do", 1), ("dog", 1)]);

    assert_eq!(EditBudget::try_from(-1i64), Err(Error::NegativeDistance(-1)));
}

/// Cancels the search after a fixed number of `is_done` checks.
struct StopAfter<'a> {
    checks: Cell<usize>,
    token: &'a CancellationToken,
    seen: usize,
}

impl<'t, 'a, V> ResultCollector<'t, V> for StopAfter<'a> {
    fn collect(&mut self, _value: &'t V, _distance: usize) {
        self.seen += 1;
    }

    fn is_done(&self) -> bool {
        let left = self.checks.get();
        if left == 0 {
            self.token.cancel();
        } else {
            self.checks.set(left - 1);
        }
        false
    }
}

#[test]
fn test_collector_can_cancel_its_own_search() {
    let tree = animals();
    let token = CancellationToken::new();
    let mut collector = StopAfter {
        checks: Cell::new(3),
        token: &token,
        seen: 0,
    };

    let stats = search_with_cancel(&tree, "cat", 3, &mut collector, &token);

    assert_eq!(stats.outcome, SearchOutcome::Cancelled);
    assert!(token.is_cancelled());
    // three clean checks, then the one that cancels, then the pop that notices
    assert_eq!(stats.popped, 5);
    assert_eq!(stats.matches, collector.seen);
}

/// Exact lookup through the search, written against std's two-parameter
/// `Result` alongside the glob import.
fn exact(tree: &PrefixTree<&'static str>, key: &str) -> Result<&'static str, String> {
    found(tree, key, 0)
        .first()
        .map(|&(value, _)| value)
        .ok_or_else(|| format!("{} not found", key))
}

#[test]
fn test_prelude_keeps_std_result() {
    let tree = animals();
    assert_eq!(exact(&tree, "doge"), Ok("doge"));
    assert_eq!(exact(&tree, "cow"), Err("cow not found".to_string()));
}
