//! Result collectors: where the search sends its matches.
//!
//! The search calls [`ResultCollector::collect`] with the closest match first,
//! then the next closest, and so on. [`ResultCollector::is_done`] is checked
//! once before each state is expanded and is the only way to bound the amount
//! of work a search does.

/// A single match reported by the search.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'t, V> {
    /// Value stored under the matching key
    pub value: &'t V,
    /// Edit distance between the query and the matching key
    pub distance: usize,
}

impl<V> Clone for Match<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Match<'_, V> {}

/// Sink for search matches.
///
/// `'t` is the lifetime of the tree being searched; collectors may keep the
/// references they receive for as long as the tree lives.
pub trait ResultCollector<'t, V> {
    /// Receive a match. Calls arrive in nondecreasing `distance` order and
    /// each stored key is reported at most once per search.
    fn collect(&mut self, value: &'t V, distance: usize);

    /// Return `true` to stop the search before the next state is expanded.
    fn is_done(&self) -> bool;
}

impl<'t, V, C> ResultCollector<'t, V> for &mut C
where
    C: ResultCollector<'t, V> + ?Sized,
{
    #[inline]
    fn collect(&mut self, value: &'t V, distance: usize) {
        (**self).collect(value, distance)
    }

    #[inline]
    fn is_done(&self) -> bool {
        (**self).is_done()
    }
}

/// Keeps matches in discovery order, which is nondecreasing distance order.
///
/// A bounded collector reports done once it holds `limit` matches, so
/// `ListCollector::with_limit(n)` ends up with the `n` closest keys.
#[derive(Debug, Clone)]
pub struct ListCollector<'t, V> {
    limit: Option<usize>,
    results: Vec<Match<'t, V>>,
}

impl<'t, V> ListCollector<'t, V> {
    /// Collect at most `limit` matches.
    pub fn with_limit(limit: usize) -> Self {
        ListCollector {
            limit: Some(limit),
            results: Vec::with_capacity(limit.min(64)),
        }
    }

    /// Collect every match within the search budget.
    pub fn unbounded() -> Self {
        ListCollector {
            limit: None,
            results: Vec::new(),
        }
    }

    /// The configured limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Matches collected so far.
    pub fn results(&self) -> &[Match<'t, V>] {
        &self.results
    }

    /// Consume the collector and return its matches.
    pub fn into_results(self) -> Vec<Match<'t, V>> {
        self.results
    }

    /// Number of matches collected so far.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<V> Default for ListCollector<'_, V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<'t, V> ResultCollector<'t, V> for ListCollector<'t, V> {
    fn collect(&mut self, value: &'t V, distance: usize) {
        self.results.push(Match { value, distance });
    }

    fn is_done(&self) -> bool {
        self.limit.is_some_and(|limit| self.results.len() >= limit)
    }
}

/// Counts matches and throws the values away.
///
/// Useful for benchmarking, where materialising results would skew timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountCollector {
    limit: usize,
    count: usize,
}

impl CountCollector {
    /// Count up to `limit` matches.
    pub fn new(limit: usize) -> Self {
        CountCollector { limit, count: 0 }
    }

    /// Number of matches seen.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<'t, V> ResultCollector<'t, V> for CountCollector {
    fn collect(&mut self, _value: &'t V, _distance: usize) {
        self.count += 1;
    }

    fn is_done(&self) -> bool {
        self.count >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_collector_stops_at_limit() {
        let values = [10, 20, 30];
        let mut collector = ListCollector::with_limit(2);

        assert!(!collector.is_done());
        collector.collect(&values[0], 0);
        assert!(!collector.is_done());
        collector.collect(&values[1], 1);
        assert!(collector.is_done());

        let distances: Vec<usize> = collector.results().iter().map(|m| m.distance).collect();
        assert_eq!(distances, vec![0, 1]);
        assert_eq!(*collector.results()[1].value, 20);
    }

    #[test]
    fn test_zero_limit_is_done_immediately() {
        let collector: ListCollector<'_, u8> = ListCollector::with_limit(0);
        assert!(collector.is_done());
    }

    #[test]
    fn test_unbounded_list_collector_is_never_done() {
        let values: Vec<u32> = (0..1000).collect();
        let mut collector = ListCollector::unbounded();
        for v in &values {
            collector.collect(v, 0);
        }
        assert!(!collector.is_done());
        assert_eq!(collector.len(), 1000);
    }

    #[test]
    fn test_count_collector() {
        let mut collector = CountCollector::new(2);
        assert!(!ResultCollector::<()>::is_done(&collector));

        ResultCollector::<()>::collect(&mut collector, &(), 0);
        ResultCollector::<()>::collect(&mut collector, &(), 3);

        assert_eq!(collector.count(), 2);
        assert!(ResultCollector::<()>::is_done(&collector));
    }

    fn feed<'t, C: ResultCollector<'t, String>>(mut collector: C, value: &'t String) -> bool {
        collector.collect(value, 1);
        collector.is_done()
    }

    #[test]
    fn test_borrowed_collector_forwards() {
        let value = "blue".to_string();
        let mut inner = ListCollector::with_limit(1);

        assert!(feed(&mut inner, &value));
        assert_eq!(inner.results()[0].value, &value);
        assert_eq!(inner.results()[0].distance, 1);
    }
}
