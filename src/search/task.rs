//! Background searches with a single-shot completion signal.
//!
//! A spawned search runs on its own thread and, whatever makes it stop, sends
//! exactly one [`Completed`] message through a `bounded(1)` channel. The
//! collector travels with the message so the caller gets its results back.

use super::{search_with_cancel, CancellationToken, SearchStats};
use crate::collector::ResultCollector;
use crate::error::{Error, Result};
use crate::trie::PrefixTree;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What a finished background search hands back.
#[derive(Debug)]
pub struct Completed<C> {
    /// The collector, holding whatever it gathered
    pub collector: C,
    /// Counters and the reason the search stopped
    pub stats: SearchStats,
}

/// Handle on a search running in the background.
///
/// The completion message is delivered once. After [`SearchTask::try_wait`]
/// or [`SearchTask::wait_timeout`] has returned it, further polls report
/// [`Error::WorkerDisconnected`].
#[derive(Debug)]
pub struct SearchTask<C> {
    token: CancellationToken,
    completion: Receiver<Completed<C>>,
}

impl<C> SearchTask<C> {
    /// Ask the search to stop at its next iteration.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token the search observes.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The completion channel, for use with `crossbeam_channel::select!`.
    pub fn completion(&self) -> &Receiver<Completed<C>> {
        &self.completion
    }

    /// Block until the search finishes.
    pub fn wait(self) -> Result<Completed<C>> {
        self.completion.recv().map_err(|_| Error::WorkerDisconnected)
    }

    /// Return the completion if the search has finished, `None` otherwise.
    pub fn try_wait(&self) -> Option<Result<Completed<C>>> {
        match self.completion.try_recv() {
            Ok(completed) => Some(Ok(completed)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::WorkerDisconnected)),
        }
    }

    /// Block for at most `timeout`, returning `None` if the search is still
    /// running.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Completed<C>>> {
        match self.completion.recv_timeout(timeout) {
            Ok(completed) => Some(Ok(completed)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(Error::WorkerDisconnected)),
        }
    }
}

/// Run a search on a scoped thread that borrows the tree.
///
/// Use this when the tree lives on the caller's stack:
///
/// ```rust
/// use fuzzytrie::prelude::*;
/// use std::thread;
///
/// let mut tree = PrefixTree::new();
/// tree.insert_with("green", 1);
///
/// thread::scope(|scope| {
///     let task = spawn_search(
///         scope,
///         &tree,
///         "gren",
///         1,
///         ListCollector::unbounded(),
///         CancellationToken::new(),
///     );
///     let done = task.wait().unwrap();
///     assert_eq!(done.collector.results()[0].value, &1);
///     assert_eq!(done.stats.outcome, SearchOutcome::Exhausted);
/// });
/// ```
pub fn spawn_search<'scope, 'env, V, C>(
    scope: &'scope thread::Scope<'scope, 'env>,
    tree: &'env PrefixTree<V>,
    query: &'env str,
    max_distance: usize,
    collector: C,
    token: CancellationToken,
) -> SearchTask<C>
where
    V: Sync,
    C: ResultCollector<'env, V> + Send + 'scope,
{
    let (sender, completion) = crossbeam_channel::bounded(1);
    let worker_token = token.clone();

    scope.spawn(move || {
        let mut collector = collector;
        let stats = search_with_cancel(tree, query, max_distance, &mut collector, &worker_token);
        // The receiver may already be gone; nothing to report to then.
        let _ = sender.send(Completed { collector, stats });
    });

    SearchTask { token, completion }
}

/// Run a search on a detached thread over a shared tree.
///
/// The worker keeps its own handle on the tree, so the collector cannot hold
/// references into it and has to accept values of any lifetime.
/// [`CountCollector`] fits.
///
/// [`CountCollector`]: crate::collector::CountCollector
pub fn spawn_shared<V, C>(
    tree: Arc<PrefixTree<V>>,
    query: impl Into<String>,
    max_distance: usize,
    collector: C,
    token: CancellationToken,
) -> SearchTask<C>
where
    V: Send + Sync + 'static,
    C: for<'t> ResultCollector<'t, V> + Send + 'static,
{
    let (sender, completion) = crossbeam_channel::bounded(1);
    let worker_token = token.clone();
    let query = query.into();

    thread::spawn(move || {
        let mut collector = collector;
        let stats = search_with_cancel(&*tree, &query, max_distance, &mut collector, &worker_token);
        let _ = sender.send(Completed { collector, stats });
    });

    SearchTask { token, completion }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CountCollector, ListCollector};
    use crate::search::SearchOutcome;

    fn words(count: usize) -> PrefixTree<usize> {
        let mut tree = PrefixTree::new();
        for i in 0..count {
            tree.insert_with(&format!("word{:05}", i), i);
        }
        tree
    }

    #[test]
    fn test_scoped_search_completes_once() {
        let tree = words(100);

        thread::scope(|scope| {
            let task = spawn_search(
                scope,
                &tree,
                "word00042",
                0,
                ListCollector::unbounded(),
                CancellationToken::new(),
            );

            let done = task
                .wait_timeout(Duration::from_secs(10))
                .expect("search should finish")
                .expect("worker should report");
            assert_eq!(done.collector.results().len(), 1);
            assert_eq!(*done.collector.results()[0].value, 42);
            assert_eq!(done.stats.outcome, SearchOutcome::Exhausted);

            // the single slot is drained and the worker has hung up
            assert_eq!(
                task.wait_timeout(Duration::from_secs(10)).map(|r| r.is_err()),
                Some(true)
            );
        });
    }

    #[test]
    fn test_cancelled_before_start() {
        let tree = Arc::new(words(500));
        let token = CancellationToken::new();
        token.cancel();

        let task = spawn_shared(
            Arc::clone(&tree),
            "word00001",
            3,
            CountCollector::new(usize::MAX),
            token,
        );
        let done = task.wait().expect("worker should report");

        assert_eq!(done.stats.outcome, SearchOutcome::Cancelled);
        assert_eq!(done.collector.count(), 0);
    }

    #[test]
    fn test_cancel_through_task_handle() {
        let tree = Arc::new(words(2000));
        let task = spawn_shared(
            tree,
            "word00001",
            2,
            CountCollector::new(usize::MAX),
            CancellationToken::new(),
        );
        task.cancel();

        let done = task.wait().expect("worker should report");
        // the worker may finish before it sees the flag
        assert!(matches!(
            done.stats.outcome,
            SearchOutcome::Cancelled | SearchOutcome::Exhausted
        ));
        assert_eq!(done.stats.matches, done.collector.count());
    }

    struct Panicking;

    impl<'t, V> ResultCollector<'t, V> for Panicking {
        fn collect(&mut self, _value: &'t V, _distance: usize) {}

        fn is_done(&self) -> bool {
            panic!("collector failure");
        }
    }

    #[test]
    fn test_worker_panic_reports_disconnect() {
        let tree = Arc::new(words(10));
        let task = spawn_shared(tree, "word", 1, Panicking, CancellationToken::new());
        assert_eq!(task.wait().err(), Some(Error::WorkerDisconnected));
    }
}
