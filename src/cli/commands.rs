//! Subcommand implementations.

use super::config::Config;
use super::loader::{self, Dataset, Entry};
use crate::collector::{CountCollector, ListCollector, Match};
use crate::distance::transposition_distance;
use crate::search::search;
use crate::trie::PrefixTree;
use crate::workload::TypoGenerator;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Load the dataset at `path`, logging how long it took.
pub fn load(path: &Path) -> Result<Dataset> {
    let started = Instant::now();
    let dataset = loader::load_path(path)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;

    info!(
        records = dataset.records(),
        keys = dataset.tree.len(),
        nodes = dataset.tree.node_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(dataset)
}

/// Answer one query and write the matches to `out`, closest first.
///
/// Each line is the key, then its values joined by commas, with the distance
/// in front when `config.show_distances` is set.
pub fn run_query<W: Write>(dataset: &Dataset, term: &str, config: &Config, out: &mut W) -> Result<usize> {
    let mut collector = match config.result_limit {
        Some(limit) => ListCollector::with_limit(limit),
        None => ListCollector::unbounded(),
    };
    let stats = search(&dataset.tree, term, config.max_distance, &mut collector);
    debug!(term, popped = stats.popped, outcome = %stats.outcome, "query answered");

    for found in collector.results() {
        writeln!(out, "{}", format_match(found, config.show_distances))?;
    }
    Ok(collector.len())
}

fn format_match(found: &Match<'_, Entry>, show_distance: bool) -> String {
    let entry = found.value;
    let mut line = if show_distance {
        format!("{}\t{}", found.distance, entry.key)
    } else {
        entry.key.clone()
    };

    if !entry.values.is_empty() {
        line.push('\t');
        line.push_str(&entry.values.iter().cloned().collect::<Vec<_>>().join(","));
    }
    line
}

/// Edit budget used for a key of `len` characters: short keys get fewer
/// typos so the corrupted query stays recognisable.
pub fn perf_distance(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// Timing of a single benchmark query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySample {
    /// Length of the corrupted query in characters
    pub query_len: usize,
    /// Time spent in the search
    pub elapsed: Duration,
    /// Matches collected
    pub results: usize,
    /// Outcome of the `--verify` check, if it ran
    pub check: Option<Check>,
}

/// What `--verify` found for one corrupted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The original key was among the matches.
    Found,
    /// The original key was within the budget but not reported.
    Missed,
    /// The edits compounded past the budget, so no match was expected.
    OutOfReach,
}

/// Search for `query` exhaustively and look for `original` among the matches.
///
/// The original only has to be found when its transposition distance to the
/// query is within `max_distance`.
pub fn check_query(tree: &PrefixTree<Entry>, original: &str, query: &str, max_distance: usize) -> Check {
    if transposition_distance(original, query) > max_distance {
        return Check::OutOfReach;
    }

    let mut all = ListCollector::unbounded();
    search(tree, query, max_distance, &mut all);
    if all.results().iter().any(|m| m.value.key == original) {
        Check::Found
    } else {
        Check::Missed
    }
}

/// Aggregated benchmark figures.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfSummary {
    /// Queries run
    pub queries: usize,
    /// Shortest query
    pub min_len: usize,
    /// Longest query
    pub max_len: usize,
    /// Mean query length
    pub avg_len: f64,
    /// Fastest query
    pub min_time: Duration,
    /// Slowest query
    pub max_time: Duration,
    /// Mean query time
    pub avg_time: Duration,
    /// Total matches collected
    pub results: usize,
    /// Verified queries that missed their original key
    pub misses: usize,
    /// Verified queries whose typo ended up beyond the budget
    pub out_of_reach: usize,
}

impl PerfSummary {
    /// Fold samples into a summary. `None` if there are none.
    pub fn from_samples(samples: &[QuerySample]) -> Option<PerfSummary> {
        let first = samples.first()?;
        let mut summary = PerfSummary {
            queries: samples.len(),
            min_len: first.query_len,
            max_len: first.query_len,
            avg_len: 0.0,
            min_time: first.elapsed,
            max_time: first.elapsed,
            avg_time: Duration::ZERO,
            results: 0,
            misses: 0,
            out_of_reach: 0,
        };

        let mut total_len = 0usize;
        let mut total_time = Duration::ZERO;
        for sample in samples {
            summary.min_len = summary.min_len.min(sample.query_len);
            summary.max_len = summary.max_len.max(sample.query_len);
            summary.min_time = summary.min_time.min(sample.elapsed);
            summary.max_time = summary.max_time.max(sample.elapsed);
            summary.results += sample.results;
            match sample.check {
                Some(Check::Missed) => summary.misses += 1,
                Some(Check::OutOfReach) => summary.out_of_reach += 1,
                Some(Check::Found) | None => {}
            }
            total_len += sample.query_len;
            total_time += sample.elapsed;
        }

        summary.avg_len = total_len as f64 / samples.len() as f64;
        summary.avg_time = total_time / samples.len() as u32;
        Some(summary)
    }

    /// Write the human-readable report.
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "results:")?;
        writeln!(out, "queries: {}, matches: {}", self.queries, self.results)?;
        writeln!(
            out,
            "length: {} min, {} max, {:.3} average",
            self.min_len, self.max_len, self.avg_len
        )?;
        writeln!(
            out,
            "time (in nanoseconds): {} min, {} max, {} average",
            self.min_time.as_nanos(),
            self.max_time.as_nanos(),
            self.avg_time.as_nanos()
        )
    }
}

/// One corrupted key, ready to be searched.
struct Job<'d> {
    name: &'d str,
    query: String,
    distance: usize,
}

/// Benchmark every key of `dataset` on `config.threads` workers.
///
/// Typos are generated in key order by a single seeded generator as keys are
/// handed out, so the queries depend on the seed alone and only the timings
/// vary between runs.
pub fn run_perf(dataset: &Dataset, config: &Config, seed: u64, verify: bool) -> Result<PerfSummary> {
    config.validate()?;

    let threads = config.threads;
    let mut typos = TypoGenerator::with_alphabet(seed, &config.alphabet);
    let (job_tx, job_rx) = crossbeam_channel::bounded::<Job<'_>>(threads * 4);
    let (sample_tx, sample_rx) = crossbeam_channel::bounded::<QuerySample>(threads * 4);

    info!(threads, seed, queries = dataset.records(), "starting performance test");

    let samples: Vec<QuerySample> = thread::scope(|scope| {
        for _ in 0..threads {
            let jobs = job_rx.clone();
            let samples = sample_tx.clone();
            let tree = &dataset.tree;
            let max_results = config.perf_results;

            scope.spawn(move || {
                for job in jobs {
                    let mut counter = CountCollector::new(max_results);

                    let started = Instant::now();
                    search(tree, &job.query, job.distance, &mut counter);
                    let elapsed = started.elapsed();

                    let sample = QuerySample {
                        query_len: job.query.chars().count(),
                        elapsed,
                        results: counter.count(),
                        check: verify.then(|| check_query(tree, job.name, &job.query, job.distance)),
                    };
                    if samples.send(sample).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(sample_tx);

        scope.spawn(move || {
            for name in &dataset.keys {
                let distance = perf_distance(name.chars().count());
                let job = Job {
                    name: name.as_str(),
                    query: typos.typo(name, distance),
                    distance,
                };
                if job_tx.send(job).is_err() {
                    break;
                }
            }
        });

        sample_rx.iter().collect()
    });

    let Some(summary) = PerfSummary::from_samples(&samples) else {
        bail!("dataset contains no keys to benchmark");
    };
    if summary.out_of_reach > 0 {
        debug!(out_of_reach = summary.out_of_reach, "typos beyond their search budget");
    }
    if summary.misses > 0 {
        warn!(misses = summary.misses, "corrupted keys that missed their original");
        bail!("{} corrupted keys did not find their original", summary.misses);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::loader::load_dataset;
    use std::io::Cursor;

    fn colors() -> Dataset {
        load_dataset(Cursor::new("blue\tsky\ngreen\tgrass\nblack\tnight\nblue\tsea\n")).unwrap()
    }

    fn query(term: &str, config: &Config) -> String {
        let mut out = Vec::new();
        run_query(&colors(), term, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_query_output() {
        let config = Config {
            max_distance: 1,
            ..Config::default()
        };
        assert_eq!(query("bue", &config), "blue\tsea,sky\n");

        let config = Config {
            max_distance: 1,
            show_distances: true,
            ..Config::default()
        };
        assert_eq!(query("bue", &config), "1\tblue\tsea,sky\n");
    }

    #[test]
    fn test_query_respects_limit() {
        let config = Config {
            max_distance: 5,
            result_limit: Some(2),
            ..Config::default()
        };
        let output = query("blue", &config);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("blue"));
    }

    #[test]
    fn test_perf_distance() {
        assert_eq!(perf_distance(0), 0);
        assert_eq!(perf_distance(2), 0);
        assert_eq!(perf_distance(3), 1);
        assert_eq!(perf_distance(5), 1);
        assert_eq!(perf_distance(6), 2);
    }

    #[test]
    fn test_summary() {
        let sample = |query_len, nanos, check| QuerySample {
            query_len,
            elapsed: Duration::from_nanos(nanos),
            results: 1,
            check,
        };
        let summary = PerfSummary::from_samples(&[
            sample(3, 100, None),
            sample(5, 300, Some(Check::Found)),
            sample(4, 200, Some(Check::Missed)),
            sample(4, 200, Some(Check::OutOfReach)),
        ])
        .unwrap();

        assert_eq!(summary.queries, 4);
        assert_eq!((summary.min_len, summary.max_len), (3, 5));
        assert!((summary.avg_len - 4.0).abs() < f64::EPSILON);
        assert_eq!(summary.min_time, Duration::from_nanos(100));
        assert_eq!(summary.max_time, Duration::from_nanos(300));
        assert_eq!(summary.avg_time, Duration::from_nanos(200));
        assert_eq!(summary.results, 4);
        assert_eq!(summary.misses, 1);
        assert_eq!(summary.out_of_reach, 1);

        assert!(PerfSummary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_perf_finds_every_original() {
        let mut text = String::new();
        for i in 0..300 {
            text.push_str(&format!("city{}\n", i));
        }
        let dataset = load_dataset(Cursor::new(text)).unwrap();
        let config = Config {
            threads: 3,
            ..Config::default()
        };

        let summary = run_perf(&dataset, &config, 11, true).unwrap();
        assert_eq!(summary.queries, 300);
        assert_eq!(summary.misses, 0);
        assert!(summary.results >= 300);

        let mut report = Vec::new();
        summary.write_report(&mut report).unwrap();
        assert!(String::from_utf8(report).unwrap().starts_with("results:\n"));
    }

    #[test]
    fn test_check_ignores_compounded_typos() {
        let dataset = load_dataset(Cursor::new("abcxyz\n")).unwrap();

        // two edits, three units away: nothing to find at budget 2
        assert_eq!(check_query(&dataset.tree, "abcxyz", "caxyz", 2), Check::OutOfReach);
        assert_eq!(check_query(&dataset.tree, "abcxyz", "caxyz", 3), Check::Found);
        assert_eq!(check_query(&dataset.tree, "abcxyz", "acxyz", 1), Check::Found);
    }

    #[test]
    fn test_perf_queries_depend_only_on_seed() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&format!("station{}\n", i));
        }
        let dataset = load_dataset(Cursor::new(text)).unwrap();

        let run = |threads| {
            let config = Config {
                threads,
                perf_results: 5,
                ..Config::default()
            };
            run_perf(&dataset, &config, 42, true).unwrap()
        };
        let single = run(1);
        let many = run(4);

        assert_eq!(single.queries, many.queries);
        assert_eq!((single.min_len, single.max_len), (many.min_len, many.max_len));
        assert!((single.avg_len - many.avg_len).abs() < f64::EPSILON);
        assert_eq!(single.results, many.results);
        assert_eq!(single.out_of_reach, many.out_of_reach);
    }

    #[test]
    fn test_perf_rejects_zero_threads() {
        let config = Config {
            threads: 0,
            ..Config::default()
        };
        assert!(run_perf(&colors(), &config, 1, false).is_err());
    }
}
