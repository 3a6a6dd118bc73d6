//! Dataset loading.
//!
//! A dataset is UTF-8 text with one record per line, either `key` or
//! `key<TAB>value`. Blank lines are skipped. Records sharing a key are merged
//! into one [`Entry`] whose values are the union of all records, so the
//! resulting tree does not depend on record order.

use crate::trie::PrefixTree;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset could not be read.
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),

    /// A record has a value but no key.
    #[error("line {line}: record has an empty key")]
    EmptyKey {
        /// 1-based line number
        line: usize,
    },
}

/// The value stored under each key of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The key, as written in the dataset
    pub key: String,
    /// Values of every record with this key
    pub values: BTreeSet<String>,
}

impl Entry {
    fn merge(existing: Option<Entry>, mut incoming: Entry) -> Entry {
        match existing {
            Some(mut entry) => {
                entry.values.append(&mut incoming.values);
                entry
            }
            None => incoming,
        }
    }
}

/// A loaded dataset.
#[derive(Debug)]
pub struct Dataset {
    /// Index over all keys
    pub tree: PrefixTree<Entry>,
    /// Keys in file order, one per record (duplicates included)
    pub keys: Vec<String>,
}

impl Dataset {
    /// Number of records read.
    pub fn records(&self) -> usize {
        self.keys.len()
    }
}

/// Read a dataset from `path`.
pub fn load_path(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path)?;
    load_dataset(BufReader::new(file))
}

/// Read a dataset from any buffered reader.
pub fn load_dataset<R: BufRead>(reader: R) -> Result<Dataset, LoadError> {
    let mut tree = PrefixTree::new();
    let mut keys = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = match line.split_once('\t') {
            Some((key, value)) => (key, Some(value)),
            None => (line, None),
        };
        if key.is_empty() {
            return Err(LoadError::EmptyKey { line: index + 1 });
        }

        let entry = Entry {
            key: key.to_string(),
            values: value.map(str::to_string).into_iter().collect(),
        };
        tree.insert(key, entry, Entry::merge);
        keys.push(key.to_string());
    }

    Ok(Dataset { tree, keys })
}
