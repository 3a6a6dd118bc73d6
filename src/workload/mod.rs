//! Synthetic typos for building query workloads.
//!
//! Each edit is one of the operations the search understands:
//! - Insertion: "dog" → "dokg"
//! - Removal: "dog" → "dg"
//! - Replacement: "dog" → "dug"
//! - Swap of two neighbours: "dog" → "odg"
//!
//! A single edit moves a word at most one unit of transposition distance.
//! Successive edits can compound beyond that, because a swap may act on
//! letters that an earlier edit brought together. Callers that need the
//! original within reach check the result with
//! [`transposition_distance`](crate::distance::transposition_distance).
//!
//! # Example
//!
//! ```rust
//! use fuzzytrie::distance::transposition_distance;
//! use fuzzytrie::workload::TypoGenerator;
//!
//! let mut typos = TypoGenerator::new(42);
//! let typo = typos.typo("geonames", 1);
//! assert!(transposition_distance("geonames", &typo) <= 1);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Letters used when no alphabet is configured.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of uniformly drawn indices.
///
/// Every random number generator is one; tests substitute a fixed script.
pub trait IndexSource {
    /// Return an index in `0..bound`. `bound` is never zero.
    fn index(&mut self, bound: usize) -> usize;
}

impl<R: RngCore> IndexSource for R {
    #[inline]
    fn index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Kind of a single typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// A character that should not be there
    Insert,
    /// A missing character
    Remove,
    /// A wrong character
    Replace,
    /// Two neighbours in the wrong order
    Swap,
}

impl EditKind {
    const ALL: [EditKind; 4] = [EditKind::Insert, EditKind::Remove, EditKind::Replace, EditKind::Swap];

    /// Pick an edit that can apply to a word of `len` characters.
    fn choose<S: IndexSource + ?Sized>(len: usize, source: &mut S) -> EditKind {
        match len {
            0 => EditKind::Insert,
            // no neighbour to swap with
            1 => Self::ALL[source.index(3)],
            _ => Self::ALL[source.index(4)],
        }
    }
}

/// Insert a random letter of `alphabet` at a random position (end included).
/// Does nothing if `alphabet` is empty.
pub fn insert_char<S: IndexSource + ?Sized>(word: &mut Vec<char>, source: &mut S, alphabet: &[char]) {
    if alphabet.is_empty() {
        return;
    }
    let c = alphabet[source.index(alphabet.len())];
    let position = source.index(word.len() + 1);
    word.insert(position, c);
}

/// Remove the character at a random position.
pub fn remove_char<S: IndexSource + ?Sized>(word: &mut Vec<char>, source: &mut S) {
    if !word.is_empty() {
        let position = source.index(word.len());
        word.remove(position);
    }
}

/// Overwrite a random position with a random letter of `alphabet`.
///
/// The new letter may equal the old one, in which case the word is unchanged.
pub fn replace_char<S: IndexSource + ?Sized>(word: &mut [char], source: &mut S, alphabet: &[char]) {
    if word.is_empty() || alphabet.is_empty() {
        return;
    }
    let c = alphabet[source.index(alphabet.len())];
    let position = source.index(word.len());
    word[position] = c;
}

/// Swap a random character with its right neighbour.
pub fn swap_adjacent<S: IndexSource + ?Sized>(word: &mut [char], source: &mut S) {
    if word.len() > 1 {
        let position = source.index(word.len() - 1);
        word.swap(position, position + 1);
    }
}

/// Apply `edits` random edits to `word`.
///
/// An empty word can only grow, and a one-character word cannot be swapped,
/// so the edit kind is drawn from the operations that apply at each step.
pub fn random_edits<S: IndexSource + ?Sized>(
    word: &str,
    source: &mut S,
    edits: usize,
    alphabet: &[char],
) -> String {
    let mut out: Vec<char> = word.chars().collect();

    for _ in 0..edits {
        match EditKind::choose(out.len(), source) {
            EditKind::Insert => insert_char(&mut out, source, alphabet),
            EditKind::Remove => remove_char(&mut out, source),
            EditKind::Replace => replace_char(&mut out, source, alphabet),
            EditKind::Swap => swap_adjacent(&mut out, source),
        }
    }

    out.into_iter().collect()
}

/// Seeded typo generator.
///
/// The same seed and the same sequence of calls yield the same typos.
#[derive(Debug, Clone)]
pub struct TypoGenerator {
    rng: StdRng,
    alphabet: Vec<char>,
}

impl TypoGenerator {
    /// Create a generator over [`DEFAULT_ALPHABET`].
    pub fn new(seed: u64) -> Self {
        Self::with_alphabet(seed, DEFAULT_ALPHABET)
    }

    /// Create a generator drawing letters from `alphabet`.
    ///
    /// With an empty alphabet only removals and swaps change the word.
    pub fn with_alphabet(seed: u64, alphabet: &str) -> Self {
        TypoGenerator {
            rng: StdRng::seed_from_u64(seed),
            alphabet: alphabet.chars().collect(),
        }
    }

    /// The letters used for insertions and replacements.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Corrupt `word` with `edits` random edits.
    pub fn typo(&mut self, word: &str, edits: usize) -> String {
        random_edits(word, &mut self.rng, edits, &self.alphabet)
    }
}
