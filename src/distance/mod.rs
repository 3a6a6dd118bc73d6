//! Reference edit distance.
//!
//! [`transposition_distance`] is the distance the tree search reports: the
//! optimal string alignment variant of Damerau-Levenshtein. `perf --verify`
//! uses it to decide whether a corrupted key is still within reach of its
//! original, and the tests use it as a linear-scan oracle.
//!
//! Optimal string alignment does not obey the triangle inequality, so a word
//! put through `k` single edits can end up more than `k` away from where it
//! started: "abcxyz" loses its 'b' ("acxyz"), then the first two letters
//! swap ("caxyz"), and the result is 3 away.

use smallvec::SmallVec;

/// Damerau-Levenshtein distance (optimal string alignment).
///
/// Counts insertions, deletions, substitutions and swaps of two adjacent
/// characters. A character that takes part in a swap is not edited again.
/// Works on `char`s, not bytes.
///
/// # Example
///
/// ```rust
/// use fuzzytrie::distance::transposition_distance;
///
/// assert_eq!(transposition_distance("ab", "ba"), 1);
/// assert_eq!(transposition_distance("test", "tset"), 1);
/// assert_eq!(transposition_distance("cat", "dog"), 3);
/// ```
pub fn transposition_distance(source: &str, target: &str) -> usize {
    let source: SmallVec<[char; 32]> = source.chars().collect();
    let target: SmallVec<[char; 32]> = target.chars().collect();

    let width = target.len() + 1;
    // table[i * width + j]: distance between source[..i] and target[..j]
    let mut table: Vec<usize> = Vec::with_capacity((source.len() + 1) * width);
    table.extend(0..width);

    for (i, &s) in source.iter().enumerate() {
        let row = (i + 1) * width;
        table.push(i + 1);

        for (j, &t) in target.iter().enumerate() {
            let above = table[row - width + j + 1];
            let left = table[row + j];
            let diagonal = table[row - width + j];

            let mut best = (above + 1).min(left + 1);
            best = best.min(if s == t { diagonal } else { diagonal + 1 });

            if i > 0 && j > 0 && s == target[j - 1] && source[i - 1] == t {
                best = best.min(table[row - 2 * width + j - 1] + 1);
            }
            table.push(best);
        }
    }

    table[source.len() * width + target.len()]
}
