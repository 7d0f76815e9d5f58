//! Compressed residue-index text, e.g. `[1,2,8,7,3,4,5-8,15-17,10-19]`.
//!
//! Entries are single indices or inclusive `start-end` ranges, in any order.
//! Decoding always yields a sorted, deduplicated set; encoding writes the
//! canonical runlist form, so `[3,1,2,5]` round-trips as `[1-3,5]`.

use crate::libs::error::PpiError;
use intspan::IntSpan;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_RANGE: Regex = Regex::new(r"^(\d+)-(\d+)$").unwrap();
    static ref RE_SINGLE: Regex = Regex::new(r"^\d+$").unwrap();
}

/// A sorted set of residue positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueIndexSet {
    indices: Vec<usize>,
}

impl ResidueIndexSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut indices: Vec<usize> = iter.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Number of positions shared with `others`.
    ///
    /// ```
    /// use ppit::libs::indices::ResidueIndexSet;
    /// let set = ResidueIndexSet::from_indices(vec![1, 2, 3, 7]);
    /// assert_eq!(set.overlap(&[2, 3, 4, 4]), 2);
    /// ```
    pub fn overlap(&self, others: &[usize]) -> usize {
        let others = ResidueIndexSet::from_indices(others.iter().copied());
        others.indices.iter().filter(|i| self.contains(**i)).count()
    }
}

/// Decodes compressed index text into a sorted set.
///
/// Whitespace is ignored and brackets are optional. Entries that are neither
/// an integer nor an ascending `start-end` range are skipped with a warning.
///
/// ```
/// use ppit::libs::indices::decode;
/// let set = decode("[1 ,2,8,7,3 ,4, 5-8, 15-17,10-19]");
/// let expected: Vec<usize> = (1..=8).chain(10..=19).collect();
/// assert_eq!(set.indices(), expected.as_slice());
/// ```
pub fn decode(text: &str) -> ResidueIndexSet {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let body = cleaned.trim_start_matches('[').trim_end_matches(']');

    let mut ints = IntSpan::new();
    for entry in body.split(',') {
        if entry.is_empty() {
            continue;
        }

        if RE_SINGLE.is_match(entry) {
            match entry.parse::<i32>() {
                Ok(n) => ints.add_n(n),
                Err(_) => tracing::warn!("Index out of range in [{}], skipped", entry),
            }
        } else if let Some(caps) = RE_RANGE.captures(entry) {
            let start = caps[1].parse::<i32>();
            let end = caps[2].parse::<i32>();
            match (start, end) {
                (Ok(start), Ok(end)) if start <= end => ints.add_pair(start, end),
                _ => tracing::warn!("Malformed index range [{}], skipped", entry),
            }
        } else {
            tracing::warn!("Malformed index entry [{}], skipped", entry);
        }
    }

    if ints.is_empty() {
        return ResidueIndexSet::new();
    }
    ResidueIndexSet {
        indices: ints.to_vec().into_iter().map(|i| i as usize).collect(),
    }
}

/// Like [`decode`], but rejects text without the enclosing brackets.
pub fn decode_strict(text: &str) -> Result<ResidueIndexSet, PpiError> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Err(PpiError::Format(format!(
            "index list is not bracketed: {}",
            text
        )));
    }
    Ok(decode(trimmed))
}

/// Canonical text of a set: ascending runs, singletons collapsed.
///
/// ```
/// use ppit::libs::indices::{encode, ResidueIndexSet};
/// let set = ResidueIndexSet::from_indices(vec![5, 1, 2, 3, 9, 10]);
/// assert_eq!(encode(&set), "[1-3,5,9-10]");
/// assert_eq!(encode(&ResidueIndexSet::new()), "[]");
/// ```
pub fn encode(set: &ResidueIndexSet) -> String {
    if set.is_empty() {
        return "[]".to_string();
    }

    let mut ints = IntSpan::new();
    for &i in set.indices() {
        ints.add_n(i as i32);
    }
    format!("[{}]", ints.to_string())
}

/// Concatenates two compressed fragments without decoding them.
///
/// ```
/// use ppit::libs::indices::combine;
/// assert_eq!(combine("[10,2,3]", "[1-7,8]"), "[10,2,3,1-7,8]");
/// assert_eq!(combine("[1-3]", "[1-3]"), "[1-3]");
/// assert_eq!(combine("", "[4]"), "[4]");
/// ```
pub fn combine(first: &str, second: &str) -> String {
    if first == second || is_blank(second) {
        return first.to_string();
    }
    if is_blank(first) {
        return second.to_string();
    }

    format!(
        "{},{}",
        first.trim_end_matches(']'),
        second.trim_start_matches('[')
    )
}

fn is_blank(fragment: &str) -> bool {
    fragment.trim().trim_start_matches('[').trim_end_matches(']').trim().is_empty()
}

/// 1-based positions to 0-based. Position 0 has no 0-based counterpart and is dropped.
///
/// ```
/// use ppit::libs::indices::decrement;
/// assert_eq!(decrement(&[1, 2, 3]), vec![0, 1, 2]);
/// ```
pub fn decrement(indices: &[usize]) -> Vec<usize> {
    indices.iter().filter_map(|i| i.checked_sub(1)).collect()
}

/// Decodes 1-based annotation text into 0-based positions.
pub fn parse_zipped(text: &str) -> Vec<usize> {
    decrement(decode(text).indices())
}

/// Inclusive range `start..=end`; empty when `end < start`.
pub fn span(start: usize, end: usize) -> Vec<usize> {
    (start..=end).collect()
}
