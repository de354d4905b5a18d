//! Frequency tables over aligned sequences.
//!
//! Every table is ordered by key, so anything derived from one (argmax ties,
//! probability rows, serialized models) comes out the same on every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{tagger::END, tagger::START, Error, Result};

pub type Counter = BTreeMap<String, u64>;

/// `outer -> inner -> count`. Absent keys count zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    table: BTreeMap<String, Counter>,
}

impl PairCounts {
    pub fn add(&mut self, outer: &str, inner: &str) {
        self.add_n(outer, inner, 1);
    }

    pub fn add_n(&mut self, outer: &str, inner: &str, n: u64) {
        let row = self.table.entry(outer.to_string()).or_default();
        *row.entry(inner.to_string()).or_default() += n;
    }

    pub fn get(&self, outer: &str, inner: &str) -> u64 {
        self.row(outer).and_then(|r| r.get(inner)).copied().unwrap_or(0)
    }

    pub fn row(&self, outer: &str) -> Option<&Counter> {
        self.table.get(outer)
    }

    pub fn row_total(&self, outer: &str) -> u64 {
        self.row(outer).map(|r| r.values().sum()).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.table.values().flat_map(|r| r.values()).sum()
    }

    /// Inner key with the highest count; ties go to the smallest key.
    pub fn most_frequent(&self, outer: &str) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (inner, &n) in self.row(outer)? {
            if best.map_or(true, |(_, m)| n > m) {
                best = Some((inner.as_str(), n));
            }
        }
        best
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Counter)> + '_ {
        self.table.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Number of distinct outer keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn check_aligned<A, B>(outer: &[Vec<A>], inner: &[Vec<B>]) -> Result<()> {
    if outer.len() != inner.len() {
        return Err(Error::MalformedInput(format!(
            "{} outer sequences but {} inner sequences",
            outer.len(),
            inner.len()
        )));
    }
    for (i, (a, b)) in outer.iter().zip(inner).enumerate() {
        if a.len() != b.len() {
            return Err(Error::MalformedInput(format!(
                "sequence {i} has length {} on one side and {} on the other",
                a.len(),
                b.len()
            )));
        }
    }
    Ok(())
}

/// Counts how often each `inner` item co-occurs with each `outer` item at the
/// same (sentence, position).
///
/// With tags as `outer` and words as `inner`, `counts.get("NOUN", "time")` is
/// the number of times "time" was tagged NOUN.
pub fn pair_counts<A: AsRef<str>, B: AsRef<str>>(outer: &[Vec<A>], inner: &[Vec<B>]) -> Result<PairCounts> {
    check_aligned(outer, inner)?;
    let mut counts = PairCounts::default();
    for (a, b) in outer.iter().zip(inner) {
        for (o, i) in a.iter().zip(b) {
            counts.add(o.as_ref(), i.as_ref());
        }
    }
    Ok(counts)
}

pub fn unigram_counts<A: AsRef<str>>(sequences: &[Vec<A>]) -> Counter {
    let mut counts = Counter::new();
    for item in sequences.iter().flatten() {
        *counts.entry(item.as_ref().to_string()).or_default() += 1;
    }
    counts
}

/// Tag bigram counts including `START -> first` and `last -> END`.
pub fn bigram_counts<A: AsRef<str>>(sequences: &[Vec<A>]) -> PairCounts {
    let mut counts = PairCounts::default();
    for seq in sequences.iter().filter(|s| !s.is_empty()) {
        let mut prev = START;
        for tag in seq {
            counts.add(prev, tag.as_ref());
            prev = tag.as_ref();
        }
        counts.add(prev, END);
    }
    counts
}

pub fn starting_counts<A: AsRef<str>>(sequences: &[Vec<A>]) -> Counter {
    let mut counts = Counter::new();
    for first in sequences.iter().filter_map(|s| s.first()) {
        *counts.entry(first.as_ref().to_string()).or_default() += 1;
    }
    counts
}

pub fn ending_counts<A: AsRef<str>>(sequences: &[Vec<A>]) -> Counter {
    let mut counts = Counter::new();
    for last in sequences.iter().filter_map(|s| s.last()) {
        *counts.entry(last.as_ref().to_string()).or_default() += 1;
    }
    counts
}
