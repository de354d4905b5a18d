use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{counts::PairCounts, Error, Result};

pub type Distribution = BTreeMap<String, f64>;

/// Row-normalized conditional probabilities `P(outcome | given)`.
///
/// Only outcomes with a nonzero count are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    rows: BTreeMap<String, Distribution>,
}

impl ProbabilityTable {
    pub fn from_counts(counts: &PairCounts) -> Self {
        let mut rows = BTreeMap::new();
        for (given, row) in counts.iter() {
            let total: u64 = row.values().sum();
            if total == 0 {
                continue;
            }
            let dist: Distribution = row
                .iter()
                .filter(|(_, &n)| n > 0)
                .map(|(outcome, &n)| (outcome.clone(), n as f64 / total as f64))
                .collect();
            rows.insert(given.to_string(), dist);
        }
        Self { rows }
    }

    pub fn prob(&self, given: &str, outcome: &str) -> Option<f64> {
        self.rows.get(given)?.get(outcome).copied()
    }

    pub fn row(&self, given: &str) -> Option<&Distribution> {
        self.rows.get(given)
    }

    pub fn row_sum(&self, given: &str) -> f64 {
        self.row(given).map(|r| r.values().sum()).unwrap_or(0.0)
    }

    pub fn givens(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `P(word | tag)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProbabilityTable", into = "ProbabilityTable")]
pub struct EmissionModel {
    table: ProbabilityTable,
    vocab: HashSet<String>,
}

impl From<ProbabilityTable> for EmissionModel {
    fn from(table: ProbabilityTable) -> Self {
        let vocab = table.rows.values().flat_map(|r| r.keys().cloned()).collect();
        Self { table, vocab }
    }
}

impl From<EmissionModel> for ProbabilityTable {
    fn from(value: EmissionModel) -> Self {
        value.table
    }
}

impl EmissionModel {
    /// Normalizes `tag -> word -> count` per tag.
    pub fn from_counts(counts: &PairCounts) -> Result<Self> {
        if counts.total() == 0 {
            return Err(Error::EmptyModel);
        }
        Ok(ProbabilityTable::from_counts(counts).into())
    }

    pub fn prob(&self, tag: &str, word: &str) -> Option<f64> {
        self.table.prob(tag, word)
    }

    /// Whether any tag ever emitted `word`.
    pub fn knows(&self, word: &str) -> bool {
        self.vocab.contains(word)
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.givens()
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }
}

/// `P(tag | previous tag)`, where the previous tag may be START and the
/// current one may be END.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionModel {
    table: ProbabilityTable,
}

impl TransitionModel {
    pub fn from_counts(bigrams: &PairCounts) -> Result<Self> {
        if bigrams.total() == 0 {
            return Err(Error::EmptyModel);
        }
        Ok(Self { table: ProbabilityTable::from_counts(bigrams) })
    }

    pub fn prob(&self, prev: &str, tag: &str) -> Option<f64> {
        self.table.prob(prev, tag)
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        counts::{bigram_counts, pair_counts},
        tagger::{END, START},
    };

    const EPS: f64 = 1e-9;

    fn sample() -> (Vec<Vec<&'static str>>, Vec<Vec<&'static str>>) {
        let tags = vec![vec!["DET", "NOUN", "VERB"], vec!["NOUN", "VERB", "NOUN"], vec!["DET", "ADJ", "NOUN"]];
        let words = vec![vec!["the", "dog", "barks"], vec!["time", "flies", "time"], vec!["a", "red", "dog"]];
        (tags, words)
    }

    #[test]
    fn emission_rows_sum_to_one() {
        let (tags, words) = sample();
        let em = EmissionModel::from_counts(&pair_counts(&tags, &words).unwrap()).unwrap();
        for tag in em.tags() {
            assert!((em.table().row_sum(tag) - 1.0).abs() < EPS, "{tag}");
        }
        assert!((em.prob("NOUN", "time").unwrap() - 0.5).abs() < EPS);
        assert!((em.prob("NOUN", "dog").unwrap() - 0.5).abs() < EPS);
        assert_eq!(em.prob("VERB", "dog"), None);
        assert!(em.knows("flies"));
        assert!(!em.knows("cat"));
        assert_eq!(em.vocab_len(), 7);
    }

    #[test]
    fn transition_rows_sum_to_one() {
        let (tags, _) = sample();
        let tm = TransitionModel::from_counts(&bigram_counts(&tags)).unwrap();
        for given in tm.table().givens() {
            assert!((tm.table().row_sum(given) - 1.0).abs() < EPS, "{given}");
        }
        assert!((tm.prob(START, "DET").unwrap() - 2.0 / 3.0).abs() < EPS);
        assert!((tm.prob("NOUN", "VERB").unwrap() - 0.5).abs() < EPS);
        assert!((tm.prob("NOUN", END).unwrap() - 0.5).abs() < EPS);
        assert_eq!(tm.prob("ADJ", "VERB"), None);
        assert_eq!(tm.table().row(END), None);
    }

    #[test]
    fn empty_counts() {
        let empty = PairCounts::default();
        assert!(matches!(EmissionModel::from_counts(&empty), Err(Error::EmptyModel)));
        assert!(matches!(TransitionModel::from_counts(&empty), Err(Error::EmptyModel)));
    }

    #[test]
    fn emission_vocab_rebuilt_on_load() {
        let (tags, words) = sample();
        let em = EmissionModel::from_counts(&pair_counts(&tags, &words).unwrap()).unwrap();
        let json = serde_json::to_string(&em).unwrap();
        let back: EmissionModel = serde_json::from_str(&json).unwrap();
        assert!(back.knows("barks"));
        assert_eq!(back, em);
    }
}
