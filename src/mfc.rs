//! Most-frequent-class baseline: every word gets the tag it carried most
//! often in training, with no regard to context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    counts::PairCounts,
    tagger::{Decoded, Tagger, MISSING},
    Result,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfcTable {
    table: BTreeMap<String, String>,
}

impl MfcTable {
    /// Builds the table from `word -> tag -> count`.
    pub fn from_word_counts(word_counts: &PairCounts) -> Self {
        let table = word_counts
            .keys()
            .filter_map(|word| {
                word_counts
                    .most_frequent(word)
                    .map(|(tag, _)| (word.to_string(), tag.to_string()))
            })
            .collect();
        Self { table }
    }

    pub fn lookup(&self, word: &str) -> &str {
        match self.table.get(word) {
            Some(tag) => tag.as_str(),
            None => MISSING,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.table.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MfcTagger<'a> {
    table: &'a MfcTable,
}

impl<'a> MfcTagger<'a> {
    pub fn new(table: &'a MfcTable) -> Self {
        Self { table }
    }

    /// Tags each word on its own, bracketed by the path sentinels.
    pub fn tag(&self, words: &[&str]) -> Vec<String> {
        Decoded::new(0.0, words.iter().map(|w| self.table.lookup(w).to_string())).path
    }
}

impl Tagger for MfcTagger<'_> {
    fn decode(&self, words: &[&str]) -> Result<Decoded> {
        Ok(Decoded { log_prob: 0.0, path: self.tag(words) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        counts::pair_counts,
        tagger::{END, START},
    };

    fn table() -> MfcTable {
        let words = vec![vec!["time", "flies"], vec!["time", "is", "up"], vec!["flies", "time"]];
        let tags = vec![vec!["NOUN", "VERB"], vec!["NOUN", "VERB", "ADV"], vec!["NOUN", "VERB"]];
        MfcTable::from_word_counts(&pair_counts(&words, &tags).unwrap())
    }

    #[test]
    fn most_frequent_tag_wins() {
        let t = table();
        assert_eq!(t.len(), 4);
        assert_eq!(t.lookup("time"), "NOUN");
        assert_eq!(t.lookup("is"), "VERB");
        assert_eq!(t.lookup("up"), "ADV");
    }

    #[test]
    fn tie_is_deterministic() {
        // "flies" is NOUN once and VERB once
        assert_eq!(table().lookup("flies"), "NOUN");
    }

    #[test]
    fn unseen_word_is_missing() {
        let t = table();
        assert!(!t.contains("banana"));
        assert_eq!(t.lookup("banana"), MISSING);
    }

    #[test]
    fn tag_with_sentinels() {
        let t = table();
        let tagger = MfcTagger::new(&t);
        assert_eq!(tagger.tag(&["up", "banana"]), [START, "ADV", MISSING, END]);
        let decoded = tagger.decode(&["up"]).unwrap();
        assert_eq!(decoded.log_prob, 0.0);
        assert_eq!(decoded.tags(), ["ADV"]);
        assert_eq!(Tagger::tag(&tagger, &[]).unwrap(), Vec::<String>::new());
    }
}
