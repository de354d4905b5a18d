//! Hidden Markov Model tagger.
//!
//! Hidden states are tags, observations are words. Parameters are maximum
//! likelihood estimates from counts; decoding is Viterbi in log space.

pub mod decoder;
pub mod estimator;
mod lattice;
pub mod options;
pub mod trainer;

use serde::{Deserialize, Serialize};

use crate::{
    counts::{bigram_counts, pair_counts, PairCounts},
    quark::{Quark, StringTable},
    tagger::is_sentinel,
    Error, Result,
};

use self::{
    decoder::ViterbiDecoder,
    estimator::{EmissionModel, TransitionModel},
    options::DecodeOptions,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmModel {
    /// Tags in lexicographic order; the decoder indexes states by position.
    tags: Quark,
    emission: EmissionModel,
    transition: TransitionModel,
}

impl HmmModel {
    /// Builds a model from `tag -> word` emission counts and tag bigram
    /// counts that include the START/END sentinels.
    pub fn from_counts(emission_counts: &PairCounts, transition_counts: &PairCounts) -> Result<Self> {
        if let Some(tag) = emission_counts.keys().find(|t| is_sentinel(t)) {
            return Err(Error::MalformedInput(format!("reserved tag name: {tag}")));
        }
        let emission = EmissionModel::from_counts(emission_counts)?;
        let transition = TransitionModel::from_counts(transition_counts)?;
        let tags: Quark = emission.tags().collect();
        log::info!(
            "estimated hmm (tags: {}, words: {}, transitions: {})",
            tags.len(),
            emission.vocab_len(),
            transition_counts.total()
        );
        Ok(Self { tags, emission, transition })
    }

    /// Counts and normalizes aligned tag and word sequences in one step.
    pub fn estimate<A: AsRef<str>, B: AsRef<str>>(tags: &[Vec<A>], words: &[Vec<B>]) -> Result<Self> {
        let emission_counts = pair_counts(tags, words)?;
        Self::from_counts(&emission_counts, &bigram_counts(tags))
    }

    pub fn tags(&self) -> &Quark {
        &self.tags
    }

    pub fn emission(&self) -> &EmissionModel {
        &self.emission
    }

    pub fn transition(&self) -> &TransitionModel {
        &self.transition
    }

    pub fn decoder(&self, options: DecodeOptions) -> ViterbiDecoder<'_> {
        ViterbiDecoder::with_options(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_sorted() {
        let m = HmmModel::estimate(&[vec!["VERB", "ADV", "NOUN"]], &[vec!["go", "now", "home"]]).unwrap();
        assert_eq!(m.tags().iter().collect::<Vec<_>>(), ["ADV", "NOUN", "VERB"]);
        assert_eq!(m.tags().to_id("VERB"), Some(2));
    }

    #[test]
    fn empty_training_data() {
        let none: Vec<Vec<&str>> = Vec::new();
        assert!(matches!(HmmModel::estimate(&none, &none), Err(Error::EmptyModel)));
        let blank: Vec<Vec<&str>> = vec![vec![]];
        assert!(matches!(HmmModel::estimate(&blank, &blank), Err(Error::EmptyModel)));
    }

    #[test]
    fn sentinel_tag_in_training_data() {
        let r = HmmModel::estimate(&[vec!["DET", "<end>"]], &[vec!["the", "dog"]]);
        assert!(matches!(r, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn misaligned_training_data() {
        let r = HmmModel::estimate(&[vec!["DET"]], &[vec!["the", "dog"]]);
        assert!(matches!(r, Err(Error::MalformedInput(_))));
    }
}
