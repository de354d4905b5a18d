use crate::{
    counts::PairCounts,
    dataset::Corpus,
    mfc::MfcTable,
    tagger::{is_sentinel, END, START},
    Error, Result,
};

use super::HmmModel;

/// Accumulates every count the taggers need, one sentence at a time.
#[derive(Debug, Default)]
pub struct Trainer {
    /// tag -> word
    emission_counts: PairCounts,
    /// word -> tag
    word_counts: PairCounts,
    /// previous tag -> tag, with sentinels
    transition_counts: PairCounts,
    num_sentences: usize,
    num_tokens: usize,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append<A: AsRef<str>, B: AsRef<str>>(&mut self, words: &[A], tags: &[B]) -> Result<()> {
        if words.len() != tags.len() {
            return Err(Error::MalformedInput(format!(
                "{} words but {} tags",
                words.len(),
                tags.len()
            )));
        }
        if let Some(tag) = tags.iter().map(|t| t.as_ref()).find(|t| is_sentinel(t)) {
            return Err(Error::MalformedInput(format!("reserved tag name: {tag}")));
        }
        if words.is_empty() {
            log::debug!("skip empty sentence");
            return Ok(());
        }
        let mut prev = START;
        for (word, tag) in words.iter().zip(tags) {
            let (word, tag) = (word.as_ref(), tag.as_ref());
            self.emission_counts.add(tag, word);
            self.word_counts.add(word, tag);
            self.transition_counts.add(prev, tag);
            prev = tag;
        }
        self.transition_counts.add(prev, END);
        self.num_sentences += 1;
        self.num_tokens += words.len();
        Ok(())
    }

    pub fn append_corpus(&mut self, corpus: &Corpus) -> Result<()> {
        for sentence in corpus.sentences() {
            self.append(sentence.words(), sentence.tags())?;
        }
        log::info!("appended corpus (sentences: {}, tokens: {})", corpus.len(), corpus.n());
        Ok(())
    }

    pub fn emission_counts(&self) -> &PairCounts {
        &self.emission_counts
    }

    pub fn word_counts(&self) -> &PairCounts {
        &self.word_counts
    }

    pub fn transition_counts(&self) -> &PairCounts {
        &self.transition_counts
    }

    pub fn num_sentences(&self) -> usize {
        self.num_sentences
    }

    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    pub fn train(&self) -> Result<HmmModel> {
        if self.num_tokens == 0 {
            return Err(Error::EmptyModel);
        }
        log::info!("train hmm (N: {}, T: {})", self.num_sentences, self.num_tokens);
        HmmModel::from_counts(&self.emission_counts, &self.transition_counts)
    }

    pub fn mfc_table(&self) -> MfcTable {
        MfcTable::from_word_counts(&self.word_counts)
    }
}
