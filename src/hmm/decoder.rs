use crate::{
    quark::StringTable,
    tagger::{Decoded, Tagger, END, START},
    Error, Result,
};

use super::{
    lattice::Lattice,
    options::{DecodeOptions, UnseenWordPolicy},
    HmmModel,
};

fn ln_or_floor(p: Option<f64>, floor: f64) -> f64 {
    match p {
        Some(p) if p > 0.0 => p.ln(),
        _ if floor > 0.0 => floor.ln(),
        _ => f64::NEG_INFINITY,
    }
}

/// Viterbi decoder over an [`HmmModel`].
///
/// Holds the log transition matrix; every call to `decode` builds its own
/// lattice, so one decoder can serve many threads.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder<'a> {
    model: &'a HmmModel,
    options: DecodeOptions,
    /// `[L+1][L+1]` log transitions; the START row and END column come last.
    trans: Vec<f64>,
}

impl<'a> ViterbiDecoder<'a> {
    pub fn new(model: &'a HmmModel) -> Self {
        Self::with_options(model, DecodeOptions::default())
    }

    pub fn with_options(model: &'a HmmModel, options: DecodeOptions) -> Self {
        let tags = model.tags();
        let l = tags.len();
        let w = l + 1;
        let name = |i: usize, sentinel: &'static str| tags.to_str(i).unwrap_or(sentinel);
        let mut trans = vec![f64::NEG_INFINITY; w * w];
        for i in 0..w {
            for j in 0..w {
                if i == l && j == l {
                    continue;
                }
                let p = model.transition().prob(name(i, START), name(j, END));
                trans[w * i + j] = ln_or_floor(p, options.transition_floor);
            }
        }
        Self { model, options, trans }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    fn lattice(&self, words: &[&str]) -> Lattice {
        let tags = self.model.tags();
        let l = tags.len();
        let mut lattice = Lattice::new(l, words.len());
        for (t, word) in words.iter().enumerate() {
            let row = &mut lattice.state[l * t..l * (t + 1)];
            if self.model.emission().knows(word) {
                for (j, tag) in tags.iter().enumerate() {
                    row[j] = ln_or_floor(self.model.emission().prob(tag, word), 0.0);
                }
            } else {
                let p = match self.options.unseen_word {
                    UnseenWordPolicy::Uniform => 1.0 / l as f64,
                    UnseenWordPolicy::Floor(p) => p,
                };
                log::debug!("unseen word {word:?} at {t}, emission {p}");
                row.fill(p.ln());
            }
        }
        lattice
    }

    /// Log joint probability of `words` under a given tag path.
    ///
    /// Tags outside the model's vocabulary make the path impossible.
    pub fn score(&self, words: &[&str], tags: &[&str]) -> Result<f64> {
        if words.len() != tags.len() {
            return Err(Error::MalformedInput(format!(
                "{} words but {} tags",
                words.len(),
                tags.len()
            )));
        }
        let ids: Option<Vec<usize>> = tags.iter().map(|t| self.model.tags().to_id(t)).collect();
        let Some(ids) = ids else {
            return Ok(f64::NEG_INFINITY);
        };
        if words.is_empty() {
            return Ok(0.0);
        }
        Ok(self.lattice(words).score(&self.trans, &ids))
    }
}

impl Tagger for ViterbiDecoder<'_> {
    fn decode(&self, words: &[&str]) -> Result<Decoded> {
        if words.is_empty() {
            return Ok(Decoded::new(0.0, Vec::new()));
        }
        let mut lattice = self.lattice(words);
        let mut labels = vec![0; lattice.num_items()];
        let log_prob = lattice.viterbi(&self.trans, &mut labels);
        if log_prob == f64::NEG_INFINITY {
            log::debug!("no viterbi path for {} words", words.len());
            return Err(Error::NoViterbiPath);
        }
        let tags = self.model.tags();
        let path = labels
            .into_iter()
            .map(|i| tags.to_str(i).map(str::to_string).ok_or(Error::NoViterbiPath))
            .collect::<Result<Vec<_>>>()?;
        Ok(Decoded::new(log_prob, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> HmmModel {
        let tags = vec![vec!["DET", "NOUN", "VERB"], vec!["DET", "NOUN", "NOUN", "VERB"], vec!["NOUN", "VERB"]];
        let words = vec![vec!["the", "dog", "barks"], vec!["the", "dog", "house", "stands"], vec!["dogs", "bark"]];
        HmmModel::estimate(&tags, &words).unwrap()
    }

    #[test]
    fn decodes_training_sentence() {
        let m = model();
        let decoder = ViterbiDecoder::new(&m);
        let d = decoder.decode(&["the", "dog", "barks"]).unwrap();
        assert_eq!(d.path, [START, "DET", "NOUN", "VERB", END]);
        assert!(d.log_prob < 0.0);
        let gold = decoder.score(&["the", "dog", "barks"], &["DET", "NOUN", "VERB"]).unwrap();
        assert!((gold - d.log_prob).abs() < 1e-12);
    }

    #[test]
    fn context_disambiguates() {
        let m = model();
        let decoder = ViterbiDecoder::new(&m);
        // "sleeps" is unseen; NOUN -> END never occurs, VERB -> END always does
        let tags = decoder.tag(&["the", "dog", "sleeps"]).unwrap();
        assert_eq!(tags, ["DET", "NOUN", "VERB"]);
    }

    #[test]
    fn unseen_floor_policy() {
        let m = model();
        let options = DecodeOptions { unseen_word: UnseenWordPolicy::Floor(1e-3), ..Default::default() };
        let decoder = ViterbiDecoder::with_options(&m, options);
        let d = decoder.decode(&["cats", "bark"]).unwrap();
        assert_eq!(d.tags(), ["NOUN", "VERB"]);
    }

    #[test]
    fn impossible_sentence() {
        let m = model();
        let strict = ViterbiDecoder::with_options(&m, DecodeOptions { transition_floor: 0.0, ..Default::default() });
        // "barks" is only a VERB, and VERB never precedes DET
        assert!(matches!(strict.decode(&["barks", "the"]), Err(Error::NoViterbiPath)));
        let d = ViterbiDecoder::new(&m).decode(&["barks", "the"]).unwrap();
        assert_eq!(d.tags(), ["VERB", "DET"]);
        assert!(d.log_prob.is_finite());
    }

    #[test]
    fn empty_sentence() {
        let m = model();
        let d = ViterbiDecoder::new(&m).decode(&[]).unwrap();
        assert_eq!(d.path, [START, END]);
        assert_eq!(d.log_prob, 0.0);
    }

    #[test]
    fn score_rejects_misaligned() {
        let m = model();
        let decoder = ViterbiDecoder::new(&m);
        assert!(decoder.score(&["the"], &[]).is_err());
        assert_eq!(decoder.score(&["the"], &["ADJ"]).unwrap(), f64::NEG_INFINITY);
    }
}
