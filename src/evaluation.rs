use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::{
    dataset::{Corpus, TaggedSentence},
    tagger::{Decoded, Tagger, MISSING},
    Error, Result,
};

/// Tag-wise performance values.
#[derive(Debug, Default, Clone)]
struct TagMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /// Number of occurrences of the tag in the reference data.
    num_observation: usize,
    /// Number of predictions.
    num_prediction: usize,
    precision: f64,
    recall: f64,
    fmeasure: f64,
}

/// Accuracy of predicted tag sequences against reference ones.
#[derive(Debug, Default, Clone)]
pub struct Evaluation {
    tbl: BTreeMap<String, TagMeasure>,

    /// Number of correctly tagged tokens.
    item_total_correct: usize,
    /// Total number of tokens.
    item_total_num: usize,
    item_accuracy: f64,

    /// Number of sentences tagged without a single error.
    inst_total_correct: usize,
    inst_total_num: usize,
    inst_accuracy: f64,

    macro_precision: f64,
    macro_recall: f64,
    macro_fmeasure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
    /// Token-level accuracy.
    pub accuracy: f64,
    /// Share of sentences tagged entirely right.
    pub sentence_accuracy: f64,
}

impl Evaluation {
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(&mut self, reference: &[R], prediction: &[P]) {
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
        }
        self.item_total_num += reference.len();
        self.item_total_correct += matched;
        if matched == reference.len() && reference.len() == prediction.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    /// Decodes `sentence` and accumulates the prediction against its tags.
    ///
    /// Without any viterbi path the sentence is scored as all `MISSING` and
    /// `None` is returned.
    pub fn tag_sentence(&mut self, tagger: &dyn Tagger, key: &str, sentence: &TaggedSentence) -> Result<Option<Decoded>> {
        let words: Vec<&str> = sentence.words().iter().map(String::as_str).collect();
        match tagger.decode(&words) {
            Ok(decoded) => {
                self.accumulate(sentence.tags(), decoded.tags());
                Ok(Some(decoded))
            }
            Err(Error::NoViterbiPath) => {
                log::warn!("no viterbi path for sentence {key}");
                self.accumulate(sentence.tags(), &vec![MISSING; words.len()]);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn evaluate(&mut self) -> Estimation {
        let mut num_labels = 0;
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;
        for lev in self.tbl.values_mut() {
            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;
            /* Tags only ever predicted (e.g. MISSING) do not enter the averages. */
            if lev.num_observation == 0 {
                continue;
            }
            num_labels += 1;
            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }
        if num_labels > 0 {
            self.macro_precision /= num_labels as f64;
            self.macro_recall /= num_labels as f64;
            self.macro_fmeasure /= num_labels as f64;
        }

        if self.item_total_num > 0 {
            self.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            self.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        Estimation {
            precision: self.macro_precision,
            recall: self.macro_recall,
            fmeasure: self.macro_fmeasure,
            accuracy: self.item_accuracy,
            sentence_accuracy: self.inst_accuracy,
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by tag (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation, lev.precision, lev.recall, lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.6}, {:.6}, {:.6})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(f, "Item accuracy: {}/{} => {:.4}", self.item_total_correct, self.item_total_num, self.item_accuracy)?;
        writeln!(f, "Sentence accuracy: {}/{} => {:.4}", self.inst_total_correct, self.inst_total_num, self.inst_accuracy)
    }
}

/// Tags every sentence of `corpus` and scores the result.
///
/// A sentence without any viterbi path counts as entirely wrong.
pub fn evaluate_tagger(tagger: &dyn Tagger, corpus: &Corpus) -> Result<Evaluation> {
    let mut evaluation = Evaluation::default();
    for (key, sentence) in corpus.iter() {
        evaluation.tag_sentence(tagger, key, sentence)?;
    }
    Ok(evaluation)
}
