//! Part-of-speech tagging from a tagged corpus.
//!
//! Two taggers share the [`Tagger`] interface: a most-frequent-class
//! baseline ([`MfcTagger`]) and a hidden Markov model decoded with Viterbi
//! ([`ViterbiDecoder`]). Both are trained from the same counts by a
//! [`Trainer`].

pub mod counts;
pub mod dataset;
mod error;
pub mod evaluation;
pub mod hmm;
pub mod mfc;
pub mod model;
pub mod quark;
pub mod tagger;

pub use counts::{pair_counts, PairCounts};
pub use dataset::{Corpus, TaggedSentence};
pub use error::{Error, Result};
pub use evaluation::{evaluate_tagger, Estimation, Evaluation};
pub use hmm::{
    decoder::ViterbiDecoder,
    options::{DecodeOptions, UnseenWordPolicy},
    trainer::Trainer,
    HmmModel,
};
pub use mfc::{MfcTable, MfcTagger};
pub use model::{Model, TaggerKind};
pub use tagger::{Decoded, Tagger, END, MISSING, START};
