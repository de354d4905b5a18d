use crate::Result;

/// Sentinel opening every decoded path.
pub const START: &str = "<start>";
/// Sentinel closing every decoded path.
pub const END: &str = "<end>";
/// Tag assigned by the baseline to words it never saw.
pub const MISSING: &str = "<MISSING>";

/// Whether a corpus tag would collide with a transition sentinel.
pub fn is_sentinel(tag: &str) -> bool {
    tag == START || tag == END
}

/// Result of decoding one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Natural log of the joint probability of the path and the words.
    pub log_prob: f64,
    /// `[START, t_1, .., t_n, END]`.
    pub path: Vec<String>,
}

impl Decoded {
    pub fn new(log_prob: f64, tags: impl IntoIterator<Item = String>) -> Self {
        let mut path = vec![START.to_string()];
        path.extend(tags);
        path.push(END.to_string());
        Self { log_prob, path }
    }

    /// The path without its sentinels.
    pub fn tags(&self) -> &[String] {
        &self.path[1..self.path.len() - 1]
    }

    pub fn into_tags(mut self) -> Vec<String> {
        self.path.pop();
        self.path.remove(0);
        self.path
    }
}

pub trait Tagger {
    /// Finds the best tag path for `words`.
    fn decode(&self, words: &[&str]) -> Result<Decoded>;

    fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
        self.decode(words).map(Decoded::into_tags)
    }
}
