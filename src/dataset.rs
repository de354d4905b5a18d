use std::{
    collections::{BTreeSet, HashMap},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{Error, Result};

/// One sentence as two aligned vectors of words and tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedSentence {
    words: Vec<String>,
    tags: Vec<String>,
}

impl TaggedSentence {
    pub fn new(words: Vec<String>, tags: Vec<String>) -> Result<Self> {
        if words.len() != tags.len() {
            return Err(Error::MalformedInput(format!(
                "sentence has {} words but {} tags",
                words.len(),
                tags.len()
            )));
        }
        Ok(Self { words, tags })
    }

    fn push(&mut self, word: &str, tag: &str) {
        self.words.push(word.to_string());
        self.tags.push(tag.to_string());
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.words.iter().zip(&self.tags).map(|(w, t)| (w.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parses the `word/TAG word/TAG` notation. The tag is taken after the last `/`.
impl FromStr for TaggedSentence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut sentence = TaggedSentence::default();
        for token in s.split_whitespace() {
            match token.rsplit_once('/') {
                Some((word, tag)) if !word.is_empty() && !tag.is_empty() => sentence.push(word, tag),
                _ => return Err(Error::MalformedInput(format!("missing tag in token: {token}"))),
            }
        }
        Ok(sentence)
    }
}

/// Sentences keyed by identifier, in the order they were read.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    sentences: Vec<(String, TaggedSentence)>,
    index: HashMap<String, usize>,
}

impl Corpus {
    pub fn insert(&mut self, key: impl Into<String>, sentence: TaggedSentence) -> Result<()> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(Error::MalformedInput(format!("duplicate sentence id: {key}")));
        }
        self.index.insert(key.clone(), self.sentences.len());
        self.sentences.push((key, sentence));
        Ok(())
    }

    /// Reads blank-line separated blocks of `word<TAB>tag` lines.
    ///
    /// A block whose first line has no TAB uses that line as its id.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut corpus = Corpus::default();
        let mut key: Option<String> = None;
        let mut sentence = TaggedSentence::default();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                corpus.flush(&mut key, &mut sentence)?;
            } else if let Some((word, tag)) = line.split_once('\t') {
                let (word, tag) = (word.trim(), tag.trim());
                if word.is_empty() || tag.is_empty() || tag.contains('\t') {
                    log::warn!("invalid line: {line}");
                } else {
                    sentence.push(word, tag);
                }
            } else if key.is_none() && sentence.is_empty() {
                key = Some(line.trim().to_string());
            } else {
                log::warn!("invalid line: {line}");
            }
        }
        corpus.flush(&mut key, &mut sentence)?;
        log::info!("read corpus (sentences: {}, tokens: {})", corpus.len(), corpus.n());
        Ok(corpus)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_from(File::open(path)?)
    }

    fn flush(&mut self, key: &mut Option<String>, sentence: &mut TaggedSentence) -> Result<()> {
        let key = key.take();
        if sentence.is_empty() {
            if let Some(key) = key {
                log::warn!("sentence {key} has no tagged words");
            }
            return Ok(());
        }
        let key = key.unwrap_or_else(|| format!("s{}", self.len()));
        self.insert(key, std::mem::take(sentence))
    }

    pub fn get(&self, key: &str) -> Option<&TaggedSentence> {
        self.index.get(key).map(|&i| &self.sentences[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedSentence)> + '_ {
        self.sentences.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn sentences(&self) -> impl Iterator<Item = &TaggedSentence> + '_ {
        self.sentences.iter().map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Word sequences, one per sentence.
    pub fn x(&self) -> Vec<Vec<&str>> {
        self.sentences()
            .map(|s| s.words.iter().map(String::as_str).collect())
            .collect()
    }

    /// Tag sequences, aligned with [`Corpus::x`].
    pub fn y(&self) -> Vec<Vec<&str>> {
        self.sentences()
            .map(|s| s.tags.iter().map(String::as_str).collect())
            .collect()
    }

    pub fn vocab(&self) -> BTreeSet<&str> {
        self.stream().map(|(w, _)| w).collect()
    }

    pub fn tagset(&self) -> BTreeSet<&str> {
        self.stream().map(|(_, t)| t).collect()
    }

    /// Total number of tokens.
    pub fn n(&self) -> usize {
        self.sentences().map(TaggedSentence::len).sum()
    }

    pub fn max_length(&self) -> usize {
        self.sentences().map(TaggedSentence::len).max().unwrap_or_default()
    }

    pub fn stream(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.sentences().flat_map(TaggedSentence::pairs)
    }

    /// Splits into (train, test): the first `round(len * ratio)` sentences train.
    pub fn split(&self, ratio: f64) -> Result<(Corpus, Corpus)> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(Error::InvalidParameter(format!("split ratio must be in (0, 1]: {ratio}")));
        }
        let cut = ((self.len() as f64) * ratio).round() as usize;
        let mut train = Corpus::default();
        let mut test = Corpus::default();
        for (i, (key, sentence)) in self.sentences.iter().enumerate() {
            let part = if i < cut { &mut train } else { &mut test };
            part.insert(key.clone(), sentence.clone())?;
        }
        Ok((train, test))
    }

    pub fn extend(&mut self, other: Corpus) -> Result<()> {
        for (key, sentence) in other.sentences {
            self.insert(key, sentence)?;
        }
        Ok(())
    }
}

impl TryFrom<File> for Corpus {
    type Error = Error;

    fn try_from(value: File) -> Result<Self> {
        Self::from_reader(BufReader::new(value))
    }
}

/// Reads a tag set file: one label per line, blank lines ignored.
pub fn read_tags<R: BufRead>(reader: R) -> Result<BTreeSet<String>> {
    let mut tags = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let tag = line.trim();
        if !tag.is_empty() {
            tags.insert(tag.to_string());
        }
    }
    Ok(tags)
}
