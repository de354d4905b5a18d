use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Emission used for a word that no tag emitted during training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenWordPolicy {
    /// `1 / |tags|` under every tag, leaving the choice to the transitions.
    Uniform,
    /// The same constant probability under every tag.
    Floor(f64),
}

impl Default for UnseenWordPolicy {
    fn default() -> Self {
        Self::Uniform
    }
}

impl Display for UnseenWordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Floor(p) => write!(f, "floor:{p}"),
        }
    }
}

/// Accepts `uniform`, `floor:<p>` or a bare probability.
impl FromStr for UnseenWordPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("uniform") {
            return Ok(Self::Uniform);
        }
        let p = s.strip_prefix("floor:").unwrap_or(s);
        let p = parse_probability("unseen_word", p)?;
        if p == 0.0 {
            return Err(Error::InvalidParameter("unseen_word floor must be positive".to_string()));
        }
        Ok(Self::Floor(p))
    }
}

fn parse_probability(name: &str, value: &str) -> Result<f64> {
    let p: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidParameter(format!("{name}: not a number: {value}")))?;
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::InvalidParameter(format!("{name}: {p} is not a probability")));
    }
    Ok(p)
}

/// Smoothing applied by the Viterbi decoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub unseen_word: UnseenWordPolicy,
    /// Probability for transitions never observed in training. Zero keeps
    /// them impossible, and a sentence that needs one then has no path.
    pub transition_floor: f64,
}

/// Small enough that an observed transition always wins over an unseen one.
pub const DEFAULT_TRANSITION_FLOOR: f64 = 1e-6;

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { unseen_word: UnseenWordPolicy::Uniform, transition_floor: DEFAULT_TRANSITION_FLOOR }
    }
}

impl DecodeOptions {
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name.trim() {
            "unseen_word" => self.unseen_word = value.parse()?,
            "transition_floor" => self.transition_floor = parse_probability(name, value)?,
            _ => return Err(Error::InvalidParameter(format!("unknown parameter: {name}"))),
        }
        log::debug!("set {name} = {value}");
        Ok(())
    }

    /// Applies `name=value` pairs in order.
    pub fn from_params<S: AsRef<str>>(params: &[S]) -> Result<Self> {
        let mut options = Self::default();
        for param in params {
            let param = param.as_ref();
            let (name, value) = param
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter(format!("expected name=value: {param}")))?;
            options.set(name, value)?;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = DecodeOptions::default();
        assert_eq!(o.unseen_word, UnseenWordPolicy::Uniform);
        assert_eq!(o.transition_floor, DEFAULT_TRANSITION_FLOOR);
        let strict = DecodeOptions::from_params(&["transition_floor=0"]).unwrap();
        assert_eq!(strict.transition_floor, 0.0);
    }

    #[test]
    fn set_by_name() {
        let o = DecodeOptions::from_params(&["unseen_word=floor:1e-4", "transition_floor=0.001"]).unwrap();
        assert_eq!(o.unseen_word, UnseenWordPolicy::Floor(1e-4));
        assert_eq!(o.transition_floor, 0.001);
        let o = DecodeOptions::from_params(&["unseen_word=0.5"]).unwrap();
        assert_eq!(o.unseen_word, UnseenWordPolicy::Floor(0.5));
    }

    #[test]
    fn rejects_bad_params() {
        for p in ["smoothing=1", "transition_floor=2", "transition_floor=x", "unseen_word=0", "unseen_word"] {
            assert!(
                matches!(DecodeOptions::from_params(&[p]), Err(Error::InvalidParameter(_))),
                "{p}"
            );
        }
    }

    #[test]
    fn serde_defaults_missing_fields() {
        let o: DecodeOptions = serde_json::from_str(r#"{"transition_floor":0.01}"#).unwrap();
        assert_eq!(o.unseen_word, UnseenWordPolicy::Uniform);
        let json = serde_json::to_string(&DecodeOptions { unseen_word: UnseenWordPolicy::Floor(0.1), transition_floor: 0.0 }).unwrap();
        assert_eq!(json, r#"{"unseen_word":{"floor":0.1},"transition_floor":0.0}"#);
    }
}
