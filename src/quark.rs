use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interned labels, indexed in insertion order.
///
/// Serialized as the plain list of labels; the reverse index is rebuilt on load.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let mut quark = Quark::default();
        for s in &value {
            quark.find_or_insert(s);
        }
        quark
    }
}

impl From<Quark> for Vec<String> {
    fn from(value: Quark) -> Self {
        value.v
    }
}

impl<S: AsRef<str>> FromIterator<S> for Quark {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut quark = Quark::default();
        for s in iter {
            quark.find_or_insert(s.as_ref());
        }
        quark
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl Quark {
    pub fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&id) = self.m.get(key) {
            return id;
        }
        let id = self.v.len();
        self.m.insert(key.to_string(), id);
        self.v.push(key.to_string());
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.v.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.m.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_str() {
        let mut quark = Quark::default();
        for (s, id) in [("NOUN", 0), ("VERB", 1), ("DET", 2), ("VERB", 1), ("NOUN", 0), ("ADJ", 3)] {
            assert_eq!(id, quark.find_or_insert(s), "{} != {}", s, id);
        }
        assert_eq!(quark.len(), 4);
    }

    #[test]
    fn find_by_id() {
        let quark: Quark = ["DET", "NOUN"].into_iter().collect();
        assert_eq!(quark.to_str(0), Some("DET"));
        assert_eq!(quark.to_str(1), Some("NOUN"));
        assert_eq!(quark.to_str(2), None);
        assert_eq!(quark.to_id("NOUN"), Some(1));
        assert_eq!(quark.to_id("VERB"), None);
    }

    #[test]
    fn reverse_index_survives_serde() {
        let quark: Quark = ["ADP", "DET", "NOUN"].into_iter().collect();
        let json = serde_json::to_string(&quark).unwrap();
        assert_eq!(json, r#"["ADP","DET","NOUN"]"#);
        let back: Quark = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_id("NOUN"), Some(2));
        assert_eq!(back, quark);
    }
}
