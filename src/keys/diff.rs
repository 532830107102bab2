//! Symmetric difference between cited keys and bibliography keys.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::CiteKey;

/// The two halves of the symmetric difference, each in first-seen order and
/// free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    /// Cited in the document but absent from the bibliography
    pub missing: Vec<CiteKey>,
    /// Present in the bibliography but never cited
    pub dangling: Vec<CiteKey>,
}

impl KeyDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.dangling.is_empty()
    }

    pub fn len(&self) -> usize {
        self.missing.len() + self.dangling.len()
    }

    /// `missing` followed by `dangling`.
    pub fn to_vec(&self) -> Vec<CiteKey> {
        self.missing.iter().chain(&self.dangling).cloned().collect()
    }
}

/// Split the symmetric difference of `aux_keys` and `bib_keys`.
pub fn split_diff(aux_keys: &[CiteKey], bib_keys: &[CiteKey]) -> KeyDiff {
    KeyDiff {
        missing: ordered_difference(aux_keys, bib_keys),
        dangling: ordered_difference(bib_keys, aux_keys),
    }
}

/// Keys in `aux_keys` but not in `bib_keys`, then keys in `bib_keys` but not in
/// `aux_keys`.
pub fn diff(aux_keys: &[CiteKey], bib_keys: &[CiteKey]) -> Vec<CiteKey> {
    split_diff(aux_keys, bib_keys).to_vec()
}

fn ordered_difference(from: &[CiteKey], exclude: &[CiteKey]) -> Vec<CiteKey> {
    let exclude: HashSet<&str> = exclude.iter().map(CiteKey::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();
    for key in from {
        if !exclude.contains(key.as_str()) && seen.insert(key.as_str()) {
            result.push(key.clone());
        }
    }
    result
}
