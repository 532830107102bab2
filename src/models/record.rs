//! Bibliography records fetched from a provider.

use serde::Serialize;

use crate::keys::parse_bib_header;

/// A formatted BibTeX entry, kept verbatim as the provider returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BibRecord(String);

impl BibRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Key declared in the record's `@type{key,` header, if any.
    pub fn cite_key(&self) -> Option<&str> {
        self.0.lines().find_map(parse_bib_header)
    }
}

impl std::fmt::Display for BibRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
