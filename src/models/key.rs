//! Citation keys and the provider class they are routed to.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A citation key as it appears in `\citation{...}` markers and BibTeX headers.
///
/// Keys are opaque: the only guarantees are that they are non-empty, carry no
/// surrounding whitespace, and contain no commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CiteKey(String);

impl CiteKey {
    /// Parse a raw token into a key, trimming whitespace.
    ///
    /// Returns `None` for empty tokens and tokens containing a comma.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains(',') {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CiteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CiteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CiteKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Which metadata provider a key is expected to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderClass {
    /// INSPIRE-HEP texkeys such as `Einstein:1916vd`
    InspireLike,
    /// ADS bibcodes such as `2016PhRvL.116f1102A`
    AdsLike,
}

impl ProviderClass {
    /// Returns the display name of the provider
    pub fn name(&self) -> &'static str {
        match self {
            ProviderClass::InspireLike => "INSPIRE-HEP",
            ProviderClass::AdsLike => "NASA ADS",
        }
    }

    /// Returns the short identifier used in logs and config
    pub fn id(&self) -> &'static str {
        match self {
            ProviderClass::InspireLike => "inspire",
            ProviderClass::AdsLike => "ads",
        }
    }
}

impl std::fmt::Display for ProviderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
