//! Metadata providers that turn a citation key into a BibTeX record.
//!
//! Each provider implements the [`Source`] trait and serves one
//! [`ProviderClass`]. The [`SourceRegistry`] maps classes to providers and is
//! the single entry point used by the reconciliation engine:
//!
//! - [`InspireSource`]: INSPIRE-HEP literature search, then the BibTeX export
//!   of the single hit
//! - [`AdsSource`]: NASA ADS export page, scraped for the BibTeX text
//! - [`MockSource`]: canned responses for tests
//!
//! # Adding a provider
//!
//! Implement [`Source`], return the class it serves from
//! [`Source::class`], and register it with [`SourceRegistry::register`]. A
//! registered provider replaces any previous one for the same class.

mod ads;
mod inspire;
mod registry;

pub mod mock;

pub use ads::AdsSource;
pub use inspire::InspireSource;
pub use mock::MockSource;
pub use registry::SourceRegistry;

use crate::models::{BibRecord, CiteKey, FailureKind, ProviderClass};
use async_trait::async_trait;

/// The interface every metadata provider implements.
///
/// Lookups are idempotent and carry no ordering dependency on each other, so
/// the engine runs many of them at once.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "inspire", "ads")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// The key class this source resolves
    fn class(&self) -> ProviderClass;

    /// Fetch the BibTeX record for `key`
    async fn fetch(&self, key: &CiteKey) -> Result<BibRecord, SourceError>;
}

/// Errors that can occur when resolving a key against a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The literature search did not return exactly one hit
    #[error("found {count} results for key {key}, require exactly 1")]
    Ambiguous { key: String, count: u64 },

    /// The provider has no usable record for the key
    #[error("no record for key {key}: {detail}")]
    NotFound { key: String, detail: String },

    /// Network failure, timeout, or unexpected HTTP status
    #[error("network error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// No source is registered for the key's class
    #[error("no source registered for {0} keys")]
    Unsupported(ProviderClass),
}

impl SourceError {
    /// Coarse classification used in run reports
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Ambiguous { .. } => FailureKind::Ambiguous,
            SourceError::NotFound { .. } | SourceError::Unsupported(_) => FailureKind::NotFound,
            SourceError::Transport(_) | SourceError::Parse(_) => FailureKind::Transport,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Transport(format!("request timed out: {}", err))
        } else if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

/// Turn a non-success status into the matching error, keeping 404 distinct.
pub(crate) fn check_status(
    response: reqwest::Response,
    key: &CiteKey,
    provider: &str,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound {
            key: key.to_string(),
            detail: format!("{} returned 404", provider),
        });
    }
    Err(SourceError::Transport(format!(
        "{} returned status {} for key {}",
        provider, status, key
    )))
}
