//! Per-key outcomes and the summary of a reconciliation run.

use serde::Serialize;
use std::path::PathBuf;

use super::{CiteKey, ProviderClass};

/// Why a missing key could not be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The literature search returned zero or several hits
    Ambiguous,
    /// The provider had no usable record for the key
    NotFound,
    /// Network, HTTP, or decoding failure
    Transport,
    /// The record was fetched but could not be appended
    Write,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Ambiguous => "ambiguous result",
            FailureKind::NotFound => "not found",
            FailureKind::Transport => "transport error",
            FailureKind::Write => "write error",
        };
        f.write_str(label)
    }
}

/// Terminal state of one missing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeyStatus {
    Appended,
    Failed { kind: FailureKind, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyOutcome {
    pub key: CiteKey,
    pub class: ProviderClass,
    #[serde(flatten)]
    pub status: KeyStatus,
}

impl KeyOutcome {
    pub fn appended(key: CiteKey, class: ProviderClass) -> Self {
        Self {
            key,
            class,
            status: KeyStatus::Appended,
        }
    }

    pub fn failed(
        key: CiteKey,
        class: ProviderClass,
        kind: FailureKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            key,
            class,
            status: KeyStatus::Failed {
                kind,
                reason: reason.into(),
            },
        }
    }

    pub fn is_appended(&self) -> bool {
        matches!(self.status, KeyStatus::Appended)
    }

    /// Failure kind, or `None` when the record was appended.
    pub fn failure(&self) -> Option<FailureKind> {
        match &self.status {
            KeyStatus::Appended => None,
            KeyStatus::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Summary of one run over a reference list and a bibliography.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub aux_path: PathBuf,
    pub bib_path: PathBuf,
    /// Citations found in the reference list, duplicates included
    pub aux_key_count: usize,
    /// Entries found in the bibliography
    pub bib_key_count: usize,
    /// Cited but absent from the bibliography; these are fetched
    pub missing: Vec<CiteKey>,
    /// In the bibliography but never cited; reported only
    pub dangling: Vec<CiteKey>,
    /// One entry per missing key, in completion order
    pub outcomes: Vec<KeyOutcome>,
}

impl RunReport {
    pub fn appended(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_appended()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.appended()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}
