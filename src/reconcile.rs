//! Reconciliation engine.
//!
//! A run has two phases. [`Reconciler::plan`] reads the reference list and the
//! bibliography and splits their symmetric difference. [`Reconciler::execute`]
//! then resolves every missing key concurrently and appends each record as
//! soon as it arrives. Bibliography-only keys are reported but never touched.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::keys::{classify, extract_aux_keys, extract_bib_keys, split_diff, KeyDiff};
use crate::models::{CiteKey, FailureKind, KeyOutcome, ProviderClass, RunReport};
use crate::sources::SourceRegistry;
use crate::writer::BibWriter;

const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Errors that abort a whole run
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The document has not been compiled, so there is no reference list
    #[error("reference list {} not found, compile the document first", path.display())]
    AuxNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reference-list path for a document: everything before the first `.tex`,
/// plus `.aux`.
pub fn aux_path_for(texfile: &Path) -> PathBuf {
    let texfile = texfile.to_string_lossy();
    let stem = match texfile.find(".tex") {
        Some(end) => &texfile[..end],
        None => &texfile[..],
    };
    PathBuf::from(format!("{}.aux", stem))
}

/// What a run will do, computed before any network access.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub aux_path: PathBuf,
    pub bib_path: PathBuf,
    pub aux_key_count: usize,
    pub bib_key_count: usize,
    pub diff: KeyDiff,
}

impl Plan {
    /// Missing keys paired with the provider class each will be fetched from.
    pub fn classified(&self) -> Vec<(CiteKey, ProviderClass)> {
        self.diff
            .missing
            .iter()
            .map(|key| (key.clone(), classify(key)))
            .collect()
    }

    pub fn into_report(self, outcomes: Vec<KeyOutcome>) -> RunReport {
        RunReport {
            aux_path: self.aux_path,
            bib_path: self.bib_path,
            aux_key_count: self.aux_key_count,
            bib_key_count: self.bib_key_count,
            missing: self.diff.missing,
            dangling: self.diff.dangling,
            outcomes,
        }
    }
}

/// Drives resolution of missing keys against a [`SourceRegistry`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    registry: SourceRegistry,
    max_concurrent: usize,
}

impl Reconciler {
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Bound the number of keys resolved at once (at least one)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Read both files completely and compute the key difference.
    pub async fn plan(&self, aux_path: &Path, bib_path: &Path) -> Result<Plan, ReconcileError> {
        let aux_keys = extract_aux_keys(aux_path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ReconcileError::AuxNotFound {
                    path: aux_path.to_path_buf(),
                }
            } else {
                ReconcileError::Read {
                    path: aux_path.to_path_buf(),
                    source,
                }
            }
        })?;

        let bib_keys = extract_bib_keys(bib_path)
            .await
            .map_err(|source| ReconcileError::Read {
                path: bib_path.to_path_buf(),
                source,
            })?;

        let diff = split_diff(&aux_keys, &bib_keys);
        if diff.is_empty() {
            tracing::info!("No missing keys found");
        } else {
            tracing::info!(
                "Found {} missing keys in total ({} to fetch, {} only in the bibliography)",
                diff.len(),
                diff.missing.len(),
                diff.dangling.len()
            );
        }

        Ok(Plan {
            aux_path: aux_path.to_path_buf(),
            bib_path: bib_path.to_path_buf(),
            aux_key_count: aux_keys.len(),
            bib_key_count: bib_keys.len(),
            diff,
        })
    }

    /// Resolve and append every missing key in `plan`.
    ///
    /// `on_outcome` sees each outcome as it completes; the returned list is in
    /// the same completion order. One key failing never stops the others.
    pub async fn execute<F>(&self, plan: &Plan, mut on_outcome: F) -> Vec<KeyOutcome>
    where
        F: FnMut(&KeyOutcome),
    {
        let pending = plan.classified();
        if pending.is_empty() {
            return Vec::new();
        }

        let writer = BibWriter::new(&plan.bib_path);
        let writer = &writer;

        let mut completions = stream::iter(pending)
            .map(|(key, class)| async move { self.resolve_and_append(writer, key, class).await })
            .buffer_unordered(self.max_concurrent);

        let mut outcomes = Vec::with_capacity(plan.diff.missing.len());
        while let Some(outcome) = completions.next().await {
            on_outcome(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// [`plan`](Self::plan) followed by [`execute`](Self::execute).
    pub async fn run(&self, aux_path: &Path, bib_path: &Path) -> Result<RunReport, ReconcileError> {
        let plan = self.plan(aux_path, bib_path).await?;
        let outcomes = self.execute(&plan, |_| {}).await;
        Ok(plan.into_report(outcomes))
    }

    async fn resolve_and_append(
        &self,
        writer: &BibWriter,
        key: CiteKey,
        class: ProviderClass,
    ) -> KeyOutcome {
        let record = match self.registry.resolve(&key, class).await {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!("Could not resolve {} via {}: {}", key, class, err);
                return KeyOutcome::failed(key, class, err.kind(), err.to_string());
            }
        };

        if let Some(declared) = record.cite_key() {
            if declared != key.as_str() {
                tracing::debug!("{} returned the record for {} under key {}", class, key, declared);
            }
        }

        match writer.append(&record).await {
            Ok(()) => {
                tracing::debug!("Saved BibTeX for key {} to {}", key, writer.path().display());
                KeyOutcome::appended(key, class)
            }
            Err(err) => {
                tracing::debug!("Could not save {}: {}", key, err);
                KeyOutcome::failed(key, class, FailureKind::Write, err.to_string())
            }
        }
    }
}
