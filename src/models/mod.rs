//! Core data models for citation keys, fetched records, and run results.

mod key;
mod record;
mod report;

pub use key::{CiteKey, ProviderClass};
pub use record::BibRecord;
pub use report::{FailureKind, KeyOutcome, KeyStatus, RunReport};
