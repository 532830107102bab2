//! # hepref
//!
//! Fills in missing BibTeX entries for a LaTeX document. Cited keys are read
//! from the document's `.aux` file, compared with the keys already present in
//! the bibliography, and every missing key is fetched from INSPIRE-HEP or NASA
//! ADS and appended to the bibliography.
//!
//! ## Architecture
//!
//! - [`keys`]: key extraction from `.aux` and `.bib` files, symmetric
//!   difference, and provider classification
//! - [`sources`]: metadata providers behind the [`Source`] trait
//! - [`writer`]: append-only bibliography writer
//! - [`reconcile`]: the engine tying the pieces together
//! - [`models`]: keys, records, and run reports
//! - [`config`]: configuration management
//! - [`ui`]: console output for the binary
//! - [`utils`]: HTTP client
//!
//! Keys are routed by their first character: a leading digit means an ADS
//! bibcode, anything else an INSPIRE texkey. INSPIRE keys that start with a
//! digit are therefore sent to ADS and fail there.

pub mod config;
pub mod keys;
pub mod models;
pub mod reconcile;
pub mod sources;
pub mod ui;
pub mod utils;
pub mod writer;

// Re-export commonly used types
pub use models::{BibRecord, CiteKey, ProviderClass, RunReport};
pub use reconcile::{aux_path_for, ReconcileError, Reconciler};
pub use sources::{Source, SourceError, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
