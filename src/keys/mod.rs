//! Key extraction, reconciliation, and classification.
//!
//! - [`extract_aux_keys`]: cited keys from a LaTeX `.aux` file
//! - [`extract_bib_keys`]: entry keys from a BibTeX file
//! - [`split_diff`] / [`diff`]: symmetric difference in first-seen order
//! - [`classify`]: which provider a key should be fetched from

mod aux_file;
mod bib;
mod classify;
mod diff;

pub use aux_file::{extract_aux_keys, parse_aux, parse_aux_line};
pub use bib::{extract_bib_keys, parse_bib, parse_bib_header};
pub use classify::classify;
pub use diff::{diff, split_diff, KeyDiff};
