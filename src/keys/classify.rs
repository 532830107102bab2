//! Route a citation key to the provider most likely to know it.

use crate::models::{CiteKey, ProviderClass};

/// ADS bibcodes start with the four-digit year; INSPIRE texkeys start with an
/// author name. Only the first character is inspected, so an INSPIRE key that
/// happens to start with a digit is routed to ADS.
pub fn classify(key: &CiteKey) -> ProviderClass {
    match key.as_str().chars().next() {
        Some(c) if c.is_ascii_digit() => ProviderClass::AdsLike,
        _ => ProviderClass::InspireLike,
    }
}
