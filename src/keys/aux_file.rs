//! Citation keys from a LaTeX `.aux` file.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::models::CiteKey;

static CITATION_MARKER: OnceLock<Regex> = OnceLock::new();

fn citation_marker() -> &'static Regex {
    CITATION_MARKER.get_or_init(|| {
        Regex::new(r"\\citation\{([^}]*)\}").expect("citation marker pattern is valid")
    })
}

/// Keys cited on a single line, in order of appearance.
///
/// Every `\citation{...}` marker on the line contributes, and multi-key
/// markers (`\citation{a,b}`) are split on commas.
pub fn parse_aux_line(line: &str) -> Vec<CiteKey> {
    citation_marker()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .flat_map(|inner| inner.as_str().split(','))
        .filter_map(CiteKey::parse)
        .collect()
}

/// Keys cited in the whole file, in order of appearance, duplicates kept.
pub fn parse_aux(content: &str) -> Vec<CiteKey> {
    content.lines().flat_map(parse_aux_line).collect()
}

/// Read an `.aux` file and return every cited key.
pub async fn extract_aux_keys(path: &Path) -> std::io::Result<Vec<CiteKey>> {
    let bytes = tokio::fs::read(path).await?;
    let keys = parse_aux(&String::from_utf8_lossy(&bytes));

    tracing::info!("Found {} citations in {}", keys.len(), path.display());
    for key in &keys {
        tracing::debug!("Found a citation with key {}", key);
    }

    Ok(keys)
}
