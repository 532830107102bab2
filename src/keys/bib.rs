//! Entry keys from a BibTeX file.

use std::path::Path;

use crate::models::CiteKey;

/// Key declared by an entry header line such as `@article{Smith:2020abc,`.
///
/// The line must start (after indentation) with `@`; the key is whatever sits
/// between the first `{` and the first `,`. Lines without that shape yield
/// `None`.
pub fn parse_bib_header(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('@')?;
    let (_entry_type, body) = rest.split_once('{')?;
    let (key, _) = body.split_once(',')?;
    let key = key.trim();
    if key.is_empty() || key.contains('}') {
        return None;
    }
    Some(key)
}

/// Keys of every entry in the file, in file order.
pub fn parse_bib(content: &str) -> Vec<CiteKey> {
    content
        .lines()
        .filter_map(parse_bib_header)
        .filter_map(CiteKey::parse)
        .collect()
}

/// Read a BibTeX file and return its entry keys.
///
/// A bibliography that does not exist yet is treated as empty; it is created
/// on the first append.
pub async fn extract_bib_keys(path: &Path) -> std::io::Result<Vec<CiteKey>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("{} does not exist yet, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };
    let keys = parse_bib(&String::from_utf8_lossy(&bytes));

    tracing::info!("Found {} keys in {}", keys.len(), path.display());
    for key in &keys {
        tracing::debug!("Found a key in the bibliography: {}", key);
    }

    Ok(keys)
}
