//! Append-only writer for the bibliography file.
//!
//! Existing content is never rewritten: the file is opened in append mode and
//! every record goes out in a single write. The first record of a run is
//! preceded by a blank line separating it from what was already there.

use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::models::BibRecord;

/// Error appending a record to the bibliography
#[derive(Debug, thiserror::Error)]
#[error("failed to append to {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Default)]
struct WriterState {
    file: Option<File>,
    separated: bool,
    appended: usize,
}

/// Serializes appends to one bibliography file.
#[derive(Debug)]
pub struct BibWriter {
    path: PathBuf,
    state: Mutex<WriterState>,
}

impl BibWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(WriterState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended so far.
    pub async fn appended(&self) -> usize {
        self.state.lock().await.appended
    }

    /// Append one record.
    ///
    /// Concurrent callers are serialized, so records never interleave. A
    /// failed append leaves the separator pending for the next one.
    pub async fn append(&self, record: &BibRecord) -> Result<(), WriteError> {
        let mut state = self.state.lock().await;
        let buffer = frame(record.as_str(), !state.separated);

        let mut file = match state.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await
                .map_err(|source| self.error(source))?,
        };

        let written = async {
            file.write_all(buffer.as_bytes()).await?;
            file.flush().await
        }
        .await;

        // On failure the handle is dropped and the next append reopens the file.
        written.map_err(|source| self.error(source))?;

        state.file = Some(file);
        state.separated = true;
        state.appended += 1;
        Ok(())
    }

    fn error(&self, source: std::io::Error) -> WriteError {
        WriteError {
            path: self.path.clone(),
            source,
        }
    }
}

/// Leading separator (if requested), the record, and a line terminator when
/// the record lacks one.
fn frame(record: &str, leading_separator: bool) -> String {
    let mut buffer = String::with_capacity(record.len() + 2);
    if leading_separator {
        buffer.push('\n');
    }
    buffer.push_str(record);
    if !record.ends_with('\n') {
        buffer.push('\n');
    }
    buffer
}
