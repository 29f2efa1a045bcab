//! Whole-file document storage.
//!
//! Documents are read and written in one piece as UTF-8. Reading normalizes newlines to LF and
//! reports the detected [`LineEnding`] so the caller can write the file back with it. Files
//! using one line ending throughout round-trip byte for byte.

use crate::line_ending::LineEnding;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a file operation.
///
/// The message is shown to the user as-is, so it names the operation and the path.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading (or decoding) a file failed.
    #[error("could not open {}: {source}", path.display())]
    Open {
        /// The path that was being opened.
        path: PathBuf,
        /// Underlying I/O or decoding error.
        #[source]
        source: io::Error,
    },
    /// Writing a file failed.
    #[error("could not save {}: {source}", path.display())]
    Save {
        /// The path that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    /// The path the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Save { path, .. } => path,
        }
    }
}

/// A document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// LF-normalized text.
    pub text: String,
    /// Line ending found in the file.
    pub line_ending: LineEnding,
}

/// Read a whole file as UTF-8 text.
///
/// Invalid UTF-8 is reported as an [`io::ErrorKind::InvalidData`] open error.
pub fn read_document(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let raw = fs::read_to_string(path).map_err(|source| DocumentError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let line_ending = LineEnding::detect_in_text(&raw);
    let text = match LineEnding::normalize(&raw) {
        std::borrow::Cow::Borrowed(_) => raw,
        std::borrow::Cow::Owned(normalized) => normalized,
    };
    Ok(LoadedDocument { text, line_ending })
}

/// Write `text` (LF-normalized) to `path` using `line_ending`.
pub fn write_document(
    path: &Path,
    text: &str,
    line_ending: LineEnding,
) -> Result<(), DocumentError> {
    fs::write(path, line_ending.apply_to_text(text).as_bytes()).map_err(|source| {
        DocumentError::Save {
            path: path.to_path_buf(),
            source,
        }
    })
}
