//! Error taxonomy for the shelf-search library.
//!
//! Every public library function returns [`Result`]. The variants map to the
//! failure classes callers are expected to react to differently:
//!
//! - [`Error::DocumentUnreadable`] — the extractor could not open or parse a
//!   document. Corpus aggregation catches this per file and continues.
//! - [`Error::NotFound`] — a section or topic title does not exist in the index.
//! - [`Error::InvalidArgument`] — a malformed query (e.g. empty keyword).
//! - [`Error::AiService`] — the external text-analysis service failed; the
//!   message is propagated unmodified.
//!
//! The CLI binary wraps these in `anyhow` for display.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The document could not be opened or parsed.
    #[error("cannot read document {}: {reason}", path.display())]
    DocumentUnreadable { path: PathBuf, reason: String },

    /// A section or topic title is absent from the index.
    #[error("{kind} not found: {title}")]
    NotFound { kind: &'static str, title: String },

    /// The caller supplied a malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The external text-analysis service failed.
    #[error("AI service error: {0}")]
    AiService(String),
}

impl Error {
    pub(crate) fn unreadable(path: &Path, reason: impl ToString) -> Self {
        Error::DocumentUnreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn section_not_found(title: &str) -> Self {
        Error::NotFound {
            kind: "section",
            title: title.to_string(),
        }
    }

    pub(crate) fn topic_not_found(title: &str) -> Self {
        Error::NotFound {
            kind: "topic",
            title: title.to_string(),
        }
    }
}
