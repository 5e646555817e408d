//! Error types for examdeck.
//!
//! Library crates use [`ExamdeckError`] via `thiserror`.
//! App crates (cli/server) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all examdeck operations.
#[derive(Debug, thiserror::Error)]
pub enum ExamdeckError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The source document could not produce any text (corrupt or image-only
    /// extraction output). Distinct from a missing file, which is [`Io`].
    #[error("extraction error: {message}")]
    Extraction { message: String },

    /// The document text was non-empty but the segmenter recovered zero
    /// questions. Carries a prefix of the raw text for diagnosing which
    /// convention assumption broke.
    #[error("no questions found in document (raw text starts with: {preview:?})")]
    NoQuestions { preview: String },

    /// Database or storage layer error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad request payload, unknown session, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExamdeckError>;

impl ExamdeckError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Build a [`ExamdeckError::NoQuestions`] from the raw document text,
    /// keeping the first 500 characters as a diagnostic preview.
    pub fn no_questions(raw_text: &str) -> Self {
        Self::NoQuestions {
            preview: raw_text.chars().take(500).collect(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
