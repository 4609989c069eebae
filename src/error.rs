use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum LfError {
    /// Configuration file or value problems.
    #[error("config error: {0}")]
    Config(String),

    /// Dataset schema or content violations detected before vectorization.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Failure reading or decoding an input dataset.
    #[error("dataset error in {path}: {message}")]
    Dataset { path: PathBuf, message: String },

    /// No term survived the document-frequency cutoff.
    #[error("empty vocabulary: no term meets min_doc_freq {min_doc_freq}; lower it or supply more text")]
    EmptyVocabulary { min_doc_freq: u32 },

    /// Evaluation stopped by a cancellation request.
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LfError {
    /// Stable machine-readable code for robot-mode error envelopes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Dataset { .. } => "dataset",
            Self::EmptyVocabulary { .. } => "empty_vocabulary",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    pub(crate) fn dataset(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Dataset {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LfError>;
