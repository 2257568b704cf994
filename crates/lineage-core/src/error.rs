//! Error types for lexicon, family and snapshot operations
//!
//! None of these are fatal. A cycle in particular is an expected outcome of
//! editing and carries the diagnosis the caller needs to highlight it.

use crate::model::WordId;
use thiserror::Error;

/// Result type for lineage operations
pub type LineageResult<T> = Result<T, LineageError>;

/// Errors that can occur while editing, sorting or persisting words
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineageError {
    /// The id was never issued by this lexicon, or its word was discarded
    #[error("Unknown word: {word}")]
    UnknownWord {
        /// The id that failed to resolve
        word: WordId,
    },

    /// Sorting could not consume every member of the family
    #[error("Cycle detected: {} word(s) never became ready", .problem_words.len())]
    CycleDetected {
        /// Members whose in-degree stayed above zero, in family order
        problem_words: Vec<WordId>,
    },

    /// A snapshot document is structurally invalid
    #[error("Invalid snapshot: {reason}")]
    Snapshot {
        /// What was wrong with it
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value parsed but is out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl LineageError {
    /// Creates an unknown word error
    pub fn unknown_word(word: WordId) -> Self {
        Self::UnknownWord { word }
    }

    /// Creates a cycle error carrying the problem words
    pub fn cycle(problem_words: Vec<WordId>) -> Self {
        Self::CycleDetected { problem_words }
    }

    /// Creates an invalid snapshot error
    pub fn snapshot(reason: impl Into<String>) -> Self {
        Self::Snapshot {
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// The cycle diagnosis, if this is a cycle error.
    pub fn problem_words(&self) -> Option<&[WordId]> {
        match self {
            Self::CycleDetected { problem_words } => Some(problem_words),
            _ => None,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}
