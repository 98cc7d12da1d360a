use std::fmt;

use thiserror::Error;

/// Application-level error type.
///
/// Per-document failures (`Extraction`, `Parse`, `Llm`, `Persistence`, `NotFound`)
/// are recorded in a batch tally and never abort a run. `Config` is fatal and only
/// raised before the first document is touched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Parse error: {message} (raw: {excerpt})")]
    Parse { message: String, excerpt: String },

    #[error("LLM returned no response: {0}")]
    Llm(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse failure classes reported in batch tallies.
///
/// Keeps "the model gave us nothing usable" apart from "we had a good result
/// but storage rejected it".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    Extraction,
    Persistence,
    Input,
    Other,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Extraction(_) | AppError::Parse { .. } | AppError::Llm(_) => {
                FailureKind::Extraction
            }
            AppError::Persistence(_) | AppError::Database(_) => FailureKind::Persistence,
            AppError::NotFound(_) | AppError::Config(_) | AppError::Io(_) => FailureKind::Input,
            AppError::Internal(_) => FailureKind::Other,
        }
    }

    /// Builds a `Parse` error, keeping only a short prefix of the raw model text.
    pub fn parse(message: impl Into<String>, raw: &str) -> Self {
        AppError::Parse {
            message: message.into(),
            excerpt: excerpt(raw, 500),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Extraction => "extraction",
            FailureKind::Persistence => "persistence",
            FailureKind::Input => "input",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
