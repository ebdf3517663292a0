//! Error handling for the candidate fit engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CandidateFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text extraction failed or produced an empty/garbage result.
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    /// The input is not a document format the extractor can parse.
    #[error("File type not supported: {0}")]
    UnsupportedFileType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl CandidateFitError {
    /// Hard failures that abort the pipeline for a request and are never retried.
    pub fn is_terminal_document_error(&self) -> bool {
        matches!(
            self,
            CandidateFitError::UnreadableDocument(_) | CandidateFitError::UnsupportedFileType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CandidateFitError>;

/// Convert TOML parse errors from configuration files
impl From<toml::de::Error> for CandidateFitError {
    fn from(err: toml::de::Error) -> Self {
        CandidateFitError::Configuration(format!("Failed to parse config: {}", err))
    }
}
