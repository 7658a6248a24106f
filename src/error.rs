//! Extraction error taxonomy.
//!
//! Every failure surfaced by the crate is an [`ExtractError`]. The binary
//! converts it to a single message at the call boundary and uses
//! [`ExtractError::is_client_error`] to pick between a client-error exit
//! code (malformed input) and an extraction-failure exit code.

use thiserror::Error;

/// Errors produced while extracting content from a URL or a PDF.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Malformed or missing URL. Detected before any attempt, never retried.
    #[error("Invalid URL provided: {0}")]
    InvalidInput(String),

    /// Navigation failure or timeout during a web attempt.
    #[error("Navigation failed: {0}")]
    TransientRender(String),

    /// The attempt completed but the page yielded no visible text.
    #[error("No visible content found on the page.")]
    EmptyContent,

    /// All web attempts were used up.
    #[error("Failed to scrape content after {attempts} attempts: {last}")]
    ExtractionFailed {
        attempts: u32,
        #[source]
        last: Box<ExtractError>,
    },

    /// Reading or reconstructing a PDF failed.
    #[error("PDF processing failed: {0}")]
    PdfProcessing(String),
}

impl ExtractError {
    /// `true` for failures caused by the caller's input rather than by
    /// the extraction itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::InvalidInput(_))
    }

    /// `true` for failures that consume one attempt and may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExtractError::TransientRender(_) | ExtractError::EmptyContent
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
