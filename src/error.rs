//! Error types for the translation engine.
//!
//! The Markdown transformations (tokenize, segment, restore, extract) never fail.
//! Failures only come from the backend or from an unusable run configuration.

use thiserror::Error;

/// Errors raised by a translation backend call.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("API request failed with status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Body or message returned by the backend
        message: String,
    },

    /// The response could not be interpreted.
    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    /// The backend returned fewer translations than texts sent.
    #[error("Backend returned {received} translations for {expected} texts")]
    CountMismatch {
        /// Number of texts in the request
        expected: usize,
        /// Number of translations in the response
        received: usize,
    },

    /// The translation cache could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Every attempt failed.
    #[error("{last} (gave up after {attempts} attempts)")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Error of the final attempt
        last: Box<BackendError>,
    },
}

/// Errors detected before any backend call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Multi-language mode was requested with an empty language list.
    #[error("No target language selected")]
    NoTargetLanguage,

    /// No document was provided.
    #[error("No input provided")]
    NoInput,
}
