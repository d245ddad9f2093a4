/*!
 * Error types for the i18n-agent application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Fatal failures while mapping a translated document back onto its scaffold
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReassemblyError {
    /// Placeholder and paragraph counts disagree after reconciliation.
    ///
    /// An empty translation is reported with `found: 0`.
    #[error(
        "Section count mismatch: scaffold expects {expected} paragraphs, translation has {found}. \
         Please {} {} incorrectly inserted double newlines.",
        drift_verb(.expected, .found),
        drift_amount(.expected, .found)
    )]
    SectionCountMismatch {
        /// Placeholders in the scaffold
        expected: usize,
        /// Paragraphs in the translated text
        found: usize,
    },

    /// Heading drift beyond the configured tolerance
    #[error("Header count mismatch: source has {expected} headings, translation has {found}")]
    HeaderCountMismatch {
        /// Headings in the source prose
        expected: usize,
        /// Headings in the translated prose
        found: usize,
    },
}

fn drift_verb(expected: &usize, found: &usize) -> &'static str {
    if expected > found { "recover" } else { "remove" }
}

fn drift_amount(expected: &usize, found: &usize) -> usize {
    expected.abs_diff(*found)
}

/// Errors that can occur during document translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The translated text could not be mapped back onto the document
    #[error("Reassembly error: {0}")]
    Reassembly(#[from] ReassemblyError),

    /// The source document is missing or has nothing to translate
    #[error("Source content error: {0}")]
    SourceContent(String),
}

/// Invalid moves through the translation wizard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested step cannot follow the current one
    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition {
        /// Current step
        from: String,
        /// Requested step
        to: String,
    },

    /// A step needs data that has not been collected yet
    #[error("Session is missing {0}")]
    MissingData(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the session state machine
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
