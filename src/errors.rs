/*!
 * Error types for the srtranslator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
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

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The account's character quota is used up
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while reading the local glossary or synchronizing it remotely.
///
/// These never reach the caller of `translate`: the adapter logs them and
/// translates without a glossary.
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// The glossary file could not be read or fingerprinted
    #[error("Glossary file error: {0}")]
    Io(#[from] std::io::Error),

    /// The glossary file is not valid UTF-8
    #[error("Glossary file is not valid UTF-8: {0}")]
    Encoding(String),

    /// The glossary file is not valid CSV
    #[error("Malformed glossary file: {0}")]
    Csv(#[from] csv::Error),

    /// Glossaries are keyed by a language pair, so detection mode cannot use one
    #[error("A glossary needs an explicit source language, got 'auto'")]
    AutoSourceLanguage,

    /// Listing, deleting or creating the remote glossary failed
    #[error("Remote glossary operation failed: {0}")]
    Remote(#[from] ProviderError),
}

/// Errors that make a translation adapter unusable
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Missing or invalid credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The service could not be reached or rejected the connectivity check
    #[error("Translation service unavailable: {0}")]
    Connectivity(#[source] ProviderError),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle content could not be parsed
    #[error("Failed to parse subtitles: {0}")]
    Parse(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The adapter was shut down with `quit`
    #[error("Translation session is closed")]
    SessionClosed,
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

    /// Error from adapter construction
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

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
