//! Error types and handling for sitemapper-core operations.
//!
//! Most failure modes in this crate never surface as errors at all: missing
//! source files, absent fetchers, and failed HTTP requests degrade to empty
//! URL lists, and per-group failures are contained by the generator. The
//! variants here cover what remains: output I/O, malformed source data, and
//! invalid configuration.

use thiserror::Error;

/// The main error type for sitemapper-core operations.
///
/// All fallible public functions return `Result<T, Error>`. Errors keep
/// their source chain where an underlying error exists (`Io`, `Network`).
#[derive(Error, Debug)]
pub enum Error {
    /// File system operation failed (reading a JSON source, writing output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request construction or transport failed.
    ///
    /// Note that inside the fetchers a network failure is absorbed into the
    /// `None` return value; this variant only appears when a reqwest client
    /// itself cannot be built.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Source data could not be parsed or mapped into URLs.
    ///
    /// Raised for malformed JSON source files and for mapper callbacks that
    /// reject the data they were handed. Contained at the group boundary by
    /// the generator.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Output directory or file write failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid (empty group name, unsafe file stem, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Returns `true` for errors that are typically temporary (network
    /// timeouts, connection failures, interrupted I/O) and `false` for
    /// permanent ones (parse failures, invalid configuration).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => {
                matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
                )
            },
            _ => false,
        }
    }

    /// Get the error category as a string identifier, for logging and
    /// grouping in diagnostics.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
