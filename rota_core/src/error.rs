//! Error types for the rota_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rota_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Cycle length, rest days, or time zone out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A day assignment breaks the rest-exclusivity rule or names a day outside the cycle
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    /// Session record with an unparsable timestamp
    #[error("Malformed session: {0}")]
    MalformedSession(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Schedule store error
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
