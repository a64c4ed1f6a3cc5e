//! Error types for the financial agent tool service

use thiserror::Error;

/// Result type alias for tool service operations
pub type Result<T> = std::result::Result<T, ToolServiceError>;

#[derive(Error, Debug)]
pub enum ToolServiceError {

    // =============================
    // Tool Layer Errors
    // =============================

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure taxonomy for the income statement extractor.
///
/// The `Display` strings double as the wire-level error sentinel the hosting
/// runtime receives, so they must stay stable.
#[derive(Error, Debug)]
pub enum FinancialsError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Income statement data not found")]
    NotFound,

    #[error("JSON parsing error: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}
