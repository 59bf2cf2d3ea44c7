//! # Error Types
//!
//! Custom error types for PadHub using `thiserror`.

use thiserror::Error;

/// Main error type for PadHub
#[derive(Debug, Error)]
pub enum PadHubError {
    /// Backend errors (device scanning, event transport)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PadHub
pub type Result<T> = std::result::Result<T, PadHubError>;
