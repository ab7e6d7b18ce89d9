//! Error types for BrandGate.
//!
//! Library crates use [`BrandGateError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all BrandGate operations.
#[derive(Debug, thiserror::Error)]
pub enum BrandGateError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Requestor email failed format validation.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Retailer URL failed format validation.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A submission was attempted with no usable subjects.
    #[error("no subjects were provided for submission")]
    EmptyBatch,

    /// A company was not present in the cached directory results.
    #[error("company not found in directory results: {0}")]
    CompanyNotFound(String),

    /// Ledger or queue table error (connection, insert, or update failure).
    #[error("storage error: {0}")]
    Storage(String),

    /// Network/HTTP error while delivering a notification.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BrandGateError>;

impl BrandGateError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a URL validation error with a user-facing reason.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error from any displayable message.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BrandGateError::InvalidEmail("not-an-email".into());
        assert_eq!(err.to_string(), "invalid email address: not-an-email");

        let err = BrandGateError::invalid_url("ftp://x.com", "URL must start with http:// or https://");
        assert!(err.to_string().contains("ftp://x.com"));
        assert!(err.to_string().contains("http://"));

        let err = BrandGateError::CompanyNotFound("Acme Corp".into());
        assert!(err.to_string().contains("Acme Corp"));
    }
}
