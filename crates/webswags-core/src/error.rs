//! Error handling for the webswags discovery library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Per-file failures (`Io`, `NotASpecDocument`) are absorbed by the discovery
//! walk; only `Walk` ever reaches a caller of [`crate::discover`].
//!
//! # Examples
//!
//! ```
//! use webswags_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for webswags operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webswags operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is neither an OpenAPI 3.x nor a Swagger 2.0 document
    #[error("file {} is not a valid OpenAPI 3.x/3.1 or Swagger 2.0 document", path.display())]
    NotASpecDocument { path: PathBuf },

    /// The discovery root could not be traversed
    #[error("error walking {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The blocking discovery task panicked or was cancelled
    #[error("discovery task for {} failed: {source}", root.display())]
    DiscoveryTask {
        root: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new "not a spec document" error for `path`
    pub fn not_a_spec<P: Into<PathBuf>>(path: P) -> Self {
        Self::NotASpecDocument { path: path.into() }
    }

    /// Whether this is an outcome the discovery walk skips over silently
    pub fn is_expected_skip(&self) -> bool {
        matches!(self, Self::NotASpecDocument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_spec_is_expected_skip() {
        let err = Error::not_a_spec("config/app.yaml");
        assert!(err.is_expected_skip());
        assert!(err.to_string().contains("config/app.yaml"));
    }

    #[test]
    fn test_io_error_is_not_expected_skip() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(!err.is_expected_skip());
    }

    #[tokio::test]
    async fn test_join_error_is_a_task_error() {
        let source = tokio::task::spawn_blocking(|| panic!("walker panicked"))
            .await
            .unwrap_err();
        let err = Error::DiscoveryTask {
            root: "services".into(),
            source,
        };
        assert!(!err.is_expected_skip());
        assert!(err.to_string().starts_with("discovery task for services failed"));
    }
}
