//! Error types for the costbot client.
//!
//! `AppError` covers everything that can end a command. Metadata side-car
//! failures have their own enum because they are collected per locator and
//! only become an `AppError` when a caller chooses to propagate one.

use thiserror::Error;

/// Unified error type for the costbot client.
///
/// All fallible functions return `Result<T, AppError>`. Errors are
/// represented and propagated, never turned into panics.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The managed generate-with-retrieval endpoint failed (network, quota,
    /// rejected filter). Fatal to the current query only.
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// A metadata side-car could not be resolved
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataFetchError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Failure to resolve the metadata side-car of one source locator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataFetchError {
    /// No usable credentials for the object store
    #[error("credentials are not available for object storage access: {0}")]
    Credentials(String),

    /// The object is missing, forbidden, or the transfer failed
    #[error("could not read {locator}: {message}")]
    ObjectAccess { locator: String, message: String },

    /// The locator does not have the `s3://bucket/key` shape
    #[error("malformed source locator: {0}")]
    MalformedLocator(String),

    /// The side-car was read but is not valid metadata JSON
    #[error("malformed metadata document {locator}: {message}")]
    MalformedDocument { locator: String, message: String },
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_converts_into_app_error() {
        let err: AppError = MetadataFetchError::MalformedLocator("http://x".to_string()).into();
        assert!(matches!(err, AppError::Metadata(_)));
        assert_eq!(
            err.to_string(),
            "Metadata error: malformed source locator: http://x"
        );
    }

    #[test]
    fn test_remote_service_message() {
        let err = AppError::RemoteService("throttled".to_string());
        assert_eq!(err.to_string(), "Remote service error: throttled");
    }
}
