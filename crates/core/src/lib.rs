//! costbot core library
//!
//! Foundational utilities shared by every costbot crate:
//! - Error handling (`AppError`, `AppResult`, `MetadataFetchError`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, RetrievalSettings};
pub use error::{AppError, AppResult, MetadataFetchError};
