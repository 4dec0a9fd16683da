//! Object locator parsing.

use costbot_core::MetadataFetchError;
use std::fmt;

/// URI scheme of object-storage locators.
pub const LOCATOR_SCHEME: &str = "s3://";

/// A `s3://bucket/key` object address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocator {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocator {
    /// Parse a locator of the form `s3://bucket/key`.
    ///
    /// The key may be empty; the bucket may not.
    pub fn parse(uri: &str) -> Result<Self, MetadataFetchError> {
        let rest = uri
            .strip_prefix(LOCATOR_SCHEME)
            .ok_or_else(|| MetadataFetchError::MalformedLocator(uri.to_string()))?;

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(MetadataFetchError::MalformedLocator(uri.to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Locator of the companion object whose key is this key plus `suffix`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: format!("{}{}", self.key, suffix),
        }
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", LOCATOR_SCHEME, self.bucket, self.key)
    }
}
