//! Object-storage access for metadata side-cars.

use super::locator::ObjectLocator;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_s3::error::DisplayErrorContext;
use costbot_core::MetadataFetchError;

/// Read-only object storage.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get the store name (e.g., "s3").
    fn store_name(&self) -> &str;

    /// Read the full body of the object at `locator`.
    async fn get_object(&self, locator: &ObjectLocator) -> Result<Vec<u8>, MetadataFetchError>;
}

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    credentials: Option<SharedCredentialsProvider>,
}

impl S3ObjectStore {
    /// Create a store from a loaded SDK configuration.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
            credentials: sdk_config.credentials_provider(),
        }
    }

    /// Whether the credential chain can currently produce credentials.
    async fn credentials_error(&self) -> Option<String> {
        match &self.credentials {
            None => Some("no credentials provider configured".to_string()),
            Some(provider) => provider
                .provide_credentials()
                .await
                .err()
                .map(|e| DisplayErrorContext(e).to_string()),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    fn store_name(&self) -> &str {
        "s3"
    }

    async fn get_object(&self, locator: &ObjectLocator) -> Result<Vec<u8>, MetadataFetchError> {
        tracing::debug!("GetObject {}", locator);

        let output = match self
            .client
            .get_object()
            .bucket(&locator.bucket)
            .key(&locator.key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                // Non-service failures are checked against the credential chain.
                if err.as_service_error().is_none() {
                    if let Some(reason) = self.credentials_error().await {
                        return Err(MetadataFetchError::Credentials(reason));
                    }
                }
                return Err(MetadataFetchError::ObjectAccess {
                    locator: locator.to_string(),
                    message: DisplayErrorContext(err).to_string(),
                });
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| MetadataFetchError::ObjectAccess {
                locator: locator.to_string(),
                message: format!("failed to read object body: {}", e),
            })?;

        Ok(body.into_bytes().to_vec())
    }
}
