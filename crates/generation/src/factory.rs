//! Service client factory.
//!
//! Loads the shared AWS SDK configuration once per process and builds the
//! generation backend from it. Credentials come from the default provider
//! chain of the hosting environment.

use crate::client::GenerationBackend;
use crate::providers::BedrockBackend;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use costbot_core::config::RetrievalSettings;
use std::sync::Arc;
use std::time::Duration;

/// Timeout and retry policy applied to every remote call.
///
/// Retries are disabled so an interactive caller sees failures after one
/// bounded attempt.
pub fn client_policy(settings: &RetrievalSettings) -> (TimeoutConfig, RetryConfig) {
    let timeouts = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .read_timeout(Duration::from_secs(settings.read_timeout_secs))
        .build();

    (timeouts, RetryConfig::disabled())
}

/// Load the process-wide SDK configuration for `region`.
pub async fn load_sdk_config(region: &str, settings: &RetrievalSettings) -> SdkConfig {
    let (timeouts, retries) = client_policy(settings);

    tracing::debug!(
        "Loading AWS configuration for region {} (connect {}s, read {}s, no retries)",
        region,
        settings.connect_timeout_secs,
        settings.read_timeout_secs
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .timeout_config(timeouts)
        .retry_config(retries)
        .load()
        .await
}

/// Create the generation backend named by `backend`.
///
/// # Errors
/// Returns an error string if the backend is unknown.
pub fn create_backend(
    backend: &str,
    sdk_config: &SdkConfig,
) -> Result<Arc<dyn GenerationBackend>, String> {
    match backend.to_lowercase().as_str() {
        "bedrock" => Ok(Arc::new(BedrockBackend::new(sdk_config))),
        _ => Err(format!("Unknown generation backend: {}", backend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> SdkConfig {
        SdkConfig::builder()
            .region(Region::new("us-east-1"))
            .behavior_version(BehaviorVersion::latest())
            .build()
    }

    #[test]
    fn test_client_policy() {
        let settings = RetrievalSettings {
            connect_timeout_secs: 7,
            read_timeout_secs: 9,
            ..RetrievalSettings::default()
        };

        let (timeouts, retries) = client_policy(&settings);
        assert_eq!(timeouts.connect_timeout(), Some(Duration::from_secs(7)));
        assert_eq!(timeouts.read_timeout(), Some(Duration::from_secs(9)));
        assert_eq!(retries.max_attempts(), 1);
    }

    #[test]
    fn test_create_bedrock_backend() {
        let backend = create_backend("bedrock", &offline_config()).unwrap();
        assert_eq!(backend.backend_name(), "bedrock");
    }

    #[test]
    fn test_unknown_backend() {
        match create_backend("sagemaker", &offline_config()) {
            Err(err) => assert!(err.contains("Unknown generation backend")),
            Ok(_) => panic!("Expected error for unknown backend"),
        }
    }
}
