//! Per-request metadata side-car resolution.

use super::locator::ObjectLocator;
use super::store::ObjectStore;
use super::types::{LocatorFailure, MetadataResolution, SidecarDocument, SourceMetadata};
use costbot_core::MetadataFetchError;
use costbot_generation::Citation;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

/// Fetches the metadata side-car of each citation's primary source.
///
/// Holds no state between calls; every `resolve_all` starts from an empty
/// map.
#[derive(Clone)]
pub struct MetadataResolver {
    store: Arc<dyn ObjectStore>,
    suffix: String,
}

impl MetadataResolver {
    pub fn new(store: Arc<dyn ObjectStore>, suffix: impl Into<String>) -> Self {
        Self {
            store,
            suffix: suffix.into(),
        }
    }

    /// Resolve the side-cars of all unique primary locators in `citations`.
    ///
    /// Each locator is fetched at most once. Failures are recorded per
    /// locator and never abort the others.
    pub async fn resolve_all(&self, citations: &[Citation]) -> MetadataResolution {
        let locators = unique_primary_locators(citations);
        if locators.is_empty() {
            return MetadataResolution::default();
        }

        tracing::debug!(
            "Resolving metadata for {} unique source(s) via {}",
            locators.len(),
            self.store.store_name()
        );

        let outcomes = join_all(locators.iter().map(|locator| self.resolve_one(locator))).await;

        let mut resolution = MetadataResolution::default();
        for (locator, outcome) in locators.into_iter().zip(outcomes) {
            match outcome {
                Ok(metadata) => {
                    resolution.metadata.insert(locator, metadata);
                }
                Err(error) => {
                    tracing::warn!("Metadata unavailable for {}: {}", locator, error);
                    resolution.failures.push(LocatorFailure {
                        source_locator: locator,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "Resolved metadata for {} source(s), {} failure(s)",
            resolution.metadata.len(),
            resolution.failures.len()
        );

        resolution
    }

    /// Fetch and parse the side-car of one source locator.
    pub async fn resolve_one(
        &self,
        source_locator: &str,
    ) -> Result<SourceMetadata, MetadataFetchError> {
        let sidecar = ObjectLocator::parse(source_locator)?.with_suffix(&self.suffix);
        let bytes = self.store.get_object(&sidecar).await?;

        let document: SidecarDocument =
            serde_json::from_slice(&bytes).map_err(|e| MetadataFetchError::MalformedDocument {
                locator: sidecar.to_string(),
                message: e.to_string(),
            })?;

        Ok(SourceMetadata {
            source_locator: source_locator.to_string(),
            attributes: document.metadata_attributes,
        })
    }
}

/// Primary-reference locators in first-seen order, deduplicated by exact
/// string equality.
pub fn unique_primary_locators(citations: &[Citation]) -> Vec<String> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter_map(|c| c.primary_locator())
        .filter(|locator| seen.insert(*locator))
        .map(str::to_string)
        .collect()
}
