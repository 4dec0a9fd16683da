//! Query pipeline orchestration.
//!
//! Runs one query end to end: builds the retrieval filter, calls the
//! generation endpoint, resolves the metadata of cited sources and enriches
//! the citations. Nothing is kept between runs.

use crate::citations::enrich_all;
use crate::metadata::{MetadataResolver, ObjectStore};
use crate::rag::types::{AskOptions, AskOutcome};
use costbot_core::{AppConfig, AppResult};
use costbot_generation::{GenerationBackend, GenerationClient, GenerationSettings};
use std::sync::Arc;

/// Process-wide collaborators of the pipeline, passed explicitly.
#[derive(Clone)]
pub struct QueryContext {
    pub generation: GenerationClient,
    pub resolver: MetadataResolver,
}

impl QueryContext {
    pub fn new(generation: GenerationClient, resolver: MetadataResolver) -> Self {
        Self {
            generation,
            resolver,
        }
    }

    /// Wire a context from configuration and already created clients.
    pub fn from_config(
        config: &AppConfig,
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn ObjectStore>,
    ) -> AppResult<Self> {
        let settings = GenerationSettings::from_config(config)?;
        Ok(Self::new(
            GenerationClient::new(backend, settings),
            MetadataResolver::new(store, &config.retrieval.metadata_suffix),
        ))
    }
}

/// Answer one query.
///
/// Only a failure of the generation call is fatal; metadata problems are
/// reported in [`AskOutcome::metadata_failures`].
pub async fn ask(context: &QueryContext, options: AskOptions) -> AppResult<AskOutcome> {
    tracing::info!("Answering query: {}", options.query);

    let filter = options.toggles.build();
    let request = context.generation.build_request(
        &options.query,
        &filter,
        options.session_id.as_deref(),
    );
    let retrieval_configuration = request.retrieval_configuration();

    tracing::debug!("Toggles: {:?}", options.toggles);

    let result = context.generation.send(&request).await?;

    let resolution = context.resolver.resolve_all(&result.citations).await;
    let citations = enrich_all(&result.citations, &resolution);

    tracing::debug!(
        "Enriched {} citation(s), {} with playback offsets",
        citations.len(),
        citations.iter().filter(|c| c.playback_start.is_some()).count()
    );

    Ok(AskOutcome {
        answer: result.answer_text,
        session_id: result.session_id,
        retrieval_configuration,
        citations,
        metadata_failures: resolution.failures,
    })
}
