//! Retrieval-generation client abstraction and request/response types.
//!
//! `GenerationClient` shapes requests (query suffix, result cap, model ARN,
//! filter) and hands them to a `GenerationBackend`, which performs the
//! actual remote call.

use crate::filter::FilterExpression;
use crate::types::GenerationSettings;
use costbot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One source passage backing part of the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Retrieved passage text
    pub content_text: String,

    /// URI of the source document (e.g., `s3://bucket/key`), when the
    /// service reported one
    pub source_locator: Option<String>,
}

/// A span of generated text and the references that justify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub generated_text: String,

    /// Ordered; index 0 is the primary reference
    pub retrieved_references: Vec<Reference>,
}

impl Citation {
    pub fn primary_reference(&self) -> Option<&Reference> {
        self.retrieved_references.first()
    }

    pub fn primary_locator(&self) -> Option<&str> {
        self.primary_reference()
            .and_then(|r| r.source_locator.as_deref())
    }
}

/// Answer plus citations returned by the generation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub answer_text: String,

    pub citations: Vec<Citation>,

    /// Session the service attached to this exchange
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Fully shaped request, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Query text including the formatting suffix
    pub text: String,

    pub knowledge_base_id: String,

    pub model_arn: String,

    pub filter: FilterExpression,

    pub number_of_results: u32,

    pub session_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration<'a> {
    vector_search_configuration: VectorSearchConfiguration<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration<'a> {
    filter: &'a FilterExpression,
    number_of_results: u32,
}

/// Retrieval configuration in the service's JSON shape.
pub fn retrieval_configuration(
    filter: &FilterExpression,
    number_of_results: u32,
) -> serde_json::Value {
    let config = RetrievalConfiguration {
        vector_search_configuration: VectorSearchConfiguration {
            filter,
            number_of_results,
        },
    };
    serde_json::to_value(config).unwrap_or(serde_json::Value::Null)
}

impl GenerationRequest {
    /// The retrieval configuration of this request, for display and logging.
    pub fn retrieval_configuration(&self) -> serde_json::Value {
        retrieval_configuration(&self.filter, self.number_of_results)
    }
}

/// Trait for generate-with-retrieval backends.
///
/// Implementations perform one remote call per request and never retry.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the backend name (e.g., "bedrock").
    fn backend_name(&self) -> &str;

    /// Retrieve passages and generate an answer for `request`.
    async fn retrieve_and_generate(&self, request: &GenerationRequest)
        -> AppResult<GenerationResult>;
}

/// Request-shaping wrapper around a [`GenerationBackend`].
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    settings: GenerationSettings,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>, settings: GenerationSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Shape the request for `text` without sending it.
    pub fn build_request(
        &self,
        text: &str,
        filter: &FilterExpression,
        session_id: Option<&str>,
    ) -> GenerationRequest {
        GenerationRequest {
            text: format!("{}{}", text, self.settings.format_suffix),
            knowledge_base_id: self.settings.knowledge_base_id.clone(),
            model_arn: self.settings.model.arn(),
            filter: filter.clone(),
            number_of_results: self.settings.number_of_results,
            session_id: session_id.map(str::to_string),
        }
    }

    /// Send a query and return the generated answer with its citations.
    ///
    /// Every failure is reported as [`AppError::RemoteService`].
    pub async fn query(
        &self,
        text: &str,
        filter: &FilterExpression,
        session_id: Option<&str>,
    ) -> AppResult<GenerationResult> {
        let request = self.build_request(text, filter, session_id);
        self.send(&request).await
    }

    /// Send an already shaped request.
    pub async fn send(&self, request: &GenerationRequest) -> AppResult<GenerationResult> {
        tracing::info!(
            "Sending retrieve-and-generate request via {}",
            self.backend.backend_name()
        );
        tracing::debug!(
            "Retrieval configuration: {}",
            request.retrieval_configuration()
        );

        let result = self
            .backend
            .retrieve_and_generate(request)
            .await
            .map_err(|e| match e {
                AppError::RemoteService(_) => e,
                other => AppError::RemoteService(other.to_string()),
            })?;

        tracing::info!(
            "Received answer with {} citation(s)",
            result.citations.len()
        );
        Ok(result)
    }
}
