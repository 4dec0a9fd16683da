//! Model and knowledge-base identity types.

use serde::{Deserialize, Serialize};

/// Foundation model addressed by id and region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelIdentity {
    /// Model identifier (e.g., "anthropic.claude-3-sonnet-20240229-v1:0")
    pub model_id: String,

    /// Region hosting the model (e.g., "us-east-1")
    pub region: String,
}

impl ModelIdentity {
    pub fn new(model_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            region: region.into(),
        }
    }

    /// ARN of the foundation model as the generation endpoint expects it.
    pub fn arn(&self) -> String {
        format!(
            "arn:aws:bedrock:{}::foundation-model/{}",
            self.region, self.model_id
        )
    }
}

/// Fixed inputs of every generation request, taken from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub knowledge_base_id: String,

    pub model: ModelIdentity,

    /// Result-count cap of the retrieval step
    pub number_of_results: u32,

    /// Literal suffix appended to each query
    pub format_suffix: String,
}

impl GenerationSettings {
    /// Build settings from the loaded application configuration.
    pub fn from_config(config: &costbot_core::AppConfig) -> costbot_core::AppResult<Self> {
        Ok(Self {
            knowledge_base_id: config.require_knowledge_base_id()?.to_string(),
            model: ModelIdentity::new(&config.model_id, &config.region),
            number_of_results: config.retrieval.number_of_results,
            format_suffix: config.retrieval.format_suffix.clone(),
        })
    }
}
