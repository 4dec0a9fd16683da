//! Query pipeline types.

use crate::citations::EnrichedCitation;
use crate::metadata::LocatorFailure;
use costbot_generation::FilterToggles;
use serde::Serialize;

/// One user query with its toggle state.
#[derive(Debug, Clone)]
pub struct AskOptions {
    pub query: String,
    pub toggles: FilterToggles,
    pub session_id: Option<String>,
}

impl AskOptions {
    pub fn new(query: impl Into<String>, toggles: FilterToggles) -> Self {
        Self {
            query: query.into(),
            toggles,
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Everything the presentation layer needs for one answered query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskOutcome {
    pub answer: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Retrieval configuration that was sent, in the service's JSON shape
    pub retrieval_configuration: serde_json::Value,

    pub citations: Vec<EnrichedCitation>,

    /// Sources whose metadata could not be resolved
    #[serde(skip)]
    pub metadata_failures: Vec<LocatorFailure>,
}

impl AskOutcome {
    /// Human-readable lines describing metadata failures.
    pub fn failure_messages(&self) -> Vec<String> {
        self.metadata_failures
            .iter()
            .map(|f| format!("{}: {}", f.source_locator, f.error))
            .collect()
    }
}
