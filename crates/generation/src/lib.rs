//! Retrieval-generation crate for the costbot client.
//!
//! Builds retrieval filters from category toggles, shapes
//! generate-with-retrieval requests, and sends them to a managed
//! knowledge-base backend through a trait-based interface.
//!
//! # Backends
//! - **Bedrock**: Bedrock Agent Runtime `RetrieveAndGenerate`
//!
//! # Example
//! ```no_run
//! use costbot_core::AppConfig;
//! use costbot_generation::{
//!     create_backend, load_sdk_config, FilterToggles, GenerationClient, GenerationSettings,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let sdk_config = load_sdk_config(&config.region, &config.retrieval).await;
//! let backend = create_backend("bedrock", &sdk_config)?;
//! let client = GenerationClient::new(backend, GenerationSettings::from_config(&config)?);
//!
//! let filter = FilterToggles::default().build();
//! let result = client.query("What is Banjo's advice?", &filter, None).await?;
//! println!("{}", result.answer_text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod filter;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{
    retrieval_configuration, Citation, GenerationBackend, GenerationClient, GenerationRequest,
    GenerationResult, Reference,
};
pub use factory::{create_backend, load_sdk_config};
pub use filter::{build_filter, FilterExpression, FilterNode, FilterToggles};
pub use providers::BedrockBackend;
pub use types::{GenerationSettings, ModelIdentity};
