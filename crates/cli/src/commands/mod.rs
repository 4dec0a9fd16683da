//! Command handlers for the costbot CLI.

pub mod ask;
pub mod chat;
pub mod filter;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use filter::FilterCommand;

use clap::Args;
use costbot_core::{config::AppConfig, AppError, AppResult};
use costbot_generation::{create_backend, load_sdk_config, FilterToggles};
use costbot_knowledge::{QueryContext, S3ObjectStore};
use std::sync::Arc;

/// Category toggles shared by every command that builds a filter.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Exclude AWS Made Easy livestream episodes
    #[arg(long)]
    pub no_livestream: bool,

    /// Exclude CloudFix blog posts
    #[arg(long)]
    pub no_blog_posts: bool,

    /// Lowest livestream episode number to include
    #[arg(long, value_name = "N")]
    pub min_episode: Option<f64>,

    /// Highest livestream episode number to include
    #[arg(long, value_name = "N")]
    pub max_episode: Option<f64>,
}

impl FilterArgs {
    pub fn toggles(&self) -> FilterToggles {
        FilterToggles {
            livestream: !self.no_livestream,
            blog_posts: !self.no_blog_posts,
            min_episode: self.min_episode,
            max_episode: self.max_episode,
        }
    }
}

/// Create the SDK clients once and wire the query pipeline.
pub async fn build_context(config: &AppConfig) -> AppResult<QueryContext> {
    config.validate()?;

    tracing::debug!("Loading SDK configuration for region {}", config.region);
    let sdk_config = load_sdk_config(&config.region, &config.retrieval).await;

    let backend = create_backend("bedrock", &sdk_config).map_err(AppError::Config)?;
    let store = Arc::new(S3ObjectStore::new(&sdk_config));

    QueryContext::from_config(config, backend, store)
}
