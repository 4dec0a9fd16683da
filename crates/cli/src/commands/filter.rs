//! Filter command handler.
//!
//! Prints the retrieval configuration the given toggles would produce,
//! without contacting the service.

use super::FilterArgs;
use crate::render;
use clap::Args;
use costbot_core::{config::AppConfig, AppResult};
use costbot_generation::retrieval_configuration;

/// Show the retrieval configuration for a set of toggles
#[derive(Args, Debug)]
pub struct FilterCommand {
    #[command(flatten)]
    pub filter: FilterArgs,
}

impl FilterCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing filter command");

        let filter = self.filter.toggles().build();
        if filter.is_empty() {
            tracing::info!("No category enabled, retrieval is unrestricted");
        }

        let configuration =
            retrieval_configuration(&filter, config.retrieval.number_of_results);
        println!("{}", render::render_retrieval_configuration(&configuration)?);

        Ok(())
    }
}
