//! Ask command handler.
//!
//! Sends one query through the pipeline and prints the answer with its
//! citations.

use super::{build_context, FilterArgs};
use crate::render;
use clap::Args;
use costbot_core::{config::AppConfig, AppResult};
use costbot_knowledge::{ask, AskOptions};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Continue an existing service session
    #[arg(long)]
    pub session_id: Option<String>,

    /// Print the retrieval configuration before the answer
    #[arg(long)]
    pub show_filter: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let context = build_context(config).await?;

        let mut options = AskOptions::new(self.query.join(" "), self.filter.toggles());
        if let Some(ref session_id) = self.session_id {
            options = options.with_session(session_id);
        }

        let outcome = ask(&context, options).await?;

        if self.json {
            println!("{}", render::render_json(&outcome)?);
            return Ok(());
        }

        if self.show_filter {
            println!(
                "{}",
                render::render_retrieval_configuration(&outcome.retrieval_configuration)?
            );
        }
        print!("{}", render::render_text(&outcome));
        render::report_failures(&outcome);

        Ok(())
    }
}
