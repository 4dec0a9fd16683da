//! Interactive query loop.

use super::{build_context, FilterArgs};
use crate::render;
use clap::Args;
use costbot_core::{config::AppConfig, AppResult};
use costbot_knowledge::{ask, AskOptions};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Queries offered to new users.
pub const SAMPLE_QUERIES: [&str; 4] = [
    "What is Banjo's advice for getting started?",
    "What are the steps for EBS snapshot archiving, and why is it important for cost optimization?",
    "What does Jeff Barr think about 3d printing?",
    "When did stephen and rahul talk about metadata filtering for knowledge bases?",
];

/// Ask questions interactively
#[derive(Args, Debug)]
pub struct ChatCommand {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print the retrieval configuration before each answer
    #[arg(long)]
    pub show_filter: bool,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let context = build_context(config).await?;
        let toggles = self.filter.toggles();

        println!("Try these queries:");
        for (i, query) in SAMPLE_QUERIES.iter().enumerate() {
            println!("{}. {}", i + 1, query);
        }
        println!("Type 'exit' or 'quit' to leave.\n");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                println!();
                break;
            };
            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if is_exit(query) {
                break;
            }

            match ask(&context, AskOptions::new(query, toggles)).await {
                Ok(outcome) => {
                    if self.show_filter {
                        println!(
                            "{}",
                            render::render_retrieval_configuration(
                                &outcome.retrieval_configuration
                            )?
                        );
                    }
                    println!("{}", render::render_text(&outcome));
                    render::report_failures(&outcome);
                }
                Err(e) => {
                    tracing::error!("Query failed: {}", e);
                    eprintln!("Error: {}", e);
                }
            }
        }

        tracing::info!("Chat session ended");
        Ok(())
    }
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
