use anyhow::Context;
use clap::Parser;
use redpost::cli::{Cli, Commands};
use redpost::config::{self, EnvCredentials};
use redpost::operations::submit::handle_post_command;
use redpost::server::{self, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Before parsing, so .env values can back the clap env fallbacks
    config::load_dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, reddit } => {
            let endpoints = reddit.endpoints().context("Invalid Reddit endpoint")?;
            let credentials = Arc::new(EnvCredentials::with_prefix(&reddit.env_prefix));
            server::serve(&host, port, AppState::new(credentials, endpoints)).await
        }
        Commands::Post {
            subreddit,
            title,
            text,
            reddit,
        } => {
            let endpoints = reddit.endpoints().context("Invalid Reddit endpoint")?;
            let credentials = Arc::new(EnvCredentials::with_prefix(&reddit.env_prefix));
            handle_post_command(subreddit, title, text, credentials, endpoints).await
        }
    }
}
