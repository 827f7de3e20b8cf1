use clap::{Args, Parser};

use crate::config::{ConfigError, RedditEndpoints, DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_ENV_PREFIX};

#[derive(Parser, Debug)]
#[command(
    name = "redpost",
    version,
    about = "HTTP API for creating Reddit posts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command that talks to Reddit
#[derive(Args, Debug, Clone)]
pub struct RedditArgs {
    /// Base URL for the OAuth token exchange.
    #[arg(long, env = "REDDIT_AUTH_URL", default_value = DEFAULT_AUTH_URL)]
    pub auth_url: String,

    /// Base URL for authenticated API calls.
    #[arg(long, env = "REDDIT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Prefix of the credential variables, e.g. REDDIT for REDDIT_CLIENT_ID.
    #[arg(long, env = "REDPOST_ENV_PREFIX", default_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,
}

impl RedditArgs {
    pub fn endpoints(&self) -> Result<RedditEndpoints, ConfigError> {
        RedditEndpoints::parse(&self.auth_url, &self.api_url)
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API.
    /// Credentials are read from the environment on every request.
    Serve {
        /// Address to bind to.
        #[arg(long, env = "REDPOST_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, short, env = "REDPOST_PORT", default_value_t = 8000)]
        port: u16,

        #[command(flatten)]
        reddit: RedditArgs,
    },

    /// Create a single post from the command line using the same credentials.
    Post {
        /// The name of the subreddit to post to.
        #[arg(help = "Subreddit name", required = true)]
        subreddit: String,

        /// Title of the post.
        #[arg(help = "Post title", required = true)]
        title: String,

        /// Text content of the post.
        #[arg(long, short, help = "Post text content")]
        text: Option<String>,

        #[command(flatten)]
        reddit: RedditArgs,
    },
}
