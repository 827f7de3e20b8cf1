//! Configuration module for Reddit credentials and endpoints

use log::info;
use std::env;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Default prefix for the credential environment variables (`REDDIT_CLIENT_ID`, ...)
pub const DEFAULT_ENV_PREFIX: &str = "REDDIT";

/// Base URL used for the OAuth token exchange
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";

/// Base URL used for authenticated API calls
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(String),
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// The five values needed to act as a Reddit script app
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Something that can hand out credentials when a request needs them.
///
/// Implementations are consulted once per request; nothing is cached.
pub trait CredentialSource: Send + Sync {
    fn load(&self) -> Result<Credentials, ConfigError>;
}

/// A fixed credential set, handy when configuration is resolved up front
impl CredentialSource for Credentials {
    fn load(&self) -> Result<Credentials, ConfigError> {
        Ok(self.clone())
    }
}

/// Reads credentials from the process environment on every call
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    prefix: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_ENV_PREFIX)
    }
}

impl EnvCredentials {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Name of the environment variable holding `field`, e.g. `REDDIT_CLIENT_ID`
    pub fn var_name(&self, field: &str) -> String {
        format!("{}_{}", self.prefix, field)
    }

    fn require(&self, field: &str) -> Result<String, ConfigError> {
        let name = self.var_name(field);
        env::var(&name).map_err(|_| ConfigError::Missing(name))
    }
}

impl CredentialSource for EnvCredentials {
    fn load(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            client_id: self.require("CLIENT_ID")?,
            client_secret: self.require("CLIENT_SECRET")?,
            user_agent: self.require("USER_AGENT")?,
            username: self.require("USERNAME")?,
            password: self.require("PASSWORD")?,
        })
    }
}

/// Where the Reddit token exchange and API calls are sent
#[derive(Debug, Clone)]
pub struct RedditEndpoints {
    pub auth_url: Url,
    pub api_url: Url,
}

impl RedditEndpoints {
    pub fn parse(auth_url: &str, api_url: &str) -> Result<Self, ConfigError> {
        let auth_url = Url::parse(auth_url).map_err(|source| ConfigError::InvalidUrl {
            name: "auth_url",
            source,
        })?;
        let api_url = Url::parse(api_url).map_err(|source| ConfigError::InvalidUrl {
            name: "api_url",
            source,
        })?;

        Ok(Self { auth_url, api_url })
    }

    /// Token endpoint for the OAuth password grant
    pub fn access_token_url(&self) -> Result<Url, ConfigError> {
        join(&self.auth_url, "api/v1/access_token", "auth_url")
    }

    /// Endpoint for submitting a new post
    pub fn submit_url(&self) -> Result<Url, ConfigError> {
        join(&self.api_url, "api/submit", "api_url")
    }
}

fn join(base: &Url, path: &str, name: &'static str) -> Result<Url, ConfigError> {
    // Url::join drops the last path segment unless the base ends with a slash
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(path)
        .map_err(|source| ConfigError::InvalidUrl { name, source })
}

/// Load a local .env file into the process environment, if there is one
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables only"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_credentials_report_the_first_missing_variable() {
        let source = EnvCredentials::with_prefix("REDPOST_UNIT_UNSET");
        match source.load() {
            Err(ConfigError::Missing(name)) => assert_eq!(name, "REDPOST_UNIT_UNSET_CLIENT_ID"),
            other => panic!("expected missing config, got {:?}", other),
        }
    }

    #[test]
    fn env_credentials_are_read_at_call_time() {
        let source = EnvCredentials::with_prefix("REDPOST_UNIT_SET");
        for (field, value) in [
            ("CLIENT_ID", "id"),
            ("CLIENT_SECRET", "secret"),
            ("USER_AGENT", "redpost-test"),
            ("USERNAME", "someone"),
        ] {
            env::set_var(source.var_name(field), value);
        }
        assert!(matches!(source.load(), Err(ConfigError::Missing(name)) if name.ends_with("_PASSWORD")));

        env::set_var(source.var_name("PASSWORD"), "hunter2");
        let creds = source.load().unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.user_agent, "redpost-test");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials {
            client_id: "id".into(),
            client_secret: "topsecret".into(),
            user_agent: "ua".into(),
            username: "user".into(),
            password: "hunter2".into(),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("topsecret"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn endpoint_urls_keep_base_paths() {
        let endpoints = RedditEndpoints::parse("http://127.0.0.1:9000", "http://127.0.0.1:9000/mock").unwrap();
        assert_eq!(
            endpoints.access_token_url().unwrap().as_str(),
            "http://127.0.0.1:9000/api/v1/access_token"
        );
        assert_eq!(
            endpoints.submit_url().unwrap().as_str(),
            "http://127.0.0.1:9000/mock/api/submit"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(matches!(
            RedditEndpoints::parse("not a url", DEFAULT_API_URL),
            Err(ConfigError::InvalidUrl { name: "auth_url", .. })
        ));
    }
}
