use crate::config::{ConfigError, Credentials, RedditEndpoints};
use crate::models::reddit::{AccessTokenResponse, ApiErrorItem, SubmitResponse};
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Scopes requested for the script app token
const SCOPES: &str = "submit identity read";

#[derive(Debug, Error)]
pub enum RedditClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Authentication failed: {0}")]
    Auth(String),
    /// The platform accepted the request but rejected its content
    #[error("Reddit API error: {}", join_items(.0))]
    Api(Vec<ApiErrorItem>),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_items(items: &[ApiErrorItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// An authenticated Reddit session.
///
/// Built fresh for every submission; nothing is pooled or reused.
pub struct RedditClient {
    client: Client,
    access_token: String,
    endpoints: RedditEndpoints,
}

impl RedditClient {
    /// Build an HTTP client for `credentials` and authenticate as a script app.
    ///
    /// Uses the password grant with the client id and secret as Basic auth,
    /// which works for any account type as long as the app is registered
    /// as a "script" app.
    pub async fn connect(
        credentials: &Credentials,
        endpoints: &RedditEndpoints,
    ) -> Result<Self, RedditClientError> {
        let client = Client::builder()
            .user_agent(credentials.user_agent.as_str())
            .build()?;

        let params = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", SCOPES),
        ];

        let auth = base64::encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        let res = client
            .post(endpoints.access_token_url()?)
            .header("Authorization", format!("Basic {}", auth))
            .form(&params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(RedditClientError::Auth(format!("HTTP {}: {}", status, body)));
        }

        let token: AccessTokenResponse = serde_json::from_str(&body)?;
        if let Some(error) = token.error {
            return Err(RedditClientError::Auth(error));
        }

        let access_token = token.access_token.ok_or_else(|| {
            RedditClientError::Auth("Failed to extract access token from response".to_string())
        })?;

        debug!(
            "API authentication successful, token obtained with scopes: {:?}",
            token.scope
        );

        Ok(Self {
            client,
            access_token,
            endpoints: endpoints.clone(),
        })
    }

    /// Look up a subreddit by name. This is lazy; no request is made.
    pub fn subreddit(&self, name: &str) -> Subreddit<'_> {
        Subreddit {
            client: self,
            name: normalize_subreddit(name).to_string(),
        }
    }
}

/// Strip a leading `r/` or `/r/` from a subreddit name
pub fn normalize_subreddit(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("/r/")
        .or_else(|| name.strip_prefix("r/"))
        .unwrap_or(name)
}

/// A handle on a single subreddit, bound to an authenticated client
pub struct Subreddit<'a> {
    client: &'a RedditClient,
    name: String,
}

/// A post created on the platform
#[derive(Debug, Clone)]
pub struct Submission {
    pub url: String,
    /// Fullname of the new post, e.g. `t3_abc`
    pub name: Option<String>,
}

impl Subreddit<'_> {
    /// Submit a self-text post.
    ///
    /// Each call creates a new post; repeating it yields a duplicate.
    pub async fn submit(&self, title: &str, selftext: &str) -> Result<Submission, RedditClientError> {
        let params = [
            ("api_type", "json"),
            ("kind", "self"),
            ("sr", self.name.as_str()),
            ("title", title),
            ("text", selftext),
        ];

        let response = self
            .client
            .client
            .post(self.client.endpoints.submit_url()?)
            .bearer_auth(&self.client.access_token)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RedditClientError::Http { status, body });
        }

        debug!("Post creation response: {}", body);
        let parsed: SubmitResponse = serde_json::from_str(&body)?;

        let items = parsed.json.error_items();
        if !items.is_empty() {
            return Err(RedditClientError::Api(items));
        }

        let data = parsed.json.data.ok_or_else(|| {
            RedditClientError::UnexpectedResponse("submission response has no data".to_string())
        })?;
        let url = data.url.ok_or_else(|| {
            RedditClientError::UnexpectedResponse("submission response has no url".to_string())
        })?;

        Ok(Submission {
            url,
            name: data.name,
        })
    }
}
