use crate::client::{RedditClient, RedditClientError, Submission};
use crate::config::{CredentialSource, RedditEndpoints};
use crate::models::post::{PostForm, PostRequest};
use crate::models::reddit::ApiErrorItem;
use log::{error, info, warn};
use std::sync::Arc;

/// Everything that can come of a single post submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Success { url: String },
    ValidationError { message: String, missing: Vec<&'static str> },
    PlatformError { items: Vec<ApiErrorItem> },
    UnknownError { message: String },
}

impl From<RedditClientError> for PostOutcome {
    fn from(err: RedditClientError) -> Self {
        match err {
            RedditClientError::Api(items) => PostOutcome::PlatformError { items },
            other => PostOutcome::UnknownError {
                message: other.to_string(),
            },
        }
    }
}

/// Validates a post, authenticates and submits it
pub struct SubmitOperation {
    form: PostForm,
    credentials: Arc<dyn CredentialSource>,
    endpoints: RedditEndpoints,
}

impl SubmitOperation {
    pub fn new(
        form: PostForm,
        credentials: Arc<dyn CredentialSource>,
        endpoints: RedditEndpoints,
    ) -> Self {
        Self {
            form,
            credentials,
            endpoints,
        }
    }

    /// Run the submission once. Nothing is retried.
    pub async fn execute(self) -> PostOutcome {
        let request = match PostRequest::try_from(self.form) {
            Ok(request) => request,
            Err(err) => {
                info!("Rejected post with missing fields: {:?}", err.missing);
                return PostOutcome::ValidationError {
                    message: err.to_string(),
                    missing: err.missing,
                };
            }
        };

        info!("Creating a new post in r/{}: '{}'", request.subreddit, request.title);

        match submit(&request, self.credentials.as_ref(), &self.endpoints).await {
            Ok(Submission { url, name }) => {
                info!(
                    "Post {} created successfully! URL: {}",
                    name.as_deref().unwrap_or("<unnamed>"),
                    url
                );
                PostOutcome::Success { url }
            }
            Err(RedditClientError::Api(items)) => {
                warn!("Reddit rejected the post: {:?}", items);
                PostOutcome::PlatformError { items }
            }
            Err(err) => {
                error!("Error creating post: {}", err);
                err.into()
            }
        }
    }
}

async fn submit(
    request: &PostRequest,
    credentials: &dyn CredentialSource,
    endpoints: &RedditEndpoints,
) -> Result<Submission, RedditClientError> {
    let credentials = credentials.load()?;
    let reddit = RedditClient::connect(&credentials, endpoints).await?;
    reddit
        .subreddit(&request.subreddit)
        .submit(&request.title, &request.text)
        .await
}

/// CLI handler function for the post command
pub async fn handle_post_command(
    subreddit: String,
    title: String,
    text: Option<String>,
    credentials: Arc<dyn CredentialSource>,
    endpoints: RedditEndpoints,
) -> anyhow::Result<()> {
    let form = PostForm {
        subreddit: Some(subreddit),
        title: Some(title),
        text,
    };

    match SubmitOperation::new(form, credentials, endpoints).execute().await {
        PostOutcome::Success { .. } => Ok(()),
        PostOutcome::ValidationError { message, .. } => anyhow::bail!(message),
        PostOutcome::PlatformError { items } => {
            for item in &items {
                error!("{}", item);
            }
            anyhow::bail!("Reddit API Error")
        }
        PostOutcome::UnknownError { message } => anyhow::bail!(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, Credentials};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often credentials are requested
    struct CountingSource(AtomicUsize);

    impl CredentialSource for CountingSource {
        fn load(&self) -> Result<Credentials, ConfigError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ConfigError::Missing("REDDIT_CLIENT_ID".to_string()))
        }
    }

    fn endpoints() -> RedditEndpoints {
        // Nothing listens here; any request would surface as an UnknownError
        RedditEndpoints::parse("http://127.0.0.1:9", "http://127.0.0.1:9").unwrap()
    }

    #[tokio::test]
    async fn invalid_request_never_reads_credentials() {
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));
        let form = PostForm {
            subreddit: Some("rust".into()),
            title: Some("".into()),
            text: None,
        };

        let outcome = SubmitOperation::new(form, source.clone(), endpoints()).execute().await;

        assert_eq!(
            outcome,
            PostOutcome::ValidationError {
                message: "Subreddit and title are required".into(),
                missing: vec!["title"],
            }
        );
        assert_eq!(source.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_configuration_is_an_unknown_error() {
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));
        let form = PostForm {
            subreddit: Some("rust".into()),
            title: Some("Hello".into()),
            text: None,
        };

        let outcome = SubmitOperation::new(form, source.clone(), endpoints()).execute().await;

        assert_eq!(
            outcome,
            PostOutcome::UnknownError {
                message: "missing configuration value: REDDIT_CLIENT_ID".into()
            }
        );
        assert_eq!(source.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn only_api_rejections_become_platform_errors() {
        let item = ApiErrorItem {
            error_type: "RATELIMIT".into(),
            message: "you are doing that too much".into(),
            field: None,
        };
        assert_eq!(
            PostOutcome::from(RedditClientError::Api(vec![item.clone()])),
            PostOutcome::PlatformError { items: vec![item] }
        );
        assert!(matches!(
            PostOutcome::from(RedditClientError::Auth("invalid_grant".into())),
            PostOutcome::UnknownError { message } if message == "Authentication failed: invalid_grant"
        ));
    }
}
