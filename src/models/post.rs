use crate::client::normalize_subreddit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned when either required field is missing
pub const REQUIRED_FIELDS_MESSAGE: &str = "Subreddit and title are required";

/// Raw fields as they arrive on `POST /post`, form-encoded or JSON.
///
/// Everything is optional here so that missing fields reach validation
/// instead of being rejected by the extractor.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PostForm {
    pub subreddit: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

/// A validated, normalized post ready for submission.
///
/// The subreddit is stored without any `r/` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub subreddit: String,
    pub title: String,
    pub text: String,
}

/// Raised when the subreddit or title is empty or missing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", REQUIRED_FIELDS_MESSAGE)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl PostRequest {
    pub fn new(subreddit: &str, title: &str, text: Option<&str>) -> Result<Self, ValidationError> {
        let subreddit = normalize_subreddit(subreddit);
        let title = title.trim();

        let mut missing = Vec::new();
        if subreddit.is_empty() {
            missing.push("subreddit");
        }
        if title.is_empty() {
            missing.push("title");
        }
        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Self {
            subreddit: subreddit.to_string(),
            title: title.to_string(),
            text: text.map(str::trim).unwrap_or_default().to_string(),
        })
    }
}

impl TryFrom<PostForm> for PostRequest {
    type Error = ValidationError;

    fn try_from(form: PostForm) -> Result<Self, Self::Error> {
        Self::new(
            form.subreddit.as_deref().unwrap_or_default(),
            form.title.as_deref().unwrap_or_default(),
            form.text.as_deref(),
        )
    }
}

/// Body returned on a successful submission
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostCreated {
    pub message: String,
    pub submission_url: String,
}

impl PostCreated {
    pub fn new(submission_url: String) -> Self {
        Self {
            message: "Post created successfully!".to_string(),
            submission_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(subreddit: Option<&str>, title: Option<&str>, text: Option<&str>) -> PostForm {
        PostForm {
            subreddit: subreddit.map(String::from),
            title: title.map(String::from),
            text: text.map(String::from),
        }
    }

    #[test]
    fn missing_text_becomes_empty_string() {
        let request = PostRequest::try_from(form(Some("rust"), Some("Hello"), None)).unwrap();
        assert_eq!(request.text, "");
    }

    #[test]
    fn text_is_trimmed_but_keeps_inner_whitespace() {
        let request =
            PostRequest::try_from(form(Some("rust"), Some("Hello"), Some("  line one\n\n  line two \t\n"))).unwrap();
        assert_eq!(request.text, "line one\n\n  line two");
    }

    #[test]
    fn empty_or_missing_required_fields_are_rejected() {
        let cases = [
            (form(None, Some("Hello"), None), vec!["subreddit"]),
            (form(Some(""), Some("Hello"), None), vec!["subreddit"]),
            (form(Some("rust"), None, Some("body")), vec!["title"]),
            (form(Some("rust"), Some("   "), None), vec!["title"]),
            (form(None, None, None), vec!["subreddit", "title"]),
            (form(Some("r/"), Some("Hello"), None), vec!["subreddit"]),
            (form(Some(" /r/ "), Some("Hello"), None), vec!["subreddit"]),
        ];

        for (input, expected) in cases {
            let err = PostRequest::try_from(input).unwrap_err();
            assert_eq!(err.missing, expected);
            assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn subreddit_prefix_is_stripped_during_validation() {
        let request = PostRequest::try_from(form(Some(" /r/rust "), Some("Hello"), None)).unwrap();
        assert_eq!(request.subreddit, "rust");
    }

    #[test]
    fn success_body_uses_fixed_message() {
        let created = PostCreated::new("https://reddit.com/r/test/abc".to_string());
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            serde_json::json!({
                "message": "Post created successfully!",
                "submission_url": "https://reddit.com/r/test/abc"
            })
        );
    }
}
