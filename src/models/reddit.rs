use serde::Deserialize;
use std::fmt;

/// Response from `/api/v1/access_token`.
///
/// Reddit answers failed grants with a 200 and an `error` field, so both
/// shapes share one struct.
#[derive(Deserialize, Debug)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
}

/// Top-level response for `/api/submit` with `api_type=json`
#[derive(Deserialize, Debug)]
pub struct SubmitResponse {
    pub json: SubmitJson,
}

#[derive(Deserialize, Debug)]
pub struct SubmitJson {
    /// Each entry is `[error_type, message, field]`
    #[serde(default)]
    pub errors: Vec<Vec<serde_json::Value>>,
    pub data: Option<SubmitData>,
}

/// Details of the created submission
#[derive(Deserialize, Debug)]
pub struct SubmitData {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl SubmitJson {
    pub fn error_items(&self) -> Vec<ApiErrorItem> {
        self.errors.iter().map(|raw| ApiErrorItem::from_raw(raw)).collect()
    }
}

/// One entry of a platform rejection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorItem {
    pub error_type: String,
    pub message: String,
    pub field: Option<String>,
}

impl ApiErrorItem {
    fn from_raw(raw: &[serde_json::Value]) -> Self {
        let text = |idx: usize| raw.get(idx).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            error_type: text(0).unwrap_or_else(|| "UNKNOWN".to_string()),
            message: text(1).unwrap_or_default(),
            field: text(2),
        }
    }
}

impl fmt::Display for ApiErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}
