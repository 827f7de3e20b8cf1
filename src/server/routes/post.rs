use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use log::debug;
use serde_json::json;

use crate::models::post::{PostCreated, PostForm, REQUIRED_FIELDS_MESSAGE};
use crate::operations::submit::{PostOutcome, SubmitOperation};
use crate::server::AppState;

/// Post fields taken from a form-encoded body, or JSON when the
/// request says `application/json`.
pub struct PostInput(pub PostForm);

#[async_trait]
impl<S> FromRequest<S> for PostInput
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim_start().to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false);

        let parsed = if is_json {
            Json::<PostForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|rejection| rejection.body_text())
        } else {
            Form::<PostForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|rejection| rejection.body_text())
        };

        parsed.map(PostInput).map_err(|reason| {
            debug!("Unreadable post body: {}", reason);
            validation_failed()
        })
    }
}

fn validation_failed() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": REQUIRED_FIELDS_MESSAGE })),
    )
        .into_response()
}

/// Create a new Reddit post
pub async fn post_handler(State(state): State<AppState>, PostInput(form): PostInput) -> PostOutcome {
    let operation = SubmitOperation::new(form, state.credentials.clone(), state.endpoints.clone());

    // Detached so a client disconnect cannot abort a submission mid-flight
    match tokio::spawn(operation.execute()).await {
        Ok(outcome) => outcome,
        Err(err) => PostOutcome::UnknownError {
            message: err.to_string(),
        },
    }
}

impl IntoResponse for PostOutcome {
    fn into_response(self) -> Response {
        match self {
            PostOutcome::Success { url } => (StatusCode::OK, Json(PostCreated::new(url))).into_response(),
            PostOutcome::ValidationError { message, .. } => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            PostOutcome::PlatformError { items } => {
                let details: Vec<String> = items.iter().map(ToString::to_string).collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Reddit API Error", "details": details })),
                )
                    .into_response()
            }
            PostOutcome::UnknownError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error", "details": message })),
            )
                .into_response(),
        }
    }
}
