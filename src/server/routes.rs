use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use crate::server::AppState;
use crate::{Error, Feedback, NewFeedback, SortOrder};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

#[derive(Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateFeedbackRequest {
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Feedback id taken from the `{id}` path segment.
///
/// Only plain non-negative integers match; anything else is rejected with a
/// bare 404 as if the route didn't exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackId(pub i64);

impl<S> FromRequestParts<S> for FeedbackId
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;

        parse_feedback_id(&raw)
            .map(FeedbackId)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

/// Parse a path segment as a feedback id
pub fn parse_feedback_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Feedback>>, Error> {
    let sort = SortOrder::from_query(params.ok().and_then(|Query(p)| p.sort).as_deref());

    let feedback = state.with_store(move |store| store.list_feedback(sort)).await?;
    tracing::debug!("Listed {} feedback entries (sort: {})", feedback.len(), sort);

    Ok(Json(feedback))
}

pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>), Error> {
    let content = match payload {
        Ok(Json(request)) => request.content,
        Err(rejection) => {
            tracing::debug!("Rejected feedback body: {}", rejection);
            None
        }
    };
    let new = NewFeedback::parse(content)?;

    let created = state.with_store(move |store| store.create_feedback(&new)).await?;
    tracing::info!("Created feedback {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn toggle_star(
    State(state): State<Arc<AppState>>,
    FeedbackId(id): FeedbackId,
) -> Result<Json<Feedback>, Error> {
    let updated = state
        .with_store(move |store| store.toggle_star(id))
        .await
        .inspect_err(log_not_found)?;
    tracing::info!("Feedback {} starred: {}", id, updated.starred);

    Ok(Json(updated))
}

pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    FeedbackId(id): FeedbackId,
) -> Result<StatusCode, Error> {
    state
        .with_store(move |store| store.delete_feedback(id))
        .await
        .inspect_err(log_not_found)?;
    tracing::info!("Deleted feedback {}", id);

    Ok(StatusCode::NO_CONTENT)
}

fn log_not_found(error: &Error) {
    if let Error::NotFound { id } = error {
        tracing::debug!("Feedback {} not found", id);
    }
}
