use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdvisoryRequest, PracticeSubmission};
use super::repository::{FeedbackRepository, FeedbackSubmission, KnowledgeRepository};
use super::service::{AdvisoryService, AdvisoryServiceError};

/// Router builder exposing advisory, knowledge and feedback endpoints.
pub fn advisory_router<K, F>(service: Arc<AdvisoryService<K, F>>) -> Router
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    Router::new()
        .route("/api/v1/advisory", post(advisory_handler::<K, F>))
        .route(
            "/api/v1/traditional",
            get(list_practices_handler::<K, F>).post(submit_practice_handler::<K, F>),
        )
        .route("/api/v1/feedback", post(feedback_handler::<K, F>))
        .route(
            "/api/v1/feedback/:advisory_id",
            get(feedback_summary_handler::<K, F>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PracticeQuery {
    #[serde(default)]
    pub(crate) district: String,
    #[serde(default)]
    pub(crate) crop: String,
}

pub(crate) async fn advisory_handler<K, F>(
    State(service): State<Arc<AdvisoryService<K, F>>>,
    axum::Json(request): axum::Json<AdvisoryRequest>,
) -> Response
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.advise(request).await {
        Ok(envelope) => success(StatusCode::OK, envelope),
        Err(error) => failure(error),
    }
}

pub(crate) async fn submit_practice_handler<K, F>(
    State(service): State<Arc<AdvisoryService<K, F>>>,
    axum::Json(submission): axum::Json<PracticeSubmission>,
) -> Response
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.submit_practice(submission) {
        Ok(record) => success(StatusCode::CREATED, record),
        Err(error) => failure(error),
    }
}

pub(crate) async fn list_practices_handler<K, F>(
    State(service): State<Arc<AdvisoryService<K, F>>>,
    Query(query): Query<PracticeQuery>,
) -> Response
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.verified_practices(&query.district, &query.crop) {
        Ok(records) => success(StatusCode::OK, records),
        Err(error) => failure(error),
    }
}

pub(crate) async fn feedback_handler<K, F>(
    State(service): State<Arc<AdvisoryService<K, F>>>,
    axum::Json(submission): axum::Json<FeedbackSubmission>,
) -> Response
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.record_feedback(submission) {
        Ok(record) => success(StatusCode::CREATED, record),
        Err(error) => failure(error),
    }
}

pub(crate) async fn feedback_summary_handler<K, F>(
    State(service): State<Arc<AdvisoryService<K, F>>>,
    Path(advisory_id): Path<String>,
) -> Response
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    match service.feedback_summary(&advisory_id) {
        Ok(summary) => success(StatusCode::OK, summary),
        Err(error) => failure(error),
    }
}

fn success<T: serde::Serialize>(status: StatusCode, data: T) -> Response {
    let payload = json!({ "success": true, "data": data });
    (status, axum::Json(payload)).into_response()
}

fn failure(error: AdvisoryServiceError) -> Response {
    let status = match &error {
        AdvisoryServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AdvisoryServiceError::NotCovered { .. } => StatusCode::NOT_FOUND,
        AdvisoryServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "success": false, "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
