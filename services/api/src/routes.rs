use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use krishi_advisory::workflows::advisory::{
    advisory_router, AdvisoryService, FeedbackRepository, KnowledgeRepository,
};
use krishi_advisory::workflows::crop_doctor::{crop_doctor_router, CropDoctorService};
use serde_json::json;
use std::sync::Arc;

/// Full application router: advisory endpoints, optional crop doctor, and platform health endpoints.
pub(crate) fn build_router<K, F>(
    advisory: Arc<AdvisoryService<K, F>>,
    crop_doctor: Option<Arc<CropDoctorService>>,
) -> Router
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    let mut router = advisory_router(advisory);
    if let Some(service) = crop_doctor {
        router = router.merge(crop_doctor_router(service));
    }

    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
