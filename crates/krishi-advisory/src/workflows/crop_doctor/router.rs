use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::service::{CropDoctorError, CropDoctorRequest, CropDoctorService};

pub fn crop_doctor_router(service: Arc<CropDoctorService>) -> Router {
    Router::new()
        .route("/api/v1/crop-doctor", post(diagnose_handler))
        .with_state(service)
}

async fn diagnose_handler(
    State(service): State<Arc<CropDoctorService>>,
    Json(request): Json<CropDoctorRequest>,
) -> Response {
    match service.examine(request).await {
        Ok(diagnosis) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": diagnosis })),
        )
            .into_response(),
        Err(error) => {
            let status = match &error {
                CropDoctorError::InvalidImage(_) => StatusCode::BAD_REQUEST,
                CropDoctorError::Classifier(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(json!({ "success": false, "error": error.to_string() })),
            )
                .into_response()
        }
    }
}
