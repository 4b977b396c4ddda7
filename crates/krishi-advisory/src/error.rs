use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::advisory::AdvisoryServiceError;
use crate::workflows::crop_doctor::CropDoctorError;
use crate::workflows::knowledge::KnowledgeImportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(KnowledgeImportError),
    Advisory(AdvisoryServiceError),
    CropDoctor(CropDoctorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "knowledge import error: {}", err),
            AppError::Advisory(err) => write!(f, "advisory error: {}", err),
            AppError::CropDoctor(err) => write!(f, "crop doctor error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Advisory(err) => Some(err),
            AppError::CropDoctor(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Import(_)
            | AppError::Advisory(AdvisoryServiceError::InvalidRequest(_))
            | AppError::CropDoctor(CropDoctorError::InvalidImage(_)) => StatusCode::BAD_REQUEST,
            AppError::Advisory(AdvisoryServiceError::NotCovered { .. }) => StatusCode::NOT_FOUND,
            AppError::CropDoctor(CropDoctorError::Classifier(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Advisory(AdvisoryServiceError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<KnowledgeImportError> for AppError {
    fn from(value: KnowledgeImportError) -> Self {
        Self::Import(value)
    }
}

impl From<AdvisoryServiceError> for AppError {
    fn from(value: AdvisoryServiceError) -> Self {
        Self::Advisory(value)
    }
}

impl From<CropDoctorError> for AppError {
    fn from(value: CropDoctorError) -> Self {
        Self::CropDoctor(value)
    }
}
