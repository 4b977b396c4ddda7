//! AI-powered advisory path and its deterministic fallback.
//!
//! A model produces free-text advisories in the [`AiAdvisoryResponse`] shape. The
//! [`AiFallbackAdapter`] turns a successful response into an [`AdvisoryResult`] and, on any
//! failure, runs the rule engine exactly once instead.
//!
//! [`AdvisoryResult`]: super::domain::AdvisoryResult

mod fallback;
mod narrator;
mod remote;
mod transform;

pub use fallback::{AiFallbackAdapter, AI_UNAVAILABLE_MESSAGE};
pub use narrator::NarrativeAdvisoryModel;
pub use remote::RemoteAdvisoryModel;
pub use transform::{classify_method, extract_benefit, extract_timing, parse_scientific};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{SoilSample, TraditionalPractice};

/// Payload handed to an advisory model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAdvisoryRequest {
    pub district: String,
    pub crop: String,
    pub traditional_practices: Vec<TraditionalPractice>,
    pub soil_data: Option<SoilSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
}

/// Free-text advisory as returned by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAdvisoryResponse {
    pub recommendations: String,
    pub traditional_integration: String,
    pub scientific_rationale: String,
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub sustainability_score: f64,
    pub cost_score: f64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AiServiceError {
    #[error("missing AI credential or endpoint")]
    MissingCredential,
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("AI service rejected the credential")]
    Unauthorized,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed AI response: {0}")]
    MalformedResponse(String),
}

/// Anything that can draft an advisory narrative.
#[async_trait]
pub trait AdvisoryModel: Send + Sync {
    async fn generate(
        &self,
        request: &AiAdvisoryRequest,
    ) -> Result<AiAdvisoryResponse, AiServiceError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}
