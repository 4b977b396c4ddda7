use std::sync::Arc;

use tracing::warn;

use super::super::domain::{AdvisoryResult, SoilSample, TraditionalPractice};
use super::super::engine::AdvisoryRuleEngine;
use super::transform::into_advisory;
use super::{AdvisoryModel, AiAdvisoryRequest, AiServiceError};

pub const AI_UNAVAILABLE_MESSAGE: &str = "AI service temporarily unavailable";

/// Tries the advisory model once; on any failure runs the rule engine once instead.
///
/// The rule engine is never consulted when the model succeeds, so a response is always built
/// from exactly one source.
#[derive(Clone)]
pub struct AiFallbackAdapter {
    model: Arc<dyn AdvisoryModel>,
    engine: Arc<AdvisoryRuleEngine>,
}

impl std::fmt::Debug for AiFallbackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiFallbackAdapter")
            .field("model", &self.model.name())
            .field("engine", &self.engine)
            .finish()
    }
}

impl AiFallbackAdapter {
    pub fn new(model: Arc<dyn AdvisoryModel>, engine: Arc<AdvisoryRuleEngine>) -> Self {
        Self { model, engine }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub async fn generate(
        &self,
        district: &str,
        crop: &str,
        practices: &[TraditionalPractice],
        soil: Option<&SoilSample>,
        user_query: Option<&str>,
    ) -> AdvisoryResult {
        let request = AiAdvisoryRequest {
            district: district.to_string(),
            crop: crop.to_string(),
            traditional_practices: practices.to_vec(),
            soil_data: soil.copied(),
            user_query: user_query.map(str::to_string),
        };

        let outcome = self.model.generate(&request).await.and_then(|response| {
            if response.action_plan.iter().all(|step| step.trim().is_empty()) {
                Err(AiServiceError::MalformedResponse(
                    "action plan is empty".to_string(),
                ))
            } else {
                Ok(response)
            }
        });

        match outcome {
            Ok(response) => into_advisory(practices, response),
            Err(error) => {
                warn!(
                    model = self.model.name(),
                    %district,
                    %crop,
                    %error,
                    "AI advisory failed, falling back to rule engine"
                );
                let mut advisory = self.engine.generate_advisory(practices, soil);
                advisory.is_ai_powered = false;
                advisory.ai_error = Some(AI_UNAVAILABLE_MESSAGE.to_string());
                advisory
            }
        }
    }
}
