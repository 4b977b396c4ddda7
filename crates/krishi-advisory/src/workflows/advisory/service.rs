use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::ai::AiFallbackAdapter;
use super::domain::{
    AdvisoryEnvelope, AdvisoryRequest, KnowledgeRecord, PracticeId, PracticeSubmission,
    TraditionalPractice,
};
use super::engine::AdvisoryRuleEngine;
use super::repository::{
    FeedbackRecord, FeedbackRepository, FeedbackSubmission, FeedbackSummary, KnowledgeRepository,
    RepositoryError,
};

/// Service composing the knowledge store, rule engine, optional AI path, and feedback sink.
pub struct AdvisoryService<K, F> {
    knowledge: Arc<K>,
    feedback: Arc<F>,
    engine: Arc<AdvisoryRuleEngine>,
    ai: Option<AiFallbackAdapter>,
}

impl<K, F> AdvisoryService<K, F>
where
    K: KnowledgeRepository + 'static,
    F: FeedbackRepository + 'static,
{
    pub fn new(knowledge: Arc<K>, feedback: Arc<F>, engine: Arc<AdvisoryRuleEngine>) -> Self {
        Self {
            knowledge,
            feedback,
            engine,
            ai: None,
        }
    }

    /// Enable the AI path. Requests that opt out still use the rule engine directly.
    pub fn with_ai(mut self, adapter: AiFallbackAdapter) -> Self {
        self.ai = Some(adapter);
        self
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Build an advisory for a district and crop from verified knowledge and the latest sample.
    pub async fn advise(
        &self,
        request: AdvisoryRequest,
    ) -> Result<AdvisoryEnvelope, AdvisoryServiceError> {
        let district = required("district", &request.district)?;
        let crop = required("crop", &request.crop)?;

        let records = self.knowledge.verified_practices(district, crop)?;
        if records.is_empty() {
            return Err(AdvisoryServiceError::NotCovered {
                district: district.to_string(),
                crop: crop.to_string(),
            });
        }
        let practices: Vec<TraditionalPractice> =
            records.into_iter().map(|record| record.practice).collect();

        let soil_data = match self.knowledge.latest_soil_sample(district, crop) {
            Ok(sample) => sample,
            Err(error) => {
                warn!(%district, %crop, %error, "soil lookup failed, advising without a sample");
                None
            }
        };
        let soil = soil_data.as_ref().map(|record| &record.sample);

        let advisory = match (&self.ai, request.use_ai) {
            (Some(adapter), true) => {
                adapter
                    .generate(
                        district,
                        crop,
                        &practices,
                        soil,
                        request.user_query.as_deref(),
                    )
                    .await
            }
            _ => self.engine.generate_advisory(&practices, soil),
        };

        info!(
            %district,
            %crop,
            practices = practices.len(),
            ai_powered = advisory.is_ai_powered,
            sustainability = advisory.sustainability_score,
            cost = advisory.cost_score,
            "advisory generated"
        );

        Ok(AdvisoryEnvelope {
            advisory_id: Uuid::new_v4(),
            district: district.to_string(),
            crop: crop.to_string(),
            advisory,
            soil_data,
        })
    }

    /// Store a practice for later verification. Submissions never count until verified.
    pub fn submit_practice(
        &self,
        submission: PracticeSubmission,
    ) -> Result<KnowledgeRecord, AdvisoryServiceError> {
        let district = required("district", &submission.district)?.to_string();
        let crop = required("crop", &submission.crop)?.to_string();
        required("practice", &submission.practice.practice)?;
        required("benefit", &submission.practice.benefit)?;

        let record = KnowledgeRecord {
            id: PracticeId(Uuid::new_v4().to_string()),
            district,
            crop,
            practice: submission.practice,
            submitted_by: submission.submitted_by,
            verified: false,
        };

        Ok(self.knowledge.submit_practice(record)?)
    }

    pub fn verified_practices(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, AdvisoryServiceError> {
        let district = required("district", district)?;
        let crop = required("crop", crop)?;
        Ok(self.knowledge.verified_practices(district, crop)?)
    }

    pub fn record_feedback(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackRecord, AdvisoryServiceError> {
        let advisory_id = required("advisory_id", &submission.advisory_id)?.to_string();
        let notes = submission
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        let record = FeedbackRecord {
            id: Uuid::new_v4(),
            advisory_id,
            helpful: submission.helpful,
            notes,
            timestamp: Utc::now(),
        };

        Ok(self.feedback.record(record)?)
    }

    pub fn feedback_summary(
        &self,
        advisory_id: &str,
    ) -> Result<FeedbackSummary, AdvisoryServiceError> {
        let advisory_id = required("advisory_id", advisory_id)?;
        let records = self.feedback.for_advisory(advisory_id)?;
        Ok(FeedbackSummary::from_records(&records))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AdvisoryServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AdvisoryServiceError::InvalidRequest(format!(
            "{field} is required"
        )))
    } else {
        Ok(trimmed)
    }
}

/// Error raised by the advisory service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryServiceError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("No traditional knowledge found for {crop} in {district}. This area is not yet covered.")]
    NotCovered { district: String, crop: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
