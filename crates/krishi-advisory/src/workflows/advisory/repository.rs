use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{KnowledgeRecord, SoilSampleRecord};

/// Storage abstraction for crowdsourced practices and soil tests.
///
/// District and crop keys are matched after trimming and case folding.
pub trait KnowledgeRepository: Send + Sync {
    /// Verified practices only, in submission order.
    fn verified_practices(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, RepositoryError>;
    fn latest_soil_sample(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Option<SoilSampleRecord>, RepositoryError>;
    fn submit_practice(&self, record: KnowledgeRecord) -> Result<KnowledgeRecord, RepositoryError>;
}

/// Sink for farmer feedback on delivered advisories.
pub trait FeedbackRepository: Send + Sync {
    fn record(&self, feedback: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError>;
    fn for_advisory(&self, advisory_id: &str) -> Result<Vec<FeedbackRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub advisory_id: String,
    pub helpful: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub advisory_id: String,
    pub helpful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Helpful/not-helpful tally for one advisory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total: usize,
    pub helpful: usize,
    pub not_helpful: usize,
}

impl FeedbackSummary {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let helpful = records.iter().filter(|record| record.helpful).count();
        Self {
            total: records.len(),
            helpful,
            not_helpful: records.len() - helpful,
        }
    }
}
