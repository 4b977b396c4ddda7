//! Farming advisories that blend verified traditional practices with soil-test science.
//!
//! The [`AdvisoryRuleEngine`] is the deterministic core: soil analysis, the ordered blended
//! plan, scoring and the narrative. Everything else here feeds it data or wraps it: the
//! optional AI path in [`ai`], the repository seams, the service facade and its router.

pub mod ai;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use ai::{
    AdvisoryModel, AiAdvisoryRequest, AiAdvisoryResponse, AiFallbackAdapter, AiServiceError,
    NarrativeAdvisoryModel, RemoteAdvisoryModel,
};
pub use domain::{
    AdvisoryEnvelope, AdvisoryRequest, AdvisoryResult, AiInsights, BlendedStep, KnowledgeRecord,
    Nutrient, PlanMethod, PracticeId, PracticeSubmission, ScientificRecommendation, SoilReadings,
    SoilSample, SoilSampleRecord, TraditionalPractice,
};
pub use engine::{AdvisoryRuleEngine, KeywordTable, PracticeSignal, SignalKeywords};
pub use repository::{
    FeedbackRecord, FeedbackRepository, FeedbackSubmission, FeedbackSummary, KnowledgeRepository,
    RepositoryError,
};
pub use router::advisory_router;
pub use service::{AdvisoryService, AdvisoryServiceError};
