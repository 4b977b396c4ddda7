use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::advisory::ai::{
    AdvisoryModel, AiAdvisoryRequest, AiAdvisoryResponse, AiFallbackAdapter, AiServiceError,
};
use crate::workflows::advisory::domain::{
    KnowledgeRecord, PracticeId, SoilSample, SoilSampleRecord, TraditionalPractice,
};
use crate::workflows::advisory::engine::AdvisoryRuleEngine;
use crate::workflows::advisory::repository::{
    FeedbackRecord, FeedbackRepository, KnowledgeRepository, RepositoryError,
};
use crate::workflows::advisory::service::AdvisoryService;
use crate::workflows::knowledge::normalize_key;

pub(super) const DISTRICT: &str = "Barabanki";
pub(super) const CROP: &str = "Wheat";

pub(super) fn practice(text: &str) -> TraditionalPractice {
    TraditionalPractice {
        practice: text.to_string(),
        benefit: "Handed down by village elders".to_string(),
        season: Some("Rabi".to_string()),
        source: None,
    }
}

pub(super) fn practices(texts: &[&str]) -> Vec<TraditionalPractice> {
    texts.iter().map(|text| practice(text)).collect()
}

pub(super) fn manure_practice() -> TraditionalPractice {
    practice("Apply cow manure before sowing")
}

/// Deficient on every count and acidic.
pub(super) fn depleted_soil() -> SoilSample {
    SoilSample {
        nitrogen: Some(20.0),
        phosphorus: Some(10.0),
        potassium: Some(100.0),
        ph: Some(5.5),
        organic_carbon: Some(0.3),
    }
}

/// Every reading inside its adequate band.
pub(super) fn healthy_soil() -> SoilSample {
    SoilSample {
        nitrogen: Some(45.0),
        phosphorus: Some(25.0),
        potassium: Some(210.0),
        ph: Some(7.0),
        organic_carbon: Some(0.6),
    }
}

pub(super) fn knowledge_record(district: &str, crop: &str, text: &str, verified: bool) -> KnowledgeRecord {
    KnowledgeRecord {
        id: PracticeId(format!("{}-{}-{}", district, crop, text.len())),
        district: district.to_string(),
        crop: crop.to_string(),
        practice: practice(text),
        submitted_by: Some("Ram Kishore".to_string()),
        verified,
    }
}

pub(super) fn soil_record(sample: SoilSample, sampled_at: NaiveDate) -> SoilSampleRecord {
    SoilSampleRecord {
        district: DISTRICT.to_string(),
        crop: CROP.to_string(),
        sample,
        sampled_at,
    }
}

#[derive(Default)]
pub(super) struct MemoryKnowledge {
    records: Mutex<Vec<KnowledgeRecord>>,
    samples: Mutex<Vec<SoilSampleRecord>>,
}

impl MemoryKnowledge {
    pub(super) fn seeded(records: Vec<KnowledgeRecord>, samples: Vec<SoilSampleRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            samples: Mutex::new(samples),
        }
    }

    pub(super) fn all_records(&self) -> Vec<KnowledgeRecord> {
        self.records.lock().unwrap().clone()
    }
}

fn same_key(left: &str, right: &str) -> bool {
    normalize_key(left) == normalize_key(right)
}

impl KnowledgeRepository for MemoryKnowledge {
    fn verified_practices(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.verified && same_key(&r.district, district) && same_key(&r.crop, crop))
            .cloned()
            .collect())
    }

    fn latest_soil_sample(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Option<SoilSampleRecord>, RepositoryError> {
        Ok(self
            .samples
            .lock()
            .unwrap()
            .iter()
            .filter(|s| same_key(&s.district, district) && same_key(&s.crop, crop))
            .max_by_key(|s| s.sampled_at)
            .cloned())
    }

    fn submit_practice(&self, record: KnowledgeRecord) -> Result<KnowledgeRecord, RepositoryError> {
        let mut guard = self.records.lock().unwrap();
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }
}

/// Knowledge store whose practices work but whose soil table is down.
pub(super) struct SoilOutageKnowledge(pub(super) MemoryKnowledge);

impl KnowledgeRepository for SoilOutageKnowledge {
    fn verified_practices(
        &self,
        district: &str,
        crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, RepositoryError> {
        self.0.verified_practices(district, crop)
    }

    fn latest_soil_sample(
        &self,
        _district: &str,
        _crop: &str,
    ) -> Result<Option<SoilSampleRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("soil table offline".to_string()))
    }

    fn submit_practice(&self, record: KnowledgeRecord) -> Result<KnowledgeRecord, RepositoryError> {
        self.0.submit_practice(record)
    }
}

pub(super) struct UnavailableKnowledge;

impl KnowledgeRepository for UnavailableKnowledge {
    fn verified_practices(
        &self,
        _district: &str,
        _crop: &str,
    ) -> Result<Vec<KnowledgeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("knowledge store offline".to_string()))
    }

    fn latest_soil_sample(
        &self,
        _district: &str,
        _crop: &str,
    ) -> Result<Option<SoilSampleRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("knowledge store offline".to_string()))
    }

    fn submit_practice(&self, _record: KnowledgeRecord) -> Result<KnowledgeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("knowledge store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryFeedback {
    records: Mutex<Vec<FeedbackRecord>>,
}

impl MemoryFeedback {
    pub(super) fn all(&self) -> Vec<FeedbackRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl FeedbackRepository for MemoryFeedback {
    fn record(&self, feedback: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError> {
        self.records.lock().unwrap().push(feedback.clone());
        Ok(feedback)
    }

    fn for_advisory(&self, advisory_id: &str) -> Result<Vec<FeedbackRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.advisory_id == advisory_id)
            .cloned()
            .collect())
    }
}

/// Model that always fails with the given error and counts its calls.
pub(super) struct FailingModel {
    pub(super) error: AiServiceError,
    pub(super) calls: AtomicUsize,
}

impl FailingModel {
    pub(super) fn new(error: AiServiceError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryModel for FailingModel {
    async fn generate(
        &self,
        _request: &AiAdvisoryRequest,
    ) -> Result<AiAdvisoryResponse, AiServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Model returning a canned response and remembering the last request it saw.
pub(super) struct StaticModel {
    response: AiAdvisoryResponse,
    last_request: Mutex<Option<AiAdvisoryRequest>>,
}

impl StaticModel {
    pub(super) fn new(response: AiAdvisoryResponse) -> Self {
        Self {
            response,
            last_request: Mutex::new(None),
        }
    }

    pub(super) fn last_request(&self) -> Option<AiAdvisoryRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvisoryModel for StaticModel {
    async fn generate(
        &self,
        request: &AiAdvisoryRequest,
    ) -> Result<AiAdvisoryResponse, AiServiceError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(self.response.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub(super) fn model_response(action_plan: &[&str]) -> AiAdvisoryResponse {
    AiAdvisoryResponse {
        recommendations: "Blend farmyard manure with a measured urea top dressing.".to_string(),
        traditional_integration: "Your manure practice stays at the heart of this plan."
            .to_string(),
        scientific_rationale: "• Nitrogen is low at 20 kg/ha.\n• Soil pH of 5.5 calls for lime."
            .to_string(),
        action_plan: action_plan.iter().map(|step| step.to_string()).collect(),
        warnings: vec!["Avoid urea before heavy rain".to_string()],
        sustainability_score: 91.4,
        cost_score: 12.0,
    }
}

pub(super) fn engine() -> Arc<AdvisoryRuleEngine> {
    Arc::new(AdvisoryRuleEngine::default())
}

pub(super) fn adapter_with(model: Arc<dyn AdvisoryModel>) -> AiFallbackAdapter {
    AiFallbackAdapter::new(model, engine())
}

/// Knowledge store with two verified practices, one pending submission, and two soil tests.
pub(super) fn seeded_knowledge() -> MemoryKnowledge {
    MemoryKnowledge::seeded(
        vec![
            knowledge_record(DISTRICT, CROP, "Apply cow manure before sowing", true),
            knowledge_record(DISTRICT, CROP, "Spray neem leaf extract against aphids", true),
            knowledge_record(DISTRICT, CROP, "Burn stubble after harvest", false),
        ],
        vec![
            soil_record(
                healthy_soil(),
                NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            ),
            soil_record(
                depleted_soil(),
                NaiveDate::from_ymd_opt(2025, 10, 12).expect("valid date"),
            ),
        ],
    )
}

pub(super) fn build_service() -> (
    Arc<AdvisoryService<MemoryKnowledge, MemoryFeedback>>,
    Arc<MemoryKnowledge>,
    Arc<MemoryFeedback>,
) {
    let knowledge = Arc::new(seeded_knowledge());
    let feedback = Arc::new(MemoryFeedback::default());
    let service = Arc::new(AdvisoryService::new(
        knowledge.clone(),
        feedback.clone(),
        engine(),
    ));
    (service, knowledge, feedback)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
