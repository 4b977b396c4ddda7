use std::sync::Arc;

use super::common::*;
use crate::workflows::advisory::ai::AiServiceError;
use crate::workflows::advisory::domain::{AdvisoryRequest, PracticeSubmission};
use crate::workflows::advisory::engine::AdvisoryRuleEngine;
use crate::workflows::advisory::repository::{
    FeedbackSubmission, FeedbackSummary, RepositoryError,
};
use crate::workflows::advisory::service::{AdvisoryService, AdvisoryServiceError};

fn request(district: &str, crop: &str, use_ai: bool) -> AdvisoryRequest {
    AdvisoryRequest {
        district: district.to_string(),
        crop: crop.to_string(),
        use_ai,
        user_query: None,
    }
}

#[tokio::test]
async fn advise_blends_verified_practices_with_latest_sample() {
    let (service, _, _) = build_service();

    let envelope = service
        .advise(request("  barabanki ", "WHEAT", true))
        .await
        .expect("covered area");

    assert_eq!(envelope.district, "barabanki");
    assert_eq!(envelope.crop, "WHEAT");
    let soil = envelope.soil_data.as_ref().expect("sample attached");
    assert_eq!(soil.sample, depleted_soil());

    let verified = practices(&[
        "Apply cow manure before sowing",
        "Spray neem leaf extract against aphids",
    ]);
    let expected = AdvisoryRuleEngine::default().generate_advisory(&verified, Some(&depleted_soil()));
    assert_eq!(envelope.advisory, expected);
    assert!(!envelope.advisory.is_ai_powered);
    assert_eq!(envelope.advisory.sustainability_score, 81);
    assert_eq!(envelope.advisory.cost_score, 65);
}

#[tokio::test]
async fn each_advisory_gets_a_fresh_id() {
    let (service, _, _) = build_service();

    let first = service.advise(request(DISTRICT, CROP, false)).await.unwrap();
    let second = service.advise(request(DISTRICT, CROP, false)).await.unwrap();

    assert_ne!(first.advisory_id, second.advisory_id);
}

#[tokio::test]
async fn uncovered_area_is_reported_not_guessed() {
    let (service, _, _) = build_service();

    let err = service
        .advise(request("Sitapur", "Mustard", true))
        .await
        .unwrap_err();

    assert!(matches!(err, AdvisoryServiceError::NotCovered { .. }));
    assert_eq!(
        err.to_string(),
        "No traditional knowledge found for Mustard in Sitapur. This area is not yet covered."
    );
}

#[tokio::test]
async fn only_unverified_practices_means_not_covered() {
    let knowledge = Arc::new(MemoryKnowledge::seeded(
        vec![knowledge_record("Hardoi", "Paddy", "Transplant in lines", false)],
        Vec::new(),
    ));
    let service = AdvisoryService::new(knowledge, Arc::new(MemoryFeedback::default()), engine());

    let err = service.advise(request("Hardoi", "Paddy", true)).await.unwrap_err();

    assert!(matches!(err, AdvisoryServiceError::NotCovered { .. }));
}

#[tokio::test]
async fn blank_keys_are_rejected() {
    let (service, _, _) = build_service();

    let err = service.advise(request(DISTRICT, "   ", true)).await.unwrap_err();

    match err {
        AdvisoryServiceError::InvalidRequest(message) => assert_eq!(message, "crop is required"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn soil_lookup_failure_degrades_to_practice_only_advice() {
    let service = AdvisoryService::new(
        Arc::new(SoilOutageKnowledge(seeded_knowledge())),
        Arc::new(MemoryFeedback::default()),
        engine(),
    );

    let envelope = service
        .advise(request(DISTRICT, CROP, true))
        .await
        .expect("practices still served");

    assert!(envelope.soil_data.is_none());
    assert!(envelope.advisory.scientific.is_empty());
    assert_eq!(envelope.advisory.traditional.len(), 2);
}

#[tokio::test]
async fn knowledge_outage_surfaces_repository_error() {
    let service = AdvisoryService::new(
        Arc::new(UnavailableKnowledge),
        Arc::new(MemoryFeedback::default()),
        engine(),
    );

    let err = service.advise(request(DISTRICT, CROP, true)).await.unwrap_err();

    assert!(matches!(
        err,
        AdvisoryServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[tokio::test]
async fn ai_path_runs_only_when_requested() {
    let model = Arc::new(StaticModel::new(model_response(&[
        "Apply farmyard manure 2 weeks before sowing",
    ])));
    let (plain, _, _) = build_service();
    assert!(!plain.ai_enabled());

    let service = AdvisoryService::new(
        Arc::new(seeded_knowledge()),
        Arc::new(MemoryFeedback::default()),
        engine(),
    )
    .with_ai(adapter_with(model.clone()));
    assert!(service.ai_enabled());

    let opted_out = service.advise(request(DISTRICT, CROP, false)).await.unwrap();
    assert!(!opted_out.advisory.is_ai_powered);
    assert!(model.last_request().is_none());

    let mut with_question = request(DISTRICT, CROP, true);
    with_question.user_query = Some("Is lime needed?".to_string());
    let opted_in = service.advise(with_question).await.unwrap();
    assert!(opted_in.advisory.is_ai_powered);

    let forwarded = model.last_request().expect("model called");
    assert_eq!(forwarded.soil_data, Some(depleted_soil()));
    assert_eq!(forwarded.user_query.as_deref(), Some("Is lime needed?"));
    assert_eq!(forwarded.traditional_practices.len(), 2);
}

#[tokio::test]
async fn ai_failure_still_returns_an_advisory() {
    let model = Arc::new(FailingModel::new(AiServiceError::Timeout));
    let service = AdvisoryService::new(
        Arc::new(seeded_knowledge()),
        Arc::new(MemoryFeedback::default()),
        engine(),
    )
    .with_ai(adapter_with(model.clone()));

    let envelope = service.advise(request(DISTRICT, CROP, true)).await.unwrap();

    assert_eq!(model.calls(), 1);
    assert!(!envelope.advisory.is_ai_powered);
    assert_eq!(
        envelope.advisory.ai_error.as_deref(),
        Some("AI service temporarily unavailable")
    );
    assert!(!envelope.advisory.blended_plan.is_empty());
}

#[test]
fn submitted_practices_wait_for_verification() {
    let (service, knowledge, _) = build_service();

    let record = service
        .submit_practice(PracticeSubmission {
            district: " Barabanki ".to_string(),
            crop: "Wheat".to_string(),
            practice: practice("Sprinkle wood ash on seedlings"),
            submitted_by: Some("Sunita Devi".to_string()),
        })
        .expect("stored");

    assert!(!record.verified);
    assert_eq!(record.district, "Barabanki");
    assert_eq!(knowledge.all_records().len(), 4);

    let verified = service.verified_practices(DISTRICT, CROP).unwrap();
    assert_eq!(verified.len(), 2);
    assert!(verified.iter().all(|r| r.verified));
}

#[test]
fn submission_without_benefit_is_rejected() {
    let (service, knowledge, _) = build_service();
    let mut entry = practice("Mulch with paddy straw");
    entry.benefit = "  ".to_string();

    let err = service
        .submit_practice(PracticeSubmission {
            district: DISTRICT.to_string(),
            crop: CROP.to_string(),
            practice: entry,
            submitted_by: None,
        })
        .unwrap_err();

    assert!(matches!(err, AdvisoryServiceError::InvalidRequest(_)));
    assert_eq!(knowledge.all_records().len(), 3);
}

#[test]
fn feedback_is_recorded_and_summarized() {
    let (service, _, feedback) = build_service();

    for (helpful, notes) in [
        (true, Some("  Manure timing worked well ")),
        (true, None),
        (false, Some("   ")),
    ] {
        service
            .record_feedback(FeedbackSubmission {
                advisory_id: "adv-1".to_string(),
                helpful,
                notes: notes.map(str::to_string),
            })
            .expect("recorded");
    }
    service
        .record_feedback(FeedbackSubmission {
            advisory_id: "adv-2".to_string(),
            helpful: false,
            notes: None,
        })
        .expect("recorded");

    let stored = feedback.all();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].notes.as_deref(), Some("Manure timing worked well"));
    assert!(stored[2].notes.is_none());

    assert_eq!(
        service.feedback_summary("adv-1").unwrap(),
        FeedbackSummary {
            total: 3,
            helpful: 2,
            not_helpful: 1,
        }
    );
    assert_eq!(
        service.feedback_summary("unknown").unwrap(),
        FeedbackSummary::default()
    );
}

#[test]
fn feedback_requires_an_advisory_id() {
    let (service, _, feedback) = build_service();

    let err = service
        .record_feedback(FeedbackSubmission {
            advisory_id: " ".to_string(),
            helpful: true,
            notes: None,
        })
        .unwrap_err();

    assert!(matches!(err, AdvisoryServiceError::InvalidRequest(_)));
    assert!(feedback.all().is_empty());
}
