use crate::infra::{InMemoryFeedbackStore, InMemoryKnowledgeStore};
use crate::server::remote_adapter;
use chrono::Local;
use clap::Args;
use krishi_advisory::config::AppConfig;
use krishi_advisory::error::AppError;
use krishi_advisory::workflows::advisory::{
    AdvisoryEnvelope, AdvisoryRequest, AdvisoryRuleEngine, AdvisoryService, AdvisoryServiceError,
    AiFallbackAdapter, FeedbackSubmission, NarrativeAdvisoryModel, PracticeSubmission,
    TraditionalPractice,
};
use krishi_advisory::workflows::crop_doctor::{
    CropDoctorError, CropDoctorService, Diagnosis, Finding, ImageUpload, SpaceClassifier,
};
use mime_guess::mime;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type SeededService = AdvisoryService<InMemoryKnowledgeStore, InMemoryFeedbackStore>;

#[derive(Args, Debug)]
pub(crate) struct AdviseArgs {
    /// District the advisory is for
    #[arg(long)]
    pub(crate) district: String,
    /// Crop the advisory is for
    #[arg(long)]
    pub(crate) crop: String,
    /// Practice CSV export (defaults to the bundled seed data)
    #[arg(long)]
    pub(crate) practices_csv: Option<PathBuf>,
    /// Soil test CSV export (defaults to the bundled seed data)
    #[arg(long)]
    pub(crate) soil_csv: Option<PathBuf>,
    /// Question forwarded to the AI path
    #[arg(long)]
    pub(crate) question: Option<String>,
    /// Use the offline narrative model instead of the configured remote service
    #[arg(long)]
    pub(crate) narrative: bool,
    /// Skip the AI path entirely
    #[arg(long)]
    pub(crate) rules_only: bool,
    /// Print the advisory payload as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Path to a crop photo (JPEG, PNG or WebP)
    #[arg(long)]
    pub(crate) image: PathBuf,
    /// Crop name used when the classifier label does not include one
    #[arg(long)]
    pub(crate) crop: Option<String>,
    /// Print the diagnosis payload as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Practice CSV export (defaults to the bundled seed data)
    #[arg(long)]
    pub(crate) practices_csv: Option<PathBuf>,
    /// Soil test CSV export (defaults to the bundled seed data)
    #[arg(long)]
    pub(crate) soil_csv: Option<PathBuf>,
    /// Skip the narrative AI portion of the demo
    #[arg(long)]
    pub(crate) skip_ai: bool,
}

pub(crate) async fn run_advise(args: AdviseArgs) -> Result<(), AppError> {
    let engine = Arc::new(AdvisoryRuleEngine::default());
    let adapter = if args.rules_only {
        None
    } else if args.narrative {
        Some(narrative_adapter(engine.clone()))
    } else {
        remote_adapter(&AppConfig::load()?.ai, engine.clone())
    };

    let service = seeded_service(
        args.practices_csv.as_deref(),
        args.soil_csv.as_deref(),
        engine,
        adapter,
    )?;

    let envelope = service
        .advise(AdvisoryRequest {
            district: args.district,
            crop: args.crop,
            use_ai: !args.rules_only,
            user_query: args.question,
        })
        .await?;

    if args.json {
        print_json(serde_json::to_value(&envelope))?;
    } else {
        render_advisory(&envelope);
    }
    Ok(())
}

pub(crate) async fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let classifier = SpaceClassifier::from_config(&config.crop_doctor)
        .map_err(CropDoctorError::from)?;
    let service = CropDoctorService::new(Arc::new(classifier));

    let image = read_image(&args.image)?;
    let diagnosis = service
        .examine_upload(&image, args.crop.as_deref(), None)
        .await?;

    if args.json {
        print_json(serde_json::to_value(&diagnosis))?;
    } else {
        render_diagnosis(&diagnosis);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        practices_csv,
        soil_csv,
        skip_ai,
    } = args;

    let engine = Arc::new(AdvisoryRuleEngine::default());
    let adapter = (!skip_ai).then(|| narrative_adapter(engine.clone()));
    let service = seeded_service(
        practices_csv.as_deref(),
        soil_csv.as_deref(),
        engine,
        adapter,
    )?;

    println!("Krishi advisory demo ({})", Local::now().date_naive());

    println!("\n1. Rule-engine advisory");
    let rules = service
        .advise(AdvisoryRequest {
            district: "Barabanki".to_string(),
            crop: "Wheat".to_string(),
            use_ai: false,
            user_query: None,
        })
        .await?;
    render_advisory(&rules);

    if !skip_ai {
        println!("\n2. Narrative AI advisory");
        match service
            .advise(AdvisoryRequest {
                district: "Varanasi".to_string(),
                crop: "Paddy".to_string(),
                use_ai: true,
                user_query: Some("How do I save on fertilizer this kharif?".to_string()),
            })
            .await
        {
            Ok(envelope) => render_advisory(&envelope),
            Err(err) => println!("  Advisory unavailable: {}", err),
        }
    }

    println!("\n3. Uncovered area");
    match service
        .advise(AdvisoryRequest {
            district: "Sitapur".to_string(),
            crop: "Mustard".to_string(),
            use_ai: false,
            user_query: None,
        })
        .await
    {
        Ok(envelope) => render_advisory(&envelope),
        Err(AdvisoryServiceError::NotCovered { .. }) => {
            println!("  Not covered yet. Farmers can submit practices for this area.")
        }
        Err(err) => return Err(err.into()),
    }

    println!("\n4. Practice submission");
    let submitted = service.submit_practice(PracticeSubmission {
        district: "Sitapur".to_string(),
        crop: "Mustard".to_string(),
        practice: TraditionalPractice {
            practice: "Intercrop mustard with chickpea".to_string(),
            benefit: "Reduces aphid pressure and fixes nitrogen".to_string(),
            season: Some("Rabi".to_string()),
            source: Some("Village elders".to_string()),
        },
        submitted_by: Some("demo-farmer".to_string()),
    })?;
    println!(
        "- Stored practice {} for {}/{} (verified: {})",
        submitted.id.0, submitted.district, submitted.crop, submitted.verified
    );

    println!("\n5. Farmer feedback");
    let advisory_id = rules.advisory_id.to_string();
    for (helpful, notes) in [
        (true, Some("Neem cake worked well")),
        (true, None),
        (false, Some("Could not source vermicompost")),
    ] {
        service.record_feedback(FeedbackSubmission {
            advisory_id: advisory_id.clone(),
            helpful,
            notes: notes.map(str::to_string),
        })?;
    }
    let summary = service.feedback_summary(&advisory_id)?;
    println!(
        "- Advisory {}: {} responses, {} helpful, {} not helpful",
        advisory_id, summary.total, summary.helpful, summary.not_helpful
    );

    Ok(())
}

fn narrative_adapter(engine: Arc<AdvisoryRuleEngine>) -> AiFallbackAdapter {
    let model = NarrativeAdvisoryModel::new(engine.as_ref().clone());
    AiFallbackAdapter::new(Arc::new(model), engine)
}

fn seeded_service(
    practices_csv: Option<&Path>,
    soil_csv: Option<&Path>,
    engine: Arc<AdvisoryRuleEngine>,
    adapter: Option<AiFallbackAdapter>,
) -> Result<SeededService, AppError> {
    let knowledge = Arc::new(InMemoryKnowledgeStore::load(practices_csv, soil_csv)?);
    let service = AdvisoryService::new(
        knowledge,
        Arc::new(InMemoryFeedbackStore::default()),
        engine,
    );
    Ok(match adapter {
        Some(adapter) => service.with_ai(adapter),
        None => service,
    })
}

pub(crate) fn read_image(path: &Path) -> Result<ImageUpload, AppError> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|guess| guess.type_() == mime::IMAGE)
        .unwrap_or(mime::IMAGE_JPEG);
    Ok(ImageUpload { bytes, mime })
}

fn print_json(payload: serde_json::Result<Value>) -> Result<(), AppError> {
    let value = payload.map_err(std::io::Error::from)?;
    let rendered = serde_json::to_string_pretty(&value).map_err(std::io::Error::from)?;
    println!("{}", rendered);
    Ok(())
}

pub(crate) fn render_advisory(envelope: &AdvisoryEnvelope) {
    let advisory = &envelope.advisory;
    println!(
        "Advisory {} for {} in {}",
        envelope.advisory_id, envelope.crop, envelope.district
    );
    println!(
        "Source: {}",
        if advisory.is_ai_powered {
            "AI model (scored by rule engine)"
        } else {
            "Rule engine"
        }
    );
    if let Some(error) = &advisory.ai_error {
        println!("AI note: {}", error);
    }

    match &envelope.soil_data {
        Some(record) => {
            let sample = &record.sample;
            println!(
                "Soil test {}: N {} | P {} | K {} | pH {} | OC {}",
                record.sampled_at,
                reading(sample.nitrogen),
                reading(sample.phosphorus),
                reading(sample.potassium),
                reading(sample.ph),
                reading(sample.organic_carbon)
            );
        }
        None => println!("Soil test: none on record"),
    }

    println!(
        "Sustainability {}/100 | Cost savings {}/100",
        advisory.sustainability_score, advisory.cost_score
    );

    println!("\nTraditional practices");
    for practice in &advisory.traditional {
        println!("- {}: {}", practice.practice, practice.benefit);
    }

    if advisory.scientific.is_empty() {
        println!("\nSoil corrections: none needed");
    } else {
        println!("\nSoil corrections");
        for rec in &advisory.scientific {
            let level = rec.current_level.as_deref().unwrap_or("n/a");
            match &rec.quantity {
                Some(quantity) => println!(
                    "- {} ({}): {} [{}]",
                    rec.nutrient.label(),
                    level,
                    rec.recommendation,
                    quantity
                ),
                None => println!(
                    "- {} ({}): {}",
                    rec.nutrient.label(),
                    level,
                    rec.recommendation
                ),
            }
        }
    }

    println!("\nBlended plan");
    for step in &advisory.blended_plan {
        println!(
            "{:>2}. [{}] {} ({}) -> {}",
            step.step,
            step.method.label(),
            step.action,
            step.timing,
            step.benefit
        );
    }

    if let Some(insights) = &advisory.ai_insights {
        if !insights.warnings.is_empty() {
            println!("\nWarnings");
            for warning in &insights.warnings {
                println!("- {}", warning);
            }
        }
    }

    println!("\n{}", advisory.explanation);
}

fn reading(value: Option<f64>) -> String {
    value
        .map(|value| format!("{:.1}", value))
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn render_diagnosis(diagnosis: &Diagnosis) {
    println!(
        "{} | {} ({}% confidence)",
        diagnosis.detected_crop, diagnosis.detected_condition, diagnosis.confidence
    );
    println!(
        "Health: {} ({}/100) | Urgency: {}",
        diagnosis.health_status.label(),
        diagnosis.health_score,
        diagnosis.urgency.label()
    );

    render_findings("Diseases", &diagnosis.diseases);
    render_findings("Pests", &diagnosis.pests);

    for (title, items) in [
        ("Recommendations", &diagnosis.recommendations),
        ("Traditional remedies", &diagnosis.traditional_remedies),
        ("Preventive measures", &diagnosis.preventive_measures),
    ] {
        println!("\n{}", title);
        for item in items {
            println!("- {}", item);
        }
    }

    println!("\n{}", diagnosis.summary);
}

fn render_findings(title: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    println!("\n{}", title);
    for finding in findings {
        println!(
            "- {} [{}]: {}",
            finding.name,
            finding.severity.label(),
            finding.treatment
        );
        println!("  {}", finding.treatment_hindi);
    }
}
