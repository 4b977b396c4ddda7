use serde::{Deserialize, Serialize};

use super::treatments::{
    disease_treatment, pest_treatment, Treatment, HEALTHY_RECOMMENDATIONS, ISSUE_RECOMMENDATIONS,
    PREVENTIVE_MEASURES, TRADITIONAL_REMEDIES,
};

const LABEL_SEPARATOR: &str = "___";
const UNKNOWN: &str = "Unknown";
const HEALTHY_SCORE: f64 = 90.0;
const MIN_ISSUE_SCORE: f64 = 20.0;
const HIGH_CONFIDENCE_ABOVE: f64 = 80.0;
const MEDIUM_CONFIDENCE_ABOVE: f64 = 50.0;

const DISEASE_MARKERS: [&str; 5] = ["blight", "rust", "mold", "spot", "rot"];
const PEST_MARKERS: [&str; 2] = ["curl", "miner"];

/// Top prediction returned by the vision model. `confidence` is a 0..1 probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    score: Option<f64>,
}

impl From<RawPrediction> for Prediction {
    fn from(raw: RawPrediction) -> Self {
        let label = raw
            .label
            .or(raw.class_name)
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let confidence = raw
            .confidence
            .filter(|c| *c != 0.0)
            .or(raw.score)
            .unwrap_or(0.0);
        Self { label, confidence }
    }
}

#[derive(Debug, Deserialize)]
struct LabelledPrediction {
    label: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    score: Option<f64>,
}

/// Response shapes seen from hosted inference spaces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpaceResponse {
    Wrapped { data: Vec<RawPrediction> },
    List(Vec<RawPrediction>),
    Single(LabelledPrediction),
}

/// Extract the top prediction from a classifier payload. `None` for unrecognized shapes.
pub fn parse_prediction(payload: serde_json::Value) -> Option<Prediction> {
    match serde_json::from_value::<SpaceResponse>(payload).ok()? {
        SpaceResponse::Wrapped { data } | SpaceResponse::List(data) => {
            data.into_iter().next().map(Prediction::from)
        }
        SpaceResponse::Single(single) => Some(Prediction::from(RawPrediction {
            label: Some(single.label),
            class_name: None,
            confidence: single.confidence,
            score: single.score,
        })),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    fn from_confidence(percent: f64) -> Self {
        if percent > HIGH_CONFIDENCE_ABOVE {
            Severity::High
        } else if percent > MEDIUM_CONFIDENCE_ABOVE {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Routine,
    Soon,
    Immediate,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Routine => "routine",
            Urgency::Soon => "soon",
            Urgency::Immediate => "immediate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    #[serde(rename = "Issues Detected")]
    IssuesDetected,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::IssuesDetected => "Issues Detected",
        }
    }
}

/// A disease or pest detected on the plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub treatment: String,
    pub treatment_hindi: String,
}

impl Finding {
    fn new(name: &str, percent: f64, treatment: Treatment) -> Self {
        Self {
            name: name.to_string(),
            severity: Severity::from_confidence(percent),
            description: format!("Detected {name} with {percent:.1}% confidence"),
            treatment: treatment.english,
            treatment_hindi: treatment.hindi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub health_status: HealthStatus,
    pub health_score: u8,
    pub detected_crop: String,
    pub detected_condition: String,
    /// Percent, rounded.
    pub confidence: u8,
    pub diseases: Vec<Finding>,
    pub pests: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub traditional_remedies: Vec<String>,
    pub preventive_measures: Vec<String>,
    pub urgency: Urgency,
    pub summary: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn percent_to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Turn a raw prediction into farmer-facing advice.
///
/// Labels follow `Crop___Condition`. A label without the separator is treated as the condition
/// alone and the crop comes from `crop_name`, falling back to "Unknown".
pub fn diagnose(prediction: &Prediction, crop_name: Option<&str>) -> Diagnosis {
    let label = prediction.label.trim();
    let percent = prediction.confidence * 100.0;
    let healthy = label.to_lowercase().contains("healthy");

    let (detected_crop, condition) = match label.split_once(LABEL_SEPARATOR) {
        Some((crop, condition)) if !crop.is_empty() => (crop.to_string(), condition),
        _ => (
            crop_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string(),
            label,
        ),
    };
    let condition_name = condition.replace('_', " ");

    let mut diseases = Vec::new();
    let mut pests = Vec::new();
    if !healthy {
        let lower = condition.to_lowercase();
        if DISEASE_MARKERS.iter().any(|marker| lower.contains(marker)) {
            diseases.push(Finding::new(
                &condition_name,
                percent,
                disease_treatment(label, condition),
            ));
        } else if PEST_MARKERS.iter().any(|marker| lower.contains(marker)) {
            pests.push(Finding::new(&condition_name, percent, pest_treatment()));
        }
    }

    let health_score = if healthy {
        HEALTHY_SCORE
    } else {
        (100.0 - percent).max(MIN_ISSUE_SCORE)
    };

    let urgency = if healthy {
        Urgency::Routine
    } else {
        match Severity::from_confidence(percent) {
            Severity::High => Urgency::Immediate,
            Severity::Medium => Urgency::Soon,
            Severity::Low => Urgency::Routine,
        }
    };

    let summary = if healthy {
        format!("Your {detected_crop} appears healthy! Continue with regular care and monitoring.")
    } else {
        let follow_up = if percent > HIGH_CONFIDENCE_ABOVE {
            "Immediate action recommended."
        } else {
            "Monitor and treat as suggested."
        };
        format!("Detected {condition_name} with {percent:.0}% confidence. {follow_up}")
    };

    Diagnosis {
        health_status: if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::IssuesDetected
        },
        health_score: percent_to_u8(health_score),
        detected_crop,
        detected_condition: condition_name,
        confidence: percent_to_u8(percent),
        diseases,
        pests,
        recommendations: if healthy {
            owned(&HEALTHY_RECOMMENDATIONS)
        } else {
            owned(&ISSUE_RECOMMENDATIONS)
        },
        traditional_remedies: owned(&TRADITIONAL_REMEDIES),
        preventive_measures: owned(&PREVENTIVE_MEASURES),
        urgency,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prediction(label: &str, confidence: f64) -> Prediction {
        Prediction {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn parses_wrapped_list_and_single_shapes() {
        let wrapped = parse_prediction(json!({ "data": [{ "label": "Tomato___Late_blight", "confidence": 0.92 }] }))
            .expect("wrapped");
        assert_eq!(wrapped, prediction("Tomato___Late_blight", 0.92));

        let list = parse_prediction(json!([{ "class_name": "Potato___healthy", "score": 0.97 }]))
            .expect("list");
        assert_eq!(list, prediction("Potato___healthy", 0.97));

        let single = parse_prediction(json!({ "label": "Corn___Common_rust", "score": 0.6 }))
            .expect("single");
        assert_eq!(single, prediction("Corn___Common_rust", 0.6));
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(parse_prediction(json!({ "result": "blight" })).is_none());
        assert!(parse_prediction(json!({ "data": [] })).is_none());
        assert!(parse_prediction(json!("Tomato___Late_blight")).is_none());
    }

    #[test]
    fn confident_blight_is_high_severity_disease() {
        let diagnosis = diagnose(&prediction("Tomato___Late_blight", 0.92), None);

        assert_eq!(diagnosis.health_status, HealthStatus::IssuesDetected);
        assert_eq!(diagnosis.detected_crop, "Tomato");
        assert_eq!(diagnosis.detected_condition, "Late blight");
        assert_eq!(diagnosis.confidence, 92);
        assert_eq!(diagnosis.health_score, 20);
        assert_eq!(diagnosis.urgency, Urgency::Immediate);
        assert_eq!(diagnosis.diseases.len(), 1);
        assert!(diagnosis.pests.is_empty());

        let disease = &diagnosis.diseases[0];
        assert_eq!(disease.severity, Severity::High);
        assert_eq!(disease.description, "Detected Late blight with 92.0% confidence");
        assert_eq!(
            disease.treatment,
            "Spray copper-based fungicide, avoid overhead irrigation."
        );
        assert_eq!(
            diagnosis.summary,
            "Detected Late blight with 92% confidence. Immediate action recommended."
        );
        assert_eq!(diagnosis.recommendations.len(), ISSUE_RECOMMENDATIONS.len());
    }

    #[test]
    fn leaf_curl_is_a_pest_with_neem_treatment() {
        let diagnosis = diagnose(&prediction("Tomato___Yellow_Leaf_Curl_Virus", 0.65), None);

        assert!(diagnosis.diseases.is_empty());
        assert_eq!(diagnosis.pests.len(), 1);
        assert_eq!(diagnosis.pests[0].severity, Severity::Medium);
        assert!(diagnosis.pests[0].treatment.starts_with("Apply neem-based organic pesticide"));
        assert_eq!(diagnosis.urgency, Urgency::Soon);
        assert_eq!(diagnosis.health_score, 35);
        assert!(diagnosis.summary.ends_with("Monitor and treat as suggested."));
    }

    #[test]
    fn healthy_label_scores_ninety_with_routine_care() {
        let diagnosis = diagnose(&prediction("Potato___healthy", 0.97), Some("Aloo"));

        assert_eq!(diagnosis.health_status, HealthStatus::Healthy);
        assert_eq!(diagnosis.health_score, 90);
        assert_eq!(diagnosis.detected_crop, "Potato");
        assert_eq!(diagnosis.urgency, Urgency::Routine);
        assert!(diagnosis.diseases.is_empty() && diagnosis.pests.is_empty());
        assert_eq!(
            diagnosis.summary,
            "Your Potato appears healthy! Continue with regular care and monitoring."
        );
        assert_eq!(diagnosis.recommendations.len(), HEALTHY_RECOMMENDATIONS.len());
    }

    #[test]
    fn bare_label_falls_back_to_supplied_crop_name() {
        let diagnosis = diagnose(&prediction("Powdery_mildew", 0.3), Some("Pea"));

        assert_eq!(diagnosis.detected_crop, "Pea");
        assert_eq!(diagnosis.detected_condition, "Powdery mildew");
        assert!(diagnosis.diseases.is_empty());
        assert!(diagnosis.pests.is_empty());
        assert_eq!(diagnosis.health_score, 70);
        assert_eq!(diagnosis.urgency, Urgency::Routine);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let diagnosis = diagnose(&prediction("Apple___Scab", 0.55), None);
        let value = serde_json::to_value(&diagnosis).expect("serialize");

        assert_eq!(value["healthStatus"], "Issues Detected");
        assert_eq!(value["urgency"], "soon");
        assert_eq!(value["pests"], json!([]));
        assert!(value["traditionalRemedies"].as_array().is_some());
    }
}
