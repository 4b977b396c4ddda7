use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for crowdsourced practice records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PracticeId(pub String);

/// One piece of verified farming wisdom as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraditionalPractice {
    pub practice: String,
    pub benefit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Stored practice keyed by district and crop, including its verification state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub id: PracticeId,
    pub district: String,
    pub crop: String,
    #[serde(flatten)]
    pub practice: TraditionalPractice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    pub verified: bool,
}

/// Farmer or extension-worker submission awaiting verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSubmission {
    pub district: String,
    pub crop: String,
    #[serde(flatten)]
    pub practice: TraditionalPractice,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

/// Lab measurement as reported; every field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    /// kg/ha
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen: Option<f64>,
    /// kg/ha
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<f64>,
    /// kg/ha
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    /// Percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_carbon: Option<f64>,
}

/// Soil values after default substitution, ready for threshold checks.
///
/// Absent macronutrients and organic carbon read as `0.0`; an absent pH reads as neutral `7.0`.
/// A reported pH of `0.0` is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilReadings {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub organic_carbon: f64,
}

impl SoilReadings {
    pub const NEUTRAL_PH: f64 = 7.0;
}

impl From<&SoilSample> for SoilReadings {
    fn from(sample: &SoilSample) -> Self {
        Self {
            nitrogen: sample.nitrogen.unwrap_or(0.0),
            phosphorus: sample.phosphorus.unwrap_or(0.0),
            potassium: sample.potassium.unwrap_or(0.0),
            ph: sample.ph.unwrap_or(Self::NEUTRAL_PH),
            organic_carbon: sample.organic_carbon.unwrap_or(0.0),
        }
    }
}

/// Most recent sample stored for a district and crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSampleRecord {
    pub district: String,
    pub crop: String,
    #[serde(flatten)]
    pub sample: SoilSample,
    pub sampled_at: NaiveDate,
}

/// Soil factor a scientific recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "Nitrogen (N)")]
    Nitrogen,
    #[serde(rename = "Phosphorus (P)")]
    Phosphorus,
    #[serde(rename = "Potassium (K)")]
    Potassium,
    #[serde(rename = "Soil pH")]
    SoilPh,
    #[serde(rename = "Organic Carbon")]
    OrganicCarbon,
}

impl Nutrient {
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen (N)",
            Nutrient::Phosphorus => "Phosphorus (P)",
            Nutrient::Potassium => "Potassium (K)",
            Nutrient::SoilPh => "Soil pH",
            Nutrient::OrganicCarbon => "Organic Carbon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScientificRecommendation {
    pub nutrient: Nutrient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_level: Option<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default)]
    pub ai_generated: bool,
}

/// Which tradition a plan step draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMethod {
    Traditional,
    Scientific,
    Hybrid,
}

impl PlanMethod {
    /// Traditional and hybrid steps count as low-input for scoring.
    pub fn is_low_input(&self) -> bool {
        matches!(self, PlanMethod::Traditional | PlanMethod::Hybrid)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanMethod::Traditional => "traditional",
            PlanMethod::Scientific => "scientific",
            PlanMethod::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendedStep {
    /// 1-based, contiguous.
    pub step: u32,
    pub action: String,
    pub method: PlanMethod,
    pub timing: String,
    pub benefit: String,
}

/// Extra material only present when the advisory came from the AI path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_rationale: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_recommendation: Option<String>,
    /// Score the model reported about itself; kept for audit only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_sustainability_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_cost_score: Option<u8>,
}

/// Complete, renderable advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub traditional: Vec<TraditionalPractice>,
    pub scientific: Vec<ScientificRecommendation>,
    pub blended_plan: Vec<BlendedStep>,
    pub sustainability_score: u8,
    pub cost_score: u8,
    pub explanation: String,
    #[serde(rename = "isAIPowered")]
    pub is_ai_powered: bool,
    #[serde(rename = "aiError", default, skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<AiInsights>,
}

/// Inbound advisory request for a district and crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    pub district: String,
    pub crop: String,
    #[serde(default = "default_use_ai", alias = "useAI")]
    pub use_ai: bool,
    #[serde(default, alias = "userQuery")]
    pub user_query: Option<String>,
}

fn default_use_ai() -> bool {
    true
}

/// Advisory plus the context it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryEnvelope {
    pub advisory_id: Uuid,
    pub district: String,
    pub crop: String,
    #[serde(flatten)]
    pub advisory: AdvisoryResult,
    pub soil_data: Option<SoilSampleRecord>,
}
