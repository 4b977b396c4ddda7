use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::{
    AdvisoryResult, AiInsights, BlendedStep, Nutrient, PlanMethod, ScientificRecommendation,
    TraditionalPractice,
};
use super::super::engine::{cost_score, sustainability_score};
use super::AiAdvisoryResponse;

const TRADITIONAL_TERMS: [&str; 6] = [
    "traditional",
    "organic",
    "compost",
    "manure",
    "neem",
    "green manure",
];
const SCIENTIFIC_TERMS: [&str; 6] = ["fertilizer", "chemical", "urea", "dap", "spray", "pesticide"];

const DEFAULT_TIMING: &str = "As recommended";
const DEFAULT_BENEFIT: &str = "Supports crop health and yield";
const MAX_PARSED_SCIENTIFIC: usize = 5;

/// Tag a free-text step. Steps mentioning both traditions, or neither, are hybrid.
pub fn classify_method(step: &str) -> PlanMethod {
    let lower = step.to_lowercase();
    let traditional = TRADITIONAL_TERMS.iter().any(|term| lower.contains(term));
    let scientific = SCIENTIFIC_TERMS.iter().any(|term| lower.contains(term));

    match (traditional, scientific) {
        (true, false) => PlanMethod::Traditional,
        (false, true) => PlanMethod::Scientific,
        _ => PlanMethod::Hybrid,
    }
}

fn timing_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)(\d+\s*weeks?\s*(?:before|after)\s*\w+)",
            r"(?i)(\d+\s*days?\s*(?:before|after)\s*\w+)",
            r"(?i)(at\s+\w+\s+stage)",
            r"(?i)(during\s+\w+)",
            r"(?i)(before\s+\w+)",
            r"(?i)(after\s+\w+)",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    })
}

/// First timing phrase found in the step, most specific pattern first.
pub fn extract_timing(step: &str) -> String {
    timing_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(step))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_TIMING.to_string())
}

fn benefit_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i)\b(?:to|for|ensures?|improves?|provides?|helps?)\s+(.+?)(?:\.|$)").ok()
        })
        .as_ref()
}

pub fn extract_benefit(step: &str) -> String {
    benefit_pattern()
        .and_then(|pattern| pattern.captures(step))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|benefit| !benefit.is_empty())
        .unwrap_or_else(|| DEFAULT_BENEFIT.to_string())
}

fn nutrient_patterns() -> &'static [(Nutrient, Regex)] {
    static PATTERNS: OnceLock<Vec<(Nutrient, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Nutrient::Nitrogen, r"(?i)\bnitrogen\b"),
            (Nutrient::Phosphorus, r"(?i)\bphosphorus\b"),
            (Nutrient::Potassium, r"(?i)\bpotassium\b"),
            (Nutrient::SoilPh, r"(?i)\bph\b"),
        ]
        .into_iter()
        .filter_map(|(nutrient, pattern)| Regex::new(pattern).ok().map(|re| (nutrient, re)))
        .collect()
    })
}

/// Pull nutrient lines out of a model's scientific rationale, at most five.
pub fn parse_scientific(rationale: &str) -> Vec<ScientificRecommendation> {
    rationale
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| {
            nutrient_patterns()
                .iter()
                .filter(move |(_, pattern)| pattern.is_match(line))
                .map(move |(nutrient, _)| ScientificRecommendation {
                    nutrient: *nutrient,
                    current_level: None,
                    recommendation: line.to_string(),
                    quantity: None,
                    ai_generated: true,
                })
        })
        .take(MAX_PARSED_SCIENTIFIC)
        .collect()
}

fn reported_score(value: f64) -> Option<u8> {
    value
        .is_finite()
        .then(|| value.round().clamp(0.0, 100.0) as u8)
}

/// Map a model response onto the advisory shape, scoring it with the rule-engine scorer.
pub(crate) fn into_advisory(
    practices: &[TraditionalPractice],
    response: AiAdvisoryResponse,
) -> AdvisoryResult {
    let scientific = parse_scientific(&response.scientific_rationale);
    let blended_plan: Vec<BlendedStep> = response
        .action_plan
        .iter()
        .map(|action| action.trim())
        .filter(|action| !action.is_empty())
        .zip(1u32..)
        .map(|(action, step)| BlendedStep {
            step,
            action: action.to_string(),
            method: classify_method(action),
            timing: extract_timing(action),
            benefit: extract_benefit(action),
        })
        .collect();

    let sustainability = sustainability_score(practices.len(), &blended_plan);
    let cost = cost_score(practices.len(), scientific.len(), &blended_plan);

    AdvisoryResult {
        traditional: practices.to_vec(),
        scientific,
        blended_plan,
        sustainability_score: sustainability,
        cost_score: cost,
        explanation: response.traditional_integration,
        is_ai_powered: true,
        ai_error: None,
        ai_insights: Some(AiInsights {
            scientific_rationale: Some(response.scientific_rationale),
            warnings: response.warnings,
            full_recommendation: Some(response.recommendations),
            reported_sustainability_score: reported_score(response.sustainability_score),
            reported_cost_score: reported_score(response.cost_score),
        }),
    }
}
