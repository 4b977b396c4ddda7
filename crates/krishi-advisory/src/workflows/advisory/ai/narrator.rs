use async_trait::async_trait;

use super::super::domain::{SoilReadings, SoilSample, TraditionalPractice};
use super::super::engine::AdvisoryRuleEngine;
use super::{AdvisoryModel, AiAdvisoryRequest, AiAdvisoryResponse, AiServiceError};

/// Practices quoted verbatim in the action plan.
const QUOTED_PRACTICES: usize = 2;

/// Offline advisory writer producing the same response shape as a hosted model.
///
/// Soil findings come from the rule engine's analyzer so both paths agree on thresholds.
#[derive(Debug, Clone, Default)]
pub struct NarrativeAdvisoryModel {
    engine: AdvisoryRuleEngine,
}

impl NarrativeAdvisoryModel {
    pub fn new(engine: AdvisoryRuleEngine) -> Self {
        Self { engine }
    }

    pub fn compose(&self, request: &AiAdvisoryRequest) -> AiAdvisoryResponse {
        let AiAdvisoryRequest {
            district,
            crop,
            traditional_practices,
            soil_data,
            user_query,
        } = request;

        let traditional_integration = traditional_integration(traditional_practices, crop);
        let scientific_rationale = self.scientific_rationale(soil_data.as_ref(), crop, district);
        let action_plan = action_plan(traditional_practices, soil_data.as_ref());
        let warnings = warnings(soil_data.as_ref());

        let numbered: Vec<String> = action_plan
            .iter()
            .enumerate()
            .map(|(index, step)| format!("{}. {step}", index + 1))
            .collect();
        let mut recommendations = format!(
            "Advisory for {crop} in {district}\n\nTraditional Integration:\n{traditional_integration}\n\nScientific Analysis:\n{scientific_rationale}\n\nAction Plan:\n{}",
            numbered.join("\n")
        );

        if let Some(question) = user_query.as_deref().filter(|q| !q.trim().is_empty()) {
            let answer = answer_question(question, crop, district, soil_data.as_ref());
            recommendations = format!("Question: {question}\n\nAnswer: {answer}\n\n{recommendations}");
        }

        AiAdvisoryResponse {
            recommendations,
            traditional_integration,
            scientific_rationale,
            action_plan,
            warnings,
            sustainability_score: f64::from(narrative_sustainability(
                traditional_practices.len(),
                soil_data.as_ref(),
            )),
            cost_score: f64::from(narrative_cost(traditional_practices.len())),
        }
    }

    fn scientific_rationale(&self, soil: Option<&SoilSample>, crop: &str, district: &str) -> String {
        let mut text = format!("Scientific recommendations for {crop} in {district}:\n\n");

        let Some(sample) = soil else {
            text.push_str("No soil data available. Recommend getting soil tested for optimal results.\n");
            text.push_str(
                "Contact your local agricultural extension office for soil testing services.\n",
            );
            return text;
        };

        let findings = self.engine.analyze_soil(Some(sample));
        let lines: Vec<String> = if findings.is_empty() {
            vec![format!("• Soil nutrient levels and pH are adequate for {crop}.")]
        } else {
            findings
                .into_iter()
                .map(|finding| {
                    format!(
                        "• {} {}: {}. {}.",
                        finding.nutrient.label(),
                        finding.current_level.unwrap_or_default(),
                        finding.recommendation,
                        finding.quantity.unwrap_or_default(),
                    )
                })
                .collect()
        };
        text.push_str(&lines.join("\n"));
        text.push('\n');
        text
    }
}

#[async_trait]
impl AdvisoryModel for NarrativeAdvisoryModel {
    async fn generate(
        &self,
        request: &AiAdvisoryRequest,
    ) -> Result<AiAdvisoryResponse, AiServiceError> {
        Ok(self.compose(request))
    }

    fn name(&self) -> &'static str {
        "narrative"
    }
}

fn traditional_integration(practices: &[TraditionalPractice], crop: &str) -> String {
    if practices.is_empty() {
        return format!(
            "Traditional practices for {crop}:\n\nRecommend collecting knowledge from local farmers in your area to build a comprehensive traditional practice database."
        );
    }

    let mut text = String::from("Based on traditional knowledge:\n\n");
    for (index, practice) in practices.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}\n   Benefits: {}\n",
            index + 1,
            practice.practice,
            practice.benefit
        ));
        if let Some(season) = &practice.season {
            text.push_str(&format!("   Best time: {season}\n"));
        }
        text.push('\n');
    }
    text.trim().to_string()
}

fn action_plan(practices: &[TraditionalPractice], soil: Option<&SoilSample>) -> Vec<String> {
    let mut plan =
        vec!["Prepare field: Deep ploughing followed by 2-3 harrowing for good soil tilth".to_string()];

    plan.extend(
        practices
            .iter()
            .take(QUOTED_PRACTICES)
            .map(|practice| format!("Apply traditional practice: {}", practice.practice)),
    );

    if soil.map(|sample| SoilReadings::from(sample).nitrogen < 40.0) == Some(true) {
        plan.push("Apply basal dose: 50% N, 100% P and K at sowing/transplanting".to_string());
        plan.push("Top dressing: Remaining 50% N at 30-35 days after sowing".to_string());
    }

    plan.extend(
        [
            "Maintain optimal irrigation: Water at critical growth stages",
            "Weed management: First weeding at 20-25 days, second at 40-45 days",
            "Pest monitoring: Regular field scouting for early detection",
            "Harvest timing: Monitor crop maturity indicators for optimal harvest",
        ]
        .map(String::from),
    );

    plan
}

fn warnings(soil: Option<&SoilSample>) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(sample) = soil {
        if sample.ph.is_some_and(|ph| ph < 5.5) {
            warnings.push(
                "Highly acidic soil may cause nutrient deficiencies. Apply lime before planting."
                    .to_string(),
            );
        }
        if sample.ph.is_some_and(|ph| ph > 8.5) {
            warnings.push(
                "Highly alkaline soil may lock up micronutrients. Consider gypsum application."
                    .to_string(),
            );
        }
        if sample.nitrogen.is_some_and(|n| n > 500.0) {
            warnings.push(
                "Excessive nitrogen may cause vegetative growth at expense of yield. Reduce N application."
                    .to_string(),
            );
        }
    }

    warnings.push("Always wear protective equipment when applying chemicals.".to_string());
    warnings.push("Follow recommended dosages to avoid environmental damage.".to_string());
    warnings
}

fn narrative_sustainability(practice_count: usize, soil: Option<&SoilSample>) -> u8 {
    let mut score = 50 + (practice_count.min(6) * 5) as u32;
    if let Some(sample) = soil {
        if sample.organic_carbon.is_some_and(|oc| oc > 0.5) {
            score += 10;
        }
        if sample.ph.is_some_and(|ph| (6.0..=7.5).contains(&ph)) {
            score += 10;
        }
    }
    score.min(100) as u8
}

fn narrative_cost(practice_count: usize) -> u8 {
    if practice_count > 3 {
        90
    } else {
        70
    }
}

/// Bilingual answer routed on the first topic the question mentions.
fn answer_question(question: &str, crop: &str, district: &str, soil: Option<&SoilSample>) -> String {
    let q = question.to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|term| q.contains(term));

    if mentions(&["fertilizer", "खाद"]) {
        let low_nitrogen = soil.map(|sample| SoilReadings::from(sample).nitrogen < 40.0) == Some(true);
        if low_nitrogen {
            return format!(
                "For {crop}, apply 50-60 kg nitrogen per hectare. Use urea (25 kg at sowing + 25 kg after 30 days) or farmyard manure (10-15 tons/ha). {crop} के लिए, 50-60 किलो नाइट्रोजन प्रति हेक्टेयर डालें।"
            );
        }
        return format!(
            "For {crop}, apply balanced NPK fertilizer. Get soil tested for exact recommendations. {crop} के लिए, संतुलित NPK उर्वरक डालें।"
        );
    }

    if mentions(&["water", "पानी", "irrigation"]) {
        return format!(
            "{crop} needs regular watering, especially during flowering and grain filling. Water when top 2-3 cm soil is dry. Avoid waterlogging. {crop} को नियमित पानी चाहिए।"
        );
    }

    if mentions(&["pest", "insect", "कीट"]) {
        return format!(
            "For {crop}, monitor regularly for pests. Use neem-based organic pesticides first. For severe infestations, consult agricultural officer. {crop} में कीटों के लिए नियमित निगरानी करें।"
        );
    }

    if mentions(&["disease", "रोग"]) {
        return format!(
            "Prevent {crop} diseases by using disease-free seeds, proper spacing, and avoiding waterlogging. If disease appears, remove infected plants and apply fungicide. {crop} के रोगों को रोकने के लिए रोगमुक्त बीज का उपयोग करें।"
        );
    }

    if mentions(&["harvest", "कटाई"]) {
        return format!(
            "Harvest {crop} when grains/fruits reach physiological maturity. Look for color change and hardening. {crop} की कटाई तब करें जब दाने परिपक्व हो जाएं।"
        );
    }

    format!(
        "For {crop} in {district}, follow proper land preparation, timely sowing, balanced fertilization, regular monitoring, and timely harvesting. {district} में {crop} के लिए उचित भूमि तैयारी और समय पर बुवाई करें।"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(practices: Vec<TraditionalPractice>, soil: Option<SoilSample>) -> AiAdvisoryRequest {
        AiAdvisoryRequest {
            district: "Barabanki".to_string(),
            crop: "Rice".to_string(),
            traditional_practices: practices,
            soil_data: soil,
            user_query: None,
        }
    }

    fn practice(text: &str) -> TraditionalPractice {
        TraditionalPractice {
            practice: text.to_string(),
            benefit: "Improves yield".to_string(),
            season: Some("Kharif".to_string()),
            source: None,
        }
    }

    #[test]
    fn quotes_first_two_practices_in_plan() {
        let model = NarrativeAdvisoryModel::default();
        let response = model.compose(&request(
            vec![
                practice("Apply cow manure"),
                practice("Soak seeds overnight"),
                practice("Spray neem"),
            ],
            None,
        ));

        let quoted: Vec<_> = response
            .action_plan
            .iter()
            .filter(|step| step.starts_with("Apply traditional practice:"))
            .collect();
        assert_eq!(quoted.len(), 2);
        assert!(response.traditional_integration.contains("Best time: Kharif"));
        assert!(response
            .scientific_rationale
            .contains("No soil data available"));
    }

    #[test]
    fn rationale_reuses_rule_engine_thresholds() {
        let model = NarrativeAdvisoryModel::default();
        let soil = SoilSample {
            nitrogen: Some(25.0),
            phosphorus: Some(30.0),
            potassium: Some(250.0),
            ph: Some(5.2),
            organic_carbon: Some(0.8),
        };
        let response = model.compose(&request(Vec::new(), Some(soil)));

        assert!(response.scientific_rationale.contains("Nitrogen (N) 25 kg/ha (Low)"));
        assert!(response.scientific_rationale.contains("Soil pH 5.2 (Acidic)"));
        assert!(!response.scientific_rationale.contains("Phosphorus"));
        assert!(response
            .action_plan
            .iter()
            .any(|step| step.starts_with("Top dressing")));
        assert!(response
            .warnings
            .iter()
            .any(|warning| warning.starts_with("Highly acidic")));
    }

    #[test]
    fn renders_practice_blocks_and_adequate_soil_line() {
        let model = NarrativeAdvisoryModel::default();
        let soil = SoilSample {
            nitrogen: Some(300.0),
            phosphorus: Some(30.0),
            potassium: Some(250.0),
            ph: Some(6.8),
            organic_carbon: Some(0.8),
        };
        let response = model.compose(&request(vec![practice("Apply cow manure")], Some(soil)));

        assert!(response
            .traditional_integration
            .contains("1. Apply cow manure\n   Benefits: Improves yield\n   Best time: Kharif"));
        assert!(response
            .scientific_rationale
            .ends_with("• Soil nutrient levels and pH are adequate for Rice.\n"));
        assert!(response
            .recommendations
            .starts_with("Advisory for Rice in Barabanki\n\nTraditional Integration:\n"));
        assert!(response.recommendations.contains("\n\nAction Plan:\n1. "));
    }

    #[test]
    fn answers_fertilizer_question_in_both_languages() {
        let model = NarrativeAdvisoryModel::default();
        let mut req = request(Vec::new(), Some(SoilSample::default()));
        req.user_query = Some("Which fertilizer should I use?".to_string());

        let response = model.compose(&req);
        assert!(response.recommendations.starts_with("Question: Which fertilizer"));
        assert!(response.recommendations.contains("50-60 kg nitrogen"));
        assert!(response.recommendations.contains("किलो नाइट्रोजन"));
    }

    #[test]
    fn narrative_scores_follow_their_own_heuristic() {
        assert_eq!(narrative_sustainability(10, None), 80);
        let soil = SoilSample {
            ph: Some(6.5),
            organic_carbon: Some(0.9),
            ..SoilSample::default()
        };
        assert_eq!(narrative_sustainability(10, Some(&soil)), 100);
        assert_eq!(narrative_cost(3), 70);
        assert_eq!(narrative_cost(4), 90);
    }
}
