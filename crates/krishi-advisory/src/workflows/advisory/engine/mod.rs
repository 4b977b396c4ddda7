mod config;
mod explanation;
mod plan;
mod scoring;
mod soil;

pub use config::{KeywordTable, PracticeSignal, SignalKeywords};
pub use explanation::generate_explanation;
pub use scoring::{cost_score, sustainability_score};

#[cfg(test)]
pub(crate) use plan::unconditional_step_count;

use super::domain::{
    AdvisoryResult, BlendedStep, ScientificRecommendation, SoilSample, TraditionalPractice,
};
use tracing::debug;

/// Stateless rule engine turning verified practices and an optional soil sample into an
/// advisory. Safe to share across requests; nothing is mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryRuleEngine {
    keywords: KeywordTable,
}

impl AdvisoryRuleEngine {
    pub fn new(keywords: KeywordTable) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    /// Compose soil analysis, plan, scores and narrative into one advisory.
    ///
    /// Never fails: an empty practice list or a missing sample only yields a thinner plan and
    /// lower scores.
    pub fn generate_advisory(
        &self,
        practices: &[TraditionalPractice],
        soil: Option<&SoilSample>,
    ) -> AdvisoryResult {
        let scientific = soil::analyze_soil(soil);
        let blended_plan = plan::build_blended_plan(practices, soil, &self.keywords);
        let sustainability = sustainability_score(practices.len(), &blended_plan);
        let cost = cost_score(practices.len(), scientific.len(), &blended_plan);
        let explanation = generate_explanation(sustainability, cost, practices.len());

        debug!(
            practices = practices.len(),
            scientific = scientific.len(),
            steps = blended_plan.len(),
            sustainability,
            cost,
            "rule engine advisory composed"
        );

        AdvisoryResult {
            traditional: practices.to_vec(),
            scientific,
            blended_plan,
            sustainability_score: sustainability,
            cost_score: cost,
            explanation,
            is_ai_powered: false,
            ai_error: None,
            ai_insights: None,
        }
    }

    /// Soil analysis on its own, for callers that only need the nutrient table.
    pub fn analyze_soil(&self, soil: Option<&SoilSample>) -> Vec<ScientificRecommendation> {
        soil::analyze_soil(soil)
    }

    pub fn blended_plan(
        &self,
        practices: &[TraditionalPractice],
        soil: Option<&SoilSample>,
    ) -> Vec<BlendedStep> {
        plan::build_blended_plan(practices, soil, &self.keywords)
    }
}
