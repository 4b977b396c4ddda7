use std::collections::BTreeSet;

use super::super::domain::{BlendedStep, PlanMethod, SoilReadings, SoilSample, TraditionalPractice};
use super::config::{KeywordTable, PracticeSignal};
use super::soil::{ph_deviation, PhDeviation};

/// Nitrogen (kg/ha) under which the first top dressing is scheduled.
const TOP_DRESSING_NITROGEN_BELOW: f64 = 40.0;

/// Predicate deciding whether a candidate step makes it into the plan.
#[derive(Debug, Clone, Copy)]
enum Gate {
    Always,
    Practice(PracticeSignal),
    SoilPhOutOfRange,
    SoilNitrogenBelow(f64),
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Fixed(&'static str),
    ByPhDeviation {
        acidic: &'static str,
        alkaline: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct CandidateStep {
    gate: Gate,
    action: Action,
    method: PlanMethod,
    timing: &'static str,
    benefit: &'static str,
}

/// Candidate steps in agronomic order: soil preparation, sowing, vegetative growth,
/// reproductive stage, harvest. Emission order is table order.
const CANDIDATE_STEPS: [CandidateStep; 10] = [
    CandidateStep {
        gate: Gate::Practice(PracticeSignal::Manure),
        action: Action::Fixed("Apply organic manure (FYM/Compost)"),
        method: PlanMethod::Traditional,
        timing: "2-3 weeks before sowing",
        benefit: "Improves soil structure, adds nutrients, enhances water retention",
    },
    CandidateStep {
        gate: Gate::Practice(PracticeSignal::GreenManure),
        action: Action::Fixed("Incorporate green manure crop"),
        method: PlanMethod::Traditional,
        timing: "45 days before main crop sowing",
        benefit: "Adds nitrogen naturally, suppresses weeds, improves soil biology",
    },
    CandidateStep {
        gate: Gate::SoilPhOutOfRange,
        action: Action::ByPhDeviation {
            acidic: "Apply lime to correct pH",
            alkaline: "Apply gypsum to correct pH",
        },
        method: PlanMethod::Scientific,
        timing: "3-4 weeks before sowing",
        benefit: "Optimizes nutrient availability and microbial activity",
    },
    CandidateStep {
        gate: Gate::Practice(PracticeSignal::SeedTreatment),
        action: Action::Fixed("Treat seeds with organic + biological agents"),
        method: PlanMethod::Hybrid,
        timing: "1 day before sowing",
        benefit: "Protects against seed-borne diseases, improves germination",
    },
    CandidateStep {
        gate: Gate::Always,
        action: Action::Fixed("Apply balanced NPK (organic + inorganic)"),
        method: PlanMethod::Hybrid,
        timing: "At sowing time",
        benefit: "Provides complete nutrition while maintaining soil health",
    },
    CandidateStep {
        gate: Gate::SoilNitrogenBelow(TOP_DRESSING_NITROGEN_BELOW),
        action: Action::Fixed("First nitrogen top dressing"),
        method: PlanMethod::Scientific,
        timing: "3-4 weeks after sowing",
        benefit: "Supports vigorous vegetative growth",
    },
    CandidateStep {
        gate: Gate::Practice(PracticeSignal::PestControl),
        action: Action::Fixed("Apply neem-based pest control"),
        method: PlanMethod::Traditional,
        timing: "As preventive spray every 15 days",
        benefit: "Natural pest control without harming beneficial insects",
    },
    CandidateStep {
        gate: Gate::Practice(PracticeSignal::Irrigation),
        action: Action::Fixed("Implement efficient irrigation schedule"),
        method: PlanMethod::Hybrid,
        timing: "Throughout crop growth",
        benefit: "Conserves water while meeting crop requirements",
    },
    CandidateStep {
        gate: Gate::Always,
        action: Action::Fixed("Monitor and manage nutrient deficiencies"),
        method: PlanMethod::Hybrid,
        timing: "Mid-season",
        benefit: "Ensures optimal growth and prevents yield loss",
    },
    CandidateStep {
        gate: Gate::Always,
        action: Action::Fixed("Prepare for timely harvest"),
        method: PlanMethod::Traditional,
        timing: "At crop maturity",
        benefit: "Maximizes yield and quality",
    },
];

struct PlanContext {
    signals: BTreeSet<PracticeSignal>,
    soil: Option<SoilReadings>,
}

impl PlanContext {
    fn admits(&self, gate: Gate) -> bool {
        match gate {
            Gate::Always => true,
            Gate::Practice(signal) => self.signals.contains(&signal),
            Gate::SoilPhOutOfRange => self
                .soil
                .map(|soil| ph_deviation(soil.ph).is_some())
                .unwrap_or(false),
            Gate::SoilNitrogenBelow(limit) => self
                .soil
                .map(|soil| soil.nitrogen < limit)
                .unwrap_or(false),
        }
    }

    fn action_text(&self, action: Action) -> &'static str {
        match action {
            Action::Fixed(text) => text,
            Action::ByPhDeviation { acidic, alkaline } => {
                match self.soil.and_then(|soil| ph_deviation(soil.ph)) {
                    Some(PhDeviation::Alkaline) => alkaline,
                    _ => acidic,
                }
            }
        }
    }
}

/// Ordered plan with contiguous step numbers starting at 1.
pub(crate) fn build_blended_plan(
    practices: &[TraditionalPractice],
    soil: Option<&SoilSample>,
    keywords: &KeywordTable,
) -> Vec<BlendedStep> {
    let context = PlanContext {
        signals: keywords.detect(practices),
        soil: soil.map(SoilReadings::from),
    };

    CANDIDATE_STEPS
        .iter()
        .filter(|candidate| context.admits(candidate.gate))
        .zip(1u32..)
        .map(|(candidate, step)| BlendedStep {
            step,
            action: context.action_text(candidate.action).to_string(),
            method: candidate.method,
            timing: candidate.timing.to_string(),
            benefit: candidate.benefit.to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn unconditional_step_count() -> usize {
    CANDIDATE_STEPS
        .iter()
        .filter(|candidate| matches!(candidate.gate, Gate::Always))
        .count()
}
