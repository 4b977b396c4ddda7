use super::super::domain::BlendedStep;

const SUSTAINABILITY_BASE: i64 = 50;
const SUSTAINABILITY_PER_PRACTICE: i64 = 8;
const SUSTAINABILITY_PRACTICE_CAP: i64 = 30;
const SUSTAINABILITY_PER_LOW_INPUT_STEP: i64 = 3;
const SUSTAINABILITY_STEP_CAP: i64 = 20;

const COST_BASE: i64 = 40;
const COST_PER_PRACTICE: i64 = 10;
const COST_PRACTICE_CAP: i64 = 40;
const COST_PER_LOW_INPUT_STEP: i64 = 5;
const COST_STEP_CAP: i64 = 20;
const COST_PER_SCIENTIFIC: i64 = 3;
const COST_SCIENTIFIC_CAP: i64 = 15;

/// Heuristic 0-100 index rewarding traditional coverage and low-input plan steps.
pub fn sustainability_score(practice_count: usize, plan: &[BlendedStep]) -> u8 {
    let score = SUSTAINABILITY_BASE
        + capped(practice_count, SUSTAINABILITY_PER_PRACTICE, SUSTAINABILITY_PRACTICE_CAP)
        + capped(
            low_input_steps(plan),
            SUSTAINABILITY_PER_LOW_INPUT_STEP,
            SUSTAINABILITY_STEP_CAP,
        );
    clamp_score(score)
}

/// Heuristic 0-100 index; every required scientific intervention costs points.
pub fn cost_score(practice_count: usize, scientific_count: usize, plan: &[BlendedStep]) -> u8 {
    let score = COST_BASE + capped(practice_count, COST_PER_PRACTICE, COST_PRACTICE_CAP)
        + capped(low_input_steps(plan), COST_PER_LOW_INPUT_STEP, COST_STEP_CAP)
        - capped(scientific_count, COST_PER_SCIENTIFIC, COST_SCIENTIFIC_CAP);
    clamp_score(score)
}

fn low_input_steps(plan: &[BlendedStep]) -> usize {
    plan.iter().filter(|step| step.method.is_low_input()).count()
}

fn capped(count: usize, weight: i64, cap: i64) -> i64 {
    i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(weight)
        .min(cap)
}

fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}
