const HIGH_TIER: u8 = 80;
const MID_TIER: u8 = 60;

const CLOSING: &str =
    "Follow the blended plan for best results, adapting timing to your local conditions.";

fn sustainability_sentence(score: u8) -> &'static str {
    if score >= HIGH_TIER {
        "The approach is highly sustainable, emphasizing organic inputs and natural methods."
    } else if score >= MID_TIER {
        "The approach balances sustainability with productivity, using both organic and inorganic inputs."
    } else {
        "The approach focuses on addressing immediate soil deficiencies."
    }
}

fn cost_sentence(score: u8) -> &'static str {
    if score >= HIGH_TIER {
        "It is very cost-effective, relying primarily on locally available organic resources."
    } else if score >= MID_TIER {
        "It offers good cost efficiency by combining traditional and modern inputs."
    } else {
        "While input costs may be moderate, the approach ensures optimal nutrition."
    }
}

/// Deterministic narrative for a pair of scores.
pub fn generate_explanation(sustainability: u8, cost: u8, practice_count: usize) -> String {
    format!(
        "This advisory combines {practice_count} traditional practices with scientific soil analysis. {} {} {CLOSING}",
        sustainability_sentence(sustainability),
        cost_sentence(cost),
    )
}
