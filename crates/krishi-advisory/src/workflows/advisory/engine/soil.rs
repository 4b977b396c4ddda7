use super::super::domain::{Nutrient, ScientificRecommendation, SoilReadings, SoilSample};

/// Guidance text attached to a band.
struct Guidance {
    recommendation: &'static str,
    quantity: &'static str,
}

/// Three-band macronutrient rule: below `low_below` is Low, below `sufficient_at` is Moderate,
/// anything higher emits nothing. Values in kg/ha.
struct MacronutrientRule {
    nutrient: Nutrient,
    low_below: f64,
    sufficient_at: f64,
    low: Guidance,
    moderate: Guidance,
}

const NITROGEN: MacronutrientRule = MacronutrientRule {
    nutrient: Nutrient::Nitrogen,
    low_below: 30.0,
    sufficient_at: 40.0,
    low: Guidance {
        recommendation: "Apply nitrogen fertilizer to reach optimal levels",
        quantity: "Apply 60-80 kg/ha of Urea (46% N) or equivalent organic sources",
    },
    moderate: Guidance {
        recommendation: "Maintain nitrogen levels with balanced fertilization",
        quantity: "Apply 40-50 kg/ha of Urea or use green manure",
    },
};

const PHOSPHORUS: MacronutrientRule = MacronutrientRule {
    nutrient: Nutrient::Phosphorus,
    low_below: 15.0,
    sufficient_at: 20.0,
    low: Guidance {
        recommendation: "Increase phosphorus for root development and flowering",
        quantity: "Apply 40-50 kg/ha of DAP (Diammonium Phosphate) or rock phosphate",
    },
    moderate: Guidance {
        recommendation: "Maintain phosphorus with moderate application",
        quantity: "Apply 20-30 kg/ha of DAP or compost rich in phosphorus",
    },
};

const POTASSIUM: MacronutrientRule = MacronutrientRule {
    nutrient: Nutrient::Potassium,
    low_below: 150.0,
    sufficient_at: 200.0,
    low: Guidance {
        recommendation: "Boost potassium for disease resistance and quality",
        quantity: "Apply 50-60 kg/ha of Muriate of Potash (MOP) or wood ash",
    },
    moderate: Guidance {
        recommendation: "Maintain potassium levels with balanced fertilization",
        quantity: "Apply 30-40 kg/ha of MOP or organic potash sources",
    },
};

/// Inclusive band in which no pH correction is needed.
pub(crate) const PH_ADEQUATE_MIN: f64 = 6.0;
pub(crate) const PH_ADEQUATE_MAX: f64 = 8.0;

const PH_ACIDIC: Guidance = Guidance {
    recommendation: "Apply lime to neutralize soil acidity",
    quantity: "Apply 2-3 tons/ha of agricultural lime (CaCO3)",
};

const PH_ALKALINE: Guidance = Guidance {
    recommendation: "Apply gypsum to reduce alkalinity",
    quantity: "Apply 1-2 tons/ha of gypsum (CaSO4)",
};

/// Percent.
const ORGANIC_CARBON_LOW_BELOW: f64 = 0.5;

const ORGANIC_CARBON_LOW: Guidance = Guidance {
    recommendation: "Increase organic matter for soil health",
    quantity: "Apply 5-7 tons/ha of well-decomposed farmyard manure or compost",
};

/// Direction in which soil pH leaves the adequate band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhDeviation {
    Acidic,
    Alkaline,
}

pub(crate) fn ph_deviation(ph: f64) -> Option<PhDeviation> {
    if ph < PH_ADEQUATE_MIN {
        Some(PhDeviation::Acidic)
    } else if ph > PH_ADEQUATE_MAX {
        Some(PhDeviation::Alkaline)
    } else {
        None
    }
}

/// Scientific recommendations for every out-of-band factor, in fixed factor order:
/// nitrogen, phosphorus, potassium, pH, organic carbon. No sample, no recommendations.
pub(crate) fn analyze_soil(sample: Option<&SoilSample>) -> Vec<ScientificRecommendation> {
    let Some(sample) = sample else {
        return Vec::new();
    };
    let readings = SoilReadings::from(sample);

    let mut recommendations = Vec::new();

    for (rule, value) in [
        (&NITROGEN, readings.nitrogen),
        (&PHOSPHORUS, readings.phosphorus),
        (&POTASSIUM, readings.potassium),
    ] {
        if let Some(recommendation) = evaluate_macronutrient(rule, value) {
            recommendations.push(recommendation);
        }
    }

    if let Some(deviation) = ph_deviation(readings.ph) {
        let (label, guidance) = match deviation {
            PhDeviation::Acidic => ("Acidic", &PH_ACIDIC),
            PhDeviation::Alkaline => ("Alkaline", &PH_ALKALINE),
        };
        recommendations.push(recommendation(
            Nutrient::SoilPh,
            format!("{} ({label})", readings.ph),
            guidance,
        ));
    }

    if readings.organic_carbon < ORGANIC_CARBON_LOW_BELOW {
        recommendations.push(recommendation(
            Nutrient::OrganicCarbon,
            format!("{}% (Low)", readings.organic_carbon),
            &ORGANIC_CARBON_LOW,
        ));
    }

    recommendations
}

fn evaluate_macronutrient(rule: &MacronutrientRule, value: f64) -> Option<ScientificRecommendation> {
    let (band, guidance) = if value < rule.low_below {
        ("Low", &rule.low)
    } else if value < rule.sufficient_at {
        ("Moderate", &rule.moderate)
    } else {
        return None;
    };

    Some(recommendation(
        rule.nutrient,
        format!("{value} kg/ha ({band})"),
        guidance,
    ))
}

fn recommendation(
    nutrient: Nutrient,
    current_level: String,
    guidance: &Guidance,
) -> ScientificRecommendation {
    ScientificRecommendation {
        nutrient,
        current_level: Some(current_level),
        recommendation: guidance.recommendation.to_string(),
        quantity: Some(guidance.quantity.to_string()),
        ai_generated: false,
    }
}
