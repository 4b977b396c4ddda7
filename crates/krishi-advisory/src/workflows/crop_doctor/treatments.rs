use serde::{Deserialize, Serialize};

/// Treatment advice in English and Hindi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub english: String,
    pub hindi: String,
}

impl Treatment {
    fn from_static(english: &str, hindi: &str) -> Self {
        Self {
            english: english.to_string(),
            hindi: hindi.to_string(),
        }
    }
}

/// Keyed by the classifier's full `Crop___Condition` label.
const LABEL_TREATMENTS: [(&str, &str, &str); 9] = [
    (
        "Wheat___Brown_rust",
        "Apply fungicide sprays, use resistant varieties.",
        "फफूंदनाशक का छिड़काव करें, प्रतिरोधी किस्में लगाएं।",
    ),
    (
        "Rice___Blast",
        "Use resistant varieties, apply fungicide, avoid excess nitrogen.",
        "प्रतिरोधी किस्में लगाएं, फफूंदनाशक का प्रयोग करें, अधिक नाइट्रोजन से बचें।",
    ),
    (
        "Cotton___Bacterial_blight",
        "Remove infected plants, use copper fungicide.",
        "संक्रमित पौधों को हटाएं, तांबे का फफूंदनाशक प्रयोग करें।",
    ),
    (
        "Sugarcane___Red_rot",
        "Destroy infected clumps, use resistant varieties.",
        "संक्रमित गुच्छों को नष्ट करें, प्रतिरोधी किस्में लगाएं।",
    ),
    (
        "Tomato___Late_blight",
        "Spray copper-based fungicide, avoid overhead irrigation.",
        "तांबे आधारित फफूंदनाशक का छिड़काव करें, ऊपर से सिंचाई से बचें।",
    ),
    (
        "Potato___Early_blight",
        "Use fungicide sprays, rotate crops.",
        "फफूंदनाशक का छिड़काव करें, फसल चक्र बदलें।",
    ),
    (
        "Corn___Common_rust",
        "Use resistant varieties, apply fungicide if severe.",
        "प्रतिरोधी किस्में लगाएं, गंभीर होने पर फफूंदनाशक का प्रयोग करें।",
    ),
    (
        "Apple___Scab",
        "Apply fungicide sprays, prune trees for airflow.",
        "फफूंदनाशक का छिड़काव करें, पेड़ों की छंटाई करें।",
    ),
    (
        "Grape___Black_rot",
        "Prune vines, apply fungicide, remove debris.",
        "लताओं की छंटाई करें, फफूंदनाशक का प्रयोग करें, अवशेष हटाएं।",
    ),
];

/// Matched as substrings of the condition part of the label, in order.
const CONDITION_TREATMENTS: [(&str, &str, &str); 4] = [
    (
        "Late_blight",
        "Remove infected leaves immediately. Spray copper-based fungicide (Bordeaux mixture) or Mancozeb every 7-10 days. Improve air circulation between plants.",
        "संक्रमित पत्तियों को तुरंत हटाएं। हर 7-10 दिनों में तांबा आधारित फफूंदनाशक (बोर्डो मिश्रण) या मैंकोजेब का छिड़काव करें। पौधों के बीच हवा का संचार बढ़ाएं।",
    ),
    (
        "Early_blight",
        "Apply Mancozeb or Chlorothalonil fungicide. Remove and destroy infected plant parts. Maintain proper plant spacing for air circulation.",
        "मैंकोजेब या क्लोरोथैलोनिल फफूंदनाशक लगाएं। संक्रमित पौधे के हिस्सों को हटाकर नष्ट करें। हवा के संचार के लिए उचित पौधे की दूरी बनाए रखें।",
    ),
    (
        "Leaf_spot",
        "Spray copper fungicide at first sign of disease. Remove and destroy affected leaves. Avoid overhead irrigation to reduce leaf wetness.",
        "रोग के पहले संकेत पर तांबे का फफूंदनाशक छिड़कें। प्रभावित पत्तियों को हटाकर नष्ट करें। पत्तियों पर पानी जमने से बचने के लिए ऊपर से सिंचाई न करें।",
    ),
    (
        "Bacterial_spot",
        "Use copper-based bactericides. Remove infected plants. Practice crop rotation. Use resistant varieties when available.",
        "तांबा आधारित जीवाणुनाशक का उपयोग करें। संक्रमित पौधों को हटा दें। फसल चक्र अपनाएं। उपलब्ध होने पर प्रतिरोधी किस्मों का उपयोग करें।",
    ),
];

const PEST_TREATMENT: (&str, &str) = (
    "Apply neem-based organic pesticide (5ml/liter water). Introduce natural predators like ladybugs. Remove and destroy severely affected plants to prevent spread.",
    "नीम आधारित जैविक कीटनाशक (5ml/लीटर पानी) लगाएं। लेडीबग्स जैसे प्राकृतिक शिकारियों को पेश करें। फैलाव रोकने के लिए गंभीर रूप से प्रभावित पौधों को हटाकर नष्ट करें।",
);

pub const HEALTHY_RECOMMENDATIONS: [&str; 5] = [
    "Continue regular monitoring and preventive care",
    "Maintain optimal watering and fertilization schedule",
    "Keep the field clean and weed-free",
    "Monitor for any early signs of stress or disease",
    "Maintain proper plant spacing for good air circulation",
];

pub const ISSUE_RECOMMENDATIONS: [&str; 7] = [
    "Isolate or remove severely infected plants immediately",
    "Apply recommended treatment without delay",
    "Improve air circulation by pruning and proper spacing",
    "Adjust watering schedule - avoid overhead irrigation",
    "Monitor closely for disease spread to neighboring plants",
    "Consult local agricultural extension officer if condition worsens",
    "Consider using disease-resistant varieties in next season",
];

pub const TRADITIONAL_REMEDIES: [&str; 5] = [
    "Neem leaf extract spray: Boil 500g neem leaves in 10L water, cool, filter, spray on plants",
    "Cow urine solution: Mix 1 liter cow urine with 10 liters water, spray as foliar treatment",
    "Wood ash application: Dust wood ash around plant base to prevent fungal spread",
    "Turmeric powder spray: Mix 50g turmeric in 10L water as natural antifungal",
    "Garlic-chili extract: Grind 100g garlic + 50g chili, soak in 10L water overnight, strain and spray for pest control",
];

pub const PREVENTIVE_MEASURES: [&str; 8] = [
    "Use certified disease-free seeds or seedlings",
    "Maintain proper plant spacing (follow recommended guidelines)",
    "Practice crop rotation - avoid planting same crop family consecutively",
    "Remove and destroy all crop residues after harvest",
    "Ensure good drainage - avoid waterlogging conditions",
    "Regular field inspection for early detection of problems",
    "Apply balanced nutrition - avoid excess nitrogen",
    "Maintain field hygiene - remove weeds and alternate hosts",
];

/// Look up disease treatment: full label first, then condition substring, then generic advice.
pub fn disease_treatment(label: &str, condition: &str) -> Treatment {
    if let Some((_, english, hindi)) = LABEL_TREATMENTS
        .iter()
        .find(|(key, _, _)| key.eq_ignore_ascii_case(label))
    {
        return Treatment::from_static(english, hindi);
    }

    if let Some((_, english, hindi)) = CONDITION_TREATMENTS
        .iter()
        .find(|(key, _, _)| condition.contains(key))
    {
        return Treatment::from_static(english, hindi);
    }

    let name = condition.replace('_', " ");
    Treatment {
        english: format!(
            "For {name}, apply appropriate fungicide and consult local agricultural expert for specific treatment protocol."
        ),
        hindi: format!(
            "{name} के लिए, उपयुक्त फफूंदनाशक लगाएं और विशिष्ट उपचार प्रोटोकॉल के लिए स्थानीय कृषि विशेषज्ञ से परामर्श करें।"
        ),
    }
}

pub fn pest_treatment() -> Treatment {
    Treatment::from_static(PEST_TREATMENT.0, PEST_TREATMENT.1)
}
