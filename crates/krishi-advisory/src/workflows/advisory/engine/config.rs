use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::TraditionalPractice;

/// Practice themes that unlock conditional plan steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeSignal {
    Manure,
    GreenManure,
    SeedTreatment,
    PestControl,
    Irrigation,
}

impl PracticeSignal {
    pub const ALL: [PracticeSignal; 5] = [
        PracticeSignal::Manure,
        PracticeSignal::GreenManure,
        PracticeSignal::SeedTreatment,
        PracticeSignal::PestControl,
        PracticeSignal::Irrigation,
    ];
}

/// Keywords for one signal.
///
/// Substrings match anywhere in the lowercased practice text. Words match whole tokens only,
/// which keeps short romanized terms such as `pani` from firing inside "companion".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeywordSpec")]
pub struct SignalKeywords {
    substrings: BTreeSet<String>,
    words: BTreeSet<String>,
}

/// Accepted input shapes: a bare list of substrings, or both sets spelled out.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordSpec {
    Substrings(Vec<String>),
    Split {
        #[serde(default)]
        substrings: Vec<String>,
        #[serde(default)]
        words: Vec<String>,
    },
}

impl From<KeywordSpec> for SignalKeywords {
    fn from(spec: KeywordSpec) -> Self {
        match spec {
            KeywordSpec::Substrings(substrings) => Self::default().add_substrings(substrings),
            KeywordSpec::Split { substrings, words } => Self::default()
                .add_substrings(substrings)
                .add_words(words),
        }
    }
}

impl SignalKeywords {
    fn add_substrings<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.substrings.extend(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty()),
        );
        self
    }

    fn add_words<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            keywords
                .into_iter()
                .map(|keyword| tokens(keyword.as_ref()).join(" "))
                .filter(|keyword| !keyword.is_empty()),
        );
        self
    }

    pub fn substrings(&self) -> impl Iterator<Item = &str> {
        self.substrings.iter().map(String::as_str)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if self.substrings().any(|keyword| lower.contains(keyword)) {
            return true;
        }
        if self.words.is_empty() {
            return false;
        }

        let text_tokens = tokens(text);
        self.words().any(|word| {
            let phrase: Vec<&str> = word.split(' ').collect();
            text_tokens.windows(phrase.len()).any(|window| {
                window
                    .iter()
                    .zip(&phrase)
                    .all(|(token, expected)| token.as_str() == *expected)
            })
        })
    }
}

/// Lowercased alphanumeric runs. Devanagari vowel signs count as alphabetic.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Keyword sets per signal, covering English, Devanagari and romanized Hindi.
///
/// Only the practice text is scanned, never the benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<PracticeSignal, SignalKeywords>")]
#[serde(into = "BTreeMap<PracticeSignal, SignalKeywords>")]
pub struct KeywordTable {
    entries: BTreeMap<PracticeSignal, SignalKeywords>,
}

impl KeywordTable {
    /// Table of substring keywords per signal.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PracticeSignal, Vec<S>)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(signal, keywords)| (signal, SignalKeywords::default().add_substrings(keywords)))
            .collect();
        Self { entries }
    }

    /// Add whole-word keywords for a signal.
    pub fn with_words<I, S>(mut self, signal: PracticeSignal, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = self.entries.remove(&signal).unwrap_or_default();
        self.entries.insert(signal, keywords.add_words(words));
        self
    }

    pub fn keywords(&self, signal: PracticeSignal) -> Option<&SignalKeywords> {
        self.entries.get(&signal)
    }

    pub fn matches(&self, signal: PracticeSignal, text: &str) -> bool {
        self.entries
            .get(&signal)
            .map(|keywords| keywords.matches(text))
            .unwrap_or(false)
    }

    /// Signals raised by at least one practice in the list.
    pub fn detect(&self, practices: &[TraditionalPractice]) -> BTreeSet<PracticeSignal> {
        PracticeSignal::ALL
            .into_iter()
            .filter(|signal| {
                practices
                    .iter()
                    .any(|practice| self.matches(*signal, &practice.practice))
            })
            .collect()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new([
            (PracticeSignal::Manure, vec!["manure", "खाद", "compost"]),
            (PracticeSignal::GreenManure, vec!["green manure", "हरी खाद"]),
            (PracticeSignal::SeedTreatment, vec!["seed", "बीज"]),
            (PracticeSignal::PestControl, vec!["neem", "pest", "नीम", "कीट"]),
            (
                PracticeSignal::Irrigation,
                vec!["irrigation", "water", "सिंचाई", "पानी"],
            ),
        ])
        .with_words(PracticeSignal::Manure, ["khad", "gobar"])
        .with_words(PracticeSignal::GreenManure, ["hari khad", "dhaincha", "sunhemp"])
        .with_words(PracticeSignal::SeedTreatment, ["beej"])
        .with_words(PracticeSignal::PestControl, ["keet"])
        .with_words(PracticeSignal::Irrigation, ["sinchai", "pani"])
    }
}

impl From<BTreeMap<PracticeSignal, SignalKeywords>> for KeywordTable {
    fn from(entries: BTreeMap<PracticeSignal, SignalKeywords>) -> Self {
        Self { entries }
    }
}

impl From<KeywordTable> for BTreeMap<PracticeSignal, SignalKeywords> {
    fn from(table: KeywordTable) -> Self {
        table.entries
    }
}
