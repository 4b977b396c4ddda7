use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct PracticeRow {
    pub(crate) district: String,
    pub(crate) crop: String,
    pub(crate) practice: String,
    pub(crate) benefit: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) season: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) source: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) submitted_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) verified: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SoilRow {
    pub(crate) district: String,
    pub(crate) crop: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) nitrogen: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) phosphorus: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) potassium: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) ph: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) organic_carbon: Option<String>,
    pub(crate) sampled_at: String,
}

/// Rows paired with the 1-based file line each record starts on.
///
/// Blank lines are skipped by the reader and quoted fields may span lines, so lines are
/// counted from the record's byte offset in the buffered input.
pub(crate) fn read_rows<R, T>(mut reader: R) -> Result<Vec<(usize, T)>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input.as_slice());
    let headers = csv_reader.headers()?.clone();

    csv_reader
        .records()
        .map(|record| {
            let record = record?;
            let line = record
                .position()
                .map(|position| record_line(&input, position.byte()))
                .unwrap_or_default();
            let row = record.deserialize::<T>(Some(&headers))?;
            Ok((line, row))
        })
        .collect()
}

/// Line of the first byte at or after `offset` that is not a line break.
fn record_line(input: &[u8], offset: u64) -> usize {
    let from = usize::try_from(offset).map_or(input.len(), |offset| offset.min(input.len()));
    let start = input[from..]
        .iter()
        .position(|byte| !matches!(byte, b'\r' | b'\n'))
        .map_or(input.len(), |skipped| from + skipped);
    1 + input[..start].iter().filter(|byte| **byte == b'\n').count()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_measurement(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_sample_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
