//! CSV import of curated practices and soil test results.
//!
//! Practices: `district,crop,practice,benefit,season,source,submitted_by,verified`.
//! Soil samples: `district,crop,nitrogen,phosphorus,potassium,ph,organic_carbon,sampled_at`.
//! Optional columns may be blank or omitted; a missing `verified` column means the row was
//! curated and is imported as verified.

mod normalizer;
mod parser;

pub use normalizer::normalize_key;

use std::io::Read;
use std::path::Path;

use uuid::Uuid;

use crate::workflows::advisory::domain::{
    KnowledgeRecord, PracticeId, SoilSample, SoilSampleRecord, TraditionalPractice,
};
use parser::{PracticeRow, SoilRow};

#[derive(Debug)]
pub enum KnowledgeImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for KnowledgeImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KnowledgeImportError::Io(err) => write!(f, "failed to read knowledge file: {}", err),
            KnowledgeImportError::Csv(err) => write!(f, "invalid knowledge CSV data: {}", err),
            KnowledgeImportError::InvalidRow { line, reason } => {
                write!(f, "invalid knowledge row on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for KnowledgeImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KnowledgeImportError::Io(err) => Some(err),
            KnowledgeImportError::Csv(err) => Some(err),
            KnowledgeImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for KnowledgeImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for KnowledgeImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct KnowledgeImporter;

impl KnowledgeImporter {
    pub fn practices_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<KnowledgeRecord>, KnowledgeImportError> {
        let file = std::fs::File::open(path)?;
        Self::practices_from_reader(file)
    }

    pub fn practices_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<KnowledgeRecord>, KnowledgeImportError> {
        parser::read_rows::<_, PracticeRow>(reader)?
            .into_iter()
            .map(|(line, row)| practice_record(row, line))
            .collect()
    }

    pub fn soil_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<SoilSampleRecord>, KnowledgeImportError> {
        let file = std::fs::File::open(path)?;
        Self::soil_from_reader(file)
    }

    pub fn soil_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<SoilSampleRecord>, KnowledgeImportError> {
        parser::read_rows::<_, SoilRow>(reader)?
            .into_iter()
            .map(|(line, row)| soil_record(row, line))
            .collect()
    }
}

fn practice_record(row: PracticeRow, line: usize) -> Result<KnowledgeRecord, KnowledgeImportError> {
    let district = required(&row.district, "district", line)?;
    let crop = required(&row.crop, "crop", line)?;
    let practice = required(&row.practice, "practice", line)?;
    let benefit = required(&row.benefit, "benefit", line)?;

    let verified = match row.verified.as_deref() {
        None => true,
        Some(flag) => parser::parse_flag(flag).ok_or_else(|| KnowledgeImportError::InvalidRow {
            line,
            reason: format!("verified must be true or false, got `{}`", flag),
        })?,
    };

    Ok(KnowledgeRecord {
        id: PracticeId(Uuid::new_v4().to_string()),
        district,
        crop,
        practice: TraditionalPractice {
            practice,
            benefit,
            season: row.season,
            source: row.source,
        },
        submitted_by: row.submitted_by,
        verified,
    })
}

fn soil_record(row: SoilRow, line: usize) -> Result<SoilSampleRecord, KnowledgeImportError> {
    let district = required(&row.district, "district", line)?;
    let crop = required(&row.crop, "crop", line)?;
    let sampled_at =
        parser::parse_sample_date(&row.sampled_at).ok_or_else(|| KnowledgeImportError::InvalidRow {
            line,
            reason: format!("sampled_at is not a date: `{}`", row.sampled_at),
        })?;

    let sample = SoilSample {
        nitrogen: measurement(row.nitrogen.as_deref(), "nitrogen", line)?,
        phosphorus: measurement(row.phosphorus.as_deref(), "phosphorus", line)?,
        potassium: measurement(row.potassium.as_deref(), "potassium", line)?,
        ph: measurement(row.ph.as_deref(), "ph", line)?,
        organic_carbon: measurement(row.organic_carbon.as_deref(), "organic_carbon", line)?,
    };

    Ok(SoilSampleRecord {
        district,
        crop,
        sample,
        sampled_at,
    })
}

fn required(value: &str, field: &str, line: usize) -> Result<String, KnowledgeImportError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(KnowledgeImportError::InvalidRow {
            line,
            reason: format!("{} is required", field),
        })
    } else {
        Ok(trimmed.to_string())
    }
}

fn measurement(
    value: Option<&str>,
    field: &str,
    line: usize,
) -> Result<Option<f64>, KnowledgeImportError> {
    value
        .map(|raw| {
            parser::parse_measurement(raw).ok_or_else(|| KnowledgeImportError::InvalidRow {
                line,
                reason: format!("{} is not a number: `{}`", field, raw),
            })
        })
        .transpose()
}
