use std::collections::HashSet;
use std::io::Read;

use income_core::{EstimatorRepository, Jurisdiction, NO_JURISDICTION, RepositoryError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::decimal::deserialize_decimal;

#[derive(Debug, Error)]
pub enum JurisdictionLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Jurisdiction '{code}' has rate {rate}, expected a value in [0, 1)")]
    RateOutOfRange { code: String, rate: Decimal },

    #[error("Jurisdiction '{0}' appears more than once")]
    DuplicateCode(String),

    #[error("Jurisdiction code on row {0} is empty")]
    EmptyCode(usize),

    #[error("Table must contain 'NONE' with a zero rate")]
    MissingNone,

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for JurisdictionLoaderError {
    fn from(err: csv::Error) -> Self {
        JurisdictionLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the jurisdictions CSV: `code,name,rate`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JurisdictionRecord {
    pub code: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

pub struct JurisdictionLoader;

impl JurisdictionLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<JurisdictionRecord>, JurisdictionLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: JurisdictionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Checks codes are present and unique (case-insensitively), rates are
    /// in `[0, 1)`, and `NONE` is present at zero.
    pub fn validate(records: &[JurisdictionRecord]) -> Result<(), JurisdictionLoaderError> {
        let mut seen = HashSet::new();
        let mut has_none = false;

        for (row, record) in records.iter().enumerate() {
            let code = record.code.trim().to_ascii_uppercase();
            if code.is_empty() {
                return Err(JurisdictionLoaderError::EmptyCode(row + 1));
            }
            if record.rate < Decimal::ZERO || record.rate >= Decimal::ONE {
                return Err(JurisdictionLoaderError::RateOutOfRange {
                    code,
                    rate: record.rate,
                });
            }
            if code == NO_JURISDICTION {
                has_none = record.rate.is_zero();
            }
            if !seen.insert(code.clone()) {
                return Err(JurisdictionLoaderError::DuplicateCode(code));
            }
        }

        if !has_none {
            return Err(JurisdictionLoaderError::MissingNone);
        }
        Ok(())
    }

    /// Validate, then replace the stored table.
    pub async fn load<R: EstimatorRepository + ?Sized>(
        repo: &R,
        records: &[JurisdictionRecord],
    ) -> Result<usize, JurisdictionLoaderError> {
        Self::validate(records)?;

        let jurisdictions: Vec<Jurisdiction> = records
            .iter()
            .map(|r| Jurisdiction::new(r.code.trim().to_ascii_uppercase(), r.name.trim(), r.rate))
            .collect();

        repo.replace_jurisdictions(&jurisdictions).await?;
        info!(count = jurisdictions.len(), "loaded jurisdictions");

        Ok(jurisdictions.len())
    }
}
