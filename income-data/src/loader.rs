use std::io::Read;

use income_core::calculations::{BracketTableError, validate_brackets};
use income_core::{EstimatorRepository, RepositoryError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::decimal::{deserialize_decimal, deserialize_optional_decimal};

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid bracket table: {0}")]
    InvalidTable(#[from] BracketTableError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the brackets CSV.
///
/// - `limit`: cumulative income ceiling of the bracket, empty for the
///   unbounded top bracket
/// - `rate`: marginal rate as a decimal (e.g. 0.10 for 10%)
///
/// Rows are in ascending order; row order is bracket order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub limit: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

impl From<&TaxBracketRecord> for TaxBracket {
    fn from(record: &TaxBracketRecord) -> Self {
        TaxBracket {
            limit: record.limit,
            rate: record.rate,
        }
    }
}

/// Loader for the federal bracket table.
///
/// Works against any [`EstimatorRepository`], so the same CSV can feed any
/// backend.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate `records` as a whole table and replace the stored one.
    ///
    /// Nothing is written unless the table validates. Loading the same file
    /// twice leaves the same table behind.
    pub async fn load<R: EstimatorRepository + ?Sized>(
        repo: &R,
        records: &[TaxBracketRecord],
    ) -> Result<usize, TaxBracketLoaderError> {
        let brackets: Vec<TaxBracket> = records.iter().map(TaxBracket::from).collect();
        validate_brackets(&brackets)?;

        repo.replace_tax_brackets(&brackets).await?;
        info!(count = brackets.len(), "loaded tax brackets");

        Ok(brackets.len())
    }
}

#[cfg(test)]
mod tests {
    use income_core::MemoryRepository;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = "limit,rate
11600,0.10
47150,0.12
100525,0.22
191950,0.24
243725,0.32
609350,0.35
,0.37
";

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn parses_single_bounded_bracket() {
        let records = TaxBracketLoader::parse("limit,rate\n11600,0.10".as_bytes())
            .expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![TaxBracketRecord {
                limit: Some(dec!(11600)),
                rate: dec!(0.10),
            }]
        );
    }

    #[test]
    fn empty_limit_is_unbounded() {
        let records = TaxBracketLoader::parse("limit,rate\n,0.37".as_bytes()).unwrap();

        assert_eq!(records[0].limit, None);
    }

    #[test]
    fn parses_full_table_in_order() {
        let records = TaxBracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 7);
        assert_eq!(records[2].limit, Some(dec!(100525)));
        assert_eq!(records[6].rate, dec!(0.37));
    }

    #[test]
    fn quoted_thousands_separators_are_accepted() {
        let records = TaxBracketLoader::parse("limit,rate\n\"47,150\",0.12".as_bytes()).unwrap();

        assert_eq!(records[0].limit, Some(dec!(47150)));
    }

    #[test]
    fn invalid_rate_is_a_parse_error() {
        let result = TaxBracketLoader::parse("limit,rate\n11600,ten".as_bytes());

        assert!(matches!(result, Err(TaxBracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let result = TaxBracketLoader::parse("limit\n11600".as_bytes());

        assert!(matches!(result, Err(TaxBracketLoaderError::CsvParse(_))));
    }

    // =========================================================================
    // load tests
    // =========================================================================

    #[tokio::test]
    async fn load_replaces_stored_table() {
        let repo = MemoryRepository::new();
        let records = TaxBracketLoader::parse("limit,rate\n10000,0.10\n,0.30".as_bytes()).unwrap();

        let loaded = TaxBracketLoader::load(&repo, &records).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(
            repo.get_tax_brackets().await.unwrap(),
            vec![
                TaxBracket::bounded(dec!(10000), dec!(0.10)),
                TaxBracket::unbounded(dec!(0.30)),
            ]
        );
    }

    #[tokio::test]
    async fn load_rejects_table_without_top_bracket() {
        let repo = MemoryRepository::new();
        let records = TaxBracketLoader::parse("limit,rate\n10000,0.10".as_bytes()).unwrap();

        let result = TaxBracketLoader::load(&repo, &records).await;

        assert!(matches!(
            result,
            Err(TaxBracketLoaderError::InvalidTable(BracketTableError::MissingUnboundedBracket))
        ));
        assert_eq!(repo.get_tax_brackets().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn load_rejects_descending_limits() {
        let repo = MemoryRepository::new();
        let records =
            TaxBracketLoader::parse("limit,rate\n47150,0.12\n11600,0.10\n,0.37".as_bytes()).unwrap();

        let result = TaxBracketLoader::load(&repo, &records).await;

        assert!(matches!(
            result,
            Err(TaxBracketLoaderError::InvalidTable(BracketTableError::NotAscending { index: 1, .. }))
        ));
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let repo = MemoryRepository::new();
        let records = TaxBracketLoader::parse(TEST_CSV.as_bytes()).unwrap();

        TaxBracketLoader::load(&repo, &records).await.unwrap();
        let first = repo.get_tax_brackets().await.unwrap();
        TaxBracketLoader::load(&repo, &records).await.unwrap();

        assert_eq!(repo.get_tax_brackets().await.unwrap(), first);
    }
}
