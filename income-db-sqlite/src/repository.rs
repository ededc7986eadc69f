use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use income_core::{
    EstimatorRepository, Jurisdiction, PersistedState, RepositoryError, STATE_KEY, TaxBracket,
};
use sqlx::{Row, sqlite::SqlitePool};
use tracing::{debug, info};

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl EstimatorRepository for SqliteRepository {
    async fn load_state(&self) -> Result<Option<PersistedState>, RepositoryError> {
        let row = sqlx::query("SELECT payload FROM app_state WHERE key = ?")
            .bind(STATE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload").map_err(db_error)?;
                Ok(Some(PersistedState::from_json(&payload)))
            }
            None => Ok(None),
        }
    }

    async fn save_state(
        &self,
        state: &PersistedState,
    ) -> Result<(), RepositoryError> {
        let payload = state.to_json()?;

        sqlx::query(
            "INSERT INTO app_state (key, payload, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        )
        .bind(STATE_KEY)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        debug!(bytes = payload.len(), "saved state");
        Ok(())
    }

    async fn get_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError> {
        let rows = sqlx::query("SELECT upper_limit, rate FROM tax_brackets ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let mut brackets = Vec::with_capacity(rows.len());
        for row in rows {
            brackets.push(TaxBracket {
                limit: get_optional_decimal(&row, "upper_limit")?,
                rate: get_decimal(&row, "rate")?,
            });
        }
        Ok(brackets)
    }

    async fn replace_tax_brackets(
        &self,
        brackets: &[TaxBracket],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM tax_brackets")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for (position, bracket) in brackets.iter().enumerate() {
            sqlx::query("INSERT INTO tax_brackets (position, upper_limit, rate) VALUES (?, ?, ?)")
                .bind(position as i64)
                .bind(bracket.limit.map(decimal_to_text))
                .bind(decimal_to_text(bracket.rate))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        info!(count = brackets.len(), "replaced tax brackets");
        Ok(())
    }

    async fn list_jurisdictions(&self) -> Result<Vec<Jurisdiction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT code, name, rate FROM jurisdictions
             ORDER BY CASE WHEN code = 'NONE' THEN 0 ELSE 1 END, code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut jurisdictions = Vec::with_capacity(rows.len());
        for row in rows {
            jurisdictions.push(Jurisdiction {
                code: row.try_get("code").map_err(db_error)?,
                name: row.try_get("name").map_err(db_error)?,
                rate: get_decimal(&row, "rate")?,
            });
        }
        Ok(jurisdictions)
    }

    async fn replace_jurisdictions(
        &self,
        jurisdictions: &[Jurisdiction],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM jurisdictions")
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        for jurisdiction in jurisdictions {
            sqlx::query("INSERT INTO jurisdictions (code, name, rate) VALUES (?, ?, ?)")
                .bind(jurisdiction.code.to_ascii_uppercase())
                .bind(&jurisdiction.name)
                .bind(decimal_to_text(jurisdiction.rate))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        info!(count = jurisdictions.len(), "replaced jurisdictions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use income_core::{Cadence, ExpenseNode, IncomeSpec, JurisdictionTable, load_state_or_default};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    async fn setup_seeded_db() -> SqliteRepository {
        let repo = setup_test_db().await;
        repo.run_seeds(&Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds"))
            .await
            .expect("Failed to run seeds");
        repo
    }

    fn sample_state() -> PersistedState {
        PersistedState::new(
            IncomeSpec::gross(dec!(30), Cadence::Hourly).with_jurisdiction("CA"),
            vec![
                ExpenseNode::new("h", "Housing", dec!(0), Cadence::Monthly)
                    .with_color("hsl(0, 75%, 50%)")
                    .with_children(vec![
                        ExpenseNode::new("r", "Rent", dec!(1500), Cadence::Monthly)
                            .with_color("#ff0000"),
                    ]),
            ],
        )
    }

    // =========================================================================
    // state tests
    // =========================================================================

    #[tokio::test]
    async fn empty_database_has_no_state() {
        let repo = setup_test_db().await;

        assert_eq!(repo.load_state().await, Ok(None));
    }

    #[tokio::test]
    async fn state_round_trips() {
        let repo = setup_test_db().await;
        let state = sample_state();

        repo.save_state(&state).await.unwrap();

        assert_eq!(repo.load_state().await, Ok(Some(state)));
    }

    #[tokio::test]
    async fn saving_twice_overwrites() {
        let repo = setup_test_db().await;
        repo.save_state(&sample_state()).await.unwrap();

        repo.save_state(&PersistedState::default()).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_state")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(repo.load_state().await, Ok(Some(PersistedState::default())));
    }

    #[tokio::test]
    async fn corrupt_payload_falls_back_to_defaults() {
        let repo = setup_test_db().await;
        sqlx::query("INSERT INTO app_state (key, payload, updated_at) VALUES (?, '}{', '')")
            .bind(STATE_KEY)
            .execute(repo.pool())
            .await
            .unwrap();

        assert_eq!(load_state_or_default(&repo).await, PersistedState::default());
    }

    // =========================================================================
    // reference table tests
    // =========================================================================

    #[tokio::test]
    async fn seeds_load_builtin_tables() {
        let repo = setup_seeded_db().await;

        assert_eq!(repo.get_tax_brackets().await.unwrap(), *income_core::DEFAULT_TAX_BRACKETS);

        let table = JurisdictionTable::new(repo.list_jurisdictions().await.unwrap());
        assert_eq!(table, JurisdictionTable::builtin());
    }

    #[tokio::test]
    async fn seeds_do_not_overwrite_loaded_tables() {
        let repo = setup_seeded_db().await;
        let brackets = vec![TaxBracket::unbounded(dec!(0.2))];
        repo.replace_tax_brackets(&brackets).await.unwrap();

        repo.run_seeds(&Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds"))
            .await
            .unwrap();

        assert_eq!(repo.get_tax_brackets().await.unwrap(), brackets);
    }

    #[tokio::test]
    async fn brackets_keep_their_order() {
        let repo = setup_test_db().await;
        let brackets = vec![
            TaxBracket::bounded(dec!(10000), dec!(0.1)),
            TaxBracket::bounded(dec!(40000), dec!(0.2)),
            TaxBracket::unbounded(dec!(0.3)),
        ];

        repo.replace_tax_brackets(&brackets).await.unwrap();

        assert_eq!(repo.get_tax_brackets().await.unwrap(), brackets);
    }

    #[tokio::test]
    async fn jurisdictions_list_none_first() {
        let repo = setup_test_db().await;
        repo.replace_jurisdictions(&[
            Jurisdiction::new("TX", "Texas", dec!(0)),
            Jurisdiction::new("NONE", "No State Tax", dec!(0)),
            Jurisdiction::new("CA", "California", dec!(0.08)),
        ])
        .await
        .unwrap();

        let codes: Vec<_> = repo
            .list_jurisdictions()
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.code)
            .collect();

        assert_eq!(codes, vec!["NONE", "CA", "TX"]);
    }
}
