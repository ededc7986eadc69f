use std::path::PathBuf;

use async_trait::async_trait;
use income_core::db::{DbConfig, EstimatorRepository, RepositoryError, RepositoryFactory};

use crate::repository::SqliteRepository;

/// Resolve the seeds directory at runtime.
///
/// 1. `INCOME_DB_SQLITE_SEEDS_DIR` if set.
/// 2. `./seeds` if it exists in the current working directory.
/// 3. `$CARGO_MANIFEST_DIR/seeds` otherwise (development and tests).
fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("INCOME_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// Turns a bare path into a sqlx URL that creates the file on first use.
fn database_url(connection_string: &str) -> String {
    if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else if connection_string == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{connection_string}?mode=rwc")
    }
}

/// [`RepositoryFactory`] for SQLite, registered as `"sqlite"`.
///
/// ```rust,no_run
/// use income_core::db::RepositoryRegistry;
/// use income_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open `config.connection_string` (a file path, `:memory:`, or a full
    /// `sqlite:` URL), migrate it, and apply the seeds. Seeds only fill
    /// empty reference tables.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimatorRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&database_url(&config.connection_string))
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        repo.run_seeds(&seeds_dir())
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
