use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use income_data::{JurisdictionLoader, TaxBracketLoader};
use income_db_sqlite::SqliteRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load reference tables from CSV files into the estimator database.
///
/// Brackets CSV columns:
/// - limit: cumulative income ceiling (empty for the top bracket)
/// - rate: marginal rate as a decimal (e.g., 0.10)
///
/// Jurisdictions CSV columns:
/// - code: two-letter state code, plus a NONE row at rate 0
/// - name: display name
/// - rate: flat rate as a decimal (e.g., 0.08)
#[derive(Parser, Debug)]
#[command(name = "income-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the federal bracket table
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Path to the CSV file containing the jurisdiction table
    #[arg(short, long)]
    jurisdictions: Option<PathBuf>,

    /// SQLite database URL (e.g., sqlite:income.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:income.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        info!("running migrations");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
    }

    if let Some(seeds_dir) = &args.seeds {
        info!(dir = %seeds_dir.display(), "running seeds");
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
    }

    if let Some(path) = &args.brackets {
        let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = TaxBracketLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let loaded = TaxBracketLoader::load(&repo, &records)
            .await
            .context("Failed to load tax brackets into database")?;
        println!("Loaded {} tax brackets from {}.", loaded, path.display());
    }

    if let Some(path) = &args.jurisdictions {
        let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = JurisdictionLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let loaded = JurisdictionLoader::load(&repo, &records)
            .await
            .context("Failed to load jurisdictions into database")?;
        println!("Loaded {} jurisdictions from {}.", loaded, path.display());
    }

    if args.brackets.is_none() && args.jurisdictions.is_none() && !args.migrate && args.seeds.is_none() {
        println!("Nothing to do. Pass --brackets and/or --jurisdictions.");
    }

    Ok(())
}
