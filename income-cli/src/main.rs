use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use income_cli::app::{IncomeUpdate, Session, build_registry};
use income_cli::config::{Config, DEFAULT_CONFIG_FILE};
use income_cli::logging::init_logging;
use income_cli::output::{
    describe_income, render_expense_tree, render_states, render_summary, short_id,
};
use income_cli::utils::{parse_amount, parse_color, parse_days_per_week, parse_hours_per_day};
use income_core::{Cadence, DisplayPeriod, ExpenseDraft};
use rust_decimal::Decimal;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal income and expense estimator.
///
/// Declares one income, a tree of recurring expenses, and prints taxes,
/// take-home pay and where the money goes.
#[derive(Debug, Parser)]
#[command(name = "income", version)]
struct Cli {
    /// Configuration file. Defaults to `income.toml` in the working
    /// directory when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`). Overrides the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Connection string. For SQLite a file path or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the results summary.
    Show {
        /// year, month, week or day. Defaults to the configured period.
        #[arg(short, long)]
        period: Option<DisplayPeriod>,
    },

    /// Edit the income declaration.
    #[command(subcommand)]
    Income(IncomeCommand),

    /// Edit the expense tree.
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// List jurisdictions and their flat rates.
    States,

    /// Write a configuration file with the default settings.
    InitConfig {
        /// Where to write it.
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
enum IncomeCommand {
    /// Change any of the income fields; the rest keep their values.
    Set(IncomeArgs),
}

#[derive(Debug, Args)]
struct IncomeArgs {
    #[arg(long, value_parser = parse_amount)]
    amount: Option<Decimal>,

    /// Hourly, Daily, Weekly, Bi-Weekly, Monthly or Yearly.
    #[arg(long)]
    cadence: Option<Cadence>,

    /// The amount is before tax.
    #[arg(long, conflicts_with = "net")]
    gross: bool,

    /// The amount is after tax; no tax is computed.
    #[arg(long)]
    net: bool,

    /// Working hours per day, 1 to 24.
    #[arg(long, value_parser = parse_hours_per_day)]
    hours: Option<Decimal>,

    /// Working days per week, 1 to 7.
    #[arg(long, value_parser = parse_days_per_week)]
    days: Option<Decimal>,

    /// Jurisdiction code, e.g. CA, or NONE.
    #[arg(long)]
    state: Option<String>,
}

impl IncomeArgs {
    fn into_update(self) -> IncomeUpdate {
        let is_gross = match (self.gross, self.net) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        IncomeUpdate {
            amount: self.amount,
            cadence: self.cadence,
            is_gross,
            hours_per_day: self.hours,
            days_per_week: self.days,
            jurisdiction: self.state,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ExpenseCommand {
    /// Add an expense. Leave the amount at 0 for a category.
    Add {
        label: String,

        #[arg(long, value_parser = parse_amount)]
        amount: Option<Decimal>,

        /// Defaults to the parent's cadence, or Monthly for a root.
        #[arg(long)]
        cadence: Option<Cadence>,

        /// Id (or unique id prefix) of the parent expense.
        #[arg(long)]
        parent: Option<String>,

        /// #rrggbb or hsl(...). Picked from the amount when omitted.
        #[arg(long, value_parser = parse_color)]
        color: Option<String>,
    },

    /// Remove an expense and everything under it.
    Remove { id: String },

    /// Change an expense's color.
    Color {
        id: String,
        #[arg(value_parser = parse_color)]
        color: String,
    },

    /// Change an expense's amount.
    Amount {
        id: String,
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },

    /// Print the expense tree.
    List,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref()).context("failed to read configuration")?;
    init_logging(&config.logging.level, config.logging.file.as_deref())?;

    if let Command::InitConfig { path, force } = &cli.command {
        if path.exists() && !force {
            bail!("{} already exists; pass --force to overwrite", path.display());
        }
        Config::default()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}.", path.display());
        return Ok(());
    }

    let db_config = config.db_config(cli.backend.as_deref(), cli.db.as_deref());
    debug!(backend = %db_config.backend, db = %db_config.connection_string, "opening storage");
    let repo = build_registry()
        .create(&db_config)
        .await
        .with_context(|| format!("failed to open {} storage", db_config.backend))?;
    let mut session = Session::open(repo).await.context("failed to load saved state")?;

    match cli.command {
        Command::Show { period } => {
            let period = match period {
                Some(period) => period,
                None => config.display_period()?,
            };
            print!("{}", render_summary(session.income(), &session.result(), period));
        }
        Command::Income(IncomeCommand::Set(args)) => {
            session.update_income(args.into_update()).await?;
            println!("Income: {}", describe_income(session.income()));
        }
        Command::Expense(command) => run_expense(&mut session, command).await?,
        Command::States => {
            print!(
                "{}",
                render_states(session.jurisdictions(), &session.income().jurisdiction)
            );
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

async fn run_expense(
    session: &mut Session,
    command: ExpenseCommand,
) -> Result<()> {
    match command {
        ExpenseCommand::Add {
            label,
            amount,
            cadence,
            parent,
            color,
        } => {
            let mut draft = ExpenseDraft::new(label.clone(), amount.unwrap_or(Decimal::ZERO));
            if let Some(cadence) = cadence {
                draft = draft.cadence(cadence);
            }
            if let Some(color) = color {
                draft = draft.color(color);
            }
            let id = session.add_expense(parent.as_deref(), draft).await?;
            println!("Added {label} ({}).", short_id(&id));
        }
        ExpenseCommand::Remove { id } => {
            let removed = session.remove_expense(&id).await?;
            println!("Removed {removed} expense(s).");
        }
        ExpenseCommand::Color { id, color } => {
            session.set_expense_color(&id, color).await?;
        }
        ExpenseCommand::Amount { id, amount } => {
            session.set_expense_amount(&id, amount).await?;
        }
        ExpenseCommand::List => {
            print!("{}", render_expense_tree(&session.forest().snapshot()));
        }
    }
    Ok(())
}
