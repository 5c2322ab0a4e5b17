mod collectors;
mod config;
mod context;
mod lock;

use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use networth_core::constants::STALE_RATE_HOURS;
use networth_core::ingestion::{SourceKind, SourceSelection};
use networth_core::{Error, Result};
use networth_market_data::{CoinGeckoProvider, FrankfurterProvider, QuoteProvider};

use config::Config;
use context::AppContext;
use lock::RunLock;

/// Process exit codes: 0 success or no-op, 1 fatal error, 2 lock
/// contention, 130 user interrupt.
const EXIT_OK: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_LOCKED: i32 = 2;
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(name = "networth")]
#[command(about = "Personal net worth tracker")]
struct Cli {
    /// Path to the SQLite database (overrides NETWORTH_DB_PATH)
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and bring the schema up to date
    Init,
    /// Fetch balances from the configured sources and commit a snapshot
    Ingest {
        /// Which sources to fetch: "all" or a comma-separated subset
        /// (exchanges,wallets,spreadsheet). Reconciliation of
        /// disappeared holdings only runs with "all".
        #[arg(long, default_value = "all")]
        sources: String,
    },
    /// Refresh rates from quote providers and propagate to derivatives
    Rates,
    /// Upsert today's net worth summary row
    Summary,
}

fn init_tracing() {
    let log_format = std::env::var("NETWORTH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

fn parse_selection(sources: &str) -> Result<SourceSelection> {
    if sources.eq_ignore_ascii_case("all") {
        return Ok(SourceSelection::All);
    }
    let kinds = sources
        .split(',')
        .map(|s| SourceKind::from_str(s.trim()))
        .collect::<Result<Vec<_>>>()?;
    Ok(SourceSelection::Only(kinds))
}

async fn run_ingest(config: &Config, sources: &str) -> Result<()> {
    let selection = parse_selection(sources)?;
    let _lock = RunLock::acquire(&config.lock_dir.join(".balances.lock"))?;
    tracing::info!(
        "Lock acquired, starting ingestion (sources: {selection}, valuing in {}/{})",
        config.base_currency,
        config.secondary_currency
    );

    let context = AppContext::build(config)?;
    let collectors = context.build_collectors(config)?;
    if selection.includes(SourceKind::Exchanges)
        && !collectors.iter().any(|c| c.kind() == SourceKind::Exchanges)
    {
        tracing::warn!("No exchange collectors configured, skipping exchanges");
    }

    let service = context.ingestion_service(config);
    let timestamp = chrono::Local::now().naive_local();
    let summary = service.run(&collectors, &selection, timestamp).await?;

    for line in summary.to_string().lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

async fn run_rates(config: &Config) -> Result<()> {
    let _lock = RunLock::acquire(&config.lock_dir.join(".fx_rates.lock"))?;
    tracing::info!("Lock acquired, starting rate refresh");

    let context = AppContext::build(config)?;
    let providers: Vec<Arc<dyn QuoteProvider>> = vec![
        Arc::new(CoinGeckoProvider::new()),
        Arc::new(FrankfurterProvider::new()),
    ];
    let service = context.rate_refresh_service(providers);

    let now = chrono::Local::now().naive_local();
    let stale_before = service.stale_rates(STALE_RATE_HOURS, now)?;
    if !stale_before.is_empty() {
        tracing::warn!("Found {} stale rates (>24h old)", stale_before.len());
        for rate in stale_before.iter().take(5) {
            tracing::warn!("  {}: {:.1}h old", rate.currency_code, rate.hours_old);
        }
    }

    let outcome = service.refresh().await?;
    tracing::info!(
        "Rate refresh complete: {} direct, {} propagated",
        outcome.updated,
        outcome.propagated
    );
    for (code, reason) in &outcome.failures {
        tracing::warn!("Failed to update {code}: {reason}");
    }

    let stale_after = service.stale_rates(STALE_RATE_HOURS, now)?;
    if stale_after.is_empty() {
        tracing::info!("All rates are fresh (<{STALE_RATE_HOURS}h old)");
    } else {
        tracing::warn!("Still have {} stale rates", stale_after.len());
        for rate in &stale_after {
            tracing::warn!(
                "  {}: {:.1}h old (last update: {})",
                rate.currency_code,
                rate.hours_old,
                rate.updated_at
            );
        }
    }

    if outcome.total_updated() == 0 {
        return Err(Error::Rate("no rates were updated".to_string()));
    }
    Ok(())
}

async fn run_summary(config: &Config) -> Result<()> {
    let _lock = RunLock::acquire(&config.lock_dir.join(".snapshot.lock"))?;
    tracing::info!("Lock acquired, recording net worth summary");

    let context = AppContext::build(config)?;
    let service = context.net_worth_service();
    let today = chrono::Local::now().date_naive();

    match service.record(today).await? {
        Some(summary) => {
            tracing::info!(
                "Snapshot for {}: assets={:.2}, liabilities={:.2}, net worth={:.2} ({} balances)",
                summary.date,
                summary.assets_base,
                summary.liabilities_base,
                summary.net_worth_base,
                summary.num_balances
            );
        }
        None => tracing::warn!("No balances in the database, nothing to record"),
    }
    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Init => {
            AppContext::build(config)?;
            tracing::info!("Database ready at {}", config.db_path);
            Ok(())
        }
        Command::Ingest { sources } => run_ingest(config, &sources).await,
        Command::Rates => run_rates(config).await,
        Command::Summary => run_summary(config).await,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.db_path = database;
    }

    let code = tokio::select! {
        result = run(cli.command, &config) => match result {
            Ok(()) => EXIT_OK,
            Err(Error::AlreadyRunning(detail)) => {
                tracing::warn!("Another run is already in progress ({detail})");
                EXIT_LOCKED
            }
            Err(e) => {
                tracing::error!("{e}");
                EXIT_ERROR
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted by user");
            EXIT_INTERRUPTED
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_selection_parses() {
        assert_eq!(parse_selection("all").unwrap(), SourceSelection::All);
        assert_eq!(parse_selection("ALL").unwrap(), SourceSelection::All);
    }

    #[test]
    fn subset_selection_parses() {
        let selection = parse_selection("exchanges, wallets").unwrap();
        assert_eq!(
            selection,
            SourceSelection::Only(vec![SourceKind::Exchanges, SourceKind::Wallets])
        );
        assert!(!selection.is_full());
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(parse_selection("everything").is_err());
    }
}
