mod run;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use parkmatch_core::Provider;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "parkmatch")]
#[command(about = "Match airport parking listings across providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cluster previously collected location records from a JSON file
    Match {
        /// JSON array of location records
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        matching: MatchingArgs,
    },
    /// Query every configured provider for an airport, then cluster the results
    Search {
        /// IATA airport code (e.g. LAX)
        #[arg(long)]
        airport: String,
        /// Stay start, RFC 3339 (e.g. 2026-11-20T08:00:00Z)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Stay end, RFC 3339; must be after --start
        #[arg(long)]
        end: DateTime<Utc>,
        /// Provider connector definitions; overrides `PARKMATCH_PROVIDERS_PATH`
        #[arg(long)]
        providers: Option<PathBuf>,
        /// Query only this provider (repeatable, e.g. --provider spothero)
        #[arg(long = "provider")]
        only: Vec<Provider>,
        /// Also write the collected, unclustered records as JSON
        #[arg(long)]
        records: Option<PathBuf>,
        #[command(flatten)]
        matching: MatchingArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct MatchingArgs {
    /// Match criteria YAML; overrides `PARKMATCH_CRITERIA_PATH`
    #[arg(long)]
    criteria: Option<PathBuf>,
    /// Neither reward similar prices nor reject divergent ones
    #[arg(long)]
    ignore_price: bool,
    /// Sort records by provider and provider ID before clustering
    #[arg(long)]
    sort_input: bool,
    /// Write matched locations as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write the Markdown report here instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = parkmatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(
        env = %config.env,
        providers = %config.providers_path.display(),
        "parkmatch starting"
    );

    let cli = Cli::parse();
    match cli.command {
        Commands::Match { input, matching } => run::run_match(&config, &input, &matching),
        Commands::Search {
            airport,
            start,
            end,
            providers,
            only,
            records,
            matching,
        } => {
            let search = run::SearchRequest {
                airport: &airport,
                start,
                end,
                providers: providers.as_deref(),
                only: &only,
                records: records.as_deref(),
            };
            run::run_search(&config, &search, &matching).await
        }
    }
}
