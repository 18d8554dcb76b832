//! `gho` — pipeline step runner for the GHO star schema.
//!
//! Reads `gho.toml` (or the path given with `--config`) plus `GHO_*`
//! environment variables, opens the SQLite store, and runs one pipeline
//! step per invocation. The upstream scheduler sequences the steps:
//! `init-schema` → `load-dimensions` → `ingest` (→ `enrich-locations`).
//!
//! Outcomes are logged to stderr and appended to the durable log file; a
//! fatal error exits non-zero with the full error chain.

use std::{
  fs::OpenOptions,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gho_client::{ClientConfig, GhoClient};
use gho_core::store::StarStore as _;
use gho_pipeline::{PipelineConfig, enrich, ingest, reference};
use gho_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

#[derive(Parser)]
#[command(author, version, about = "GHO star-schema population pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "gho.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Drop and recreate the five tables. Discards all existing data.
  InitSchema,
  /// Load the indicator reference CSV and seed the sex dimension.
  LoadDimensions,
  /// Append observation facts for every indicator in a category.
  Ingest {
    /// Category label, e.g. "AIR" or "NCD".
    #[arg(long)]
    category: String,
  },
  /// Backfill country names on the location dimension.
  EnrichLocations,
  /// Print row counts for the five tables.
  Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;
  init_tracing(&cfg.log_path)?;

  let store = SqliteStore::open(&cfg.db_path)
    .await
    .with_context(|| format!("failed to open store at {}", cfg.db_path.display()))?;

  match cli.command {
    Command::InitSchema => {
      store.create_schema().await.context("schema creation failed")?;
      tracing::info!(db = %cfg.db_path.display(), "schema created");
    }

    Command::LoadDimensions => {
      reference::load_reference(&store, &cfg.reference_path).await?;
    }

    Command::Ingest { category } => {
      let client = http_client(&cfg)?;
      ingest::ingest(&store, &client, &category).await?;
    }

    Command::EnrichLocations => {
      let client = http_client(&cfg)?;
      enrich::enrich_locations(&store, &client, &cfg.country_codes_url).await?;
    }

    Command::Status => {
      let counts = store.table_counts().await.context("failed to read counts")?;
      println!("dim_indicators     {:>8}", counts.indicators);
      println!("dim_locations      {:>8}", counts.locations);
      println!("dim_periods        {:>8}", counts.periods);
      println!("dim_sex            {:>8}", counts.sexes);
      println!("fact_observations  {:>8}", counts.observations);
    }
  }

  Ok(())
}

fn http_client(cfg: &PipelineConfig) -> anyhow::Result<GhoClient> {
  GhoClient::new(ClientConfig {
    base_url: cfg.api_base_url.clone(),
    timeout:  Duration::from_secs(cfg.http_timeout_secs),
  })
  .context("failed to build HTTP client")
}

/// Load configuration. Defaults live here, at the outermost entry point;
/// the config file and `GHO_*` environment variables override them.
fn load_config(path: &Path) -> anyhow::Result<PipelineConfig> {
  let settings = config::Config::builder()
    .set_default("db_path", "who_gho.db")?
    .set_default("reference_path", "data/categorized_indicators.csv")?
    .set_default("api_base_url", "https://ghoapi.azureedge.net/api")?
    .set_default(
      "country_codes_url",
      "https://datahub.io/core/country-codes/r/country-codes.csv",
    )?
    .set_default("log_path", "gho-pipeline.log")?
    .set_default("http_timeout_secs", 30)?
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("GHO"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise PipelineConfig")
}

/// Console layer on stderr plus a durable, ANSI-free layer appending to the
/// log file.
fn init_tracing(log_path: &Path) -> anyhow::Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(log_path)
    .with_context(|| format!("failed to open log file {}", log_path.display()))?;

  tracing_subscriber::registry()
    .with(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
    .init();
  Ok(())
}
