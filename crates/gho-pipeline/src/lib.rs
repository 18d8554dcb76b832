//! Population engine for the GHO star schema.
//!
//! Three orchestrator-visible steps over any
//! [`StarStore`](gho_core::store::StarStore): dimension seeding
//! ([`reference`]), fact ingestion ([`ingest`]) and location enrichment
//! ([`enrich`]). Each step runs as one transaction pass — committed once on
//! success, rolled back whole on any storage error. Network failures are
//! absorbed at the smallest granularity instead (per indicator, inside the
//! pass).

pub mod enrich;
pub mod error;
pub mod ingest;
pub mod reference;

pub use error::{Error, Result};

use std::path::PathBuf;

use gho_core::store::StarStore;
use serde::Deserialize;
use tracing::warn;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `gho.toml` and `GHO_*`
/// environment variables. Defaults live in the binary, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
  pub db_path:           PathBuf,
  pub reference_path:    PathBuf,
  pub api_base_url:      String,
  pub country_codes_url: String,
  pub log_path:          PathBuf,
  pub http_timeout_secs: u64,
}

// ─── Pass boundary ───────────────────────────────────────────────────────────

/// Commit the pass on success, roll it back on error. A rollback failure is
/// logged and the original error kept.
pub(crate) async fn commit_or_rollback<S, T>(
  store:   &S,
  outcome: Result<T>,
) -> Result<T>
where
  S: StarStore,
{
  match outcome {
    Ok(value) => {
      store.commit_pass().await.map_err(Error::store)?;
      Ok(value)
    }
    Err(e) => {
      if let Err(rollback) = store.rollback_pass().await {
        warn!(error = %rollback, "rollback failed");
      }
      Err(e)
    }
  }
}
