//! Location enrichment — backfills country names on the location dimension.
//!
//! Locations are created during ingestion with only their ISO code; this
//! pass downloads the public country-codes dataset and fills in
//! `country_name` where it is still empty. Codes with no match stay null.

use gho_client::GhoClient;
use gho_core::store::StarStore;
use serde::Deserialize;
use tracing::{error, info};

use crate::{Error, Result, commit_or_rollback};

/// The two columns we read from the country-codes CSV; the file carries
/// dozens more.
#[derive(Debug, Deserialize)]
struct CountryCodeRecord {
  #[serde(rename = "ISO3166-1-Alpha-3")]
  alpha3:        Option<String>,
  #[serde(rename = "official_name_en")]
  official_name: Option<String>,
}

/// Outcome of one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
  pub names_available:   usize,
  pub locations_updated: usize,
}

/// Download the country-codes dataset and backfill location names,
/// committing once at the end of the pass. A failed download is fatal to
/// the step.
pub async fn enrich_locations<S>(
  store:  &S,
  client: &GhoClient,
  url:    &str,
) -> Result<EnrichReport>
where
  S: StarStore,
{
  let body = client.fetch_text(url).await?;
  let names = parse_country_names(body.as_bytes())?;
  let names_available = names.len();

  store.begin_pass().await.map_err(Error::store)?;
  let outcome = store
    .update_location_names(names)
    .await
    .map_err(Error::store);

  match commit_or_rollback(store, outcome).await {
    Ok(locations_updated) => {
      info!(names_available, locations_updated, "enrichment pass committed");
      Ok(EnrichReport { names_available, locations_updated })
    }
    Err(e) => {
      error!(error = %e, "enrichment pass rolled back");
      Err(e)
    }
  }
}

/// Extract `(code, name)` pairs, dropping rows missing either column.
fn parse_country_names(data: &[u8]) -> Result<Vec<(String, String)>> {
  let mut names = Vec::new();
  for result in
    csv::Reader::from_reader(data).into_deserialize::<CountryCodeRecord>()
  {
    let record = result?;
    let (Some(code), Some(name)) = (record.alpha3, record.official_name) else {
      continue;
    };
    if code.trim().is_empty() || name.trim().is_empty() {
      continue;
    }
    names.push((code, name));
  }
  Ok(names)
}
