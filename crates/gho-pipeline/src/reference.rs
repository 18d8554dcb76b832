//! Reference Loader — one pass that seeds the indicator and sex dimensions.
//!
//! Reads the curated indicator CSV (`IndicatorCode`, `IndicatorName`,
//! `Category`). Rows without an indicator code are skipped and counted,
//! never abort the batch; rows whose code already exists are ignored by the
//! store (first write wins).

use std::{fs::File, io::Read, path::Path};

use gho_core::{indicator::IndicatorRow, store::StarStore};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{Error, Result, commit_or_rollback};

/// Raw CSV row shape. Every column is optional so that validation happens
/// here, per row, instead of failing the whole deserialisation.
#[derive(Debug, Deserialize)]
struct RawReferenceRecord {
  #[serde(rename = "IndicatorCode")]
  indicator_code: Option<String>,
  #[serde(rename = "IndicatorName")]
  indicator_name: Option<String>,
  #[serde(rename = "Category")]
  category:       Option<String>,
}

/// Outcome of one dimension-population pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceReport {
  pub rows_read:       usize,
  /// Distinct from `rows_read`: duplicates across repeated runs are
  /// ignored, not re-inserted.
  pub rows_inserted:   usize,
  pub rows_skipped:    usize,
  pub sex_rows_seeded: usize,
}

/// Load the indicator reference dataset and seed the static sex dimension,
/// committing once at the end of the pass. A missing file is fatal to the
/// step.
pub async fn load_reference<S>(store: &S, path: &Path) -> Result<ReferenceReport>
where
  S: StarStore,
{
  let file = File::open(path).map_err(|source| Error::ReferenceFile {
    path: path.to_path_buf(),
    source,
  })?;
  let (rows, rows_read, rows_skipped) = parse_reference(file);

  store.begin_pass().await.map_err(Error::store)?;
  let outcome: Result<ReferenceReport> = async {
    let rows_inserted = store.insert_indicators(rows).await.map_err(Error::store)?;
    let sex_rows_seeded = store.seed_sex().await.map_err(Error::store)?;
    Ok(ReferenceReport { rows_read, rows_inserted, rows_skipped, sex_rows_seeded })
  }
  .await;

  match commit_or_rollback(store, outcome).await {
    Ok(report) => {
      info!(
        rows_read     = report.rows_read,
        rows_inserted = report.rows_inserted,
        rows_skipped  = report.rows_skipped,
        "dimension pass committed"
      );
      Ok(report)
    }
    Err(e) => {
      error!(error = %e, "dimension pass rolled back");
      Err(e)
    }
  }
}

/// Parse the reference CSV, returning the valid rows plus read/skip counts.
fn parse_reference<R: Read>(reader: R) -> (Vec<IndicatorRow>, usize, usize) {
  let mut rows = Vec::new();
  let mut rows_read = 0;
  let mut rows_skipped = 0;

  for (index, result) in csv::Reader::from_reader(reader)
    .into_deserialize::<RawReferenceRecord>()
    .enumerate()
  {
    rows_read += 1;
    let raw = match result {
      Ok(raw) => raw,
      Err(e) => {
        warn!(row = index + 1, error = %e, "skipping malformed reference row");
        rows_skipped += 1;
        continue;
      }
    };

    let code = raw.indicator_code.as_deref().map(str::trim).unwrap_or("");
    if code.is_empty() {
      warn!(row = index + 1, "skipping reference row without IndicatorCode");
      rows_skipped += 1;
      continue;
    }

    rows.push(IndicatorRow {
      code:     code.to_owned(),
      name:     raw.indicator_name,
      category: raw.category,
    });
  }

  (rows, rows_read, rows_skipped)
}
