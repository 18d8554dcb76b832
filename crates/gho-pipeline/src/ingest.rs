//! Fact Ingestor — appends observation facts for one indicator category.
//!
//! Indicators are fetched sequentially; a fetch or parse failure abandons
//! that indicator only and the loop continues. Storage failures are fatal
//! to the whole pass and roll back every uncommitted row.

use gho_client::GhoClient;
use gho_core::{
  dimension::{Dimension, NaturalKey},
  observation::{NewObservation, SexCode},
  store::StarStore,
};
use tracing::{debug, error, info, warn};

use crate::{Error, Result, commit_or_rollback};

// ─── Report ──────────────────────────────────────────────────────────────────

/// An indicator abandoned because its fetch or parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedIndicator {
  pub code:   String,
  pub reason: String,
}

/// Outcome of one fact-ingestion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
  /// Indicators whose `category` matched. Zero for an unknown category —
  /// that is an empty run, not an error.
  pub indicators_matched:  usize,
  pub indicators_ingested: usize,
  pub skipped_indicators:  Vec<SkippedIndicator>,
  pub facts_inserted:      usize,
  /// Records missing a spatial code, time code, or numeric value.
  pub records_skipped:     usize,
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// Fetch every matching indicator's observations and append fact rows,
/// committing once at the end of the pass.
///
/// After a successful return, every eligible observation the API returned
/// for the category at call time has a fact row. Re-running the same
/// category appends duplicates — facts carry no uniqueness constraint.
pub async fn ingest<S>(
  store:    &S,
  client:   &GhoClient,
  category: &str,
) -> Result<IngestReport>
where
  S: StarStore,
{
  let indicators = store
    .indicators_in_category(category)
    .await
    .map_err(Error::store)?;

  if indicators.is_empty() {
    info!(category, "no indicators match this category");
    return Ok(IngestReport::default());
  }

  let mut report = IngestReport {
    indicators_matched: indicators.len(),
    ..IngestReport::default()
  };

  store.begin_pass().await.map_err(Error::store)?;
  let outcome: Result<()> = async {
    for indicator in &indicators {
      // Transport errors, bad statuses, and malformed bodies are
      // indicator-level: record the skip and keep going.
      let records = match client.observations(&indicator.code).await {
        Ok(records) => records,
        Err(e) => {
          warn!(indicator = %indicator.code, error = %e, "skipping indicator");
          report.skipped_indicators.push(SkippedIndicator {
            code:   indicator.code.clone(),
            reason: e.to_string(),
          });
          continue;
        }
      };

      debug!(
        indicator = %indicator.code,
        records   = records.len(),
        "fetched observations"
      );

      for record in &records {
        let Some(obs) = record.eligible() else {
          report.records_skipped += 1;
          continue;
        };

        let location_id = store
          .get_or_create(Dimension::Location, NaturalKey::Code(obs.spatial_code.to_owned()))
          .await
          .map_err(Error::store)?;
        let period_id = store
          .get_or_create(Dimension::Period, NaturalKey::Year(obs.year))
          .await
          .map_err(Error::store)?;

        // Only the three pre-seeded codes resolve; anything else stays a
        // null reference rather than minting a sex row.
        let sex_id = match obs.sex.and_then(SexCode::parse) {
          Some(sex) => Some(
            store
              .get_or_create(Dimension::Sex, NaturalKey::Code(sex.code().to_owned()))
              .await
              .map_err(Error::store)?,
          ),
          None => None,
        };

        store
          .insert_observation(NewObservation {
            indicator_id: indicator.indicator_id,
            location_id,
            period_id,
            sex_id,
            value: obs.value,
          })
          .await
          .map_err(Error::store)?;
        report.facts_inserted += 1;
      }

      report.indicators_ingested += 1;
    }
    Ok(())
  }
  .await;

  match commit_or_rollback(store, outcome).await {
    Ok(()) => {
      info!(
        category,
        indicators_matched = report.indicators_matched,
        indicators_ingested = report.indicators_ingested,
        indicators_skipped = report.skipped_indicators.len(),
        facts_inserted = report.facts_inserted,
        records_skipped = report.records_skipped,
        "fact pass committed"
      );
      Ok(report)
    }
    Err(e) => {
      error!(category, error = %e, "fact pass rolled back");
      Err(e)
    }
  }
}
