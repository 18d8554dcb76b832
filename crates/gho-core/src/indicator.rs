//! Indicator reference types.
//!
//! Indicators are the one dimension that is bulk-loaded up front (from the
//! curated reference dataset) instead of lazily created during ingestion.

/// One validated row of the indicator reference dataset.
///
/// `code` is the natural key and is always present — rows without it are
/// rejected by the reference loader before they reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRow {
  pub code:     String,
  pub name:     Option<String>,
  pub category: Option<String>,
}

/// An indicator already present in the dimension, as selected for a
/// fact-ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRef {
  pub indicator_id: i64,
  pub code:         String,
}
