//! Wire-format types for the GHO per-indicator endpoint.
//!
//! The API wraps observations in an OData envelope; only the `value` array
//! matters here. Records carry many more fields than we read — serde
//! ignores the rest.

use serde::Deserialize;

/// One page of the GHO response. A body without a `value` array is
/// malformed per the interface contract and fails deserialisation, which
/// callers treat as an indicator-level failure.
#[derive(Debug, Deserialize)]
pub struct ObservationPage {
  pub value: Vec<ObservationRecord>,
}

/// One raw observation record as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRecord {
  /// Spatial dimension code — an ISO-3166 alpha-3 country code.
  #[serde(rename = "SpatialDim")]
  pub spatial_dim:   Option<String>,
  /// Time dimension code — a calendar year.
  #[serde(rename = "TimeDim")]
  pub time_dim:      Option<i64>,
  /// First extra dimension; for most indicators this is a sex code like
  /// `SEX_MLE`.
  #[serde(rename = "Dim1")]
  pub dim1:          Option<String>,
  #[serde(rename = "NumericValue")]
  pub numeric_value: Option<f64>,
}

/// A record that passed the eligibility gate: both dimension codes present
/// and a numeric value to store.
#[derive(Debug, Clone, Copy)]
pub struct Eligible<'a> {
  pub spatial_code: &'a str,
  pub year:         i64,
  pub sex:          Option<&'a str>,
  pub value:        f64,
}

impl ObservationRecord {
  /// Spatial code, time code, and numeric value — all three or nothing.
  pub fn eligible(&self) -> Option<Eligible<'_>> {
    match (&self.spatial_dim, self.time_dim, self.numeric_value) {
      (Some(spatial), Some(year), Some(value)) => Some(Eligible {
        spatial_code: spatial,
        year,
        sex: self.dim1.as_deref(),
        value,
      }),
      _ => None,
    }
  }
}
