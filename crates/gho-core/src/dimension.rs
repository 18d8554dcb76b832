//! Dimension vocabulary for the get-or-create registry.
//!
//! Each dimension knows its own table and natural-key column, so callers
//! never pass table or column names as strings. Key values always bind as
//! query parameters.

use std::fmt;

/// A dimension table reachable through the lookup-or-create registry.
///
/// `Indicator` rows are bulk-loaded from the reference dataset and are not
/// resolved through the registry, so they are absent here on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
  Location,
  Period,
  Sex,
}

impl Dimension {
  pub fn table(self) -> &'static str {
    match self {
      Dimension::Location => "dim_locations",
      Dimension::Period   => "dim_periods",
      Dimension::Sex      => "dim_sex",
    }
  }

  pub fn id_column(self) -> &'static str {
    match self {
      Dimension::Location => "location_id",
      Dimension::Period   => "period_id",
      Dimension::Sex      => "sex_id",
    }
  }

  pub fn key_column(self) -> &'static str {
    match self {
      Dimension::Location => "country_code",
      Dimension::Period   => "year",
      Dimension::Sex      => "sex_code",
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}

/// A natural business key identifying one dimension row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NaturalKey {
  /// Textual code — an ISO-3166 alpha-3 country code or a sex code.
  Code(String),
  /// A calendar year.
  Year(i64),
}

impl fmt::Display for NaturalKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NaturalKey::Code(c) => f.write_str(c),
      NaturalKey::Year(y) => write!(f, "{y}"),
    }
  }
}

impl From<&str> for NaturalKey {
  fn from(code: &str) -> Self {
    NaturalKey::Code(code.to_owned())
  }
}

impl From<i64> for NaturalKey {
  fn from(year: i64) -> Self {
    NaturalKey::Year(year)
  }
}
