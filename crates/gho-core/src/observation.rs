//! Fact-row and sex-code types.

/// The three sex codes the store pre-seeds.
///
/// The sex dimension is static: observation records carrying any other code
/// resolve to a null sex reference instead of creating a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexCode {
  Male,
  Female,
  BothSexes,
}

impl SexCode {
  pub const ALL: [SexCode; 3] =
    [SexCode::Male, SexCode::Female, SexCode::BothSexes];

  /// The natural key stored in `dim_sex.sex_code`.
  pub fn code(self) -> &'static str {
    match self {
      SexCode::Male      => "MLE",
      SexCode::Female    => "FMLE",
      SexCode::BothSexes => "BTSX",
    }
  }

  /// Human-readable name stored in `dim_sex.sex_name`.
  pub fn name(self) -> &'static str {
    match self {
      SexCode::Male      => "Male",
      SexCode::Female    => "Female",
      SexCode::BothSexes => "Both sexes",
    }
  }

  /// Parse a raw API dimension value, tolerating the `SEX_` prefix the GHO
  /// API puts on its `Dim1` values. Unknown codes yield `None`.
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.strip_prefix("SEX_").unwrap_or(raw) {
      "MLE"  => Some(SexCode::Male),
      "FMLE" => Some(SexCode::Female),
      "BTSX" => Some(SexCode::BothSexes),
      _      => None,
    }
  }
}

/// A fact row ready for insertion — every foreign key already resolved
/// through the dimension registry, never forged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewObservation {
  pub indicator_id: i64,
  pub location_id:  i64,
  pub period_id:    i64,
  /// Null when the source record omits sex or carries an unknown code.
  pub sex_id:       Option<i64>,
  pub value:        f64,
}
