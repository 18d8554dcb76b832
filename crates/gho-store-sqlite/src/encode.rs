//! Conversions between core key types and SQLite values.

use gho_core::dimension::NaturalKey;
use rusqlite::types::Value;

/// Bind a natural key as a typed SQLite value, preserving the integer
/// affinity of `dim_periods.year`.
pub fn encode_key(key: &NaturalKey) -> Value {
  match key {
    NaturalKey::Code(code) => Value::Text(code.clone()),
    NaturalKey::Year(year) => Value::Integer(*year),
  }
}
