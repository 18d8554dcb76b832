//! The `StarStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `gho-store-sqlite`).
//! The population engine (`gho-pipeline`) depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  dimension::{Dimension, NaturalKey},
  indicator::{IndicatorRef, IndicatorRow},
  observation::NewObservation,
};

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Row counts per table, for pass-outcome logging and the `status` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
  pub indicators:   u64,
  pub locations:    u64,
  pub periods:      u64,
  pub sexes:        u64,
  pub observations: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the star-schema storage backend.
///
/// Dimension writes are idempotent registries keyed on natural business
/// codes; fact writes are append-only. Each population pass is bracketed by
/// [`begin_pass`](StarStore::begin_pass) and a single
/// [`commit_pass`](StarStore::commit_pass) on success, or
/// [`rollback_pass`](StarStore::rollback_pass) on any error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait StarStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Drop and recreate the four dimension tables and the fact table.
  ///
  /// Destructive by contract: calling this on a populated store discards
  /// all data. There is no partial-creation recovery — on failure the
  /// schema is undefined and the caller must re-invoke from a clean store.
  fn create_schema(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Dimension registry ────────────────────────────────────────────────

  /// Look up `key` in `dim`, inserting a new row (natural key only, other
  /// columns null) if none exists, and return the surrogate id.
  ///
  /// Sequential idempotence is the core guarantee: the first call for a
  /// given key creates exactly one row; every later call returns that same
  /// id without inserting.
  fn get_or_create(
    &self,
    dim: Dimension,
    key: NaturalKey,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Dimension seeding ─────────────────────────────────────────────────

  /// Insert the three static sex rows, ignoring any that already exist.
  /// Returns the number of rows actually inserted.
  fn seed_sex(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Bulk set-insertion into the indicator dimension: rows whose code
  /// already exists are ignored (first write wins, no overwrite of name or
  /// category). Returns the number of rows actually inserted.
  fn insert_indicators(
    &self,
    rows: Vec<IndicatorRow>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All indicators whose `category` matches, in code order. An unmatched
  /// category yields an empty list, not an error.
  fn indicators_in_category<'a>(
    &'a self,
    category: &'a str,
  ) -> impl Future<Output = Result<Vec<IndicatorRef>, Self::Error>> + Send + 'a;

  /// Row counts for the five tables.
  fn table_counts(
    &self,
  ) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;

  // ── Facts — append-only writes ────────────────────────────────────────

  /// Append one fact row. Returns its surrogate id.
  fn insert_observation(
    &self,
    obs: NewObservation,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Enrichment ────────────────────────────────────────────────────────

  /// Backfill `country_name` for locations where it is null or empty.
  /// Natural keys and surrogate ids are never touched. Takes
  /// `(country_code, country_name)` pairs; returns rows updated.
  fn update_location_names(
    &self,
    names: Vec<(String, String)>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Pass boundaries ───────────────────────────────────────────────────

  /// Open the transaction bracketing one population pass.
  fn begin_pass(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Commit the current pass. Called once, at the end of a successful pass.
  fn commit_pass(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Discard everything written since [`begin_pass`](StarStore::begin_pass).
  fn rollback_pass(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
