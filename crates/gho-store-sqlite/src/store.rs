//! [`SqliteStore`] — the SQLite implementation of [`StarStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use gho_core::{
  dimension::{Dimension, NaturalKey},
  indicator::{IndicatorRef, IndicatorRow},
  observation::{NewObservation, SexCode},
  store::{StarStore, TableCounts},
};

use crate::{
  encode::encode_key,
  schema::{PRAGMAS, SCHEMA},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A star-schema store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Opening
/// applies per-connection pragmas only; schema creation is a separate,
/// destructive step ([`StarStore::create_schema`]).
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store file at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_pragmas().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_pragmas().await?;
    Ok(store)
  }

  async fn init_pragmas(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StarStore impl ──────────────────────────────────────────────────────────

impl StarStore for SqliteStore {
  type Error = Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn create_schema(&self) -> Result<()> {
    self.execute_batch(SCHEMA).await
  }

  // ── Dimension registry ────────────────────────────────────────────────────

  async fn get_or_create(&self, dim: Dimension, key: NaturalKey) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        let select = format!(
          "SELECT {id} FROM {table} WHERE {key} = ?1",
          id    = dim.id_column(),
          table = dim.table(),
          key   = dim.key_column(),
        );
        let value = encode_key(&key);

        if let Some(id) = conn
          .query_row(&select, rusqlite::params![value], |row| row.get::<_, i64>(0))
          .optional()?
        {
          return Ok(id);
        }

        let insert = format!(
          "INSERT INTO {table} ({key}) VALUES (?1)",
          table = dim.table(),
          key   = dim.key_column(),
        );
        match conn.execute(&insert, rusqlite::params![value]) {
          Ok(_) => Ok(conn.last_insert_rowid()),
          // Lost a first-seen race to a concurrent writer from another
          // process: the unique index kept the row singular, so re-read
          // the winner's id instead of surfacing the violation.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(conn.query_row(&select, rusqlite::params![value], |row| row.get(0))?)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(id)
  }

  // ── Dimension seeding ─────────────────────────────────────────────────────

  async fn seed_sex(&self) -> Result<usize> {
    let inserted = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "INSERT OR IGNORE INTO dim_sex (sex_code, sex_name) VALUES (?1, ?2)",
        )?;
        let mut inserted = 0;
        for sex in SexCode::ALL {
          inserted += stmt.execute(rusqlite::params![sex.code(), sex.name()])?;
        }
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  async fn insert_indicators(&self, rows: Vec<IndicatorRow>) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "INSERT OR IGNORE INTO dim_indicators
             (indicator_code, indicator_name, category)
           VALUES (?1, ?2, ?3)",
        )?;
        let mut inserted = 0;
        for row in &rows {
          inserted +=
            stmt.execute(rusqlite::params![row.code, row.name, row.category])?;
        }
        Ok(inserted)
      })
      .await?;
    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn indicators_in_category<'a>(
    &'a self,
    category: &'a str,
  ) -> Result<Vec<IndicatorRef>> {
    let category = category.to_owned();
    let indicators = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT indicator_id, indicator_code
           FROM dim_indicators
           WHERE category = ?1
           ORDER BY indicator_code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![category], |row| {
            Ok(IndicatorRef {
              indicator_id: row.get(0)?,
              code:         row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(indicators)
  }

  async fn table_counts(&self) -> Result<TableCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
          })
        };
        Ok(TableCounts {
          indicators:   count("dim_indicators")?,
          locations:    count("dim_locations")?,
          periods:      count("dim_periods")?,
          sexes:        count("dim_sex")?,
          observations: count("fact_observations")?,
        })
      })
      .await?;
    Ok(counts)
  }

  // ── Facts — append-only writes ────────────────────────────────────────────

  async fn insert_observation(&self, obs: NewObservation) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO fact_observations
             (indicator_id, location_id, period_id, sex_id, value)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            obs.indicator_id,
            obs.location_id,
            obs.period_id,
            obs.sex_id,
            obs.value,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  // ── Enrichment ────────────────────────────────────────────────────────────

  async fn update_location_names(
    &self,
    names: Vec<(String, String)>,
  ) -> Result<usize> {
    let updated = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "UPDATE dim_locations
           SET country_name = ?2
           WHERE country_code = ?1
             AND (country_name IS NULL OR country_name = '')",
        )?;
        let mut updated = 0;
        for (code, name) in &names {
          updated += stmt.execute(rusqlite::params![code, name])?;
        }
        Ok(updated)
      })
      .await?;
    Ok(updated)
  }

  // ── Pass boundaries ───────────────────────────────────────────────────────

  async fn begin_pass(&self) -> Result<()> {
    // IMMEDIATE takes the write lock up front, so a pass that will write
    // fails early rather than on its first insert.
    self.execute_batch("BEGIN IMMEDIATE").await
  }

  async fn commit_pass(&self) -> Result<()> {
    self.execute_batch("COMMIT").await
  }

  async fn rollback_pass(&self) -> Result<()> {
    self.execute_batch("ROLLBACK").await
  }
}
