//! SQL schema for the GHO star-schema store.
//!
//! Executed by [`SqliteStore::create_schema`](crate::SqliteStore) as one
//! batch. Destructive on purpose: the pipeline's schema step always starts
//! from a clean slate, so pre-existing tables of the same names are dropped
//! first — fact table before the dimensions it references.

/// Full schema DDL: four dimension tables plus the fact table.
pub const SCHEMA: &str = "
DROP TABLE IF EXISTS fact_observations;
DROP TABLE IF EXISTS dim_indicators;
DROP TABLE IF EXISTS dim_locations;
DROP TABLE IF EXISTS dim_periods;
DROP TABLE IF EXISTS dim_sex;

CREATE TABLE dim_indicators (
    indicator_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    indicator_code TEXT NOT NULL UNIQUE,
    indicator_name TEXT,
    category       TEXT
);

CREATE TABLE dim_locations (
    location_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    country_code TEXT NOT NULL UNIQUE,   -- ISO-3166 alpha-3
    country_name TEXT                    -- backfilled by enrichment
);

CREATE TABLE dim_periods (
    period_id INTEGER PRIMARY KEY AUTOINCREMENT,
    year      INTEGER NOT NULL UNIQUE
);

CREATE TABLE dim_sex (
    sex_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    sex_code TEXT NOT NULL UNIQUE,       -- 'MLE' | 'FMLE' | 'BTSX'
    sex_name TEXT
);

-- Facts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE fact_observations (
    observation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    indicator_id   INTEGER NOT NULL REFERENCES dim_indicators (indicator_id),
    location_id    INTEGER NOT NULL REFERENCES dim_locations (location_id),
    period_id      INTEGER NOT NULL REFERENCES dim_periods (period_id),
    sex_id         INTEGER REFERENCES dim_sex (sex_id),
    value          REAL NOT NULL
);
";

/// Per-connection pragmas, applied at open time rather than schema time.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";
