//! Integration tests for `SqliteStore` against an in-memory database.

use gho_core::{
  dimension::{Dimension, NaturalKey},
  indicator::IndicatorRow,
  observation::NewObservation,
  store::StarStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.expect("in-memory store");
  s.create_schema().await.expect("schema");
  s
}

fn indicator(code: &str, category: &str) -> IndicatorRow {
  IndicatorRow {
    code:     code.into(),
    name:     Some(format!("{code} (name)")),
    category: Some(category.into()),
  }
}

// ─── Dimension registry ──────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_inserts_then_reuses() {
  let s = store().await;

  let first = s
    .get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  let second = s
    .get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();

  assert_eq!(first, second);
  assert_eq!(s.table_counts().await.unwrap().locations, 1);
}

#[tokio::test]
async fn get_or_create_distinct_keys_get_distinct_ids() {
  let s = store().await;

  let bra = s
    .get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  let arg = s
    .get_or_create(Dimension::Location, NaturalKey::Code("ARG".into()))
    .await
    .unwrap();

  assert_ne!(bra, arg);
  assert_eq!(s.table_counts().await.unwrap().locations, 2);
}

#[tokio::test]
async fn get_or_create_period_keys_are_integers() {
  let s = store().await;

  let y2020 = s
    .get_or_create(Dimension::Period, NaturalKey::Year(2020))
    .await
    .unwrap();
  let again = s
    .get_or_create(Dimension::Period, NaturalKey::Year(2020))
    .await
    .unwrap();
  let y2021 = s
    .get_or_create(Dimension::Period, NaturalKey::Year(2021))
    .await
    .unwrap();

  assert_eq!(y2020, again);
  assert_ne!(y2020, y2021);
  assert_eq!(s.table_counts().await.unwrap().periods, 2);
}

#[tokio::test]
async fn natural_keys_stay_unique_across_many_calls() {
  let s = store().await;

  for _ in 0..10 {
    s.get_or_create(Dimension::Location, NaturalKey::Code("KEN".into()))
      .await
      .unwrap();
  }

  let unique: i64 = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(DISTINCT country_code) FROM dim_locations",
        [],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(unique, 1);
  assert_eq!(s.table_counts().await.unwrap().locations, 1);
}

// ─── Sex seeding ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_sex_inserts_three_rows_once() {
  let s = store().await;

  assert_eq!(s.seed_sex().await.unwrap(), 3);
  // Re-seeding is a no-op.
  assert_eq!(s.seed_sex().await.unwrap(), 0);
  assert_eq!(s.table_counts().await.unwrap().sexes, 3);
}

#[tokio::test]
async fn seeded_sex_codes_resolve_without_new_rows() {
  let s = store().await;
  s.seed_sex().await.unwrap();

  let id = s
    .get_or_create(Dimension::Sex, NaturalKey::Code("MLE".into()))
    .await
    .unwrap();
  assert!(id > 0);
  assert_eq!(s.table_counts().await.unwrap().sexes, 3);
}

// ─── Indicator loading ───────────────────────────────────────────────────────

#[tokio::test]
async fn insert_indicators_ignores_existing_codes() {
  let s = store().await;

  let inserted = s
    .insert_indicators(vec![
      indicator("AIR_1", "AIR"),
      indicator("AIR_2", "AIR"),
    ])
    .await
    .unwrap();
  assert_eq!(inserted, 2);

  // Second load with one duplicate and one new row.
  let inserted = s
    .insert_indicators(vec![
      indicator("AIR_1", "AIR"),
      indicator("NCD_1", "NCD"),
    ])
    .await
    .unwrap();
  assert_eq!(inserted, 1);
  assert_eq!(s.table_counts().await.unwrap().indicators, 3);
}

#[tokio::test]
async fn insert_indicators_first_write_wins() {
  let s = store().await;

  s.insert_indicators(vec![indicator("AIR_1", "AIR")])
    .await
    .unwrap();
  // A later load with a different category must not overwrite.
  s.insert_indicators(vec![indicator("AIR_1", "RENAMED")])
    .await
    .unwrap();

  let in_air = s.indicators_in_category("AIR").await.unwrap();
  assert_eq!(in_air.len(), 1);
  assert_eq!(in_air[0].code, "AIR_1");
  assert!(s.indicators_in_category("RENAMED").await.unwrap().is_empty());
}

#[tokio::test]
async fn indicators_in_category_orders_by_code() {
  let s = store().await;

  s.insert_indicators(vec![
    indicator("B_2", "TEST"),
    indicator("A_1", "TEST"),
    indicator("C_3", "OTHER"),
  ])
  .await
  .unwrap();

  let codes: Vec<_> = s
    .indicators_in_category("TEST")
    .await
    .unwrap()
    .into_iter()
    .map(|i| i.code)
    .collect();
  assert_eq!(codes, ["A_1", "B_2"]);
}

#[tokio::test]
async fn unmatched_category_yields_empty_list() {
  let s = store().await;
  assert!(s.indicators_in_category("NOPE").await.unwrap().is_empty());
}

// ─── Fact insertion ──────────────────────────────────────────────────────────

async fn resolved_observation(s: &SqliteStore, sex: Option<&str>) -> NewObservation {
  s.insert_indicators(vec![indicator("AIR_1", "AIR")])
    .await
    .unwrap();
  let indicator_id = s.indicators_in_category("AIR").await.unwrap()[0].indicator_id;
  let location_id = s
    .get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  let period_id = s
    .get_or_create(Dimension::Period, NaturalKey::Year(2020))
    .await
    .unwrap();
  let sex_id = match sex {
    Some(code) => Some(
      s.get_or_create(Dimension::Sex, NaturalKey::Code(code.into()))
        .await
        .unwrap(),
    ),
    None => None,
  };
  NewObservation { indicator_id, location_id, period_id, sex_id, value: 1.5 }
}

#[tokio::test]
async fn insert_observation_with_sex() {
  let s = store().await;
  s.seed_sex().await.unwrap();

  let obs = resolved_observation(&s, Some("MLE")).await;
  let id = s.insert_observation(obs).await.unwrap();
  assert!(id > 0);
  assert_eq!(s.table_counts().await.unwrap().observations, 1);
}

#[tokio::test]
async fn insert_observation_stores_null_sex() {
  let s = store().await;
  s.seed_sex().await.unwrap();

  let obs = resolved_observation(&s, None).await;
  let id = s.insert_observation(obs).await.unwrap();

  let sex_id: Option<i64> = s
    .conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT sex_id FROM fact_observations WHERE observation_id = ?1",
        rusqlite::params![id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(sex_id, None);
}

#[tokio::test]
async fn forged_foreign_keys_are_rejected() {
  let s = store().await;

  let err = s
    .insert_observation(NewObservation {
      indicator_id: 999,
      location_id:  999,
      period_id:    999,
      sex_id:       None,
      value:        0.0,
    })
    .await;
  assert!(err.is_err());
}

// ─── Enrichment ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_location_names_fills_only_empty_names() {
  let s = store().await;

  s.get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  s.get_or_create(Dimension::Location, NaturalKey::Code("ARG".into()))
    .await
    .unwrap();

  let updated = s
    .update_location_names(vec![("BRA".into(), "Brazil".into())])
    .await
    .unwrap();
  assert_eq!(updated, 1);

  // A second enrichment pass must not touch the already-named row.
  let updated = s
    .update_location_names(vec![
      ("BRA".into(), "Federative Republic of Brazil".into()),
      ("ARG".into(), "Argentina".into()),
    ])
    .await
    .unwrap();
  assert_eq!(updated, 1);

  let name: Option<String> = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT country_name FROM dim_locations WHERE country_code = 'BRA'",
        [],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(name.as_deref(), Some("Brazil"));
}

#[tokio::test]
async fn update_location_names_ignores_unknown_codes() {
  let s = store().await;

  let updated = s
    .update_location_names(vec![("XXX".into(), "Nowhere".into())])
    .await
    .unwrap();
  assert_eq!(updated, 0);
}

// ─── Pass boundaries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn rollback_discards_uncommitted_pass() {
  let s = store().await;

  s.begin_pass().await.unwrap();
  s.get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  s.rollback_pass().await.unwrap();

  assert_eq!(s.table_counts().await.unwrap().locations, 0);
}

#[tokio::test]
async fn commit_persists_pass() {
  let s = store().await;

  s.begin_pass().await.unwrap();
  s.get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();
  s.commit_pass().await.unwrap();

  assert_eq!(s.table_counts().await.unwrap().locations, 1);
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_schema_discards_existing_data() {
  let s = store().await;

  s.seed_sex().await.unwrap();
  s.get_or_create(Dimension::Location, NaturalKey::Code("BRA".into()))
    .await
    .unwrap();

  s.create_schema().await.unwrap();

  let counts = s.table_counts().await.unwrap();
  assert_eq!(counts.sexes, 0);
  assert_eq!(counts.locations, 0);
  assert_eq!(counts.observations, 0);
}
