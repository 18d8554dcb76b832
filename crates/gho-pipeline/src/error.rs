//! Error type for `gho-pipeline`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A storage-layer failure. Fatal to the current pass: everything
  /// uncommitted is rolled back before this surfaces.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A fetch failure outside the per-indicator skip boundary (e.g. the
  /// country-codes download). Per-indicator fetch errors never surface
  /// here — they are folded into the ingest report instead.
  #[error("fetch error: {0}")]
  Fetch(#[from] gho_client::Error),

  #[error("cannot read reference file {path}: {source}")]
  ReferenceFile {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("malformed country-codes data: {0}")]
  CountryCsv(#[from] csv::Error),
}

impl Error {
  /// Wrap a backend error from the generic store.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
