//! Error type for `gho-client`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport failure, timeout, or undecodable body.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} returned {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
