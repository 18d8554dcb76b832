//! Async HTTP client for the WHO GHO OData API.
//!
//! One request per indicator: `GET {base_url}/{indicator_code}` returns a
//! JSON body whose `value` array holds the observation records. Any
//! transport error, non-success status, or malformed body surfaces as an
//! [`Error`] the caller treats as an indicator-level failure.

pub mod error;
pub mod records;

pub use error::{Error, Result};
pub use records::{ObservationPage, ObservationRecord};

use std::time::Duration;

use reqwest::Client;

/// Connection settings for the GHO API.
///
/// No defaults here: the base URL and timeout are supplied by the outermost
/// entry point's configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// Async HTTP client for the GHO per-indicator endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GhoClient {
  client: Client,
  config: ClientConfig,
}

impl GhoClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn indicator_url(&self, indicator_code: &str) -> String {
    format!(
      "{}/{indicator_code}",
      self.config.base_url.trim_end_matches('/'),
    )
  }

  /// `GET {base_url}/{indicator_code}` — all observation records for one
  /// indicator.
  pub async fn observations(
    &self,
    indicator_code: &str,
  ) -> Result<Vec<ObservationRecord>> {
    let url = self.indicator_url(indicator_code);
    let resp = self.client.get(&url).send().await?;

    if !resp.status().is_success() {
      return Err(Error::Status { url, status: resp.status() });
    }

    let page: ObservationPage = resp.json().await?;
    Ok(page.value)
  }

  /// Fetch a text body from an absolute URL — used for the country-codes
  /// CSV consumed by location enrichment.
  pub async fn fetch_text(&self, url: &str) -> Result<String> {
    let resp = self.client.get(url).send().await?;

    if !resp.status().is_success() {
      return Err(Error::Status { url: url.to_owned(), status: resp.status() });
    }

    Ok(resp.text().await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn client(base_url: &str) -> GhoClient {
    GhoClient::new(ClientConfig {
      base_url: base_url.to_owned(),
      timeout:  Duration::from_secs(5),
    })
    .unwrap()
  }

  #[test]
  fn indicator_url_joins_code() {
    let c = client("https://ghoapi.azureedge.net/api");
    assert_eq!(
      c.indicator_url("WHOSIS_000001"),
      "https://ghoapi.azureedge.net/api/WHOSIS_000001"
    );
  }

  #[test]
  fn indicator_url_tolerates_trailing_slash() {
    let c = client("http://localhost:9999/api/");
    assert_eq!(c.indicator_url("AIR_1"), "http://localhost:9999/api/AIR_1");
  }
}
