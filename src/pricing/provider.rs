use std::time::Duration;

use tracing::warn;

use crate::error::PricingError;

use super::catalog::RawCatalog;

pub(super) const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/main/model_prices_and_context_window.json";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const FETCH_RETRIES: usize = 3;
const RETRY_BACKOFF_MS: u64 = 250;

/// Download the raw pricing catalog. Retries transient failures with a
/// linear backoff; the last error is returned when all attempts fail.
pub(super) async fn fetch_catalog_raw(url: &str) -> Result<RawCatalog, PricingError> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

    let mut last_err = match try_fetch(&client, url).await {
        Ok(raw) => return Ok(raw),
        Err(err) => err,
    };

    for attempt in 1..FETCH_RETRIES {
        warn!("catalog fetch failed, retrying: {last_err}");
        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64)).await;
        match try_fetch(&client, url).await {
            Ok(raw) => return Ok(raw),
            Err(err) => last_err = err,
        }
    }

    Err(last_err)
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<RawCatalog, PricingError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.json().await?)
}
