//! Detail-page fetching.
//!
//! One HTTP GET per identifier against the portal's detail URL, with the
//! API number passed as the `api` query parameter. The portal is a plain
//! ASP.NET page, not an API, so the client carries a browser User-Agent,
//! a per-request timeout, and a small bounded retry.

use std::time::Duration;

use derrick_config::ScraperConfig;

/// Pause between retry attempts for one identifier.
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// HTTP client for the portal's well-details page.
pub struct WellFetcher {
    client: reqwest::Client,
    detail_url: String,
    retry_attempts: u32,
}

impl WellFetcher {
    /// Builds a fetcher from scraper configuration.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error when the client cannot be
    /// constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            detail_url: config.detail_url.clone(),
            retry_attempts: config.retry_attempts.max(1),
        })
    }

    /// Fetches the detail page for one API number, retrying transient
    /// failures up to the configured attempt count.
    ///
    /// # Errors
    ///
    /// Returns the last fetch error once every attempt has failed. A non-2xx
    /// response counts as a failure.
    pub async fn fetch(&self, api_number: &str) -> Result<String, reqwest::Error> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_fetch(api_number).await {
                Ok(body) => {
                    tracing::debug!(api_number, attempt, "fetched detail page");
                    return Ok(body);
                }
                Err(e) if attempt < self.retry_attempts => {
                    tracing::warn!(
                        api_number,
                        attempt,
                        error = %e,
                        "fetch attempt failed, retrying"
                    );
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_fetch(&self, api_number: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(&self.detail_url)
            .query(&[("api", api_number)])
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(url: &str) -> ScraperConfig {
        let mut config = ScraperConfig::default();
        config.detail_url = url.to_string();
        config.request_timeout_secs = 1;
        config.retry_attempts = 2;
        config
    }

    #[test]
    fn test_builds_from_config() {
        assert!(WellFetcher::new(&config_for("http://127.0.0.1:9/details")).is_ok());
    }

    #[test]
    fn test_zero_retries_clamps_to_one() {
        let mut config = config_for("http://127.0.0.1:9/details");
        config.retry_attempts = 0;
        let fetcher = WellFetcher::new(&config).unwrap();
        assert_eq!(fetcher.retry_attempts, 1);
    }

    #[tokio::test]
    async fn test_unreachable_portal_errors_after_retries() {
        // Nothing listens on the discard port; every attempt is refused.
        let fetcher = WellFetcher::new(&config_for("http://127.0.0.1:9/details")).unwrap();
        let result = fetcher.fetch("3012345678").await;
        assert!(result.is_err());
    }
}
