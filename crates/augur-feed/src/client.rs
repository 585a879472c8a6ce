//! HTTP client for the world API.
//!
//! Every request carries a User-Agent naming the operator, as the API's
//! usage policy requires, and request starts are spaced at least
//! `min_request_interval_ms` apart to stay under the published rate limit.

use std::collections::BTreeSet;
use std::time::Duration;

use augur_core::config::ApiConfig;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::api::NationStatesApi;
use crate::documents::{parse_nation_region, parse_region_list};
use crate::error::FeedError;
use crate::happenings::{FeedEntry, parse_happenings};

const HAPPENINGS_QUERY: &str = "q=happenings;filter=change";
const FOUNDERLESS_QUERY: &str = "q=regionsbytag;tags=founderless,-password";

/// Build the User-Agent string sent with every request.
pub fn user_agent(operator: &str) -> String {
    format!(
        "Augur/{} (operator: {})",
        env!("CARGO_PKG_VERSION"),
        operator.trim()
    )
}

/// Turn a nation name or identifier into its API identifier.
fn nation_id(nation: &str) -> String {
    nation.trim().to_lowercase().replace(' ', "_")
}

/// Spaces out request starts by a fixed minimum interval.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Create a throttle allowing one request start per `min_interval`.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::const_new(None),
        }
    }

    /// Wait until the next request may start, and claim that slot.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(ready_at) = last.and_then(|prev| prev.checked_add(self.min_interval)) {
            tokio::time::sleep_until(ready_at).await;
        }
        *last = Some(Instant::now());
    }
}

/// [`NationStatesApi`] over HTTP.
#[derive(Debug)]
pub struct NsClient {
    http: reqwest::Client,
    base_url: String,
    throttle: Throttle,
}

impl NsClient {
    /// Create a client for the configured API on behalf of `operator`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, operator: &str) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent(operator))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| FeedError::Client {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('?').to_owned(),
            throttle: Throttle::new(Duration::from_millis(config.min_request_interval_ms)),
        })
    }

    /// Full request URL for a raw query string.
    fn url(&self, query: &str) -> String {
        format!("{}?{query}", self.base_url)
    }

    /// Issue one throttled GET and return the body text.
    async fn get(&self, query: &str) -> Result<String, FeedError> {
        let url = self.url(query);
        self.throttle.acquire().await;
        debug!(url = %url, "API request");

        let response = self.http.get(&url).send().await.map_err(|e| FeedError::Transient {
            message: format!("request to {url} failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                endpoint: query.to_owned(),
            });
        }

        response.text().await.map_err(|e| FeedError::Transient {
            message: format!("reading response from {url} failed: {e}"),
        })
    }
}

impl NationStatesApi for NsClient {
    async fn happenings(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let body = self.get(HAPPENINGS_QUERY).await?;
        parse_happenings(&body)
    }

    async fn nation_region(&self, nation: &str) -> Result<String, FeedError> {
        let body = self
            .get(&format!("nation={}&q=region", nation_id(nation)))
            .await?;
        parse_nation_region(&body)
    }

    async fn founderless_regions(&self) -> Result<BTreeSet<String>, FeedError> {
        let body = self.get(FOUNDERLESS_QUERY).await?;
        parse_region_list(&body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_operator() {
        let ua = user_agent("  Testlandia ");
        assert!(ua.starts_with("Augur/"));
        assert!(ua.ends_with("(operator: Testlandia)"));
    }

    #[test]
    fn nation_ids() {
        assert_eq!(nation_id("Beta Land"), "beta_land");
        assert_eq!(nation_id("gamma"), "gamma");
    }

    #[test]
    fn builds_urls_from_base() {
        let config = ApiConfig {
            base_url: "https://example.test/api.cgi?".to_owned(),
            ..ApiConfig::default()
        };
        let client = NsClient::new(&config, "Testlandia").unwrap();
        assert_eq!(
            client.url(HAPPENINGS_QUERY),
            "https://example.test/api.cgi?q=happenings;filter=change"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_spaces_request_starts() {
        let throttle = Throttle::new(Duration::from_millis(650));
        let start = Instant::now();

        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        throttle.acquire().await;
        throttle.acquire().await;
        assert_eq!(start.elapsed(), Duration::from_millis(1300));
    }
}
