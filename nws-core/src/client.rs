use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// The NWS API serves GeoJSON bodies.
const ACCEPT_GEO_JSON: &str = "application/geo+json";

/// Why a single upstream request failed.
///
/// Every variant collapses to a fixed user-facing string inside the
/// pipelines; the distinction exists so failures can be logged with
/// their actual cause instead of being swallowed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seam over "GET a URL, get JSON back".
///
/// The pipelines only depend on this trait, so tests can script
/// responses without a network and callers can swap the transport.
#[async_trait]
pub trait NwsFetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// HTTP client against the National Weather Service API.
///
/// Holds one `reqwest::Client` carrying the declared `User-Agent`, the
/// GeoJSON accept header, and the configured request timeout. The inner
/// client is internally reference-counted, so sharing one `NwsClient`
/// across concurrent tool calls is fine.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
}

impl NwsClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_GEO_JSON));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl NwsFetch for NwsClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Fetch `url` and decode the JSON body into `T`.
///
/// Transport, status, and shape problems all come back as one
/// [`FetchError`]; callers decide what the absence means.
pub async fn fetch_decoded<T: DeserializeOwned>(
    fetch: &dyn NwsFetch,
    url: &str,
) -> Result<T, FetchError> {
    let value = fetch.get_json(url).await?;
    Ok(serde_json::from_value(value)?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Back up to a char boundary so multibyte text can't panic the slice.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// Scripted fetcher: per-URL canned bodies and forced failures.
    pub(crate) struct MockFetch {
        responses: HashMap<String, Value>,
        failures: HashSet<String>,
    }

    impl MockFetch {
        pub(crate) fn new() -> Self {
            Self { responses: HashMap::new(), failures: HashSet::new() }
        }

        pub(crate) fn ok(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }

        pub(crate) fn fail(mut self, url: &str) -> Self {
            self.failures.insert(url.to_string());
            self
        }
    }

    #[async_trait]
    impl NwsFetch for MockFetch {
        async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
            if self.failures.contains(url) {
                return Err(FetchError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: "upstream failure".to_string(),
                });
            }

            self.responses.get(url).cloned().ok_or(FetchError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockFetch;
    use super::*;
    use serde_json::json;

    #[test]
    fn truncate_body_leaves_short_bodies_alone() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_cuts_long_bodies() {
        let long = "x".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // 100 euro signs: 300 bytes, and byte 200 falls inside a char.
        let long = "\u{20ac}".repeat(100);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.trim_end_matches("..."), "\u{20ac}".repeat(66));
    }

    #[test]
    fn client_builds_from_default_config() {
        let cfg = Config::default();
        assert!(NwsClient::new(&cfg).is_ok());
    }

    #[test]
    fn status_error_mentions_status_code() {
        let err = FetchError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "down".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn fetch_decoded_propagates_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            count: u32,
        }

        let fetch = MockFetch::new().ok("https://nws.test/thing", json!({"count": "nope"}));
        let result: Result<Expected, _> = fetch_decoded(&fetch, "https://nws.test/thing").await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn mock_fetch_fails_where_scripted() {
        let fetch = MockFetch::new().fail("https://nws.test/broken");
        let result = fetch.get_json("https://nws.test/broken").await;
        assert!(matches!(result, Err(FetchError::Status { .. })));
    }
}
