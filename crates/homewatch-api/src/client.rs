//! Status API client — one GET per poll tick.
//!
//! Transport failures, non-200 answers, and "HTTP 200 but the body says
//! error" all become distinct error variants here. Retrying is the poll
//! loop's job, not this client's.

use async_trait::async_trait;
use homewatch_core::error::{HomewatchError, Result};
use homewatch_core::traits::StatusSource;

/// Keys the API uses to report an application-level failure inside an
/// otherwise successful response.
const UPSTREAM_ERROR_KEYS: [&str; 2] = ["code", "error"];

/// HTTP client for the homework status endpoint.
pub struct StatusClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl StatusClient {
    pub fn new(endpoint: &str, token: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("homewatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| HomewatchError::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch statuses at or after `from_date`. Returns the decoded JSON
    /// body; container shape is checked by [`crate::validate`].
    pub async fn fetch_statuses(&self, from_date: i64) -> Result<serde_json::Value> {
        tracing::debug!("fetching statuses (from_date={from_date})");
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date.to_string())])
            .send()
            .await
            .map_err(|e| HomewatchError::Transport {
                endpoint: self.endpoint.clone(),
                from_date,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(HomewatchError::NotOkStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
                from_date,
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| HomewatchError::Transport {
                    endpoint: self.endpoint.clone(),
                    from_date,
                    reason: format!("invalid JSON body: {e}"),
                })?;

        for key in UPSTREAM_ERROR_KEYS {
            if let Some(value) = body.get(key) {
                return Err(HomewatchError::UpstreamReported {
                    field: key.to_string(),
                    value: value.to_string(),
                    endpoint: self.endpoint.clone(),
                    from_date,
                });
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value> {
        self.fetch_statuses(from_date).await
    }
}
