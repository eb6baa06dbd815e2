//! KOLBR API client
//!
//! Talks to the remote trade source: the recent-trades feed and the analyst.
//! Every failure is converted to a [`KolbrError`] here, at its origin.

use std::time::Duration;

use async_trait::async_trait;
use kolbr_core::{AnalysisRequest, KolbrError, KolbrResult, Verdict};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{McpError, Result};

/// Remote collaborator that serves trades and verdicts
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Up to `limit` recent feed entries, newest first. Entries are left
    /// undecoded so one malformed trade does not sink the whole feed.
    async fn recent_trades(&self, limit: usize) -> KolbrResult<Vec<Value>>;

    /// Submit a request to the analyst. `Ok(None)` when it answers `null`.
    async fn analyze(&self, request: &AnalysisRequest) -> KolbrResult<Option<Verdict>>;

    async fn health(&self) -> KolbrResult<Value>;
}

#[derive(Debug, Deserialize)]
struct RecentTradesResponse {
    #[serde(default)]
    trades: Option<Vec<Value>>,
}

/// HTTP client for the KOLBR API
pub struct KolbrClient {
    client: Client,
    base_url: String,
    fetch_timeout: Duration,
    analyze_timeout: Duration,
}

impl KolbrClient {
    /// Create a new client. Timeouts are applied per request.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| McpError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_seconds),
            analyze_timeout: Duration::from_secs(config.analyze_timeout_seconds),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TradeSource for KolbrClient {
    async fn recent_trades(&self, limit: usize) -> KolbrResult<Vec<Value>> {
        let url = format!("{}/api/trades/recent", self.base_url);
        tracing::debug!(url = %url, limit, "Fetching recent trades");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let body: RecentTradesResponse = check_status(response)?
            .json()
            .await
            .map_err(transport_error)?;

        let trades = body.trades.unwrap_or_default();
        tracing::debug!(count = trades.len(), "Recent trades received");
        Ok(trades)
    }

    async fn analyze(&self, request: &AnalysisRequest) -> KolbrResult<Option<Verdict>> {
        let url = format!("{}/api/analyze", self.base_url);
        tracing::debug!(url = %url, ca = %request.token.ca, trade_type = %request.trade_type, "Submitting analysis");

        let response = self
            .client
            .post(&url)
            .json(request)
            .timeout(self.analyze_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response)?
            .json()
            .await
            .map_err(transport_error)
    }

    async fn health(&self) -> KolbrResult<Value> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response)?
            .json()
            .await
            .map_err(transport_error)
    }
}

fn check_status(response: Response) -> KolbrResult<Response> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "KOLBR API returned an error status");
        return Err(KolbrError::Remote {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn transport_error(e: reqwest::Error) -> KolbrError {
    tracing::warn!(error = %e, timeout = e.is_timeout(), "KOLBR API request failed");
    KolbrError::Transport(e.to_string())
}
