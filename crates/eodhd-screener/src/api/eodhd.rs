//! EODHD REST API client

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::api::types::{IndicatorQuery, ScreenRequest, ScreenerResponse, ScreenerRow};
use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};
use crate::gateway::MarketDataGateway;

/// EODHD API client
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct EodhdClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl EodhdClient {
    /// Create a new client with an explicit API key
    pub fn new(api_key: impl Into<String>, config: &ScreenerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: api_key.into(),
        })
    }

    /// Create a client using the configured API key
    pub fn from_config(config: &ScreenerConfig) -> Result<Self> {
        let api_key = config.resolve_api_key(None)?;
        Self::new(api_key, config)
    }

    /// Derive a client that authenticates with a different key
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            api_key: api_key.into(),
        }
    }

    /// `{base_url}/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ScreenerError::ConfigError(format!("invalid base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                ScreenerError::ConfigError("base_url cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint and decode the JSON body
    async fn get_json(
        &self,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url.path());

        let response = self
            .client
            .get(url)
            .query(&[("api_token", self.api_key.as_str()), ("fmt", "json")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScreenerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MarketDataGateway for EodhdClient {
    async fn screen(&self, request: &ScreenRequest) -> Result<Vec<ScreenerRow>> {
        let params = request.query_params()?;
        let data = self.get_json(&["screener"], &params).await?;
        let response: ScreenerResponse = serde_json::from_value(data)?;

        debug!("Screener returned {} rows", response.data.len());
        Ok(response.data)
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Value> {
        self.get_json(&["fundamentals", symbol], &[]).await
    }

    async fn indicator(&self, symbol: &str, query: &IndicatorQuery) -> Result<Value> {
        let today = chrono::Utc::now().date_naive();
        let params = query.query_params(today);
        self.get_json(&["technical", symbol], &params).await
    }
}
