//! Market data gateway abstraction
//!
//! The screening pipeline only sees this trait. [`crate::api::EodhdClient`]
//! is the HTTP implementation; tests substitute fakes.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::{IndicatorQuery, ScreenRequest, ScreenerRow};
use crate::error::Result;

/// The three provider queries the pipeline composes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Ranked and filtered candidates, in provider order
    async fn screen(&self, request: &ScreenRequest) -> Result<Vec<ScreenerRow>>;

    /// Nested fundamentals record for one symbol
    async fn fundamentals(&self, symbol: &str) -> Result<Value>;

    /// Indicator series for one symbol
    ///
    /// Usually a JSON array of observations; callers must tolerate any shape.
    async fn indicator(&self, symbol: &str, query: &IndicatorQuery) -> Result<Value>;
}
