//! Tool exposing the multi-stage screening pipeline

use async_trait::async_trait;
use eodhd_core::Result as ToolResult;
use eodhd_core::Tool;
use eodhd_core::schema;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::EodhdClient;
use crate::api::types::ScreenerFilter;
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::filters::{FundamentalsConstraintSet, TechnicalConstraint};
use crate::gateway::MarketDataGateway;
use crate::pipeline::{PipelineRequest, ScreeningPipeline};

/// Builds a gateway for a resolved API key
pub type GatewayFactory = Arc<dyn Fn(String) -> Arc<dyn MarketDataGateway> + Send + Sync>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiStageParams {
    api_key: Option<String>,
    screener_filters: Option<ScreenerFilter>,
    screener_sort: Option<String>,
    screener_limit: Option<u32>,
    fundamentals_filters: Option<FundamentalsConstraintSet>,
    technical_filters: Option<Vec<TechnicalConstraint>>,
    symbols: Option<Vec<String>>,
}

impl MultiStageParams {
    fn into_request(self) -> PipelineRequest {
        PipelineRequest {
            screener_filters: self.screener_filters.unwrap_or_default(),
            screener_sort: self.screener_sort,
            screener_limit: self.screener_limit,
            fundamentals: self.fundamentals_filters.unwrap_or_default(),
            technical: self.technical_filters.unwrap_or_default(),
            symbols: self.symbols.unwrap_or_default(),
        }
    }
}

/// Screen, then narrow by fundamentals, then by technical indicators
pub struct MultiStageScreenTool {
    config: Arc<ScreenerConfig>,
    connect: GatewayFactory,
}

impl MultiStageScreenTool {
    /// Create the tool backed by the EODHD REST API
    pub fn new(config: Arc<ScreenerConfig>) -> Result<Self> {
        // The key is replaced on every call.
        let base = EodhdClient::new(String::new(), &config)?;
        let connect: GatewayFactory = Arc::new(move |api_key: String| {
            Arc::new(base.with_api_key(api_key)) as Arc<dyn MarketDataGateway>
        });
        Ok(Self::with_gateway_factory(config, connect))
    }

    /// Create the tool with a custom gateway constructor
    pub fn with_gateway_factory(config: Arc<ScreenerConfig>, connect: GatewayFactory) -> Self {
        Self { config, connect }
    }

    async fn screen(&self, params: MultiStageParams) -> Result<Value> {
        let api_key = self.config.resolve_api_key(params.api_key.as_deref())?;
        let pipeline = ScreeningPipeline::new((self.connect)(api_key), self.config.clone());

        let result = pipeline.run(&params.into_request()).await?;
        Ok(result.to_report())
    }
}

#[async_trait]
impl Tool for MultiStageScreenTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: MultiStageParams = if params.is_null() {
            MultiStageParams::default()
        } else {
            serde_json::from_value(params)?
        };

        Ok(self.screen(params).await?)
    }

    fn name(&self) -> &str {
        "multi_stage_screen"
    }

    fn description(&self) -> &str {
        "Perform multi-stage screening: 1) Initial screen, 2) Filter by fundamentals, \
         3) Filter by technical indicators"
    }

    fn input_schema(&self) -> Value {
        let technical_filter = schema::object(
            json!({
                "indicator": schema::string(Some("Indicator name (e.g., 'rsi', 'sma')")),
                "period": schema::integer(Some("Period for indicator")),
                "condition": schema::enum_string(
                    &[">", "<", ">=", "<=", "="],
                    Some("Condition ('>', '<', '>=', '<=', '=')"),
                ),
                "value": schema::number(Some("Value to compare against")),
            }),
            &["indicator", "condition", "value"],
        );

        let bounds = schema::object(
            json!({
                "min": schema::number(Some("Inclusive lower bound")),
                "max": schema::number(Some("Inclusive upper bound")),
                "equals": json!({"description": "Exact value (number, string or boolean)"}),
            }),
            &[],
        );

        schema::object(
            json!({
                "apiKey": schema::string(Some(
                    "EODHD API key (optional if set via environment variable)",
                )),
                "screenerFilters": schema::array(
                    schema::array(json!({}), None),
                    Some("Initial screener filters (e.g., [['market_capitalization', '>', 1000000000]])"),
                ),
                "screenerSort": schema::string(Some(
                    "Sort field for screener (e.g., 'market_capitalization.desc')",
                )),
                "screenerLimit": schema::integer(Some("Limit for screener results (default: 100)")),
                "fundamentalsFilters": schema::map(
                    Some(bounds),
                    Some("Fundamental filters keyed by dotted field path \
                          (e.g., { 'Highlights.PERatio': { 'max': 30 } })"),
                ),
                "technicalFilters": schema::array(
                    technical_filter,
                    Some("Technical indicator filters, applied in order"),
                ),
                "symbols": schema::array(
                    schema::string(None),
                    Some("Optional: specific symbols to analyze (bypasses screener)"),
                ),
            }),
            &[],
        )
    }
}
