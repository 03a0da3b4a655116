//! Request and response types for the EODHD screener, fundamentals and
//! technical endpoints

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shortest default lookback for indicator queries, in days
pub const MIN_LOOKBACK_DAYS: i64 = 30;

/// Longest default lookback for indicator queries, in days
pub const MAX_LOOKBACK_DAYS: i64 = 365;

/// One screener condition, serialized as `[field, operation, value]`
///
/// The provider interprets the triple; it is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition(pub String, pub String, pub Value);

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self(field.into(), operation.into(), value.into())
    }
}

/// Ordered screener conditions
pub type ScreenerFilter = Vec<FilterCondition>;

/// Parameters for a screener call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRequest {
    /// Conditions applied by the provider
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: ScreenerFilter,
    /// Sort field and direction, e.g. `market_capitalization.desc`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Pre-defined signal, e.g. `200d_new_hi`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<String>,
}

impl ScreenRequest {
    /// Query parameters for the screener endpoint, excluding credentials
    pub fn query_params(&self) -> serde_json::Result<Vec<(&'static str, String)>> {
        let mut params = Vec::new();

        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        if !self.filters.is_empty() {
            params.push(("filters", serde_json::to_string(&self.filters)?));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            params.push(("offset", offset.to_string()));
        }
        if let Some(signals) = &self.signals {
            params.push(("signals", signals.clone()));
        }

        Ok(params)
    }
}

/// One screener hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenerRow {
    /// Symbol of the instrument
    pub code: String,
    /// Every other column the provider returned
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Envelope returned by the screener endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScreenerResponse {
    #[serde(default)]
    pub data: Vec<ScreenerRow>,
}

/// Ordering of an indicator series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Oldest first
    #[serde(rename = "a")]
    Ascending,
    /// Newest first
    #[serde(rename = "d")]
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "a",
            SortOrder::Descending => "d",
        }
    }
}

/// Parameters for a technical indicator call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorQuery {
    /// Indicator function, e.g. `rsi`, `sma`, `macd`
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Start date (`YYYY-MM-DD`); defaults from the period when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// End date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_adjusted_only: Option<bool>,
}

impl IndicatorQuery {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Default::default()
        }
    }

    pub fn with_period(mut self, period: Option<u32>) -> Self {
        self.period = period;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Query parameters for the technical endpoint, excluding credentials
    ///
    /// `today` anchors the default start date.
    pub fn query_params(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let from = self.from.clone().unwrap_or_else(|| {
            default_from_date(today, self.period)
                .format("%Y-%m-%d")
                .to_string()
        });

        let mut params = vec![
            ("function", self.function.clone()),
            ("from", from),
            ("order", self.order.unwrap_or_default().as_param().to_string()),
        ];

        if let Some(period) = self.period.filter(|p| *p > 0) {
            params.push(("period", period.to_string()));
        }
        if let Some(to) = &self.to {
            params.push(("to", to.clone()));
        }
        if let Some(split_only) = self.split_adjusted_only {
            params.push(("splitadjusted_only", u8::from(split_only).to_string()));
        }

        params
    }
}

/// Days of history to request for an indicator of the given period
///
/// `ceil(period * 1.5)` clamped to `[30, 365]`; 30 without a period.
pub fn required_lookback_days(period: Option<u32>) -> i64 {
    let period_based = match period {
        Some(p) if p > 0 => (3 * i64::from(p) + 1) / 2,
        _ => MIN_LOOKBACK_DAYS,
    };
    period_based.clamp(MIN_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS)
}

/// Default start date for an indicator query issued on `today`
pub fn default_from_date(today: NaiveDate, period: Option<u32>) -> NaiveDate {
    today - Duration::days(required_lookback_days(period))
}
