//! EODHD REST client and its request/response types

pub mod eodhd;
pub mod types;

pub use eodhd::EodhdClient;
pub use types::{
    FilterCondition, IndicatorQuery, ScreenRequest, ScreenerFilter, ScreenerResponse, ScreenerRow,
    SortOrder, default_from_date, required_lookback_days,
};
