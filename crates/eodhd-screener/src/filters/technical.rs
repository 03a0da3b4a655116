//! Technical indicator constraints evaluated against the latest observation
//! of an indicator series

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::api::types::{IndicatorQuery, SortOrder};
use crate::error::{Result, ScreenerError};

/// Comparison applied as `observation <comparator> threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Exact floating-point equality, no tolerance
    #[serde(rename = "=")]
    Equal,
}

impl Comparator {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
            Comparator::GreaterOrEqual => ">=",
            Comparator::LessOrEqual => "<=",
            Comparator::Equal => "=",
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn evaluate(self, observed: f64, threshold: f64) -> bool {
        match self {
            Comparator::GreaterThan => observed > threshold,
            Comparator::LessThan => observed < threshold,
            Comparator::GreaterOrEqual => observed >= threshold,
            Comparator::LessOrEqual => observed <= threshold,
            Comparator::Equal => observed == threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Comparator {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            ">" => Ok(Comparator::GreaterThan),
            "<" => Ok(Comparator::LessThan),
            ">=" => Ok(Comparator::GreaterOrEqual),
            "<=" => Ok(Comparator::LessOrEqual),
            "=" => Ok(Comparator::Equal),
            other => Err(ScreenerError::InvalidConstraint {
                field: "condition".to_string(),
                reason: format!("unknown comparator {other:?}"),
            }),
        }
    }
}

/// Threshold test on the most recent value of an indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnicalConstraint {
    /// Indicator function name, e.g. `rsi`
    pub indicator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    pub condition: Comparator,
    /// Threshold
    pub value: f64,
}

impl TechnicalConstraint {
    pub fn new(
        indicator: impl Into<String>,
        period: Option<u32>,
        condition: Comparator,
        value: f64,
    ) -> Self {
        Self {
            indicator: indicator.into(),
            period,
            condition,
            value,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.indicator.trim().is_empty() {
            return Err(ScreenerError::InvalidConstraint {
                field: "indicator".to_string(),
                reason: "indicator name must not be empty".to_string(),
            });
        }
        if !self.value.is_finite() {
            return Err(ScreenerError::InvalidConstraint {
                field: self.indicator.clone(),
                reason: "threshold must be a finite number".to_string(),
            });
        }
        Ok(())
    }

    /// Indicator query for this constraint, oldest observation first
    pub fn query(&self) -> IndicatorQuery {
        IndicatorQuery::new(self.indicator.clone())
            .with_period(self.period)
            .with_order(SortOrder::Ascending)
    }
}

impl fmt::Display for TechnicalConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.period {
            Some(p) => write!(
                f,
                "{}({}) {} {}",
                self.indicator, p, self.condition, self.value
            ),
            None => write!(f, "{} {} {}", self.indicator, self.condition, self.value),
        }
    }
}

/// Numeric value of the last observation in a series
///
/// An observation is either a bare number or an object carrying `value` or a
/// field named after the indicator. Anything else yields `None`.
pub fn latest_observation(series: &Value, indicator: &str) -> Option<f64> {
    let last = series.as_array()?.last()?;

    match last {
        Value::Number(n) => n.as_f64(),
        Value::Object(fields) => fields
            .get("value")
            .and_then(Value::as_f64)
            .or_else(|| fields.get(indicator).and_then(Value::as_f64))
            .or_else(|| {
                fields
                    .get(&indicator.to_ascii_lowercase())
                    .and_then(Value::as_f64)
            }),
        _ => None,
    }
}

/// Whether a series satisfies one constraint
pub fn passes_technical(series: &Value, constraint: &TechnicalConstraint) -> bool {
    latest_observation(series, &constraint.indicator)
        .is_some_and(|observed| constraint.condition.evaluate(observed, constraint.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rsi_above(threshold: f64) -> TechnicalConstraint {
        TechnicalConstraint::new("rsi", Some(14), Comparator::GreaterThan, threshold)
    }

    #[test]
    fn test_last_element_is_current_value() {
        let series = json!([
            {"date": "2024-01-01", "rsi": 65},
            {"date": "2024-01-02", "rsi": 75}
        ]);

        assert!(passes_technical(&series, &rsi_above(70.0)));
        assert!(!passes_technical(&series, &rsi_above(80.0)));
    }

    #[test]
    fn test_empty_or_non_array_series_fails() {
        assert!(!passes_technical(&json!([]), &rsi_above(0.0)));
        assert!(!passes_technical(&json!({"rsi": 75}), &rsi_above(0.0)));
        assert!(!passes_technical(&json!(null), &rsi_above(0.0)));
        assert!(!passes_technical(&json!("error"), &rsi_above(0.0)));
    }

    #[test]
    fn test_value_field_preferred() {
        let series = json!([{"date": "2024-01-02", "value": 10.0, "rsi": 90.0}]);
        assert_eq!(latest_observation(&series, "rsi"), Some(10.0));
    }

    #[test]
    fn test_bare_numbers_and_missing_fields() {
        assert_eq!(latest_observation(&json!([1.5, 2.5]), "sma"), Some(2.5));
        assert_eq!(
            latest_observation(&json!([{"date": "2024-01-02"}]), "sma"),
            None
        );
        assert_eq!(latest_observation(&json!([{"sma": "101.2"}]), "sma"), None);
        assert_eq!(latest_observation(&json!([{"rsi": 55.0}]), "RSI"), Some(55.0));
    }

    #[test]
    fn test_comparators() {
        assert!(Comparator::GreaterThan.evaluate(2.0, 1.0));
        assert!(!Comparator::GreaterThan.evaluate(1.0, 1.0));
        assert!(Comparator::GreaterOrEqual.evaluate(1.0, 1.0));
        assert!(Comparator::LessThan.evaluate(0.5, 1.0));
        assert!(Comparator::LessOrEqual.evaluate(1.0, 1.0));
        assert!(Comparator::Equal.evaluate(1.0, 1.0));
        assert!(!Comparator::Equal.evaluate(0.1 + 0.2, 0.3));
    }

    #[test]
    fn test_deserialize_constraint() {
        let constraint: TechnicalConstraint = serde_json::from_value(json!({
            "indicator": "rsi",
            "condition": ">",
            "value": 70
        }))
        .unwrap();
        assert_eq!(constraint.condition, Comparator::GreaterThan);
        assert_eq!(constraint.period, None);
        assert_eq!(constraint.to_string(), "rsi > 70");

        let unknown = serde_json::from_value::<TechnicalConstraint>(json!({
            "indicator": "rsi",
            "condition": "!=",
            "value": 70
        }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_comparator_from_str() {
        assert_eq!(
            ">=".parse::<Comparator>().unwrap(),
            Comparator::GreaterOrEqual
        );
        assert!("=>".parse::<Comparator>().is_err());
    }

    #[test]
    fn test_query_requests_oldest_first() {
        let query = rsi_above(70.0).query();
        assert_eq!(query.function, "rsi");
        assert_eq!(query.period, Some(14));
        assert_eq!(query.order, Some(SortOrder::Ascending));
        assert_eq!(query.from, None);
    }

    #[test]
    fn test_validate() {
        assert!(rsi_above(70.0).validate().is_ok());
        assert!(rsi_above(f64::NAN).validate().is_err());
        assert!(
            TechnicalConstraint::new(" ", None, Comparator::Equal, 1.0)
                .validate()
                .is_err()
        );
    }
}
