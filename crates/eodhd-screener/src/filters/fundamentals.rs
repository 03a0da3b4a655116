//! Fundamentals constraints and their evaluation against a fundamentals record

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Result, ScreenerError};

/// Literal compared by an `equals` bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Strict equality: no coercion between numbers, strings and booleans
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Scalar::Number(expected), Value::Number(actual)) => {
                actual.as_f64().is_some_and(|a| a == *expected)
            }
            (Scalar::Text(expected), Value::String(actual)) => expected == actual,
            _ => false,
        }
    }
}

/// Bounds applied to one field of a fundamentals record
///
/// Every bound that is present must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<Scalar>,
}

impl FieldConstraint {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            equals: None,
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Default::default()
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            max: Some(max),
            ..Default::default()
        }
    }

    pub fn equal_to(value: Scalar) -> Self {
        Self {
            equals: Some(value),
            ..Default::default()
        }
    }

    /// Reject constraints with no bound or a non-finite bound
    pub fn validate(&self, field: &str) -> Result<()> {
        let invalid = |reason: &str| ScreenerError::InvalidConstraint {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.min.is_none() && self.max.is_none() && self.equals.is_none() {
            return Err(invalid("at least one of min, max or equals is required"));
        }
        if self.min.is_some_and(|m| !m.is_finite()) || self.max.is_some_and(|m| !m.is_finite()) {
            return Err(invalid("bounds must be finite numbers"));
        }
        if matches!(self.equals, Some(Scalar::Number(n)) if !n.is_finite()) {
            return Err(invalid("equals must be a finite number"));
        }
        Ok(())
    }

    /// Check a resolved field value against every configured bound
    ///
    /// `None` and JSON `null` never pass. `min`/`max` need a numeric value;
    /// numeric strings are read as numbers.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return false;
        };

        if self.min.is_some() || self.max.is_some() {
            let Some(number) = numeric(value) else {
                return false;
            };
            if self.min.is_some_and(|min| number < min) {
                return false;
            }
            if self.max.is_some_and(|max| number > max) {
                return false;
            }
        }

        self.equals.as_ref().is_none_or(|expected| expected.matches(value))
    }
}

/// Constraints keyed by dotted field path, e.g. `Highlights.PERatio`
pub type FundamentalsConstraintSet = BTreeMap<String, FieldConstraint>;

/// Validate every constraint in a set
pub fn validate_constraints(constraints: &FundamentalsConstraintSet) -> Result<()> {
    constraints
        .iter()
        .try_for_each(|(field, constraint)| constraint.validate(field))
}

/// Walk a dotted path through nested objects (and arrays, by index)
pub fn resolve_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Whether a fundamentals record satisfies every constraint
pub fn passes_fundamentals(record: &Value, constraints: &FundamentalsConstraintSet) -> bool {
    constraints
        .iter()
        .all(|(path, constraint)| constraint.matches(resolve_path(record, path)))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
