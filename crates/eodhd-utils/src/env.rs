//! Environment variable helpers

use std::str::FromStr;
use thiserror::Error;

/// An environment variable was set but could not be parsed
#[derive(Debug, Error)]
#[error("Invalid value for {name}: {value:?} ({reason})")]
pub struct EnvError {
    pub name: String,
    pub value: String,
    pub reason: String,
}

/// Read an environment variable, treating unset and blank values alike
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn env_parse<T>(name: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(name) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|e| EnvError {
            name: name.to_string(),
            reason: e.to_string(),
            value,
        }),
    }
}
