//! Shared utilities for the EODHD screener
//!
//! Logging setup and environment-variable helpers used by the domain crate
//! and the server binary.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_parse, env_string};
pub use logging::init_tracing;
