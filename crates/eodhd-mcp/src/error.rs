//! Error types for MCP operations

use thiserror::Error;

/// Errors that end the serving loop
#[derive(Error, Debug)]
pub enum MCPError {
    /// Transport read or write failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A response could not be serialized
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

