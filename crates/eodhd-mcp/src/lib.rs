//! Model Context Protocol (MCP) server
//!
//! Serves every tool in an [`eodhd_core::ToolRegistry`] to an MCP client over
//! newline-delimited JSON-RPC 2.0 on stdin/stdout.
//!
//! # Example
//!
//! ```no_run
//! use eodhd_core::ToolRegistry;
//! use eodhd_mcp::{MCPServer, ServerInfo};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), eodhd_mcp::MCPError> {
//! let registry = Arc::new(ToolRegistry::new());
//! let server = MCPServer::new(ServerInfo::new("my-server", "0.1.0"), registry);
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod server;

pub use error::MCPError;
pub use protocol::ServerInfo;
pub use server::MCPServer;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, MCPError>;
