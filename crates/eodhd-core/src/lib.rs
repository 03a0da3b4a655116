//! Core abstractions for the EODHD screener
//!
//! This crate defines the pieces shared by the domain crate and the protocol
//! server: the [`Tool`] trait that every callable tool implements, the
//! [`ToolRegistry`] the server dispatches through, JSON-schema builders for
//! tool inputs, and the tool-facing [`Error`] type.

pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

pub use error::{Error, Result};
pub use registry::ToolRegistry;
pub use tool::Tool;
