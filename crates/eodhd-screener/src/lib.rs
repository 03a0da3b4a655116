//! Multi-stage stock screening over the EODHD market data API
//!
//! The crate chains three provider queries into one screening run:
//!
//! - the **screener** selects an initial candidate list,
//! - **fundamentals** lookups narrow it with per-field bounds,
//! - **technical indicator** lookups narrow it further with threshold tests
//!   on each indicator's latest observation.
//!
//! # Architecture
//!
//! - [`gateway::MarketDataGateway`]: the three provider queries as a trait
//! - [`api::EodhdClient`]: the HTTP implementation of the gateway
//! - [`filters`]: pure evaluators for fundamentals and technical constraints
//! - [`pipeline::ScreeningPipeline`]: concurrent fan-out and stage ordering
//! - [`tools::MultiStageScreenTool`]: the pipeline as a callable tool
//!
//! # Example
//!
//! ```rust,ignore
//! use eodhd_screener::{EodhdClient, PipelineRequest, ScreenerConfig, ScreeningPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(ScreenerConfig::from_env()?);
//!     let client = EodhdClient::from_config(&config)?;
//!     let pipeline = ScreeningPipeline::new(Arc::new(client), config);
//!
//!     let result = pipeline
//!         .run(&PipelineRequest {
//!             symbols: vec!["AAPL.US".into(), "MSFT.US".into()],
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{:?}", result.final_symbols);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod pipeline;
pub mod tools;

// Re-export main types for convenience
pub use api::EodhdClient;
pub use config::ScreenerConfig;
pub use error::{Result, ScreenerError};
pub use gateway::MarketDataGateway;
pub use pipeline::{PipelineRequest, PipelineResult, ScreeningPipeline};
pub use tools::MultiStageScreenTool;
