//! Tools exposed over the tool-invocation protocol

pub mod multi_stage;

pub use multi_stage::{GatewayFactory, MultiStageScreenTool};
