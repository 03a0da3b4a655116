//! MCP server exposing the EODHD multi-stage screener over stdio

use clap::Parser;
use eodhd_core::ToolRegistry;
use eodhd_mcp::{MCPServer, ServerInfo};
use eodhd_screener::{MultiStageScreenTool, ScreenerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "eodhd-screener-mcp")]
#[command(about = "EODHD multi-stage screening tools for MCP clients", long_about = None)]
struct Args {
    /// Fallback EODHD API key (otherwise EODHD_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// EODHD API base URL (otherwise EODHD_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Cap on in-flight requests per screening round (otherwise EODHD_MAX_CONCURRENCY)
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// HTTP request timeout in seconds (otherwise EODHD_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<ScreenerConfig> {
        let mut builder = ScreenerConfig::builder();
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(cap) = self.max_concurrency {
            builder = builder.max_concurrency(cap);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        Ok(builder.with_env()?.build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, logs go to stderr
    eodhd_utils::init_tracing(args.log_json);

    let config = Arc::new(args.config()?);
    if config.api_key.is_none() {
        info!("No fallback API key configured; calls must pass apiKey");
    }

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(MultiStageScreenTool::new(config)?));

    let info = ServerInfo::new("eodhd-screener-mcp", env!("CARGO_PKG_VERSION"));
    info!("Starting {} {}", info.name, info.version);

    MCPServer::new(info, registry).serve_stdio().await?;
    Ok(())
}
