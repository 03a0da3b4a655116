//! Stdio transport MCP server
//!
//! Reads one JSON-RPC message per line and writes one response per line.
//! Requests are handled sequentially; a tool call finishes before the next
//! line is read.

use eodhd_core::ToolRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::Result;
use crate::protocol::{
    CallToolParams, DEFAULT_PROTOCOL_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    MCPToolDefinition, MCPToolResult, ServerInfo, error_codes,
};

/// MCP server exposing the tools of a registry
pub struct MCPServer {
    info: ServerInfo,
    registry: Arc<ToolRegistry>,
}

impl MCPServer {
    pub fn new(info: ServerInfo, registry: Arc<ToolRegistry>) -> Self {
        Self { info, registry }
    }

    /// Serve on the process's stdin/stdout until stdin closes
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve on an arbitrary line-oriented transport until the reader hits EOF
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            "MCP server {} {} ready with {} tool(s)",
            self.info.name,
            self.info.version,
            self.registry.len()
        );

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let encoded = serde_json::to_string(&response)?;
                writer.write_all(encoded.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down MCP server");
        Ok(())
    }

    /// Handle one raw message; notifications produce no response
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let id = raw.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id.unwrap_or(Value::Null),
                    JsonRpcError::new(
                        error_codes::INVALID_REQUEST,
                        format!("Invalid request: {e}"),
                    ),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            debug!("Notification: {}", request.method);
            return None;
        };

        debug!("Request: {}", request.method);
        Some(match self.dispatch(&request).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> std::result::Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(request.params.clone()).await,
            other => Err(JsonRpcError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {"listChanged": false}
            },
            "serverInfo": self.info,
        })
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<MCPToolDefinition> = self
            .registry
            .list_tools()
            .iter()
            .map(|tool| MCPToolDefinition {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: tool.input_schema(),
            })
            .collect();

        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: Option<Value>) -> std::result::Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::new(error_codes::INVALID_PARAMS, "Missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| {
                    JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {e}"))
                })
            })?;

        let tool = self.registry.get(&params.name).ok_or_else(|| {
            JsonRpcError::new(
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            )
        })?;

        info!("Calling tool: {}", params.name);
        let result = match tool.execute(params.arguments).await {
            Ok(value) => {
                let text =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                MCPToolResult::text(text, false)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", params.name, e);
                MCPToolResult::text(format!("Error in {}: {}", params.name, e), true)
            }
        };

        serde_json::to_value(result)
            .map_err(|e| JsonRpcError::new(error_codes::INTERNAL_ERROR, e.to_string()))
    }
}
