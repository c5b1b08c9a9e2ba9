use std::time::Duration;

use fsplug_core::FileSystem;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND,
};
use crate::resources::{self, ResourceError};
use crate::tools::ToolRegistry;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "fsplug-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a request needs: the core, the tool table and the deadline.
pub struct Server {
    fs: FileSystem,
    registry: ToolRegistry,
    call_timeout: Option<Duration>,
}

impl Server {
    pub fn new(fs: FileSystem, registry: ToolRegistry, call_timeout: Option<Duration>) -> Self {
        Self {
            fs,
            registry,
            call_timeout,
        }
    }

    /// Handle one request. Notifications (no id) get no response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "received request");

        let id = request.id?;
        let id = Some(id);

        if request.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                "unsupported jsonrpc version",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(id, json!({ "tools": self.registry.definitions() }))
            }
            "tools/call" => self.handle_tools_call(id, &request.params).await,
            "resources/list" => JsonRpcResponse::success(id, resources::list()),
            "resources/templates/list" => JsonRpcResponse::success(id, resources::templates()),
            "resources/read" => self.handle_resources_read(id, &request.params).await,
            _ => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name");
        };
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let call = self.registry.call(tool_name, &self.fs, &args);
        let result = match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(tool = tool_name, secs = limit.as_secs(), "tool call timed out");
                    Err(format!("{tool_name} timed out after {}s", limit.as_secs()))
                }
            },
            None => call.await,
        };

        if let Err(e) = &result {
            debug!(tool = tool_name, error = %e, "tool call failed");
        }
        tool_result(id, result)
    }

    async fn handle_resources_read(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(uri) = params.get("uri").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "missing resource uri");
        };
        match resources::read(uri, &self.fs, &self.registry.names()).await {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(ResourceError::Unknown(uri)) => {
                JsonRpcResponse::error(id, INVALID_PARAMS, format!("unknown resource: {uri}"))
            }
            Err(ResourceError::Failed(msg)) => JsonRpcResponse::error(id, INTERNAL_ERROR, msg),
        }
    }
}

/// Wrap a tool result in an MCP-style response (content array, isError flag).
fn tool_result(id: Option<Value>, result: Result<Value, String>) -> JsonRpcResponse {
    match result {
        Ok(value) => {
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
            };
            JsonRpcResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            )
        }
        Err(e) => JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": format!("Error: {e}") }],
                "isError": true
            }),
        ),
    }
}
