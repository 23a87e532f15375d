/// Wire types for JSON-RPC 2.0 and the subset of MCP the server speaks
///
/// One request per line on stdin, one response per line on stdout. Tool
/// results and tool definitions use camelCase field names.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::tools::ToolError;

/// Protocol revision reported during `initialize`
pub const MCP_VERSION: &str = "2024-11-05";

/// Incoming request or notification
///
/// A missing `id` marks a notification, which is never answered. An explicit
/// `"id": null` is still a request and reads as `Some(Value::Null)`.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Keeps a present `id` as-is, including `null`; only a missing key yields `None`
fn present_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Reply to a request; exactly one of `result` and `error` is set
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// One of [`error_codes`]
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// `params` of a `tools/call` request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    /// Decoded later into the tool's own parameter struct
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Outcome of a tool call. Tool failures are reported here with
/// `isError: true`, not as JSON-RPC errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Always "text" here
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Entry in the `tools/list` result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Input for tools that take no arguments
#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoParams {}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the tool list can change while connected
    pub list_changed: bool,
}

/// Result of the `initialize` handshake
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Error codes: the JSON-RPC reserved range plus server-defined codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const HABIT_NOT_FOUND: i32 = -32001;
    pub const VALIDATION_ERROR: i32 = -32003;
    pub const STORAGE_ERROR: i32 = -32004;
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message, data }),
        }
    }
}

impl ToolCallResult {
    /// Plain text result
    pub fn success(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: false,
        }
    }

    /// Text result flagged as an error, prefixed with "Error: "
    pub fn error(error_message: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: format!("Error: {}", error_message),
            }],
            is_error: true,
        }
    }
}

impl ToolDefinition {
    /// Describe a tool whose arguments deserialize into `P`
    pub fn new<P: JsonSchema>(name: &str, description: &str) -> Self {
        let input_schema = serde_json::to_value(schema_for!(P))
            .unwrap_or_else(|_| serde_json::json!({"type": "object"}));
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Map tool errors to JSON-RPC error codes (attached to error results as data)
pub fn tool_error_code(error: &ToolError) -> i32 {
    match error {
        ToolError::HabitNotFound { .. } => error_codes::HABIT_NOT_FOUND,
        ToolError::UnknownTool(_) => error_codes::METHOD_NOT_FOUND,
        ToolError::InvalidInput(_) | ToolError::Domain(_) => error_codes::VALIDATION_ERROR,
        ToolError::Storage(_) => error_codes::STORAGE_ERROR,
    }
}
