/// Line-oriented MCP endpoint over stdio
///
/// Requests come in one per line, tool calls run against the in-memory habit
/// collection, and any call that changes it is followed by a save.

use chrono::{Local, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ProgressAction, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// Dispatches MCP requests to the habit tools
pub struct McpServer {
    habit_tracker: HabitTrackerServer,
    /// Set once the client sends `initialized`
    initialized: bool,
}

impl McpServer {
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Tracker state, for inspection after requests
    pub fn habit_tracker(&self) -> &HabitTrackerServer {
        &self.habit_tracker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve until stdin reaches EOF or fails
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Listening for MCP requests on stdin");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("stdin closed");
                    break;
                }
                Err(e) => {
                    error!("Reading stdin failed: {}", e);
                    break;
                }
            };

            let Some(response) = self.process_line(&line).await else {
                continue;
            };
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            stdout.write_all(&encoded).await?;
            stdout.flush().await?;
            debug!("Answered request {}", response.id);
        }

        Ok(())
    }

    /// Handle one raw input line; `None` for blank lines and notifications
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("<- {}", line);

        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Unparseable request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        // Well-formed JSON that is not a request; echo its id when one is readable
        let request: JsonRpcRequest = match JsonRpcRequest::deserialize(&raw) {
            Ok(req) => req,
            Err(e) => {
                warn!("Invalid request: {}", e);
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.handle_notification(&request.method);
                JsonRpcResponse::success(id, json!(null))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification: {}", other),
        }
    }

    /// Reply to `initialize` with protocol version, capabilities and server info
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("initialize received");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition::new::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new habit. Check habits are done or not done each day; \
                 count habits track progress toward a daily goal.",
            ),
            ToolDefinition::new::<NoParams>(
                "habit_list",
                "List all habits with today's progress, current streak and best streak",
            ),
            ToolDefinition::new::<tools::StatusParams>(
                "habit_status",
                "Show one habit's streaks and its completion heatmap",
            ),
            ToolDefinition::new::<tools::ProgressParams>(
                "habit_toggle",
                "Mark a check habit done or not done for today (adds one to a count habit)",
            ),
            ToolDefinition::new::<tools::ProgressParams>(
                "habit_increment",
                "Add one to today's progress on a count habit",
            ),
            ToolDefinition::new::<tools::ProgressParams>(
                "habit_decrement",
                "Remove one from today's progress on a count habit (never below zero)",
            ),
            ToolDefinition::new::<tools::UpdateHabitParams>(
                "habit_update",
                "Edit a habit's name, emoji, color, type or goal",
            ),
            ToolDefinition::new::<tools::DeleteHabitParams>(
                "habit_delete",
                "Delete a habit and its history",
            ),
            ToolDefinition::new::<NoParams>("theme_get", "Get the current theme preference"),
            ToolDefinition::new::<tools::SetThemeParams>(
                "theme_set",
                "Set the theme preference (light or dark)",
            ),
        ];

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Decode `tools/call` params and run the tool; tool failures become `isError` results
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = match self.call_tool(&tool_params.name, tool_params.arguments).await {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!(
                    "Tool {} failed (code {}): {}",
                    tool_params.name,
                    tool_error_code(&e),
                    e
                );
                ToolCallResult::error(e.to_string())
            }
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Run a tool and return its text output
    ///
    /// Tools that change the collection save it before returning. A failed
    /// save rolls the collection back, so an error result always means
    /// nothing changed.
    async fn call_tool(
        &mut self,
        name: &str,
        args: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let now = Local::now();
        let engine = *self.habit_tracker.engine();

        match name {
            "habit_create" => {
                let params = parse_args(args)?;
                let snapshot = self.habit_tracker.habits().to_vec();
                let response =
                    tools::create_habit(self.habit_tracker.habits_mut(), params, Utc::now())?;
                self.habit_tracker.save_or_restore(snapshot).await?;
                Ok(format!("{}\nHabit ID: {}", response.message, response.habit_id))
            }
            "habit_list" => {
                Ok(tools::list_habits(self.habit_tracker.habits(), &engine, &now).message)
            }
            "habit_status" => {
                let params = parse_args(args)?;
                let habits = self.habit_tracker.habits();
                Ok(tools::get_habit_status(habits, &engine, params, &now)?.message)
            }
            "habit_toggle" => self.call_progress(ProgressAction::Toggle, args).await,
            "habit_increment" => self.call_progress(ProgressAction::Increment, args).await,
            "habit_decrement" => self.call_progress(ProgressAction::Decrement, args).await,
            "habit_update" => {
                let params = parse_args(args)?;
                let snapshot = self.habit_tracker.habits().to_vec();
                let response = tools::update_habit(self.habit_tracker.habits_mut(), params)?;
                self.habit_tracker.save_or_restore(snapshot).await?;
                Ok(response.message)
            }
            "habit_delete" => {
                let params = parse_args(args)?;
                let snapshot = self.habit_tracker.habits().to_vec();
                let response = tools::delete_habit(self.habit_tracker.habits_mut(), params)?;
                self.habit_tracker.save_or_restore(snapshot).await?;
                Ok(response.message)
            }
            "theme_get" => Ok(tools::get_theme(self.habit_tracker.preferences()).await.message),
            "theme_set" => {
                let params = parse_args(args)?;
                Ok(tools::set_theme(self.habit_tracker.preferences(), params).await?.message)
            }
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    async fn call_progress(
        &mut self,
        action: ProgressAction,
        args: Map<String, Value>,
    ) -> Result<String, ToolError> {
        let params = parse_args(args)?;
        let engine = *self.habit_tracker.engine();
        let snapshot = self.habit_tracker.habits().to_vec();
        let response = tools::record_progress(
            self.habit_tracker.habits_mut(),
            &engine,
            action,
            params,
            &Local::now(),
        )?;
        self.habit_tracker.save_or_restore(snapshot).await?;
        Ok(response.message)
    }
}

/// Deserialize tool arguments into a tool's parameter struct
fn parse_args<P: DeserializeOwned>(args: Map<String, Value>) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidInput(e.to_string()))
}
