// ABOUTME: Executes JSON tool requests and wraps results in the response envelope
// ABOUTME: Every failure is reported inside the envelope with success=false
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tool execution
//!
//! Request: `{ "tool": <name>, "parameters": {...} }`
//!
//! Response: `{ "success", "result", "error", "metadata" }`

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ToolError};
use crate::logging::log_tool_call;
use crate::services::NutritionService;

use super::registry::ToolRegistry;
use super::schema::ToolDefinition;

/// Incoming tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Tool name
    pub tool: String,
    /// Parameters object; absent means no parameters
    #[serde(default)]
    pub parameters: Value,
}

impl ToolRequest {
    /// Create a request
    #[must_use]
    pub fn new(tool: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool: tool.into(),
            parameters,
        }
    }
}

/// Execution metadata attached to every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Tool that was requested
    pub tool: String,
    /// Unique id of this execution
    pub request_id: String,
    /// RFC 3339 completion time
    pub executed_at: String,
    /// Wall time spent executing
    pub duration_ms: u64,
}

/// Tool response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the tool completed
    pub success: bool,
    /// Tool output on success
    pub result: Option<Value>,
    /// Error body on failure
    pub error: Option<ErrorResponse>,
    /// Execution metadata
    pub metadata: ResponseMetadata,
}

/// Dispatches tool requests to the registry
#[derive(Clone)]
pub struct ToolExecutor {
    registry: ToolRegistry,
    service: NutritionService,
}

impl ToolExecutor {
    /// Executor over the built-in tools
    #[must_use]
    pub fn new(service: NutritionService) -> Self {
        Self::with_registry(ToolRegistry::with_builtin_tools(), service)
    }

    /// Executor over a custom registry
    #[must_use]
    pub const fn with_registry(registry: ToolRegistry, service: NutritionService) -> Self {
        Self { registry, service }
    }

    /// Definitions of every available tool
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Execute a raw JSON request
    ///
    /// A body that does not parse is answered with a failed response whose
    /// `metadata.tool` is empty.
    pub async fn execute_json(&self, body: &str) -> ToolResponse {
        match serde_json::from_str::<ToolRequest>(body) {
            Ok(request) => self.execute(request).await,
            Err(e) => {
                warn!("Rejected malformed tool request: {}", e);
                let error =
                    AppError::new(ErrorCode::InvalidFormat, format!("Malformed tool request: {e}"));
                respond(String::new(), Err(error), 0)
            }
        }
    }

    /// Execute a parsed request
    pub async fn execute(&self, request: ToolRequest) -> ToolResponse {
        let start = Instant::now();
        debug!(tool.name = %request.tool, "Executing tool");
        let outcome = self.dispatch(&request).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        log_tool_call(&request.tool, outcome.is_ok(), duration_ms);
        if let Err(error) = &outcome {
            debug!(tool.name = %request.tool, error.code = ?error.code, "Tool failed: {}", error.message);
        }
        respond(request.tool, outcome, duration_ms)
    }

    async fn dispatch(&self, request: &ToolRequest) -> AppResult<Value> {
        let tool = self
            .registry
            .get(&request.tool)
            .ok_or_else(|| ToolError::not_found(&request.tool))?;

        let parameters = match &request.parameters {
            Value::Null => Value::Object(serde_json::Map::new()),
            Value::Object(_) => request.parameters.clone(),
            _ => {
                return Err(ToolError::invalid_parameter(
                    &request.tool,
                    "parameters",
                    "expected an object",
                )
                .into())
            }
        };

        tool.execute(&parameters, &self.service).await
    }
}

fn respond(tool: String, outcome: AppResult<Value>, duration_ms: u64) -> ToolResponse {
    let metadata = ResponseMetadata {
        tool,
        request_id: Uuid::new_v4().to_string(),
        executed_at: Utc::now().to_rfc3339(),
        duration_ms,
    };
    match outcome {
        Ok(result) => ToolResponse {
            success: true,
            result: Some(result),
            error: None,
            metadata,
        },
        Err(error) => ToolResponse {
            success: false,
            result: None,
            error: Some(ErrorResponse::from(error)),
            metadata,
        },
    }
}
