// ABOUTME: Tool trait implemented by every entry of the JSON tool surface
// ABOUTME: Name, description, input schema and async execution against the nutrition service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppResult;
use crate::services::NutritionService;

use super::schema::{JsonSchema, ToolDefinition};

/// A named, schema-described operation callable through a tool request
#[async_trait]
pub trait NutritionTool: Send + Sync {
    /// Unique identifier used in requests
    fn name(&self) -> &'static str;

    /// Human-readable description for tool hosts
    fn description(&self) -> &'static str;

    /// JSON Schema for the parameters object
    fn input_schema(&self) -> JsonSchema;

    /// Execute the tool
    ///
    /// # Errors
    ///
    /// Returns `AppError` for invalid parameters or a failed operation
    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value>;

    /// Definition returned by `list_tools`
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            input_schema: self.input_schema(),
        }
    }
}
