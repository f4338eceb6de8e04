// ABOUTME: JSON tool surface exposing the nutrition service to external tool hosts
// ABOUTME: Schemas, tool trait, registry, parameter parsing and the request executor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tools
//!
//! Tools are described by a name, a description and a JSON Schema of their
//! parameters, and called with `{ "tool": <name>, "parameters": {...} }`.
//! Transport and session handling are left to the host.

/// Request execution and response envelope
pub mod executor;
/// Nutrition tool implementations
pub mod nutrition;
/// Parameter extraction helpers
pub mod params;
/// Tool registry
pub mod registry;
/// JSON Schema types for tool definitions
pub mod schema;
/// Tool trait
pub mod traits;

pub use executor::{ResponseMetadata, ToolExecutor, ToolRequest, ToolResponse};
pub use registry::ToolRegistry;
pub use schema::{JsonSchema, PropertySchema, ToolDefinition};
pub use traits::NutritionTool;
