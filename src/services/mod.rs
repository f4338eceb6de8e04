// ABOUTME: Domain service layer shared by the CLI and the JSON tool surface
// ABOUTME: Orchestrates food lookup, scaling, aggregation and gap analysis per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services are protocol-agnostic: the CLI subcommands and the tool
//! executor call the same methods.

/// Food lookup, macro, meal and gap operations
pub mod nutrition;

pub use nutrition::{GapAnalysis, IngredientInput, NutritionService, PortionResult};
