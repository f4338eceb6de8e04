// ABOUTME: Configuration module for runtime settings and nutrition parameters
// ABOUTME: All configuration comes from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: database location, default profile, search limits
//! - **Nutrition**: gap thresholds, completeness expectations, DRI table source

/// Environment and runtime configuration
pub mod environment;
/// Nutrition calculation parameters
pub mod nutrition;

pub use environment::ServerConfig;
pub use nutrition::{CompletenessConfig, ConfigError, GapThresholdsConfig, NutritionConfig};
