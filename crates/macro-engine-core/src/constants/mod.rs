// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Nutrient keys, USDA column aliases, tool names and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one large file.

/// Canonical nutrient keys, units, and USDA column aliases
pub mod nutrients;
/// Tool identifiers for the JSON tool surface
pub mod tools;

pub use nutrients::{canonical_nutrient_key, nutrient_info, NutrientInfo, NUTRIENTS};

/// Service identifiers used in structured logs
pub mod service_names {
    /// Name reported by the CLI and library logs
    pub const MACRO_ENGINE: &str = "macro-engine";
    /// Name reported by the CSV seeder
    pub const SEED_FOODS: &str = "seed-foods";
}

/// Default values shared by config and tools
pub mod defaults {
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/foods.db";
    /// Default demographic profile for gap analysis
    pub const DRI_PROFILE: &str = "adult_male_19_50";
    /// Default number of search results
    pub const SEARCH_LIMIT: usize = 10;
    /// Maximum number of search results
    pub const MAX_SEARCH_LIMIT: usize = 200;
    /// Reference portion of every nutrient record
    pub const REFERENCE_PORTION_G: f64 = 100.0;
    /// Intake at or above this percent of target counts as adequate
    pub const ADEQUATE_MIN_PERCENT: f64 = 90.0;
    /// Intake above this percent of target counts as excess
    pub const EXCESS_ABOVE_PERCENT: f64 = 150.0;
}
