// ABOUTME: Tool name constants for the JSON tool surface
// ABOUTME: Single source of truth for tool identifiers used by registry and CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Resolve a food by id or name
pub const LOOKUP_FOOD: &str = "lookup_food";
/// Search foods by name fragment
pub const SEARCH_FOODS: &str = "search_foods";
/// Scale one food to a portion
pub const CALCULATE_MACROS: &str = "calculate_macros";
/// Aggregate a list of ingredients
pub const ANALYZE_MEAL: &str = "analyze_meal";
/// Compare intake against a DRI profile
pub const ANALYZE_NUTRIENT_GAPS: &str = "analyze_nutrient_gaps";
/// List the available DRI profiles
pub const LIST_DRI_PROFILES: &str = "list_dri_profiles";

/// All tool names in registry order
pub const ALL_TOOLS: &[&str] = &[
    LOOKUP_FOOD,
    SEARCH_FOODS,
    CALCULATE_MACROS,
    ANALYZE_MEAL,
    ANALYZE_NUTRIENT_GAPS,
    LIST_DRI_PROFILES,
];
