// ABOUTME: Nutrition tools for food lookup, macro scaling, meal totals and DRI gaps
// ABOUTME: Implements lookup_food, search_foods, calculate_macros, analyze_meal, analyze_nutrient_gaps, list_dri_profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Nutrition Tools
//!
//! - `LookupFoodTool` - resolve a food by id or name
//! - `SearchFoodsTool` - search foods by name fragment
//! - `CalculateMacrosTool` - scale one food to a portion
//! - `AnalyzeMealTool` - scale and sum a list of ingredients
//! - `AnalyzeNutrientGapsTool` - compare intake with a DRI profile
//! - `ListDriProfilesTool` - list the DRI profiles
//!
//! Every tool delegates to [`NutritionService`] and serializes its result.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::constants::tools::{
    ANALYZE_MEAL, ANALYZE_NUTRIENT_GAPS, CALCULATE_MACROS, LIST_DRI_PROFILES, LOOKUP_FOOD,
    SEARCH_FOODS,
};
use crate::errors::{AppResult, ToolError};
use crate::services::NutritionService;

use super::params;
use super::schema::{JsonSchema, PropertySchema};
use super::traits::NutritionTool;

fn food_property() -> PropertySchema {
    PropertySchema::new("string", "Food id, exact name, or name fragment")
}

fn ingredients_property() -> PropertySchema {
    PropertySchema::new(
        "array",
        "Ingredients as objects with `food` (id or name) and `grams` fields",
    )
}

fn profile_property() -> PropertySchema {
    PropertySchema::new(
        "string",
        "DRI profile key such as adult_female_19_50; defaults to the configured profile",
    )
}

/// Resolve a single food
pub struct LookupFoodTool;

#[async_trait]
impl NutritionTool for LookupFoodTool {
    fn name(&self) -> &'static str {
        LOOKUP_FOOD
    }

    fn description(&self) -> &'static str {
        "Resolve a food by id or name and return its nutrients per 100 g"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(vec![("food", food_property())], &["food"])
    }

    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value> {
        let food = params::required_str(params, LOOKUP_FOOD, "food")?;
        let resolved = service.lookup_food(food).await?;
        Ok(serde_json::to_value(resolved)?)
    }
}

/// Search foods
pub struct SearchFoodsTool;

#[async_trait]
impl NutritionTool for SearchFoodsTool {
    fn name(&self) -> &'static str {
        SEARCH_FOODS
    }

    fn description(&self) -> &'static str {
        "Search foods whose name or common name contains the query, shortest names first"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("query", PropertySchema::new("string", "Name fragment to search for")),
                (
                    "limit",
                    PropertySchema::new("integer", "Maximum number of results (default 10, max 200)"),
                ),
            ],
            &["query"],
        )
    }

    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value> {
        let query = params::required_str(params, SEARCH_FOODS, "query")?;
        let limit = params::optional_usize(params, SEARCH_FOODS, "limit")?;
        let foods = service.search_foods(query, limit).await?;
        Ok(json!({
            "query": query,
            "count": foods.len(),
            "foods": foods,
        }))
    }
}

/// Scale one food to a portion
pub struct CalculateMacrosTool;

#[async_trait]
impl NutritionTool for CalculateMacrosTool {
    fn name(&self) -> &'static str {
        CALCULATE_MACROS
    }

    fn description(&self) -> &'static str {
        "Scale a food's per-100 g nutrients to a portion in grams"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("food", food_property()),
                ("grams", PropertySchema::new("number", "Portion size in grams, greater than 0")),
            ],
            &["food", "grams"],
        )
    }

    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value> {
        let food = params::required_str(params, CALCULATE_MACROS, "food")?;
        let grams = params::required_f64(params, CALCULATE_MACROS, "grams")?;
        let portion = service.calculate_macros(food, grams).await?;
        Ok(serde_json::to_value(portion)?)
    }
}

/// Scale and sum a meal
pub struct AnalyzeMealTool;

#[async_trait]
impl NutritionTool for AnalyzeMealTool {
    fn name(&self) -> &'static str {
        ANALYZE_MEAL
    }

    fn description(&self) -> &'static str {
        "Sum the nutrients of a list of ingredients; unresolved ingredients are flagged and skipped"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(vec![("ingredients", ingredients_property())], &["ingredients"])
    }

    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value> {
        let ingredients = params::ingredients(params, ANALYZE_MEAL)?;
        let meal = service.analyze_meal(&ingredients).await?;
        Ok(serde_json::to_value(meal)?)
    }
}

/// Compare intake with a DRI profile
pub struct AnalyzeNutrientGapsTool;

#[async_trait]
impl NutritionTool for AnalyzeNutrientGapsTool {
    fn name(&self) -> &'static str {
        ANALYZE_NUTRIENT_GAPS
    }

    fn description(&self) -> &'static str {
        "Compare consumed nutrients with DRI targets and classify each as deficient, adequate or excess"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                ("profile", profile_property()),
                ("ingredients", ingredients_property()),
                (
                    "consumed",
                    PropertySchema::new(
                        "array",
                        "Alternative to ingredients: objects mapping nutrient names to amounts",
                    ),
                ),
            ],
            &[],
        )
    }

    async fn execute(&self, params: &Value, service: &NutritionService) -> AppResult<Value> {
        let profile = params::optional_str(params, ANALYZE_NUTRIENT_GAPS, "profile")?;
        let has_ingredients = params.get("ingredients").is_some_and(|v| !v.is_null());
        let has_consumed = params.get("consumed").is_some_and(|v| !v.is_null());

        let analysis = match (has_ingredients, has_consumed) {
            (true, false) => {
                let ingredients = params::ingredients(params, ANALYZE_NUTRIENT_GAPS)?;
                service.analyze_meal_gaps(&ingredients, profile).await?
            }
            (false, true) => {
                let consumed = params::consumed(params, ANALYZE_NUTRIENT_GAPS)?;
                service.analyze_consumed_gaps(&consumed, profile)?
            }
            (true, true) => {
                return Err(ToolError::invalid_parameter(
                    ANALYZE_NUTRIENT_GAPS,
                    "consumed",
                    "give either ingredients or consumed, not both",
                )
                .into())
            }
            (false, false) => {
                return Err(
                    ToolError::missing_parameter(ANALYZE_NUTRIENT_GAPS, "ingredients").into(),
                )
            }
        };
        Ok(serde_json::to_value(analysis)?)
    }
}

/// List DRI profiles
pub struct ListDriProfilesTool;

#[async_trait]
impl NutritionTool for ListDriProfilesTool {
    fn name(&self) -> &'static str {
        LIST_DRI_PROFILES
    }

    fn description(&self) -> &'static str {
        "List the DRI profiles and their daily nutrient targets"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty_object()
    }

    async fn execute(&self, _params: &Value, service: &NutritionService) -> AppResult<Value> {
        let profiles = service.list_profiles();
        Ok(json!({
            "count": profiles.len(),
            "profiles": profiles,
        }))
    }
}
