// ABOUTME: Subcommand implementations for the macro-engine CLI
// ABOUTME: Each command calls the nutrition service and returns a JSON value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use macro_engine::errors::{AppError, AppResult, ErrorCode};
use macro_engine::intelligence::dri::DriTable;
use macro_engine::services::{IngredientInput, NutritionService};
use macro_engine::tools::{ToolExecutor, ToolRegistry, ToolResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;

/// Meal files hold either a bare list or `{"ingredients": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum MealFile {
    List(Vec<IngredientInput>),
    Object { ingredients: Vec<IngredientInput> },
}

pub async fn lookup(service: &NutritionService, food: &str) -> AppResult<Value> {
    let resolved = service.lookup_food(food).await?;
    Ok(serde_json::to_value(resolved)?)
}

pub async fn search(
    service: &NutritionService,
    query: &str,
    limit: Option<usize>,
) -> AppResult<Value> {
    let foods = service.search_foods(query, limit).await?;
    Ok(json!({ "query": query, "count": foods.len(), "foods": foods }))
}

pub async fn macros(service: &NutritionService, food: &str, grams: f64) -> AppResult<Value> {
    let portion = service.calculate_macros(food, grams).await?;
    Ok(serde_json::to_value(portion)?)
}

pub async fn meal(
    service: &NutritionService,
    items: &[String],
    file: Option<&Path>,
) -> AppResult<Value> {
    let ingredients = ingredients(items, file)?;
    let meal = service.analyze_meal(&ingredients).await?;
    Ok(serde_json::to_value(meal)?)
}

pub async fn gaps(
    service: &NutritionService,
    profile: Option<&str>,
    items: &[String],
    file: Option<&Path>,
) -> AppResult<Value> {
    let ingredients = ingredients(items, file)?;
    let analysis = service.analyze_meal_gaps(&ingredients, profile).await?;
    Ok(serde_json::to_value(analysis)?)
}

pub fn profiles(table: &DriTable) -> Value {
    let profiles = table.profiles();
    json!({ "count": profiles.len(), "profiles": profiles })
}

pub fn tools() -> Value {
    let tools = ToolRegistry::with_builtin_tools().definitions();
    json!({ "count": tools.len(), "tools": tools })
}

/// Execute a tool request given inline or as `-` for stdin
pub async fn tool(executor: &ToolExecutor, request: &str) -> anyhow::Result<ToolResponse> {
    let body = if request == "-" {
        let mut body = String::new();
        tokio::io::stdin().read_to_string(&mut body).await?;
        body
    } else {
        request.to_owned()
    };
    Ok(executor.execute_json(&body).await)
}

fn ingredients(items: &[String], file: Option<&Path>) -> AppResult<Vec<IngredientInput>> {
    if let Some(path) = file {
        let text = std::fs::read_to_string(path)?;
        let parsed: MealFile = serde_json::from_str(&text).map_err(|e| {
            AppError::new(ErrorCode::InvalidFormat, format!("Invalid meal file: {e}"))
                .with_details(json!({ "path": path.display().to_string() }))
        })?;
        return Ok(match parsed {
            MealFile::List(ingredients) | MealFile::Object { ingredients } => ingredients,
        });
    }
    items.iter().map(|item| parse_item(item)).collect()
}

/// Parse `"<food>=<grams>"`; the last `=` separates so names may contain one
fn parse_item(item: &str) -> AppResult<IngredientInput> {
    let (food, grams) = item.rsplit_once('=').ok_or_else(|| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("Expected <food>=<grams>, got '{item}'"),
        )
    })?;
    let grams = grams.trim().parse::<f64>().map_err(|_| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("Grams in '{item}' is not a number"),
        )
    })?;
    let food = food.trim();
    if food.is_empty() {
        return Err(AppError::missing_field("food"));
    }
    Ok(IngredientInput::new(food, grams))
}
