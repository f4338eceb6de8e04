// ABOUTME: Typed extraction of tool parameters from a JSON object
// ABOUTME: Failures become ToolError values naming the tool and parameter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use crate::constants::nutrients::canonical_nutrient_key;
use crate::errors::ToolError;
use crate::models::NutrientMap;
use crate::services::IngredientInput;

/// Required non-blank string parameter
pub fn required_str<'a>(params: &'a Value, tool: &str, name: &str) -> Result<&'a str, ToolError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(ToolError::missing_parameter(tool, name)),
        Some(value) => value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::invalid_parameter(tool, name, "expected a non-empty string")),
    }
}

/// Optional string parameter; blank strings count as absent
pub fn optional_str<'a>(
    params: &'a Value,
    tool: &str,
    name: &str,
) -> Result<Option<&'a str>, ToolError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.trim()).filter(|s| !s.is_empty()))
            .ok_or_else(|| ToolError::invalid_parameter(tool, name, "expected a string")),
    }
}

/// Required numeric parameter
pub fn required_f64(params: &Value, tool: &str, name: &str) -> Result<f64, ToolError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(ToolError::missing_parameter(tool, name)),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ToolError::invalid_parameter(tool, name, "expected a number")),
    }
}

/// Optional positive integer parameter
pub fn optional_usize(params: &Value, tool: &str, name: &str) -> Result<Option<usize>, ToolError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ToolError::invalid_parameter(tool, name, "expected a positive integer")),
    }
}

/// `ingredients: [{ "food": <id or name>, "grams": <number> }]`
///
/// The array must be non-empty. A malformed entry is still passed on, with
/// a blank food or a NaN portion, so the meal calculation flags only that
/// entry.
pub fn ingredients(params: &Value, tool: &str) -> Result<Vec<IngredientInput>, ToolError> {
    let entries = match params.get("ingredients") {
        None | Some(Value::Null) => return Err(ToolError::missing_parameter(tool, "ingredients")),
        Some(value) => value.as_array().ok_or_else(|| {
            ToolError::invalid_parameter(tool, "ingredients", "expected an array")
        })?,
    };
    if entries.is_empty() {
        return Err(ToolError::invalid_parameter(
            tool,
            "ingredients",
            "at least one ingredient is required",
        ));
    }

    Ok(entries
        .iter()
        .map(|entry| {
            let food = entry.get("food").and_then(Value::as_str).unwrap_or_default();
            let grams = entry.get("grams").and_then(Value::as_f64).unwrap_or(f64::NAN);
            IngredientInput::new(food.trim(), grams)
        })
        .collect())
}

/// `consumed: [{ "<nutrient>": <amount>, ... }]`
pub fn consumed(params: &Value, tool: &str) -> Result<Vec<NutrientMap>, ToolError> {
    let entries = params
        .get("consumed")
        .and_then(Value::as_array)
        .ok_or_else(|| ToolError::invalid_parameter(tool, "consumed", "expected an array"))?;
    if entries.is_empty() {
        return Err(ToolError::invalid_parameter(
            tool,
            "consumed",
            "at least one consumed entry is required",
        ));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry.as_object().ok_or_else(|| {
                ToolError::invalid_parameter(
                    tool,
                    format!("consumed[{index}]"),
                    "expected an object of nutrient amounts",
                )
            })?;
            object
                .iter()
                .map(|(nutrient, amount)| {
                    amount
                        .as_f64()
                        .or_else(|| canonical_nutrient_key(nutrient).is_none().then_some(f64::NAN))
                        .map(|amount| (nutrient.clone(), amount))
                        .ok_or_else(|| {
                            ToolError::invalid_parameter(
                                tool,
                                format!("consumed[{index}].{nutrient}"),
                                "expected a number",
                            )
                        })
                })
                .collect()
        })
        .collect()
}
