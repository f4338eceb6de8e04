// ABOUTME: Integration tests for the JSON tool surface
// ABOUTME: Exercises every built-in tool through the executor and checks the response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use macro_engine::{
    constants::tools::ALL_TOOLS,
    errors::ErrorCode,
    tools::{ToolExecutor, ToolRequest, ToolResponse},
};
use serde_json::{json, Value};
use uuid::Uuid;

mod common;

use common::in_memory_service;

fn executor() -> ToolExecutor {
    ToolExecutor::new(in_memory_service())
}

async fn call(tool: &str, parameters: Value) -> ToolResponse {
    executor().execute(ToolRequest::new(tool, parameters)).await
}

fn error_code(response: &ToolResponse) -> ErrorCode {
    assert!(!response.success, "expected failure: {response:?}");
    assert!(response.result.is_none());
    response.error.as_ref().unwrap().code
}

// ============================================================================
// ENVELOPE
// ============================================================================

#[tokio::test]
async fn test_success_envelope() {
    let response = call("lookup_food", json!({ "food": "oats" })).await;

    assert!(response.success);
    assert!(response.error.is_none());
    assert_eq!(response.metadata.tool, "lookup_food");
    assert!(Uuid::parse_str(&response.metadata.request_id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&response.metadata.executed_at).is_ok());

    let json = serde_json::to_value(&response).unwrap();
    for field in ["success", "result", "error", "metadata"] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["result"]["match_kind"], "exact_name");
    assert_eq!(json["result"]["record"]["food_id"], "173904");
}

#[tokio::test]
async fn test_raw_json_requests() {
    let executor = executor();

    let response = executor
        .execute_json(r#"{"tool":"list_dri_profiles"}"#)
        .await;
    assert!(response.success);
    assert_eq!(response.result.unwrap()["count"], 9);

    let response = executor.execute_json("{not json").await;
    assert_eq!(error_code(&response), ErrorCode::InvalidFormat);
    assert_eq!(response.metadata.tool, "");
}

#[tokio::test]
async fn test_unknown_tool_and_bad_parameters() {
    let response = call("bake_cake", json!({})).await;
    assert_eq!(error_code(&response), ErrorCode::ResourceNotFound);
    assert_eq!(response.error.unwrap().details.unwrap()["tool"], "bake_cake");

    let response = call("calculate_macros", json!([1, 2])).await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);

    let response = call("calculate_macros", json!({ "food": "oats" })).await;
    assert_eq!(error_code(&response), ErrorCode::MissingRequiredField);

    let response = call("calculate_macros", json!({ "food": "oats", "grams": "lots" })).await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_list_tools_matches_registry() {
    let definitions = executor().list_tools();
    let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ALL_TOOLS);
    for definition in &definitions {
        assert_eq!(definition.input_schema.schema_type, "object");
        assert!(!definition.description.is_empty());
    }
}

// ============================================================================
// TOOLS
// ============================================================================

#[tokio::test]
async fn test_search_foods_tool() {
    let response = call("search_foods", json!({ "query": "milk", "limit": 1 })).await;
    let result = response.result.unwrap();
    assert_eq!(result["count"], 1);
    assert_eq!(result["foods"][0]["name"], "Milk, whole");

    let response = call("search_foods", json!({ "query": "milk", "limit": 0 })).await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_calculate_macros_tool() {
    let response = call("calculate_macros", json!({ "food": "Milk, whole", "grams": 200 })).await;
    let result = response.result.unwrap();
    assert_eq!(result["query"], "Milk, whole");
    assert_eq!(result["grams"], 200.0);
    assert_eq!(result["missing_nutrients"], json!(["fiber_g"]));
    assert!((result["nutrients"]["energy_kcal"].as_f64().unwrap() - 122.0).abs() < 1e-9);

    let response = call("calculate_macros", json!({ "food": "dragonfruit", "grams": 100 })).await;
    assert_eq!(error_code(&response), ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_analyze_meal_tool_flags_unresolved_entries() {
    let response = call(
        "analyze_meal",
        json!({ "ingredients": [
            { "food": "oats", "grams": 50 },
            { "food": "dragonfruit", "grams": 100 }
        ]}),
    )
    .await;

    assert!(response.success);
    let result = response.result.unwrap();
    assert_eq!(result["resolved_count"], 1);
    assert_eq!(result["unresolved_count"], 1);
    assert_eq!(result["items"][1]["status"], "unresolved");
    assert_eq!(result["items"][1]["code"], "RESOURCE_NOT_FOUND");

    let response = call("analyze_meal", json!({ "ingredients": [] })).await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_analyze_meal_tool_flags_malformed_entries() {
    let response = call(
        "analyze_meal",
        json!({ "ingredients": [
            { "food": "oats", "grams": 80 },
            { "food": "", "grams": 50 },
            { "food": "milk" },
            { "food": "banana", "grams": "a handful" }
        ]}),
    )
    .await;

    assert!(response.success, "{response:?}");
    let result = response.result.unwrap();
    assert_eq!(result["resolved_count"], 1);
    assert_eq!(result["unresolved_count"], 3);
    for index in 1..=3 {
        assert_eq!(result["items"][index]["status"], "unresolved");
        assert_eq!(result["items"][index]["code"], "INVALID_INPUT");
    }
    assert!((result["totals"]["protein_g"].as_f64().unwrap() - 13.15 * 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_gap_tool_ignores_untracked_values() {
    let response = call(
        "analyze_nutrient_gaps",
        json!({
            "profile": "adult_female_19_50",
            "consumed": [{ "protein_g": 46, "caffeine": -1, "ginseng": "plenty" }]
        }),
    )
    .await;

    assert!(response.success, "{response:?}");
    let result = response.result.unwrap();
    assert_eq!(result["ignored_nutrients"], json!(["caffeine", "ginseng"]));

    let response = call(
        "analyze_nutrient_gaps",
        json!({ "consumed": [{ "protein_g": -46 }] }),
    )
    .await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_analyze_nutrient_gaps_tool() {
    let response = call(
        "analyze_nutrient_gaps",
        json!({
            "profile": "adult_male_19_50",
            "consumed": [{ "protein_g": 30 }, { "protein": 26, "unobtainium_mg": 4 }]
        }),
    )
    .await;
    let result = response.result.unwrap();
    assert_eq!(result["profile"], "adult_male_19_50");
    assert_eq!(result["partial"], false);
    assert_eq!(result["ignored_nutrients"], json!(["unobtainium_mg"]));
    let protein = result["gaps"]
        .as_array()
        .unwrap()
        .iter()
        .find(|gap| gap["nutrient"] == "protein_g")
        .unwrap();
    assert_eq!(protein["classification"], "adequate");

    let response = call(
        "analyze_nutrient_gaps",
        json!({ "ingredients": [{ "food": "milk", "grams": 250 }, { "food": "dragonfruit", "grams": 10 }] }),
    )
    .await;
    let result = response.result.unwrap();
    assert_eq!(result["partial"], true);
    assert_eq!(result["profile"], "adult_male_19_50");
}

#[tokio::test]
async fn test_analyze_nutrient_gaps_tool_parameter_errors() {
    let response = call("analyze_nutrient_gaps", json!({})).await;
    assert_eq!(error_code(&response), ErrorCode::MissingRequiredField);

    let response = call(
        "analyze_nutrient_gaps",
        json!({
            "ingredients": [{ "food": "oats", "grams": 50 }],
            "consumed": [{ "protein_g": 30 }]
        }),
    )
    .await;
    assert_eq!(error_code(&response), ErrorCode::InvalidInput);

    let response = call(
        "analyze_nutrient_gaps",
        json!({ "profile": "astronaut", "consumed": [{ "protein_g": 30 }] }),
    )
    .await;
    assert_eq!(error_code(&response), ErrorCode::ResourceNotFound);
}
