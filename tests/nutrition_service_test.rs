// ABOUTME: Integration tests for the nutrition service over in-memory and SQLite lookups
// ABOUTME: Covers single portions, meals with flagged entries and meal-based gap analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use macro_engine::{
    config::NutritionConfig,
    constants::nutrients::{CALCIUM_MG, ENERGY_KCAL, FIBER_G, PROTEIN_G},
    database::InMemoryFoodLookup,
    errors::ErrorCode,
    intelligence::{gap_analysis::GapClassification, macro_calculator::MealItem},
    models::{FoodRecord, MatchKind, NutrientMap},
    services::{IngredientInput, NutritionService},
};

mod common;

use common::{approx_eq, in_memory_service, sqlite_service};

// ============================================================================
// SINGLE PORTIONS
// ============================================================================

#[tokio::test]
async fn test_calculate_macros_by_partial_name() {
    let service = in_memory_service();
    let portion = service.calculate_macros("banana", 118.0).await.unwrap();

    assert_eq!(portion.match_kind, MatchKind::PartialName);
    assert_eq!(portion.macros.food.food_id, "173944");
    assert!(approx_eq(portion.macros.nutrients[ENERGY_KCAL], 89.0 * 1.18));
    assert!(approx_eq(portion.macros.completeness, 1.0));
}

#[tokio::test]
async fn test_single_portion_of_unknown_food_fails() {
    let service = in_memory_service();
    let err = service.calculate_macros("dragonfruit", 100.0).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_portion_is_validated_before_lookup() {
    let service = in_memory_service();
    let err = service.calculate_macros("dragonfruit", -1.0).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_search_returns_summaries() {
    let service = in_memory_service().with_search_limit(1);
    let hits = service.search_foods("milk", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Milk, whole");
    assert!(hits[0].summary.starts_with("Milk, whole | Category: Dairy and Egg Products"));

    let all = service.search_foods("milk", Some(5)).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_record_without_nutrients_is_incomplete() {
    let mut lookup = InMemoryFoodLookup::new(common::sample_foods());
    lookup.insert(FoodRecord::new("x-empty", "Placeholder entry", "usda"));
    let service = NutritionService::new(Arc::new(lookup), NutritionConfig::default());

    let err = service
        .calculate_macros("Placeholder entry", 100.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IncompleteData);

    let meal = service
        .analyze_meal(&[
            IngredientInput::new("placeholder", 40.0),
            IngredientInput::new("oats", 40.0),
        ])
        .await
        .unwrap();
    assert_eq!(meal.resolved_count, 1);
    match &meal.items[0] {
        MealItem::Unresolved { code, .. } => assert_eq!(*code, ErrorCode::IncompleteData),
        MealItem::Resolved { .. } => panic!("empty record was scaled"),
    }
}

// ============================================================================
// MEALS
// ============================================================================

#[tokio::test]
async fn test_meal_continues_past_unresolved_entries() {
    let service = in_memory_service();
    let meal = service
        .analyze_meal(&[
            IngredientInput::new("oats", 80.0),
            IngredientInput::new("dragonfruit", 150.0),
            IngredientInput::new("milk", 250.0),
            IngredientInput::new("banana", 0.0),
        ])
        .await
        .unwrap();

    assert_eq!(meal.items.len(), 4);
    assert_eq!(meal.resolved_count, 2);
    assert_eq!(meal.unresolved_count, 2);
    assert!(approx_eq(meal.total_grams, 330.0));
    assert!(approx_eq(meal.totals[ENERGY_KCAL], 379.0 * 0.8 + 61.0 * 2.5));
    assert!(approx_eq(meal.totals[FIBER_G], 10.1 * 0.8));

    let codes: Vec<ErrorCode> = meal
        .unresolved_items()
        .map(|item| match item {
            MealItem::Unresolved { code, .. } => *code,
            MealItem::Resolved { .. } => panic!("resolved item in unresolved list"),
        })
        .collect();
    assert_eq!(codes, vec![ErrorCode::ResourceNotFound, ErrorCode::InvalidInput]);

    // oats 1.0 + milk 0.8 over four entries
    assert!(approx_eq(meal.completeness, 1.8 / 4.0));
}

#[tokio::test]
async fn test_meal_with_no_resolved_entries_still_succeeds() {
    let service = in_memory_service();
    let meal = service
        .analyze_meal(&[
            IngredientInput::new("dragonfruit", 100.0),
            IngredientInput::new("oats", -20.0),
        ])
        .await
        .unwrap();

    assert_eq!(meal.resolved_count, 0);
    assert_eq!(meal.unresolved_count, 2);
    assert!(meal.totals.is_empty());
    assert!(approx_eq(meal.total_grams, 0.0));
    assert!(approx_eq(meal.completeness, 0.0));
    assert!(meal.energy_split.is_none());
}

#[tokio::test]
async fn test_empty_meal_is_rejected() {
    let service = in_memory_service();
    let err = service.analyze_meal(&[]).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_sqlite_and_memory_services_agree() {
    let (_dir, sqlite) = sqlite_service().await.unwrap();
    let memory = in_memory_service();
    let ingredients = [
        IngredientInput::new("Oats", 60.0),
        IngredientInput::new("171265", 200.0),
        IngredientInput::new("chocolate", 240.0),
    ];

    let from_sqlite = sqlite.analyze_meal(&ingredients).await.unwrap();
    let from_memory = memory.analyze_meal(&ingredients).await.unwrap();
    assert_eq!(from_sqlite, from_memory);
}

// ============================================================================
// GAP ANALYSIS
// ============================================================================

#[tokio::test]
async fn test_meal_gaps_are_partial_when_entries_are_unresolved() {
    let service = in_memory_service();
    let analysis = service
        .analyze_meal_gaps(
            &[
                IngredientInput::new("milk", 500.0),
                IngredientInput::new("dragonfruit", 150.0),
            ],
            Some("adult_female_19_50"),
        )
        .await
        .unwrap();

    assert!(analysis.partial);
    assert_eq!(analysis.unresolved_items.len(), 1);
    assert_eq!(analysis.unresolved_items[0].query(), "dragonfruit");
    assert_eq!(analysis.report.profile, "adult_female_19_50");

    let calcium = analysis
        .report
        .gaps
        .iter()
        .find(|gap| gap.nutrient == CALCIUM_MG)
        .unwrap();
    assert!(approx_eq(calcium.consumed, 565.0));
    assert_eq!(calcium.classification, GapClassification::Deficient);
    assert!(analysis.report.ignored_nutrients.contains(&"fat_g".to_owned()));
}

#[tokio::test]
async fn test_meal_gaps_use_default_profile() {
    let service = in_memory_service().with_default_profile("child_4_8");
    let analysis = service
        .analyze_meal_gaps(&[IngredientInput::new("oats", 100.0)], None)
        .await
        .unwrap();
    assert_eq!(analysis.report.profile, "child_4_8");
    assert!(!analysis.partial);
}

#[tokio::test]
async fn test_unknown_profile_is_checked_first() {
    let service = in_memory_service();
    let err = service
        .analyze_meal_gaps(&[IngredientInput::new("oats", 100.0)], Some("astronaut"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(err.message.contains("astronaut"));
}

#[test]
fn test_consumed_gaps() {
    let service = in_memory_service();
    let mut day = NutrientMap::new();
    day.insert(PROTEIN_G.to_owned(), 46.0);
    day.insert("unobtainium_mg".to_owned(), 1.0);

    let analysis = service
        .analyze_consumed_gaps(&[day], Some("ADULT_FEMALE_19_50"))
        .unwrap();
    assert!(!analysis.partial);
    assert!(approx_eq(analysis.consumed_totals[PROTEIN_G], 46.0));

    let protein = analysis
        .report
        .gaps
        .iter()
        .find(|gap| gap.nutrient == PROTEIN_G)
        .unwrap();
    assert_eq!(protein.classification, GapClassification::Adequate);
    assert_eq!(analysis.report.ignored_nutrients, vec!["unobtainium_mg".to_owned()]);
}

#[test]
fn test_list_profiles() {
    let service = in_memory_service();
    assert_eq!(service.list_profiles().len(), 9);
}
