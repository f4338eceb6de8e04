// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides sample foods, in-memory and on-disk lookups, and service setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `macro_engine`

use std::sync::{Arc, Once};

use anyhow::Result;
use macro_engine::{
    config::NutritionConfig,
    constants::nutrients::{
        CALCIUM_MG, CARBOHYDRATE_G, ENERGY_KCAL, FAT_G, FIBER_G, IRON_MG, MAGNESIUM_MG,
        POTASSIUM_MG, PROTEIN_G, VITAMIN_B12_MCG, VITAMIN_C_MG, VITAMIN_D_MCG,
    },
    database::{Database, InMemoryFoodLookup, SqliteFoodLookup},
    models::FoodRecord,
    services::NutritionService,
};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Rolled oats, every expected nutrient present
pub fn oats() -> FoodRecord {
    FoodRecord::new("173904", "Oats", "usda")
        .with_category("Cereal Grains and Pasta")
        .with_nutrient(ENERGY_KCAL, 379.0)
        .with_nutrient(PROTEIN_G, 13.15)
        .with_nutrient(CARBOHYDRATE_G, 67.7)
        .with_nutrient(FAT_G, 6.52)
        .with_nutrient(FIBER_G, 10.1)
        .with_nutrient(IRON_MG, 4.25)
        .with_nutrient(MAGNESIUM_MG, 138.0)
}

/// Raw banana, found by its common name
pub fn banana() -> FoodRecord {
    FoodRecord::new("173944", "Bananas, raw", "usda")
        .with_common_name("banana")
        .with_category("Fruits and Fruit Juices")
        .with_nutrient(ENERGY_KCAL, 89.0)
        .with_nutrient(PROTEIN_G, 1.09)
        .with_nutrient(CARBOHYDRATE_G, 22.84)
        .with_nutrient(FAT_G, 0.33)
        .with_nutrient(FIBER_G, 2.6)
        .with_nutrient(POTASSIUM_MG, 358.0)
        .with_nutrient(VITAMIN_C_MG, 8.7)
}

/// Whole milk, no fiber column
pub fn whole_milk() -> FoodRecord {
    FoodRecord::new("171265", "Milk, whole", "usda")
        .with_category("Dairy and Egg Products")
        .with_nutrient(ENERGY_KCAL, 61.0)
        .with_nutrient(PROTEIN_G, 3.15)
        .with_nutrient(CARBOHYDRATE_G, 4.8)
        .with_nutrient(FAT_G, 3.25)
        .with_nutrient(CALCIUM_MG, 113.0)
        .with_nutrient(VITAMIN_D_MCG, 1.3)
        .with_nutrient(VITAMIN_B12_MCG, 0.45)
}

/// Longer name that also contains "milk"
pub fn chocolate_milk() -> FoodRecord {
    FoodRecord::new("171266", "Milk, chocolate, reduced fat", "usda")
        .with_brand("Dairy Co")
        .with_nutrient(ENERGY_KCAL, 76.0)
        .with_nutrient(PROTEIN_G, 2.99)
        .with_nutrient(CARBOHYDRATE_G, 12.13)
        .with_nutrient(FAT_G, 1.9)
}

/// All fixture foods
pub fn sample_foods() -> Vec<FoodRecord> {
    vec![oats(), banana(), whole_milk(), chocolate_milk()]
}

/// Service over the fixture foods held in memory
pub fn in_memory_service() -> NutritionService {
    init_test_logging();
    NutritionService::new(
        Arc::new(InMemoryFoodLookup::new(sample_foods())),
        NutritionConfig::default(),
    )
}

/// On-disk database seeded with the fixture foods
///
/// Keep the returned `TempDir` alive for as long as the database is used.
pub async fn seeded_database() -> Result<(TempDir, String, Database)> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite:{}", dir.path().join("foods.db").display());
    let database = Database::new(&url).await?;
    database.foods().upsert_batch(&sample_foods()).await?;
    Ok((dir, url, database))
}

/// Service over a seeded on-disk database
pub async fn sqlite_service() -> Result<(TempDir, NutritionService)> {
    let (dir, _url, database) = seeded_database().await?;
    let lookup = Arc::new(SqliteFoodLookup::new(database.pool().clone()));
    Ok((dir, NutritionService::new(lookup, NutritionConfig::default())))
}

/// Absolute tolerance comparison for nutrient amounts
pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
