// ABOUTME: Import pipelines that populate the food lookup table
// ABOUTME: Currently the USDA FoodData Central CSV export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// USDA pipeline CSV import
pub mod usda_csv;

pub use usda_csv::{import_usda_csv, parse_usda_csv, ImportReport, ParsedFoods};
