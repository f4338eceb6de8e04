// ABOUTME: Calculation layer of the engine: scaling, aggregation and DRI comparison
// ABOUTME: Pure functions over food records and nutrient maps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Everything here is stateless and performs no I/O; the service layer
//! resolves foods and hands the records to these functions.

/// Dietary Reference Intake tables
pub mod dri;
/// Nutrient gap analysis against a DRI profile
pub mod gap_analysis;
/// Portion scaling and meal aggregation
pub mod macro_calculator;

pub use dri::{DriProfile, DriTable, NutrientTarget};
pub use gap_analysis::{
    analyze_gaps, classify, GapClassification, GapReport, GapSummary, NutrientGap,
};
pub use macro_calculator::{
    aggregate, energy_split, scale, sum_nutrients, EnergySplit, FoodReference, MacroResult,
    MealAggregate, MealItem,
};
