// ABOUTME: Main library entry point for the macro calculation engine
// ABOUTME: Food lookup, portion scaling, meal aggregation and DRI gap analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Engine
//!
//! A macro calculation engine over a USDA-derived food table. The crate is
//! organized in three layers:
//!
//! - **Lookup**: resolve a food by id or name into a per-100 g nutrient
//!   record stored in `SQLite` ([`database`])
//! - **Calculation**: pure scaling and aggregation of nutrient maps
//!   ([`intelligence::macro_calculator`])
//! - **Comparison**: consumed totals versus Dietary Reference Intake
//!   targets for a demographic profile ([`intelligence::gap_analysis`])
//!
//! The [`services`] layer wires the three together and the [`tools`]
//! module exposes them through a JSON `{ "tool", "parameters" }` surface.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use macro_engine::config::nutrition::NutritionConfig;
//! use macro_engine::database::{Database, SqliteFoodLookup};
//! use macro_engine::errors::AppResult;
//! use macro_engine::services::NutritionService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = Database::open_read_only("sqlite:./data/foods.db").await?;
//!     let lookup = Arc::new(SqliteFoodLookup::new(database.pool().clone()));
//!     let service = NutritionService::new(lookup, NutritionConfig::load()?);
//!
//!     let macros = service.calculate_macros("banana", 118.0).await?;
//!     println!("{:?}", macros.macros.nutrients);
//!     Ok(())
//! }
//! ```

/// Unified error handling re-exported from the core crate
pub use macro_engine_core::errors;

/// Application constants re-exported from the core crate
pub use macro_engine_core::constants;

/// Environment-driven configuration
pub mod config;

/// Food lookup table persistence
pub mod database;

/// USDA pipeline CSV import
pub mod import;

/// Scaling, aggregation, DRI tables and gap analysis
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Core data models
pub mod models;

/// Request-level orchestration over lookup and calculation
pub mod services;

/// JSON tool request/response surface
pub mod tools;
