// ABOUTME: Food table seeding utility for the macro engine
// ABOUTME: Imports an already-downloaded USDA pipeline CSV into the SQLite lookup table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Food table seeder.
//!
//! Usage:
//! ```bash
//! # Import foods (uses DATABASE_URL from environment)
//! cargo run --bin seed-foods -- --csv data/usda_foods.csv
//!
//! # Override database URL and source tag
//! cargo run --bin seed-foods -- --csv foods.csv --database-url sqlite:./data/foods.db --source usda_sr
//!
//! # Force re-seed (clears existing foods first)
//! cargo run --bin seed-foods -- --csv foods.csv --force
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use macro_engine::{
    config::ServerConfig, constants::service_names, database::Database,
    import::import_usda_csv, logging::LoggingConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-foods",
    about = "Macro engine food table seeder",
    long_about = "Import a USDA FoodData Central pipeline CSV into the food lookup table"
)]
struct SeedArgs {
    /// CSV file to import
    #[arg(long)]
    csv: PathBuf,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Source tag stored on every imported food
    #[arg(long, default_value = "usda")]
    source: String,

    /// Force re-seed even if foods already exist
    #[arg(long)]
    force: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let level = if args.verbose { "debug" } else { "info" };
    LoggingConfig::from_env()
        .with_level(level)
        .with_service_name(service_names::SEED_FOODS)
        .init()?;

    info!("=== Macro Engine Food Seeder ===");

    let config = ServerConfig::from_env()?.with_database_url(args.database_url);
    info!("Connecting to database: {}", config.database_url);
    let database = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Cannot open food database {}", config.database_url))?;
    let foods = database.foods();

    let existing = foods.count().await?;
    if existing > 0 && !args.force {
        info!(
            "Food table already seeded ({} foods). Use --force to re-seed.",
            existing
        );
        return Ok(());
    }
    if existing > 0 {
        let removed = foods.clear().await?;
        info!("Removed {} existing foods", removed);
    }

    info!("Importing {}", args.csv.display());
    let report = import_usda_csv(&args.csv, &foods, &args.source)
        .await
        .with_context(|| format!("Import of {} failed", args.csv.display()))?;

    info!("");
    info!("=== Seeding Complete ===");
    info!("Imported {} foods", report.imported);
    info!("Skipped {} rows without a name", report.skipped);
    if report.invalid_cells > 0 {
        info!("Ignored {} non-numeric nutrient cells", report.invalid_cells);
    }
    info!("Food table now holds {} foods", foods.count().await?);

    Ok(())
}
