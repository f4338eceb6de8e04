// ABOUTME: macro-engine CLI - food lookup, portion macros, meal totals and DRI gap analysis
// ABOUTME: Prints JSON on stdout; logs go to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Resolve a food by id or name
//! macro-engine lookup "banana"
//!
//! # Macros for a 150 g portion
//! macro-engine macros "oats" --grams 150
//!
//! # Meal totals
//! macro-engine meal --item "oats=80" --item "whole milk=250"
//!
//! # Gap analysis against a DRI profile
//! macro-engine gaps --profile adult_female_19_50 --file day.json
//!
//! # Execute a JSON tool request from stdin
//! echo '{"tool":"list_dri_profiles"}' | macro-engine tool -
//! ```

mod commands;
mod display;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use macro_engine::{
    config::{NutritionConfig, ServerConfig},
    constants::service_names,
    database::{lookup::SqliteFoodLookup, Database},
    logging::LoggingConfig,
    services::NutritionService,
    tools::ToolExecutor,
};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "macro-engine",
    about = "Macro calculation engine",
    long_about = "Scale USDA per-100 g nutrient data to portions, total meals, and compare intake against Dietary Reference Intakes."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Resolve a food by id, exact name, or name fragment
    Lookup {
        /// Food id or name
        food: String,
    },

    /// Search foods by name or common name
    Search {
        /// Name fragment
        query: String,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Nutrients of one food scaled to a portion
    Macros {
        /// Food id or name
        food: String,

        /// Portion in grams
        #[arg(long)]
        grams: f64,
    },

    /// Total nutrients of a meal
    Meal {
        /// Ingredient as "<food>=<grams>", repeatable
        #[arg(long = "item", required_unless_present = "file")]
        items: Vec<String>,

        /// JSON file with a list of {"food", "grams"} objects
        #[arg(long, conflicts_with = "items")]
        file: Option<PathBuf>,
    },

    /// Compare a meal against a DRI profile
    Gaps {
        /// DRI profile key; defaults to MACRO_ENGINE_DEFAULT_PROFILE
        #[arg(long)]
        profile: Option<String>,

        /// Ingredient as "<food>=<grams>", repeatable
        #[arg(long = "item", required_unless_present = "file")]
        items: Vec<String>,

        /// JSON file with a list of {"food", "grams"} objects
        #[arg(long, conflicts_with = "items")]
        file: Option<PathBuf>,
    },

    /// List DRI profiles and their targets
    Profiles,

    /// List tool definitions
    Tools,

    /// Execute a JSON tool request ("-" reads it from stdin)
    Tool {
        /// Request body: {"tool": <name>, "parameters": {...}}
        request: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env().with_service_name(service_names::MACRO_ENGINE);
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging.init()?;

    let nutrition_config = NutritionConfig::global().context("Invalid nutrition configuration")?;
    let server_config = ServerConfig::from_env()?.with_database_url(cli.database_url);

    let output = match cli.command {
        Command::Profiles => Ok(commands::profiles(&nutrition_config.dri_table)),
        Command::Tools => Ok(commands::tools()),
        Command::Lookup { food } => {
            let service = open_service(&server_config, nutrition_config).await?;
            commands::lookup(&service, &food).await
        }
        Command::Search { query, limit } => {
            let service = open_service(&server_config, nutrition_config).await?;
            commands::search(&service, &query, limit).await
        }
        Command::Macros { food, grams } => {
            let service = open_service(&server_config, nutrition_config).await?;
            commands::macros(&service, &food, grams).await
        }
        Command::Meal { items, file } => {
            let service = open_service(&server_config, nutrition_config).await?;
            commands::meal(&service, &items, file.as_deref()).await
        }
        Command::Gaps {
            profile,
            items,
            file,
        } => {
            let service = open_service(&server_config, nutrition_config).await?;
            commands::gaps(&service, profile.as_deref(), &items, file.as_deref()).await
        }
        Command::Tool { request } => {
            let service = open_service(&server_config, nutrition_config).await?;
            let executor = ToolExecutor::new(service);
            let response = commands::tool(&executor, &request).await?;
            let code = if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
            display::print_json(&response, cli.pretty)?;
            return Ok(code);
        }
    };

    match output {
        Ok(value) => {
            display::print_json(&value, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            display::print_error(&error, cli.pretty)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Open the food table read-only and build the service over it
async fn open_service(
    server_config: &ServerConfig,
    nutrition_config: &NutritionConfig,
) -> Result<NutritionService> {
    debug!("Opening food database: {}", server_config.database_url);
    let database = Database::open_read_only(&server_config.database_url)
        .await
        .with_context(|| format!("Cannot open food database {}", server_config.database_url))?;

    let lookup = Arc::new(SqliteFoodLookup::new(database.pool().clone()));
    Ok(NutritionService::new(lookup, nutrition_config.clone())
        .with_default_profile(server_config.default_profile.clone())
        .with_search_limit(server_config.search_limit))
}
