// ABOUTME: Environment configuration for database location and request defaults
// ABOUTME: Parses DATABASE_URL and MACRO_ENGINE_* variables with fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based runtime configuration

use crate::constants::defaults;
use anyhow::{Context, Result};
use std::env;
use tracing::debug;

/// Runtime configuration shared by the binaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `SQLite` connection URL of the food table
    pub database_url: String,
    /// DRI profile used when a request names none
    pub default_profile: String,
    /// Result count for searches that do not pass a limit
    pub search_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_owned(),
            default_profile: defaults::DRI_PROFILE.to_owned(),
            search_limit: defaults::SEARCH_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `MACRO_ENGINE_SEARCH_LIMIT` is not a positive
    /// integer
    pub fn from_env() -> Result<Self> {
        let search_limit: usize = env_var_or(
            "MACRO_ENGINE_SEARCH_LIMIT",
            &defaults::SEARCH_LIMIT.to_string(),
        )
        .parse()
        .context("Invalid MACRO_ENGINE_SEARCH_LIMIT value")?;

        if search_limit == 0 {
            anyhow::bail!("MACRO_ENGINE_SEARCH_LIMIT must be at least 1");
        }

        let config = Self {
            database_url: env_var_or("DATABASE_URL", defaults::DATABASE_URL),
            default_profile: env_var_or("MACRO_ENGINE_DEFAULT_PROFILE", defaults::DRI_PROFILE),
            search_limit: search_limit.min(defaults::MAX_SEARCH_LIMIT),
        };

        debug!(
            database.url = %config.database_url,
            dri.profile = %config.default_profile,
            search.limit = config.search_limit,
            "Loaded environment configuration"
        );
        Ok(config)
    }

    /// Replace the database URL when one was given on the command line
    #[must_use]
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database_url = url;
        }
        self
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}
