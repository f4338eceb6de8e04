// ABOUTME: Nutrition calculation configuration with environment overrides
// ABOUTME: Gap classification thresholds, completeness expectations and DRI table source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition configuration
//!
//! Loaded once per process through [`NutritionConfig::global`]. Tests and
//! library callers that need isolated values call [`NutritionConfig::load`]
//! or build the struct directly.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::constants::defaults;
use crate::constants::nutrients::{
    canonical_nutrient_key, CARBOHYDRATE_G, ENERGY_KCAL, FAT_G, FIBER_G, PROTEIN_G,
};
use crate::errors::{AppError, ErrorCode};
use crate::intelligence::dri::DriTable;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bounds are inconsistent with each other
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Environment value could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A listed nutrient is not a known nutrient
    #[error("Unknown nutrient: {0}")]
    UnknownNutrient(String),

    /// The custom DRI table could not be loaded
    #[error("DRI table error: {0}")]
    DriTable(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let code = match &error {
            ConfigError::Parse(_) => ErrorCode::ConfigError,
            _ => ErrorCode::ConfigInvalid,
        };
        Self::new(code, error.to_string())
    }
}

/// Percent-of-target bounds for gap classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapThresholdsConfig {
    /// Below this percent of target a nutrient is deficient
    pub adequate_min_percent: f64,
    /// Above this percent of target a nutrient is in excess
    pub excess_above_percent: f64,
}

impl Default for GapThresholdsConfig {
    fn default() -> Self {
        Self {
            adequate_min_percent: defaults::ADEQUATE_MIN_PERCENT,
            excess_above_percent: defaults::EXCESS_ABOVE_PERCENT,
        }
    }
}

impl GapThresholdsConfig {
    /// Validate `0 < adequate_min <= 100 <= excess_above`
    ///
    /// 100 % must always classify as adequate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` when the bounds violate the ordering
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.adequate_min_percent;
        let max = self.excess_above_percent;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::InvalidRange(
                "gap thresholds must be finite".to_owned(),
            ));
        }
        if min <= 0.0 || min > 100.0 {
            return Err(ConfigError::InvalidRange(format!(
                "adequate_min_percent must be in (0, 100], got {min}"
            )));
        }
        if max < 100.0 {
            return Err(ConfigError::InvalidRange(format!(
                "excess_above_percent must be at least 100, got {max}"
            )));
        }
        Ok(())
    }
}

/// Nutrients whose presence defines a record's completeness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessConfig {
    /// Canonical keys expected in every record
    pub expected_nutrients: Vec<String>,
}

impl Default for CompletenessConfig {
    fn default() -> Self {
        Self {
            expected_nutrients: [ENERGY_KCAL, PROTEIN_G, CARBOHYDRATE_G, FAT_G, FIBER_G]
                .iter()
                .map(|key| (*key).to_owned())
                .collect(),
        }
    }
}

impl CompletenessConfig {
    /// Parse a comma separated nutrient list, canonicalizing each name
    ///
    /// Blank entries are skipped and repeated nutrients kept once. An empty
    /// list is allowed and makes every record complete.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownNutrient` for a name that is not tracked
    pub fn parse_list(list: &str) -> Result<Self, ConfigError> {
        let mut expected_nutrients: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let key = canonical_nutrient_key(name)
                .ok_or_else(|| ConfigError::UnknownNutrient(name.to_owned()))?;
            if !expected_nutrients.iter().any(|k| k == key) {
                expected_nutrients.push(key.to_owned());
            }
        }
        Ok(Self { expected_nutrients })
    }
}

/// Nutrition configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NutritionConfig {
    /// Gap classification thresholds
    pub gap_thresholds: GapThresholdsConfig,
    /// Completeness expectations for scaled records
    pub completeness: CompletenessConfig,
    /// Custom DRI table file, `None` for the built-in table
    pub dri_table_path: Option<PathBuf>,
    /// The DRI table in effect
    pub dri_table: DriTable,
}

static NUTRITION_CONFIG: OnceLock<NutritionConfig> = OnceLock::new();

impl NutritionConfig {
    /// Get the process-wide configuration, loading it on first use
    ///
    /// # Errors
    ///
    /// Returns the [`NutritionConfig::load`] error when the first load
    /// fails; nothing is stored in that case
    pub fn global() -> Result<&'static Self, ConfigError> {
        if let Some(config) = NUTRITION_CONFIG.get() {
            return Ok(config);
        }
        let loaded = Self::load()?;
        Ok(NUTRITION_CONFIG.get_or_init(|| loaded))
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value fails to parse, the
    /// thresholds are inconsistent, or the custom DRI table is invalid
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config = config.apply_env_overrides()?;
        config.validate()?;
        config.load_dri_table()?;
        Ok(config)
    }

    /// Validate all sections
    ///
    /// # Errors
    ///
    /// Returns the first failing section's error
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gap_thresholds.validate()
    }

    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: '{val}'")))?;
        }
        Ok(())
    }

    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        Self::apply_env_var(
            "GAP_ADEQUATE_MIN_PERCENT",
            &mut self.gap_thresholds.adequate_min_percent,
        )?;
        Self::apply_env_var(
            "GAP_EXCESS_ABOVE_PERCENT",
            &mut self.gap_thresholds.excess_above_percent,
        )?;

        if let Ok(list) = env::var("MACRO_ENGINE_EXPECTED_NUTRIENTS") {
            self.completeness = CompletenessConfig::parse_list(&list)?;
        }

        if let Ok(path) = env::var("MACRO_ENGINE_DRI_TABLE") {
            let path = path.trim();
            if !path.is_empty() {
                self.dri_table_path = Some(PathBuf::from(path));
            }
        }

        Ok(self)
    }

    fn load_dri_table(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &self.dri_table_path {
            self.dri_table = DriTable::from_file(path)
                .map_err(|e| ConfigError::DriTable(format!("{}: {}", path.display(), e.message)))?;
            info!(
                dri.path = %path.display(),
                dri.profiles = self.dri_table.profiles().len(),
                "Loaded custom DRI table"
            );
        }
        Ok(())
    }
}
