// ABOUTME: Dietary Reference Intake tables keyed by demographic profile
// ABOUTME: Built-in DRI targets plus loading and validation of custom JSON tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! DRI Tables
//!
//! Fixed daily nutrient targets per demographic profile. Values are the
//! RDA where one exists and the Adequate Intake otherwise; energy uses the
//! Estimated Energy Requirement for a moderately active person.
//!
//! # References
//!
//! - Institute of Medicine (2005). *Dietary Reference Intakes for Energy,
//!   Carbohydrate, Fiber, Fat, Fatty Acids, Cholesterol, Protein, and Amino
//!   Acids*. The National Academies Press. <https://doi.org/10.17226/10490>
//! - Institute of Medicine (2011). *Dietary Reference Intakes for Calcium
//!   and Vitamin D*. The National Academies Press. <https://doi.org/10.17226/13050>
//! - National Academies (2019). *Dietary Reference Intakes for Sodium and
//!   Potassium*. The National Academies Press. <https://doi.org/10.17226/25353>

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::nutrients::{
    canonical_nutrient_key, CALCIUM_MG, CARBOHYDRATE_G, ENERGY_KCAL, FIBER_G, IRON_MG,
    MAGNESIUM_MG, POTASSIUM_MG, PROTEIN_G, SODIUM_MG, VITAMIN_B12_MCG, VITAMIN_C_MG,
    VITAMIN_D_MCG,
};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Daily target for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientTarget {
    /// Canonical nutrient key
    pub nutrient: String,
    /// Daily target amount in the nutrient's unit
    pub amount: f64,
}

/// Targets for one demographic profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriProfile {
    /// Profile key, e.g. `adult_female_19_50`
    pub key: String,
    /// Human-readable description
    pub label: String,
    /// Targets in report order
    pub targets: Vec<NutrientTarget>,
}

impl DriProfile {
    /// Target amount for a nutrient, if the profile lists it
    #[must_use]
    pub fn target(&self, nutrient: &str) -> Option<f64> {
        self.targets
            .iter()
            .find(|target| target.nutrient == nutrient)
            .map(|target| target.amount)
    }
}

/// A complete DRI table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriTable {
    profiles: Vec<DriProfile>,
}

/// Nutrient order of the built-in rows
const BUILTIN_COLUMNS: [&str; 12] = [
    ENERGY_KCAL,
    PROTEIN_G,
    CARBOHYDRATE_G,
    FIBER_G,
    CALCIUM_MG,
    IRON_MG,
    MAGNESIUM_MG,
    POTASSIUM_MG,
    SODIUM_MG,
    VITAMIN_C_MG,
    VITAMIN_D_MCG,
    VITAMIN_B12_MCG,
];

/// Built-in profiles: key, label, then one amount per `BUILTIN_COLUMNS` entry
#[rustfmt::skip]
const BUILTIN_ROWS: &[(&str, &str, [f64; 12])] = &[
    ("child_4_8", "Children 4-8 years",
        [1400.0, 19.0, 130.0, 25.0, 1000.0, 10.0, 130.0, 2300.0, 1000.0, 25.0, 15.0, 1.2]),
    ("teen_male_14_18", "Males 14-18 years",
        [2800.0, 52.0, 130.0, 38.0, 1300.0, 11.0, 410.0, 3000.0, 1500.0, 75.0, 15.0, 2.4]),
    ("teen_female_14_18", "Females 14-18 years",
        [2000.0, 46.0, 130.0, 26.0, 1300.0, 15.0, 360.0, 2300.0, 1500.0, 65.0, 15.0, 2.4]),
    ("adult_male_19_50", "Males 19-50 years",
        [2500.0, 56.0, 130.0, 38.0, 1000.0, 8.0, 420.0, 3400.0, 1500.0, 90.0, 15.0, 2.4]),
    ("adult_female_19_50", "Females 19-50 years",
        [2000.0, 46.0, 130.0, 25.0, 1000.0, 18.0, 320.0, 2600.0, 1500.0, 75.0, 15.0, 2.4]),
    ("adult_male_51_plus", "Males 51+ years",
        [2200.0, 56.0, 130.0, 30.0, 1000.0, 8.0, 420.0, 3400.0, 1500.0, 90.0, 15.0, 2.4]),
    ("adult_female_51_plus", "Females 51+ years",
        [1800.0, 46.0, 130.0, 21.0, 1200.0, 8.0, 320.0, 2600.0, 1500.0, 75.0, 15.0, 2.4]),
    ("pregnant", "Pregnancy, 19-50 years",
        [2400.0, 71.0, 175.0, 28.0, 1000.0, 27.0, 350.0, 2900.0, 1500.0, 85.0, 15.0, 2.6]),
    ("lactating", "Lactation, 19-50 years",
        [2500.0, 71.0, 210.0, 29.0, 1000.0, 9.0, 310.0, 2800.0, 1500.0, 120.0, 15.0, 2.8]),
];

static BUILTIN_TABLE: LazyLock<DriTable> = LazyLock::new(|| {
    let profiles = BUILTIN_ROWS
        .iter()
        .map(|(key, label, amounts)| DriProfile {
            key: (*key).to_owned(),
            label: (*label).to_owned(),
            targets: BUILTIN_COLUMNS
                .iter()
                .zip(amounts)
                .map(|(nutrient, amount)| NutrientTarget {
                    nutrient: (*nutrient).to_owned(),
                    amount: *amount,
                })
                .collect(),
        })
        .collect();
    DriTable { profiles }
});

impl Default for DriTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl DriTable {
    /// The built-in table
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_TABLE
    }

    /// Build a table from profiles, canonicalizing and validating them
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the table is empty, a profile key repeats,
    /// a profile has no targets, a nutrient is unknown or repeated, or an
    /// amount is not a positive finite number
    pub fn from_profiles(profiles: Vec<DriProfile>) -> AppResult<Self> {
        if profiles.is_empty() {
            return Err(invalid_table("table contains no profiles"));
        }

        let mut seen_keys = HashSet::new();
        let mut validated = Vec::with_capacity(profiles.len());
        for mut profile in profiles {
            profile.key = profile.key.trim().to_lowercase();
            if profile.key.is_empty() {
                return Err(invalid_table("profile key must not be empty"));
            }
            if !seen_keys.insert(profile.key.clone()) {
                return Err(invalid_table(format!(
                    "duplicate profile '{}'",
                    profile.key
                )));
            }
            if profile.targets.is_empty() {
                return Err(invalid_table(format!(
                    "profile '{}' has no targets",
                    profile.key
                )));
            }

            let mut seen_nutrients = HashSet::new();
            for target in &mut profile.targets {
                let key = canonical_nutrient_key(&target.nutrient).ok_or_else(|| {
                    invalid_table(format!(
                        "profile '{}' names unknown nutrient '{}'",
                        profile.key, target.nutrient
                    ))
                })?;
                if !seen_nutrients.insert(key) {
                    return Err(invalid_table(format!(
                        "profile '{}' lists '{key}' twice",
                        profile.key
                    )));
                }
                if !target.amount.is_finite() || target.amount <= 0.0 {
                    return Err(invalid_table(format!(
                        "profile '{}' target for '{key}' must be positive, got {}",
                        profile.key, target.amount
                    )));
                }
                key.clone_into(&mut target.nutrient);
            }
            validated.push(profile);
        }

        Ok(Self {
            profiles: validated,
        })
    }

    /// Parse and validate a JSON table of the form `{"profiles": [...]}`
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` for malformed JSON and `ConfigInvalid`
    /// for a table that fails validation
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Self::from_profiles(raw.profiles)
    }

    /// Load a JSON table from disk
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read, otherwise the
    /// errors of [`DriTable::from_json_str`]
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::from(e).with_details(json!({ "path": path.display().to_string() }))
        })?;
        Self::from_json_str(&contents)
    }

    /// All profiles in table order
    #[must_use]
    pub fn profiles(&self) -> &[DriProfile] {
        &self.profiles
    }

    /// Profile keys in table order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.key.as_str()).collect()
    }

    /// Look up a profile, ignoring case and surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` listing the available keys
    pub fn get(&self, key: &str) -> AppResult<&DriProfile> {
        let wanted = key.trim();
        self.profiles
            .iter()
            .find(|profile| profile.key.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::not_found(format!("DRI profile '{wanted}'"))
                    .with_details(json!({ "available_profiles": self.keys() }))
            })
    }
}

fn invalid_table(message: impl Into<String>) -> AppError {
    AppError::new(
        ErrorCode::ConfigInvalid,
        format!("Invalid DRI table: {}", message.into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let table = DriTable::builtin();
        assert_eq!(table.profiles().len(), 9);
        for profile in table.profiles() {
            assert_eq!(profile.targets.len(), BUILTIN_COLUMNS.len());
            assert!(profile.targets.iter().all(|t| t.amount > 0.0));
        }

        let female = table.get("adult_female_19_50").unwrap();
        assert!((female.target(IRON_MG).unwrap() - 18.0).abs() < f64::EPSILON);
        assert!((female.target(PROTEIN_G).unwrap() - 46.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builtin_table_passes_validation() {
        let rebuilt = DriTable::from_profiles(DriTable::builtin().profiles().to_vec()).unwrap();
        assert_eq!(&rebuilt, DriTable::builtin());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = DriTable::builtin();
        assert_eq!(table.get(" Pregnant ").unwrap().key, "pregnant");
    }

    #[test]
    fn test_unknown_profile_lists_available_keys() {
        let err = DriTable::builtin().get("astronaut").unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
        let details = err.details.unwrap();
        assert_eq!(details["available_profiles"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_custom_table_canonicalizes_nutrients() {
        let table = DriTable::from_json_str(
            r#"{"profiles":[{"key":"Athlete","label":"Endurance athlete",
                "targets":[{"nutrient":"protein","amount":120},{"nutrient":"Iron_Fe","amount":18}]}]}"#,
        )
        .unwrap();
        let athlete = table.get("athlete").unwrap();
        assert_eq!(athlete.targets[0].nutrient, PROTEIN_G);
        assert_eq!(athlete.targets[1].nutrient, IRON_MG);
    }

    #[test]
    fn test_custom_table_rejects_bad_entries() {
        let unknown = DriTable::from_json_str(
            r#"{"profiles":[{"key":"x","label":"x","targets":[{"nutrient":"caffeine","amount":1}]}]}"#,
        )
        .unwrap_err();
        assert_eq!(unknown.code, ErrorCode::ConfigInvalid);

        let zero = DriTable::from_json_str(
            r#"{"profiles":[{"key":"x","label":"x","targets":[{"nutrient":"protein_g","amount":0}]}]}"#,
        )
        .unwrap_err();
        assert!(zero.message.contains("must be positive"));

        let empty = DriTable::from_json_str(r#"{"profiles":[]}"#).unwrap_err();
        assert_eq!(empty.code, ErrorCode::ConfigInvalid);

        let malformed = DriTable::from_json_str("{").unwrap_err();
        assert_eq!(malformed.code, ErrorCode::SerializationError);
    }
}
