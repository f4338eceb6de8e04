// ABOUTME: Core data models for food records and lookup results
// ABOUTME: FoodRecord holds per-100 g nutrient amounts keyed by canonical nutrient name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Records read from the food table. They are immutable once loaded:
//! every derived value (scaled portions, meal totals, gaps) is computed
//! per request from these records.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::constants::nutrients::{
    nutrient_info, CALCIUM_MG, CARBOHYDRATE_G, FAT_G, IRON_MG, MAGNESIUM_MG, PROTEIN_G,
    VITAMIN_B12_MCG, VITAMIN_C_MG, VITAMIN_D_MCG,
};

/// Nutrient amounts keyed by canonical nutrient key
///
/// A `BTreeMap` keeps serialized output in a stable order.
pub type NutrientMap = BTreeMap<String, f64>;

/// Nutrients listed in the searchable summary, in priority order
const SUMMARY_NUTRIENTS: &[&str] = &[
    PROTEIN_G,
    FAT_G,
    CARBOHYDRATE_G,
    CALCIUM_MG,
    IRON_MG,
    MAGNESIUM_MG,
    VITAMIN_C_MG,
    VITAMIN_D_MCG,
    VITAMIN_B12_MCG,
];

/// At most this many nutrients appear in a summary line
const SUMMARY_NUTRIENT_LIMIT: usize = 5;

/// A food and its nutrient content per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Stable identifier (USDA FDC id for imported rows)
    pub food_id: String,
    /// Descriptive name
    pub name: String,
    /// Nutrient amounts per 100 g; absent keys are unknown, not zero
    pub nutrition_100g: NutrientMap,
    /// Provenance tag, e.g. `usda`
    pub source: String,
    /// Alternative everyday name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    /// Food category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand owner for branded foods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl FoodRecord {
    /// Create a record with no nutrient data
    #[must_use]
    pub fn new(
        food_id: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            food_id: food_id.into(),
            name: name.into(),
            nutrition_100g: NutrientMap::new(),
            source: source.into(),
            common_name: None,
            category: None,
            brand: None,
        }
    }

    /// Set a per-100 g nutrient amount
    #[must_use]
    pub fn with_nutrient(mut self, key: impl Into<String>, amount: f64) -> Self {
        self.nutrition_100g.insert(key.into(), amount);
        self
    }

    /// Set the common name
    #[must_use]
    pub fn with_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = Some(common_name.into());
        self
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the brand
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Per-100 g amount of a nutrient, ignoring non-finite values
    #[must_use]
    pub fn nutrient(&self, key: &str) -> Option<f64> {
        self.nutrition_100g
            .get(key)
            .copied()
            .filter(|value| value.is_finite())
    }

    /// One-line searchable description of the food
    ///
    /// `name | Also known as: … | Category: … | Brand: … | Nutrients per 100g: …`
    /// where the nutrient part lists up to five key nutrients with a
    /// positive amount.
    #[must_use]
    pub fn summary_text(&self) -> String {
        let mut parts = vec![self.name.clone()];

        if let Some(common_name) = non_blank(self.common_name.as_deref()) {
            parts.push(format!("Also known as: {common_name}"));
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            parts.push(format!("Category: {category}"));
        }
        if let Some(brand) = non_blank(self.brand.as_deref()) {
            parts.push(format!("Brand: {brand}"));
        }

        let mut listed = String::new();
        let present = SUMMARY_NUTRIENTS
            .iter()
            .filter_map(|key| {
                let amount = self.nutrient(key).filter(|amount| *amount > 0.0)?;
                nutrient_info(key).map(|info| (info, amount))
            })
            .take(SUMMARY_NUTRIENT_LIMIT);
        for (info, amount) in present {
            if !listed.is_empty() {
                listed.push_str(", ");
            }
            let _ = write!(
                listed,
                "{}: {amount:.2} {}",
                info.label.to_lowercase(),
                info.unit
            );
        }
        if !listed.is_empty() {
            parts.push(format!("Nutrients per 100g: {listed}"));
        }

        parts.join(" | ")
    }

    /// Canonical keys with a usable amount in this record
    #[must_use]
    pub fn known_nutrients(&self) -> Vec<&str> {
        self.nutrition_100g
            .iter()
            .filter(|(key, value)| value.is_finite() && nutrient_info(key).is_some())
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// How a food reference was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Reference equals the `food_id`
    Id,
    /// Reference equals the name, ignoring case
    ExactName,
    /// Reference is a substring of the name
    PartialName,
}

impl MatchKind {
    /// Wire name of the match kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ExactName => "exact_name",
            Self::PartialName => "partial_name",
        }
    }
}

/// A food reference resolved against the lookup table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFood {
    /// The reference as given by the caller
    pub query: String,
    /// How the reference matched
    pub match_kind: MatchKind,
    /// The matched record
    pub record: FoodRecord,
}

/// Search hit returned by `search_foods`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSummary {
    /// Food identifier
    pub food_id: String,
    /// Food name
    pub name: String,
    /// Provenance tag
    pub source: String,
    /// Searchable one-line description
    pub summary: String,
}

impl From<&FoodRecord> for FoodSummary {
    fn from(record: &FoodRecord) -> Self {
        Self {
            food_id: record.food_id.clone(),
            name: record.name.clone(),
            source: record.source.clone(),
            summary: record.summary_text(),
        }
    }
}
