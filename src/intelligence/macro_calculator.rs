// ABOUTME: Portion scaling and meal aggregation over per-100 g food records
// ABOUTME: Pure functions, missing nutrient fields lower completeness instead of counting as zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Macro Calculator
//!
//! [`scale`] turns a per-100 g record into the nutrients of one portion
//! and [`aggregate`] sums portions into meal totals. Both are pure: no I/O
//! and no state between calls.
//!
//! A nutrient absent from the source record is omitted from the scaled
//! output rather than treated as zero, and the record's completeness
//! fraction drops accordingly.

use serde::{Deserialize, Serialize};

use crate::config::nutrition::CompletenessConfig;
use crate::constants::defaults::REFERENCE_PORTION_G;
use crate::constants::nutrients::{
    CARBOHYDRATE_G, CARBOHYDRATE_KCAL_PER_G, FAT_G, FAT_KCAL_PER_G, PROTEIN_G, PROTEIN_KCAL_PER_G,
};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{FoodRecord, MatchKind, NutrientMap};

/// Identity of the food a result was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodReference {
    /// Food identifier
    pub food_id: String,
    /// Food name
    pub name: String,
    /// Provenance tag
    pub source: String,
}

impl From<&FoodRecord> for FoodReference {
    fn from(record: &FoodRecord) -> Self {
        Self {
            food_id: record.food_id.clone(),
            name: record.name.clone(),
            source: record.source.clone(),
        }
    }
}

/// Share of macronutrient energy per macronutrient (Atwater 4/4/9)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySplit {
    /// Percent of macro energy from protein
    pub protein_percent: f64,
    /// Percent of macro energy from carbohydrate
    pub carbohydrate_percent: f64,
    /// Percent of macro energy from fat
    pub fat_percent: f64,
}

/// Nutrients of a single portion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroResult {
    /// Source food
    pub food: FoodReference,
    /// Portion size in grams
    pub grams: f64,
    /// Scaled nutrient amounts; only nutrients present in the record
    pub nutrients: NutrientMap,
    /// Fraction of expected nutrients present in the record, 0.0 to 1.0
    pub completeness: f64,
    /// Expected nutrients the record lacks
    pub missing_nutrients: Vec<String>,
    /// Macro energy distribution, when computable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_split: Option<EnergySplit>,
}

/// Check a portion size
///
/// # Errors
///
/// Returns `InvalidInput` for non-finite or non-positive grams
pub fn validate_grams(grams: f64) -> AppResult<()> {
    if !grams.is_finite() || grams <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "grams must be a positive finite number, got {grams}"
        ))
        .with_details(serde_json::json!({ "grams": grams.to_string() })));
    }
    Ok(())
}

/// Scale a per-100 g record to a portion
///
/// `scale(record, 100.0)` reproduces the record's values exactly.
///
/// # Errors
///
/// Returns an error if `grams` fails [`validate_grams`]
pub fn scale(
    record: &FoodRecord,
    grams: f64,
    completeness: &CompletenessConfig,
) -> AppResult<MacroResult> {
    validate_grams(grams)?;

    let ratio = grams / REFERENCE_PORTION_G;
    let nutrients: NutrientMap = record
        .nutrition_100g
        .iter()
        .filter(|(_, amount)| amount.is_finite())
        .map(|(key, amount)| (key.clone(), amount * ratio))
        .collect();

    let missing_nutrients: Vec<String> = completeness
        .expected_nutrients
        .iter()
        .filter(|key| record.nutrient(key).is_none())
        .cloned()
        .collect();

    let expected = completeness.expected_nutrients.len();
    let fraction = if expected == 0 {
        1.0
    } else {
        (expected - missing_nutrients.len()) as f64 / expected as f64
    };

    let energy_split = energy_split(&nutrients);
    Ok(MacroResult {
        food: FoodReference::from(record),
        grams,
        nutrients,
        completeness: fraction,
        missing_nutrients,
        energy_split,
    })
}

/// Macro energy distribution of a nutrient map
///
/// Returns `None` when no macronutrient is present or their energy sums
/// to zero. Absent macros contribute nothing.
#[must_use]
pub fn energy_split(nutrients: &NutrientMap) -> Option<EnergySplit> {
    let protein = nutrients.get(PROTEIN_G).copied();
    let carbohydrate = nutrients.get(CARBOHYDRATE_G).copied();
    let fat = nutrients.get(FAT_G).copied();
    if protein.is_none() && carbohydrate.is_none() && fat.is_none() {
        return None;
    }

    let protein_kcal = protein.unwrap_or(0.0) * PROTEIN_KCAL_PER_G;
    let carbohydrate_kcal = carbohydrate.unwrap_or(0.0) * CARBOHYDRATE_KCAL_PER_G;
    let fat_kcal = fat.unwrap_or(0.0) * FAT_KCAL_PER_G;
    let total = protein_kcal + carbohydrate_kcal + fat_kcal;
    if !total.is_finite() || total <= 0.0 {
        return None;
    }

    Some(EnergySplit {
        protein_percent: round_to_1(protein_kcal / total * 100.0),
        carbohydrate_percent: round_to_1(carbohydrate_kcal / total * 100.0),
        fat_percent: round_to_1(fat_kcal / total * 100.0),
    })
}

/// Elementwise sum of nutrient maps
///
/// A key present in any map appears in the result.
#[must_use]
pub fn sum_nutrients<'a, I>(maps: I) -> NutrientMap
where
    I: IntoIterator<Item = &'a NutrientMap>,
{
    let mut totals = NutrientMap::new();
    for map in maps {
        for (key, amount) in map {
            *totals.entry(key.clone()).or_insert(0.0) += amount;
        }
    }
    totals
}

/// One entry of a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MealItem {
    /// The food resolved and was scaled
    Resolved {
        /// Reference as given by the caller
        query: String,
        /// How the reference matched
        match_kind: MatchKind,
        /// Scaled portion
        macros: MacroResult,
    },
    /// The entry could not be computed; it is excluded from the totals
    Unresolved {
        /// Reference as given by the caller
        query: String,
        /// Requested portion
        grams: f64,
        /// Why the entry failed
        code: ErrorCode,
        /// Human-readable reason
        reason: String,
    },
}

impl MealItem {
    /// Build an unresolved entry from the error that prevented it
    #[must_use]
    pub fn unresolved(query: impl Into<String>, grams: f64, error: &AppError) -> Self {
        Self::Unresolved {
            query: query.into(),
            grams,
            code: error.code,
            reason: error.message.clone(),
        }
    }

    /// Scaled portion of a resolved entry
    #[must_use]
    pub const fn macros(&self) -> Option<&MacroResult> {
        match self {
            Self::Resolved { macros, .. } => Some(macros),
            Self::Unresolved { .. } => None,
        }
    }

    /// Whether the entry was excluded from the totals
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved { .. })
    }

    /// The caller's reference for this entry
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Resolved { query, .. } | Self::Unresolved { query, .. } => query,
        }
    }
}

/// Totals and per-item breakdown of a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAggregate {
    /// Entries in input order
    pub items: Vec<MealItem>,
    /// Elementwise sum of the resolved entries' nutrients
    pub totals: NutrientMap,
    /// Sum of resolved portion sizes
    pub total_grams: f64,
    /// Number of entries included in the totals
    pub resolved_count: usize,
    /// Number of flagged entries
    pub unresolved_count: usize,
    /// Mean completeness over all entries, unresolved entries counting 0
    pub completeness: f64,
    /// Macro energy distribution of the totals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_split: Option<EnergySplit>,
}

impl MealAggregate {
    /// Unresolved entries of the meal
    pub fn unresolved_items(&self) -> impl Iterator<Item = &MealItem> {
        self.items.iter().filter(|item| item.is_unresolved())
    }
}

/// Aggregate meal entries into totals
///
/// Unresolved entries stay in the breakdown and are skipped in the sums.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty list
pub fn aggregate(items: Vec<MealItem>) -> AppResult<MealAggregate> {
    if items.is_empty() {
        return Err(AppError::invalid_input(
            "At least one meal item is required",
        ));
    }

    let resolved: Vec<&MacroResult> = items.iter().filter_map(MealItem::macros).collect();
    let totals = sum_nutrients(resolved.iter().map(|macros| &macros.nutrients));
    let total_grams = resolved.iter().map(|macros| macros.grams).sum();
    let completeness =
        resolved.iter().map(|macros| macros.completeness).sum::<f64>() / items.len() as f64;
    let resolved_count = resolved.len();
    let energy_split = energy_split(&totals);

    Ok(MealAggregate {
        unresolved_count: items.len() - resolved_count,
        resolved_count,
        totals,
        total_grams,
        completeness,
        energy_split,
        items,
    })
}

fn round_to_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::nutrients::{ENERGY_KCAL, FIBER_G};

    fn rice() -> FoodRecord {
        FoodRecord::new("168878", "Rice, white, cooked", "usda")
            .with_nutrient(ENERGY_KCAL, 130.0)
            .with_nutrient(PROTEIN_G, 2.69)
            .with_nutrient(CARBOHYDRATE_G, 28.17)
            .with_nutrient(FAT_G, 0.28)
            .with_nutrient(FIBER_G, 0.4)
    }

    #[test]
    fn test_scale_at_reference_portion_is_identity() {
        let result = scale(&rice(), 100.0, &CompletenessConfig::default()).unwrap();
        assert_eq!(result.nutrients, rice().nutrition_100g);
        assert!((result.completeness - 1.0).abs() < f64::EPSILON);
        assert!(result.missing_nutrients.is_empty());
    }

    #[test]
    fn test_scale_is_linear() {
        let result = scale(&rice(), 250.0, &CompletenessConfig::default()).unwrap();
        assert!((result.nutrients[ENERGY_KCAL] - 325.0).abs() < 1e-9);
        assert!((result.nutrients[PROTEIN_G] - 6.725).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_are_omitted_and_lower_completeness() {
        let mut record = rice();
        record.nutrition_100g.remove(FIBER_G);
        record.nutrition_100g.remove(FAT_G);

        let result = scale(&record, 50.0, &CompletenessConfig::default()).unwrap();
        assert!(!result.nutrients.contains_key(FIBER_G));
        assert!(!result.nutrients.contains_key(FAT_G));
        assert!((result.completeness - 0.6).abs() < 1e-9);
        assert_eq!(result.missing_nutrients, vec![FAT_G, FIBER_G]);
    }

    #[test]
    fn test_empty_expectation_is_complete() {
        let config = CompletenessConfig {
            expected_nutrients: Vec::new(),
        };
        let record = FoodRecord::new("1", "Mystery", "test");
        let result = scale(&record, 10.0, &config).unwrap();
        assert!((result.completeness - 1.0).abs() < f64::EPSILON);
        assert!(result.nutrients.is_empty());
        assert!(result.energy_split.is_none());
    }

    #[test]
    fn test_scale_rejects_bad_grams() {
        let config = CompletenessConfig::default();
        for grams in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = scale(&rice(), grams, &config).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput, "grams = {grams}");
        }
    }

    #[test]
    fn test_bulk_portion_scales_linearly() {
        let result = scale(&rice(), 25_000.0, &CompletenessConfig::default()).unwrap();
        assert!((result.nutrients[ENERGY_KCAL] - 32_500.0).abs() < 1e-6);
        assert!((result.grams - 25_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_energy_split_uses_atwater_factors() {
        let mut nutrients = NutrientMap::new();
        nutrients.insert(PROTEIN_G.to_owned(), 25.0);
        nutrients.insert(CARBOHYDRATE_G.to_owned(), 25.0);
        nutrients.insert(FAT_G.to_owned(), 100.0 / 9.0);

        let split = energy_split(&nutrients).unwrap();
        assert!((split.protein_percent - 33.3).abs() < 1e-9);
        assert!((split.carbohydrate_percent - 33.3).abs() < 1e-9);
        assert!((split.fat_percent - 33.3).abs() < 1e-9);

        nutrients.insert(PROTEIN_G.to_owned(), 0.0);
        nutrients.insert(CARBOHYDRATE_G.to_owned(), 0.0);
        nutrients.insert(FAT_G.to_owned(), 0.0);
        assert!(energy_split(&nutrients).is_none());
    }

    #[test]
    fn test_aggregate_sums_resolved_and_flags_unresolved() {
        let config = CompletenessConfig::default();
        let first = scale(&rice(), 150.0, &config).unwrap();
        let second = scale(&rice(), 50.0, &config).unwrap();
        let missing = AppError::not_found("Food 'unicorn steak'");

        let meal = aggregate(vec![
            MealItem::Resolved {
                query: "rice".into(),
                match_kind: MatchKind::PartialName,
                macros: first.clone(),
            },
            MealItem::unresolved("unicorn steak", 200.0, &missing),
            MealItem::Resolved {
                query: "168878".into(),
                match_kind: MatchKind::Id,
                macros: second.clone(),
            },
        ])
        .unwrap();

        assert_eq!(meal.resolved_count, 2);
        assert_eq!(meal.unresolved_count, 1);
        assert_eq!(meal.items[1].query(), "unicorn steak");
        assert!((meal.total_grams - 200.0).abs() < 1e-9);
        assert!((meal.totals[ENERGY_KCAL] - 260.0).abs() < 1e-9);
        assert_eq!(
            meal.totals,
            sum_nutrients([&first.nutrients, &second.nutrients])
        );
        assert!((meal.completeness - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_rejects_empty_list() {
        let err = aggregate(Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_unresolved_item_serializes_with_status_tag() {
        let item = MealItem::unresolved("kale", 30.0, &AppError::not_found("Food 'kale'"));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["status"], "unresolved");
        assert_eq!(json["code"], "RESOURCE_NOT_FOUND");
    }
}
