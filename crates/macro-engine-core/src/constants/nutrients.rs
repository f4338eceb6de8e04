// ABOUTME: Canonical nutrient keys with display labels and units
// ABOUTME: Maps USDA FoodData Central CSV column names onto canonical keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient naming.
//!
//! Every nutrient map in the engine is keyed by one of the canonical keys
//! below. Keys carry their unit as a suffix so amounts are never ambiguous.

/// Energy (kcal)
pub const ENERGY_KCAL: &str = "energy_kcal";
/// Protein (g)
pub const PROTEIN_G: &str = "protein_g";
/// Total carbohydrate by difference (g)
pub const CARBOHYDRATE_G: &str = "carbohydrate_g";
/// Total lipid (g)
pub const FAT_G: &str = "fat_g";
/// Total dietary fiber (g)
pub const FIBER_G: &str = "fiber_g";
/// Total sugars (g)
pub const SUGARS_G: &str = "sugars_g";
/// Sodium (mg)
pub const SODIUM_MG: &str = "sodium_mg";
/// Potassium (mg)
pub const POTASSIUM_MG: &str = "potassium_mg";
/// Calcium (mg)
pub const CALCIUM_MG: &str = "calcium_mg";
/// Iron (mg)
pub const IRON_MG: &str = "iron_mg";
/// Magnesium (mg)
pub const MAGNESIUM_MG: &str = "magnesium_mg";
/// Vitamin C (mg)
pub const VITAMIN_C_MG: &str = "vitamin_c_mg";
/// Vitamin D (mcg)
pub const VITAMIN_D_MCG: &str = "vitamin_d_mcg";
/// Vitamin B12 (mcg)
pub const VITAMIN_B12_MCG: &str = "vitamin_b12_mcg";

/// Atwater energy factor for protein (kcal/g)
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// Atwater energy factor for carbohydrate (kcal/g)
pub const CARBOHYDRATE_KCAL_PER_G: f64 = 4.0;
/// Atwater energy factor for fat (kcal/g)
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// Display metadata for a canonical nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutrientInfo {
    /// Canonical key
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Unit of the stored amount
    pub unit: &'static str,
}

/// All canonical nutrients, in display order
pub const NUTRIENTS: &[NutrientInfo] = &[
    NutrientInfo { key: ENERGY_KCAL, label: "Energy", unit: "kcal" },
    NutrientInfo { key: PROTEIN_G, label: "Protein", unit: "g" },
    NutrientInfo { key: CARBOHYDRATE_G, label: "Carbohydrate", unit: "g" },
    NutrientInfo { key: FAT_G, label: "Fat", unit: "g" },
    NutrientInfo { key: FIBER_G, label: "Fiber", unit: "g" },
    NutrientInfo { key: SUGARS_G, label: "Sugars", unit: "g" },
    NutrientInfo { key: SODIUM_MG, label: "Sodium", unit: "mg" },
    NutrientInfo { key: POTASSIUM_MG, label: "Potassium", unit: "mg" },
    NutrientInfo { key: CALCIUM_MG, label: "Calcium", unit: "mg" },
    NutrientInfo { key: IRON_MG, label: "Iron", unit: "mg" },
    NutrientInfo { key: MAGNESIUM_MG, label: "Magnesium", unit: "mg" },
    NutrientInfo { key: VITAMIN_C_MG, label: "Vitamin C", unit: "mg" },
    NutrientInfo { key: VITAMIN_D_MCG, label: "Vitamin D", unit: "mcg" },
    NutrientInfo { key: VITAMIN_B12_MCG, label: "Vitamin B12", unit: "mcg" },
];

/// USDA pipeline CSV column names and the canonical key each maps to
pub const USDA_COLUMN_ALIASES: &[(&str, &str)] = &[
    ("energy", ENERGY_KCAL),
    ("energy_kcal", ENERGY_KCAL),
    ("calories", ENERGY_KCAL),
    ("protein", PROTEIN_G),
    ("total_lipid_fat", FAT_G),
    ("fat", FAT_G),
    ("carbohydrate_by_difference", CARBOHYDRATE_G),
    ("carbs", CARBOHYDRATE_G),
    ("fiber_total_dietary", FIBER_G),
    ("sugars_total", SUGARS_G),
    ("total_sugars", SUGARS_G),
    ("sodium_na", SODIUM_MG),
    ("potassium_k", POTASSIUM_MG),
    ("calcium_ca", CALCIUM_MG),
    ("iron_fe", IRON_MG),
    ("vitamin_c_total_ascorbic_acid", VITAMIN_C_MG),
    ("vitamin_d_d2_d3", VITAMIN_D_MCG),
    ("vitamin_d3_cholecalciferol", VITAMIN_D_MCG),
    ("vitamin_b12", VITAMIN_B12_MCG),
];

/// Look up display metadata for a canonical key
#[must_use]
pub fn nutrient_info(key: &str) -> Option<&'static NutrientInfo> {
    NUTRIENTS.iter().find(|info| info.key == key)
}

/// Map a nutrient or column name to its canonical key
///
/// Matching is case-insensitive and treats spaces and hyphens as
/// underscores, so `"Vitamin-B12"` and `"vitamin b12"` both resolve.
/// Returns `None` for names the engine does not track.
#[must_use]
pub fn canonical_nutrient_key(name: &str) -> Option<&'static str> {
    let normalized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();

    if let Some(info) = nutrient_info(&normalized) {
        return Some(info.key);
    }

    USDA_COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, key)| *key)
}
