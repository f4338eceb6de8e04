// ABOUTME: Compares consumed nutrient totals against DRI targets for a profile
// ABOUTME: Classifies each nutrient as deficient, adequate or excess by percent of target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrient gap analysis

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::nutrition::GapThresholdsConfig;
use crate::constants::nutrients::{canonical_nutrient_key, nutrient_info};
use crate::errors::{AppError, AppResult};
use crate::intelligence::dri::DriProfile;
use crate::models::NutrientMap;

/// Tri-state classification of intake against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClassification {
    /// Intake below the adequate threshold
    Deficient,
    /// Intake within the adequate band
    Adequate,
    /// Intake above the excess threshold
    Excess,
}

/// Intake versus target for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientGap {
    /// Canonical nutrient key
    pub nutrient: String,
    /// Unit of `consumed` and `target`
    pub unit: String,
    /// Amount consumed, 0 when no item reported it
    pub consumed: f64,
    /// Daily target from the DRI profile
    pub target: f64,
    /// `consumed / target * 100`
    pub percent_of_target: f64,
    /// `percent_of_target - 100`, negative for a deficit
    pub difference_percent: f64,
    /// Classification by the configured thresholds
    pub classification: GapClassification,
}

/// Count of nutrients per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSummary {
    /// Nutrients below target
    pub deficient: usize,
    /// Nutrients within the adequate band
    pub adequate: usize,
    /// Nutrients above the excess threshold
    pub excess: usize,
}

/// Gap analysis result for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    /// Profile key
    pub profile: String,
    /// Profile description
    pub label: String,
    /// One entry per profile target, in table order
    pub gaps: Vec<NutrientGap>,
    /// Consumed nutrients the profile has no target for
    pub ignored_nutrients: Vec<String>,
    /// Classification counts
    pub summary: GapSummary,
}

impl GapReport {
    /// Gaps with the given classification
    pub fn with_classification(
        &self,
        classification: GapClassification,
    ) -> impl Iterator<Item = &NutrientGap> {
        self.gaps
            .iter()
            .filter(move |gap| gap.classification == classification)
    }
}

/// Classify a percent of target
#[must_use]
pub fn classify(percent_of_target: f64, thresholds: &GapThresholdsConfig) -> GapClassification {
    if percent_of_target < thresholds.adequate_min_percent {
        GapClassification::Deficient
    } else if percent_of_target > thresholds.excess_above_percent {
        GapClassification::Excess
    } else {
        GapClassification::Adequate
    }
}

/// Sum the tracked nutrients of consumed maps under canonical keys
///
/// Names that do not map to a tracked nutrient are skipped without
/// looking at their amount.
///
/// # Errors
///
/// Returns `InvalidInput` for a negative or non-finite tracked amount
pub fn sum_consumed(consumed: &[NutrientMap]) -> AppResult<NutrientMap> {
    let mut totals = NutrientMap::new();
    for map in consumed {
        for (name, amount) in map {
            let Some(key) = canonical_nutrient_key(name) else {
                continue;
            };
            if !amount.is_finite() || *amount < 0.0 {
                return Err(AppError::invalid_input(format!(
                    "consumed amount for '{name}' must be a non-negative number, got {amount}"
                )));
            }
            *totals.entry(key.to_owned()).or_insert(0.0) += amount;
        }
    }
    Ok(totals)
}

/// Consumed names the profile has no target for, sorted and deduplicated
///
/// Tracked nutrients are listed under their canonical key, anything else
/// under the name the caller used.
fn ignored_names(consumed: &[NutrientMap], profile: &DriProfile) -> Vec<String> {
    consumed
        .iter()
        .flat_map(|map| map.keys())
        .filter_map(|name| match canonical_nutrient_key(name) {
            Some(key) if profile.target(key).is_some() => None,
            Some(key) => Some(key.to_owned()),
            None => Some(name.clone()),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compare consumed nutrients against a DRI profile
///
/// The consumed list is summed elementwise first. Every profile target
/// yields one gap entry; a nutrient nobody reported counts as 0.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty consumed list or an invalid amount
pub fn analyze_gaps(
    consumed: &[NutrientMap],
    profile: &DriProfile,
    thresholds: &GapThresholdsConfig,
) -> AppResult<GapReport> {
    if consumed.is_empty() {
        return Err(AppError::invalid_input(
            "At least one consumed entry is required for gap analysis",
        ));
    }

    let totals = sum_consumed(consumed)?;
    let mut summary = GapSummary::default();
    let gaps: Vec<NutrientGap> = profile
        .targets
        .iter()
        .map(|target| {
            let amount = totals.get(&target.nutrient).copied().unwrap_or(0.0);
            let percent = amount / target.amount * 100.0;
            let classification = classify(percent, thresholds);
            match classification {
                GapClassification::Deficient => summary.deficient += 1,
                GapClassification::Adequate => summary.adequate += 1,
                GapClassification::Excess => summary.excess += 1,
            }
            NutrientGap {
                unit: nutrient_info(&target.nutrient)
                    .map_or_else(String::new, |info| info.unit.to_owned()),
                nutrient: target.nutrient.clone(),
                consumed: amount,
                target: target.amount,
                percent_of_target: round_to_1(percent),
                difference_percent: round_to_1(percent - 100.0),
                classification,
            }
        })
        .collect();

    let ignored_nutrients = ignored_names(consumed, profile);

    Ok(GapReport {
        profile: profile.key.clone(),
        label: profile.label.clone(),
        gaps,
        ignored_nutrients,
        summary,
    })
}

fn round_to_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::nutrients::{IRON_MG, PROTEIN_G, SODIUM_MG};
    use crate::intelligence::dri::DriTable;

    fn consumed(entries: &[(&str, f64)]) -> NutrientMap {
        entries
            .iter()
            .map(|(key, amount)| ((*key).to_owned(), *amount))
            .collect()
    }

    fn profile() -> &'static DriProfile {
        DriTable::builtin().get("adult_female_19_50").unwrap()
    }

    #[test]
    fn test_consumed_equal_to_target_is_adequate() {
        let thresholds = GapThresholdsConfig::default();
        let report = analyze_gaps(&[consumed(&[(PROTEIN_G, 46.0)])], profile(), &thresholds).unwrap();
        let protein = report.gaps.iter().find(|g| g.nutrient == PROTEIN_G).unwrap();
        assert_eq!(protein.classification, GapClassification::Adequate);
        assert!((protein.percent_of_target - 100.0).abs() < f64::EPSILON);
        assert!(protein.difference_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_absent_nutrient_is_deficient() {
        let thresholds = GapThresholdsConfig::default();
        let report = analyze_gaps(&[consumed(&[(PROTEIN_G, 46.0)])], profile(), &thresholds).unwrap();
        let iron = report.gaps.iter().find(|g| g.nutrient == IRON_MG).unwrap();
        assert!(iron.consumed.abs() < f64::EPSILON);
        assert_eq!(iron.classification, GapClassification::Deficient);
        assert!((iron.difference_percent + 100.0).abs() < f64::EPSILON);
        assert_eq!(report.gaps.len(), profile().targets.len());
        assert_eq!(
            report.summary.deficient + report.summary.adequate + report.summary.excess,
            report.gaps.len()
        );
    }

    #[test]
    fn test_consumed_list_is_summed_and_canonicalized() {
        let thresholds = GapThresholdsConfig::default();
        let report = analyze_gaps(
            &[
                consumed(&[("protein", 20.0), (SODIUM_MG, 1500.0)]),
                consumed(&[(PROTEIN_G, 30.0), ("sodium_na", 1000.0)]),
            ],
            profile(),
            &thresholds,
        )
        .unwrap();

        let protein = report.gaps.iter().find(|g| g.nutrient == PROTEIN_G).unwrap();
        assert!((protein.consumed - 50.0).abs() < 1e-9);
        assert_eq!(protein.classification, GapClassification::Adequate);

        let sodium = report.gaps.iter().find(|g| g.nutrient == SODIUM_MG).unwrap();
        assert_eq!(sodium.classification, GapClassification::Excess);
        assert_eq!(sodium.unit, "mg");
        assert_eq!(
            report
                .with_classification(GapClassification::Excess)
                .count(),
            report.summary.excess
        );
    }

    #[test]
    fn test_unknown_nutrients_are_ignored() {
        let thresholds = GapThresholdsConfig::default();
        let report = analyze_gaps(
            &[consumed(&[("caffeine", 95.0), ("fat_g", 70.0)])],
            profile(),
            &thresholds,
        )
        .unwrap();
        assert_eq!(report.ignored_nutrients, vec!["caffeine", "fat_g"]);
        assert!(report.gaps.iter().all(|g| g.nutrient != "caffeine"));
    }

    #[test]
    fn test_untracked_amounts_are_not_validated() {
        let thresholds = GapThresholdsConfig::default();
        let report = analyze_gaps(
            &[consumed(&[(PROTEIN_G, 46.0), ("caffeine", -1.0), ("ginseng", f64::NAN)])],
            profile(),
            &thresholds,
        )
        .unwrap();
        assert_eq!(report.ignored_nutrients, vec!["caffeine", "ginseng"]);
        let protein = report.gaps.iter().find(|g| g.nutrient == PROTEIN_G).unwrap();
        assert_eq!(protein.classification, GapClassification::Adequate);

        let totals = sum_consumed(&[consumed(&[("caffeine", -1.0)])]).unwrap();
        assert!(totals.is_empty());
    }

    #[test]
    fn test_threshold_boundaries() {
        let thresholds = GapThresholdsConfig::default();
        assert_eq!(classify(89.9, &thresholds), GapClassification::Deficient);
        assert_eq!(classify(90.0, &thresholds), GapClassification::Adequate);
        assert_eq!(classify(150.0, &thresholds), GapClassification::Adequate);
        assert_eq!(classify(150.1, &thresholds), GapClassification::Excess);
    }

    #[test]
    fn test_invalid_input() {
        let thresholds = GapThresholdsConfig::default();
        assert!(analyze_gaps(&[], profile(), &thresholds).is_err());
        assert!(analyze_gaps(&[consumed(&[(PROTEIN_G, -1.0)])], profile(), &thresholds).is_err());
    }
}
