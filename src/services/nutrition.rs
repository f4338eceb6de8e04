// ABOUTME: Request-level nutrition operations combining food lookup with pure calculations
// ABOUTME: Unresolved meal ingredients become flagged entries instead of failing the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition service
//!
//! Each call is independent: the service holds only the lookup handle and
//! immutable configuration, and every derived value is recomputed per call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::nutrition::NutritionConfig;
use crate::constants::defaults;
use crate::database::FoodLookup;
use crate::errors::{AppError, AppResult};
use crate::intelligence::dri::DriProfile;
use crate::intelligence::gap_analysis::{analyze_gaps, sum_consumed, GapReport};
use crate::intelligence::macro_calculator::{
    aggregate, scale, validate_grams, MacroResult, MealAggregate, MealItem,
};
use crate::models::{FoodSummary, MatchKind, NutrientMap, ResolvedFood};

/// One requested meal ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    /// Food id or name
    pub food: String,
    /// Portion in grams
    pub grams: f64,
}

impl IngredientInput {
    /// Create an ingredient
    #[must_use]
    pub fn new(food: impl Into<String>, grams: f64) -> Self {
        Self {
            food: food.into(),
            grams,
        }
    }
}

/// A resolved food scaled to a portion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionResult {
    /// Reference as given by the caller
    pub query: String,
    /// How the reference matched
    pub match_kind: MatchKind,
    /// Scaled nutrients
    #[serde(flatten)]
    pub macros: MacroResult,
}

/// Gap report plus the entries missing from the consumed totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    /// Per-nutrient comparison
    #[serde(flatten)]
    pub report: GapReport,
    /// Consumed totals the report was computed from
    pub consumed_totals: NutrientMap,
    /// Meal entries that could not be included
    pub unresolved_items: Vec<MealItem>,
    /// Whether `unresolved_items` is non-empty
    pub partial: bool,
}

/// Nutrition operations over a food lookup
#[derive(Clone)]
pub struct NutritionService {
    lookup: Arc<dyn FoodLookup>,
    config: NutritionConfig,
    default_profile: String,
    search_limit: usize,
}

impl NutritionService {
    /// Create a service with default profile and search limit
    #[must_use]
    pub fn new(lookup: Arc<dyn FoodLookup>, config: NutritionConfig) -> Self {
        Self {
            lookup,
            config,
            default_profile: defaults::DRI_PROFILE.to_owned(),
            search_limit: defaults::SEARCH_LIMIT,
        }
    }

    /// Profile used when a request names none
    #[must_use]
    pub fn with_default_profile(mut self, profile: impl Into<String>) -> Self {
        self.default_profile = profile.into();
        self
    }

    /// Result count for searches without an explicit limit
    #[must_use]
    pub const fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &NutritionConfig {
        &self.config
    }

    /// Resolve a single food
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the reference matches nothing
    pub async fn lookup_food(&self, reference: &str) -> AppResult<ResolvedFood> {
        self.lookup.resolve(reference).await
    }

    /// Search foods by name or common name
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank query or a storage error
    pub async fn search_foods(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> AppResult<Vec<FoodSummary>> {
        let limit = limit.unwrap_or(self.search_limit);
        let records = self.lookup.search(query, limit).await?;
        debug!(search.query = %query, search.hits = records.len(), "Searched foods");
        Ok(records.iter().map(FoodSummary::from).collect())
    }

    /// Scale one food to a portion
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for bad grams, `ResourceNotFound` when the
    /// food does not resolve and `IncompleteData` when the record holds no
    /// usable nutrient values
    pub async fn calculate_macros(&self, reference: &str, grams: f64) -> AppResult<PortionResult> {
        validate_grams(grams)?;
        let resolved = self.lookup.resolve(reference).await?;
        let macros = self.scale_resolved(&resolved, grams)?;
        Ok(PortionResult {
            query: resolved.query,
            match_kind: resolved.match_kind,
            macros,
        })
    }

    fn scale_resolved(&self, resolved: &ResolvedFood, grams: f64) -> AppResult<MacroResult> {
        if resolved.record.known_nutrients().is_empty() {
            return Err(AppError::incomplete_data(format!(
                "Food '{}' has no nutrient values",
                resolved.record.name
            ))
            .with_details(serde_json::json!({ "food_id": resolved.record.food_id })));
        }
        scale(&resolved.record, grams, &self.config.completeness)
    }

    /// Scale and sum a meal
    ///
    /// An ingredient that fails to resolve, has an invalid portion or
    /// carries no nutrient data is recorded as an unresolved entry and the
    /// remaining ingredients are still computed. Storage failures abort the request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty ingredient list or a storage error
    pub async fn analyze_meal(&self, ingredients: &[IngredientInput]) -> AppResult<MealAggregate> {
        let mut items = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            items.push(self.meal_item(ingredient).await?);
        }

        let meal = aggregate(items)?;
        info!(
            meal.items = meal.items.len(),
            meal.unresolved = meal.unresolved_count,
            meal.completeness = meal.completeness,
            "Aggregated meal"
        );
        Ok(meal)
    }

    async fn meal_item(&self, ingredient: &IngredientInput) -> AppResult<MealItem> {
        if let Err(error) = validate_grams(ingredient.grams) {
            return Ok(MealItem::unresolved(
                ingredient.food.clone(),
                ingredient.grams,
                &error,
            ));
        }

        let outcome = self
            .lookup
            .resolve(&ingredient.food)
            .await
            .and_then(|resolved| {
                let macros = self.scale_resolved(&resolved, ingredient.grams)?;
                Ok(MealItem::Resolved {
                    query: resolved.query,
                    match_kind: resolved.match_kind,
                    macros,
                })
            });

        match outcome {
            Err(error) if error.code.is_client_error() => Ok(MealItem::unresolved(
                ingredient.food.clone(),
                ingredient.grams,
                &error,
            )),
            outcome => outcome,
        }
    }

    /// Gap analysis of a meal's totals
    ///
    /// The profile is checked before any food is resolved. Unresolved
    /// ingredients are carried into the result and mark it partial.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown profile and the errors of
    /// [`NutritionService::analyze_meal`]
    pub async fn analyze_meal_gaps(
        &self,
        ingredients: &[IngredientInput],
        profile: Option<&str>,
    ) -> AppResult<GapAnalysis> {
        let profile = self.profile(profile)?;
        let meal = self.analyze_meal(ingredients).await?;
        let report = analyze_gaps(
            std::slice::from_ref(&meal.totals),
            profile,
            &self.config.gap_thresholds,
        )?;
        let unresolved_items: Vec<MealItem> = meal.unresolved_items().cloned().collect();

        Ok(GapAnalysis {
            report,
            consumed_totals: meal.totals,
            partial: !unresolved_items.is_empty(),
            unresolved_items,
        })
    }

    /// Gap analysis of directly supplied nutrient amounts
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown profile and `InvalidInput`
    /// for an empty list or invalid amount
    pub fn analyze_consumed_gaps(
        &self,
        consumed: &[NutrientMap],
        profile: Option<&str>,
    ) -> AppResult<GapAnalysis> {
        let profile = self.profile(profile)?;
        let report = analyze_gaps(consumed, profile, &self.config.gap_thresholds)?;
        let consumed_totals = sum_consumed(consumed)?;

        Ok(GapAnalysis {
            report,
            consumed_totals,
            unresolved_items: Vec::new(),
            partial: false,
        })
    }

    /// All DRI profiles in table order
    #[must_use]
    pub fn list_profiles(&self) -> &[DriProfile] {
        self.config.dri_table.profiles()
    }

    fn profile(&self, key: Option<&str>) -> AppResult<&DriProfile> {
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(self.default_profile.as_str());
        self.config.dri_table.get(key)
    }
}
