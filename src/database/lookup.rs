// ABOUTME: FoodLookup trait resolving a food reference by id, exact name, then partial name
// ABOUTME: SQLite-backed implementation plus an in-memory implementation for fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Food Lookup
//!
//! A reference string resolves in this order:
//!
//! 1. exact `food_id`
//! 2. exact name, ignoring case
//! 3. name containing the reference, shortest name first
//!
//! Lookups never write. Each request awaits its lookups one at a time.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::constants::defaults::MAX_SEARCH_LIMIT;
use crate::errors::{AppError, AppResult};
use crate::models::{FoodRecord, MatchKind, ResolvedFood};

use super::foods::FoodRepository;

/// Resolution of food references into records
#[async_trait]
pub trait FoodLookup: Send + Sync {
    /// Resolve a reference by id, exact name, then partial name
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank reference, `ResourceNotFound`
    /// when nothing matches, or a storage error
    async fn resolve(&self, reference: &str) -> AppResult<ResolvedFood>;

    /// Foods whose name or common name contains `query`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank query or a storage error
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<FoodRecord>>;
}

fn normalized_reference(reference: &str) -> AppResult<&str> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Food reference must not be empty"));
    }
    Ok(trimmed)
}

fn resolved(reference: &str, match_kind: MatchKind, record: FoodRecord) -> ResolvedFood {
    debug!(
        food.query = %reference,
        food.match = match_kind.as_str(),
        food.id = %record.food_id,
        "Resolved food"
    );
    ResolvedFood {
        query: reference.to_owned(),
        match_kind,
        record,
    }
}

/// Substring test with ASCII-only case folding, the rule `SQLite`'s
/// `lower()` and `NOCASE` apply
fn contains_ascii_folded(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

fn food_not_found(reference: &str) -> AppError {
    debug!(food.query = %reference, "Food not found");
    AppError::not_found(format!("Food '{reference}'"))
        .with_details(serde_json::json!({ "query": reference }))
}

/// Lookup backed by the `SQLite` food table
#[derive(Clone)]
pub struct SqliteFoodLookup {
    repository: FoodRepository,
}

impl SqliteFoodLookup {
    /// Create a lookup over a connection pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            repository: FoodRepository::new(pool),
        }
    }
}

#[async_trait]
impl FoodLookup for SqliteFoodLookup {
    async fn resolve(&self, reference: &str) -> AppResult<ResolvedFood> {
        let reference = normalized_reference(reference)?;

        if let Some(record) = self.repository.get_by_id(reference).await? {
            return Ok(resolved(reference, MatchKind::Id, record));
        }
        if let Some(record) = self.repository.find_by_name(reference).await? {
            return Ok(resolved(reference, MatchKind::ExactName, record));
        }
        if let Some(record) = self.repository.find_partial(reference).await? {
            return Ok(resolved(reference, MatchKind::PartialName, record));
        }
        Err(food_not_found(reference))
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<FoodRecord>> {
        let query = normalized_reference(query)?;
        self.repository.search(query, limit).await
    }
}

/// Lookup over a fixed set of records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryFoodLookup {
    records: Vec<FoodRecord>,
}

impl InMemoryFoodLookup {
    /// Create a lookup over the given records
    #[must_use]
    pub const fn new(records: Vec<FoodRecord>) -> Self {
        Self { records }
    }

    /// Add a record
    pub fn insert(&mut self, record: FoodRecord) {
        self.records.push(record);
    }

    fn matching<'a>(&'a self, fragment: &str) -> Vec<&'a FoodRecord> {
        let mut hits: Vec<&FoodRecord> = self
            .records
            .iter()
            .filter(|record| {
                contains_ascii_folded(&record.name, fragment)
                    || record
                        .common_name
                        .as_deref()
                        .is_some_and(|name| contains_ascii_folded(name, fragment))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.name
                .chars()
                .count()
                .cmp(&b.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.food_id.cmp(&b.food_id))
        });
        hits
    }
}

#[async_trait]
impl FoodLookup for InMemoryFoodLookup {
    async fn resolve(&self, reference: &str) -> AppResult<ResolvedFood> {
        let reference = normalized_reference(reference)?;

        if let Some(record) = self.records.iter().find(|r| r.food_id == reference) {
            return Ok(resolved(reference, MatchKind::Id, record.clone()));
        }
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(reference))
        {
            return Ok(resolved(reference, MatchKind::ExactName, record.clone()));
        }
        if let Some(record) = self
            .matching(reference)
            .into_iter()
            .find(|r| contains_ascii_folded(&r.name, reference))
        {
            return Ok(resolved(reference, MatchKind::PartialName, record.clone()));
        }
        Err(food_not_found(reference))
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<FoodRecord>> {
        let query = normalized_reference(query)?;
        Ok(self
            .matching(query)
            .into_iter()
            .take(limit.clamp(1, MAX_SEARCH_LIMIT))
            .cloned()
            .collect())
    }
}
