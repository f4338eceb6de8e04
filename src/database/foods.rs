// ABOUTME: Food table repository with id, name, and substring lookups
// ABOUTME: Nutrient maps are stored as JSON text and parsed back into NutrientMap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::constants::defaults::MAX_SEARCH_LIMIT;
use crate::errors::{AppError, AppResult};
use crate::models::{FoodRecord, NutrientMap};

/// Queries over the `foods` table
#[derive(Clone)]
pub struct FoodRepository {
    pool: SqlitePool,
}

impl FoodRepository {
    /// Create a repository over a pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a food by exact identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed
    pub async fn get_by_id(&self, food_id: &str) -> AppResult<Option<FoodRecord>> {
        let row = sqlx::query(
            r"
            SELECT food_id, name, source, common_name, category, brand, nutrition_100g
            FROM foods
            WHERE food_id = ?1
            ",
        )
        .bind(food_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get food by id: {e}")))?;

        row.map(|r| row_to_food(&r)).transpose()
    }

    /// Get a food whose name equals `name`, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<FoodRecord>> {
        let row = sqlx::query(
            r"
            SELECT food_id, name, source, common_name, category, brand, nutrition_100g
            FROM foods
            WHERE name = ?1 COLLATE NOCASE
            ORDER BY food_id
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find food by name: {e}")))?;

        row.map(|r| row_to_food(&r)).transpose()
    }

    /// Get the shortest-named food whose name contains `fragment`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed
    pub async fn find_partial(&self, fragment: &str) -> AppResult<Option<FoodRecord>> {
        let row = sqlx::query(
            r"
            SELECT food_id, name, source, common_name, category, brand, nutrition_100g
            FROM foods
            WHERE instr(lower(name), lower(?1)) > 0
            ORDER BY length(name), name, food_id
            LIMIT 1
            ",
        )
        .bind(fragment)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find food by partial name: {e}")))?;

        row.map(|r| row_to_food(&r)).transpose()
    }

    /// Foods whose name or common name contains `query`, shortest names first
    ///
    /// `limit` is clamped to `1..=MAX_SEARCH_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed
    pub async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<FoodRecord>> {
        let limit = i64::try_from(limit.clamp(1, MAX_SEARCH_LIMIT)).unwrap_or(1);
        let rows = sqlx::query(
            r"
            SELECT food_id, name, source, common_name, category, brand, nutrition_100g
            FROM foods
            WHERE instr(lower(name), lower(?1)) > 0
               OR instr(lower(coalesce(common_name, '')), lower(?1)) > 0
            ORDER BY length(name), name, food_id
            LIMIT ?2
            ",
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search foods: {e}")))?;

        rows.iter().map(row_to_food).collect()
    }

    /// Insert or replace a food
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn upsert(&self, record: &FoodRecord) -> AppResult<()> {
        self.upsert_batch(std::slice::from_ref(record)).await
    }

    /// Insert or replace many foods in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any insert fails; nothing is
    /// written in that case
    pub async fn upsert_batch(&self, records: &[FoodRecord]) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let created_at = Utc::now().to_rfc3339();

        for record in records {
            let finite: NutrientMap = record
                .nutrition_100g
                .iter()
                .filter(|(_, amount)| amount.is_finite())
                .map(|(key, amount)| (key.clone(), *amount))
                .collect();
            let nutrition_json = serde_json::to_string(&finite)?;

            sqlx::query(
                r"
                INSERT INTO foods
                    (food_id, name, source, common_name, category, brand, nutrition_100g, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(food_id) DO UPDATE SET
                    name = excluded.name,
                    source = excluded.source,
                    common_name = excluded.common_name,
                    category = excluded.category,
                    brand = excluded.brand,
                    nutrition_100g = excluded.nutrition_100g
                ",
            )
            .bind(&record.food_id)
            .bind(&record.name)
            .bind(&record.source)
            .bind(&record.common_name)
            .bind(&record.category)
            .bind(&record.brand)
            .bind(&nutrition_json)
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to upsert food '{}': {e}", record.food_id))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit foods: {e}")))?;
        Ok(())
    }

    /// Number of foods in the table
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count foods: {e}")))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Delete every food, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub async fn clear(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM foods")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear foods: {e}")))?;
        Ok(result.rows_affected())
    }
}

/// Convert a database row to a `FoodRecord`
fn row_to_food(row: &SqliteRow) -> AppResult<FoodRecord> {
    let food_id: String = row.get("food_id");
    let nutrition_json: String = row.get("nutrition_100g");
    let nutrition_100g: NutrientMap = serde_json::from_str(&nutrition_json).map_err(|e| {
        AppError::serialization(format!(
            "Invalid nutrition data for food '{food_id}': {e}"
        ))
    })?;

    Ok(FoodRecord {
        food_id,
        name: row.get("name"),
        nutrition_100g,
        source: row.get("source"),
        common_name: row.get("common_name"),
        category: row.get("category"),
        brand: row.get("brand"),
    })
}
