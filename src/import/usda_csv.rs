// ABOUTME: Parses the USDA pipeline CSV export into food records and loads them into SQLite
// ABOUTME: Maps USDA column names to canonical nutrient keys; empty cells stay missing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! USDA CSV import
//!
//! Expected columns: `fdc_id`, `food_description`, and optionally
//! `food_common_name`, `category`, `brand_name`, plus any nutrient column
//! recognized by [`canonical_nutrient_key`]. Other columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::constants::nutrients::canonical_nutrient_key;
use crate::database::FoodRepository;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::FoodRecord;

/// Rows written per transaction
const BATCH_SIZE: usize = 500;

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows written to the food table
    pub imported: usize,
    /// Rows skipped for lacking a name
    pub skipped: usize,
    /// Nutrient cells that were present but not a non-negative number
    pub invalid_cells: usize,
}

/// Parsed CSV contents
#[derive(Debug, Clone, Default)]
pub struct ParsedFoods {
    /// Records in file order
    pub records: Vec<FoodRecord>,
    /// Counts gathered while parsing; `imported` is the number of records
    pub report: ImportReport,
}

#[derive(Debug, Default)]
struct ColumnMap {
    fdc_id: Option<usize>,
    name: Option<usize>,
    common_name: Option<usize>,
    category: Option<usize>,
    brand: Option<usize>,
    nutrients: Vec<(usize, &'static str)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let normalized = header.trim().to_lowercase();
            match normalized.as_str() {
                "fdc_id" | "food_id" => map.fdc_id = Some(index),
                "food_description" | "description" | "name" => map.name = Some(index),
                "food_common_name" | "common_name" => map.common_name = Some(index),
                "category" | "food_category" => map.category = Some(index),
                "brand_name" | "brand_owner" | "brand" => map.brand = Some(index),
                other => match canonical_nutrient_key(other) {
                    Some(key) => map.nutrients.push((index, key)),
                    None => debug!(column = %other, "Ignoring unrecognized CSV column"),
                },
            }
        }
        map
    }
}

/// Parse a USDA pipeline CSV
///
/// # Errors
///
/// Returns `InvalidFormat` if the header has no name column or the CSV
/// itself is malformed
pub fn parse_usda_csv<R: Read>(reader: R, source: &str) -> AppResult<ParsedFoods> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let columns = ColumnMap::from_headers(&headers);
    if columns.name.is_none() {
        return Err(AppError::new(
            ErrorCode::InvalidFormat,
            "CSV has no food_description column",
        )
        .with_details(json!({ "headers": headers.iter().collect::<Vec<_>>() })));
    }
    if columns.nutrients.is_empty() {
        warn!("CSV has no recognized nutrient columns; records will carry no nutrient data");
    }

    let mut parsed = ParsedFoods::default();
    for row in csv_reader.records() {
        let row = row.map_err(csv_error)?;
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let Some(name) = cell(columns.name) else {
            parsed.report.skipped += 1;
            continue;
        };

        let food_id = cell(columns.fdc_id)
            .map_or_else(|| Uuid::new_v4().to_string(), normalize_id);
        let mut record = FoodRecord::new(food_id, name, source);
        record.common_name = cell(columns.common_name).map(str::to_owned);
        record.category = cell(columns.category).map(str::to_owned);
        record.brand = cell(columns.brand).map(str::to_owned);

        for (index, key) in &columns.nutrients {
            let Some(raw) = cell(Some(*index)) else {
                continue;
            };
            match raw.parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount >= 0.0 => {
                    record.nutrition_100g.insert((*key).to_owned(), amount);
                }
                _ => parsed.report.invalid_cells += 1,
            }
        }
        parsed.records.push(record);
    }

    parsed.report.imported = parsed.records.len();
    Ok(parsed)
}

/// Import a CSV file into the food table
///
/// # Errors
///
/// Returns `StorageError` if the file cannot be opened, the errors of
/// [`parse_usda_csv`], or a database error
pub async fn import_usda_csv(
    path: &Path,
    repository: &FoodRepository,
    source: &str,
) -> AppResult<ImportReport> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::from(e).with_details(json!({ "path": path.display().to_string() }))
    })?;
    let parsed = parse_usda_csv(file, source)?;

    for batch in parsed.records.chunks(BATCH_SIZE) {
        repository.upsert_batch(batch).await?;
        debug!(batch.size = batch.len(), "Wrote food batch");
    }

    info!(
        import.path = %path.display(),
        import.imported = parsed.report.imported,
        import.skipped = parsed.report.skipped,
        import.invalid_cells = parsed.report.invalid_cells,
        "Imported USDA foods"
    );
    Ok(parsed.report)
}

/// Exported ids sometimes carry a float suffix (`173904.0`)
fn normalize_id(raw: &str) -> String {
    raw.strip_suffix(".0")
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(raw)
        .to_owned()
}

fn csv_error(error: csv::Error) -> AppError {
    let line = error.position().map(csv::Position::line);
    AppError::new(ErrorCode::InvalidFormat, format!("Malformed CSV: {error}"))
        .with_details(json!({ "line": line }))
}
