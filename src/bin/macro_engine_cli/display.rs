// ABOUTME: Output helpers for the macro-engine CLI
// ABOUTME: Writes results and error bodies to stdout as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::{self, Write};

use anyhow::Result;
use macro_engine::errors::{AppError, ErrorResponse};
use serde::Serialize;
use serde_json::json;

/// Write a value to stdout as one JSON document
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

/// Write an error as `{"error": {...}}`
pub fn print_error(error: &AppError, pretty: bool) -> Result<()> {
    print_json(&json!({ "error": ErrorResponse::from(error) }), pretty)
}
