// ABOUTME: Core types and constants for the macro calculation engine
// ABOUTME: Foundation crate with error handling and nutrient/tool constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Macro Engine Core
//!
//! Foundation crate providing shared types and constants for the macro
//! calculation engine. It changes rarely, so the main crate can rebuild
//! without recompiling it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ToolError`
//! - **constants**: Canonical nutrient keys, USDA column aliases, tool names

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;
