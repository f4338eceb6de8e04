// ABOUTME: Central registry of the JSON tools with lookup by name
// ABOUTME: Keeps registration order for stable tool listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Registry
//!
//! Built once at startup and then used immutably. Tools are `Arc`-wrapped
//! so the registry can be cloned cheaply.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::nutrition::{
    AnalyzeMealTool, AnalyzeNutrientGapsTool, CalculateMacrosTool, ListDriProfilesTool,
    LookupFoodTool, SearchFoodsTool,
};
use super::schema::ToolDefinition;
use super::traits::NutritionTool;

/// Registry of callable tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn NutritionTool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in nutrition tool
    #[must_use]
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LookupFoodTool));
        registry.register(Arc::new(SearchFoodsTool));
        registry.register(Arc::new(CalculateMacrosTool));
        registry.register(Arc::new(AnalyzeMealTool));
        registry.register(Arc::new(AnalyzeNutrientGapsTool));
        registry.register(Arc::new(ListDriProfilesTool));
        registry
    }

    /// Register a tool
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if the name is taken
    pub fn register(&mut self, tool: Arc<dyn NutritionTool>) -> bool {
        let name = tool.name().to_owned();
        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }
        debug!("Registering tool '{}'", name);
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        true
    }

    /// Look up a tool by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn NutritionTool>> {
        self.tools.get(name).cloned()
    }

    /// Names in registration order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Definitions in registration order
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tools::ALL_TOOLS;

    #[test]
    fn test_builtin_tools_match_constants() {
        let registry = ToolRegistry::with_builtin_tools();
        assert_eq!(registry.len(), ALL_TOOLS.len());
        assert_eq!(registry.names(), ALL_TOOLS);
        assert!(registry.get("bake_cake").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::with_builtin_tools();
        assert!(!registry.register(Arc::new(LookupFoodTool)));
        assert_eq!(registry.len(), ALL_TOOLS.len());
    }

    #[test]
    fn test_definitions_carry_schemas() {
        let definitions = ToolRegistry::with_builtin_tools().definitions();
        let macros = definitions
            .iter()
            .find(|d| d.name == "calculate_macros")
            .unwrap();
        assert_eq!(
            macros.input_schema.required,
            Some(vec!["food".to_owned(), "grams".to_owned()])
        );
        let json = serde_json::to_value(macros).unwrap();
        assert_eq!(json["inputSchema"]["properties"]["grams"]["type"], "number");
    }
}
