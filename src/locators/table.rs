use crate::locators::Strategy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Suggested locators for one element, keyed by strategy.
///
/// Uses IndexMap to preserve the order entries were suggested in; strategies
/// without a locator are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorTable {
    map: IndexMap<Strategy, String>,
}

impl LocatorTable {
    /// Create a new empty LocatorTable
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    /// Record a locator, keeping the first one suggested for a strategy
    pub fn insert(&mut self, strategy: Strategy, locator: impl Into<String>) -> bool {
        if self.map.contains_key(&strategy) {
            return false;
        }
        self.map.insert(strategy, locator.into());
        true
    }

    /// Record a locator if one was produced
    pub fn insert_opt(&mut self, strategy: Strategy, locator: Option<String>) {
        if let Some(locator) = locator {
            self.insert(strategy, locator);
        }
    }

    /// Get the locator for a strategy
    pub fn get(&self, strategy: Strategy) -> Option<&str> {
        self.map.get(&strategy).map(String::as_str)
    }

    /// Check if a strategy has a locator
    pub fn contains(&self, strategy: Strategy) -> bool {
        self.map.contains_key(&strategy)
    }

    /// Get the number of locators
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Append another table's entries, keeping existing ones
    pub fn extend(&mut self, other: LocatorTable) {
        for (strategy, locator) in other.map {
            self.insert(strategy, locator);
        }
    }

    /// Iterate over all (strategy, locator) pairs in suggestion order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, &str)> {
        self.map.iter().map(|(s, l)| (*s, l.as_str()))
    }

    /// Get all strategies with a locator
    pub fn strategies(&self) -> impl Iterator<Item = Strategy> + '_ {
        self.map.keys().copied()
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.map)
    }
}
