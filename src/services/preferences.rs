//! Read-only view of user preferences used for ranking.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::models::RankingRule;
use crate::services::ranker::PreferenceRule;

/// Persisted preference values. The pipeline only reads them.
pub trait PreferenceStore: Send + Sync {
    fn current_value(&self, key: &str) -> Option<String>;
}

/// Preferences held in memory, seeded from the config file.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Record an explicit user change.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }
}

impl PreferenceStore for MemoryPreferences {
    fn current_value(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// Fill each rule with the store's current value, or its default.
pub fn resolve_rules(rules: &[RankingRule], store: &dyn PreferenceStore) -> Vec<PreferenceRule> {
    rules
        .iter()
        .map(|rule| {
            let value = store
                .current_value(&rule.key)
                .unwrap_or_else(|| rule.default.clone());
            PreferenceRule::new(&rule.key, value, rule.case)
        })
        .collect()
}
