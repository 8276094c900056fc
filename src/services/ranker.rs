//! Preference-based ordering of alternatives.

use std::cmp::Reverse;

use crate::adapter::LabelPredicate;
use crate::models::{Alternative, CaseRule};

/// A ranking rule with its current preference value filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRule {
    pub key: String,
    pub value: String,
    pub case: CaseRule,
}

impl PreferenceRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>, case: CaseRule) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            case,
        }
    }
}

/// Anything carrying a free-text label the ranker can match against.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for Alternative {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Default label predicate: substring containment.
///
/// An empty preference value matches nothing.
pub fn contains_preference(label: &str, value: &str, case: CaseRule) -> bool {
    if value.is_empty() {
        return false;
    }
    match case {
        CaseRule::Sensitive => label.contains(value),
        CaseRule::Insensitive => label.to_lowercase().contains(&value.to_lowercase()),
    }
}

/// Order `items` so that matches of the first rule come first, ties broken
/// by the next rule, and so on.
///
/// Items with equal match vectors keep their input order, so ranking is
/// idempotent and an empty rule list returns the input unchanged.
pub fn rank<T: Labeled>(mut items: Vec<T>, rules: &[PreferenceRule], matches: LabelPredicate) -> Vec<T> {
    if rules.is_empty() {
        return items;
    }

    // `sort_by_cached_key` is stable and evaluates each predicate once per item.
    items.sort_by_cached_key(|item| {
        Reverse(
            rules
                .iter()
                .map(|rule| matches(item.label(), &rule.value, rule.case))
                .collect::<Vec<bool>>(),
        )
    });
    items
}
