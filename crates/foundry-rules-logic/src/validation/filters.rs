//! Comparator support checks for the filter-node filter tree.
//!
//! Only `strategy.filterNode.filter` is inspected. Window and aggregation
//! strategies have no filter tree here and always pass.

use std::collections::BTreeSet;

use foundry_rules_config::ValidationConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::model::{ComparatorFamily, FilterRule, MAX_FILTER_DEPTH_CEILING, StrategyKind};

/// Comparator types in use, per family, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsedFilters {
    pub string: Vec<String>,
    pub numeric: Vec<String>,
    pub null: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub used_filters: UsedFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub string_filters: Vec<String>,
    pub numeric_filters: Vec<String>,
    pub null_filters: Vec<String>,
    pub has_compound_filters: bool,
}

fn active_filter(document: &Value, max_depth: usize) -> Result<Option<FilterRule>> {
    let filter = document
        .get("strategy")
        .and_then(|s| s.get(StrategyKind::FilterNode.as_str()))
        .and_then(|n| n.get("filter"));
    match filter {
        Some(filter) => FilterRule::from_value(filter, max_depth),
        None => Ok(None),
    }
}

fn collect_used(rule: Option<&FilterRule>) -> UsedFilters {
    let mut string = BTreeSet::new();
    let mut numeric = BTreeSet::new();
    let mut null = BTreeSet::new();

    for (family, comparator) in rule
        .map(FilterRule::leaves)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|leaf| leaf.comparator())
    {
        let set = match family {
            ComparatorFamily::String => &mut string,
            ComparatorFamily::Numeric => &mut numeric,
            ComparatorFamily::Null => &mut null,
        };
        set.insert(comparator.to_string());
    }

    UsedFilters {
        string: string.into_iter().collect(),
        numeric: numeric.into_iter().collect(),
        null: null.into_iter().collect(),
    }
}

fn listed(list: &[String], comparator: &str) -> bool {
    list.iter().any(|s| s == comparator)
}

/// Classify every comparator in the filter tree against the configured lists.
///
/// Explicitly unsupported string comparators are errors. Untested
/// comparators are warnings; numeric and null comparators are only checked
/// when their supported list is non-empty.
pub fn validate_filter_types(document: &Value, config: &ValidationConfig) -> FilterValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let rule = match active_filter(document, config.max_filter_depth) {
        Ok(rule) => rule,
        Err(e) => {
            errors.push(format!("Cannot check filter types: {}", e));
            None
        }
    };
    let used = collect_used(rule.as_ref());

    for t in &used.string {
        if listed(&config.unsupported_string_filters, t) {
            errors.push(format!(
                "String filter type \"{}\" is not supported. Use one of: {}",
                t,
                config.supported_string_filters.join(", ")
            ));
        } else if !listed(&config.supported_string_filters, t) {
            warnings.push(format!(
                "String filter type \"{}\" is not in the list of tested filters. \
                 It may not render correctly in the UI.",
                t
            ));
        }
    }

    if !config.supported_numeric_filters.is_empty() {
        for t in used
            .numeric
            .iter()
            .filter(|t| !listed(&config.supported_numeric_filters, t))
        {
            warnings.push(format!(
                "Numeric filter type \"{}\" is not in the list of tested filters.",
                t
            ));
        }
    }

    if !config.supported_null_filters.is_empty() {
        for t in used
            .null
            .iter()
            .filter(|t| !listed(&config.supported_null_filters, t))
        {
            warnings.push(format!(
                "Null filter type \"{}\" is not in the list of tested filters.",
                t
            ));
        }
    }

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "Filter type validation finished"
    );

    FilterValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
        used_filters: used,
    }
}

/// Comparators in use and whether the root combines other filters.
pub fn filter_summary(document: &Value) -> FilterSummary {
    let rule = active_filter(document, MAX_FILTER_DEPTH_CEILING).unwrap_or_default();
    let used = collect_used(rule.as_ref());
    FilterSummary {
        string_filters: used.string,
        numeric_filters: used.numeric,
        null_filters: used.null,
        has_compound_filters: rule.as_ref().is_some_and(FilterRule::is_compound),
    }
}
