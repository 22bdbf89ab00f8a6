//! Top-level structure checks and document introspection.

use foundry_rules_config::ValidationConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::json::{describe, is_truthy, object_field, str_field};
use crate::model::{FilterRule, StrategyKind};

/// Outcome of a structure check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Reserved; currently always empty for structure checks.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Check the top-level shape of a rule-logic document.
///
/// All applicable errors are collected; checks on a child are skipped only
/// when its parent is missing.
pub fn validate_rule_logic(document: &Value, config: &ValidationConfig) -> ValidationResult {
    if !document.is_object() || !is_truthy(document) {
        return ValidationResult::from_errors(vec!["Root must be an object".to_string()]);
    }

    let mut errors = Vec::new();

    let grammar = document.get("grammarVersion");
    if grammar.and_then(Value::as_str) != Some(config.grammar_version.as_str()) {
        errors.push(format!(
            "grammarVersion must be '{}', got: {}",
            config.grammar_version,
            describe(grammar)
        ));
    }

    if str_field(document, "workflowRid").is_none() {
        errors.push("workflowRid is required and must be a string".to_string());
    }

    match object_field(document, "strategy") {
        None => errors.push("strategy is required and must be an object".to_string()),
        Some(strategy) => {
            let strategy_type = strategy.get("type");
            let supported = strategy_type
                .and_then(Value::as_str)
                .is_some_and(|t| config.supported_strategy_types.iter().any(|s| s == t));
            if !supported {
                errors.push(format!(
                    "strategy.type must be one of [{}], got: {}",
                    config.supported_strategy_types.join(", "),
                    describe(strategy_type)
                ));
            }

            if let Some(t) = strategy_type.filter(|t| is_truthy(t)) {
                let key = describe(Some(t));
                if !strategy.contains_key(&key) {
                    errors.push(format!("strategy.{key} is required when type is '{key}'"));
                }
            }

            let filter_node = strategy
                .get(StrategyKind::FilterNode.as_str())
                .and_then(Value::as_object)
                .filter(|node| !node.is_empty());
            if let Some(node) = filter_node {
                if strategy_type
                    .and_then(Value::as_str)
                    .and_then(StrategyKind::parse)
                    == Some(StrategyKind::FilterNode)
                    && node.contains_key("type")
                {
                    errors.push(
                        "filterNode should NOT have a type field (type goes in strategy)".to_string(),
                    );
                }
                if let Some(filter) = node.get("filter")
                    && let Err(e) = FilterRule::from_value(filter, config.max_filter_depth)
                {
                    errors.push(format!("strategy.filterNode.filter: {}", e));
                }
            }
        }
    }

    match object_field(document, "effect") {
        None => errors.push("effect is required and must be an object".to_string()),
        Some(effect) => {
            let effect_type = effect.get("type");
            if effect_type.and_then(Value::as_str) != Some("v2") {
                errors.push(format!(
                    "effect.type must be 'v2', got: {}",
                    describe(effect_type)
                ));
            }

            match effect.get("v2").and_then(Value::as_object).filter(|v2| !v2.is_empty()) {
                None => errors.push("effect.v2 is required".to_string()),
                Some(v2) => {
                    if !v2.get("outputAndVersion").is_some_and(is_truthy) {
                        errors.push("effect.v2.outputAndVersion is required".to_string());
                    }
                }
            }
        }
    }

    debug!(errors = errors.len(), "Structure validation finished");
    ValidationResult::from_errors(errors)
}

// ─────────────────────────────────────────────────────────────────────────────
// Introspection
// ─────────────────────────────────────────────────────────────────────────────

/// Value of `strategy.type`, if present.
pub fn strategy_type(document: &Value) -> Option<&str> {
    object_field(document, "strategy")?
        .get("type")
        .and_then(Value::as_str)
}

/// Object type the strategy reads from, from whichever node kind is present.
pub fn extract_object_type_id(document: &Value) -> Option<&str> {
    let strategy = document.get("strategy")?;
    [
        StrategyKind::FilterNode,
        StrategyKind::WindowNode,
        StrategyKind::AggregationNode,
    ]
    .iter()
    .find_map(|kind| {
        let node = strategy.get(kind.as_str())?;
        let source = node.get("nodeInput")?.get("source")?;
        str_field(source, "objectTypeId")
    })
}

/// Value of `workflowRid`, if present and non-empty.
pub fn extract_workflow_rid(document: &Value) -> Option<&str> {
    str_field(document, "workflowRid")
}

/// Check that the document targets the expected workflow.
pub fn validate_workflow_rid(document: &Value, expected: &str) -> ValidationResult {
    match extract_workflow_rid(document) {
        None => ValidationResult::from_errors(vec!["workflowRid not found in rule logic".to_string()]),
        Some(actual) if actual != expected => ValidationResult::from_errors(vec![format!(
            "workflowRid mismatch: expected '{}', got '{}'",
            expected, actual
        )]),
        Some(_) => ValidationResult::from_errors(Vec::new()),
    }
}

/// Check that the document reads from the expected object type.
pub fn validate_object_type(document: &Value, expected: &str) -> ValidationResult {
    match extract_object_type_id(document) {
        None => ValidationResult::from_errors(vec!["objectTypeId not found in rule logic".to_string()]),
        Some(actual) if actual != expected => ValidationResult::from_errors(vec![format!(
            "objectTypeId mismatch: expected '{}', got '{}'",
            expected, actual
        )]),
        Some(_) => ValidationResult::from_errors(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ValidationConfig {
        ValidationConfig {
            grammar_version: "V1".to_string(),
            supported_strategy_types: vec!["filterNode".to_string()],
            supported_string_filters: vec!["EQUALS".to_string()],
            unsupported_string_filters: Vec::new(),
            supported_numeric_filters: Vec::new(),
            supported_null_filters: Vec::new(),
            max_filter_depth: 4,
        }
    }

    fn document() -> Value {
        json!({
            "grammarVersion": "V1",
            "workflowRid": "ri.workflow.x",
            "strategy": {
                "type": "filterNode",
                "filterNode": {
                    "nodeInput": {"source": {"objectTypeId": "obj", "type": "objectTypeId"}, "type": "source"},
                    "filter": {},
                    "joinFilterInputs": {}
                }
            },
            "effect": {"type": "v2", "v2": {"outputAndVersion": {"outputId": "out"}}}
        })
    }

    #[test]
    fn test_valid_document() {
        let result = validate_rule_logic(&document(), &config());
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_root_must_be_object() {
        for doc in [json!(null), json!([]), json!("x"), json!({})] {
            let result = validate_rule_logic(&doc, &config());
            assert_eq!(result.errors, vec!["Root must be an object"]);
        }
    }

    #[test]
    fn test_filter_node_type_field() {
        let mut doc = document();
        doc["strategy"]["filterNode"]["type"] = json!("filterNode");
        let result = validate_rule_logic(&doc, &config());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("filterNode"));
        assert!(result.errors[0].contains("type"));
    }

    #[test]
    fn test_errors_accumulate() {
        let doc = json!({
            "grammarVersion": "V2",
            "strategy": {"type": "windowNode"},
            "effect": {"type": "v1"}
        });
        let result = validate_rule_logic(&doc, &config());
        assert_eq!(
            result.errors,
            vec![
                "grammarVersion must be 'V1', got: V2",
                "workflowRid is required and must be a string",
                "strategy.type must be one of [filterNode], got: windowNode",
                "strategy.windowNode is required when type is 'windowNode'",
                "effect.type must be 'v2', got: v1",
                "effect.v2 is required",
            ]
        );
    }

    #[test]
    fn test_missing_parents_suppress_child_checks() {
        let doc = json!({"grammarVersion": "V1", "workflowRid": "rid"});
        let result = validate_rule_logic(&doc, &config());
        assert_eq!(
            result.errors,
            vec![
                "strategy is required and must be an object",
                "effect is required and must be an object",
            ]
        );
    }

    #[test]
    fn test_missing_output_and_version() {
        let mut doc = document();
        doc["effect"]["v2"] = json!({"parameterValues": {}});
        let result = validate_rule_logic(&doc, &config());
        assert_eq!(result.errors, vec!["effect.v2.outputAndVersion is required"]);
    }

    #[test]
    fn test_filter_depth_limit() {
        let mut filter = json!({
            "columnFilterRule": {"filter": {"nullColumnFilter": {"type": "NULL"}, "type": "nullColumnFilter"}},
            "type": "columnFilterRule"
        });
        for _ in 0..4 {
            filter = json!({"notFilterRule": {"filter": filter}, "type": "notFilterRule"});
        }
        let mut doc = document();
        doc["strategy"]["filterNode"]["filter"] = filter;

        let result = validate_rule_logic(&doc, &config());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("deeper than 4"));
    }

    #[test]
    fn test_introspection() {
        let doc = document();
        assert_eq!(strategy_type(&doc), Some("filterNode"));
        assert_eq!(extract_object_type_id(&doc), Some("obj"));
        assert_eq!(extract_workflow_rid(&doc), Some("ri.workflow.x"));

        assert!(validate_workflow_rid(&doc, "ri.workflow.x").valid);
        assert_eq!(
            validate_workflow_rid(&doc, "ri.other").errors,
            vec!["workflowRid mismatch: expected 'ri.other', got 'ri.workflow.x'"]
        );
        assert!(validate_object_type(&doc, "obj").valid);
        assert_eq!(
            validate_object_type(&json!({}), "obj").errors,
            vec!["objectTypeId not found in rule logic"]
        );
    }

    #[test]
    fn test_object_type_from_window_node() {
        let doc = json!({
            "strategy": {
                "type": "windowNode",
                "windowNode": {"nodeInput": {"source": {"objectTypeId": "events"}}}
            }
        });
        assert_eq!(extract_object_type_id(&doc), Some("events"));
    }
}
