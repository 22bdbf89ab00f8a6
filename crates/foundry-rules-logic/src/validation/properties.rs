//! Property reference checks against the object type declaration.

use std::collections::BTreeSet;

use foundry_rules_config::ObjectTypeConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::json::object_field;
use crate::model::{Column, FilterRule, MAX_FILTER_DEPTH_CEILING, StrategyKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Every property the document references, sorted.
    pub used_properties: Vec<String>,
    /// Declared properties, in declaration order.
    pub valid_properties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySummary {
    pub properties: Vec<String>,
    pub count: usize,
}

/// Property ids collected from a document.
#[derive(Debug, Default)]
struct Extraction {
    ids: BTreeSet<String>,
    errors: Vec<String>,
}

impl Extraction {
    fn add_column(&mut self, column: Option<&Value>) {
        if let Some(id) = column
            .and_then(Column::from_value)
            .as_ref()
            .and_then(Column::property_id)
        {
            self.ids.insert(id.to_string());
        }
    }

    fn add_filter(&mut self, filter: &Value) {
        match FilterRule::from_value(filter, MAX_FILTER_DEPTH_CEILING) {
            Ok(Some(rule)) => {
                self.ids
                    .extend(rule.leaves().iter().filter_map(|l| l.property_id()).map(String::from));
            }
            Ok(None) => {}
            Err(e) => self.errors.push(format!("Cannot read filter properties: {}", e)),
        }
    }

    fn add_window_node(&mut self, node: &Value) {
        for entry in array(node, "columnsToAdd") {
            self.add_column(entry.get("columnDefinition").and_then(|d| d.get("column")));
        }
        for column in array(node, "partitionBy") {
            self.add_column(Some(column));
        }
    }

    fn add_aggregation_node(&mut self, node: &Value) {
        for entry in array(node, "columnsToAdd") {
            self.add_column(
                entry
                    .get("columnDefinition")
                    .and_then(|d| d.get("aggregationColumn")),
            );
        }
        for entry in array(node, "groupByColumns") {
            self.add_column(entry.get("column"));
        }
    }

    fn add_parameter_values(&mut self, effect: &Value) {
        let Some(values) = effect
            .get("v2")
            .and_then(|v2| v2.get("parameterValues"))
            .and_then(Value::as_object)
        else {
            return;
        };
        for value in values.values() {
            if value.get("type").and_then(Value::as_str) == Some("column") {
                self.add_column(value.get("column"));
            }
        }
    }
}

fn array<'a>(node: &'a Value, key: &str) -> &'a [Value] {
    node.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn extract(document: &Value) -> Extraction {
    let mut extraction = Extraction::default();

    if let Some(strategy) = object_field(document, "strategy") {
        let node = |kind: StrategyKind| {
            strategy
                .get(kind.as_str())
                .filter(|n| n.as_object().is_some_and(|o| !o.is_empty()))
        };

        if let Some(filter) = node(StrategyKind::FilterNode).and_then(|n| n.get("filter")) {
            extraction.add_filter(filter);
        }
        if let Some(window) = node(StrategyKind::WindowNode) {
            extraction.add_window_node(window);
        }
        if let Some(aggregation) = node(StrategyKind::AggregationNode) {
            extraction.add_aggregation_node(aggregation);
        }
    }

    if let Some(effect) = document.get("effect") {
        extraction.add_parameter_values(effect);
    }

    extraction
}

/// Every property id the document references, sorted and deduplicated.
pub fn extract_all_properties(document: &Value) -> Vec<String> {
    extract(document).ids.into_iter().collect()
}

/// Check every referenced property against the object type's declared list.
pub fn validate_properties(
    document: &Value,
    object_type: &ObjectTypeConfig,
) -> PropertyValidationResult {
    let Extraction { ids, mut errors } = extract(document);
    let valid_properties: Vec<String> = object_type
        .property_ids()
        .into_iter()
        .map(String::from)
        .collect();

    for id in ids.iter().filter(|id| !object_type.has_property(id)) {
        errors.push(format!(
            "Property \"{}\" does not exist on object type \"{}\". Valid properties: {}",
            id,
            object_type.id,
            valid_properties.join(", ")
        ));
    }

    debug!(
        used = ids.len(),
        errors = errors.len(),
        "Property validation finished"
    );

    PropertyValidationResult {
        valid: errors.is_empty(),
        errors,
        used_properties: ids.into_iter().collect(),
        valid_properties,
    }
}

pub fn property_summary(document: &Value) -> PropertySummary {
    let properties = extract_all_properties(document);
    PropertySummary {
        count: properties.len(),
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_rules_config::{PropertyDefinition, PropertyType};
    use serde_json::json;

    fn object_type(ids: &[&str]) -> ObjectTypeConfig {
        ObjectTypeConfig {
            id: "obj".to_string(),
            dynamic_lookup: false,
            properties: ids
                .iter()
                .map(|id| PropertyDefinition {
                    id: id.to_string(),
                    kind: PropertyType::String,
                    description: None,
                    nullable: None,
                })
                .collect(),
        }
    }

    fn column(id: &str) -> Value {
        json!({"objectProperty": {"objectTypeId": "obj", "propertyTypeId": id}, "type": "objectProperty"})
    }

    fn leaf(id: &str) -> Value {
        json!({
            "columnFilterRule": {
                "column": column(id),
                "filter": {"nullColumnFilter": {"type": "NULL"}, "type": "nullColumnFilter"}
            },
            "type": "columnFilterRule"
        })
    }

    fn filter_document(filter: Value) -> Value {
        json!({"strategy": {"type": "filterNode", "filterNode": {"filter": filter}}})
    }

    #[test]
    fn test_unknown_property() {
        let doc = filter_document(leaf("c"));
        let result = validate_properties(&doc, &object_type(&["a", "b"]));

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![r#"Property "c" does not exist on object type "obj". Valid properties: a, b"#]
        );
        assert_eq!(result.used_properties, vec!["c"]);
        assert_eq!(result.valid_properties, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_filters_sorted_and_deduplicated() {
        let doc = filter_document(json!({
            "orFilterRule": {"filters": [
                leaf("b"),
                {"notFilterRule": {"filter": leaf("a")}, "type": "notFilterRule"},
                {"andFilterRule": {"filters": [leaf("b"), leaf("c")]}, "type": "andFilterRule"}
            ]},
            "type": "orFilterRule"
        }));
        let result = validate_properties(&doc, &object_type(&["a", "b", "c"]));
        assert!(result.valid);
        assert_eq!(result.used_properties, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_window_and_aggregation_nodes() {
        let doc = json!({
            "strategy": {
                "windowNode": {
                    "columnsToAdd": [{"columnDefinition": {"column": column("w1")}}],
                    "partitionBy": [column("w2"), "garbage"]
                },
                "aggregationNode": {
                    "columnsToAdd": [{"columnDefinition": {"aggregationColumn": column("g1")}}],
                    "groupByColumns": [{"column": column("g2")}]
                }
            }
        });
        assert_eq!(extract_all_properties(&doc), vec!["g1", "g2", "w1", "w2"]);
    }

    #[test]
    fn test_effect_parameter_columns() {
        let doc = json!({
            "effect": {"v2": {"parameterValues": {
                "p1": {"type": "column", "column": column("amount")},
                "p2": {"type": "literal", "column": column("ignored")}
            }}}
        });
        let summary = property_summary(&doc);
        assert_eq!(summary.properties, vec!["amount"]);
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_empty_document() {
        let result = validate_properties(&json!({}), &object_type(&["a"]));
        assert!(result.valid);
        assert!(result.used_properties.is_empty());
    }
}
