//! Template building, validation and compression working together.

use foundry_rules_config::{
    ObjectTypeConfig, OutputConfig, PropertyDefinition, PropertyType, ValidationConfig,
    WorkflowConfig, WorkflowDefinition,
};
use foundry_rules_logic::validation::{extract_object_type_id, extract_workflow_rid};
use foundry_rules_logic::{
    build_from_template, compress, decompress, validate_filter_types, validate_properties,
    validate_rule_logic,
};
use serde_json::{Map, Value, json};

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

fn workflow() -> WorkflowDefinition {
    let property = |id: &str, kind| PropertyDefinition {
        id: id.to_string(),
        kind,
        description: None,
        nullable: Some(true),
    };
    WorkflowDefinition {
        name: "Flagged orders".to_string(),
        workflow_rid: "ri.rules.main.workflow.orders".to_string(),
        object_type: ObjectTypeConfig {
            id: "order".to_string(),
            dynamic_lookup: false,
            properties: vec![
                property("status", PropertyType::String),
                property("amount", PropertyType::Number),
                property("closedAt", PropertyType::Timestamp),
            ],
        },
        output: OutputConfig {
            id: "flag-output".to_string(),
            version: "2".to_string(),
            parameters: Vec::new(),
        },
    }
}

fn validation() -> ValidationConfig {
    WorkflowConfig::starter().validation
}

fn params(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn build(template: &str, value: Value) -> Value {
    build_from_template(template, &params(value), &workflow()).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn built_templates_pass_every_validator() {
    let documents = [
        build("string-equals", json!({"propertyId": "status", "value": "open"})),
        build("string-or", json!({"propertyId": "status", "values": ["open", "held"]})),
        build("numeric-range", json!({"propertyId": "amount", "min": 10, "max": 500.5})),
        build("null-check", json!({"propertyId": "closedAt", "isNull": false})),
    ];

    for document in &documents {
        let structure = validate_rule_logic(document, &validation());
        assert!(structure.valid, "{:?}", structure.errors);

        let properties = validate_properties(document, &workflow().object_type);
        assert!(properties.valid, "{:?}", properties.errors);

        let filters = validate_filter_types(document, &validation());
        assert!(filters.valid, "{:?}", filters.errors);
        assert!(filters.warnings.is_empty(), "{:?}", filters.warnings);

        assert_eq!(extract_object_type_id(document), Some("order"));
        assert_eq!(
            extract_workflow_rid(document),
            Some("ri.rules.main.workflow.orders")
        );
    }
}

#[test]
fn compressed_document_round_trips() {
    let document = build("string-or", json!({"propertyId": "status", "values": ["a", "b"]}));
    let envelope = compress(&document);

    let wrapper: Value = serde_json::from_str(&envelope).unwrap();
    assert_eq!(wrapper["type"], "compressedValue");
    assert_eq!(decompress(&envelope).unwrap(), document);
}

#[test]
fn unknown_property_is_reported_with_valid_list() {
    let document = build("string-equals", json!({"propertyId": "region", "value": "EU"}));
    let result = validate_properties(&document, &workflow().object_type);

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("\"region\""));
    assert!(result.errors[0].contains("status, amount, closedAt"));
}

#[test]
fn hand_written_regex_filter_is_rejected() {
    let mut document = build("string-equals", json!({"propertyId": "status", "value": "x"}));
    document["strategy"]["filterNode"]["filter"]["columnFilterRule"]["filter"]
        ["stringColumnFilter"]["type"] = json!("REGEX");

    let result = validate_filter_types(&document, &validation());
    assert!(!result.valid);
    assert_eq!(result.used_filters.string, vec!["REGEX"]);
    assert!(result.errors[0].contains("EQUALS, CONTAINS, STARTS_WITH, ENDS_WITH"));
}
