//! Named templates mapping a parameter bag onto a filter builder.

use foundry_rules_config::WorkflowDefinition;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::builders::{
    null_filter, numeric_range_filter, string_equals_filter, string_or_filter, wrap_as_rule_logic,
};
use crate::json::is_truthy;
use crate::model::FilterRule;

/// Built-in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    StringEquals,
    StringOr,
    NumericRange,
    NullCheck,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::StringEquals,
        Template::StringOr,
        Template::NumericRange,
        Template::NullCheck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Template::StringEquals => "string-equals",
            Template::StringOr => "string-or",
            Template::NumericRange => "numeric-range",
            Template::NullCheck => "null-check",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::StringEquals => "Simple string equality filter",
            Template::StringOr => "OR filter with multiple string values",
            Template::NumericRange => "Numeric range filter (min <= value <= max)",
            Template::NullCheck => "Check if property is null or not null",
        }
    }

    /// Parameter names; `?` marks optional, `[]` marks a list.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            Template::StringEquals => &["propertyId", "value", "caseSensitive?"],
            Template::StringOr => &["propertyId", "values[]", "caseSensitive?"],
            Template::NumericRange => &["propertyId", "min?", "max?"],
            Template::NullCheck => &["propertyId", "isNull?"],
        }
    }

    fn build(&self, params: &Params<'_>, object_type_id: &str) -> Result<FilterRule, Vec<String>> {
        let mut errors = Vec::new();
        let property_id = params.property_id(&mut errors);

        let rule = match self {
            Template::StringEquals => {
                let value = params.get("value").filter(|v| is_truthy(v));
                if value.is_none() {
                    errors.push("Missing required parameter: value".to_string());
                }
                let case_sensitive = params.flag("caseSensitive", false, &mut errors);
                match (property_id, value) {
                    (Some(p), Some(v)) if errors.is_empty() => Ok(string_equals_filter(
                        object_type_id,
                        p,
                        v.clone(),
                        case_sensitive,
                    )),
                    _ => return Err(errors),
                }
            }
            Template::StringOr => {
                let values = params
                    .get("values")
                    .and_then(Value::as_array)
                    .filter(|v| !v.is_empty());
                if values.is_none() {
                    errors.push("Missing or empty required parameter: values".to_string());
                }
                let case_sensitive = params.flag("caseSensitive", false, &mut errors);
                match (property_id, values) {
                    (Some(p), Some(v)) if errors.is_empty() => {
                        string_or_filter(object_type_id, p, v, case_sensitive)
                    }
                    _ => return Err(errors),
                }
            }
            Template::NumericRange => {
                let min = params.number("min", &mut errors);
                let max = params.number("max", &mut errors);
                if params.get("min").is_none() && params.get("max").is_none() {
                    errors.push("At least one of min or max is required".to_string());
                }
                match property_id {
                    Some(p) if errors.is_empty() => numeric_range_filter(object_type_id, p, min, max),
                    _ => return Err(errors),
                }
            }
            Template::NullCheck => {
                let is_null = params.flag("isNull", true, &mut errors);
                match property_id {
                    Some(p) if errors.is_empty() => Ok(null_filter(object_type_id, p, is_null)),
                    _ => return Err(errors),
                }
            }
        };

        rule.map_err(|e| vec![e.to_string()])
    }
}

/// Parameter bag with `null` treated as absent.
struct Params<'a>(&'a Map<String, Value>);

impl<'a> Params<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn property_id(&self, errors: &mut Vec<String>) -> Option<&'a str> {
        match self.get("propertyId") {
            Some(v) if !is_truthy(v) => {
                errors.push("Missing required parameter: propertyId".to_string());
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                errors.push("Parameter propertyId must be a string".to_string());
                None
            }
            None => {
                errors.push("Missing required parameter: propertyId".to_string());
                None
            }
        }
    }

    fn flag(&self, key: &str, default: bool, errors: &mut Vec<String>) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                errors.push(format!("Parameter {} must be a boolean", key));
                default
            }
        }
    }

    fn number(&self, key: &str, errors: &mut Vec<String>) -> Option<Number> {
        match self.get(key) {
            None => None,
            Some(Value::Number(n)) => Some(n.clone()),
            Some(_) => {
                errors.push(format!("Parameter {} must be a number", key));
                None
            }
        }
    }
}

/// Build a complete rule-logic document from a template.
///
/// Every missing or mistyped parameter is reported at once. Failures of any
/// kind come back as error strings; this function never panics on input.
pub fn build_from_template(
    name: &str,
    params: &Map<String, Value>,
    workflow: &WorkflowDefinition,
) -> Result<Value, Vec<String>> {
    let Some(template) = Template::parse(name) else {
        return Err(vec![format!("Unknown template: {}", name)]);
    };

    let filter = template.build(&Params(params), &workflow.object_type.id)?;
    let document = wrap_as_rule_logic(filter, workflow)
        .to_value()
        .map_err(|e| vec![e.to_string()])?;

    debug!(template = name, "Built rule logic from template");
    Ok(document)
}

/// Catalog entry for a built-in template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub description: String,
    pub parameters: Vec<String>,
}

/// All built-in templates.
pub fn builtin_templates() -> Vec<TemplateInfo> {
    Template::ALL
        .iter()
        .map(|t| TemplateInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters().iter().map(|p| p.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundry_rules_config::{ObjectTypeConfig, OutputConfig};
    use serde_json::json;

    fn workflow() -> WorkflowDefinition {
        WorkflowDefinition {
            name: "Test".to_string(),
            workflow_rid: "ri.workflow.test".to_string(),
            object_type: ObjectTypeConfig {
                id: "obj".to_string(),
                dynamic_lookup: false,
                properties: Vec::new(),
            },
            output: OutputConfig {
                id: "out".to_string(),
                version: "1".to_string(),
                parameters: Vec::new(),
            },
        }
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_equals() {
        let doc = build_from_template(
            "string-equals",
            &params(json!({"propertyId": "status", "value": "open"})),
            &workflow(),
        )
        .unwrap();

        assert_eq!(doc["workflowRid"], "ri.workflow.test");
        let leaf = &doc["strategy"]["filterNode"]["filter"]["columnFilterRule"];
        assert_eq!(leaf["column"]["objectProperty"]["objectTypeId"], "obj");
        assert_eq!(leaf["filter"]["stringColumnFilter"]["values"], json!(["open"]));
        assert_eq!(leaf["filter"]["stringColumnFilter"]["caseSensitive"], false);
    }

    #[test]
    fn test_missing_value_is_named() {
        let errors = build_from_template(
            "string-equals",
            &params(json!({"propertyId": "p"})),
            &workflow(),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Missing required parameter: value"]);
    }

    #[test]
    fn test_all_missing_parameters_reported() {
        let errors = build_from_template("string-equals", &Map::new(), &workflow()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Missing required parameter: propertyId",
                "Missing required parameter: value"
            ]
        );

        let errors = build_from_template("string-or", &params(json!({"values": []})), &workflow())
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("values"));

        let errors = build_from_template("numeric-range", &Map::new(), &workflow()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Missing required parameter: propertyId",
                "At least one of min or max is required"
            ]
        );
    }

    #[test]
    fn test_type_errors() {
        let errors = build_from_template(
            "numeric-range",
            &params(json!({"propertyId": "amount", "min": "ten"})),
            &workflow(),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Parameter min must be a number"]);

        let errors = build_from_template(
            "null-check",
            &params(json!({"propertyId": "p", "isNull": "yes"})),
            &workflow(),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Parameter isNull must be a boolean"]);
    }

    #[test]
    fn test_numeric_range_with_null_bound() {
        let doc = build_from_template(
            "numeric-range",
            &params(json!({"propertyId": "amount", "min": null, "max": 100})),
            &workflow(),
        )
        .unwrap();
        let leaf = &doc["strategy"]["filterNode"]["filter"]["columnFilterRule"];
        assert_eq!(leaf["filter"]["numericColumnFilter"]["type"], "LESS_THAN_OR_EQUAL");
    }

    #[test]
    fn test_null_check_defaults_to_null() {
        let doc = build_from_template("null-check", &params(json!({"propertyId": "p"})), &workflow())
            .unwrap();
        let leaf = &doc["strategy"]["filterNode"]["filter"]["columnFilterRule"];
        assert_eq!(leaf["filter"]["nullColumnFilter"]["type"], "NULL");
    }

    #[test]
    fn test_unknown_template() {
        let errors = build_from_template(
            "regex-match",
            &params(json!({"propertyId": "p"})),
            &workflow(),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Unknown template: regex-match"]);
    }

    #[test]
    fn test_catalog() {
        let names: Vec<_> = builtin_templates().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["string-equals", "string-or", "numeric-range", "null-check"]
        );
        assert_eq!(Template::parse("string-or"), Some(Template::StringOr));
    }
}
