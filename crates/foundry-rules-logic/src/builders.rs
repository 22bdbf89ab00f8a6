//! Constructors for canonical filter fragments.
//!
//! Every builder is pure; the same arguments always produce the same tree.

use foundry_rules_config::WorkflowDefinition;
use serde_json::{Number, Value};

use crate::error::{LogicError, Result};
use crate::model::{
    Column, ColumnFilter, ColumnFilterRule, FilterMacro, FilterRule, NullColumnFilter,
    NumericColumnFilter, OutputAndVersion, RuleLogic, StringColumnFilter,
};

/// Single `EQUALS` comparison on a string property.
pub fn string_equals_filter(
    object_type_id: &str,
    property_id: &str,
    value: impl Into<Value>,
    case_sensitive: bool,
) -> FilterRule {
    leaf(
        object_type_id,
        property_id,
        ColumnFilter::String(StringColumnFilter {
            comparator: "EQUALS".to_string(),
            values: vec![value.into()],
            case_sensitive,
            ignore_whitespace: false,
            value_macro: Some(FilterMacro::default()),
        }),
    )
}

/// Matches any of `values`, one `EQUALS` leaf per value in input order.
pub fn string_or_filter(
    object_type_id: &str,
    property_id: &str,
    values: &[Value],
    case_sensitive: bool,
) -> Result<FilterRule> {
    if values.is_empty() {
        return Err(LogicError::InvalidArgument(
            "string OR filter requires at least one value".to_string(),
        ));
    }

    let children = values
        .iter()
        .map(|v| string_equals_filter(object_type_id, property_id, v.clone(), case_sensitive))
        .collect();
    Ok(FilterRule::Or(children))
}

/// Inclusive range on a numeric property.
///
/// One bound gives a single leaf; both give an AND of the two with the lower
/// bound first.
pub fn numeric_range_filter(
    object_type_id: &str,
    property_id: &str,
    min: Option<Number>,
    max: Option<Number>,
) -> Result<FilterRule> {
    let mut bounds = Vec::with_capacity(2);
    if let Some(min) = min {
        bounds.push(numeric_filter(object_type_id, property_id, "GREATER_THAN_OR_EQUAL", min));
    }
    if let Some(max) = max {
        bounds.push(numeric_filter(object_type_id, property_id, "LESS_THAN_OR_EQUAL", max));
    }

    match bounds.len() {
        0 => Err(LogicError::InvalidArgument(
            "numeric range filter requires at least min or max".to_string(),
        )),
        1 => Ok(bounds.remove(0)),
        _ => Ok(FilterRule::And(bounds)),
    }
}

/// Single numeric comparison.
pub fn numeric_filter(
    object_type_id: &str,
    property_id: &str,
    comparator: &str,
    value: Number,
) -> FilterRule {
    leaf(
        object_type_id,
        property_id,
        ColumnFilter::Numeric(NumericColumnFilter {
            comparator: comparator.to_string(),
            values: vec![Value::Number(value)],
            value_macro: Some(FilterMacro::default()),
        }),
    )
}

/// `NULL` or `NOT_NULL` check.
pub fn null_filter(object_type_id: &str, property_id: &str, is_null: bool) -> FilterRule {
    let comparator = if is_null { "NULL" } else { "NOT_NULL" };
    leaf(
        object_type_id,
        property_id,
        ColumnFilter::Null(NullColumnFilter {
            comparator: comparator.to_string(),
        }),
    )
}

/// Embed a filter fragment into a complete filter-node rule for `workflow`.
pub fn wrap_as_rule_logic(filter: FilterRule, workflow: &WorkflowDefinition) -> RuleLogic {
    RuleLogic::filter_node(
        filter,
        &workflow.object_type.id,
        &workflow.workflow_rid,
        OutputAndVersion {
            output_id: workflow.output.id.clone(),
            output_version: workflow.output.version.clone(),
            workflow_rid: workflow.workflow_rid.clone(),
        },
    )
}

fn leaf(object_type_id: &str, property_id: &str, filter: ColumnFilter) -> FilterRule {
    FilterRule::Column(ColumnFilterRule::new(
        Column::object_property(object_type_id, property_id),
        filter,
    ))
}
