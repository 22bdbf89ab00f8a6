//! Validators for rule-logic documents.
//!
//! Validators accept arbitrary JSON and never fail; findings are collected
//! into their result types.

mod filters;
mod properties;
mod schema;

pub use filters::{
    FilterSummary, FilterValidationResult, UsedFilters, filter_summary, validate_filter_types,
};
pub use properties::{
    PropertySummary, PropertyValidationResult, extract_all_properties, property_summary,
    validate_properties,
};
pub use schema::{
    ValidationResult, extract_object_type_id, extract_workflow_rid, strategy_type,
    validate_object_type, validate_rule_logic, validate_workflow_rid,
};
