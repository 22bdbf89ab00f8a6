//! Rule-logic core for foundry-rules.
//!
//! - [`codec`]: the compressed wire envelope
//! - [`model`]: typed rule-logic documents and filter trees
//! - [`builders`] / [`templates`]: canonical filter construction
//! - [`validation`]: structure, property and comparator checks
//!
//! Everything here is synchronous and free of I/O.

pub mod builders;
pub mod codec;
pub mod error;
mod json;
pub mod model;
pub mod templates;
pub mod validation;

pub use builders::{
    null_filter, numeric_filter, numeric_range_filter, string_equals_filter, string_or_filter,
    wrap_as_rule_logic,
};
pub use codec::{compress, decompress};
pub use error::{LogicError, Result};
pub use model::{FilterRule, RuleLogic};
pub use templates::{Template, TemplateInfo, build_from_template, builtin_templates};
pub use validation::{
    FilterValidationResult, PropertyValidationResult, ValidationResult, validate_filter_types,
    validate_properties, validate_rule_logic,
};
