//! Typed rule-logic model.
//!
//! The platform encodes every tagged union the same way: the payload sits
//! under a key named after the variant, with the variant name repeated in a
//! sibling `type` field:
//!
//! ```json
//! {"columnFilterRule": { ... }, "type": "columnFilterRule"}
//! ```
//!
//! Builders produce these types and serialize them to that shape. Validators
//! accept arbitrary JSON, so the filter tree also has a lenient reader
//! ([`FilterRule::from_value`]) that skips pieces it cannot interpret.

mod document;
mod filter;

pub use document::{
    Effect, EffectV2, FilterNode, NodeInput, OutputAndVersion, RuleLogic, Source, Strategy,
    StrategyKind, GRAMMAR_VERSION,
};
pub use filter::{
    Column, ColumnFilter, ColumnFilterRule, ComparatorFamily, FilterMacro, FilterRule,
    MAX_FILTER_DEPTH_CEILING, NullColumnFilter, NumericColumnFilter, ObjectPropertyRef,
    StringColumnFilter,
};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Serialize `payload` under `tag`, with `"type": tag` alongside.
pub(crate) fn serialize_tagged<S, T>(serializer: S, tag: &str, payload: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry(tag, payload)?;
    map.serialize_entry("type", tag)?;
    map.end()
}
