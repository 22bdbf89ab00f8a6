//! Filter trees: column comparisons combined with and/or/not.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::serialize_tagged;
use crate::error::{LogicError, Result};

/// Hard nesting limit used where no configured limit is available.
pub const MAX_FILTER_DEPTH_CEILING: usize = 256;

const COLUMN_FILTER_RULE: &str = "columnFilterRule";
const OR_FILTER_RULE: &str = "orFilterRule";
const AND_FILTER_RULE: &str = "andFilterRule";
const NOT_FILTER_RULE: &str = "notFilterRule";

const FILTER_RULE_TAGS: [&str; 4] = [
    COLUMN_FILTER_RULE,
    OR_FILTER_RULE,
    AND_FILTER_RULE,
    NOT_FILTER_RULE,
];

const STRING_COLUMN_FILTER: &str = "stringColumnFilter";
const NUMERIC_COLUMN_FILTER: &str = "numericColumnFilter";
const NULL_COLUMN_FILTER: &str = "nullColumnFilter";

const COLUMN_FILTER_TAGS: [&str; 3] = [
    STRING_COLUMN_FILTER,
    NUMERIC_COLUMN_FILTER,
    NULL_COLUMN_FILTER,
];

// ─────────────────────────────────────────────────────────────────────────────
// Filter tree
// ─────────────────────────────────────────────────────────────────────────────

/// A node of a filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    /// Leaf comparing one column.
    Column(ColumnFilterRule),
    /// Matches when any child matches.
    Or(Vec<FilterRule>),
    /// Matches when every child matches.
    And(Vec<FilterRule>),
    /// Negates its child.
    Not(Box<FilterRule>),
}

impl FilterRule {
    /// Wire name of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            FilterRule::Column(_) => COLUMN_FILTER_RULE,
            FilterRule::Or(_) => OR_FILTER_RULE,
            FilterRule::And(_) => AND_FILTER_RULE,
            FilterRule::Not(_) => NOT_FILTER_RULE,
        }
    }

    /// Whether this node combines other nodes.
    pub fn is_compound(&self) -> bool {
        !matches!(self, FilterRule::Column(_))
    }

    /// Nesting depth; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            FilterRule::Column(_) => 1,
            FilterRule::Or(children) | FilterRule::And(children) => {
                1 + children.iter().map(FilterRule::depth).max().unwrap_or(0)
            }
            FilterRule::Not(inner) => 1 + inner.depth(),
        }
    }

    /// All leaves, left to right.
    pub fn leaves(&self) -> Vec<&ColumnFilterRule> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a ColumnFilterRule>) {
        match self {
            FilterRule::Column(rule) => out.push(rule),
            FilterRule::Or(children) | FilterRule::And(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            FilterRule::Not(inner) => inner.collect_leaves(out),
        }
    }

    /// Read a filter tree from arbitrary JSON.
    ///
    /// Nodes that cannot be interpreted are dropped rather than reported;
    /// structural problems are the schema validator's concern. The variant is
    /// chosen by the `type` field when it names a present payload, otherwise
    /// by the first payload key found. Fails only when the tree nests deeper
    /// than `max_depth`.
    pub fn from_value(value: &Value, max_depth: usize) -> Result<Option<Self>> {
        Self::parse(value, 1, max_depth)
    }

    fn parse(value: &Value, depth: usize, max_depth: usize) -> Result<Option<Self>> {
        let Some(obj) = value.as_object().filter(|o| !o.is_empty()) else {
            return Ok(None);
        };
        if depth > max_depth {
            return Err(LogicError::FilterTooDeep { limit: max_depth });
        }

        let Some(tag) = select_tag(obj, &FILTER_RULE_TAGS) else {
            return Ok(None);
        };
        let payload = &obj[tag];

        let rule = match tag {
            COLUMN_FILTER_RULE => ColumnFilterRule::from_value(payload).map(FilterRule::Column),
            OR_FILTER_RULE => Some(FilterRule::Or(Self::parse_children(
                payload, depth, max_depth,
            )?)),
            AND_FILTER_RULE => Some(FilterRule::And(Self::parse_children(
                payload, depth, max_depth,
            )?)),
            _ => match payload.get("filter") {
                Some(inner) => {
                    Self::parse(inner, depth + 1, max_depth)?.map(|r| FilterRule::Not(Box::new(r)))
                }
                None => None,
            },
        };
        Ok(rule)
    }

    fn parse_children(payload: &Value, depth: usize, max_depth: usize) -> Result<Vec<Self>> {
        let Some(items) = payload.get("filters").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        let mut children = Vec::with_capacity(items.len());
        for item in items {
            if let Some(child) = Self::parse(item, depth + 1, max_depth)? {
                children.push(child);
            }
        }
        Ok(children)
    }
}

impl Serialize for FilterRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Children<'a> {
            filters: &'a [FilterRule],
        }

        #[derive(Serialize)]
        struct Inner<'a> {
            filter: &'a FilterRule,
        }

        match self {
            FilterRule::Column(rule) => serialize_tagged(serializer, self.tag(), rule),
            FilterRule::Or(filters) | FilterRule::And(filters) => {
                serialize_tagged(serializer, self.tag(), &Children { filters })
            }
            FilterRule::Not(filter) => serialize_tagged(serializer, self.tag(), &Inner { filter }),
        }
    }
}

/// Pick the variant key of a sibling-tagged object.
fn select_tag<'a>(obj: &serde_json::Map<String, Value>, tags: &[&'a str]) -> Option<&'a str> {
    let declared = obj.get("type").and_then(Value::as_str);
    tags.iter()
        .copied()
        .find(|tag| declared == Some(*tag) && obj.contains_key(*tag))
        .or_else(|| tags.iter().copied().find(|tag| obj.contains_key(*tag)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Leaves
// ─────────────────────────────────────────────────────────────────────────────

/// A comparison applied to a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFilterRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<ColumnFilter>,
}

impl ColumnFilterRule {
    pub fn new(column: Column, filter: ColumnFilter) -> Self {
        Self {
            column: Some(column),
            filter: Some(filter),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(Self {
            column: value.get("column").and_then(Column::from_value),
            filter: value.get("filter").and_then(ColumnFilter::from_value),
        })
    }

    /// Referenced property id, if the column names one.
    pub fn property_id(&self) -> Option<&str> {
        self.column.as_ref().and_then(Column::property_id)
    }

    /// Comparator family and type, if the filter declares one.
    pub fn comparator(&self) -> Option<(ComparatorFamily, &str)> {
        self.filter.as_ref().and_then(ColumnFilter::comparator)
    }
}

/// A column reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    ObjectProperty(ObjectPropertyRef),
}

impl Column {
    /// Column for a property of an object type.
    pub fn object_property(object_type_id: &str, property_id: &str) -> Self {
        Column::ObjectProperty(ObjectPropertyRef {
            object_type_id: object_type_id.to_string(),
            property_type_id: property_id.to_string(),
        })
    }

    /// Read a column reference from arbitrary JSON.
    pub fn from_value(value: &Value) -> Option<Self> {
        let payload = value.get("objectProperty")?;
        if !payload.is_object() {
            return None;
        }
        serde_json::from_value(payload.clone())
            .ok()
            .map(Column::ObjectProperty)
    }

    /// The referenced property id; empty ids count as absent.
    pub fn property_id(&self) -> Option<&str> {
        match self {
            Column::ObjectProperty(prop) => {
                Some(prop.property_type_id.as_str()).filter(|id| !id.is_empty())
            }
        }
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Column::ObjectProperty(prop) => serialize_tagged(serializer, "objectProperty", prop),
        }
    }
}

/// Object type + property pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPropertyRef {
    pub object_type_id: String,
    pub property_type_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Column filters
// ─────────────────────────────────────────────────────────────────────────────

/// Comparator families with their own support policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparatorFamily {
    String,
    Numeric,
    Null,
}

impl ComparatorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparatorFamily::String => "string",
            ComparatorFamily::Numeric => "numeric",
            ComparatorFamily::Null => "null",
        }
    }
}

impl std::fmt::Display for ComparatorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparison part of a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    String(StringColumnFilter),
    Numeric(NumericColumnFilter),
    Null(NullColumnFilter),
}

impl ColumnFilter {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let tag = select_tag(obj, &COLUMN_FILTER_TAGS)?;
        let payload = &obj[tag];
        match tag {
            STRING_COLUMN_FILTER => {
                parse_payload(payload, StringColumnFilter::with_comparator).map(ColumnFilter::String)
            }
            NUMERIC_COLUMN_FILTER => parse_payload(payload, NumericColumnFilter::with_comparator)
                .map(ColumnFilter::Numeric),
            _ => parse_payload(payload, NullColumnFilter::with_comparator).map(ColumnFilter::Null),
        }
    }

    pub fn family(&self) -> ComparatorFamily {
        match self {
            ColumnFilter::String(_) => ComparatorFamily::String,
            ColumnFilter::Numeric(_) => ComparatorFamily::Numeric,
            ColumnFilter::Null(_) => ComparatorFamily::Null,
        }
    }

    /// Family and comparator type; empty comparators count as absent.
    pub fn comparator(&self) -> Option<(ComparatorFamily, &str)> {
        let comparator = match self {
            ColumnFilter::String(f) => &f.comparator,
            ColumnFilter::Numeric(f) => &f.comparator,
            ColumnFilter::Null(f) => &f.comparator,
        };
        Some((self.family(), comparator.as_str())).filter(|(_, c)| !c.is_empty())
    }
}

impl Serialize for ColumnFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ColumnFilter::String(f) => serialize_tagged(serializer, STRING_COLUMN_FILTER, f),
            ColumnFilter::Numeric(f) => serialize_tagged(serializer, NUMERIC_COLUMN_FILTER, f),
            ColumnFilter::Null(f) => serialize_tagged(serializer, NULL_COLUMN_FILTER, f),
        }
    }
}

/// Deserialize a filter payload, keeping at least its comparator when other
/// fields are malformed.
fn parse_payload<T>(payload: &Value, with_comparator: fn(String) -> T) -> Option<T>
where
    T: DeserializeOwned,
{
    if !payload.is_object() {
        return None;
    }
    serde_json::from_value(payload.clone()).ok().or_else(|| {
        payload
            .get("type")
            .and_then(Value::as_str)
            .map(|t| with_comparator(t.to_string()))
    })
}

/// Value transformation applied before comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterMacro {
    pub function: String,
    pub input_type: String,
    pub output_type: String,
}

impl Default for FilterMacro {
    /// The identity macro the platform attaches to plain comparisons.
    fn default() -> Self {
        Self {
            function: "VALUE".to_string(),
            input_type: "ALL_TYPES".to_string(),
            output_type: "ALL_TYPES".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringColumnFilter {
    #[serde(rename = "type")]
    pub comparator: String,
    pub values: Vec<Value>,
    pub case_sensitive: bool,
    pub ignore_whitespace: bool,
    #[serde(rename = "macro", skip_serializing_if = "Option::is_none")]
    pub value_macro: Option<FilterMacro>,
}

impl StringColumnFilter {
    fn with_comparator(comparator: String) -> Self {
        Self {
            comparator,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericColumnFilter {
    #[serde(rename = "type")]
    pub comparator: String,
    pub values: Vec<Value>,
    #[serde(rename = "macro", skip_serializing_if = "Option::is_none")]
    pub value_macro: Option<FilterMacro>,
}

impl NumericColumnFilter {
    fn with_comparator(comparator: String) -> Self {
        Self {
            comparator,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NullColumnFilter {
    #[serde(rename = "type")]
    pub comparator: String,
}

impl NullColumnFilter {
    fn with_comparator(comparator: String) -> Self {
        Self { comparator }
    }
}
