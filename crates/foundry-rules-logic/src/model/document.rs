//! The rule-logic document: strategy, filter and effect.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::{FilterRule, serialize_tagged};

/// The only grammar version the platform accepts.
pub const GRAMMAR_VERSION: &str = "V1";

/// A complete rule-logic document as built by this crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleLogic {
    pub named_strategies: Map<String, Value>,
    /// Always written, as `null` when unset.
    pub strategy_components: Option<Value>,
    pub grammar_version: String,
    pub strategy: Strategy,
    pub workflow_rid: String,
    pub effect: Effect,
}

impl RuleLogic {
    /// A filter-node rule over `object_type_id` writing to the given output.
    pub fn filter_node(
        filter: FilterRule,
        object_type_id: &str,
        workflow_rid: &str,
        output: OutputAndVersion,
    ) -> Self {
        Self {
            named_strategies: Map::new(),
            strategy_components: None,
            grammar_version: GRAMMAR_VERSION.to_string(),
            strategy: Strategy::FilterNode(FilterNode {
                node_input: NodeInput::Source(Source::ObjectTypeId(object_type_id.to_string())),
                filter,
                join_filter_inputs: Map::new(),
            }),
            workflow_rid: workflow_rid.to_string(),
            effect: Effect::V2(EffectV2 {
                output_and_version: output,
                parameter_values: Map::new(),
            }),
        }
    }

    /// Serialize into a generic JSON document.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// Strategy kinds the platform knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    FilterNode,
    WindowNode,
    AggregationNode,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FilterNode => "filterNode",
            StrategyKind::WindowNode => "windowNode",
            StrategyKind::AggregationNode => "aggregationNode",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "filterNode" => Some(StrategyKind::FilterNode),
            "windowNode" => Some(StrategyKind::WindowNode),
            "aggregationNode" => Some(StrategyKind::AggregationNode),
            _ => None,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The strategy of a rule. Only filter nodes are built here; window and
/// aggregation nodes are read from raw JSON by the validators.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    FilterNode(FilterNode),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::FilterNode(_) => StrategyKind::FilterNode,
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Strategy::FilterNode(node) => serialize_tagged(serializer, self.kind().as_str(), node),
        }
    }
}

/// Filter node payload. Carries no `type` field of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterNode {
    pub node_input: NodeInput,
    pub filter: FilterRule,
    pub join_filter_inputs: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeInput {
    Source(Source),
}

impl Serialize for NodeInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeInput::Source(source) => serialize_tagged(serializer, "source", source),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    ObjectTypeId(String),
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Source::ObjectTypeId(id) => serialize_tagged(serializer, "objectTypeId", id),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Effect
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    V2(EffectV2),
}

impl Serialize for Effect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Effect::V2(effect) => serialize_tagged(serializer, "v2", effect),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectV2 {
    pub output_and_version: OutputAndVersion,
    pub parameter_values: Map<String, Value>,
}

/// Output the rule writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputAndVersion {
    pub output_id: String,
    pub output_version: String,
    pub workflow_rid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnFilter, ColumnFilterRule, NullColumnFilter};

    fn sample() -> RuleLogic {
        let filter = FilterRule::Column(ColumnFilterRule::new(
            Column::object_property("obj", "status"),
            ColumnFilter::Null(NullColumnFilter {
                comparator: "NULL".to_string(),
            }),
        ));
        RuleLogic::filter_node(
            filter,
            "obj",
            "ri.workflow.1",
            OutputAndVersion {
                output_id: "out".to_string(),
                output_version: "3".to_string(),
                workflow_rid: "ri.workflow.1".to_string(),
            },
        )
    }

    #[test]
    fn test_document_shape() {
        let value = sample().to_value().unwrap();

        assert_eq!(value["grammarVersion"], "V1");
        assert_eq!(value["workflowRid"], "ri.workflow.1");
        assert!(value["strategyComponents"].is_null());
        assert!(value.as_object().unwrap().contains_key("strategyComponents"));
        assert_eq!(value["namedStrategies"], serde_json::json!({}));

        let strategy = &value["strategy"];
        assert_eq!(strategy["type"], "filterNode");
        assert!(strategy["filterNode"].get("type").is_none());
        assert_eq!(strategy["filterNode"]["nodeInput"]["type"], "source");
        assert_eq!(
            strategy["filterNode"]["nodeInput"]["source"],
            serde_json::json!({"objectTypeId": "obj", "type": "objectTypeId"})
        );
        assert_eq!(strategy["filterNode"]["joinFilterInputs"], serde_json::json!({}));

        let effect = &value["effect"];
        assert_eq!(effect["type"], "v2");
        assert_eq!(effect["v2"]["outputAndVersion"]["outputId"], "out");
        assert_eq!(effect["v2"]["outputAndVersion"]["outputVersion"], "3");
        assert_eq!(effect["v2"]["parameterValues"], serde_json::json!({}));
    }

    #[test]
    fn test_strategy_kind_names() {
        for kind in [
            StrategyKind::FilterNode,
            StrategyKind::WindowNode,
            StrategyKind::AggregationNode,
        ] {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(StrategyKind::parse("joinNode"), None);
    }
}
