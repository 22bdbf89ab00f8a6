//! Configuration types mapping to the JSON workflow file.
//!
//! Top-level config:
//! ```json
//! {
//!   "version": "1.0",
//!   "workflow":    { "name", "workflowRid", "objectType", "output" },
//!   "foundry":     { "url", "ontologyRid", "tokenEnvVar" },
//!   "sdk":         { "packageName", "archetypes", "actions" },
//!   "validation":  { "grammarVersion", "supportedStrategyTypes", ... },
//!   "conventions": { "proposalIdPrefix", "ruleIdPrefix", "defaultAuthor", ... },
//!   "templates":   [ { "name", "description", "file" } ]
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth for filter trees.
pub const DEFAULT_MAX_FILTER_DEPTH: usize = 32;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure, as written on disk.
///
/// Connection values may still contain `${NAME}` references; see
/// [`ResolvedConfig`] for the form the rest of the system consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// Config schema version.
    pub version: String,
    /// The governed workflow.
    pub workflow: WorkflowDefinition,
    /// Platform connection settings.
    pub foundry: FoundryConnection,
    /// SDK package, archetype and action names.
    pub sdk: SdkConfig,
    /// Rule-logic validation policy.
    pub validation: ValidationConfig,
    /// Naming conventions and defaults.
    pub conventions: ConventionConfig,
    /// Extra templates declared by the config.
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
}

impl WorkflowConfig {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A starter config with placeholder values, used by `init`.
    pub fn starter() -> Self {
        Self {
            version: "1.0".to_string(),
            workflow: WorkflowDefinition {
                name: "My Workflow".to_string(),
                workflow_rid: "ri.rules..workflow.YOUR_WORKFLOW_RID".to_string(),
                object_type: ObjectTypeConfig {
                    id: "your-object-type-id".to_string(),
                    dynamic_lookup: false,
                    properties: vec![PropertyDefinition {
                        id: "property-api-name".to_string(),
                        kind: PropertyType::String,
                        description: None,
                        nullable: None,
                    }],
                },
                output: OutputConfig {
                    id: "output-id".to_string(),
                    version: "1".to_string(),
                    parameters: Vec::new(),
                },
            },
            foundry: FoundryConnection {
                url: "https://YOUR_STACK.palantirfoundry.com".to_string(),
                ontology_rid: "ri.ontology.main.ontology.YOUR_ONTOLOGY_RID".to_string(),
                token_env_var: "FOUNDRY_TOKEN".to_string(),
            },
            sdk: SdkConfig {
                package_name: "@your-org/sdk".to_string(),
                archetypes: ArchetypeConfig {
                    proposal: "Proposal".to_string(),
                    rule: "Rule".to_string(),
                },
                actions: ActionConfig {
                    create_proposal: "create-proposal-action".to_string(),
                    approve_proposal: "approve-proposal-action".to_string(),
                    reject_proposal: "reject-proposal-action".to_string(),
                    edit_proposal: "edit-proposal-action".to_string(),
                },
            },
            validation: ValidationConfig {
                grammar_version: "V1".to_string(),
                supported_strategy_types: strings(&["filterNode"]),
                supported_string_filters: strings(&[
                    "EQUALS",
                    "CONTAINS",
                    "STARTS_WITH",
                    "ENDS_WITH",
                ]),
                unsupported_string_filters: strings(&["REGEX"]),
                supported_numeric_filters: strings(&[
                    "EQUALS",
                    "GREATER_THAN",
                    "LESS_THAN",
                    "GREATER_THAN_OR_EQUAL",
                    "LESS_THAN_OR_EQUAL",
                ]),
                supported_null_filters: strings(&["NULL", "NOT_NULL"]),
                max_filter_depth: DEFAULT_MAX_FILTER_DEPTH,
            },
            conventions: ConventionConfig {
                proposal_id_prefix: "PROP-".to_string(),
                rule_id_prefix: "RULE-".to_string(),
                default_author: "cli-user".to_string(),
                default_description: Some("Created via CLI".to_string()),
                default_keywords: Some("cli-created".to_string()),
            },
            templates: Vec::new(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Workflow
// ─────────────────────────────────────────────────────────────────────────────

/// The workflow a rule belongs to. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Human-readable workflow name.
    pub name: String,
    /// Opaque workflow identifier.
    pub workflow_rid: String,
    /// The object type rules filter over.
    pub object_type: ObjectTypeConfig,
    /// The output rules write to.
    pub output: OutputConfig,
}

/// Object type configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeConfig {
    pub id: String,
    #[serde(default)]
    pub dynamic_lookup: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ObjectTypeConfig {
    /// Property ids in declaration order.
    pub fn property_ids(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.id.as_str()).collect()
    }

    /// Whether a property with this id is declared.
    pub fn has_property(&self, id: &str) -> bool {
        self.properties.iter().any(|p| p.id == id)
    }
}

/// Definition of an object type property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

/// Value type of an object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Date,
    Timestamp,
}

/// Output (effect target) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub parameters: Vec<OutputParameterConfig>,
}

/// A parameter of the workflow output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputParameterConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection
// ─────────────────────────────────────────────────────────────────────────────

/// Platform connection settings as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundryConnection {
    /// Base URL; may contain `${NAME}` references.
    pub url: String,
    /// Ontology identifier; may contain `${NAME}` references.
    pub ontology_rid: String,
    /// Name of the environment variable holding the bearer token.
    pub token_env_var: String,
}

/// Connection settings with environment references substituted.
#[derive(Clone)]
pub struct ResolvedConnection {
    pub url: String,
    pub ontology_rid: String,
    /// Bearer token; empty when the token variable is unset.
    pub token: String,
    /// Variable the token was read from.
    pub token_env_var: String,
}

impl std::fmt::Debug for ResolvedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConnection")
            .field("url", &self.url)
            .field("ontology_rid", &self.ontology_rid)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("token_env_var", &self.token_env_var)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SDK
// ─────────────────────────────────────────────────────────────────────────────

/// SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub package_name: String,
    pub archetypes: ArchetypeConfig,
    pub actions: ActionConfig,
}

/// Object archetype names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeConfig {
    pub proposal: String,
    pub rule: String,
}

/// Action API names for the four proposal operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    pub create_proposal: String,
    pub approve_proposal: String,
    pub reject_proposal: String,
    pub edit_proposal: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Rule-logic validation policy. Pure data; only used for membership tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Required value of `grammarVersion`.
    pub grammar_version: String,
    /// Allowed values of `strategy.type`.
    pub supported_strategy_types: Vec<String>,
    /// String comparators known to work.
    pub supported_string_filters: Vec<String>,
    /// String comparators that must be rejected.
    #[serde(default)]
    pub unsupported_string_filters: Vec<String>,
    /// Numeric comparators known to work. Empty disables the check.
    #[serde(default)]
    pub supported_numeric_filters: Vec<String>,
    /// Null comparators known to work. Empty disables the check.
    #[serde(default)]
    pub supported_null_filters: Vec<String>,
    /// Maximum nesting depth of the filter tree.
    #[serde(default = "default_max_filter_depth")]
    pub max_filter_depth: usize,
}

fn default_max_filter_depth() -> usize {
    DEFAULT_MAX_FILTER_DEPTH
}

// ─────────────────────────────────────────────────────────────────────────────
// Conventions & templates
// ─────────────────────────────────────────────────────────────────────────────

/// Id prefixes and metadata defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionConfig {
    pub proposal_id_prefix: String,
    pub rule_id_prefix: String,
    pub default_author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_keywords: Option<String>,
}

/// A template declared in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved Config
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved configuration, validated once at load time.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub version: String,
    pub workflow: WorkflowDefinition,
    pub foundry: ResolvedConnection,
    pub sdk: SdkConfig,
    pub validation: ValidationConfig,
    pub conventions: ConventionConfig,
    pub templates: Vec<TemplateConfig>,
}
