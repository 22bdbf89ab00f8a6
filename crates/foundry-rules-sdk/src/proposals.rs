//! Proposal lifecycle: validate, create, approve, reject, edit.
//!
//! Every operation that changes platform state goes through an
//! [`ActionDispatcher`]. Validation runs locally and never touches the
//! dispatcher.

use chrono::{SecondsFormat, Utc};
use foundry_rules_config::ResolvedConfig;
use foundry_rules_logic::{
    build_from_template, compress, validate_filter_types, validate_properties, validate_rule_logic,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::dispatch::ActionDispatcher;
use crate::error::{Result, SdkError};

const DEFAULT_DESCRIPTION: &str = "Created via CLI";
const DEFAULT_KEYWORDS: &str = "cli-created";
const NO_LOGIC_ERROR: &str = "Either template+params or logic must be provided";

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Where a proposal's rule logic comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicSource {
    /// Build the document from a named template.
    Template {
        name: String,
        params: Map<String, Value>,
    },
    /// A complete rule-logic document.
    Document(Value),
}

impl LogicSource {
    pub fn template(name: impl Into<String>, params: Map<String, Value>) -> Self {
        Self::Template {
            name: name.into(),
            params,
        }
    }

    /// Read a proposal file body: `{template, params}` selects a template,
    /// `{logic}` carries a document, anything else is taken as the document
    /// itself.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::Document(value);
        };

        if let Some(Value::String(name)) = map.get("template").cloned()
            && let Some(Value::Object(params)) = map.get("params").cloned()
        {
            return Self::Template { name, params };
        }
        if let Some(logic) = map.remove("logic") {
            return Self::Document(logic);
        }
        Self::Document(Value::Object(map))
    }

    fn resolve(&self, config: &ResolvedConfig) -> std::result::Result<Value, Vec<String>> {
        match self {
            Self::Template { name, params } => build_from_template(name, params, &config.workflow),
            Self::Document(document) => Ok(document.clone()),
        }
    }
}

/// Input for [`Proposals::create`].
#[derive(Debug, Clone, Default)]
pub struct ProposalInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub logic: Option<LogicSource>,
}

impl ProposalInput {
    /// Read a proposal file body:
    /// `{name?, description?, keywords?, template?, params?, logic?}`.
    ///
    /// `template` + `params` wins over `logic`; with neither, `logic` is `None`.
    pub fn from_value(body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(String::from);

        let template = body.get("template").and_then(Value::as_str);
        let params = body.get("params").and_then(Value::as_object);
        let logic = match (template, params) {
            (Some(name), Some(params)) => Some(LogicSource::template(name, params.clone())),
            _ => body
                .get("logic")
                .filter(|logic| !logic.is_null())
                .cloned()
                .map(LogicSource::Document),
        };

        Self {
            name: text("name"),
            description: text("description"),
            keywords: text("keywords"),
            logic,
        }
    }
}

/// Input for [`Proposals::edit`]. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default)]
pub struct EditProposalInput {
    pub proposal_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub logic: Option<LogicSource>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────────────────────────────────────

/// Combined outcome of the structure, property and filter checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProposalValidation {
    pub valid: bool,
    pub structure_errors: Vec<String>,
    pub property_errors: Vec<String>,
    pub filter_errors: Vec<String>,
    pub filter_warnings: Vec<String>,
}

impl ProposalValidation {
    fn structure_failure(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            structure_errors: errors,
            ..Self::default()
        }
    }

    /// Every error, prefixed with the stage that produced it.
    pub fn tagged_errors(&self) -> Vec<String> {
        let tag = |label: &'static str, errors: &[String]| {
            errors
                .iter()
                .map(move |e| format!("[{}] {}", label, e))
                .collect::<Vec<_>>()
        };
        let mut all = tag("Structure", &self.structure_errors);
        all.extend(tag("Property", &self.property_errors));
        all.extend(tag("Filter", &self.filter_errors));
        all
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProposalResult {
    pub proposal_id: String,
    pub rule_id: String,
    pub compressed_logic: String,
}

/// Outcome of approving or rejecting one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewResult {
    pub success: bool,
    pub proposal_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRejectResult {
    pub success: bool,
    pub total: usize,
    pub rejected: usize,
    pub failed: usize,
    pub results: Vec<ReviewResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditProposalResult {
    pub proposal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_logic: Option<String>,
    pub message: String,
}

/// A validated document ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLogic {
    pub document: Value,
    pub compressed: String,
    /// Non-blocking filter warnings.
    pub warnings: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Run structure, property and filter checks against a proposal's logic.
///
/// Property and filter checks are skipped when the structure check fails,
/// since they read fields the structure check just found missing.
pub fn validate_proposal(logic: Option<&LogicSource>, config: &ResolvedConfig) -> ProposalValidation {
    let Some(source) = logic else {
        return ProposalValidation::structure_failure(vec![NO_LOGIC_ERROR.to_string()]);
    };
    match source.resolve(config) {
        Ok(document) => validate_document(&document, config),
        Err(errors) => ProposalValidation::structure_failure(errors),
    }
}

fn validate_document(document: &Value, config: &ResolvedConfig) -> ProposalValidation {
    let structure = validate_rule_logic(document, &config.validation);
    if !structure.valid {
        return ProposalValidation::structure_failure(structure.errors);
    }

    let properties = validate_properties(document, &config.workflow.object_type);
    let filters = validate_filter_types(document, &config.validation);

    debug!(
        properties = properties.errors.len(),
        filters = filters.errors.len(),
        warnings = filters.warnings.len(),
        "Proposal validation finished"
    );

    ProposalValidation {
        valid: properties.valid && filters.valid,
        structure_errors: structure.errors,
        property_errors: properties.errors,
        filter_errors: filters.errors,
        filter_warnings: filters.warnings,
    }
}

/// Resolve, validate and compress a proposal's logic.
///
/// Fails with [`SdkError::ValidationFailed`] carrying every tagged error.
pub fn prepare_logic(logic: Option<&LogicSource>, config: &ResolvedConfig) -> Result<PreparedLogic> {
    let Some(source) = logic else {
        return Err(SdkError::ValidationFailed(
            ProposalValidation::structure_failure(vec![NO_LOGIC_ERROR.to_string()]).tagged_errors(),
        ));
    };
    let document = source.resolve(config).map_err(|errors| {
        SdkError::ValidationFailed(ProposalValidation::structure_failure(errors).tagged_errors())
    })?;

    let validation = validate_document(&document, config);
    if !validation.valid {
        return Err(SdkError::ValidationFailed(validation.tagged_errors()));
    }

    Ok(PreparedLogic {
        compressed: compress(&document),
        document,
        warnings: validation.filter_warnings,
    })
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Proposals
// ─────────────────────────────────────────────────────────────────────────────

/// Proposal operations bound to a config and a dispatcher.
pub struct Proposals<'a, D: ActionDispatcher + ?Sized> {
    config: &'a ResolvedConfig,
    dispatcher: &'a D,
}

impl<'a, D: ActionDispatcher + ?Sized> Proposals<'a, D> {
    pub fn new(config: &'a ResolvedConfig, dispatcher: &'a D) -> Self {
        Self { config, dispatcher }
    }

    /// Validate without dispatching anything.
    pub fn validate(&self, logic: Option<&LogicSource>) -> ProposalValidation {
        validate_proposal(logic, self.config)
    }

    /// Validate, compress and submit a new proposal.
    pub async fn create(&self, input: &ProposalInput) -> Result<CreateProposalResult> {
        let prepared = prepare_logic(input.logic.as_ref(), self.config)?;
        for warning in &prepared.warnings {
            warn!(%warning, "Filter warning");
        }

        let conventions = &self.config.conventions;
        let millis = Utc::now().timestamp_millis();
        let proposal_id = format!("{}{}", conventions.proposal_id_prefix, millis);
        let rule_id = format!("{}{}", conventions.rule_id_prefix, millis);

        let name = non_empty(input.name.as_deref())
            .map(String::from)
            .unwrap_or_else(|| format!("Rule-{}", millis));
        let description = non_empty(input.description.as_deref())
            .or(non_empty(conventions.default_description.as_deref()))
            .unwrap_or(DEFAULT_DESCRIPTION);
        let keywords = non_empty(input.keywords.as_deref())
            .or(non_empty(conventions.default_keywords.as_deref()))
            .unwrap_or(DEFAULT_KEYWORDS);

        let parameters = json!({
            "proposal_id": proposal_id,
            "rule_id": rule_id,
            "new_rule_name": name,
            "new_rule_description": description,
            "new_logic": prepared.compressed,
            "new_logic_keywords": keywords,
            "proposal_author": conventions.default_author,
            "proposal_creation_timestamp": now_rfc3339(),
        });
        self.dispatch(&self.config.sdk.actions.create_proposal, parameters)
            .await?;

        info!(%proposal_id, %rule_id, "Proposal created");
        Ok(CreateProposalResult {
            proposal_id,
            rule_id,
            compressed_logic: prepared.compressed,
        })
    }

    /// Approve a proposal. The reviewer defaults to the configured author.
    pub async fn approve(
        &self,
        proposal_id: &str,
        rule_id: &str,
        reviewer: Option<&str>,
    ) -> Result<ReviewResult> {
        let parameters = json!({
            "proposal_object": proposal_id,
            "proposal_review_timestamp": now_rfc3339(),
            "proposal_reviewer": self.reviewer(reviewer),
            "rule_id": rule_id,
        });
        self.dispatch(&self.config.sdk.actions.approve_proposal, parameters)
            .await?;

        info!(proposal_id, rule_id, "Proposal approved");
        Ok(ReviewResult {
            success: true,
            proposal_id: proposal_id.to_string(),
            message: format!("Proposal {} approved successfully", proposal_id),
        })
    }

    /// Reject a proposal. The reviewer defaults to the configured author.
    pub async fn reject(&self, proposal_id: &str, reviewer: Option<&str>) -> Result<ReviewResult> {
        let parameters = json!({
            "proposal_object": proposal_id,
            "proposal_review_timestamp": now_rfc3339(),
            "proposal_reviewer": self.reviewer(reviewer),
        });
        self.dispatch(&self.config.sdk.actions.reject_proposal, parameters)
            .await?;

        info!(proposal_id, "Proposal rejected");
        Ok(ReviewResult {
            success: true,
            proposal_id: proposal_id.to_string(),
            message: format!("Proposal {} rejected successfully", proposal_id),
        })
    }

    /// Reject each proposal in turn. One failure does not stop the rest.
    ///
    /// `reason` is recorded as the reviewer on every rejection.
    pub async fn bulk_reject(&self, proposal_ids: &[String], reason: Option<&str>) -> BulkRejectResult {
        let mut results = Vec::with_capacity(proposal_ids.len());
        let mut failed = 0;

        for proposal_id in proposal_ids {
            match self.reject(proposal_id, reason).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(%proposal_id, error = %e, "Rejection failed");
                    failed += 1;
                    results.push(ReviewResult {
                        success: false,
                        proposal_id: proposal_id.clone(),
                        message: format!("Failed to reject: {}", e),
                    });
                }
            }
        }

        BulkRejectResult {
            success: failed == 0,
            total: proposal_ids.len(),
            rejected: proposal_ids.len() - failed,
            failed,
            results,
        }
    }

    /// Edit an existing proposal.
    ///
    /// New logic is validated exactly as on create; metadata-only edits skip
    /// validation. Fields left as `None` are omitted from the action.
    pub async fn edit(&self, input: &EditProposalInput) -> Result<EditProposalResult> {
        let compressed_logic = match &input.logic {
            Some(source) => Some(prepare_logic(Some(source), self.config)?.compressed),
            None => None,
        };

        let mut parameters = Map::new();
        parameters.insert("proposal_object".into(), json!(input.proposal_id));
        parameters.insert("proposal_creation_timestamp".into(), json!(now_rfc3339()));
        parameters.insert(
            "proposal_author".into(),
            json!(self.config.conventions.default_author),
        );

        let optional = [
            ("new_rule_name", input.name.as_ref()),
            ("new_rule_description", input.description.as_ref()),
            ("new_logic_keywords", input.keywords.as_ref()),
            ("new_logic", compressed_logic.as_ref()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                parameters.insert(key.into(), json!(value));
            }
        }

        self.dispatch(&self.config.sdk.actions.edit_proposal, Value::Object(parameters))
            .await?;

        info!(proposal_id = %input.proposal_id, "Proposal edited");
        Ok(EditProposalResult {
            proposal_id: input.proposal_id.clone(),
            compressed_logic,
            message: format!("Proposal {} edited successfully", input.proposal_id),
        })
    }

    fn reviewer<'r>(&'r self, reviewer: Option<&'r str>) -> &'r str {
        non_empty(reviewer).unwrap_or(&self.config.conventions.default_author)
    }

    async fn dispatch(&self, action: &str, parameters: Value) -> Result<Value> {
        debug!(action, "Dispatching action");
        self.dispatcher
            .apply_action(action, parameters)
            .await
            .map_err(|source| SdkError::Action {
                action: action.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_source_reads_template_form() {
        let source = LogicSource::from_value(json!({
            "name": "ignored",
            "template": "null-check",
            "params": {"propertyId": "p"}
        }));
        match source {
            LogicSource::Template { name, params } => {
                assert_eq!(name, "null-check");
                assert_eq!(params.get("propertyId"), Some(&json!("p")));
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn logic_source_reads_logic_field_then_whole_body() {
        assert_eq!(
            LogicSource::from_value(json!({"logic": {"grammarVersion": "V1"}})),
            LogicSource::Document(json!({"grammarVersion": "V1"}))
        );
        assert_eq!(
            LogicSource::from_value(json!({"grammarVersion": "V1"})),
            LogicSource::Document(json!({"grammarVersion": "V1"}))
        );
    }

    #[test]
    fn template_without_params_object_is_a_document() {
        let body = json!({"template": "null-check"});
        assert_eq!(LogicSource::from_value(body.clone()), LogicSource::Document(body));
    }

    #[test]
    fn proposal_input_reads_metadata_and_logic() {
        let input = ProposalInput::from_value(&json!({
            "name": "Open orders",
            "keywords": "orders",
            "logic": {"grammarVersion": "V1"}
        }));
        assert_eq!(input.name.as_deref(), Some("Open orders"));
        assert_eq!(input.description, None);
        assert_eq!(input.keywords.as_deref(), Some("orders"));
        assert_eq!(
            input.logic,
            Some(LogicSource::Document(json!({"grammarVersion": "V1"})))
        );
    }

    #[test]
    fn proposal_input_prefers_template() {
        let input = ProposalInput::from_value(&json!({
            "template": "null-check",
            "params": {"propertyId": "p"},
            "logic": {"grammarVersion": "V1"}
        }));
        assert!(matches!(input.logic, Some(LogicSource::Template { .. })));
    }

    #[test]
    fn proposal_input_without_logic() {
        let input = ProposalInput::from_value(&json!({"name": "x", "logic": null}));
        assert_eq!(input.logic, None);
    }

    #[test]
    fn tagged_errors_follow_stage_order() {
        let validation = ProposalValidation {
            valid: false,
            structure_errors: vec!["s".into()],
            property_errors: vec!["p".into()],
            filter_errors: vec!["f".into()],
            filter_warnings: vec!["w".into()],
        };
        assert_eq!(
            validation.tagged_errors(),
            vec!["[Structure] s", "[Property] p", "[Filter] f"]
        );
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("x")), Some("x"));
        assert_eq!(non_empty(None), None);
    }
}
