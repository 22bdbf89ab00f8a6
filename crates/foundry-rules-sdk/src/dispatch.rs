//! The seam between proposal logic and the platform transport.

use async_trait::async_trait;
use foundry_rules_client::FoundryClient;
use serde_json::Value;

/// Applies named platform actions.
///
/// [`FoundryClient`] is the production implementation; tests substitute a
/// recording dispatcher.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    /// Apply `action` with `parameters`, returning the platform's response.
    async fn apply_action(
        &self,
        action: &str,
        parameters: Value,
    ) -> foundry_rules_client::Result<Value>;
}

#[async_trait]
impl ActionDispatcher for FoundryClient {
    async fn apply_action(
        &self,
        action: &str,
        parameters: Value,
    ) -> foundry_rules_client::Result<Value> {
        self.actions().apply(action, parameters).await
    }
}
