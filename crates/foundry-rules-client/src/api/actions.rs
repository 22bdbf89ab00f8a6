//! Actions API.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::FoundryClient;
use crate::error::Result;

#[derive(Serialize)]
struct ApplyActionRequest<'a> {
    parameters: &'a Value,
}

/// Actions API client.
pub struct ActionsApi {
    client: FoundryClient,
}

impl ActionsApi {
    pub(crate) fn new(client: FoundryClient) -> Self {
        Self { client }
    }

    /// Apply an action with the given parameters.
    ///
    /// Returns the response body, or `{}` when the platform sends none.
    pub async fn apply(&self, action: &str, parameters: Value) -> Result<Value> {
        let url = self.client.url(&["actions", action, "apply"])?;
        debug!(action, "Applying action");
        self.client
            .post(
                url,
                &ApplyActionRequest {
                    parameters: &parameters,
                },
            )
            .await
    }
}
