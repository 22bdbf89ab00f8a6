//! Objects API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::FoundryClient;
use crate::error::Result;

/// Default number of objects per search page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parameters for an object search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub page_size: u32,
    /// Filter conditions, in the platform's search syntax.
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Properties to return.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            filter: None,
            select: Vec::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    #[serde(flatten)]
    query: &'a SearchQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Objects API client.
pub struct ObjectsApi {
    client: FoundryClient,
}

impl ObjectsApi {
    pub(crate) fn new(client: FoundryClient) -> Self {
        Self { client }
    }

    /// Search objects of a type, following pagination to the end.
    pub async fn search(&self, object_type: &str, query: &SearchQuery) -> Result<Vec<Value>> {
        let url = self.client.url(&["objectTypes", object_type, "search"])?;
        let mut results = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let request = SearchRequest {
                query,
                page_token: page_token.as_deref(),
            };
            let page: SearchPage = serde_json::from_value(self.client.post(url.clone(), &request).await?)?;
            results.extend(page.data);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(object_type, count = results.len(), "Search finished");
        Ok(results)
    }

    /// Get one object by primary key; `None` when it does not exist.
    pub async fn get(
        &self,
        object_type: &str,
        primary_key: &str,
        select: &[String],
    ) -> Result<Option<Value>> {
        let url = self
            .client
            .url(&["objectTypes", object_type, "objects", primary_key])?;
        let query: Vec<(&str, String)> = if select.is_empty() {
            Vec::new()
        } else {
            vec![("select", select.join(","))]
        };
        self.client.get_optional(url, &query).await
    }
}
