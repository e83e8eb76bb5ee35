//! Remote source of a slot's initial contents.

use crate::error::{SlotError, SlotResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use slotbox_types::{BoxId, ContentDescriptor, NodeId};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Which contents to load: one box on one page node, ordered by sort id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentQuery {
    pub box_id: BoxId,
    pub node_id: NodeId,
    pub order: SortOrder,
}

impl ContentQuery {
    pub fn new(box_id: BoxId, node_id: NodeId) -> Self {
        Self {
            box_id,
            node_id,
            order: SortOrder::Ascending,
        }
    }
}

/// Read side of content persistence.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_contents(&self, query: &ContentQuery) -> SlotResult<Vec<ContentDescriptor>>;
}

/// Configuration for [`HttpContentSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Base URL of the admin API (e.g. `https://cms.example.com`).
    pub base_url: String,
    /// Path of the content object endpoint.
    pub content_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            content_path: "/admin/object/content".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentListResponse {
    #[serde(default)]
    data: serde_json::Value,
}

/// Loads contents from the admin object API.
///
/// `GET {base_url}{content_path}?filter[boxId]=..&filter[node]=..&order[sort]=asc`,
/// answered with `{"data": [descriptor, ...]}`.
pub struct HttpContentSource {
    config: HttpSourceConfig,
    client: Client,
}

impl HttpContentSource {
    pub fn new(config: HttpSourceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.content_path
        )
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_contents(&self, query: &ContentQuery) -> SlotResult<Vec<ContentDescriptor>> {
        let url = self.endpoint();
        debug!(%url, box_id = %query.box_id, node_id = %query.node_id, "fetching slot contents");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("filter[boxId]", query.box_id.to_string()),
                ("filter[node]", query.node_id.to_string()),
                ("order[sort]", query.order.as_str().to_string()),
            ])
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlotError::Remote(format!("content fetch failed ({status}): {body}")));
        }

        let list: ContentListResponse = response.json().await?;
        let Some(entries) = list.data.as_array() else {
            debug!("content response has no data array");
            return Ok(Vec::new());
        };

        let mut contents = Vec::with_capacity(entries.len());
        for entry in entries {
            match ContentDescriptor::from_value(entry) {
                Some(descriptor) => contents.push(descriptor),
                None => warn!(%entry, "skipping non-object content entry"),
            }
        }
        Ok(contents)
    }
}

/// In-memory source keyed by `(box, node)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentSource {
    contents: HashMap<(BoxId, NodeId), Vec<ContentDescriptor>>,
    failure: Option<String>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_contents(
        mut self,
        box_id: BoxId,
        node_id: NodeId,
        contents: Vec<ContentDescriptor>,
    ) -> Self {
        self.contents.insert((box_id, node_id), contents);
        self
    }

    /// Makes every fetch fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    async fn fetch_contents(&self, query: &ContentQuery) -> SlotResult<Vec<ContentDescriptor>> {
        if let Some(message) = &self.failure {
            return Err(SlotError::Remote(message.clone()));
        }
        let mut contents = self
            .contents
            .get(&(query.box_id, query.node_id))
            .cloned()
            .unwrap_or_default();
        // Unsorted entries go last in either direction.
        contents.sort_by_key(|d| match (d.sort_id, query.order) {
            (Some(s), SortOrder::Ascending) => (0, i64::from(s)),
            (Some(s), SortOrder::Descending) => (0, -i64::from(s)),
            (None, _) => (1, 0),
        });
        Ok(contents)
    }
}
