use std::time::Duration;

use async_trait::async_trait;
use pipeline::{IntegrationError, QueueId, QueueStatus, QueueTracker};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};

use crate::http::{ensure_success, transport};

/// Default message-log collection on the tracker.
pub const DEFAULT_COLLECTION: &str = "voc-automation-messagelogs";

/// Updates message-log records: `PUT {base_url}/api/{collection}/{id}`
/// with `{"data":{"status": ...}}`.
#[derive(Clone)]
pub struct MessageLogTracker {
    http: Client,
    base_url: String,
    collection: String,
    api_token: Option<String>,
}

impl std::fmt::Debug for MessageLogTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLogTracker")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl MessageLogTracker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntegrationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            api_token: None,
        })
    }

    /// Uses a different message-log collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Sends `Authorization: Bearer <token>` with every update.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    fn record_url(&self, queue_id: QueueId) -> String {
        format!(
            "{}/api/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection.trim_matches('/'),
            queue_id
        )
    }
}

#[async_trait]
impl QueueTracker for MessageLogTracker {
    #[instrument(skip(self), fields(status = %status))]
    async fn update_status(
        &self,
        queue_id: QueueId,
        status: QueueStatus,
    ) -> Result<(), IntegrationError> {
        let mut request = self
            .http
            .put(self.record_url(queue_id))
            .json(&json!({ "data": { "status": status } }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(transport)?;
        ensure_success(response).await?;
        debug!("Queue status updated");
        Ok(())
    }
}
