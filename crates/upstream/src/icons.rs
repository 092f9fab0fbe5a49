use std::time::Duration;

use async_trait::async_trait;
use pipeline::{IconImage, IconStore, IntegrationError};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::http::{ensure_success, transport};

/// Downloads icon images over HTTP.
///
/// Absolute image URLs are fetched as-is. Relative URLs (as served by a
/// local upload provider, e.g. `/uploads/icon.png`) are resolved against
/// `media_base_url`.
#[derive(Debug, Clone)]
pub struct HttpIconStore {
    http: Client,
    media_base_url: Option<String>,
}

impl HttpIconStore {
    pub fn new(timeout: Duration, media_base_url: Option<String>) -> Result<Self, IntegrationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            media_base_url,
        })
    }

    fn resolve(&self, url: &str) -> Result<String, IntegrationError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        match &self.media_base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            )),
            None => Err(IntegrationError::Transport {
                message: format!("relative icon URL '{url}' and no media base URL configured"),
            }),
        }
    }
}

#[async_trait]
impl IconStore for HttpIconStore {
    #[instrument(skip_all, fields(icon = %image.name))]
    async fn fetch_icon(&self, image: &IconImage) -> Result<Vec<u8>, IntegrationError> {
        let url = self.resolve(&image.url)?;
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(transport)?;
        if bytes.is_empty() {
            return Err(IntegrationError::Empty { what: "icon bytes" });
        }
        debug!(size = bytes.len(), "Icon fetched");
        Ok(bytes.to_vec())
    }
}
