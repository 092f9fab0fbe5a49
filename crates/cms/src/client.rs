use std::sync::Arc;

use async_trait::async_trait;
use pipeline::{CmsSession, ContentBackend, IntegrationError};

use crate::{CmsConfig, JsonApiSession};

/// Entry point to the CMS: opens one [`JsonApiSession`] per pipeline run.
#[derive(Debug, Clone)]
pub struct CmsClient {
    config: Arc<CmsConfig>,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[async_trait]
impl ContentBackend for CmsClient {
    async fn open_session(&self) -> Result<Box<dyn CmsSession>, IntegrationError> {
        let session = JsonApiSession::login(self.config.clone()).await?;
        Ok(Box::new(session))
    }
}
