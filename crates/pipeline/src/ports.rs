//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator depends only on these traits. `upstream` implements
//! [`IconStore`] and [`QueueTracker`]; `cms` implements [`ContentBackend`] and
//! [`CmsSession`].

use async_trait::async_trait;

use crate::permissions::Permission;
use crate::taxonomy::{TaxonomyKind, TaxonomyTerm};
use crate::template::{CreationTemplate, IconResourceRequest};
use crate::{
    IconImage, IconResource, IntegrationError, QueueId, QueueStatus, ResourceId, Submission,
};

/// Fetches icon bytes from external image storage.
#[async_trait]
pub trait IconStore: Send + Sync {
    /// Returns the raw image bytes. An empty payload is an error.
    async fn fetch_icon(&self, image: &IconImage) -> Result<Vec<u8>, IntegrationError>;
}

/// Opens authenticated sessions against the CMS.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Logs in and obtains an anti-forgery token.
    ///
    /// Every call returns an independent session with its own cookie state;
    /// a session lives for exactly one pipeline run.
    async fn open_session(&self) -> Result<Box<dyn CmsSession>, IntegrationError>;
}

/// An authenticated CMS session.
#[async_trait]
pub trait CmsSession: Send + Sync {
    /// Uploads binary image content, returning the new file's ID.
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ResourceId, IntegrationError>;

    /// Creates the icon media resource for an uploaded file.
    async fn create_icon_resource(
        &self,
        request: &IconResourceRequest,
    ) -> Result<IconResource, IntegrationError>;

    /// Lists the permission catalog.
    async fn list_permissions(&self) -> Result<Vec<Permission>, IntegrationError>;

    /// Lists every term of one taxonomy vocabulary.
    async fn list_terms(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyTerm>, IntegrationError>;

    /// Submits the micro-app creation request.
    async fn create_micro_app(
        &self,
        template: &CreationTemplate,
    ) -> Result<Submission, IntegrationError>;
}

/// Records per-message processing status.
#[async_trait]
pub trait QueueTracker: Send + Sync {
    async fn update_status(
        &self,
        queue_id: QueueId,
        status: QueueStatus,
    ) -> Result<(), IntegrationError>;
}
