//! Shared value types for the micro-app pipeline domain.
//!
//! These carry the values that move between pipeline steps: the icon
//! reference and its bytes, the CMS resources created along the way, and the
//! terminal outcome reported back to the ingress endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{PipelineError, ResourceId};

// ---------------------------------------------------------------------------
// Queue-tracker status
// ---------------------------------------------------------------------------

/// Processing status mirrored to the queue-tracker for each inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueueStatus {
    /// The message has been received and is being processed.
    #[serde(rename = "In Progress")]
    InProgress,
    /// The micro app was created in the CMS.
    Created,
    /// Processing failed at some step.
    Error,
}

impl QueueStatus {
    /// The wire string understood by the tracker.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Created => "Created",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Icon
// ---------------------------------------------------------------------------

/// Reference to an icon image held in external storage (`Icon.Image[n]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconImage {
    /// File name, used for the CMS upload and the media resource name.
    pub name: String,
    /// Location the bytes can be fetched from.
    pub url: String,
}

/// The icon media resource confirmed in the CMS (pipeline step 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResource {
    /// ID of the `media--image` resource.
    pub media_id: ResourceId,
    /// ID of the `file--file` the media resource points at.
    pub file_id: ResourceId,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The CMS response to the creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// HTTP status returned by the CMS (201 when the entity was created).
    pub status: u16,
    /// Response body as returned by the CMS.
    pub body: Value,
}

/// Terminal result of processing one inbound record.
///
/// This is what the ingress endpoint turns into its HTTP response and queue
/// status.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// HTTP status to respond with.
    pub status: u16,
    /// JSON body to respond with.
    pub body: Value,
}

impl PipelineOutcome {
    /// Returns `true` when the micro app was created.
    pub fn is_created(&self) -> bool {
        self.status == 201
    }

    /// Queue status mirroring this outcome.
    pub fn queue_status(&self) -> QueueStatus {
        if self.is_created() {
            QueueStatus::Created
        } else {
            QueueStatus::Error
        }
    }
}

impl From<Submission> for PipelineOutcome {
    fn from(submission: Submission) -> Self {
        Self {
            status: submission.status,
            body: submission.body,
        }
    }
}

impl From<PipelineError> for PipelineOutcome {
    fn from(error: PipelineError) -> Self {
        Self {
            status: error.status_code(),
            body: serde_json::json!({ "message": error.to_string() }),
        }
    }
}
