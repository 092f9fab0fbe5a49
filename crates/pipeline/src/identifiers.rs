//! Newtype domain identifiers.
//!
//! Every identity the pipeline handles is a distinct newtype wrapping a
//! primitive. This prevents accidentally passing a CMS [`ResourceId`] where a
//! [`MessageId`] is expected even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: integer-backed
// ---------------------------------------------------------------------------

/// Identifies the message-log entry in the queue-tracker that mirrors the
/// processing status of one inbound message.
///
/// Assigned by the tracker (a positive integer record ID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueId(u64);

impl QueueId {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single pipeline run (one inbound message).
///
/// Generated fresh for every run and recorded on its tracing span so all
/// collaborator calls made on behalf of one message can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineRunId(Uuid);

impl PipelineRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PipelineRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies one inbound queue record (`Records[n].messageID`).
    MessageId
}

string_id! {
    /// A CMS resource identifier (a JSON:API `id`, usually a UUID string).
    ResourceId
}

string_id! {
    /// A CMS resource type name in JSON:API form (e.g. `"taxonomy_term--countries"`).
    ResourceType
}

impl ResourceType {
    /// `file--file`, the type of an uploaded binary.
    pub fn file() -> Self {
        Self("file--file".to_string())
    }

    /// `media--image`, the type of an image media resource.
    pub fn media_image() -> Self {
        Self("media--image".to_string())
    }

    /// `node--micro_app`, the type of the micro-app content entity.
    pub fn micro_app() -> Self {
        Self("node--micro_app".to_string())
    }
}
