//! Core domain for the micro-app sync service.
//!
//! This crate contains the inbound message model, newtype identifiers, the
//! Template Builder that maps a message onto the CMS creation document, and
//! the port traits the orchestrator drives. Infrastructure crates implement
//! the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`MessageId`, `QueueId`, `ResourceId`, etc.) |
//! | [`types`] | Shared value types (`QueueStatus`, `IconImage`, `PipelineOutcome`, etc.) |
//! | [`errors`] | Error enums, one per boundary |
//! | [`message`] | Envelope validation and inbound message decoding |
//! | [`permissions`] | Permission catalog and name translation table |
//! | [`taxonomy`] | Taxonomy terms and name matching |
//! | [`template`] | Icon media request and creation template builder |
//! | [`ports`] | Traits implemented by infrastructure crates |

pub mod errors;
pub mod identifiers;
pub mod message;
pub mod permissions;
pub mod ports;
pub mod taxonomy;
pub mod template;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{EnvelopeError, IntegrationError, PipelineError, TemplateError};
pub use identifiers::{MessageId, PipelineRunId, QueueId, ResourceId, ResourceType};
pub use message::{queue_id_of, Envelope, InboundMessage, MicroAppData, NamedSelection, Record};
pub use permissions::{canonical_name, resolve_permissions, Permission};
pub use ports::{CmsSession, ContentBackend, IconStore, QueueTracker};
pub use taxonomy::{NameMatch, Relationship, TaxonomyKind, TaxonomyTerm};
pub use template::{
    build_creation_template, CreationTemplate, IconResourceRequest, ResolvedReferences,
};
pub use types::{IconImage, IconResource, PipelineOutcome, QueueStatus, Submission};
