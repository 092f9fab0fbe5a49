//! Upstream collaborator adapters.
//!
//! The publishing platform that enqueues micro-app messages also hosts the
//! icon images and the message log that tracks each message's status. This
//! crate talks to both:
//!
//! - [`HttpIconStore`] implements [`pipeline::IconStore`] by downloading the
//!   icon from the URL carried in the message.
//! - [`MessageLogTracker`] implements [`pipeline::QueueTracker`] by updating
//!   the message-log record named by the envelope's queue ID.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport and URL handling live here; the
//! orchestrator and the ingress endpoint see only the port traits.

mod http;
mod icons;
mod tracker;

pub use icons::HttpIconStore;
pub use tracker::{MessageLogTracker, DEFAULT_COLLECTION};
