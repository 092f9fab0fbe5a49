//! Micro-app sync ingress endpoint.
//!
//! Binds an HTTP server that receives queue envelopes pushed by the upstream
//! publishing platform:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /` | receive one envelope and run the pipeline for its first record |
//! | `GET /health` | liveness probe |
//!
//! Every envelope carrying a `QueueID` has its processing status mirrored
//! to the queue-tracker: `In Progress` on arrival, then `Created` or `Error`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Shared-secret checking, envelope validation, and
//! status-code mapping live here. The pipeline itself is run by
//! [`orchestrator::PipelineExecutor`].

mod auth;
mod ingress;

pub use auth::{ApiKey, API_KEY_HEADER};
pub use ingress::{router, serve, IngressState};
