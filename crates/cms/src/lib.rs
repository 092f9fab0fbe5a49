//! Micro-app sync CMS adapter.
//!
//! Implements [`pipeline::ContentBackend`] and [`pipeline::CmsSession`] over a
//! Drupal JSON:API backend.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Login, cookie handling, CSRF headers, JSON:API media
//! types, pagination, and response decoding all live here. The orchestrator
//! sees only the port traits.
//!
//! ## Sessions
//!
//! [`CmsClient::open_session`](pipeline::ContentBackend::open_session) builds a
//! fresh `reqwest::Client` with its own cookie jar, logs in, and fetches the
//! CSRF token. The resulting [`JsonApiSession`] is used for one pipeline run
//! and dropped with it, so no cookie or token ever crosses between messages.
//!
//! ## Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | login | `POST /user/login?_format=json` |
//! | CSRF token | `GET /session/token` |
//! | upload icon | `POST /jsonapi/media/image/field_media_image` |
//! | icon media | `POST /jsonapi/media/image` |
//! | terms | `GET /jsonapi/taxonomy_term/{vocabulary}` (follows `links.next`) |
//! | permissions | `GET {permissions_path}` |
//! | create | `POST /jsonapi/node/micro_app` |

mod client;
mod config;
mod documents;
mod http;
mod session;

pub use client::CmsClient;
pub use config::{CmsConfig, DEFAULT_PERMISSIONS_PATH};
pub use session::JsonApiSession;
