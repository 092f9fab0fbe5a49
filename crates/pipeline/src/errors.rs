//! Error types for the micro-app pipeline domain.
//!
//! Each boundary owns one enum:
//!
//! - [`EnvelopeError`]: the inbound envelope does not have the expected shape.
//! - [`IntegrationError`]: a collaborator (icon storage, CMS, queue-tracker)
//!   call failed. Every port trait in [`crate::ports`] returns it.
//! - [`TemplateError`]: an inbound field could not be mapped onto the
//!   creation template.
//! - [`PipelineError`]: a pipeline step failed. Its `Display` is the message
//!   surfaced to the caller.
//!
//! None of these carry retry semantics; every pipeline run is fire-once.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Envelope validation
// ---------------------------------------------------------------------------

/// The inbound message envelope is missing a required element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// `Records` is absent, not a list, or empty.
    #[error("envelope has no records")]
    MissingRecords,

    /// `Records[0].body` is absent.
    #[error("first record has no body")]
    MissingBody,

    /// `Records[0].messageID` is absent.
    #[error("first record has no message ID")]
    MissingMessageId,
}

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

/// A call to an external collaborator failed.
///
/// Infrastructure crates map their transport errors into this type so the
/// orchestrator never depends on an HTTP client.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The request could not be sent or the connection failed.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The collaborator answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code returned.
        status: u16,
        /// Response body, as text, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {message}")]
    Decode {
        /// Description of the decoding problem.
        message: String,
    },

    /// The collaborator answered successfully but returned nothing usable.
    #[error("empty response for {what}")]
    Empty {
        /// What was expected (e.g. `"icon bytes"`, `"CSRF token"`).
        what: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Template population
// ---------------------------------------------------------------------------

/// An inbound field could not be mapped onto the creation template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A taxonomy name list arrived as a string that is not valid JSON.
    ///
    /// Upstream encodes category/country/language selections as JSON strings
    /// nested inside plain objects; that shape is not a guaranteed contract.
    #[error("field '{field}' holds malformed JSON: {value}")]
    MalformedSelection {
        /// Which inbound field was malformed.
        field: &'static str,
        /// The raw value received.
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Pipeline step failures
// ---------------------------------------------------------------------------

/// A pipeline step failed; the run stops at the first failure.
///
/// The `Display` output is the caller-facing message. Every variant maps to
/// HTTP 500 at the ingress endpoint.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The record body carries no `Body`, no `Icon`, or an empty `Icon.Image`.
    #[error("No Image or Icon to Upload")]
    MissingIcon,

    /// The record body has the right outer shape but `Body.data` or the
    /// icon reference could not be decoded.
    #[error("Error: Invalid Micro App Body")]
    InvalidBody(#[source] serde_json::Error),

    /// Step 1.
    #[error("Error: Couldn't fetch Icon")]
    IconFetch(#[source] IntegrationError),

    /// Step 2.
    #[error("Error: Couldn't Authenticate")]
    Authentication(#[source] IntegrationError),

    /// Step 3.
    #[error("Error: Couldn't Upload Image")]
    ImageUpload(#[source] IntegrationError),

    /// Step 4.
    #[error("Error: Couldn't Get Icon ID")]
    IconResource(#[source] IntegrationError),

    /// Step 5, permission catalog.
    #[error("Error: Couldn't Load Permissions")]
    Permissions(#[source] IntegrationError),

    /// Step 5, language terms.
    #[error("Error: Couldn't Load Languages")]
    Languages(#[source] IntegrationError),

    /// Step 5, country terms.
    #[error("Error: Couldn't Load Countries")]
    Countries(#[source] IntegrationError),

    /// Step 5, category terms.
    #[error("Error: Couldn't Load Categories")]
    Categories(#[source] IntegrationError),

    /// Step 6.
    #[error("Error: Couldn't Build Micro App")]
    Template(#[source] TemplateError),

    /// Step 7.
    #[error("Error: Couldn't Create Micro App")]
    Submission(#[source] IntegrationError),
}

impl PipelineError {
    /// HTTP status reported to the caller for this failure.
    pub fn status_code(&self) -> u16 {
        500
    }
}
