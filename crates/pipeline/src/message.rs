//! Inbound message envelope and the micro-app message it carries.
//!
//! The envelope is validated in two stages. [`Envelope::from_value`] checks
//! the outer queue shape (`Records[0].body`, `Records[0].messageID`) and is
//! what the ingress endpoint rejects with a bad-request error.
//! [`InboundMessage::from_record_body`] then decodes the micro-app payload;
//! its failures are pipeline failures, not malformed requests.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{EnvelopeError, IconImage, MessageId, PipelineError, QueueId};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A validated queue envelope. Only the first record is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Queue-tracker record to mirror the processing status to, if any.
    pub queue_id: Option<QueueId>,
    /// The first record of the batch.
    pub record: Record,
}

/// One record from the queue batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record's `messageID`.
    pub message_id: MessageId,
    /// The record's `body`, still undecoded.
    pub body: Value,
}

impl Envelope {
    /// Validates the outer envelope shape.
    ///
    /// A `body` delivered as a JSON-encoded string (as some queue bridges do)
    /// is decoded in place; any other string is kept as-is and will fail the
    /// icon check later.
    pub fn from_value(raw: &Value) -> Result<Self, EnvelopeError> {
        let first = raw
            .get("Records")
            .and_then(Value::as_array)
            .and_then(|records| records.first())
            .ok_or(EnvelopeError::MissingRecords)?;

        let body = first.get("body").ok_or(EnvelopeError::MissingBody)?;
        let message_id = first
            .get("messageID")
            .and_then(message_id_of)
            .ok_or(EnvelopeError::MissingMessageId)?;

        let body = match body {
            Value::String(encoded) => serde_json::from_str(encoded).unwrap_or_else(|_| body.clone()),
            other => other.clone(),
        };

        Ok(Self {
            queue_id: queue_id_of(raw),
            record: Record { message_id, body },
        })
    }
}

/// Only presence of `messageID` is required. Values that are not a usable
/// string or number (`null`, `""`, objects) are kept as their JSON text.
fn message_id_of(id: &Value) -> Option<MessageId> {
    let text = match id {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    MessageId::new(text)
}

/// Extracts `QueueID.data.id` from a raw envelope.
///
/// Works on unvalidated input so the ingress endpoint can report status even
/// for requests it is about to reject.
pub fn queue_id_of(raw: &Value) -> Option<QueueId> {
    let id = raw.pointer("/QueueID/data/id")?;
    id.as_u64()
        .or_else(|| id.as_str().and_then(|s| s.trim().parse().ok()))
        .map(QueueId::new)
}

// ---------------------------------------------------------------------------
// Micro-app message
// ---------------------------------------------------------------------------

/// `{ "name": ... }` entry carrying a JSON-encoded selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedSelection {
    /// JSON-encoded string or list of names.
    pub name: String,
}

/// Micro-app attributes from `Body.data`.
///
/// The `momo`, `ozow` and `billing` flags are copied to the CMS as sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MicroAppData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "discoveryUri", default)]
    pub discovery_uri: Option<String>,
    #[serde(rename = "chatUri", default)]
    pub chat_uri: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub languages: Vec<NamedSelection>,
    #[serde(default)]
    pub countries: Vec<NamedSelection>,
    /// JSON-encoded list of category names.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub momo: Option<Value>,
    /// Mobile-money phone prefixes keyed by country.
    #[serde(rename = "MomoCountries", default)]
    pub momo_countries: Option<Map<String, Value>>,
    #[serde(default)]
    pub ozow: Option<Value>,
    #[serde(default)]
    pub billing: Option<Value>,
    #[serde(default)]
    pub domains: Option<Value>,
}

/// A decoded inbound micro-app message.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub data: MicroAppData,
    /// The icon to upload (`Icon.Image[0]`).
    pub icon: IconImage,
    /// Every key of `Body.data`, used to look up permission flags by name.
    flags: Map<String, Value>,
}

impl InboundMessage {
    /// Decodes a record body.
    ///
    /// Fails with [`PipelineError::MissingIcon`] before looking at anything
    /// else when `Body`, `Icon` or a non-empty `Icon.Image` is absent.
    pub fn from_record_body(body: &Value) -> Result<Self, PipelineError> {
        let (app, image) = match (body.get("Body"), body.pointer("/Icon/Image/0")) {
            (Some(app), Some(image)) => (app, image),
            _ => return Err(PipelineError::MissingIcon),
        };

        let icon: IconImage =
            serde_json::from_value(image.clone()).map_err(PipelineError::InvalidBody)?;
        let raw = app.get("data").cloned().unwrap_or(Value::Null);
        let data: MicroAppData =
            serde_json::from_value(raw.clone()).map_err(PipelineError::InvalidBody)?;
        let flags = match raw {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(Self { data, icon, flags })
    }

    /// Returns `true` when `Body.data[name]` is set to a truthy value.
    pub fn requests(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(is_truthy)
    }
}

/// Truthiness as the upstream publisher uses it: `false`, `0`, `""` and
/// `null` are unset, anything else is set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
