//! Response envelope decoding.
//!
//! Every API response is wrapped as `{status, msg, message, data}`, but the
//! wrapper is not stable: `status` is sometimes a number and sometimes a
//! string, and the payload moves between `message` and `data` depending on
//! endpoint and API version. When something goes wrong on the server side,
//! `data` may hold a bare diagnostic string instead of a structured object.
//!
//! [`decode`] resolves all of that into either a typed payload or a
//! classified [`RapidDnsError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RapidDnsError, Result};
use crate::types::{lenient_string, ExportTask, ExportTicket, RecordSet, SearchPayload};

/// Success rule applied to the envelope's `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    /// Numeric `200`, or the strings `"200"` / `"ok"` (search and query endpoints)
    Lenient,
    /// Only the string `"ok"` (export endpoints)
    OkOnly,
}

/// The envelope's `status` field, which may arrive as a number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeStatus {
    /// Numeric status code
    Number(f64),
    /// Textual status
    Text(String),
    /// Missing, null, or any other JSON type
    Other(Value),
}

impl Default for EnvelopeStatus {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl EnvelopeStatus {
    /// Whether this status reports success under the given rule.
    ///
    /// String comparisons are exact and case-sensitive.
    #[must_use]
    pub fn is_success(&self, rule: StatusRule) -> bool {
        match (self, rule) {
            #[allow(clippy::float_cmp)]
            (Self::Number(n), StatusRule::Lenient) => *n == 200.0,
            (Self::Text(s), StatusRule::Lenient) => s == "200" || s == "ok",
            (Self::Text(s), StatusRule::OkOnly) => s == "ok",
            _ => false,
        }
    }
}

impl std::fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Outer structure of one API response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Success indicator
    #[serde(default)]
    pub status: EnvelopeStatus,

    /// Human-readable message; carries the reason on logical failures
    #[serde(default, deserialize_with = "lenient_string")]
    pub msg: String,

    /// Either free text or the payload, depending on the endpoint
    #[serde(default)]
    pub message: Value,

    /// The payload, or a bare diagnostic string
    #[serde(default)]
    pub data: Value,
}

/// A payload type the decoder can produce.
///
/// `Wire` is the shape probed in `message` and `data`; `accepts_message`
/// rejects zero-value structures that a plain text `message` could
/// otherwise turn into.
pub trait Payload: Sized {
    /// Deserialization shape
    type Wire: DeserializeOwned;

    /// Whether a `Wire` decoded from `message` carries real content
    fn accepts_message(wire: &Self::Wire) -> bool;

    /// Convert the wire shape into the payload
    fn from_wire(wire: Self::Wire) -> Self;

    /// Interpret a bare string found in `data`; `None` makes it a [`RapidDnsError::DataMessage`]
    fn from_bare_string(_text: &str) -> Option<Self> {
        None
    }
}

impl Payload for RecordSet {
    type Wire = SearchPayload;

    fn accepts_message(wire: &SearchPayload) -> bool {
        wire.has_content()
    }

    fn from_wire(wire: SearchPayload) -> Self {
        wire.into()
    }

    // Advanced queries answer `"data": "ok"` when nothing matched.
    fn from_bare_string(text: &str) -> Option<Self> {
        (text == "ok").then(|| Self::from_records("ok", Vec::new()))
    }
}

impl Payload for ExportTicket {
    type Wire = Self;

    fn accepts_message(wire: &Self) -> bool {
        !wire.export_id.is_empty()
    }

    fn from_wire(wire: Self) -> Self {
        wire
    }
}

impl Payload for ExportTask {
    type Wire = Self;

    fn accepts_message(wire: &Self) -> bool {
        !wire.id.is_empty() || !wire.status.is_empty()
    }

    fn from_wire(wire: Self) -> Self {
        wire
    }
}

/// Decode one HTTP response into a payload.
///
/// `status` is the HTTP status code and `body` the raw response bytes.
pub fn decode<P: Payload>(status: u16, body: &[u8], rule: StatusRule) -> Result<P> {
    match status {
        401 | 403 => return Err(RapidDnsError::Auth { status }),
        400..=599 => return Err(RapidDnsError::Transport { status }),
        _ => {}
    }

    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| {
        RapidDnsError::MalformedResponse(format!("response is not a JSON envelope: {e}"))
    })?;

    envelope.into_payload(rule)
}

impl Envelope {
    /// Resolve the payload from an already-parsed envelope
    pub fn into_payload<P: Payload>(self, rule: StatusRule) -> Result<P> {
        if !self.status.is_success(rule) {
            let message = if self.msg.is_empty() {
                format!("unexpected status {}", self.status)
            } else {
                self.msg
            };
            return Err(RapidDnsError::Api { message });
        }

        if let Some(payload) = probe_message::<P>(&self.message) {
            return Ok(payload);
        }

        match P::Wire::deserialize(&self.data) {
            Ok(wire) if !self.data.is_null() => Ok(P::from_wire(wire)),
            Ok(_) => Err(RapidDnsError::MalformedResponse(
                "payload missing from both `message` and `data`".to_string(),
            )),
            Err(err) => match self.data {
                Value::String(text) => P::from_bare_string(&text).ok_or(RapidDnsError::DataMessage(text)),
                Value::Null => Err(RapidDnsError::MalformedResponse(
                    "payload missing from both `message` and `data`".to_string(),
                )),
                _ => Err(RapidDnsError::MalformedResponse(format!(
                    "failed to parse data: {err}"
                ))),
            },
        }
    }
}

fn probe_message<P: Payload>(message: &Value) -> Option<P> {
    if message.is_null() {
        return None;
    }
    let wire = P::Wire::deserialize(message).ok()?;
    P::accepts_message(&wire).then(|| P::from_wire(wire))
}
