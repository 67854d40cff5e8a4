//! Wire-level helpers shared by the message builders.
//!
//! Every origin message is a compact JSON array sent as one transport frame:
//!
//! ```text
//! registration:  ["<stream>",{"<field>":"<type>",...}]
//! measurement:   ["<stream>",<timestamp>,{"<field>":<value>,...}]
//! reply:         [<status>,<message>]
//! ```
//!
//! Builders assemble the outer array by hand so field order is insertion
//! order; individual tokens go through `serde_json` so strings are escaped
//! and numbers use a locale-independent representation.

use serde_json::Value as JsonValue;

use crate::error::{OriginError, Result};

/// Render `s` as a JSON string literal, quotes included
pub fn quote(s: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Render a keyed object body from pre-encoded `(name, token)` pairs
pub(crate) fn object<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::from("{");
    for (i, (name, token)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(name));
        out.push(':');
        out.push_str(token);
    }
    out.push('}');
    out
}

/// Collector acknowledgment of a registration
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationReply {
    /// Zero when the collector accepted the stream
    pub status: i64,
    /// Human readable detail, empty if the collector sent none
    pub message: String,
}

impl RegistrationReply {
    /// Decode a `[status, message]` reply frame
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(bytes)
            .map_err(|e| OriginError::Reply(format!("not valid JSON: {}", e)))?;

        let items = value
            .as_array()
            .ok_or_else(|| OriginError::Reply("expected a JSON array".to_string()))?;

        let status = items
            .first()
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| OriginError::Reply("missing integer status".to_string()))?;

        let message = match items.get(1) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Ok(Self { status, message })
    }

    /// Whether the collector accepted the registration
    pub fn is_accepted(&self) -> bool {
        self.status == 0
    }

    /// Turn a refusal into `OriginError::Rejected`
    pub fn into_result(self) -> Result<()> {
        if self.is_accepted() {
            Ok(())
        } else {
            Err(OriginError::Rejected {
                status: self.status,
                message: self.message,
            })
        }
    }
}
