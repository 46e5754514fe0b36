// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::collections::BTreeMap;
use std::fmt;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::ZeroizeOnDrop;

use crate::constants::{APPLICATION_JSON, DEFAULT_MSG_SEVERITY, FAULT_MSG_ID};

/// A parsed activity document, used where the gateway reads a field.
pub type ActivityDocument = Map<String, Value>;

/// Base URL and basic credentials of the upstream data-integration service.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct UpstreamCredentials {
    pub url: String,
    pub user: String,
    pub password: String,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The payload returned to the caller on every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub msg_id: String,
    pub msg_severity: String,
    pub msg_text: String,
    pub msg_explanation: String,
    pub msg_response: String,
}

impl ErrorEnvelope {
    /// Builds the envelope for a non-200 upstream response.
    ///
    /// An empty or unparsable body yields the defaults: `msgText` is the
    /// `label`, `msgSeverity` is `"error"`, the rest are empty. Once the body
    /// parses as a JSON object every field is taken from it, a missing field
    /// becoming empty, except `msgSeverity` which keeps `"error"`.
    pub fn from_upstream(label: &str, body: Option<&[u8]>) -> Self {
        let mut envelope = Self {
            msg_id: String::new(),
            msg_severity: DEFAULT_MSG_SEVERITY.to_string(),
            msg_text: label.to_string(),
            msg_explanation: String::new(),
            msg_response: String::new(),
        };

        let Some(body) = body.filter(|body| !body.is_empty()) else {
            return envelope;
        };

        let parsed: Map<String, Value> = match serde_json::from_slice(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("[gateway] upstream error body is not a JSON object: {}", e);
                return envelope;
            }
        };

        envelope.msg_id = text(parsed.get("msgId")).unwrap_or_default();
        if let Some(severity) = text(parsed.get("msgSeverity")) {
            envelope.msg_severity = severity;
        }
        envelope.msg_text = text(parsed.get("msgText")).unwrap_or_default();
        envelope.msg_explanation = text(parsed.get("msgExplanation")).unwrap_or_default();
        envelope.msg_response = text(parsed.get("msgResponse")).unwrap_or_default();

        envelope
    }

    /// Builds the envelope for a local fault, `details` being its full
    /// description.
    pub fn from_fault(details: impl Into<String>) -> Self {
        Self {
            msg_id: FAULT_MSG_ID.to_string(),
            msg_severity: DEFAULT_MSG_SEVERITY.to_string(),
            msg_text: details.into(),
            msg_explanation: String::new(),
            msg_response: String::new(),
        }
    }
}

// null counts as absent, other non-strings are kept in their JSON text form
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// A JSON document kept byte for byte as it was received.
///
/// Only its top-level shape is checked, so numbers, key order and duplicate
/// keys reach the other side untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJson(Bytes);

impl RawJson {
    /// Accepts `bytes` if they hold a JSON object.
    pub fn object(bytes: Bytes) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<BTreeMap<String, IgnoredAny>>(&bytes)?;
        Ok(Self(bytes))
    }

    /// Accepts `bytes` if they hold a JSON array.
    pub fn array(bytes: Bytes) -> Result<Self, serde_json::Error> {
        serde_json::from_slice::<Vec<IgnoredAny>>(&bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl IntoResponse for RawJson {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, APPLICATION_JSON)], self.0).into_response()
    }
}
