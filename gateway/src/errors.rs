// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use axum::Json;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::ErrorEnvelope;

/// Startup errors: configuration and service binding lookup.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("service binding not found: {0}")]
    BindingNotFound(String),
}

/// Failure of a forwarding operation.
///
/// Both variants are answered with `500 Internal Server Error` and an
/// [`ErrorEnvelope`] body; the upstream status code is never forwarded.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("{label}: upstream returned {status}")]
    Upstream {
        label: &'static str,
        status: u16,
        envelope: ErrorEnvelope,
    },
    #[error(transparent)]
    Fault(anyhow::Error),
}

impl GatewayError {
    /// Normalizes any failure into the five-field envelope.
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Upstream { envelope, .. } => envelope.clone(),
            // Debug prints the message followed by its cause chain
            Self::Fault(source) => ErrorEnvelope::from_fault(format!("{source:?}")),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = Json(self.envelope());

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(source: anyhow::Error) -> Self {
        tracing::error!("{:?}", source);
        GatewayError::Fault(source)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(source: reqwest::Error) -> Self {
        tracing::error!("{:?}", source);
        GatewayError::Fault(source.into())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(source: serde_json::Error) -> Self {
        tracing::error!("{:?}", source);
        GatewayError::Fault(source.into())
    }
}

// Extractor rejections answer with the envelope too, not axum's plain text
impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        tracing::error!("[gateway] rejected path: {}", rejection.body_text());
        GatewayError::Fault(anyhow::Error::new(rejection).context("invalid request path"))
    }
}

impl From<BytesRejection> for GatewayError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::error!("[gateway] rejected body: {}", rejection.body_text());
        GatewayError::Fault(anyhow::Error::new(rejection).context("invalid request body"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use axum::body::to_bytes;
    use axum::extract::{FromRequestParts, Path};
    use axum::http::Request;

    #[test]
    fn test_fault_envelope_contains_cause_chain() {
        let result: Result<(), anyhow::Error> =
            Err(anyhow!("connection reset by peer")).context("POST /activities");
        let error = GatewayError::from(result.unwrap_err());

        let envelope = error.envelope();
        assert_eq!(envelope.msg_id, "500");
        assert_eq!(envelope.msg_severity, "error");
        assert!(envelope.msg_text.contains("POST /activities"));
        assert!(envelope.msg_text.contains("connection reset by peer"));
        assert_eq!(envelope.msg_explanation, "");
        assert_eq!(envelope.msg_response, "");
    }

    #[test]
    fn test_serde_error_becomes_fault() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error = GatewayError::from(source);
        assert!(matches!(error, GatewayError::Fault(_)));
        assert_eq!(error.envelope().msg_id, "500");
    }

    #[tokio::test]
    async fn test_path_rejection_becomes_fault_envelope() {
        let (mut parts, _) = Request::new(()).into_parts();
        let rejection = Path::<(String, String)>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        let response = GatewayError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["msgId"], "500");
        assert_eq!(json["msgSeverity"], "error");
        assert!(json["msgText"].as_str().unwrap().contains("invalid request path"));
    }

    #[tokio::test]
    async fn test_upstream_error_response_is_500() {
        let error = GatewayError::Upstream {
            label: "Getting Run Status",
            status: 404,
            envelope: ErrorEnvelope::from_upstream("Getting Run Status", None),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["msgText"], "Getting Run Status");
        assert_eq!(json["msgSeverity"], "error");
        assert_eq!(json["msgId"], "");
    }
}
