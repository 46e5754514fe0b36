// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Authenticated HTTP client for the upstream data-integration service.
//!
//! A client is built per inbound request. It attaches the service's basic
//! credentials to every request whose target lies inside the configured
//! [`AuthScope`] and applies the configured [`TlsPolicy`].
//!
//! NOTE: the default policy, [`TlsPolicy::AcceptAll`], trusts every
//! certificate and every hostname. It exists so the gateway can talk to
//! self-signed upstream endpoints and is not suitable for production; use
//! `--strict-tls` there.

use anyhow::{Context, anyhow};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};

use crate::constants::{ACTIVITIES_PATH, ACTIVITY_RUNS_PATH, APPLICATION_JSON, LOGS_PATH};
use crate::errors::GatewayError;
use crate::models::{ErrorEnvelope, RawJson, UpstreamCredentials};

/// Certificate and hostname verification applied to upstream connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Accept any certificate for any hostname.
    AcceptAll,
    /// Verify certificates against the bundled web PKI roots and check hostnames.
    Verify,
}

/// The set of targets the basic credentials are sent to.
///
/// The credentials are not bound to the service's own host: a `runsURL`
/// pointing elsewhere receives them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    /// Any host, any port.
    Any,
}

impl AuthScope {
    pub fn contains(&self, _url: &Url) -> bool {
        match self {
            Self::Any => true,
        }
    }
}

pub struct UpstreamClient<'a> {
    http: reqwest::Client,
    credentials: &'a UpstreamCredentials,
    scope: AuthScope,
}

impl<'a> UpstreamClient<'a> {
    /// Builds a client whose credentials apply to [`AuthScope::Any`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Fault`] if the TLS backend cannot be initialized.
    pub fn build(
        credentials: &'a UpstreamCredentials,
        tls_policy: TlsPolicy,
    ) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();

        if tls_policy == TlsPolicy::AcceptAll {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let http = builder
            .build()
            .context("failed to initialize the upstream TLS client")?;

        Ok(Self {
            http,
            credentials,
            scope: AuthScope::Any,
        })
    }

    /// `{base}/activities`
    pub fn activities_url(&self) -> Result<Url, GatewayError> {
        self.endpoint(&[ACTIVITIES_PATH])
    }

    /// `{base}/activities/{activity_id}/activityRuns/{run_id}`
    pub fn activity_run_url(&self, activity_id: &str, run_id: &str) -> Result<Url, GatewayError> {
        self.endpoint(&[ACTIVITIES_PATH, activity_id, ACTIVITY_RUNS_PATH, run_id])
    }

    /// `{base}/activities/{activity_id}/activityRuns/{run_id}/logs`
    pub fn activity_run_logs_url(
        &self,
        activity_id: &str,
        run_id: &str,
    ) -> Result<Url, GatewayError> {
        self.endpoint(&[
            ACTIVITIES_PATH,
            activity_id,
            ACTIVITY_RUNS_PATH,
            run_id,
            LOGS_PATH,
        ])
    }

    /// POSTs `document` as a JSON body, byte for byte.
    #[tracing::instrument(skip(self, document))]
    pub async fn post_json(&self, url: Url, document: &RawJson) -> Result<Response, GatewayError> {
        let response = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(document.clone().into_bytes())
            .send()
            .await?;

        tracing::debug!("[gateway] upstream responded {}", response.status());
        Ok(response)
    }

    /// POSTs with an empty body.
    #[tracing::instrument(skip(self))]
    pub async fn post_empty(&self, url: Url) -> Result<Response, GatewayError> {
        let response = self.request(Method::POST, url).send().await?;

        tracing::debug!("[gateway] upstream responded {}", response.status());
        Ok(response)
    }

    /// GETs a JSON resource.
    #[tracing::instrument(skip(self))]
    pub async fn get_json(&self, url: Url) -> Result<Response, GatewayError> {
        let response = self
            .request(Method::GET, url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .send()
            .await?;

        tracing::debug!("[gateway] upstream responded {}", response.status());
        Ok(response)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let authorized = self.scope.contains(&url);
        let builder = self.http.request(method, url);
        if authorized {
            builder.basic_auth(&self.credentials.user, Some(&self.credentials.password))
        } else {
            builder
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let base = &self.credentials.url;
        let mut url =
            Url::parse(base).with_context(|| format!("invalid upstream URL '{base}'"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("upstream URL '{base}' cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Passes a `200 OK` response through; anything else becomes
/// [`GatewayError::Upstream`] with the envelope built from its body.
pub async fn check_status(
    response: Response,
    label: &'static str,
) -> Result<Response, GatewayError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let url = response.url().clone();
    let body = response.bytes().await?;

    tracing::warn!("[gateway] {}: {} returned {}", label, url, status);

    Err(GatewayError::Upstream {
        label,
        status: status.as_u16(),
        envelope: ErrorEnvelope::from_upstream(label, Some(&body)),
    })
}
