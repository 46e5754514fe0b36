// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use clap::{ArgAction, Parser};

use crate::constants::DEFAULT_SERVICE_NAME;
use crate::upstream::TlsPolicy;

#[derive(Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct GatewayOptions {
    #[arg(long, default_value = "127.0.0.1", env("GATEWAY_HTTP_HOST"))]
    pub host: String,
    #[arg(long, default_value = "8080", env("GATEWAY_HTTP_PORT"))]
    pub port: u16,
    /// Prefix the REST surface is nested under, e.g. `/refinery`
    #[arg(long, env("GATEWAY_BASE_PATH"))]
    pub base_path: Option<String>,
    #[arg(long, default_value = DEFAULT_SERVICE_NAME, env("GATEWAY_SERVICE_NAME"))]
    pub service_name: String,
    #[arg(long, env("GATEWAY_UPSTREAM_URL"))]
    pub upstream_url: Option<String>,
    #[arg(long, env("GATEWAY_UPSTREAM_USER"))]
    pub upstream_user: Option<String>,
    #[arg(long, env("GATEWAY_UPSTREAM_PASSWORD"), hide_env_values = true)]
    pub upstream_password: Option<String>,
    /// Verify upstream certificates and hostnames
    #[arg(long, default_value = "false", env("GATEWAY_STRICT_TLS"), action = ArgAction::SetTrue)]
    pub strict_tls: bool,
}

impl GatewayOptions {
    pub fn tls_policy(&self) -> TlsPolicy {
        if self.strict_tls {
            TlsPolicy::Verify
        } else {
            TlsPolicy::AcceptAll
        }
    }

    /// Returns the base path normalized to `/segment`, or `None` when the
    /// surface is served from the root.
    pub fn nest_path(&self) -> Option<String> {
        let trimmed = self.base_path.as_deref()?.trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{trimmed}"))
        }
    }
}

impl Default for GatewayOptions {
    fn default() -> Self {
        GatewayOptions {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_path: None,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            upstream_url: None,
            upstream_user: None,
            upstream_password: None,
            strict_tls: false,
        }
    }
}

// Keeps the upstream password out of the startup log line
impl fmt::Debug for GatewayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_path", &self.base_path)
            .field("service_name", &self.service_name)
            .field("upstream_url", &self.upstream_url)
            .field("upstream_user", &self.upstream_user)
            .field(
                "upstream_password",
                &self.upstream_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("strict_tls", &self.strict_tls)
            .finish()
    }
}
