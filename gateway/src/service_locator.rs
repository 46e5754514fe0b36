// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Upstream service binding lookup.
//!
//! The platform publishes bound services in the `VCAP_SERVICES` environment
//! variable as a JSON object keyed by service label:
//!
//! ```json
//! {
//!   "DataWorks": [
//!     {
//!       "name": "my-dataworks",
//!       "label": "DataWorks",
//!       "credentials": {
//!         "url": "https://dataworks.example.com/ibm/dataworks/dc/v1",
//!         "userid": "user",
//!         "password": "secret"
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Values given on the command line (or their environment variables) take
//! precedence over the binding, field by field.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::configuration::GatewayOptions;
use crate::constants::VCAP_SERVICES_ENV;
use crate::errors::AppError;
use crate::models::UpstreamCredentials;

#[derive(Debug, Deserialize)]
struct ServiceBinding {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    credentials: BindingCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct BindingCredentials {
    url: Option<String>,
    #[serde(alias = "user", alias = "username")]
    userid: Option<String>,
    password: Option<String>,
}

/// Resolves the upstream base URL and credentials for a named binding.
pub struct ServiceLocator {
    service_name: String,
}

impl ServiceLocator {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Resolves credentials, reading `VCAP_SERVICES` only when the options do
    /// not already provide all three values.
    pub fn resolve(&self, options: &GatewayOptions) -> Result<UpstreamCredentials, AppError> {
        let vcap = match (
            &options.upstream_url,
            &options.upstream_user,
            &options.upstream_password,
        ) {
            (Some(_), Some(_), Some(_)) => None,
            _ => Some(std::env::var(VCAP_SERVICES_ENV).map_err(|_| {
                AppError::ConfigError(format!("{VCAP_SERVICES_ENV} is not set"))
            })?),
        };

        self.resolve_with(options, vcap.as_deref())
    }

    /// Resolves credentials from an explicit `VCAP_SERVICES` document.
    pub fn resolve_with(
        &self,
        options: &GatewayOptions,
        vcap_services: Option<&str>,
    ) -> Result<UpstreamCredentials, AppError> {
        let binding = match vcap_services {
            Some(document) => self.find_binding(document)?,
            None => BindingCredentials::default(),
        };

        let url = options
            .upstream_url
            .clone()
            .or(binding.url)
            .ok_or_else(|| self.missing("url"))?;
        let user = options
            .upstream_user
            .clone()
            .or(binding.userid)
            .ok_or_else(|| self.missing("userid"))?;
        let password = options
            .upstream_password
            .clone()
            .or(binding.password)
            .ok_or_else(|| self.missing("password"))?;

        tracing::debug!(
            "[gateway] resolved service '{}' at {}",
            self.service_name,
            url
        );

        Ok(UpstreamCredentials {
            url: url.trim_end_matches('/').to_string(),
            user,
            password,
        })
    }

    /// A binding whose `name` matches wins over the first binding listed
    /// under a label of the same name.
    fn find_binding(&self, document: &str) -> Result<BindingCredentials, AppError> {
        let services: BTreeMap<String, Vec<ServiceBinding>> = serde_json::from_str(document)
            .map_err(|e| AppError::ConfigError(format!("invalid {VCAP_SERVICES_ENV}: {e}")))?;

        let by_name = services
            .values()
            .flatten()
            .position(|b| b.name.as_deref() == Some(self.service_name.as_str()));

        let binding = match by_name {
            Some(index) => services.into_values().flatten().nth(index),
            None => services
                .into_iter()
                .find(|(label, _)| *label == self.service_name)
                .and_then(|(_, bindings)| bindings.into_iter().next()),
        };

        binding
            .map(|b| b.credentials)
            .ok_or_else(|| AppError::BindingNotFound(self.service_name.clone()))
    }

    fn missing(&self, field: &str) -> AppError {
        AppError::ConfigError(format!(
            "service '{}' provides no {field}",
            self.service_name
        ))
    }
}
