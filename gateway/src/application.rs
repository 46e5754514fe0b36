// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::GatewayOptions;
use crate::errors::GatewayError;
use crate::models::UpstreamCredentials;
use crate::routes;
use crate::upstream::UpstreamClient;
use axum::Router;
use axum::routing::{get, post};
use axum::serve::Serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub options: GatewayOptions,
    pub credentials: UpstreamCredentials,
}

impl AppState {
    /// Builds a fresh authenticated client for one inbound request.
    pub fn upstream_client(&self) -> Result<UpstreamClient<'_>, GatewayError> {
        UpstreamClient::build(&self.credentials, self.options.tls_policy())
    }
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(
        options: GatewayOptions,
        credentials: UpstreamCredentials,
    ) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(address).await?;
        let host = options.host.clone();
        let server = run(listener, options, credentials)?;
        let port = server.local_addr()?.port();

        tracing::info!("[gateway] listening at http://{}:{}", host, port);

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

#[tracing::instrument(skip(listener, credentials))]
pub fn run(
    listener: TcpListener,
    options: GatewayOptions,
    credentials: UpstreamCredentials,
) -> Result<Serve<TcpListener, Router, Router>, std::io::Error> {
    let app = create_router(options, credentials);
    Ok(axum::serve(listener, app))
}

/// Builds the router, nesting the activity routes under the configured base
/// path when one is set.
pub fn create_router(options: GatewayOptions, credentials: UpstreamCredentials) -> Router {
    let nest_path = options.nest_path();
    let state = Arc::new(AppState {
        options,
        credentials,
    });

    let activities = Router::new()
        .route("/activities", post(routes::create_and_run_activity))
        .route(
            "/activities/{activity_id}/activityRuns/{run_id}",
            get(routes::get_run),
        )
        .route(
            "/activities/{activity_id}/activityRuns/{run_id}/logs",
            get(routes::get_run_logs),
        )
        .with_state(state);

    let app = Router::new().route("/health", get(routes::health));
    match nest_path {
        Some(path) => app.nest(&path, activities),
        None => app.merge(activities),
    }
}
