// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # DataLoad Gateway
//!
//! A sample HTTP gateway in front of a remote data-integration service.
//!
//! The gateway exposes a small REST surface for activities and forwards every
//! call, with the service's credentials injected, to the upstream API. Upstream
//! responses are passed through; upstream errors and local faults are
//! normalized into a five-field JSON error envelope.
//!
//! ## Architecture
//!
//! ```text
//! Client -> HTTP API -> Gateway (this crate) -> HTTPS + basic auth -> Upstream
//!                            |
//!                            +-> VCAP_SERVICES (base URL and credentials)
//! ```
//!
//! ## Modules
//!
//! - [`activities`]: create-and-run, run status and run log forwarding
//! - [`application`]: HTTP server setup with Axum
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: paths, labels and defaults
//! - [`errors`]: error types with HTTP response mapping
//! - [`models`]: credentials, activity documents and the error envelope
//! - [`routes`]: HTTP route handlers
//! - [`service_locator`]: upstream binding lookup
//! - [`upstream`]: authenticated upstream HTTP client
//!
//! ## Usage
//!
//! ```bash
//! dataload-gateway --host 0.0.0.0 --port 8080 --service-name DataWorks --base-path /refinery
//! ```
//!
//! ## Security Considerations
//!
//! - Unless `--strict-tls` is given, upstream certificates and hostnames are
//!   not verified
//! - Basic credentials are sent to every upstream host the gateway calls,
//!   including the `runsURL` returned by the service
//! - The upstream password is redacted from debug output and zeroized on drop

pub mod activities;
pub mod application;
pub mod configuration;
pub mod constants;
pub mod errors;
pub mod models;
pub mod routes;
pub mod service_locator;
pub mod upstream;
