// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! HTTP route handlers for the gateway API.
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | `/health` | [`health`] | Health check endpoint |
//! | POST | `/activities` | [`create_and_run_activity`] | Save and run an activity |
//! | GET | `/activities/{activityId}/activityRuns/{runId}` | [`get_run`] | Run status |
//! | GET | `/activities/{activityId}/activityRuns/{runId}/logs` | [`get_run_logs`] | Run logs |
//!
//! Successful forwards answer `202 Accepted` with the upstream document as
//! received; every failure, a rejected path or body included, answers
//! `500 Internal Server Error` with an [`ErrorEnvelope`](crate::models::ErrorEnvelope).

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::activities;
use crate::application::AppState;
use crate::errors::GatewayError;
use crate::models::RawJson;

/// Health check endpoint.
///
/// # Response
///
/// ```json
/// {"status": "ok"}
/// ```
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Saves an activity definition upstream and starts a run of it.
///
/// The body is forwarded as received; it must be a JSON object. The response
/// is the run document returned by the upstream service.
#[tracing::instrument(skip(state, body))]
pub async fn create_and_run_activity(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, RawJson), GatewayError> {
    let activity = RawJson::object(body?)?;
    let client = state.upstream_client()?;

    let run = activities::create_and_run(&client, &activity).await?;

    Ok((StatusCode::ACCEPTED, run))
}

/// Returns the status document of an activity run.
#[tracing::instrument(skip(state))]
pub async fn get_run(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<(StatusCode, RawJson), GatewayError> {
    let Path((activity_id, run_id)) = path?;
    let client = state.upstream_client()?;

    let run = activities::get_run(&client, &activity_id, &run_id).await?;

    Ok((StatusCode::ACCEPTED, run))
}

/// Returns the log entries of an activity run.
#[tracing::instrument(skip(state))]
pub async fn get_run_logs(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<(StatusCode, RawJson), GatewayError> {
    let Path((activity_id, run_id)) = path?;
    let client = state.upstream_client()?;

    let logs = activities::get_run_logs(&client, &activity_id, &run_id).await?;

    Ok((StatusCode::ACCEPTED, logs))
}
