// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Activity forwarding against the upstream data-integration service.
//!
//! # Create-and-run flow
//!
//! 1. POST the activity definition to `{base}/activities`
//! 2. Read the `runsURL` of the created activity from the response
//! 3. POST an empty body to `runsURL` to start a run
//! 4. Return the run document
//!
//! Every call is single-shot. A failed second call does not undo the first.
//! Documents travel as [`RawJson`], so what the caller sends is what the
//! service receives and the other way round.

use anyhow::anyhow;
use reqwest::Url;
use serde_json::Value;

use crate::constants::{
    GETTING_RUN_LOGS_FAILED, GETTING_RUN_STATUS, RUN_ACTIVITY_FAILED, RUNS_URL_FIELD,
    SAVING_ACTIVITY_FAILED,
};
use crate::errors::GatewayError;
use crate::models::{ActivityDocument, RawJson};
use crate::upstream::{UpstreamClient, check_status};

/// Saves an activity and immediately runs it, returning the run document.
#[tracing::instrument(skip(client, activity))]
pub async fn create_and_run(
    client: &UpstreamClient<'_>,
    activity: &RawJson,
) -> Result<RawJson, GatewayError> {
    let response = client.post_json(client.activities_url()?, activity).await?;
    let response = check_status(response, SAVING_ACTIVITY_FAILED).await?;
    let created: ActivityDocument = response.json().await?;

    let runs_url = runs_url(&created)?;
    tracing::debug!("[gateway] running activity via {}", runs_url);

    let response = client.post_empty(runs_url).await?;
    let response = check_status(response, RUN_ACTIVITY_FAILED).await?;

    Ok(RawJson::object(response.bytes().await?)?)
}

/// Fetches the status document of an activity run.
#[tracing::instrument(skip(client))]
pub async fn get_run(
    client: &UpstreamClient<'_>,
    activity_id: &str,
    run_id: &str,
) -> Result<RawJson, GatewayError> {
    let url = client.activity_run_url(activity_id, run_id)?;
    let response = check_status(client.get_json(url).await?, GETTING_RUN_STATUS).await?;

    Ok(RawJson::object(response.bytes().await?)?)
}

/// Fetches the log entries of an activity run.
#[tracing::instrument(skip(client))]
pub async fn get_run_logs(
    client: &UpstreamClient<'_>,
    activity_id: &str,
    run_id: &str,
) -> Result<RawJson, GatewayError> {
    let url = client.activity_run_logs_url(activity_id, run_id)?;
    let response = check_status(client.get_json(url).await?, GETTING_RUN_LOGS_FAILED).await?;

    Ok(RawJson::array(response.bytes().await?)?)
}

fn runs_url(created: &ActivityDocument) -> Result<Url, GatewayError> {
    let runs_url = created
        .get(RUNS_URL_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("created activity carries no string '{RUNS_URL_FIELD}'"))?;

    Url::parse(runs_url)
        .map_err(|e| anyhow!("invalid {RUNS_URL_FIELD} '{runs_url}': {e}").into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> ActivityDocument {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_runs_url_is_taken_verbatim() {
        let created = document(json!({
            "activityId": "8d3905eb",
            "runsURL": "https://h:9443/dc/v1/activities/8d3905eb/activityRuns"
        }));
        assert_eq!(
            runs_url(&created).unwrap().as_str(),
            "https://h:9443/dc/v1/activities/8d3905eb/activityRuns"
        );
    }

    #[test]
    fn test_missing_runs_url_is_a_fault() {
        let error = runs_url(&document(json!({"activityId": "8d3905eb"}))).unwrap_err();
        let envelope = error.envelope();
        assert_eq!(envelope.msg_id, "500");
        assert!(envelope.msg_text.contains("runsURL"));
    }

    #[test]
    fn test_non_string_runs_url_is_a_fault() {
        let error = runs_url(&document(json!({"runsURL": 42}))).unwrap_err();
        assert!(matches!(error, GatewayError::Fault(_)));
    }
}
