// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// Environment variable carrying the service bindings of the platform.
pub const VCAP_SERVICES_ENV: &str = "VCAP_SERVICES";
pub const DEFAULT_SERVICE_NAME: &str = "DataWorks";

pub const ACTIVITIES_PATH: &str = "activities";
pub const ACTIVITY_RUNS_PATH: &str = "activityRuns";
pub const LOGS_PATH: &str = "logs";
/// Field of the activity creation response holding the runs resource URL.
pub const RUNS_URL_FIELD: &str = "runsURL";

pub const APPLICATION_JSON: &str = "application/json";

// Labels used as `msgText` when the upstream error body carries none
pub const SAVING_ACTIVITY_FAILED: &str = "SavingActivityFailed";
pub const RUN_ACTIVITY_FAILED: &str = "RunActivityFailed";
pub const GETTING_RUN_STATUS: &str = "Getting Run Status";
pub const GETTING_RUN_LOGS_FAILED: &str = "Getting Run Logs Failed";

pub const FAULT_MSG_ID: &str = "500";
pub const DEFAULT_MSG_SEVERITY: &str = "error";
