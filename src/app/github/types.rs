use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST .../actions/workflows/{file}/dispatches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    pub inputs: &'a BTreeMap<String, String>,
}

/// The subset of a GitHub Actions run the console reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub html_url: String,
    /// `queued`, `in_progress`, `completed`, ...
    pub status: String,
    /// `success`, `failure`, `cancelled`, ... once completed
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunsPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Error body returned by the GitHub REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}
