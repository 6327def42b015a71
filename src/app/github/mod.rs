//! GitHub Actions access: workflow dispatch and run lookup.

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{WorkflowRun, WorkflowRunsPage};

use crate::app::domain_config::SourceControlLink;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Operations the deployment controller needs from a workflow host.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Triggers `workflow_file` on the link's branch with the given inputs.
    async fn dispatch_workflow(
        &self,
        link: &SourceControlLink,
        workflow_file: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()>;

    /// Newest `workflow_dispatch` run of `workflow_file` on the link's branch.
    async fn latest_dispatched_run(
        &self,
        link: &SourceControlLink,
        workflow_file: &str,
    ) -> Result<Option<WorkflowRun>>;

    async fn get_run(&self, link: &SourceControlLink, run_id: u64) -> Result<WorkflowRun>;
}

/// Browser URL of a workflow's run list.
pub fn workflow_page_url(link: &SourceControlLink, workflow_file: &str) -> String {
    format!("{}/actions/workflows/{}", link.html_url(), workflow_file)
}
