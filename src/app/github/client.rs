use super::types::{ApiErrorBody, DispatchRequest, WorkflowRun, WorkflowRunsPage};
use super::WorkflowApi;
use crate::app::domain_config::SourceControlLink;
use crate::app::settings::ConsoleSettings;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_VERSION: &str = "2022-11-28";

/// GitHub REST client for Actions workflows.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {}", base_url);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("GitHub token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("iacdash/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            settings.effective_token(),
            settings.request_timeout(),
        )
    }

    fn endpoint(&self, link: &SourceControlLink, tail: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["repos", link.owner.trim(), link.repo.trim()])
            .extend(tail);
        Ok(url)
    }

    /// Turns a non-success response into an error carrying the status and GitHub's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|err| err.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        bail!("GitHub API error {}: {}", status.as_u16(), message)
    }
}

#[async_trait]
impl WorkflowApi for GitHubClient {
    async fn dispatch_workflow(
        &self,
        link: &SourceControlLink,
        workflow_file: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()> {
        let url = self.endpoint(link, &["actions", "workflows", workflow_file, "dispatches"])?;
        let body = DispatchRequest {
            git_ref: link.git_ref(),
            inputs,
        };
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to dispatch {} on {}", workflow_file, link.full_name()))?;
        Self::ensure_success(response).await?;
        info!(
            "Dispatched {} on {}@{}",
            workflow_file,
            link.full_name(),
            link.git_ref()
        );
        Ok(())
    }

    async fn latest_dispatched_run(
        &self,
        link: &SourceControlLink,
        workflow_file: &str,
    ) -> Result<Option<WorkflowRun>> {
        let url = self.endpoint(link, &["actions", "workflows", workflow_file, "runs"])?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(&[
                ("branch", link.git_ref()),
                ("event", "workflow_dispatch"),
                ("per_page", "1"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to list runs of {}", workflow_file))?;
        let page: WorkflowRunsPage = Self::ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse workflow runs")?;
        Ok(page.workflow_runs.into_iter().next())
    }

    async fn get_run(&self, link: &SourceControlLink, run_id: u64) -> Result<WorkflowRun> {
        let url = self.endpoint(link, &["actions", "runs", &run_id.to_string()])?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch run {}", run_id))?;
        Self::ensure_success(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse run {}", run_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let client =
            GitHubClient::new("https://ghe.example.com/api/v3/", None, Duration::from_secs(5))
                .unwrap();
        let link = SourceControlLink::new("acme", "infra");
        let url = client
            .endpoint(&link, &["actions", "workflows", "deploy-gke.yml", "dispatches"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/acme/infra/actions/workflows/deploy-gke.yml/dispatches"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(GitHubClient::new("not a url", None, Duration::from_secs(5)).is_err());
        assert!(GitHubClient::new("mailto:me@example.com", None, Duration::from_secs(5)).is_err());
    }
}
