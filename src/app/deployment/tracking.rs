//! Append-only deployment history.
//!
//! One JSON object per line in `deployments.jsonl`. Records are never updated
//! or deleted; a record's `status` is the status at trigger time.

use crate::app::domain_config::{Domain, DomainConfig};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Kinds of deployment that are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentType {
    Infrastructure,
    Application,
}

impl DeploymentType {
    /// CI pipeline dispatches are not deployments and have no type.
    pub fn from_domain(domain: Domain) -> Option<Self> {
        match domain {
            Domain::Infrastructure => Some(DeploymentType::Infrastructure),
            Domain::Application => Some(DeploymentType::Application),
            Domain::CiPipeline => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeploymentType::Infrastructure => "Infrastructure",
            DeploymentType::Application => "Application",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: Uuid,
    pub deployment_type: DeploymentType,
    pub project_name: String,
    /// Configuration exactly as dispatched
    pub configuration: serde_json::Value,
    pub status: String,
    /// `owner/repo`
    pub github_repo: String,
    pub workflow_url: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl DeploymentRecord {
    /// Builds the `pending` record for a dispatched configuration.
    pub fn pending(
        config: &DomainConfig,
        github_repo: String,
        workflow_url: String,
    ) -> Result<Option<Self>> {
        let Some(deployment_type) = DeploymentType::from_domain(config.domain()) else {
            return Ok(None);
        };
        let configuration = match config {
            DomainConfig::Infrastructure(c) => serde_json::to_value(c),
            DomainConfig::Application(c) => serde_json::to_value(c),
            DomainConfig::CiPipeline(c) => serde_json::to_value(c),
        }
        .context("Failed to snapshot configuration")?;
        let notes = match deployment_type {
            DeploymentType::Infrastructure => "GKE cluster deployment via IaC Dash",
            DeploymentType::Application => "Application deployment via IaC Dash",
        };

        Ok(Some(Self {
            id: Uuid::new_v4(),
            deployment_type,
            project_name: config.project_name().to_string(),
            configuration,
            status: "pending".to_string(),
            github_repo,
            workflow_url,
            notes: notes.to_string(),
            created_at: Utc::now(),
        }))
    }
}

/// The history file.
#[derive(Debug, Clone)]
pub struct DeploymentHistory {
    path: PathBuf,
}

impl DeploymentHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir() -> Option<Self> {
        crate::app::paths::data_dir().map(|dir| Self::new(dir.join("deployments.jsonl")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single line while holding an exclusive lock.
    pub fn append(&self, record: &DeploymentRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history directory: {:?}", parent))?;
        }
        let mut line =
            serde_json::to_string(record).context("Failed to serialize deployment record")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {:?}", self.path))?;
        file.lock_exclusive()
            .context("Failed to acquire history lock")?;
        let written = file
            .write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to append to history file: {:?}", self.path));
        if let Err(e) = FileExt::unlock(&file) {
            warn!("Failed to release history lock: {}", e);
        }
        written?;

        info!(
            "Recorded {} deployment {} for {}",
            record.deployment_type.label(),
            record.id,
            record.project_name
        );
        Ok(())
    }

    /// All records in append order. Unparseable lines are skipped.
    pub fn load_all(&self) -> Result<Vec<DeploymentRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path)
            .with_context(|| format!("Failed to open history file: {:?}", self.path))?;
        FileExt::lock_shared(&file).context("Failed to acquire history lock")?;

        // Bytes, not lines: one line of invalid UTF-8 must not hide the rest.
        let mut records = Vec::new();
        for (index, line) in BufReader::new(&file).split(b'\n').enumerate() {
            let line = line
                .with_context(|| format!("Failed to read history file: {:?}", self.path))?;
            if line.trim_ascii().is_empty() {
                continue;
            }
            match serde_json::from_slice::<DeploymentRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping history line {}: {}", index + 1, e),
            }
        }
        if let Err(e) = FileExt::unlock(&file) {
            warn!("Failed to release history lock: {}", e);
        }
        debug!("Loaded {} deployment records", records.len());
        Ok(records)
    }
}
