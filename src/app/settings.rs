//! Console settings loaded from `settings.toml`.
//!
//! ```toml
//! api_base_url = "https://api.github.com"
//! poll_interval_secs = 10
//!
//! [workflows]
//! infrastructure = "deploy-gke.yml"
//! ```

use crate::app::domain_config::Domain;
use crate::app::preview::default_workflow_file;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const MIN_POLL_INTERVAL_SECS: u64 = 2;
pub const MAX_POLL_INTERVAL_SECS: u64 = 300;

/// Environment variable that overrides `github_token`
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowFiles {
    pub infrastructure: String,
    pub application: String,
    pub ci_pipeline: String,
}

impl Default for WorkflowFiles {
    fn default() -> Self {
        Self {
            infrastructure: default_workflow_file(Domain::Infrastructure).to_string(),
            application: default_workflow_file(Domain::Application).to_string(),
            ci_pipeline: default_workflow_file(Domain::CiPipeline).to_string(),
        }
    }
}

impl WorkflowFiles {
    pub fn for_domain(&self, domain: Domain) -> &str {
        match domain {
            Domain::Infrastructure => &self.infrastructure,
            Domain::Application => &self.application,
            Domain::CiPipeline => &self.ci_pipeline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    pub api_base_url: String,
    pub github_token: Option<String>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Polls spent looking for a freshly dispatched run before giving up
    pub run_lookup_attempts: u32,
    pub workflows: WorkflowFiles,
    /// `GITHUB_TOKEN` at startup. Never written back to the file.
    #[serde(skip)]
    pub env_token: Option<String>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            github_token: None,
            poll_interval_secs: 10,
            request_timeout_secs: 30,
            run_lookup_attempts: 6,
            workflows: WorkflowFiles::default(),
            env_token: None,
        }
    }
}

impl ConsoleSettings {
    pub fn default_path() -> Option<PathBuf> {
        crate::app::paths::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Reads settings from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings: ConsoleSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;

        // May hold a token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to restrict settings file: {:?}", path))?;
        }
        Ok(())
    }

    /// Loads settings from `path` (defaults when missing or invalid) and applies
    /// the `GITHUB_TOKEN` override.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let mut settings = match path {
            Some(path) if path.exists() => match Self::load_from_file(path) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Using default settings: {:#}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        settings.apply_token_override(std::env::var(TOKEN_ENV_VAR).ok());
        settings
    }

    pub fn apply_token_override(&mut self, token: Option<String>) {
        self.env_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    /// Token used for API calls: the environment wins over the file.
    pub fn effective_token(&self) -> Option<&str> {
        self.env_token.as_deref().or_else(|| {
            self.github_token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
        })
    }

    /// Polling interval clamped to the supported range.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.poll_interval_secs
                .clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn run_lookup_attempts(&self) -> u32 {
        self.run_lookup_attempts.max(1)
    }

    pub fn has_token(&self) -> bool {
        self.effective_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_is_clamped() {
        let mut settings = ConsoleSettings::default();
        assert_eq!(settings.poll_interval(), Duration::from_secs(10));

        settings.poll_interval_secs = 0;
        assert_eq!(settings.poll_interval(), Duration::from_secs(2));

        settings.poll_interval_secs = 86_400;
        assert_eq!(settings.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_token_override() {
        let mut settings = ConsoleSettings {
            github_token: Some("from-file".to_string()),
            ..ConsoleSettings::default()
        };
        settings.apply_token_override(Some("  ".to_string()));
        assert_eq!(settings.effective_token(), Some("from-file"));

        settings.apply_token_override(Some("ghp_env".to_string()));
        assert_eq!(settings.effective_token(), Some("ghp_env"));
        assert_eq!(settings.github_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_token_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut settings = ConsoleSettings::default();
        settings.apply_token_override(Some("ghp_from_env_only".to_string()));
        assert!(settings.has_token());

        settings.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("ghp_from_env_only"));

        let reloaded = ConsoleSettings::load_from_file(&path).unwrap();
        assert_eq!(reloaded.github_token, None);
        assert_eq!(reloaded.effective_token(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        ConsoleSettings {
            github_token: Some("ghp_typed".to_string()),
            ..ConsoleSettings::default()
        }
        .save_to_file(&path)
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: ConsoleSettings =
            toml::from_str("poll_interval_secs = 5\n[workflows]\ninfrastructure = \"infra.yml\"\n")
                .unwrap();
        assert_eq!(settings.poll_interval_secs, 5);
        assert_eq!(settings.api_base_url, "https://api.github.com");
        assert_eq!(settings.workflows.for_domain(Domain::Infrastructure), "infra.yml");
        assert_eq!(settings.workflows.for_domain(Domain::Application), "deploy-k8s.yml");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = ConsoleSettings {
            run_lookup_attempts: 3,
            ..ConsoleSettings::default()
        };
        settings.save_to_file(&path).unwrap();
        assert_eq!(ConsoleSettings::load_from_file(&path).unwrap(), settings);
    }
}
