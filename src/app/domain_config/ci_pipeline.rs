use serde::{Deserialize, Serialize};

/// Container build pipeline parameters collected by the CI form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    pub app_name: String,
    pub build_context: String,
    pub dockerfile: String,
    pub registry: RegistryTarget,
    pub trigger_branches: Vec<String>,
    pub steps: PipelineSteps,
    pub tag_strategy: TagStrategy,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            app_name: "my-app".to_string(),
            build_context: ".".to_string(),
            dockerfile: "Dockerfile".to_string(),
            registry: RegistryTarget::default(),
            trigger_branches: vec!["main".to_string()],
            steps: PipelineSteps::default(),
            tag_strategy: TagStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Gcr,
    #[default]
    ArtifactRegistry,
    DockerHub,
    Ghcr,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 4] = [
        RegistryKind::Gcr,
        RegistryKind::ArtifactRegistry,
        RegistryKind::DockerHub,
        RegistryKind::Ghcr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RegistryKind::Gcr => "Google Container Registry",
            RegistryKind::ArtifactRegistry => "Artifact Registry",
            RegistryKind::DockerHub => "Docker Hub",
            RegistryKind::Ghcr => "GitHub Container Registry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryTarget {
    pub kind: RegistryKind,
    /// GCP project for Google registries, account or org for the others
    pub host_project: String,
    pub repository: String,
    /// Artifact Registry location
    pub region: String,
}

impl Default for RegistryTarget {
    fn default() -> Self {
        Self {
            kind: RegistryKind::ArtifactRegistry,
            host_project: "my-gcp-project".to_string(),
            repository: "containers".to_string(),
            region: "us-central1".to_string(),
        }
    }
}

impl RegistryTarget {
    /// Registry hostname used by `docker login`.
    pub fn host(&self) -> String {
        match self.kind {
            RegistryKind::Gcr => "gcr.io".to_string(),
            RegistryKind::ArtifactRegistry => format!("{}-docker.pkg.dev", self.region),
            RegistryKind::DockerHub => "docker.io".to_string(),
            RegistryKind::Ghcr => "ghcr.io".to_string(),
        }
    }

    /// Fully qualified image name without a tag.
    pub fn image_name(&self, app_name: &str) -> String {
        match self.kind {
            RegistryKind::Gcr => format!("gcr.io/{}/{}", self.host_project, app_name),
            RegistryKind::ArtifactRegistry => format!(
                "{}/{}/{}/{}",
                self.host(),
                self.host_project,
                self.repository,
                app_name
            ),
            RegistryKind::DockerHub => format!("docker.io/{}/{}", self.host_project, app_name),
            RegistryKind::Ghcr => format!("ghcr.io/{}/{}", self.host_project, app_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSteps {
    pub run_tests: bool,
    pub test_command: String,
    pub lint: bool,
    pub lint_command: String,
    pub security_scan: bool,
    pub push_on_pull_request: bool,
}

impl Default for PipelineSteps {
    fn default() -> Self {
        Self {
            run_tests: true,
            test_command: "make test".to_string(),
            lint: false,
            lint_command: "make lint".to_string(),
            security_scan: false,
            push_on_pull_request: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStrategy {
    #[default]
    CommitSha,
    Semver,
    Latest,
}

impl TagStrategy {
    pub const ALL: [TagStrategy; 3] = [TagStrategy::CommitSha, TagStrategy::Semver, TagStrategy::Latest];

    pub fn label(&self) -> &'static str {
        match self {
            TagStrategy::CommitSha => "Commit SHA",
            TagStrategy::Semver => "Git tag (semver)",
            TagStrategy::Latest => "latest",
        }
    }
}

impl CiConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.app_name.trim().is_empty() {
            warnings.push("Image name is empty".to_string());
        }
        if self.trigger_branches.iter().all(|b| b.trim().is_empty()) {
            warnings.push("No trigger branches; the pipeline only runs manually".to_string());
        }
        if self.registry.host_project.trim().is_empty() {
            warnings.push("Registry project/account is empty".to_string());
        }
        if self.registry.kind == RegistryKind::ArtifactRegistry
            && self.registry.repository.trim().is_empty()
        {
            warnings.push("Artifact Registry needs a repository name".to_string());
        }
        if self.steps.run_tests && self.steps.test_command.trim().is_empty() {
            warnings.push("Tests are enabled but the test command is empty".to_string());
        }
        if self.steps.lint && self.steps.lint_command.trim().is_empty() {
            warnings.push("Linting is enabled but the lint command is empty".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_names_per_registry() {
        let mut registry = RegistryTarget::default();
        assert_eq!(
            registry.image_name("api"),
            "us-central1-docker.pkg.dev/my-gcp-project/containers/api"
        );

        registry.kind = RegistryKind::Gcr;
        assert_eq!(registry.image_name("api"), "gcr.io/my-gcp-project/api");

        registry.kind = RegistryKind::Ghcr;
        registry.host_project = "acme".to_string();
        assert_eq!(registry.image_name("api"), "ghcr.io/acme/api");
        assert_eq!(registry.host(), "ghcr.io");
    }

    #[test]
    fn test_validate() {
        assert!(CiConfig::default().validate().is_empty());

        let mut config = CiConfig::default();
        config.trigger_branches = vec![String::new()];
        config.steps.test_command.clear();
        assert_eq!(config.validate().len(), 2);
    }
}
