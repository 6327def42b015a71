//! Typed configuration records for the three wizard domains.
//!
//! Each domain owns exactly one record type. The tagged [`DomainConfig`] enum is
//! used wherever a value must travel without knowing its domain up front
//! (saved configurations, deployment snapshots, workflow inputs).

pub mod application;
pub mod ci_pipeline;
pub mod infrastructure;
pub mod source_control;

pub use application::{
    ApplicationConfig, AutoscalingPolicy, EnvVar, IngressConfig, ResourceLimits, ServiceConfig,
    ServiceType,
};
pub use ci_pipeline::{CiConfig, PipelineSteps, RegistryKind, RegistryTarget, TagStrategy};
pub use infrastructure::{
    InfrastructureConfig, NetworkingConfig, NodePoolAutoscaling, NodePoolConfig,
};
pub use source_control::SourceControlLink;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One of the three independent wizard flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Infrastructure,
    Application,
    CiPipeline,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Infrastructure, Domain::Application, Domain::CiPipeline];

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Infrastructure => "Infrastructure",
            Domain::Application => "Applications",
            Domain::CiPipeline => "CI/CD Pipeline",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Infrastructure => write!(f, "infrastructure"),
            Domain::Application => write!(f, "application"),
            Domain::CiPipeline => write!(f, "ci_pipeline"),
        }
    }
}

/// A configuration record tagged with its domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "config", rename_all = "snake_case")]
pub enum DomainConfig {
    Infrastructure(InfrastructureConfig),
    Application(ApplicationConfig),
    CiPipeline(CiConfig),
}

impl DomainConfig {
    pub fn domain(&self) -> Domain {
        match self {
            DomainConfig::Infrastructure(_) => Domain::Infrastructure,
            DomainConfig::Application(_) => Domain::Application,
            DomainConfig::CiPipeline(_) => Domain::CiPipeline,
        }
    }

    /// Name used for deployment records and saved-configuration listings.
    pub fn project_name(&self) -> &str {
        match self {
            DomainConfig::Infrastructure(config) => &config.cluster_name,
            DomainConfig::Application(config) => &config.cluster_name,
            DomainConfig::CiPipeline(config) => &config.app_name,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        match self {
            DomainConfig::Infrastructure(config) => config.validate(),
            DomainConfig::Application(config) => config.validate(),
            DomainConfig::CiPipeline(config) => config.validate(),
        }
    }
}

static RESOURCE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("resource name pattern is valid")
});

/// Checks a value against the lowercase DNS-label rules shared by GKE
/// clusters, node pools and Kubernetes object names.
pub(crate) fn check_resource_name(field: &str, value: &str, max_len: usize) -> Option<String> {
    if value.is_empty() {
        Some(format!("{} is empty", field))
    } else if value.len() > max_len {
        Some(format!("{} must be at most {} characters", field, max_len))
    } else if !RESOURCE_NAME.is_match(value) {
        Some(format!(
            "{} must start with a letter and contain only lowercase letters, digits and '-'",
            field
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_rules() {
        assert!(check_resource_name("Cluster name", "prod-gke-1", 40).is_none());
        assert!(check_resource_name("Cluster name", "", 40).is_some());
        assert!(check_resource_name("Cluster name", "Prod", 40).is_some());
        assert!(check_resource_name("Cluster name", "prod-", 40).is_some());
        assert!(check_resource_name("Cluster name", "1prod", 40).is_some());
        assert!(check_resource_name("Cluster name", &"a".repeat(41), 40).is_some());
    }

    #[test]
    fn test_domain_config_tagging() {
        let config = DomainConfig::Infrastructure(InfrastructureConfig::default());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["domain"], "infrastructure");
        assert_eq!(json["config"]["cluster_name"], "my-gke-cluster");

        let back: DomainConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.domain(), Domain::Infrastructure);
        assert_eq!(back.project_name(), "my-gke-cluster");
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::Infrastructure.to_string(), "infrastructure");
        assert_eq!(Domain::CiPipeline.to_string(), "ci_pipeline");
        assert_eq!(Domain::Application.label(), "Applications");
    }
}
