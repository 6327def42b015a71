//! Pure renderers turning domain configuration into deployable text.
//!
//! Every renderer is deterministic: the same configuration always yields
//! byte-identical output.

pub mod ci_workflow;
pub mod dispatch_workflow;
pub mod k8s_manifest;
pub mod syntax;
pub mod terraform;

use crate::app::domain_config::{Domain, DomainConfig};
use std::collections::BTreeMap;

/// A rendered file as shown on a preview step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub title: &'static str,
    /// Suggested file name when saving the preview to disk
    pub file_name: &'static str,
    pub content: String,
}

/// Renders the preview for a domain's configuration.
pub fn render(config: &DomainConfig) -> PreviewDocument {
    match config {
        DomainConfig::Infrastructure(infra) => PreviewDocument {
            title: "Terraform configuration",
            file_name: "main.tf",
            content: terraform::render(infra),
        },
        DomainConfig::Application(app) => PreviewDocument {
            title: "Kubernetes manifests",
            file_name: "manifests.yaml",
            content: k8s_manifest::render(app),
        },
        DomainConfig::CiPipeline(ci) => PreviewDocument {
            title: "GitHub Actions pipeline",
            file_name: "ci-pipeline.yml",
            content: ci_workflow::render(ci),
        },
    }
}

/// Default workflow file each domain dispatches.
pub fn default_workflow_file(domain: Domain) -> &'static str {
    match domain {
        Domain::Infrastructure => "deploy-gke.yml",
        Domain::Application => "deploy-k8s.yml",
        Domain::CiPipeline => "ci-pipeline.yml",
    }
}

/// Inputs sent with a `workflow_dispatch` for the given configuration.
///
/// The CI pipeline is itself the dispatched workflow and takes no inputs.
pub fn workflow_inputs(config: &DomainConfig) -> BTreeMap<String, String> {
    let mut inputs = BTreeMap::new();
    match config {
        DomainConfig::Infrastructure(infra) => {
            inputs.insert("clusterName".to_string(), infra.cluster_name.clone());
            inputs.insert("projectId".to_string(), infra.project_id.clone());
            inputs.insert("region".to_string(), infra.location().to_string());
            inputs.insert("terraform".to_string(), terraform::render(infra));
        }
        DomainConfig::Application(app) => {
            inputs.insert("clusterName".to_string(), app.cluster_name.clone());
            inputs.insert("clusterLocation".to_string(), app.cluster_location.clone());
            inputs.insert("namespace".to_string(), app.namespace.clone());
            inputs.insert("appName".to_string(), app.app_name.clone());
            inputs.insert("manifests".to_string(), k8s_manifest::render(app));
        }
        DomainConfig::CiPipeline(_) => {}
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain_config::{CiConfig, InfrastructureConfig};

    #[test]
    fn test_workflow_inputs_for_infrastructure() {
        let mut infra = InfrastructureConfig::default();
        infra.cluster_name = "prod-gke-1".to_string();
        infra.zone = Some("us-central1-a".to_string());

        let inputs = workflow_inputs(&DomainConfig::Infrastructure(infra.clone()));
        assert_eq!(inputs["clusterName"], "prod-gke-1");
        assert_eq!(inputs["region"], "us-central1-a");
        assert_eq!(inputs["terraform"], terraform::render(&infra));
    }

    #[test]
    fn test_ci_pipeline_has_no_inputs() {
        let inputs = workflow_inputs(&DomainConfig::CiPipeline(CiConfig::default()));
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_preview_file_names() {
        let doc = render(&DomainConfig::CiPipeline(CiConfig::default()));
        assert_eq!(doc.file_name, default_workflow_file(Domain::CiPipeline));
        assert!(doc.content.starts_with("# Generated by IaC Dash"));
    }
}
