//! Workflow files that receive the console's dispatches.
//!
//! The input names here must match [`super::workflow_inputs`]; GitHub rejects a
//! dispatch carrying inputs the workflow does not declare.

use crate::app::domain_config::Domain;

const INFRASTRUCTURE: &str = r#"# Generated by IaC Dash. Receives deployments dispatched from the console.
name: Deploy GKE cluster

on:
  workflow_dispatch:
    inputs:
      clusterName:
        description: Cluster name
        required: true
      projectId:
        description: GCP project
        required: true
      region:
        description: Cluster region
        required: true
      terraform:
        description: Rendered main.tf
        required: true

concurrency:
  group: deploy-gke-${{ inputs.clusterName }}
  cancel-in-progress: false

jobs:
  deploy:
    name: Terraform apply
    runs-on: ubuntu-latest
    permissions:
      contents: read
      id-token: write
    steps:
      - name: Checkout
        uses: actions/checkout@v4

      - name: Authenticate to Google Cloud
        uses: google-github-actions/auth@v2
        with:
          workload_identity_provider: ${{ secrets.GCP_WORKLOAD_IDENTITY_PROVIDER }}
          service_account: ${{ secrets.GCP_SERVICE_ACCOUNT }}

      - name: Set up Terraform
        uses: hashicorp/setup-terraform@v3

      - name: Write configuration
        env:
          MAIN_TF: ${{ inputs.terraform }}
        run: |
          mkdir -p infra
          printf '%s\n' "$MAIN_TF" > infra/main.tf

      - name: Apply
        working-directory: infra
        run: |
          terraform init -input=false
          terraform apply -input=false -auto-approve
"#;

const APPLICATION: &str = r#"# Generated by IaC Dash. Receives deployments dispatched from the console.
name: Deploy Kubernetes application

on:
  workflow_dispatch:
    inputs:
      clusterName:
        description: Target cluster
        required: true
      clusterLocation:
        description: Cluster region or zone
        required: true
      namespace:
        description: Namespace
        required: true
      appName:
        description: Application name
        required: true
      manifests:
        description: Rendered manifests
        required: true

concurrency:
  group: deploy-app-${{ inputs.namespace }}-${{ inputs.appName }}
  cancel-in-progress: false

jobs:
  deploy:
    name: kubectl apply
    runs-on: ubuntu-latest
    permissions:
      contents: read
      id-token: write
    steps:
      - name: Authenticate to Google Cloud
        uses: google-github-actions/auth@v2
        with:
          workload_identity_provider: ${{ secrets.GCP_WORKLOAD_IDENTITY_PROVIDER }}
          service_account: ${{ secrets.GCP_SERVICE_ACCOUNT }}

      - name: Get cluster credentials
        uses: google-github-actions/get-gke-credentials@v2
        with:
          cluster_name: ${{ inputs.clusterName }}
          location: ${{ inputs.clusterLocation }}

      - name: Apply manifests
        env:
          MANIFESTS: ${{ inputs.manifests }}
        run: |
          printf '%s\n' "$MANIFESTS" > manifests.yaml
          kubectl apply -f manifests.yaml

      - name: Wait for rollout
        run: kubectl rollout status "deployment/${{ inputs.appName }}" -n "${{ inputs.namespace }}" --timeout=300s
"#;

/// The dispatch-receiving workflow for a domain. The CI pipeline dispatches its
/// own generated workflow, so it has none.
pub fn render(domain: Domain) -> Option<&'static str> {
    match domain {
        Domain::Infrastructure => Some(INFRASTRUCTURE),
        Domain::Application => Some(APPLICATION),
        Domain::CiPipeline => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain_config::{ApplicationConfig, DomainConfig, InfrastructureConfig};
    use crate::app::preview::workflow_inputs;

    fn declared_inputs(workflow: &str) -> Vec<String> {
        let doc: serde_yaml::Value = serde_yaml::from_str(workflow).unwrap();
        let mut names: Vec<String> = doc["on"]["workflow_dispatch"]["inputs"]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_declared_inputs_match_dispatched_inputs() {
        let infra = DomainConfig::Infrastructure(InfrastructureConfig::default());
        let sent: Vec<String> = workflow_inputs(&infra).into_keys().collect();
        assert_eq!(declared_inputs(render(Domain::Infrastructure).unwrap()), sent);

        let app = DomainConfig::Application(ApplicationConfig::default());
        let sent: Vec<String> = workflow_inputs(&app).into_keys().collect();
        assert_eq!(declared_inputs(render(Domain::Application).unwrap()), sent);
    }

    #[test]
    fn test_ci_has_no_dispatch_workflow() {
        assert!(render(Domain::CiPipeline).is_none());
    }
}
