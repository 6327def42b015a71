//! GitHub Actions pipeline generation for the container build.

use crate::app::domain_config::{CiConfig, RegistryKind, TagStrategy};

const HEADER: &str =
    "# Generated by IaC Dash. Manual edits are overwritten on the next render.";

const YAML_KEYWORDS: [&str; 11] = [
    "true", "false", "yes", "no", "on", "off", "null", "y", "n", "~", "",
];

/// Emits a YAML scalar, single-quoting anything that would not round-trip as a plain string.
pub(crate) fn yaml_scalar(value: &str) -> String {
    let is_plain = !YAML_KEYWORDS.contains(&value.to_ascii_lowercase().as_str())
        && value.parse::<f64>().is_err()
        && value
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '/' || c == '.')
        && !value.ends_with(' ')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || " ._/-".contains(c));

    if is_plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

fn tag_expression(strategy: TagStrategy) -> &'static str {
    match strategy {
        TagStrategy::CommitSha => "${{ github.sha }}",
        TagStrategy::Semver => "${{ github.ref_name }}",
        TagStrategy::Latest => "latest",
    }
}

fn push_branch_list(out: &mut String, indent: &str, branches: &[String]) {
    for branch in branches {
        out.push_str(indent);
        out.push_str("- ");
        out.push_str(&yaml_scalar(branch));
        out.push('\n');
    }
}

/// Renders `.github/workflows/ci-pipeline.yml` for the given pipeline configuration.
pub fn render(config: &CiConfig) -> String {
    let branches: Vec<String> = config
        .trigger_branches
        .iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();
    let registry = &config.registry;
    let image_name = registry.image_name(config.app_name.trim());
    let tag = tag_expression(config.tag_strategy);
    let google_registry = matches!(
        registry.kind,
        RegistryKind::Gcr | RegistryKind::ArtifactRegistry
    );

    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&format!(
        "name: {}\n\n",
        yaml_scalar(&format!("Build {}", config.app_name.trim()))
    ));

    out.push_str("on:\n");
    if !branches.is_empty() || config.tag_strategy == TagStrategy::Semver {
        out.push_str("  push:\n");
        if !branches.is_empty() {
            out.push_str("    branches:\n");
            push_branch_list(&mut out, "      ", &branches);
        }
        if config.tag_strategy == TagStrategy::Semver {
            out.push_str("    tags:\n      - 'v*'\n");
        }
    }
    if !branches.is_empty() {
        out.push_str("  pull_request:\n    branches:\n");
        push_branch_list(&mut out, "      ", &branches);
    }
    out.push_str("  workflow_dispatch:\n\n");

    out.push_str("env:\n");
    out.push_str(&format!("  REGISTRY: {}\n", yaml_scalar(&registry.host())));
    out.push_str(&format!("  IMAGE_NAME: {}\n\n", yaml_scalar(&image_name)));

    out.push_str("jobs:\n  build:\n    name: Build and push image\n    runs-on: ubuntu-latest\n");
    out.push_str("    permissions:\n      contents: read\n");
    if google_registry {
        out.push_str("      id-token: write\n");
    }
    if registry.kind == RegistryKind::Ghcr {
        out.push_str("      packages: write\n");
    }
    out.push_str("    steps:\n");
    out.push_str("      - name: Checkout\n        uses: actions/checkout@v4\n");

    if config.steps.lint {
        out.push_str(&format!(
            "\n      - name: Lint\n        run: {}\n",
            yaml_scalar(config.steps.lint_command.trim())
        ));
    }
    if config.steps.run_tests {
        out.push_str(&format!(
            "\n      - name: Test\n        run: {}\n",
            yaml_scalar(config.steps.test_command.trim())
        ));
    }

    match registry.kind {
        RegistryKind::Gcr | RegistryKind::ArtifactRegistry => {
            out.push_str("\n      - name: Authenticate to Google Cloud\n");
            out.push_str("        uses: google-github-actions/auth@v2\n        with:\n");
            out.push_str(
                "          workload_identity_provider: ${{ secrets.GCP_WORKLOAD_IDENTITY_PROVIDER }}\n",
            );
            out.push_str("          service_account: ${{ secrets.GCP_SERVICE_ACCOUNT }}\n");
            out.push_str("\n      - name: Set up gcloud\n");
            out.push_str("        uses: google-github-actions/setup-gcloud@v2\n");
            out.push_str("\n      - name: Configure Docker\n");
            out.push_str("        run: gcloud auth configure-docker ${{ env.REGISTRY }} --quiet\n");
        }
        RegistryKind::DockerHub => {
            out.push_str("\n      - name: Log in to Docker Hub\n");
            out.push_str("        uses: docker/login-action@v3\n        with:\n");
            out.push_str("          username: ${{ secrets.DOCKERHUB_USERNAME }}\n");
            out.push_str("          password: ${{ secrets.DOCKERHUB_TOKEN }}\n");
        }
        RegistryKind::Ghcr => {
            out.push_str("\n      - name: Log in to GitHub Container Registry\n");
            out.push_str("        uses: docker/login-action@v3\n        with:\n");
            out.push_str("          registry: ghcr.io\n");
            out.push_str("          username: ${{ github.actor }}\n");
            out.push_str("          password: ${{ secrets.GITHUB_TOKEN }}\n");
        }
    }

    let dockerfile = if config.dockerfile.trim().is_empty() {
        "Dockerfile"
    } else {
        config.dockerfile.trim()
    };
    let context = if config.build_context.trim().is_empty() {
        "."
    } else {
        config.build_context.trim()
    };
    let build = format!(
        "docker build -f {} -t \"$IMAGE_NAME:{}\" {}",
        dockerfile, tag, context
    );
    out.push_str("\n      - name: Build image\n");
    out.push_str(&format!("        run: {}\n", yaml_scalar(&build)));

    if config.steps.security_scan {
        out.push_str("\n      - name: Scan image\n");
        out.push_str("        uses: aquasecurity/trivy-action@0.24.0\n        with:\n");
        out.push_str(&format!("          image-ref: ${{{{ env.IMAGE_NAME }}}}:{}\n", tag));
        out.push_str("          exit-code: '1'\n");
        out.push_str("          severity: CRITICAL,HIGH\n");
    }

    out.push_str("\n      - name: Push image\n");
    if !config.steps.push_on_pull_request {
        out.push_str("        if: github.event_name != 'pull_request'\n");
    }
    out.push_str(&format!("        run: docker push \"$IMAGE_NAME:{}\"\n", tag));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_scalar_quoting() {
        assert_eq!(yaml_scalar("main"), "main");
        assert_eq!(yaml_scalar("release/1.x"), "release/1.x");
        assert_eq!(yaml_scalar("make test"), "make test");
        assert_eq!(yaml_scalar("on"), "'on'");
        assert_eq!(yaml_scalar("1.0"), "'1.0'");
        assert_eq!(yaml_scalar(""), "''");
        assert_eq!(yaml_scalar("npm run test:unit"), "'npm run test:unit'");
        assert_eq!(yaml_scalar("it's"), "'it''s'");
    }

    #[test]
    fn test_default_pipeline_parses_as_yaml() {
        let rendered = render(&CiConfig::default());
        let doc: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();

        assert_eq!(doc["name"], "Build my-app");
        assert_eq!(
            doc["env"]["IMAGE_NAME"],
            "us-central1-docker.pkg.dev/my-gcp-project/containers/my-app"
        );
        let steps = doc["jobs"]["build"]["steps"].as_sequence().unwrap();
        let names: Vec<&str> = steps.iter().map(|s| s["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "Checkout",
                "Test",
                "Authenticate to Google Cloud",
                "Set up gcloud",
                "Configure Docker",
                "Build image",
                "Push image"
            ]
        );
        assert_eq!(
            steps[6]["if"],
            "github.event_name != 'pull_request'"
        );
    }

    #[test]
    fn test_semver_tags_and_ghcr_login() {
        let mut config = CiConfig::default();
        config.tag_strategy = TagStrategy::Semver;
        config.registry.kind = RegistryKind::Ghcr;
        config.registry.host_project = "acme".to_string();
        config.steps.security_scan = true;
        config.steps.push_on_pull_request = true;

        let rendered = render(&config);
        assert!(rendered.contains("    tags:\n      - 'v*'\n"));
        assert!(rendered.contains("      packages: write\n"));
        assert!(!rendered.contains("id-token"));
        assert!(rendered.contains("image-ref: ${{ env.IMAGE_NAME }}:${{ github.ref_name }}\n"));
        assert!(!rendered.contains("if: github.event_name"));
    }

    #[test]
    fn test_build_command_survives_yaml_metacharacters() {
        let mut config = CiConfig::default();
        config.dockerfile = "docker/Dockerfile #prod".to_string();
        config.build_context = "./svc: api".to_string();

        let doc: serde_yaml::Value = serde_yaml::from_str(&render(&config)).unwrap();
        let build = doc["jobs"]["build"]["steps"]
            .as_sequence()
            .unwrap()
            .iter()
            .find(|step| step["name"] == "Build image")
            .unwrap();
        assert_eq!(
            build["run"],
            "docker build -f docker/Dockerfile #prod -t \"$IMAGE_NAME:${{ github.sha }}\" ./svc: api"
        );
    }
}
