use egui_code_editor::Syntax;
use std::collections::BTreeSet;

const HCL_KEYWORDS: &[&str] = &[
    "terraform",
    "provider",
    "resource",
    "data",
    "output",
    "variable",
    "locals",
    "module",
    "true",
    "false",
    "null",
];

const HCL_TYPES: &[&str] = &[
    "google_container_cluster",
    "google_container_node_pool",
    "required_providers",
];

const HCL_SPECIAL: &[&str] = &["for_each", "count", "depends_on", "lifecycle", "sensitive"];

const YAML_KEYWORDS: &[&str] = &["true", "false", "null", "yes", "no", "on", "off"];

/// Top-level kinds of the generated manifests and GitHub Actions keys
const YAML_TYPES: &[&str] = &[
    "Namespace",
    "Deployment",
    "Service",
    "Ingress",
    "HorizontalPodAutoscaler",
    "ClusterIP",
    "NodePort",
    "LoadBalancer",
];

const YAML_SPECIAL: &[&str] = &[
    "apiVersion",
    "kind",
    "metadata",
    "spec",
    "jobs",
    "steps",
    "uses",
    "run",
    "with",
    "env",
];

/// Terraform syntax highlighter
pub fn hcl_syntax() -> Syntax {
    Syntax::new("HCL")
        .with_comment("#")
        .with_keywords(HCL_KEYWORDS.iter().copied().collect::<BTreeSet<_>>())
        .with_types(HCL_TYPES.iter().copied().collect::<BTreeSet<_>>())
        .with_special(HCL_SPECIAL.iter().copied().collect::<BTreeSet<_>>())
}

/// YAML syntax highlighter for manifests and workflow files
pub fn yaml_syntax() -> Syntax {
    Syntax::new("YAML")
        .with_comment("#")
        .with_keywords(YAML_KEYWORDS.iter().copied().collect::<BTreeSet<_>>())
        .with_types(YAML_TYPES.iter().copied().collect::<BTreeSet<_>>())
        .with_special(YAML_SPECIAL.iter().copied().collect::<BTreeSet<_>>())
}

/// Pick a highlighter from a file name.
pub fn detect_syntax(file_name: &str) -> Syntax {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".tf") || lower.ends_with(".hcl") {
        hcl_syntax()
    } else {
        yaml_syntax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_detection() {
        assert_eq!(detect_syntax("main.tf").language(), "HCL");
        assert_eq!(detect_syntax("manifests.yaml").language(), "YAML");
        assert_eq!(detect_syntax("ci-pipeline.yml").language(), "YAML");
    }
}
