//! Kubernetes manifest generation.
//!
//! Manifests are modelled as small typed structs and serialized with
//! `serde_yaml`; field order follows struct order and labels use a `BTreeMap`,
//! so the output is stable for a given configuration.

use crate::app::domain_config::ApplicationConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

type Labels = BTreeMap<String, String>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<S: Serialize> {
    api_version: &'static str,
    kind: &'static str,
    metadata: ObjectMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<S>,
}

#[derive(Serialize)]
struct ObjectMeta {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: Labels,
}

#[derive(Serialize)]
struct NoSpec {}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<u32>,
    selector: LabelSelector,
    template: PodTemplate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelSelector {
    match_labels: Labels,
}

#[derive(Serialize)]
struct PodTemplate {
    metadata: TemplateMeta,
    spec: PodSpec,
}

#[derive(Serialize)]
struct TemplateMeta {
    labels: Labels,
}

#[derive(Serialize)]
struct PodSpec {
    containers: Vec<Container>,
}

#[derive(Serialize)]
struct Container {
    name: String,
    image: String,
    ports: Vec<ContainerPort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    env: Vec<EnvEntry>,
    resources: Resources,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerPort {
    container_port: u16,
}

#[derive(Serialize)]
struct EnvEntry {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct Resources {
    requests: ResourceQuantities,
    limits: ResourceQuantities,
}

#[derive(Serialize)]
struct ResourceQuantities {
    cpu: String,
    memory: String,
}

#[derive(Serialize)]
struct ServiceSpec {
    #[serde(rename = "type")]
    service_type: &'static str,
    selector: Labels,
    ports: Vec<ServicePort>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicePort {
    port: u16,
    target_port: u16,
    protocol: &'static str,
}

#[derive(Serialize)]
struct IngressSpec {
    rules: Vec<IngressRule>,
}

#[derive(Serialize)]
struct IngressRule {
    host: String,
    http: IngressHttp,
}

#[derive(Serialize)]
struct IngressHttp {
    paths: Vec<IngressPath>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IngressPath {
    path: String,
    path_type: &'static str,
    backend: IngressBackend,
}

#[derive(Serialize)]
struct IngressBackend {
    service: BackendService,
}

#[derive(Serialize)]
struct BackendService {
    name: String,
    port: BackendPort,
}

#[derive(Serialize)]
struct BackendPort {
    number: u16,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HpaSpec {
    scale_target_ref: ScaleTargetRef,
    min_replicas: u32,
    max_replicas: u32,
    metrics: Vec<HpaMetric>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScaleTargetRef {
    api_version: &'static str,
    kind: &'static str,
    name: String,
}

#[derive(Serialize)]
struct HpaMetric {
    #[serde(rename = "type")]
    metric_type: &'static str,
    resource: MetricResource,
}

#[derive(Serialize)]
struct MetricResource {
    name: &'static str,
    target: MetricTarget,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricTarget {
    #[serde(rename = "type")]
    target_type: &'static str,
    average_utilization: u32,
}

fn app_labels(config: &ApplicationConfig) -> Labels {
    let mut labels = Labels::new();
    labels.insert("app".to_string(), config.app_name.clone());
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        "iacdash".to_string(),
    );
    labels
}

fn selector_labels(config: &ApplicationConfig) -> Labels {
    let mut labels = Labels::new();
    labels.insert("app".to_string(), config.app_name.clone());
    labels
}

fn object_meta(config: &ApplicationConfig, name: String) -> ObjectMeta {
    ObjectMeta {
        name,
        namespace: Some(config.namespace.clone()),
        labels: app_labels(config),
    }
}

/// Serializes one manifest; a failure becomes a YAML comment so the rest of the
/// preview is still shown.
fn to_document<T: Serialize>(kind: &str, manifest: &T) -> String {
    match serde_yaml::to_string(manifest) {
        Ok(yaml) => yaml,
        Err(e) => {
            warn!("Failed to serialize {} manifest: {}", kind, e);
            format!("# failed to render {}: {}\n", kind, e)
        }
    }
}

/// Renders the multi-document manifest for the given application configuration.
///
/// Emits a Namespace (unless `default`), Deployment and Service, plus an
/// Ingress and HorizontalPodAutoscaler when enabled.
pub fn render(config: &ApplicationConfig) -> String {
    let mut documents = Vec::new();

    if config.namespace != "default" && !config.namespace.trim().is_empty() {
        let namespace = Manifest::<NoSpec> {
            api_version: "v1",
            kind: "Namespace",
            metadata: ObjectMeta {
                name: config.namespace.clone(),
                namespace: None,
                labels: Labels::new(),
            },
            spec: None,
        };
        documents.push(to_document("Namespace", &namespace));
    }

    let container = Container {
        name: config.app_name.clone(),
        image: config.image_reference(),
        ports: vec![ContainerPort {
            container_port: config.container_port,
        }],
        env: config
            .env
            .iter()
            .filter(|var| !var.name.trim().is_empty())
            .map(|var| EnvEntry {
                name: var.name.trim().to_string(),
                value: var.value.clone(),
            })
            .collect(),
        resources: Resources {
            requests: ResourceQuantities {
                cpu: config.resources.cpu_request.clone(),
                memory: config.resources.memory_request.clone(),
            },
            limits: ResourceQuantities {
                cpu: config.resources.cpu_limit.clone(),
                memory: config.resources.memory_limit.clone(),
            },
        },
    };

    let deployment = Manifest {
        api_version: "apps/v1",
        kind: "Deployment",
        metadata: object_meta(config, config.app_name.clone()),
        spec: Some(DeploymentSpec {
            // The autoscaler owns the replica count when enabled
            replicas: (!config.autoscaling.enabled).then_some(config.replicas),
            selector: LabelSelector {
                match_labels: selector_labels(config),
            },
            template: PodTemplate {
                metadata: TemplateMeta {
                    labels: app_labels(config),
                },
                spec: PodSpec {
                    containers: vec![container],
                },
            },
        }),
    };
    documents.push(to_document("Deployment", &deployment));

    let service_name = format!("{}-service", config.app_name);
    let service = Manifest {
        api_version: "v1",
        kind: "Service",
        metadata: object_meta(config, service_name.clone()),
        spec: Some(ServiceSpec {
            service_type: config.service.service_type.as_str(),
            selector: selector_labels(config),
            ports: vec![ServicePort {
                port: config.service.port,
                target_port: config.container_port,
                protocol: "TCP",
            }],
        }),
    };
    documents.push(to_document("Service", &service));

    if config.ingress.enabled {
        let path = if config.ingress.path.trim().is_empty() {
            "/".to_string()
        } else {
            config.ingress.path.trim().to_string()
        };
        let ingress = Manifest {
            api_version: "networking.k8s.io/v1",
            kind: "Ingress",
            metadata: object_meta(config, format!("{}-ingress", config.app_name)),
            spec: Some(IngressSpec {
                rules: vec![IngressRule {
                    host: config.ingress.host.trim().to_string(),
                    http: IngressHttp {
                        paths: vec![IngressPath {
                            path,
                            path_type: "Prefix",
                            backend: IngressBackend {
                                service: BackendService {
                                    name: service_name,
                                    port: BackendPort {
                                        number: config.service.port,
                                    },
                                },
                            },
                        }],
                    },
                }],
            }),
        };
        documents.push(to_document("Ingress", &ingress));
    }

    if config.autoscaling.enabled {
        let hpa = Manifest {
            api_version: "autoscaling/v2",
            kind: "HorizontalPodAutoscaler",
            metadata: object_meta(config, format!("{}-hpa", config.app_name)),
            spec: Some(HpaSpec {
                scale_target_ref: ScaleTargetRef {
                    api_version: "apps/v1",
                    kind: "Deployment",
                    name: config.app_name.clone(),
                },
                min_replicas: config.autoscaling.min_replicas,
                max_replicas: config.autoscaling.max_replicas,
                metrics: vec![HpaMetric {
                    metric_type: "Resource",
                    resource: MetricResource {
                        name: "cpu",
                        target: MetricTarget {
                            target_type: "Utilization",
                            average_utilization: config.autoscaling.target_cpu_percent,
                        },
                    },
                }],
            }),
        };
        documents.push(to_document("HorizontalPodAutoscaler", &hpa));
    }

    documents.join("---\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain_config::EnvVar;

    fn documents(yaml: &str) -> Vec<serde_yaml::Value> {
        yaml.split("---\n")
            .map(|doc| serde_yaml::from_str(doc).unwrap())
            .collect()
    }

    #[test]
    fn test_default_config_renders_deployment_and_service() {
        let docs = documents(&render(&ApplicationConfig::default()));
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["kind"], "Deployment");
        assert_eq!(docs[0]["spec"]["replicas"], 2);
        assert_eq!(
            docs[0]["spec"]["template"]["spec"]["containers"][0]["image"],
            "nginx:latest"
        );
        assert_eq!(docs[1]["kind"], "Service");
        assert_eq!(docs[1]["spec"]["type"], "ClusterIP");
        assert_eq!(docs[1]["spec"]["ports"][0]["targetPort"], 80);
    }

    #[test]
    fn test_optional_documents() {
        let mut config = ApplicationConfig::default();
        config.namespace = "shop".to_string();
        config.ingress.enabled = true;
        config.ingress.host = "shop.example.com".to_string();
        config.autoscaling.enabled = true;

        let docs = documents(&render(&config));
        let kinds: Vec<&str> = docs.iter().map(|d| d["kind"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            vec![
                "Namespace",
                "Deployment",
                "Service",
                "Ingress",
                "HorizontalPodAutoscaler"
            ]
        );
        // replicas are left to the autoscaler
        assert!(docs[1]["spec"].get("replicas").is_none());
        assert_eq!(
            docs[3]["spec"]["rules"][0]["http"]["paths"][0]["backend"]["service"]["name"],
            "my-app-service"
        );
        assert_eq!(docs[4]["spec"]["maxReplicas"], 10);
    }

    #[test]
    fn test_blank_env_names_are_skipped() {
        let mut config = ApplicationConfig::default();
        config.env = vec![
            EnvVar {
                name: "RUST_LOG".to_string(),
                value: "info".to_string(),
            },
            EnvVar::default(),
        ];
        let docs = documents(&render(&config));
        let env = &docs[0]["spec"]["template"]["spec"]["containers"][0]["env"];
        assert_eq!(env.as_sequence().unwrap().len(), 1);
        assert_eq!(env[0]["name"], "RUST_LOG");
    }
}
