use super::check_resource_name;
use serde::{Deserialize, Serialize};

/// Kubernetes workload parameters collected by the application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Cluster the manifests are applied to
    pub cluster_name: String,
    /// Region or zone of the target cluster, used for credentials lookup
    pub cluster_location: String,
    pub namespace: String,
    pub app_name: String,
    pub image: String,
    pub image_tag: String,
    pub replicas: u32,
    pub container_port: u16,
    pub service: ServiceConfig,
    pub ingress: IngressConfig,
    pub resources: ResourceLimits,
    pub env: Vec<EnvVar>,
    pub autoscaling: AutoscalingPolicy,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            cluster_name: "my-gke-cluster".to_string(),
            cluster_location: "us-central1".to_string(),
            namespace: "default".to_string(),
            app_name: "my-app".to_string(),
            image: "nginx".to_string(),
            image_tag: "latest".to_string(),
            replicas: 2,
            container_port: 80,
            service: ServiceConfig::default(),
            ingress: IngressConfig::default(),
            resources: ResourceLimits::default(),
            env: Vec::new(),
            autoscaling: AutoscalingPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceType {
    #[default]
    ClusterIP,
    NodePort,
    LoadBalancer,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::ClusterIP,
        ServiceType::NodePort,
        ServiceType::LoadBalancer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIP => "ClusterIP",
            ServiceType::NodePort => "NodePort",
            ServiceType::LoadBalancer => "LoadBalancer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub service_type: ServiceType,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_type: ServiceType::ClusterIP,
            port: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressConfig {
    pub enabled: bool,
    pub host: String,
    pub path: String,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            path: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub cpu_request: String,
    pub memory_request: String,
    pub cpu_limit: String,
    pub memory_limit: String,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_request: "100m".to_string(),
            memory_request: "128Mi".to_string(),
            cpu_limit: "500m".to_string(),
            memory_limit: "512Mi".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoscalingPolicy {
    pub enabled: bool,
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub target_cpu_percent: u32,
}

impl Default for AutoscalingPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            min_replicas: 2,
            max_replicas: 10,
            target_cpu_percent: 70,
        }
    }
}

impl ApplicationConfig {
    /// Full image reference, `image:tag`, tag omitted when blank.
    pub fn image_reference(&self) -> String {
        let tag = self.image_tag.trim();
        if tag.is_empty() {
            self.image.clone()
        } else {
            format!("{}:{}", self.image, tag)
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        warnings.extend(check_resource_name("Application name", &self.app_name, 63));
        warnings.extend(check_resource_name("Namespace", &self.namespace, 63));
        if self.cluster_name.trim().is_empty() {
            warnings.push("Target cluster is empty".to_string());
        }
        if self.image.trim().is_empty() {
            warnings.push("Container image is empty".to_string());
        }
        if self.container_port == 0 {
            warnings.push("Container port must be set".to_string());
        }
        if self.ingress.enabled && self.ingress.host.trim().is_empty() {
            warnings.push("Ingress is enabled but has no host".to_string());
        }
        if self.autoscaling.enabled && self.autoscaling.min_replicas > self.autoscaling.max_replicas
        {
            warnings.push("Autoscaling minimum is larger than maximum".to_string());
        }
        for (index, var) in self.env.iter().enumerate() {
            if var.name.trim().is_empty() {
                warnings.push(format!("Environment variable #{} has no name", index + 1));
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_reference() {
        let mut config = ApplicationConfig::default();
        assert_eq!(config.image_reference(), "nginx:latest");

        config.image = "gcr.io/acme/api".to_string();
        config.image_tag = " ".to_string();
        assert_eq!(config.image_reference(), "gcr.io/acme/api");
    }

    #[test]
    fn test_validate() {
        assert!(ApplicationConfig::default().validate().is_empty());

        let mut config = ApplicationConfig::default();
        config.ingress.enabled = true;
        config.env.push(EnvVar::default());
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_service_type_serializes_as_kubernetes_name() {
        let json = serde_json::to_string(&ServiceType::LoadBalancer).unwrap();
        assert_eq!(json, "\"LoadBalancer\"");
    }
}
