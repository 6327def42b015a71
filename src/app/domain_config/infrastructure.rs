use super::check_resource_name;
use serde::{Deserialize, Serialize};

/// GKE cluster parameters collected by the infrastructure form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureConfig {
    pub project_id: String,
    pub cluster_name: String,
    pub region: String,
    /// Zonal cluster when set, regional otherwise
    pub zone: Option<String>,
    pub kubernetes_version: String,
    pub node_pool: NodePoolConfig,
    pub networking: NetworkingConfig,
}

impl Default for InfrastructureConfig {
    fn default() -> Self {
        Self {
            project_id: "my-gcp-project".to_string(),
            cluster_name: "my-gke-cluster".to_string(),
            region: "us-central1".to_string(),
            zone: None,
            kubernetes_version: "latest".to_string(),
            node_pool: NodePoolConfig::default(),
            networking: NetworkingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePoolConfig {
    pub name: String,
    pub machine_type: String,
    pub node_count: u32,
    pub disk_size_gb: u32,
    pub preemptible: bool,
    pub autoscaling: NodePoolAutoscaling,
}

impl Default for NodePoolConfig {
    fn default() -> Self {
        Self {
            name: "primary-pool".to_string(),
            machine_type: "e2-medium".to_string(),
            node_count: 3,
            disk_size_gb: 100,
            preemptible: false,
            autoscaling: NodePoolAutoscaling::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePoolAutoscaling {
    pub enabled: bool,
    pub min_nodes: u32,
    pub max_nodes: u32,
}

impl Default for NodePoolAutoscaling {
    fn default() -> Self {
        Self {
            enabled: true,
            min_nodes: 1,
            max_nodes: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkingConfig {
    pub network: String,
    pub subnetwork: String,
    pub private_cluster: bool,
    pub master_ipv4_cidr: String,
    /// Secondary range name for pods; empty lets GKE allocate one
    pub pods_range: String,
    pub services_range: String,
    pub network_policy: bool,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            network: "default".to_string(),
            subnetwork: "default".to_string(),
            private_cluster: false,
            master_ipv4_cidr: "172.16.0.0/28".to_string(),
            pods_range: String::new(),
            services_range: String::new(),
            network_policy: false,
        }
    }
}

impl InfrastructureConfig {
    /// Location the cluster is created in: the zone for zonal clusters, the region otherwise.
    pub fn location(&self) -> &str {
        match &self.zone {
            Some(zone) if !zone.trim().is_empty() => zone,
            _ => &self.region,
        }
    }

    /// Non-blocking warnings shown next to the form. Navigation never depends on these.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.project_id.trim().is_empty() {
            warnings.push("GCP project ID is empty".to_string());
        }
        warnings.extend(check_resource_name("Cluster name", &self.cluster_name, 40));
        warnings.extend(check_resource_name("Node pool name", &self.node_pool.name, 40));
        if self.region.trim().is_empty() {
            warnings.push("Region is empty".to_string());
        }
        if let Some(zone) = &self.zone {
            if !zone.is_empty() && !zone.starts_with(&self.region) {
                warnings.push(format!(
                    "Zone {} is not inside region {}",
                    zone, self.region
                ));
            }
        }
        if self.node_pool.node_count == 0 {
            warnings.push("Node count must be at least 1".to_string());
        }
        let autoscaling = &self.node_pool.autoscaling;
        if autoscaling.enabled && autoscaling.min_nodes > autoscaling.max_nodes {
            warnings.push("Autoscaling minimum is larger than maximum".to_string());
        }
        if self.networking.private_cluster && self.networking.master_ipv4_cidr.trim().is_empty() {
            warnings.push("Private clusters need a control plane CIDR block".to_string());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(InfrastructureConfig::default().validate().is_empty());
    }

    #[test]
    fn test_location_prefers_zone() {
        let mut config = InfrastructureConfig::default();
        assert_eq!(config.location(), "us-central1");

        config.zone = Some("us-central1-a".to_string());
        assert_eq!(config.location(), "us-central1-a");

        config.zone = Some("  ".to_string());
        assert_eq!(config.location(), "us-central1");
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut config = InfrastructureConfig::default();
        config.cluster_name = "Prod_Cluster".to_string();
        config.node_pool.autoscaling.min_nodes = 6;
        config.zone = Some("europe-west1-b".to_string());

        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.starts_with("Cluster name")));
        assert!(warnings.iter().any(|w| w.contains("Autoscaling")));
        assert!(warnings.iter().any(|w| w.contains("europe-west1-b")));
    }

    #[test]
    fn test_missing_fields_are_defaulted() {
        let config: InfrastructureConfig =
            serde_json::from_str(r#"{"cluster_name": "prod-gke-1"}"#).unwrap();
        assert_eq!(config.cluster_name, "prod-gke-1");
        assert_eq!(config.region, "us-central1");
        assert_eq!(config.node_pool, NodePoolConfig::default());
    }
}
