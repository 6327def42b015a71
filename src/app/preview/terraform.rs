//! Terraform (HCL) generation for a GKE cluster and its node pool.
//!
//! Attributes inside a block are aligned on `=` the way `terraform fmt` does,
//! so the generated file can be committed without a formatting diff.

use crate::app::domain_config::InfrastructureConfig;

const HEADER: &str =
    "# Generated by IaC Dash. Manual edits are overwritten on the next render.";

/// Right-hand side of an HCL attribute.
#[derive(Debug, Clone)]
enum HclValue {
    Str(String),
    /// Emitted verbatim (references, expressions)
    Expr(String),
    Bool(bool),
    Num(u64),
    StrList(Vec<String>),
}

impl HclValue {
    fn render(&self) -> String {
        match self {
            HclValue::Str(s) => quote(s),
            HclValue::Expr(e) => e.clone(),
            HclValue::Bool(b) => b.to_string(),
            HclValue::Num(n) => n.to_string(),
            HclValue::StrList(items) => {
                let quoted: Vec<String> = items.iter().map(|i| quote(i)).collect();
                format!("[{}]", quoted.join(", "))
            }
        }
    }
}

/// Quotes a string literal, escaping interpolation and template sequences.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

struct HclWriter {
    out: String,
    depth: usize,
}

impl HclWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Writes a run of attributes with their `=` signs aligned.
    fn attributes(&mut self, attrs: &[(&str, HclValue)]) {
        let width = attrs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in attrs {
            let line = format!("{:<width$} = {}", key, value.render(), width = width);
            self.line(&line);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders `main.tf` for the given infrastructure configuration.
pub fn render(config: &InfrastructureConfig) -> String {
    let mut w = HclWriter::new();
    let location = config.location().to_string();
    let networking = &config.networking;
    let pool = &config.node_pool;

    w.line(HEADER);
    w.blank();

    w.open("terraform");
    w.attributes(&[("required_version", HclValue::Str(">= 1.5.0".to_string()))]);
    w.blank();
    w.open("required_providers");
    w.open("google =");
    w.attributes(&[
        ("source", HclValue::Str("hashicorp/google".to_string())),
        ("version", HclValue::Str("~> 5.0".to_string())),
    ]);
    w.close();
    w.close();
    w.close();
    w.blank();

    w.open("provider \"google\"");
    w.attributes(&[
        ("project", HclValue::Str(config.project_id.clone())),
        ("region", HclValue::Str(config.region.clone())),
    ]);
    w.close();
    w.blank();

    w.open("resource \"google_container_cluster\" \"primary\"");
    w.attributes(&[
        ("name", HclValue::Str(config.cluster_name.clone())),
        ("location", HclValue::Str(location.clone())),
    ]);
    w.blank();
    w.line("# The default pool is replaced by the managed node pool below");
    w.attributes(&[
        ("remove_default_node_pool", HclValue::Bool(true)),
        ("initial_node_count", HclValue::Num(1)),
    ]);
    w.blank();
    let mut cluster_attrs = vec![
        ("network", HclValue::Str(networking.network.clone())),
        ("subnetwork", HclValue::Str(networking.subnetwork.clone())),
    ];
    let version = config.kubernetes_version.trim();
    if !version.is_empty() && version != "latest" {
        cluster_attrs.push(("min_master_version", HclValue::Str(version.to_string())));
    }
    w.attributes(&cluster_attrs);
    w.blank();

    let mut ip_attrs = Vec::new();
    if !networking.pods_range.trim().is_empty() {
        ip_attrs.push((
            "cluster_secondary_range_name",
            HclValue::Str(networking.pods_range.trim().to_string()),
        ));
    }
    if !networking.services_range.trim().is_empty() {
        ip_attrs.push((
            "services_secondary_range_name",
            HclValue::Str(networking.services_range.trim().to_string()),
        ));
    }
    if ip_attrs.is_empty() {
        w.line("ip_allocation_policy {}");
    } else {
        w.open("ip_allocation_policy");
        w.attributes(&ip_attrs);
        w.close();
    }

    if networking.private_cluster {
        w.blank();
        w.open("private_cluster_config");
        w.attributes(&[
            ("enable_private_nodes", HclValue::Bool(true)),
            ("enable_private_endpoint", HclValue::Bool(false)),
            (
                "master_ipv4_cidr_block",
                HclValue::Str(networking.master_ipv4_cidr.clone()),
            ),
        ]);
        w.close();
    }

    if networking.network_policy {
        w.blank();
        w.open("network_policy");
        w.attributes(&[
            ("enabled", HclValue::Bool(true)),
            ("provider", HclValue::Str("CALICO".to_string())),
        ]);
        w.close();
    }
    w.close();
    w.blank();

    w.open("resource \"google_container_node_pool\" \"primary_nodes\"");
    let count_key = if pool.autoscaling.enabled {
        "initial_node_count"
    } else {
        "node_count"
    };
    w.attributes(&[
        ("name", HclValue::Str(pool.name.clone())),
        ("location", HclValue::Str(location)),
        (
            "cluster",
            HclValue::Expr("google_container_cluster.primary.name".to_string()),
        ),
        (count_key, HclValue::Num(u64::from(pool.node_count))),
    ]);
    w.blank();

    if pool.autoscaling.enabled {
        w.open("autoscaling");
        w.attributes(&[
            (
                "min_node_count",
                HclValue::Num(u64::from(pool.autoscaling.min_nodes)),
            ),
            (
                "max_node_count",
                HclValue::Num(u64::from(pool.autoscaling.max_nodes)),
            ),
        ]);
        w.close();
        w.blank();
    }

    w.open("management");
    w.attributes(&[
        ("auto_repair", HclValue::Bool(true)),
        ("auto_upgrade", HclValue::Bool(true)),
    ]);
    w.close();
    w.blank();

    w.open("node_config");
    w.attributes(&[
        ("machine_type", HclValue::Str(pool.machine_type.clone())),
        ("disk_size_gb", HclValue::Num(u64::from(pool.disk_size_gb))),
        ("preemptible", HclValue::Bool(pool.preemptible)),
        (
            "oauth_scopes",
            HclValue::StrList(vec![
                "https://www.googleapis.com/auth/cloud-platform".to_string()
            ]),
        ),
    ]);
    w.close();
    w.close();
    w.blank();

    w.open("output \"cluster_name\"");
    w.attributes(&[(
        "value",
        HclValue::Expr("google_container_cluster.primary.name".to_string()),
    )]);
    w.close();
    w.blank();

    w.open("output \"cluster_location\"");
    w.attributes(&[(
        "value",
        HclValue::Expr("google_container_cluster.primary.location".to_string()),
    )]);
    w.close();
    w.blank();

    w.open("output \"cluster_endpoint\"");
    w.attributes(&[
        (
            "value",
            HclValue::Expr("google_container_cluster.primary.endpoint".to_string()),
        ),
        ("sensitive", HclValue::Bool(true)),
    ]);
    w.close();

    w.finish()
}
