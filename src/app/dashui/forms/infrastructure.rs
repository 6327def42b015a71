use super::{next_button, section, show_warnings, text_row, FormOutput};
use crate::app::domain_config::InfrastructureConfig;
use eframe::egui;

const MACHINE_TYPES: &[&str] = &[
    "e2-small",
    "e2-medium",
    "e2-standard-2",
    "e2-standard-4",
    "n2-standard-2",
    "n2-standard-4",
    "n2-standard-8",
];

const KUBERNETES_VERSIONS: &[&str] = &["latest", "1.30", "1.29", "1.28"];

pub fn show(ui: &mut egui::Ui, config: &InfrastructureConfig) -> FormOutput<InfrastructureConfig> {
    let mut edited = config.clone();

    section(ui, "Cluster");
    egui::Grid::new("infra_form_cluster")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "GCP project ID", &mut edited.project_id);
            text_row(ui, "Cluster name", &mut edited.cluster_name);
            text_row(ui, "Region", &mut edited.region);

            ui.label("Zone");
            ui.horizontal(|ui| {
                let mut zonal = edited.zone.is_some();
                if ui.checkbox(&mut zonal, "Zonal cluster").changed() {
                    edited.zone = zonal.then(|| format!("{}-a", edited.region));
                }
                if let Some(zone) = &mut edited.zone {
                    ui.text_edit_singleline(zone);
                }
            });
            ui.end_row();

            ui.label("Kubernetes version");
            egui::ComboBox::from_id_salt("infra_k8s_version")
                .selected_text(&edited.kubernetes_version)
                .show_ui(ui, |ui| {
                    for version in KUBERNETES_VERSIONS {
                        ui.selectable_value(
                            &mut edited.kubernetes_version,
                            version.to_string(),
                            *version,
                        );
                    }
                });
            ui.end_row();
        });

    section(ui, "Node pool");
    let pool = &mut edited.node_pool;
    egui::Grid::new("infra_form_pool")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "Pool name", &mut pool.name);

            ui.label("Machine type");
            egui::ComboBox::from_id_salt("infra_machine_type")
                .selected_text(&pool.machine_type)
                .show_ui(ui, |ui| {
                    for machine in MACHINE_TYPES {
                        ui.selectable_value(&mut pool.machine_type, machine.to_string(), *machine);
                    }
                });
            ui.end_row();

            ui.label("Node count");
            ui.add(egui::DragValue::new(&mut pool.node_count).range(0..=100));
            ui.end_row();

            ui.label("Disk size (GB)");
            ui.add(egui::DragValue::new(&mut pool.disk_size_gb).range(10..=2000));
            ui.end_row();

            ui.label("");
            ui.checkbox(&mut pool.preemptible, "Preemptible (spot) nodes");
            ui.end_row();

            ui.label("Autoscaling");
            ui.horizontal(|ui| {
                ui.checkbox(&mut pool.autoscaling.enabled, "Enabled");
                ui.add_enabled_ui(pool.autoscaling.enabled, |ui| {
                    ui.label("min");
                    ui.add(egui::DragValue::new(&mut pool.autoscaling.min_nodes).range(0..=100));
                    ui.label("max");
                    ui.add(egui::DragValue::new(&mut pool.autoscaling.max_nodes).range(1..=100));
                });
            });
            ui.end_row();
        });

    section(ui, "Networking");
    let net = &mut edited.networking;
    egui::Grid::new("infra_form_network")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "VPC network", &mut net.network);
            text_row(ui, "Subnetwork", &mut net.subnetwork);
            text_row(ui, "Pods secondary range", &mut net.pods_range);
            text_row(ui, "Services secondary range", &mut net.services_range);

            ui.label("");
            ui.checkbox(&mut net.private_cluster, "Private cluster");
            ui.end_row();

            if net.private_cluster {
                text_row(ui, "Control plane CIDR", &mut net.master_ipv4_cidr);
            }

            ui.label("");
            ui.checkbox(&mut net.network_policy, "Enable network policy");
            ui.end_row();
        });

    ui.add_space(8.0);
    show_warnings(ui, &edited.validate());
    let next = next_button(ui, "Preview Terraform");

    FormOutput::compare(config, edited, next)
}
