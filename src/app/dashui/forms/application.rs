use super::{next_button, section, show_warnings, text_row, FormOutput};
use crate::app::domain_config::{ApplicationConfig, EnvVar, ServiceType};
use eframe::egui;

pub fn show(ui: &mut egui::Ui, config: &ApplicationConfig) -> FormOutput<ApplicationConfig> {
    let mut edited = config.clone();

    section(ui, "Target cluster");
    egui::Grid::new("app_form_target")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "Cluster name", &mut edited.cluster_name);
            text_row(ui, "Cluster location", &mut edited.cluster_location);
            text_row(ui, "Namespace", &mut edited.namespace);
        });

    section(ui, "Workload");
    egui::Grid::new("app_form_workload")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "Application name", &mut edited.app_name);
            text_row(ui, "Image", &mut edited.image);
            text_row(ui, "Image tag", &mut edited.image_tag);

            ui.label("Replicas");
            ui.add(egui::DragValue::new(&mut edited.replicas).range(0..=100));
            ui.end_row();

            ui.label("Container port");
            ui.add(egui::DragValue::new(&mut edited.container_port).range(0..=65535));
            ui.end_row();

            let resources = &mut edited.resources;
            text_row(ui, "CPU request", &mut resources.cpu_request);
            text_row(ui, "Memory request", &mut resources.memory_request);
            text_row(ui, "CPU limit", &mut resources.cpu_limit);
            text_row(ui, "Memory limit", &mut resources.memory_limit);
        });

    section(ui, "Exposure");
    egui::Grid::new("app_form_exposure")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            ui.label("Service type");
            egui::ComboBox::from_id_salt("app_service_type")
                .selected_text(edited.service.service_type.as_str())
                .show_ui(ui, |ui| {
                    for kind in ServiceType::ALL {
                        ui.selectable_value(&mut edited.service.service_type, kind, kind.as_str());
                    }
                });
            ui.end_row();

            ui.label("Service port");
            ui.add(egui::DragValue::new(&mut edited.service.port).range(1..=65535));
            ui.end_row();

            ui.label("");
            ui.checkbox(&mut edited.ingress.enabled, "Create ingress");
            ui.end_row();

            if edited.ingress.enabled {
                text_row(ui, "Ingress host", &mut edited.ingress.host);
                text_row(ui, "Ingress path", &mut edited.ingress.path);
            }
        });

    section(ui, "Autoscaling");
    let hpa = &mut edited.autoscaling;
    ui.horizontal(|ui| {
        ui.checkbox(&mut hpa.enabled, "Horizontal pod autoscaler");
        ui.add_enabled_ui(hpa.enabled, |ui| {
            ui.label("min");
            ui.add(egui::DragValue::new(&mut hpa.min_replicas).range(1..=100));
            ui.label("max");
            ui.add(egui::DragValue::new(&mut hpa.max_replicas).range(1..=500));
            ui.label("target CPU %");
            ui.add(egui::DragValue::new(&mut hpa.target_cpu_percent).range(1..=100));
        });
    });

    section(ui, "Environment");
    let mut remove = None;
    for (index, var) in edited.env.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut var.name)
                    .hint_text("NAME")
                    .desired_width(160.0),
            );
            ui.label("=");
            ui.add(
                egui::TextEdit::singleline(&mut var.value)
                    .hint_text("value")
                    .desired_width(220.0),
            );
            if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        edited.env.remove(index);
    }
    if ui.button("➕ Add variable").clicked() {
        edited.env.push(EnvVar::default());
    }

    ui.add_space(8.0);
    show_warnings(ui, &edited.validate());
    let next = next_button(ui, "Preview Manifests");

    FormOutput::compare(config, edited, next)
}
