use super::{next_button, section, show_warnings, text_row, FormOutput};
use crate::app::domain_config::{CiConfig, RegistryKind, TagStrategy};
use eframe::egui;

pub fn show(ui: &mut egui::Ui, config: &CiConfig) -> FormOutput<CiConfig> {
    let mut edited = config.clone();

    section(ui, "Build");
    egui::Grid::new("ci_form_build")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            text_row(ui, "Image name", &mut edited.app_name);
            text_row(ui, "Build context", &mut edited.build_context);
            text_row(ui, "Dockerfile", &mut edited.dockerfile);

            ui.label("Tag strategy");
            egui::ComboBox::from_id_salt("ci_tag_strategy")
                .selected_text(edited.tag_strategy.label())
                .show_ui(ui, |ui| {
                    for strategy in TagStrategy::ALL {
                        ui.selectable_value(&mut edited.tag_strategy, strategy, strategy.label());
                    }
                });
            ui.end_row();
        });

    section(ui, "Registry");
    let registry = &mut edited.registry;
    egui::Grid::new("ci_form_registry")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            ui.label("Registry");
            egui::ComboBox::from_id_salt("ci_registry_kind")
                .selected_text(registry.kind.label())
                .show_ui(ui, |ui| {
                    for kind in RegistryKind::ALL {
                        ui.selectable_value(&mut registry.kind, kind, kind.label());
                    }
                });
            ui.end_row();

            let owner_label = match registry.kind {
                RegistryKind::Gcr | RegistryKind::ArtifactRegistry => "GCP project",
                RegistryKind::DockerHub | RegistryKind::Ghcr => "Account",
            };
            text_row(ui, owner_label, &mut registry.host_project);
            if registry.kind == RegistryKind::ArtifactRegistry {
                text_row(ui, "Repository", &mut registry.repository);
                text_row(ui, "Location", &mut registry.region);
            }

            ui.label("Image");
            ui.monospace(registry.image_name(&edited.app_name));
            ui.end_row();
        });

    section(ui, "Triggers");
    let mut remove = None;
    for (index, branch) in edited.trigger_branches.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.label("Push to");
            ui.add(egui::TextEdit::singleline(branch).desired_width(200.0));
            if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                remove = Some(index);
            }
        });
    }
    if let Some(index) = remove {
        edited.trigger_branches.remove(index);
    }
    if ui.button("➕ Add branch").clicked() {
        edited.trigger_branches.push(String::new());
    }

    section(ui, "Steps");
    let steps = &mut edited.steps;
    egui::Grid::new("ci_form_steps")
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            ui.checkbox(&mut steps.run_tests, "Run tests");
            ui.add_enabled(
                steps.run_tests,
                egui::TextEdit::singleline(&mut steps.test_command).desired_width(220.0),
            );
            ui.end_row();

            ui.checkbox(&mut steps.lint, "Lint");
            ui.add_enabled(
                steps.lint,
                egui::TextEdit::singleline(&mut steps.lint_command).desired_width(220.0),
            );
            ui.end_row();

            ui.checkbox(&mut steps.security_scan, "Scan image (Trivy)");
            ui.label("");
            ui.end_row();

            ui.checkbox(&mut steps.push_on_pull_request, "Push images for pull requests");
            ui.label("");
            ui.end_row();
        });

    ui.add_space(8.0);
    show_warnings(ui, &edited.validate());
    let next = next_button(ui, "Preview Workflow");

    FormOutput::compare(config, edited, next)
}
