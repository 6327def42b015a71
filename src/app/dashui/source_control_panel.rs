//! GitHub repository link and deploy trigger, shared by all domains.

use crate::app::domain_config::{Domain, SourceControlLink};
use crate::app::preview::dispatch_workflow;
use eframe::egui;
use egui::{Color32, RichText};

/// What the user did on the panel this frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceControlOutput {
    /// Edited link, present only when it differs from the input
    pub link: Option<SourceControlLink>,
    pub deploy: bool,
}

pub struct SourceControlView<'a> {
    pub domain: Domain,
    pub link: &'a SourceControlLink,
    pub workflow_file: &'a str,
    /// A run of this domain is already being followed
    pub deploying: bool,
    pub error: Option<&'a str>,
}

fn deploy_label(domain: Domain) -> &'static str {
    match domain {
        Domain::Infrastructure => "🚀 Deploy Cluster",
        Domain::Application => "🚀 Deploy Application",
        Domain::CiPipeline => "▶ Run Pipeline",
    }
}

pub fn show(ui: &mut egui::Ui, view: SourceControlView<'_>) -> SourceControlOutput {
    let mut edited = view.link.clone();

    ui.label(RichText::new("GitHub repository").strong().size(15.0));
    ui.separator();
    egui::Grid::new(("source_control_grid", view.domain))
        .num_columns(2)
        .spacing([10.0, 8.0])
        .show(ui, |ui| {
            ui.label("Owner");
            ui.add(
                egui::TextEdit::singleline(&mut edited.owner)
                    .hint_text("organization or user")
                    .desired_width(260.0),
            );
            ui.end_row();

            ui.label("Repository");
            ui.add(egui::TextEdit::singleline(&mut edited.repo).desired_width(260.0));
            ui.end_row();

            ui.label("Branch");
            ui.add(
                egui::TextEdit::singleline(&mut edited.branch)
                    .hint_text("main")
                    .desired_width(260.0),
            );
            ui.end_row();

            ui.label("Workflow");
            ui.monospace(format!(".github/workflows/{}", view.workflow_file));
            ui.end_row();
        });

    if edited.is_complete() {
        ui.hyperlink_to(format!("Open {}", edited.full_name()), edited.html_url());
    }

    ui.add_space(8.0);
    match dispatch_workflow::render(view.domain) {
        Some(template) => {
            egui::CollapsingHeader::new("Workflow file to commit")
                .id_salt(("dispatch_template", view.domain))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.weak(format!(
                            "Commit this as .github/workflows/{} before deploying.",
                            view.workflow_file
                        ));
                        if ui.small_button("📋 Copy").clicked() {
                            ui.ctx().copy_text(template.to_string());
                        }
                    });
                    egui::ScrollArea::vertical()
                        .id_salt(("dispatch_template_scroll", view.domain))
                        .max_height(240.0)
                        .show(ui, |ui| {
                            ui.monospace(template);
                        });
                });
        }
        None => {
            ui.weak(format!(
                "Commit the previewed pipeline as .github/workflows/{}; it is dispatched as-is.",
                view.workflow_file
            ));
        }
    }

    if let Some(error) = view.error {
        ui.add_space(6.0);
        ui.colored_label(Color32::from_rgb(220, 50, 50), format!("✗ {}", error));
    }

    ui.add_space(10.0);
    let can_deploy = edited.is_complete() && !view.deploying;
    let response = ui.add_enabled(
        can_deploy,
        egui::Button::new(RichText::new(deploy_label(view.domain)).size(15.0)),
    );
    let response = if !edited.is_complete() {
        response.on_disabled_hover_text("Enter an owner and a repository first")
    } else if view.deploying {
        response.on_disabled_hover_text("A deployment is already in progress")
    } else {
        response
    };

    SourceControlOutput {
        deploy: response.clicked(),
        link: (edited != *view.link).then_some(edited),
    }
}
