//! Overview of every domain's run status and the latest recorded deployments.

use super::workflow_status_panel::{format_time, status_badge};
use crate::app::deployment::DeploymentRecord;
use crate::app::domain_config::Domain;
use crate::app::wizard::{step_label, ConsoleTab, WizardState};
use eframe::egui;
use egui::RichText;

/// Records shown under "Recent deployments"
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    OpenTab(ConsoleTab),
}

pub fn show(ui: &mut egui::Ui, wizard: &WizardState, deployments: &[DeploymentRecord]) -> DashboardAction {
    let mut action = DashboardAction::None;

    ui.heading("Dashboard");
    ui.weak(ConsoleTab::Dashboard.description());
    ui.add_space(10.0);

    ui.columns(Domain::ALL.len(), |columns| {
        for (ui, domain) in columns.iter_mut().zip(Domain::ALL) {
            let config = wizard.config(domain);
            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(domain.label()).strong().size(15.0));
                ui.label(RichText::new(config.project_name()).monospace());
                ui.weak(format!("Step: {}", step_label(domain, wizard.step(domain))));
                status_badge(ui, wizard.run_status(domain));
                if let Some(run) = &wizard.run_status(domain).run {
                    ui.hyperlink_to(format!("Run #{}", run.id), &run.html_url);
                }
                if ui.button("Open").clicked() {
                    action = DashboardAction::OpenTab(ConsoleTab::for_domain(domain));
                }
            });
        }
    });

    ui.add_space(16.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Recent deployments").strong().size(15.0));
        if ui.small_button("View all").clicked() {
            action = DashboardAction::OpenTab(ConsoleTab::History);
        }
    });
    ui.separator();

    if deployments.is_empty() {
        ui.weak("No deployments recorded yet.");
    }
    for record in deployments.iter().take(RECENT_LIMIT) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(record.deployment_type.label()).strong());
            ui.label(&record.project_name);
            ui.weak(&record.github_repo);
            ui.weak(format_time(&record.created_at));
            ui.hyperlink_to("workflow", &record.workflow_url);
        });
    }

    action
}
