//! Run status of a domain's most recent deployment.

use crate::app::deployment::{RunState, RunStatus};
use crate::app::domain_config::{Domain, SourceControlLink};
use crate::app::github::workflow_page_url;
use chrono::{DateTime, Local, Utc};
use eframe::egui;
use egui::{Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPanelAction {
    None,
    Redeploy,
    EditConfiguration,
}

pub fn state_color(state: &RunState) -> Color32 {
    match state {
        RunState::Idle => Color32::from_rgb(128, 128, 128),
        RunState::Deploying => Color32::from_rgb(70, 130, 220),
        RunState::Success => Color32::from_rgb(40, 167, 69),
        RunState::Error(_) => Color32::from_rgb(220, 50, 50),
    }
}

pub fn state_icon(state: &RunState) -> &'static str {
    match state {
        RunState::Idle => "○",
        RunState::Deploying => "⟳",
        RunState::Success => "✓",
        RunState::Error(_) => "✗",
    }
}

pub(crate) fn format_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Icon and text for a status, with a spinner while deploying.
pub fn status_badge(ui: &mut egui::Ui, status: &RunStatus) {
    ui.horizontal(|ui| {
        if status.state.is_active() {
            ui.add(egui::Spinner::new().size(14.0));
        } else {
            ui.colored_label(state_color(&status.state), state_icon(&status.state));
        }
        let text = match (&status.state, &status.github_status) {
            (RunState::Deploying, Some(github_status)) => {
                format!("Deploying ({})", github_status.replace('_', " "))
            }
            (state, _) => state.description().to_string(),
        };
        ui.colored_label(state_color(&status.state), RichText::new(text).strong());
    });
}

pub fn show(
    ui: &mut egui::Ui,
    domain: Domain,
    status: &RunStatus,
    link: &SourceControlLink,
    workflow_file: &str,
) -> StatusPanelAction {
    let mut action = StatusPanelAction::None;

    ui.label(RichText::new("Workflow run").strong().size(15.0));
    ui.separator();
    status_badge(ui, status);
    ui.add_space(6.0);

    egui::Grid::new(("workflow_status_grid", domain))
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, |ui| {
            ui.label("Repository");
            if link.is_complete() {
                ui.label(format!("{}@{}", link.full_name(), link.git_ref()));
            } else {
                ui.weak("not linked");
            }
            ui.end_row();

            ui.label("Workflow");
            ui.monospace(workflow_file);
            ui.end_row();

            if let Some(run) = &status.run {
                ui.label("Run");
                ui.hyperlink_to(format!("#{}", run.id), &run.html_url);
                ui.end_row();
            }
            if let Some(started) = &status.started_at {
                ui.label("Triggered");
                ui.label(format_time(started));
                ui.end_row();
            }
            if let Some(polled) = &status.last_polled {
                ui.label("Last checked");
                ui.label(format_time(polled));
                ui.end_row();
            }
            if let Some(finished) = &status.finished_at {
                ui.label("Finished");
                ui.label(format_time(finished));
                ui.end_row();
            }
        });

    if let Some(message) = status.error_message() {
        ui.add_space(6.0);
        ui.group(|ui| {
            ui.colored_label(state_color(&status.state), RichText::new("Error").strong());
            ui.label(message);
        });
    }

    if status.state == RunState::Idle {
        ui.add_space(6.0);
        ui.weak("Nothing deployed yet. Trigger a deployment from the GitHub Integration step.");
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if link.is_complete() && ui.button("Open workflow runs").clicked() {
            let url = workflow_page_url(link, workflow_file);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open {}: {}", url, e);
            }
        }

        let again = match domain {
            Domain::CiPipeline => "▶ Run pipeline again",
            _ => "🚀 Deploy again",
        };
        if ui
            .add_enabled(
                link.is_complete() && !status.state.is_active(),
                egui::Button::new(again),
            )
            .clicked()
        {
            action = StatusPanelAction::Redeploy;
        }
        if ui.button("Edit configuration").clicked() {
            action = StatusPanelAction::EditConfiguration;
        }
    });

    action
}
