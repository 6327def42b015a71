//! Editor for `settings.toml`.

use crate::app::settings::{ConsoleSettings, MAX_POLL_INTERVAL_SECS, MIN_POLL_INTERVAL_SECS};
use eframe::egui;
use egui::RichText;

#[derive(Default)]
pub struct SettingsWindow {
    pub open: bool,
    draft: ConsoleSettings,
    token: String,
}

impl SettingsWindow {
    /// Resets the draft to the given settings.
    pub fn reset(&mut self, settings: &ConsoleSettings) {
        self.draft = settings.clone();
        self.token = settings.github_token.clone().unwrap_or_default();
    }

    /// Shows the window. Returns the new settings when the user saves.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ConsoleSettings> {
        if !self.open {
            return None;
        }
        let mut open = self.open;
        let mut saved = None;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(460.0)
            .show(ctx, |ui| {
                ui.label(RichText::new("GitHub").strong());
                egui::Grid::new("settings_github")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("API base URL");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.draft.api_base_url)
                                .desired_width(280.0),
                        );
                        ui.end_row();

                        ui.label("Token");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.token)
                                .password(true)
                                .hint_text("or set GITHUB_TOKEN")
                                .desired_width(280.0),
                        );
                        ui.end_row();

                        if self.draft.env_token.is_some() {
                            ui.label("");
                            ui.weak("GITHUB_TOKEN is set and takes precedence");
                            ui.end_row();
                        }

                        ui.label("Request timeout (s)");
                        ui.add(
                            egui::DragValue::new(&mut self.draft.request_timeout_secs)
                                .range(1..=300),
                        );
                        ui.end_row();
                    });

                ui.add_space(6.0);
                ui.label(RichText::new("Run polling").strong());
                egui::Grid::new("settings_polling")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Interval (s)");
                        ui.add(
                            egui::DragValue::new(&mut self.draft.poll_interval_secs)
                                .range(MIN_POLL_INTERVAL_SECS..=MAX_POLL_INTERVAL_SECS),
                        );
                        ui.end_row();

                        ui.label("Run lookup attempts");
                        ui.add(
                            egui::DragValue::new(&mut self.draft.run_lookup_attempts).range(1..=60),
                        );
                        ui.end_row();
                    });

                ui.add_space(6.0);
                ui.label(RichText::new("Workflow files").strong());
                egui::Grid::new("settings_workflows")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        let workflows = &mut self.draft.workflows;
                        ui.label("Infrastructure");
                        ui.text_edit_singleline(&mut workflows.infrastructure);
                        ui.end_row();
                        ui.label("Applications");
                        ui.text_edit_singleline(&mut workflows.application);
                        ui.end_row();
                        ui.label("CI/CD Pipeline");
                        ui.text_edit_singleline(&mut workflows.ci_pipeline);
                        ui.end_row();
                    });

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let token = self.token.trim();
                        self.draft.github_token = (!token.is_empty()).then(|| token.to_string());
                        saved = Some(self.draft.clone());
                    }
                    if ui.button("Reset to defaults").clicked() {
                        self.reset(&ConsoleSettings {
                            env_token: self.draft.env_token.clone(),
                            ..ConsoleSettings::default()
                        });
                    }
                });
            });

        self.open = open && saved.is_none();
        saved
    }
}
