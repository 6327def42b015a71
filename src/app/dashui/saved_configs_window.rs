//! Save the current configuration under a name and load saved ones back.

use super::workflow_status_panel::format_time;
use crate::app::domain_config::{Domain, DomainConfig};
use crate::app::saved_configs::{SavedConfigStore, SavedConfiguration};
use crate::app::wizard::WizardState;
use eframe::egui;
use egui::{Color32, RichText};
use tracing::warn;
use uuid::Uuid;

pub struct SavedConfigsWindow {
    domain: Domain,
    name: String,
    description: String,
    entries: Vec<SavedConfiguration>,
    loaded: bool,
    message: Option<(bool, String)>,
}

impl Default for SavedConfigsWindow {
    fn default() -> Self {
        Self {
            domain: Domain::Infrastructure,
            name: String::new(),
            description: String::new(),
            entries: Vec::new(),
            loaded: false,
            message: None,
        }
    }
}

impl SavedConfigsWindow {
    pub fn entries(&self) -> &[SavedConfiguration] {
        &self.entries
    }

    pub fn reload(&mut self, store: &SavedConfigStore) {
        match store.list() {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                warn!("Failed to list saved configurations: {:#}", e);
                self.message = Some((false, format!("{:#}", e)));
            }
        }
        self.loaded = true;
    }

    fn save_current(&mut self, store: &SavedConfigStore, config: DomainConfig) {
        match store.save(&self.name, &self.description, config) {
            Ok(entry) => {
                self.message = Some((true, format!("Saved '{}'", entry.name)));
                self.name.clear();
                self.description.clear();
                self.reload(store);
            }
            Err(e) => self.message = Some((false, format!("{:#}", e))),
        }
    }

    fn delete(&mut self, store: &SavedConfigStore, id: Uuid) {
        match store.delete(id) {
            Ok(_) => self.reload(store),
            Err(e) => self.message = Some((false, format!("{:#}", e))),
        }
    }

    /// Returns a configuration the user chose to load into the wizard.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: Option<&SavedConfigStore>,
        wizard: &WizardState,
    ) -> Option<DomainConfig> {
        ui.heading("Saved Configurations");
        let Some(store) = store else {
            ui.weak("No data directory is available; configurations cannot be saved.");
            return None;
        };
        if !self.loaded {
            self.reload(store);
        }

        let mut to_load = None;
        let mut to_delete = None;

        ui.group(|ui| {
            ui.label(RichText::new("Save current configuration").strong());
            egui::Grid::new("saved_configs_form")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Configuration");
                    egui::ComboBox::from_id_salt("saved_configs_domain")
                        .selected_text(self.domain.label())
                        .show_ui(ui, |ui| {
                            for domain in Domain::ALL {
                                ui.selectable_value(&mut self.domain, domain, domain.label());
                            }
                        });
                    ui.end_row();

                    ui.label("Name");
                    ui.text_edit_singleline(&mut self.name);
                    ui.end_row();

                    ui.label("Description");
                    ui.text_edit_singleline(&mut self.description);
                    ui.end_row();
                });
            let can_save = !self.name.trim().is_empty();
            if ui.add_enabled(can_save, egui::Button::new("💾 Save")).clicked() {
                let config = wizard.config(self.domain);
                self.save_current(store, config);
            }
        });

        if let Some((ok, message)) = &self.message {
            let color = if *ok {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::from_rgb(220, 50, 50)
            };
            ui.colored_label(color, message);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} saved", self.entries.len())).strong());
            if ui.small_button("⟳ Refresh").clicked() {
                self.loaded = false;
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("saved_configs_list")
            .show(ui, |ui| {
                for entry in &self.entries {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&entry.name).strong());
                            ui.weak(entry.domain().label());
                            ui.weak(entry.config.project_name());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("🗑 Delete").clicked() {
                                    to_delete = Some(entry.id);
                                }
                                if ui.button("Load").clicked() {
                                    to_load = Some(entry.config.clone());
                                }
                            });
                        });
                        if !entry.description.is_empty() {
                            ui.label(&entry.description);
                        }
                        ui.weak(format_time(&entry.saved_at));
                    });
                }
            });

        if let Some(id) = to_delete {
            self.delete(store, id);
        }
        if let Some(config) = &to_load {
            self.message = Some((
                true,
                format!("Loaded {} configuration", config.domain().label()),
            ));
        }
        to_load
    }
}
