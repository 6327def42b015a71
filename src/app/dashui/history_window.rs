//! Deployment history table.

use super::workflow_status_panel::format_time;
use crate::app::deployment::{DeploymentRecord, DeploymentType};
use eframe::egui;
use egui::RichText;
use egui_extras::{Column, TableBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    None,
    Refresh,
}

#[derive(Default)]
pub struct HistoryView {
    type_filter: Option<DeploymentType>,
    search: String,
    selected: Option<Uuid>,
}

/// Records matching the type filter and a case-insensitive search over
/// project and repository names. Keeps the input order.
pub fn filter_records<'a>(
    records: &'a [DeploymentRecord],
    type_filter: Option<DeploymentType>,
    search: &str,
) -> Vec<&'a DeploymentRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| type_filter.map_or(true, |t| record.deployment_type == t))
        .filter(|record| {
            needle.is_empty()
                || record.project_name.to_lowercase().contains(&needle)
                || record.github_repo.to_lowercase().contains(&needle)
        })
        .collect()
}

impl HistoryView {
    pub fn show(&mut self, ui: &mut egui::Ui, records: &[DeploymentRecord]) -> HistoryAction {
        let mut action = HistoryAction::None;

        ui.heading("Deployment History");
        ui.horizontal(|ui| {
            ui.label("Type");
            egui::ComboBox::from_id_salt("history_type_filter")
                .selected_text(self.type_filter.map_or("All", |t| t.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.type_filter, None, "All");
                    for kind in [DeploymentType::Infrastructure, DeploymentType::Application] {
                        ui.selectable_value(&mut self.type_filter, Some(kind), kind.label());
                    }
                });
            ui.label("Search");
            ui.add(egui::TextEdit::singleline(&mut self.search).desired_width(200.0));
            if ui.button("⟳ Refresh").clicked() {
                action = HistoryAction::Refresh;
            }
        });
        ui.separator();

        let visible = filter_records(records, self.type_filter, &self.search);
        if visible.is_empty() {
            ui.weak("No deployments recorded yet.");
            return action;
        }

        let table_height = (ui.available_height() * 0.55).max(160.0);
        TableBuilder::new(ui)
            .id_salt("history_table")
            .striped(true)
            .resizable(true)
            .sense(egui::Sense::click())
            .max_scroll_height(table_height)
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(70.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Created", "Type", "Project", "Repository", "Status", "Workflow"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for record in &visible {
                    body.row(20.0, |mut row| {
                        row.set_selected(self.selected == Some(record.id));
                        row.col(|ui| {
                            ui.label(format_time(&record.created_at));
                        });
                        row.col(|ui| {
                            ui.label(record.deployment_type.label());
                        });
                        row.col(|ui| {
                            ui.label(&record.project_name);
                        });
                        row.col(|ui| {
                            ui.label(&record.github_repo);
                        });
                        row.col(|ui| {
                            ui.label(&record.status);
                        });
                        row.col(|ui| {
                            ui.hyperlink_to("open", &record.workflow_url);
                        });
                        if row.response().clicked() {
                            self.selected = if self.selected == Some(record.id) {
                                None
                            } else {
                                Some(record.id)
                            };
                        }
                    });
                }
            });

        if let Some(record) = self
            .selected
            .and_then(|id| records.iter().find(|record| record.id == id))
        {
            ui.separator();
            ui.label(RichText::new(format!("{} ({})", record.project_name, record.id)).strong());
            ui.weak(&record.notes);
            let json = serde_json::to_string_pretty(&record.configuration)
                .unwrap_or_else(|_| record.configuration.to_string());
            egui::ScrollArea::vertical()
                .id_salt("history_configuration")
                .show(ui, |ui| {
                    ui.monospace(json);
                });
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain_config::{ApplicationConfig, DomainConfig, InfrastructureConfig};

    fn record(config: DomainConfig, repo: &str) -> DeploymentRecord {
        DeploymentRecord::pending(&config, repo.to_string(), String::new())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_filter_by_type_and_search() {
        let mut infra = InfrastructureConfig::default();
        infra.cluster_name = "prod-gke-1".to_string();
        let records = vec![
            record(DomainConfig::Infrastructure(infra), "acme/infra"),
            record(DomainConfig::Application(ApplicationConfig::default()), "acme/apps"),
        ];

        assert_eq!(filter_records(&records, None, "").len(), 2);
        let apps = filter_records(&records, Some(DeploymentType::Application), "");
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].github_repo, "acme/apps");
        let found = filter_records(&records, None, "PROD-gke");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].project_name, "prod-gke-1");
        assert!(filter_records(&records, None, "nothing").is_empty());
    }
}
