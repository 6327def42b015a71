//! Configuration forms, one per domain.
//!
//! A form never mutates the configuration it is given. It edits a clone and
//! hands the clone back in [`FormOutput::changed`] when anything differs, so
//! every edit goes through the wizard reducer.

pub mod application;
pub mod ci_pipeline;
pub mod infrastructure;

use eframe::egui;
use egui::{Color32, RichText};

/// What the user did on a form this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FormOutput<T> {
    /// The edited configuration, present only when it differs from the input
    pub changed: Option<T>,
    /// "Next" was clicked
    pub next: bool,
}

impl<T: PartialEq> FormOutput<T> {
    pub(crate) fn compare(original: &T, edited: T, next: bool) -> Self {
        Self {
            changed: (edited != *original).then_some(edited),
            next,
        }
    }
}

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

/// Validation warnings above the "Next" button. They never block navigation.
pub(crate) fn show_warnings(ui: &mut egui::Ui, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    ui.group(|ui| {
        ui.label(
            RichText::new(format!("⚠ {} warning(s)", warnings.len()))
                .color(WARNING_COLOR)
                .strong(),
        );
        for warning in warnings {
            ui.colored_label(WARNING_COLOR, format!("• {}", warning));
        }
    });
}

pub(crate) fn next_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.button(RichText::new(format!("{} ▶", label)).size(15.0))
                .clicked()
        })
        .inner
    })
    .inner
}

pub(crate) fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(260.0));
    ui.end_row();
}

pub(crate) fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(title).strong().size(15.0));
    ui.separator();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain_config::InfrastructureConfig;
    use egui_kittest::kittest::Queryable;
    use egui_kittest::Harness;

    #[test]
    fn test_unchanged_form_reports_nothing() {
        let config = InfrastructureConfig::default();
        let output = FormOutput::compare(&config, config.clone(), false);
        assert!(output.changed.is_none());

        let mut edited = config.clone();
        edited.node_pool.node_count = 7;
        let output = FormOutput::compare(&config, edited.clone(), true);
        assert_eq!(output.changed, Some(edited));
        assert!(output.next);
    }

    #[test]
    fn test_invalid_config_shows_warnings_but_next_stays_enabled() {
        let mut config = InfrastructureConfig::default();
        config.cluster_name = "Not_Valid".to_string();

        let mut harness = Harness::builder()
            .with_size(egui::vec2(900.0, 1600.0))
            .build_ui_state(
                |ui, clicked: &mut bool| {
                    let output = infrastructure::show(ui, &config);
                    *clicked |= output.next;
                },
                false,
            );
        harness.run();
        assert!(harness.query_by_label("⚠ 1 warning(s)").is_some());

        harness.get_by_label("Preview Terraform ▶").click();
        harness.run();
        assert!(*harness.state());
    }
}
