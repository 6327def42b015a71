//! Window opened by clicking a notice in the status bar.

use super::{Notice, NoticeBoard};
use egui::{Context, RichText};

pub struct NoticeDetailsWindow;

impl NoticeDetailsWindow {
    pub fn show(board: &mut NoticeBoard, ctx: &Context) {
        let Some(id) = board.selected.clone() else {
            return;
        };
        let Some(notice) = board.get(&id).cloned() else {
            board.selected = None;
            return;
        };

        let mut open = true;
        let mut dismiss = false;
        let mut close = false;
        egui::Window::new(format!("{} {}", notice.icon(), notice.title))
            .id(egui::Id::new("notice_details"))
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .min_width(420.0)
            .show(ctx, |ui| {
                egui::Grid::new("notice_details_grid")
                    .num_columns(2)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Source").strong());
                        ui.label(notice.source.label());
                        ui.end_row();
                        if let Some(run) = notice.run_notice() {
                            ui.label(RichText::new("Project").strong());
                            ui.label(format!("{} ({})", run.project_name, run.domain.label()));
                            ui.end_row();
                        }
                        ui.label(RichText::new("Raised").strong());
                        ui.label(format!("{}s ago", notice.created_at.elapsed().as_secs()));
                        ui.end_row();
                    });

                ui.separator();
                ui.colored_label(notice.color(), &notice.message);
                if let Some(detail) = &notice.detail {
                    ui.label(RichText::new(detail).size(11.0).weak());
                }

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                    if notice.is_dismissible() && ui.button("Dismiss").clicked() {
                        dismiss = true;
                    }
                    if let Some(url) = notice.run_notice().and_then(|run| run.run_url.as_deref()) {
                        if ui.button("Open Run").clicked() {
                            if let Err(e) = open::that(url) {
                                tracing::warn!("Failed to open {}: {}", url, e);
                            }
                        }
                    }
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(summary(&notice));
                    }
                });
            });

        if dismiss {
            board.dismiss(&id);
        } else if close || !open {
            board.selected = None;
        }
    }
}

/// Plain-text rendering for the clipboard.
fn summary(notice: &Notice) -> String {
    let mut out = format!("{}\nSource: {}\n", notice.title, notice.source.label());
    if let Some(run) = notice.run_notice() {
        out.push_str(&format!("Project: {} ({})\n", run.project_name, run.domain.label()));
        if let Some(url) = &run.run_url {
            out.push_str(&format!("Run: {}\n", url));
        }
    }
    out.push('\n');
    out.push_str(&notice.message);
    out.push('\n');
    if let Some(detail) = &notice.detail {
        out.push_str(detail);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::deployment::{RunRef, RunStatus, StatusUpdate};
    use crate::app::domain_config::Domain;
    use crate::app::notifications::NoticeSource;
    use chrono::Utc;

    #[test]
    fn test_summary_of_run_notice_includes_run_url() {
        let mut board = NoticeBoard::new();
        let status = RunStatus::default()
            .apply(StatusUpdate::Triggered { at: Utc::now() })
            .apply(StatusUpdate::RunFound(RunRef {
                id: 42,
                html_url: "https://github.com/acme/apps/actions/runs/42".to_string(),
            }));
        board.sync_run_status(Domain::Application, "my-app", &status);

        let text = summary(board.get("run_application").unwrap());
        assert!(text.starts_with("Applications deployment\nSource: Workflow Run\n"));
        assert!(text.contains("Project: my-app (Applications)\n"));
        assert!(text.contains("Run: https://github.com/acme/apps/actions/runs/42\n"));
    }

    #[test]
    fn test_summary_of_message_includes_detail() {
        let notice = Notice::warning(
            "history",
            "Deployment not recorded",
            "permission denied",
            NoticeSource::History,
        )
        .with_detail("/data/deployments.jsonl");
        assert_eq!(
            summary(&notice),
            "Deployment not recorded\nSource: Deployment History\n\npermission denied\n/data/deployments.jsonl\n"
        );
    }
}
