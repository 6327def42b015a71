//! Read-only view of a rendered preview with copy and save actions.

use crate::app::preview::syntax::detect_syntax;
use crate::app::preview::PreviewDocument;
use anyhow::{Context, Result};
use eframe::egui;
use egui::{Color32, RichText};
use egui_code_editor::{CodeEditor, ColorTheme};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Writes a preview into `dir` under its suggested file name.
pub fn save_document(dir: &Path, document: &PreviewDocument) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(document.file_name);
    std::fs::write(&path, &document.content)
        .with_context(|| format!("Failed to write {:?}", path))?;
    info!("Saved {} to {:?}", document.title, path);
    Ok(path)
}

enum SaveStatus {
    Saved(PathBuf),
    Failed(String),
}

pub struct PreviewPanel {
    save_dir: String,
    status: Option<SaveStatus>,
}

impl Default for PreviewPanel {
    fn default() -> Self {
        let save_dir = std::env::current_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|_| ".".to_string());
        Self {
            save_dir,
            status: None,
        }
    }
}

impl PreviewPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, document: &PreviewDocument, dark: bool) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(document.title).strong().size(15.0));
            ui.weak(document.file_name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("📋 Copy to clipboard").clicked() {
                    ui.ctx().copy_text(document.content.clone());
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label("Save to");
            ui.add(egui::TextEdit::singleline(&mut self.save_dir).desired_width(320.0));
            if ui.button("💾 Save to file").clicked() {
                self.status = Some(match save_document(Path::new(self.save_dir.trim()), document) {
                    Ok(path) => SaveStatus::Saved(path),
                    Err(e) => {
                        warn!("Preview not saved: {:#}", e);
                        SaveStatus::Failed(format!("{:#}", e))
                    }
                });
            }
        });
        match &self.status {
            Some(SaveStatus::Saved(path)) => {
                ui.colored_label(Color32::from_rgb(40, 167, 69), format!("Saved {:?}", path));
            }
            Some(SaveStatus::Failed(message)) => {
                ui.colored_label(Color32::from_rgb(220, 50, 50), message);
            }
            None => {}
        }

        ui.separator();

        let code_theme = if dark {
            ColorTheme::GITHUB_DARK
        } else {
            ColorTheme::GITHUB_LIGHT
        };
        let available_height = (ui.available_height() - 60.0).max(200.0);
        let rows = (available_height / 20.0).max(10.0) as usize;
        // Edits are discarded; the preview always mirrors the configuration
        let mut text = document.content.clone();
        egui::ScrollArea::vertical()
            .id_salt(("preview_scroll", document.file_name))
            .max_height(available_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                CodeEditor::default()
                    .id_source(document.file_name)
                    .with_rows(rows)
                    .with_fontsize(13.0)
                    .with_theme(code_theme)
                    .with_syntax(detect_syntax(document.file_name))
                    .with_numlines(true)
                    .show(ui, &mut text);
            });
    }
}
