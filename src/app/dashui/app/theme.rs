//! Theme management

use super::{DashApp, ThemeChoice};
use eframe::egui;

impl DashApp {
    /// Apply the selected theme to the UI context
    pub(super) fn apply_theme(&self, ctx: &egui::Context) {
        match self.theme {
            ThemeChoice::Latte => catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE),
            ThemeChoice::Frappe => catppuccin_egui::set_theme(ctx, catppuccin_egui::FRAPPE),
            ThemeChoice::Macchiato => catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO),
            ThemeChoice::Mocha => catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA),
        }

        // Square-ish windows
        let mut style = (*ctx.style()).clone();
        style.visuals.window_corner_radius = egui::CornerRadius::same(2);
        ctx.set_style(style);
    }

    pub(super) fn set_theme(&mut self, ctx: &egui::Context, theme: ThemeChoice) {
        if self.theme != theme {
            tracing::info!("Theme changed to {}", theme);
            self.theme = theme;
            self.apply_theme(ctx);
        }
    }
}
