use crate::app::dashui::app::ThemeChoice;
use crate::app::wizard::DeploymentMode;
use eframe::egui;
use egui::{Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    None,
    ThemeChanged(ThemeChoice),
    SelectMode(DeploymentMode),
    OpenSettings,
    Quit,
}

pub fn build_menu(
    ui: &mut egui::Ui,
    theme: ThemeChoice,
    mode: DeploymentMode,
    has_token: bool,
) -> MenuAction {
    let mut menu_action = MenuAction::None;

    ui.menu_button("IaC Dash", |ui| {
        if ui.button("Settings…").clicked() {
            menu_action = MenuAction::OpenSettings;
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            menu_action = MenuAction::Quit;
        }
    });

    ui.menu_button(RichText::new("🎨").size(18.0), |ui| {
        for choice in ThemeChoice::ALL {
            if ui
                .selectable_label(theme == choice, choice.to_string())
                .clicked()
            {
                menu_action = MenuAction::ThemeChanged(choice);
            }
        }
    });

    ui.separator();

    // Deployment mode toggle
    for (choice, label) in [
        (DeploymentMode::Infrastructure, "☁ Infrastructure"),
        (DeploymentMode::Application, "📦 Application"),
    ] {
        if ui.selectable_label(mode == choice, label).clicked() {
            menu_action = MenuAction::SelectMode(choice);
        }
    }

    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        if has_token {
            ui.colored_label(Color32::from_rgb(40, 167, 69), "GitHub ✓");
        } else {
            ui.colored_label(Color32::from_rgb(230, 160, 40), "GitHub: no token")
                .on_hover_text("Set github_token in settings or the GITHUB_TOKEN variable");
        }
    });

    menu_action
}
