//! UI rendering for the top menu, tab sidebar, status bar and central panel

use super::DashApp;
use crate::app::dashui::dashboard::{self, DashboardAction};
use crate::app::dashui::forms;
use crate::app::dashui::history_window::HistoryAction;
use crate::app::dashui::menu::{self, MenuAction};
use crate::app::dashui::source_control_panel::{self, SourceControlView};
use crate::app::dashui::workflow_status_panel::{self, state_color, state_icon, StatusPanelAction};
use crate::app::domain_config::Domain;
use crate::app::notifications::details_window::NoticeDetailsWindow;
use crate::app::preview;
use crate::app::wizard::{flow, ConsoleTab, WizardAction, WizardStep};
use eframe::egui;
use egui::RichText;

impl DashApp {
    /// Render the top menu bar
    pub(super) fn render_top_menu_bar(&mut self, ctx: &egui::Context) {
        let action = egui::TopBottomPanel::top("top_panel")
            .show(ctx, |ui| {
                egui::MenuBar::new()
                    .ui(ui, |ui| {
                        menu::build_menu(
                            ui,
                            self.theme,
                            self.wizard.position.deployment_mode,
                            self.services.settings.has_token(),
                        )
                    })
                    .inner
            })
            .inner;

        match action {
            MenuAction::ThemeChanged(theme) => self.set_theme(ctx, theme),
            MenuAction::SelectMode(mode) => self.dispatch(WizardAction::SelectMode(mode)),
            MenuAction::OpenSettings => {
                self.settings_window.reset(&self.services.settings);
                self.settings_window.open = true;
            }
            MenuAction::Quit => {
                tracing::info!("Quit requested from menu");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            MenuAction::None => {}
        }
    }

    /// Render the bottom status bar with notifications and build info
    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.notices.is_empty() {
                        ui.weak("Ready");
                    }
                    self.notices.render_status_bar(ui);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.weak(format!(
                            "iacdash {} ({}@{})",
                            env!("CARGO_PKG_VERSION"),
                            env!("GIT_COMMIT"),
                            env!("GIT_BRANCH")
                        ));
                    });
                });
            });
    }

    pub(super) fn render_tab_sidebar(&mut self, ctx: &egui::Context) {
        let active = self.wizard.position.active_tab;
        let mut selected = None;

        egui::SidePanel::left("tab_sidebar")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                for tab in ConsoleTab::ALL {
                    ui.horizontal(|ui| {
                        let response = ui
                            .selectable_label(tab == active, RichText::new(tab.label()).size(15.0))
                            .on_hover_text(tab.description());
                        if response.clicked() {
                            selected = Some(tab);
                        }
                        if let Some(domain) = tab.domain() {
                            let state = &self.wizard.run_status(domain).state;
                            ui.colored_label(state_color(state), state_icon(state));
                        }
                    });
                    ui.add_space(2.0);
                }
            });

        if let Some(tab) = selected.filter(|tab| *tab != active) {
            self.dispatch(WizardAction::SelectTab(tab));
        }
    }

    /// Render the central panel with the active tab
    pub(super) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let tab = self.wizard.position.active_tab;
        egui::CentralPanel::default().show(ctx, |ui| match tab {
            ConsoleTab::Dashboard => self.render_dashboard(ui),
            ConsoleTab::History => self.render_history(ui),
            ConsoleTab::SavedConfigs => self.render_saved_configs(ui),
            ConsoleTab::Infrastructure | ConsoleTab::Applications | ConsoleTab::CiPipeline => {
                if let Some(domain) = tab.domain() {
                    self.render_wizard(ui, domain);
                }
            }
        });
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        let action = dashboard::show(ui, &self.wizard, &self.recent_deployments);
        if let DashboardAction::OpenTab(tab) = action {
            self.dispatch(WizardAction::SelectTab(tab));
        }
    }

    fn render_history(&mut self, ui: &mut egui::Ui) {
        if self.history_view.show(ui, &self.recent_deployments) == HistoryAction::Refresh {
            self.refresh_recent_deployments();
        }
    }

    fn render_saved_configs(&mut self, ui: &mut egui::Ui) {
        let loaded = self.saved_configs_window.show(
            ui,
            self.services.saved_configs.as_ref(),
            &self.wizard,
        );
        if let Some(config) = loaded {
            self.dispatch(WizardAction::LoadSaved(config));
        }
    }

    fn render_wizard(&mut self, ui: &mut egui::Ui, domain: Domain) {
        let tab = ConsoleTab::for_domain(domain);
        let current = self.wizard.step(domain);

        ui.heading(tab.label());
        ui.weak(tab.description());
        ui.add_space(4.0);

        // Step breadcrumbs
        let mut jump = None;
        ui.horizontal(|ui| {
            for (index, info) in flow(domain).iter().enumerate() {
                if index > 0 {
                    ui.weak("›");
                }
                let label = format!("{}. {}", index + 1, info.label);
                if ui.selectable_label(info.step == current, label).clicked() {
                    jump = Some(info.step);
                }
            }
        });
        ui.separator();
        if let Some(step) = jump.filter(|step| *step != current) {
            self.dispatch(WizardAction::GoToStep(domain, step));
            return;
        }

        let workflow_file = self
            .services
            .settings
            .workflows
            .for_domain(domain)
            .to_string();
        let dispatch_error = self.dispatch_errors.get(&domain).cloned();
        let dark = self.theme.is_dark();
        let mut actions = Vec::new();
        let mut deploy = false;

        egui::ScrollArea::vertical()
            .id_salt(("wizard_scroll", domain))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                match current {
                    WizardStep::Configure => match domain {
                        Domain::Infrastructure => {
                            let output = forms::infrastructure::show(ui, &self.wizard.infrastructure);
                            actions.extend(output.changed.map(WizardAction::UpdateInfrastructure));
                            if output.next {
                                actions.push(WizardAction::Next(domain));
                            }
                        }
                        Domain::Application => {
                            let output = forms::application::show(ui, &self.wizard.application);
                            actions.extend(output.changed.map(WizardAction::UpdateApplication));
                            if output.next {
                                actions.push(WizardAction::Next(domain));
                            }
                        }
                        Domain::CiPipeline => {
                            let output = forms::ci_pipeline::show(ui, &self.wizard.ci);
                            actions.extend(output.changed.map(WizardAction::UpdateCi));
                            if output.next {
                                actions.push(WizardAction::Next(domain));
                            }
                        }
                    },
                    WizardStep::Preview => {
                        let document = preview::render(&self.wizard.config(domain));
                        self.preview_panel.show(ui, &document, dark);
                    }
                    WizardStep::SourceControl => {
                        let output = source_control_panel::show(
                            ui,
                            SourceControlView {
                                domain,
                                link: self.wizard.link(domain),
                                workflow_file: &workflow_file,
                                deploying: self.wizard.run_status(domain).state.is_active(),
                                error: dispatch_error.as_deref(),
                            },
                        );
                        if let Some(link) = output.link {
                            actions.push(WizardAction::UpdateLink(domain, link));
                        }
                        deploy = output.deploy;
                    }
                    WizardStep::Deploy => {
                        match workflow_status_panel::show(
                            ui,
                            domain,
                            self.wizard.run_status(domain),
                            self.wizard.link(domain),
                            &workflow_file,
                        ) {
                            StatusPanelAction::Redeploy => deploy = true,
                            StatusPanelAction::EditConfiguration => {
                                actions.push(WizardAction::GoToStep(domain, WizardStep::Configure))
                            }
                            StatusPanelAction::None => {}
                        }
                    }
                }

                if current != WizardStep::Configure {
                    ui.add_space(12.0);
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.button("◀ Back").clicked() {
                            actions.push(WizardAction::Back(domain));
                        }
                        if matches!(current, WizardStep::Preview | WizardStep::SourceControl)
                            && ui.button("Next ▶").clicked()
                        {
                            actions.push(WizardAction::Next(domain));
                        }
                    });
                }
            });

        for action in actions {
            self.dispatch(action);
        }
        if deploy {
            self.trigger_deploy(domain);
        }
    }

    /// Floating windows
    pub(super) fn handle_windows(&mut self, ctx: &egui::Context) {
        NoticeDetailsWindow::show(&mut self.notices, ctx);

        if let Some(settings) = self.settings_window.show(ctx) {
            self.apply_settings(settings);
        }
    }
}
