//! App initialization and service wiring

use super::{AppServices, DashApp};
use crate::app::deployment::{ControllerOptions, DeploymentController};
use crate::app::github::GitHubClient;
use crate::app::notifications::{Notice, NoticeSource};
use crate::app::settings::ConsoleSettings;
use crate::app::wizard::WizardState;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

impl DashApp {
    /// Create a new DashApp instance from creation context
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: DashApp = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        let services = AppServices::from_environment();
        let controller = match build_controller(&services.settings) {
            Ok(controller) => Some(controller),
            Err(e) => {
                warn!("Deployments disabled: {:#}", e);
                app.notices.post(
                    Notice::error(
                        "controller_init",
                        "Deployments unavailable",
                        format!("{:#}", e),
                        NoticeSource::Startup,
                    )
                    .with_detail("Check api_base_url in settings.toml"),
                );
                None
            }
        };
        app.attach(services, controller);

        app.apply_theme(&cc.egui_ctx);
        app.theme_applied = true;
        app
    }

    /// Builds a console over the given services without touching eframe storage.
    pub fn with_services(services: AppServices, controller: Option<DeploymentController>) -> Self {
        let mut app = Self::default();
        app.attach(services, controller);
        app
    }

    fn attach(&mut self, services: AppServices, controller: Option<DeploymentController>) {
        self.wizard = match &services.store {
            Some(store) => store.load_wizard(),
            None => WizardState::default(),
        };
        self.controller = controller;
        self.settings_window.reset(&services.settings);
        self.services = services;
        self.refresh_recent_deployments();
        info!(
            "Console ready on tab {:?}, deployments {}",
            self.wizard.position.active_tab,
            if self.controller.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );
    }

    /// Persists new settings and rebuilds the GitHub client from them.
    pub(super) fn apply_settings(&mut self, settings: ConsoleSettings) {
        if let Some(path) = &self.services.settings_path {
            if let Err(e) = settings.save_to_file(path) {
                warn!("Failed to save settings: {:#}", e);
                self.notices.post(Notice::warning(
                    "settings_save",
                    "Settings not saved",
                    format!("{:#}", e),
                    NoticeSource::Settings,
                ));
            }
        }

        match GitHubClient::from_settings(&settings) {
            Ok(client) => {
                let options = ControllerOptions::from(&settings);
                match &mut self.controller {
                    Some(controller) => controller.reconfigure(Arc::new(client), options),
                    None => match DeploymentController::new(Arc::new(client), options) {
                        Ok(controller) => self.controller = Some(controller),
                        Err(e) => warn!("Deployments still disabled: {:#}", e),
                    },
                }
                self.notices.dismiss("controller_init");
            }
            Err(e) => {
                warn!("Keeping previous GitHub client: {:#}", e);
                self.notices.post(Notice::error(
                    "settings_client",
                    "Invalid GitHub settings",
                    format!("{:#}", e),
                    NoticeSource::Settings,
                ));
            }
        }
        info!("Settings applied");
        self.services.settings = settings;
    }
}

/// Creates the production controller talking to GitHub.
fn build_controller(settings: &ConsoleSettings) -> Result<DeploymentController> {
    let client = GitHubClient::from_settings(settings)?;
    DeploymentController::new(Arc::new(client), ControllerOptions::from(settings))
}
