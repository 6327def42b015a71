//! Modular implementation of DashApp
//!
//! This module contains the implementation of DashApp split into logical components:
//! - initialization: App creation, service wiring and controller setup
//! - theme: Theme management
//! - event_handling: Reducer dispatch, deployment triggers and controller events
//! - rendering: Top menu bar, tab sidebar, status bar and central panel rendering

use super::history_window::HistoryView;
use super::preview_panel::PreviewPanel;
use super::saved_configs_window::SavedConfigsWindow;
use super::settings_window::SettingsWindow;
use crate::app::deployment::{DeploymentController, DeploymentHistory, DeploymentRecord};
use crate::app::domain_config::Domain;
use crate::app::notifications::NoticeBoard;
use crate::app::saved_configs::SavedConfigStore;
use crate::app::settings::ConsoleSettings;
use crate::app::storage::PersistedStore;
use crate::app::wizard::WizardState;
use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod event_handling;
mod initialization;
mod rendering;
mod theme;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum ThemeChoice {
    #[default]
    Latte,
    Frappe,
    Macchiato,
    Mocha,
}

impl ThemeChoice {
    pub const ALL: [ThemeChoice; 4] = [
        ThemeChoice::Latte,
        ThemeChoice::Frappe,
        ThemeChoice::Macchiato,
        ThemeChoice::Mocha,
    ];

    pub fn is_dark(&self) -> bool {
        !matches!(self, ThemeChoice::Latte)
    }
}

impl std::fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeChoice::Latte => write!(f, "Latte"),
            ThemeChoice::Frappe => write!(f, "Frappe"),
            ThemeChoice::Macchiato => write!(f, "Macchiato"),
            ThemeChoice::Mocha => write!(f, "Mocha"),
        }
    }
}

/// Files and settings the console works against.
///
/// Every store is optional so the console still opens on platforms without a
/// data directory; the affected feature just does nothing.
#[derive(Debug, Clone, Default)]
pub struct AppServices {
    pub store: Option<PersistedStore>,
    pub history: Option<DeploymentHistory>,
    pub saved_configs: Option<SavedConfigStore>,
    pub settings: ConsoleSettings,
    pub settings_path: Option<PathBuf>,
}

impl AppServices {
    /// Services backed by the per-user data and config directories.
    pub fn from_environment() -> Self {
        let settings_path = ConsoleSettings::default_path();
        Self {
            store: PersistedStore::in_data_dir(),
            history: DeploymentHistory::in_data_dir(),
            saved_configs: SavedConfigStore::in_data_dir(),
            settings: ConsoleSettings::load_or_default(settings_path.as_deref()),
            settings_path,
        }
    }

    /// Services with every file below `dir`.
    pub fn rooted_at(dir: &Path, settings: ConsoleSettings) -> Self {
        Self {
            store: Some(PersistedStore::new(dir.join("state"))),
            history: Some(DeploymentHistory::new(dir.join("deployments.jsonl"))),
            saved_configs: Some(SavedConfigStore::new(dir.join("saved_configurations.json"))),
            settings,
            settings_path: Some(dir.join("settings.toml")),
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct DashApp {
    pub theme: ThemeChoice,

    #[serde(skip)]
    wizard: WizardState,
    #[serde(skip)]
    services: AppServices,
    #[serde(skip)]
    controller: Option<DeploymentController>,
    #[serde(skip)]
    pub notices: NoticeBoard,
    #[serde(skip)]
    /// Last dispatch error per domain, shown on the source-control step
    dispatch_errors: HashMap<Domain, String>,
    #[serde(skip)]
    /// Newest first; refreshed after every recorded deployment
    recent_deployments: Vec<DeploymentRecord>,
    #[serde(skip)]
    history_view: HistoryView,
    #[serde(skip)]
    saved_configs_window: SavedConfigsWindow,
    #[serde(skip)]
    settings_window: SettingsWindow,
    #[serde(skip)]
    preview_panel: PreviewPanel,
    #[serde(skip)]
    theme_applied: bool,
}

impl Default for DashApp {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            wizard: WizardState::default(),
            services: AppServices::default(),
            controller: None,
            notices: NoticeBoard::new(),
            dispatch_errors: HashMap::new(),
            recent_deployments: Vec::new(),
            history_view: HistoryView::default(),
            saved_configs_window: SavedConfigsWindow::default(),
            settings_window: SettingsWindow::default(),
            preview_panel: PreviewPanel::default(),
            theme_applied: false,
        }
    }
}

impl DashApp {
    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn services(&self) -> &AppServices {
        &self.services
    }

    pub fn dispatch_error(&self, domain: Domain) -> Option<&str> {
        self.dispatch_errors.get(&domain).map(String::as_str)
    }

    pub fn recent_deployments(&self) -> &[DeploymentRecord] {
        &self.recent_deployments
    }
}

impl eframe::App for DashApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
        if let Some(store) = &self.services.store {
            store.save_all(&self.wizard);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl DashApp {
    /// Runs one frame of the console.
    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.theme_applied {
            self.apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_controller_events(ctx);

        self.render_top_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_tab_sidebar(ctx);
        self.render_central_panel(ctx);

        self.handle_windows(ctx);
    }
}
