//! Desktop user interface for IaC Dash.
//!
//! The console is a single egui window: a tab sidebar on the left, the active
//! tab in the central panel and a status bar at the bottom. Each deployment
//! domain renders as a step wizard:
//!
//! - **Configure**: one of the [`forms`] edits the domain's configuration
//! - **Preview**: [`preview_panel`] shows the generated Terraform or YAML
//! - **Source control**: [`source_control_panel`] links a GitHub repository
//!   and triggers the workflow dispatch
//! - **Deploy**: [`workflow_status_panel`] follows the dispatched run
//!
//! The read-only views ([`dashboard`], [`history_window`]) and the
//! [`saved_configs_window`] sit next to the wizard tabs. Panels never mutate
//! wizard state directly; they return what the user did and
//! [`app::DashApp`] turns that into a reducer action.

pub mod app;
pub mod dashboard;
pub mod forms;
pub mod history_window;
pub mod menu;
pub mod preview_panel;
pub mod saved_configs_window;
pub mod settings_window;
pub mod source_control_panel;
pub mod workflow_status_panel;

pub use app::{DashApp, ThemeChoice};
