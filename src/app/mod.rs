//! Core application modules for IaC Dash.
//!
//! # Module Organization
//!
//! ## Configuration and rendering
//! - [`domain_config`] - Typed configuration records for the three wizard domains
//! - [`preview`] - Pure renderers for Terraform, Kubernetes manifests and workflows
//! - [`wizard`] - Step tables and the reducer over [`wizard::WizardState`]
//!
//! ## Persistence
//! - [`paths`] - Per-user data and config directories
//! - [`storage`] - Named JSON slots holding the wizard state
//! - [`saved_configs`] - Named configuration snapshots
//! - [`settings`] - `settings.toml`
//!
//! ## Deployment
//! - [`github`] - GitHub Actions REST client behind the [`github::WorkflowApi`] trait
//! - [`deployment`] - Dispatch controller, run monitors, run status and history
//!
//! ## UI
//! - [`dashui`] - egui console
//! - [`notifications`] - Status bar notifications and their detail window
//!
//! # Architecture
//!
//! The UI thread owns a single [`wizard::WizardState`]. Panels report user
//! input, [`DashApp`] turns it into [`wizard::WizardAction`]s, reduces them and
//! writes the touched slots. Network work runs on the runtime owned by
//! [`deployment::DeploymentController`] and comes back as events drained once
//! per frame.

pub mod dashui;
pub mod deployment;
pub mod domain_config;
pub mod github;
pub mod notifications;
pub mod paths;
pub mod preview;
pub mod saved_configs;
pub mod settings;
pub mod storage;
pub mod wizard;

pub use dashui::app::DashApp;
