//! IaC Dash - GKE and Kubernetes deployment console
//!
//! IaC Dash is a desktop application for configuring a GKE cluster, the
//! Kubernetes workload running on it and the CI pipeline building its image.
//! Each configuration is previewed as the file it becomes (Terraform HCL,
//! Kubernetes YAML, GitHub Actions YAML) and deployed by dispatching a GitHub
//! Actions workflow whose run is then followed until it completes.
//!
//! # Architecture Overview
//!
//! - **UI Layer** ([`app::dashui`]): egui step wizards, dashboard and history
//! - **State** ([`app::wizard`], [`app::storage`]): one reducer-driven state
//!   value persisted as JSON slots
//! - **Renderers** ([`app::preview`]): deterministic config to text functions
//! - **Deployment** ([`app::deployment`], [`app::github`]): workflow dispatch,
//!   background run polling and the append-only deployment history
//!
//! # Files
//!
//! Everything lives in the platform directories reported by
//! `directories::ProjectDirs::from("com", "", "iacdash")`:
//!
//! - `state/*.json` - wizard slots
//! - `deployments.jsonl` - deployment history
//! - `saved_configurations.json` - saved configurations
//! - `logs/iacdash.log`, `logs/crash.log` - logs
//! - `settings.toml` (config directory) - console settings

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub use app::DashApp;
