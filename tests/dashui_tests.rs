//! Console UI tests driven through `egui_kittest`
//!
//! The whole `DashApp` frame is rendered headless and clicked through by
//! widget label, the way a user would walk the wizard.

use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use iacdash::app::dashui::app::AppServices;
use iacdash::app::dashui::{DashApp, ThemeChoice};
use iacdash::app::domain_config::{Domain, SourceControlLink};
use iacdash::app::settings::ConsoleSettings;
use iacdash::app::wizard::{ConsoleTab, WizardAction, WizardStep};
use tempfile::TempDir;

fn console(dir: &TempDir) -> Harness<'static, DashApp> {
    let app = DashApp::with_services(
        AppServices::rooted_at(dir.path(), ConsoleSettings::default()),
        None,
    );
    Harness::builder()
        .with_size(egui::vec2(1400.0, 2000.0))
        .build_state(|ctx, app: &mut DashApp| app.show(ctx), app)
}

#[test]
fn test_dashapp_default() {
    let app = DashApp::default();
    assert_eq!(app.theme, ThemeChoice::Latte);
    assert_eq!(app.wizard().position.active_tab, ConsoleTab::Dashboard);
    assert!(app.recent_deployments().is_empty());
}

#[test]
fn test_dashapp_theme_serialization() {
    let mut app = DashApp::default();
    app.theme = ThemeChoice::Mocha;

    let serialized = serde_json::to_string(&app).unwrap();
    let deserialized: DashApp = serde_json::from_str(&serialized).unwrap();

    assert_eq!(deserialized.theme, ThemeChoice::Mocha);
    // Wizard state lives in the slot files, not in eframe storage
    assert_eq!(deserialized.wizard().position.active_tab, ConsoleTab::Dashboard);
}

#[test]
fn test_theme_choices() {
    assert_eq!(ThemeChoice::ALL.len(), 4);
    assert!(!ThemeChoice::Latte.is_dark());
    assert!(ThemeChoice::Mocha.is_dark());
    assert_eq!(ThemeChoice::Macchiato.to_string(), "Macchiato");
}

#[test]
fn test_sidebar_switches_tabs() {
    let dir = TempDir::new().unwrap();
    let mut harness = console(&dir);
    harness.run();

    harness.get_by_label("History").click();
    harness.run();
    assert_eq!(
        harness.state().wizard().position.active_tab,
        ConsoleTab::History
    );
    assert!(harness.query_by_label("Deployment History").is_some());
}

#[test]
fn test_dashboard_view_all_opens_history() {
    let dir = TempDir::new().unwrap();
    let mut harness = console(&dir);
    harness.run();

    assert!(harness.query_by_label("No deployments recorded yet.").is_some());
    harness.get_by_label("View all").click();
    harness.run();
    assert_eq!(
        harness.state().wizard().position.active_tab,
        ConsoleTab::History
    );
}

#[test]
fn test_walk_infrastructure_wizard_to_source_control() {
    let dir = TempDir::new().unwrap();
    let mut harness = console(&dir);
    harness
        .state_mut()
        .dispatch(WizardAction::SelectTab(ConsoleTab::Infrastructure));
    harness.run();

    harness.get_by_label("Preview Terraform ▶").click();
    harness.run();
    assert_eq!(
        harness.state().wizard().step(Domain::Infrastructure),
        WizardStep::Preview
    );
    assert!(harness.query_by_label("2. Terraform Preview").is_some());

    harness.get_by_label("Next ▶").click();
    harness.run();
    assert_eq!(
        harness.state().wizard().step(Domain::Infrastructure),
        WizardStep::SourceControl
    );

    harness.get_by_label("◀ Back").click();
    harness.run();
    assert_eq!(
        harness.state().wizard().step(Domain::Infrastructure),
        WizardStep::Preview
    );
}

#[test]
fn test_step_position_is_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let mut harness = console(&dir);
        harness
            .state_mut()
            .dispatch(WizardAction::SelectTab(ConsoleTab::Applications));
        harness.run();
        harness.get_by_label("Preview Manifests ▶").click();
        harness.run();
    }

    let restored = DashApp::with_services(
        AppServices::rooted_at(dir.path(), ConsoleSettings::default()),
        None,
    );
    assert_eq!(
        restored.wizard().position.active_tab,
        ConsoleTab::Applications
    );
    assert_eq!(restored.wizard().step(Domain::Application), WizardStep::Preview);
}

#[test]
fn test_deploy_without_client_shows_error() {
    let dir = TempDir::new().unwrap();
    let mut harness = console(&dir);
    {
        let app = harness.state_mut();
        app.dispatch(WizardAction::SelectTab(ConsoleTab::Infrastructure));
        app.dispatch(WizardAction::GoToStep(
            Domain::Infrastructure,
            WizardStep::SourceControl,
        ));
        app.dispatch(WizardAction::UpdateLink(
            Domain::Infrastructure,
            SourceControlLink::new("acme", "infra"),
        ));
    }
    harness.run();

    harness.get_by_label("🚀 Deploy Cluster").click();
    harness.run();

    assert_eq!(
        harness.state().dispatch_error(Domain::Infrastructure),
        Some("GitHub client is not configured")
    );
    assert!(harness
        .query_by_label("✗ GitHub client is not configured")
        .is_some());
    assert_eq!(
        harness.state().wizard().step(Domain::Infrastructure),
        WizardStep::SourceControl
    );
}
