//! Wizard reducer tests
//!
//! Navigation, configuration edits and saved-configuration loading all go
//! through `WizardState::reduce`; these tests drive it the way the console does.

use iacdash::app::deployment::{RunState, StatusUpdate};
use iacdash::app::domain_config::{
    ApplicationConfig, CiConfig, Domain, DomainConfig, InfrastructureConfig, SourceControlLink,
};
use iacdash::app::wizard::{ConsoleTab, DeploymentMode, WizardAction, WizardState, WizardStep};
use pretty_assertions::assert_eq;

fn reduce_all(state: WizardState, actions: Vec<WizardAction>) -> WizardState {
    actions.into_iter().fold(state, WizardState::reduce)
}

#[test]
fn test_default_state_starts_on_dashboard() {
    let state = WizardState::default();
    assert_eq!(state.position.active_tab, ConsoleTab::Dashboard);
    assert_eq!(state.position.deployment_mode, DeploymentMode::Infrastructure);
    for domain in Domain::ALL {
        assert_eq!(state.step(domain), WizardStep::Configure);
        assert_eq!(state.run_status(domain).state, RunState::Idle);
    }
}

#[test]
fn test_steps_are_tracked_per_domain() {
    let state = reduce_all(
        WizardState::default(),
        vec![
            WizardAction::Next(Domain::Infrastructure),
            WizardAction::Next(Domain::Infrastructure),
            WizardAction::Next(Domain::Application),
        ],
    );
    assert_eq!(state.step(Domain::Infrastructure), WizardStep::SourceControl);
    assert_eq!(state.step(Domain::Application), WizardStep::Preview);
    assert_eq!(state.step(Domain::CiPipeline), WizardStep::Configure);
}

#[test]
fn test_forward_and_back_preserve_configuration() {
    let mut infra = InfrastructureConfig::default();
    infra.cluster_name = "prod-gke-1".to_string();
    infra.node_pool.node_count = 5;

    let state = reduce_all(
        WizardState::default(),
        vec![
            WizardAction::UpdateInfrastructure(infra.clone()),
            WizardAction::Next(Domain::Infrastructure),
            WizardAction::Next(Domain::Infrastructure),
            WizardAction::Back(Domain::Infrastructure),
            WizardAction::Back(Domain::Infrastructure),
            WizardAction::Back(Domain::Infrastructure),
        ],
    );

    assert_eq!(state.step(Domain::Infrastructure), WizardStep::Configure);
    assert_eq!(state.infrastructure, infra);
    assert_eq!(state.config(Domain::Infrastructure), DomainConfig::Infrastructure(infra));
}

#[test]
fn test_next_stops_on_last_step() {
    let state = reduce_all(
        WizardState::default(),
        vec![WizardAction::GoToStep(Domain::CiPipeline, WizardStep::Deploy)],
    );
    let state = state.reduce(WizardAction::Next(Domain::CiPipeline));
    assert_eq!(state.step(Domain::CiPipeline), WizardStep::Deploy);
}

#[test]
fn test_select_mode_switches_tab() {
    let state = WizardState::default().reduce(WizardAction::SelectMode(DeploymentMode::Application));
    assert_eq!(state.position.deployment_mode, DeploymentMode::Application);
    assert_eq!(state.position.active_tab, ConsoleTab::Applications);

    let state = state.reduce(WizardAction::SelectTab(ConsoleTab::History));
    assert_eq!(state.position.active_tab, ConsoleTab::History);
    assert_eq!(state.position.deployment_mode, DeploymentMode::Application);
}

#[test]
fn test_links_are_independent() {
    let link = SourceControlLink::new("acme", "infra");
    let state = WizardState::default().reduce(WizardAction::UpdateLink(Domain::Infrastructure, link.clone()));
    assert_eq!(state.link(Domain::Infrastructure), &link);
    assert_eq!(state.link(Domain::Application), &SourceControlLink::default());
    assert_eq!(state.link(Domain::CiPipeline), &SourceControlLink::default());
}

#[test]
fn test_load_saved_replaces_config_and_resets_step() {
    let mut app = ApplicationConfig::default();
    app.app_name = "storefront".to_string();
    app.replicas = 4;

    let state = reduce_all(
        WizardState::default(),
        vec![
            WizardAction::GoToStep(Domain::Application, WizardStep::SourceControl),
            WizardAction::LoadSaved(DomainConfig::Application(app.clone())),
        ],
    );

    assert_eq!(state.application, app);
    assert_eq!(state.step(Domain::Application), WizardStep::Configure);
    assert_eq!(state.position.active_tab, ConsoleTab::Applications);
    assert_eq!(state.position.deployment_mode, DeploymentMode::Application);
    // Other domains untouched
    assert_eq!(state.infrastructure, InfrastructureConfig::default());
}

#[test]
fn test_load_saved_ci_keeps_mode() {
    let mut ci = CiConfig::default();
    ci.app_name = "worker".to_string();

    let state = WizardState::default()
        .reduce(WizardAction::SelectMode(DeploymentMode::Application))
        .reduce(WizardAction::LoadSaved(DomainConfig::CiPipeline(ci.clone())));

    assert_eq!(state.ci, ci);
    assert_eq!(state.position.active_tab, ConsoleTab::CiPipeline);
    assert_eq!(state.position.deployment_mode, DeploymentMode::Application);
}

#[test]
fn test_run_status_changes_only_touch_their_domain() {
    let state = WizardState::default().reduce(WizardAction::RunStatusChanged(
        Domain::Application,
        StatusUpdate::Triggered {
            at: chrono::Utc::now(),
        },
    ));
    assert_eq!(state.run_status(Domain::Application).state, RunState::Deploying);
    assert_eq!(state.run_status(Domain::Infrastructure).state, RunState::Idle);
}
