//! Persisted slot tests
//!
//! The console restores tab, steps, configurations and repository links from
//! the JSON slots on the next launch. A broken slot must never block startup.

use iacdash::app::deployment::{RunState, StatusUpdate};
use iacdash::app::domain_config::{Domain, DomainConfig, InfrastructureConfig, SourceControlLink};
use iacdash::app::storage::{PersistedStore, Slot};
use iacdash::app::wizard::{ConsoleTab, DeploymentMode, WizardAction, WizardState, WizardStep};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn edited_state() -> WizardState {
    let mut state = WizardState::default();
    state.position.active_tab = ConsoleTab::Applications;
    state.position.deployment_mode = DeploymentMode::Application;
    state.position.infrastructure_step = WizardStep::SourceControl;
    state.position.application_step = WizardStep::Preview;
    state.position.ci_step = WizardStep::Deploy;
    state.infrastructure.cluster_name = "prod-gke-1".to_string();
    state.infrastructure.networking.private_cluster = true;
    state.application.app_name = "storefront".to_string();
    state.application.replicas = 6;
    state.ci.trigger_branches = vec!["main".to_string(), "develop".to_string()];
    state.infrastructure_link = SourceControlLink::new("acme", "infra");
    state.application_link = SourceControlLink::new("acme", "apps");
    state.ci_link = SourceControlLink {
        owner: "acme".to_string(),
        repo: "storefront".to_string(),
        branch: "release".to_string(),
    };
    state
}

#[test]
fn test_every_slot_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(dir.path().join("state"));
    let state = edited_state();

    store.save_all(&state);
    for slot in Slot::ALL {
        assert!(
            store.base_path().join(slot.file_name()).exists(),
            "{:?} was not written",
            slot
        );
    }

    let restored = PersistedStore::new(dir.path().join("state")).load_wizard();
    assert_eq!(restored, state);
}

#[test]
fn test_missing_directory_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(dir.path().join("never-created"));
    assert_eq!(store.load_wizard(), WizardState::default());
}

#[test]
fn test_corrupt_slot_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(dir.path());
    store.save_all(&edited_state());

    std::fs::write(
        dir.path().join(Slot::TerraformConfig.file_name()),
        "{ not json",
    )
    .unwrap();

    let restored = store.load_wizard();
    assert_eq!(restored.infrastructure, InfrastructureConfig::default());
    // The other slots are unaffected
    assert_eq!(restored.application.app_name, "storefront");
    assert_eq!(restored.position.active_tab, ConsoleTab::Applications);
}

#[test]
fn test_partial_slot_keeps_known_fields() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(dir.path());
    std::fs::write(
        dir.path().join(Slot::AppState.file_name()),
        r#"{"active_tab": "history"}"#,
    )
    .unwrap();

    let restored = store.load_wizard();
    assert_eq!(restored.position.active_tab, ConsoleTab::History);
    assert_eq!(restored.position.infrastructure_step, WizardStep::Configure);
}

#[test]
fn test_run_status_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let store = PersistedStore::new(dir.path());
    let state = edited_state().reduce(WizardAction::RunStatusChanged(
        Domain::Infrastructure,
        StatusUpdate::Triggered {
            at: chrono::Utc::now(),
        },
    ));
    assert_eq!(state.infrastructure_run.state, RunState::Deploying);

    store.save_all(&state);
    let restored = store.load_wizard();
    assert_eq!(restored.infrastructure_run.state, RunState::Idle);
}

#[test]
fn test_affected_slots() {
    assert_eq!(
        Slot::affected_by(&WizardAction::Next(Domain::CiPipeline)),
        vec![Slot::AppState]
    );
    assert_eq!(
        Slot::affected_by(&WizardAction::UpdateLink(
            Domain::Application,
            SourceControlLink::default()
        )),
        vec![Slot::K8sGithubConfig]
    );
    assert_eq!(
        Slot::affected_by(&WizardAction::LoadSaved(DomainConfig::Infrastructure(
            InfrastructureConfig::default()
        ))),
        vec![Slot::AppState, Slot::TerraformConfig]
    );
    assert!(Slot::affected_by(&WizardAction::RunStatusChanged(
        Domain::CiPipeline,
        StatusUpdate::Triggered {
            at: chrono::Utc::now()
        }
    ))
    .is_empty());
}

#[test]
fn test_slot_files_use_expected_names() {
    let names: Vec<&str> = Slot::ALL.iter().map(Slot::file_name).collect();
    assert_eq!(
        names,
        vec![
            "app_state.json",
            "terraform_config.json",
            "github_config.json",
            "k8s_config.json",
            "k8s_github_config.json",
            "ci_config.json",
            "ci_github_config.json",
        ]
    );
}
