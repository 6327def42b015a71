//! Saved configuration store tests

use iacdash::app::domain_config::{
    ApplicationConfig, CiConfig, Domain, DomainConfig, InfrastructureConfig,
};
use iacdash::app::saved_configs::SavedConfigStore;
use iacdash::app::wizard::{WizardAction, WizardState, WizardStep};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

fn store(dir: &TempDir) -> SavedConfigStore {
    SavedConfigStore::new(dir.path().join("saved_configurations.json"))
}

#[test]
fn test_empty_store_lists_nothing() {
    let dir = TempDir::new().unwrap();
    assert!(store(&dir).list().unwrap().is_empty());
}

#[test]
fn test_save_list_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let first = store
        .save(
            "baseline",
            "three node pool",
            DomainConfig::Infrastructure(InfrastructureConfig::default()),
        )
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = store
        .save(
            "  storefront  ",
            "",
            DomainConfig::Application(ApplicationConfig::default()),
        )
        .unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[0].name, "storefront");
    assert_eq!(listed[0].domain(), Domain::Application);
    assert_eq!(listed[1], first);
}

#[test]
fn test_delete_removes_only_the_entry() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let keep = store
        .save("ci", "", DomainConfig::CiPipeline(CiConfig::default()))
        .unwrap();
    let removed = store
        .save(
            "infra",
            "",
            DomainConfig::Infrastructure(InfrastructureConfig::default()),
        )
        .unwrap();

    assert!(store.delete(removed.id).unwrap());
    assert!(!store.delete(Uuid::new_v4()).unwrap());

    let listed = store.list().unwrap();
    assert_eq!(listed, vec![keep]);
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    std::fs::write(store.path(), "[{ broken").unwrap();
    assert!(store.list().is_err());
}

#[test]
fn test_loading_a_saved_config_restores_it() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let mut infra = InfrastructureConfig::default();
    infra.cluster_name = "prod-gke-1".to_string();
    infra.node_pool.preemptible = true;
    store
        .save("prod", "", DomainConfig::Infrastructure(infra.clone()))
        .unwrap();

    let saved = store.list().unwrap().remove(0);
    let state = WizardState::default()
        .reduce(WizardAction::GoToStep(Domain::Infrastructure, WizardStep::Deploy))
        .reduce(WizardAction::LoadSaved(saved.config));

    assert_eq!(state.infrastructure, infra);
    assert_eq!(state.step(Domain::Infrastructure), WizardStep::Configure);
}
