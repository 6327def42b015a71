//! Persisted wizard state.
//!
//! Each piece of state lives in its own JSON slot file under `<data_dir>/state/`.
//! Loading never fails: a missing or unreadable slot yields its default value.
//! Saving is best-effort and only logs on failure.

use crate::app::domain_config::Domain;
use crate::app::wizard::{WizardAction, WizardState};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Named persistence slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    AppState,
    TerraformConfig,
    GithubConfig,
    K8sConfig,
    K8sGithubConfig,
    CiConfig,
    CiGithubConfig,
}

impl Slot {
    pub const ALL: [Slot; 7] = [
        Slot::AppState,
        Slot::TerraformConfig,
        Slot::GithubConfig,
        Slot::K8sConfig,
        Slot::K8sGithubConfig,
        Slot::CiConfig,
        Slot::CiGithubConfig,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Slot::AppState => "app_state.json",
            Slot::TerraformConfig => "terraform_config.json",
            Slot::GithubConfig => "github_config.json",
            Slot::K8sConfig => "k8s_config.json",
            Slot::K8sGithubConfig => "k8s_github_config.json",
            Slot::CiConfig => "ci_config.json",
            Slot::CiGithubConfig => "ci_github_config.json",
        }
    }

    pub fn link_slot(domain: Domain) -> Slot {
        match domain {
            Domain::Infrastructure => Slot::GithubConfig,
            Domain::Application => Slot::K8sGithubConfig,
            Domain::CiPipeline => Slot::CiGithubConfig,
        }
    }

    /// Slots whose contents an action can change.
    pub fn affected_by(action: &WizardAction) -> Vec<Slot> {
        match action {
            WizardAction::SelectTab(_)
            | WizardAction::SelectMode(_)
            | WizardAction::GoToStep(..)
            | WizardAction::Next(_)
            | WizardAction::Back(_) => vec![Slot::AppState],
            WizardAction::UpdateInfrastructure(_) => vec![Slot::TerraformConfig],
            WizardAction::UpdateApplication(_) => vec![Slot::K8sConfig],
            WizardAction::UpdateCi(_) => vec![Slot::CiConfig],
            WizardAction::UpdateLink(domain, _) => vec![Slot::link_slot(*domain)],
            WizardAction::LoadSaved(config) => {
                let config_slot = match config.domain() {
                    Domain::Infrastructure => Slot::TerraformConfig,
                    Domain::Application => Slot::K8sConfig,
                    Domain::CiPipeline => Slot::CiConfig,
                };
                vec![Slot::AppState, config_slot]
            }
            WizardAction::RunStatusChanged(..) => Vec::new(),
        }
    }
}

/// Reads and writes wizard slots below one directory.
#[derive(Debug, Clone)]
pub struct PersistedStore {
    base_path: PathBuf,
}

impl PersistedStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Store rooted at `<data_dir>/state`, if the platform has a data directory.
    pub fn in_data_dir() -> Option<Self> {
        crate::app::paths::data_dir().map(|dir| Self::new(dir.join("state")))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, slot: Slot) -> PathBuf {
        self.base_path.join(slot.file_name())
    }

    fn read_slot<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            debug!("Slot {:?} not present at {:?}", slot, path);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read slot file: {:?}", path))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse slot file: {:?}", path))?;
        Ok(Some(value))
    }

    fn write_slot<T: Serialize>(&self, slot: Slot, value: &T) -> Result<()> {
        fs::create_dir_all(&self.base_path).with_context(|| {
            format!("Failed to create state directory: {:?}", self.base_path)
        })?;
        let path = self.slot_path(slot);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize slot {:?}", slot))?;
        fs::write(&path, json).with_context(|| format!("Failed to write slot file: {:?}", path))
    }

    /// Loads a slot, falling back to the type's default.
    pub fn load<T: DeserializeOwned + Default>(&self, slot: Slot) -> T {
        match self.read_slot(slot) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Using default for slot {:?}: {:#}", slot, e);
                T::default()
            }
        }
    }

    /// Saves a slot, logging failures instead of returning them.
    pub fn save<T: Serialize>(&self, slot: Slot, value: &T) {
        if let Err(e) = self.write_slot(slot, value) {
            warn!("Failed to persist slot {:?}: {:#}", slot, e);
        }
    }

    /// Restores the wizard from every slot. Run statuses always start idle.
    pub fn load_wizard(&self) -> WizardState {
        let state = WizardState {
            position: self.load(Slot::AppState),
            infrastructure: self.load(Slot::TerraformConfig),
            application: self.load(Slot::K8sConfig),
            ci: self.load(Slot::CiConfig),
            infrastructure_link: self.load(Slot::GithubConfig),
            application_link: self.load(Slot::K8sGithubConfig),
            ci_link: self.load(Slot::CiGithubConfig),
            ..WizardState::default()
        };
        info!("Restored wizard state from {:?}", self.base_path);
        state
    }

    pub fn save_slot_from(&self, slot: Slot, state: &WizardState) {
        match slot {
            Slot::AppState => self.save(slot, &state.position),
            Slot::TerraformConfig => self.save(slot, &state.infrastructure),
            Slot::GithubConfig => self.save(slot, &state.infrastructure_link),
            Slot::K8sConfig => self.save(slot, &state.application),
            Slot::K8sGithubConfig => self.save(slot, &state.application_link),
            Slot::CiConfig => self.save(slot, &state.ci),
            Slot::CiGithubConfig => self.save(slot, &state.ci_link),
        }
    }

    pub fn save_all(&self, state: &WizardState) {
        for slot in Slot::ALL {
            self.save_slot_from(slot, state);
        }
    }
}
