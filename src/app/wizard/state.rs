use super::{next_step, previous_step, ConsoleTab, DeploymentMode, WizardStep};
use crate::app::deployment::status::{RunStatus, StatusUpdate};
use crate::app::domain_config::{
    ApplicationConfig, CiConfig, Domain, DomainConfig, InfrastructureConfig, SourceControlLink,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the user is in the console. Persisted as the `app_state` slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardPosition {
    pub active_tab: ConsoleTab,
    pub deployment_mode: DeploymentMode,
    pub infrastructure_step: WizardStep,
    pub application_step: WizardStep,
    pub ci_step: WizardStep,
}

impl WizardPosition {
    pub fn step(&self, domain: Domain) -> WizardStep {
        match domain {
            Domain::Infrastructure => self.infrastructure_step,
            Domain::Application => self.application_step,
            Domain::CiPipeline => self.ci_step,
        }
    }

    fn set_step(&mut self, domain: Domain, step: WizardStep) {
        match domain {
            Domain::Infrastructure => self.infrastructure_step = step,
            Domain::Application => self.application_step = step,
            Domain::CiPipeline => self.ci_step = step,
        }
    }
}

/// Everything the wizard reads and writes.
///
/// There is exactly one copy of each configuration; the preview and
/// integration steps read it from here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    pub position: WizardPosition,
    pub infrastructure: InfrastructureConfig,
    pub application: ApplicationConfig,
    pub ci: CiConfig,
    pub infrastructure_link: SourceControlLink,
    pub application_link: SourceControlLink,
    pub ci_link: SourceControlLink,
    pub infrastructure_run: RunStatus,
    pub application_run: RunStatus,
    pub ci_run: RunStatus,
}

/// Every state transition the console can make.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SelectTab(ConsoleTab),
    SelectMode(DeploymentMode),
    GoToStep(Domain, WizardStep),
    Next(Domain),
    Back(Domain),
    UpdateInfrastructure(InfrastructureConfig),
    UpdateApplication(ApplicationConfig),
    UpdateCi(CiConfig),
    UpdateLink(Domain, SourceControlLink),
    LoadSaved(DomainConfig),
    RunStatusChanged(Domain, StatusUpdate),
}

impl WizardState {
    /// Applies one action and returns the new state.
    pub fn reduce(mut self, action: WizardAction) -> Self {
        debug!("Wizard action: {:?}", ActionName(&action));
        match action {
            WizardAction::SelectTab(tab) => self.position.active_tab = tab,
            WizardAction::SelectMode(mode) => {
                self.position.deployment_mode = mode;
                self.position.active_tab = ConsoleTab::for_domain(mode.domain());
            }
            WizardAction::GoToStep(domain, step) => self.position.set_step(domain, step),
            WizardAction::Next(domain) => {
                let step = next_step(domain, self.position.step(domain));
                self.position.set_step(domain, step);
            }
            WizardAction::Back(domain) => {
                let step = previous_step(domain, self.position.step(domain));
                self.position.set_step(domain, step);
            }
            WizardAction::UpdateInfrastructure(config) => self.infrastructure = config,
            WizardAction::UpdateApplication(config) => self.application = config,
            WizardAction::UpdateCi(config) => self.ci = config,
            WizardAction::UpdateLink(domain, link) => *self.link_mut(domain) = link,
            WizardAction::LoadSaved(config) => {
                let domain = config.domain();
                match config {
                    DomainConfig::Infrastructure(c) => {
                        self.infrastructure = c;
                        self.position.deployment_mode = DeploymentMode::Infrastructure;
                    }
                    DomainConfig::Application(c) => {
                        self.application = c;
                        self.position.deployment_mode = DeploymentMode::Application;
                    }
                    DomainConfig::CiPipeline(c) => self.ci = c,
                }
                self.position.active_tab = ConsoleTab::for_domain(domain);
                self.position.set_step(domain, WizardStep::Configure);
            }
            WizardAction::RunStatusChanged(domain, update) => {
                let slot = self.run_mut(domain);
                let current = std::mem::take(slot);
                *slot = current.apply(update);
            }
        }
        self
    }

    pub fn step(&self, domain: Domain) -> WizardStep {
        self.position.step(domain)
    }

    /// Snapshot of a domain's configuration.
    pub fn config(&self, domain: Domain) -> DomainConfig {
        match domain {
            Domain::Infrastructure => DomainConfig::Infrastructure(self.infrastructure.clone()),
            Domain::Application => DomainConfig::Application(self.application.clone()),
            Domain::CiPipeline => DomainConfig::CiPipeline(self.ci.clone()),
        }
    }

    pub fn link(&self, domain: Domain) -> &SourceControlLink {
        match domain {
            Domain::Infrastructure => &self.infrastructure_link,
            Domain::Application => &self.application_link,
            Domain::CiPipeline => &self.ci_link,
        }
    }

    fn link_mut(&mut self, domain: Domain) -> &mut SourceControlLink {
        match domain {
            Domain::Infrastructure => &mut self.infrastructure_link,
            Domain::Application => &mut self.application_link,
            Domain::CiPipeline => &mut self.ci_link,
        }
    }

    pub fn run_status(&self, domain: Domain) -> &RunStatus {
        match domain {
            Domain::Infrastructure => &self.infrastructure_run,
            Domain::Application => &self.application_run,
            Domain::CiPipeline => &self.ci_run,
        }
    }

    fn run_mut(&mut self, domain: Domain) -> &mut RunStatus {
        match domain {
            Domain::Infrastructure => &mut self.infrastructure_run,
            Domain::Application => &mut self.application_run,
            Domain::CiPipeline => &mut self.ci_run,
        }
    }
}

/// Logs an action by name only; configs can be large.
struct ActionName<'a>(&'a WizardAction);

impl std::fmt::Debug for ActionName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            WizardAction::SelectTab(tab) => write!(f, "SelectTab({:?})", tab),
            WizardAction::SelectMode(mode) => write!(f, "SelectMode({:?})", mode),
            WizardAction::GoToStep(domain, step) => write!(f, "GoToStep({}, {:?})", domain, step),
            WizardAction::Next(domain) => write!(f, "Next({})", domain),
            WizardAction::Back(domain) => write!(f, "Back({})", domain),
            WizardAction::UpdateInfrastructure(_) => write!(f, "UpdateInfrastructure"),
            WizardAction::UpdateApplication(_) => write!(f, "UpdateApplication"),
            WizardAction::UpdateCi(_) => write!(f, "UpdateCi"),
            WizardAction::UpdateLink(domain, _) => write!(f, "UpdateLink({})", domain),
            WizardAction::LoadSaved(config) => write!(f, "LoadSaved({})", config.domain()),
            WizardAction::RunStatusChanged(domain, _) => write!(f, "RunStatusChanged({})", domain),
        }
    }
}
