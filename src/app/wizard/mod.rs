//! Wizard navigation: tabs, per-domain step tables and the reducer-driven state.
//!
//! Steps are looked up from [`flow`]; navigation never branches on the domain
//! anywhere else.

pub mod state;

pub use state::{WizardAction, WizardPosition, WizardState};

use crate::app::domain_config::Domain;
use serde::{Deserialize, Serialize};

/// Sub-steps every domain walks through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Configure,
    Preview,
    SourceControl,
    Deploy,
}

/// One entry of a domain's step table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub step: WizardStep,
    pub label: &'static str,
}

const INFRASTRUCTURE_FLOW: [StepInfo; 4] = [
    StepInfo {
        step: WizardStep::Configure,
        label: "Configuration",
    },
    StepInfo {
        step: WizardStep::Preview,
        label: "Terraform Preview",
    },
    StepInfo {
        step: WizardStep::SourceControl,
        label: "GitHub Integration",
    },
    StepInfo {
        step: WizardStep::Deploy,
        label: "Deployment Status",
    },
];

const APPLICATION_FLOW: [StepInfo; 4] = [
    StepInfo {
        step: WizardStep::Configure,
        label: "Kubernetes Config",
    },
    StepInfo {
        step: WizardStep::Preview,
        label: "Manifest Preview",
    },
    StepInfo {
        step: WizardStep::SourceControl,
        label: "GitHub Integration",
    },
    StepInfo {
        step: WizardStep::Deploy,
        label: "Deployment Status",
    },
];

const CI_FLOW: [StepInfo; 4] = [
    StepInfo {
        step: WizardStep::Configure,
        label: "Pipeline Config",
    },
    StepInfo {
        step: WizardStep::Preview,
        label: "Workflow Preview",
    },
    StepInfo {
        step: WizardStep::SourceControl,
        label: "GitHub Integration",
    },
    StepInfo {
        step: WizardStep::Deploy,
        label: "Manage Pipeline",
    },
];

/// The ordered step table of a domain.
pub fn flow(domain: Domain) -> &'static [StepInfo] {
    match domain {
        Domain::Infrastructure => &INFRASTRUCTURE_FLOW,
        Domain::Application => &APPLICATION_FLOW,
        Domain::CiPipeline => &CI_FLOW,
    }
}

fn position_in(domain: Domain, step: WizardStep) -> usize {
    flow(domain)
        .iter()
        .position(|info| info.step == step)
        .unwrap_or(0)
}

/// The step after `step`, or `step` itself on the last one.
pub fn next_step(domain: Domain, step: WizardStep) -> WizardStep {
    let steps = flow(domain);
    let index = position_in(domain, step);
    steps.get(index + 1).map(|info| info.step).unwrap_or(step)
}

/// The step before `step`, or `step` itself on the first one.
pub fn previous_step(domain: Domain, step: WizardStep) -> WizardStep {
    let index = position_in(domain, step);
    match index.checked_sub(1) {
        Some(prev) => flow(domain)[prev].step,
        None => step,
    }
}

pub fn step_label(domain: Domain, step: WizardStep) -> &'static str {
    flow(domain)[position_in(domain, step)].label
}

/// Top-level navigation entries of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleTab {
    #[default]
    Dashboard,
    Infrastructure,
    Applications,
    CiPipeline,
    History,
    SavedConfigs,
}

impl ConsoleTab {
    pub const ALL: [ConsoleTab; 6] = [
        ConsoleTab::Dashboard,
        ConsoleTab::Infrastructure,
        ConsoleTab::Applications,
        ConsoleTab::CiPipeline,
        ConsoleTab::History,
        ConsoleTab::SavedConfigs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConsoleTab::Dashboard => "Dashboard",
            ConsoleTab::Infrastructure => "Infrastructure",
            ConsoleTab::Applications => "Applications",
            ConsoleTab::CiPipeline => "CI/CD Pipeline",
            ConsoleTab::History => "History",
            ConsoleTab::SavedConfigs => "Saved Configs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConsoleTab::Dashboard => "Overview and insights",
            ConsoleTab::Infrastructure => "GKE clusters and resources",
            ConsoleTab::Applications => "K8s deployments and services",
            ConsoleTab::CiPipeline => "Docker builds and registry",
            ConsoleTab::History => "Deployment history",
            ConsoleTab::SavedConfigs => "Saved configurations",
        }
    }

    /// The wizard domain shown on this tab, if it is a wizard tab.
    pub fn domain(&self) -> Option<Domain> {
        match self {
            ConsoleTab::Infrastructure => Some(Domain::Infrastructure),
            ConsoleTab::Applications => Some(Domain::Application),
            ConsoleTab::CiPipeline => Some(Domain::CiPipeline),
            _ => None,
        }
    }

    pub fn for_domain(domain: Domain) -> ConsoleTab {
        match domain {
            Domain::Infrastructure => ConsoleTab::Infrastructure,
            Domain::Application => ConsoleTab::Applications,
            Domain::CiPipeline => ConsoleTab::CiPipeline,
        }
    }
}

/// Which kind of deployment the header toggle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    #[default]
    Infrastructure,
    Application,
}

impl DeploymentMode {
    pub fn domain(&self) -> Domain {
        match self {
            DeploymentMode::Infrastructure => Domain::Infrastructure,
            DeploymentMode::Application => Domain::Application,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_flow_has_the_same_shape() {
        for domain in Domain::ALL {
            let steps: Vec<WizardStep> = flow(domain).iter().map(|info| info.step).collect();
            assert_eq!(
                steps,
                vec![
                    WizardStep::Configure,
                    WizardStep::Preview,
                    WizardStep::SourceControl,
                    WizardStep::Deploy
                ]
            );
        }
        assert_eq!(
            step_label(Domain::CiPipeline, WizardStep::Deploy),
            "Manage Pipeline"
        );
    }

    #[test]
    fn test_navigation_bounds() {
        assert_eq!(
            next_step(Domain::Application, WizardStep::Deploy),
            WizardStep::Deploy
        );
        assert_eq!(
            previous_step(Domain::Application, WizardStep::Configure),
            WizardStep::Configure
        );
        assert_eq!(
            next_step(Domain::Infrastructure, WizardStep::Preview),
            WizardStep::SourceControl
        );
    }

    #[test]
    fn test_tab_domain_mapping() {
        for domain in Domain::ALL {
            assert_eq!(ConsoleTab::for_domain(domain).domain(), Some(domain));
        }
        assert_eq!(ConsoleTab::History.domain(), None);
    }
}
