//! Reducer dispatch, deployment triggers and controller events

use super::super::DashApp;
use crate::app::deployment::{ControllerEvent, DispatchedDeployment, DeploymentRecord, StatusUpdate};
use crate::app::domain_config::Domain;
use crate::app::notifications::{dispatch_failed_id, Notice, NoticeSource};
use crate::app::storage::Slot;
use crate::app::wizard::{WizardAction, WizardStep};
use chrono::Utc;
use eframe::egui;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Repaint cadence while a run is being followed
const ACTIVE_REPAINT: Duration = Duration::from_millis(500);

impl DashApp {
    /// Runs one reducer step and persists the slots it touched.
    pub fn dispatch(&mut self, action: WizardAction) {
        let slots = Slot::affected_by(&action);
        let state = std::mem::take(&mut self.wizard);
        self.wizard = state.reduce(action);
        if let Some(store) = &self.services.store {
            for slot in slots {
                store.save_slot_from(slot, &self.wizard);
            }
        }
    }

    /// Asks the controller to dispatch the domain's workflow with the current
    /// configuration and moves the wizard to the deploy step.
    pub fn trigger_deploy(&mut self, domain: Domain) -> Option<Uuid> {
        let link = self.wizard.link(domain).clone();
        if !link.is_complete() {
            warn!("Ignoring {} deploy: repository link incomplete", domain);
            return None;
        }
        let Some(controller) = self.controller.as_mut() else {
            let message = "GitHub client is not configured".to_string();
            self.notices.post(Notice::dispatch_failed(domain, message.clone()));
            self.dispatch_errors.insert(domain, message);
            return None;
        };

        let deployment_id = controller.deploy(self.wizard.config(domain), link);
        self.dispatch_errors.remove(&domain);
        self.notices.dismiss(&dispatch_failed_id(domain));
        self.dispatch(WizardAction::GoToStep(domain, WizardStep::Deploy));
        Some(deployment_id)
    }

    /// Drains controller events into the wizard. Returns how many were applied.
    pub fn process_controller_events(&mut self) -> usize {
        let events = match self.controller.as_mut() {
            Some(controller) => controller.poll_events(),
            None => return 0,
        };
        let count = events.len();
        for event in events {
            self.apply_controller_event(event);
        }
        count
    }

    pub(super) fn handle_controller_events(&mut self, ctx: &egui::Context) {
        self.process_controller_events();

        let following = Domain::ALL.iter().any(|domain| {
            self.wizard.run_status(*domain).state.is_active()
                || self
                    .controller
                    .as_ref()
                    .is_some_and(|controller| controller.is_monitoring(*domain))
        });
        if following {
            ctx.request_repaint_after(ACTIVE_REPAINT);
        }
    }

    fn apply_controller_event(&mut self, event: ControllerEvent) {
        let domain = event.domain();
        match event {
            ControllerEvent::Dispatched(dispatched) => {
                self.record_deployment(&dispatched);
                self.notices.post(Notice::info(
                    format!("dispatched_{}", dispatched.deployment_id),
                    format!("{} workflow dispatched", domain.label()),
                    format!(
                        "{} on {}@{}",
                        dispatched.workflow_file,
                        dispatched.link.full_name(),
                        dispatched.link.git_ref()
                    ),
                    NoticeSource::Dispatch,
                ));
            }
            ControllerEvent::DispatchFailed { message, .. } => {
                self.dispatch(WizardAction::RunStatusChanged(
                    domain,
                    StatusUpdate::Failed {
                        message: message.clone(),
                        at: Utc::now(),
                    },
                ));
                self.notices.post(Notice::dispatch_failed(domain, message.clone()));
                self.dispatch_errors.insert(domain, message);
            }
            ControllerEvent::StatusChanged(_, update) => {
                self.dispatch(WizardAction::RunStatusChanged(domain, update));
            }
        }

        let config = self.wizard.config(domain);
        self.notices.sync_run_status(
            domain,
            config.project_name(),
            self.wizard.run_status(domain),
        );
    }

    /// Appends the `pending` history record for an accepted dispatch.
    fn record_deployment(&mut self, dispatched: &DispatchedDeployment) {
        let Some(history) = &self.services.history else {
            debug!("No history file; not recording {}", dispatched.deployment_id);
            return;
        };
        let record = match DeploymentRecord::pending(
            &dispatched.config,
            dispatched.link.full_name(),
            dispatched.workflow_url.clone(),
        ) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                error!("Failed to build deployment record: {:#}", e);
                return;
            }
        };
        if let Err(e) = history.append(&record) {
            warn!("Deployment not recorded: {:#}", e);
            self.notices.post(
                Notice::warning(
                    format!("history_{}", record.id),
                    "Deployment not recorded",
                    format!("{:#}", e),
                    NoticeSource::History,
                )
                .with_detail(history.path().display().to_string()),
            );
            return;
        }
        self.recent_deployments.insert(0, record);
    }

    pub(super) fn refresh_recent_deployments(&mut self) {
        self.recent_deployments = match &self.services.history {
            Some(history) => match history.load_all() {
                Ok(mut records) => {
                    records.reverse();
                    records
                }
                Err(e) => {
                    warn!("Failed to load deployment history: {:#}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
    }
}
