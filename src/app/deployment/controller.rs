//! Runs dispatches off the UI thread and owns the per-domain run monitors.
//!
//! The UI calls [`DeploymentController::deploy`] and drains
//! [`DeploymentController::poll_events`] once per frame. Events belonging to a
//! superseded deployment of the same domain are dropped before they reach the UI.

use super::monitor::{MonitorOptions, MonitorTarget, WorkflowMonitor};
use super::status::StatusUpdate;
use crate::app::domain_config::{Domain, DomainConfig, SourceControlLink};
use crate::app::github::{workflow_page_url, WorkflowApi};
use crate::app::preview::workflow_inputs;
use crate::app::settings::{ConsoleSettings, WorkflowFiles};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// A dispatch GitHub accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedDeployment {
    pub deployment_id: Uuid,
    pub domain: Domain,
    /// Configuration as it was when the user triggered the deployment
    pub config: DomainConfig,
    pub link: SourceControlLink,
    pub workflow_file: String,
    pub workflow_url: String,
    pub dispatched_at: DateTime<Utc>,
    pub previous_run_id: Option<u64>,
}

/// Results delivered to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Dispatched(DispatchedDeployment),
    DispatchFailed { domain: Domain, message: String },
    StatusChanged(Domain, StatusUpdate),
}

impl ControllerEvent {
    pub fn domain(&self) -> Domain {
        match self {
            ControllerEvent::Dispatched(dispatched) => dispatched.domain,
            ControllerEvent::DispatchFailed { domain, .. } => *domain,
            ControllerEvent::StatusChanged(domain, _) => *domain,
        }
    }
}

/// Channel message: an event tagged with the deployment it belongs to.
#[derive(Debug)]
pub struct Envelope {
    pub deployment_id: Uuid,
    pub event: ControllerEvent,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub monitor: MonitorOptions,
    pub workflows: WorkflowFiles,
}

impl From<&ConsoleSettings> for ControllerOptions {
    fn from(settings: &ConsoleSettings) -> Self {
        Self {
            monitor: MonitorOptions {
                interval: settings.poll_interval(),
                lookup_attempts: settings.run_lookup_attempts(),
            },
            workflows: settings.workflows.clone(),
        }
    }
}

pub struct DeploymentController {
    /// Present when the controller created its own runtime
    runtime: Option<Runtime>,
    handle: Handle,
    api: Arc<dyn WorkflowApi>,
    options: ControllerOptions,
    events_tx: UnboundedSender<Envelope>,
    events_rx: UnboundedReceiver<Envelope>,
    current: HashMap<Domain, Uuid>,
    monitors: HashMap<Domain, WorkflowMonitor>,
}

impl DeploymentController {
    /// Creates a controller with its own multi-threaded runtime.
    pub fn new(api: Arc<dyn WorkflowApi>, options: ControllerOptions) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("iacdash-deploy")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        let handle = runtime.handle().clone();
        let mut controller = Self::with_handle(handle, api, options);
        controller.runtime = Some(runtime);
        Ok(controller)
    }

    /// Creates a controller that spawns onto an existing runtime.
    pub fn with_handle(handle: Handle, api: Arc<dyn WorkflowApi>, options: ControllerOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            runtime: None,
            handle,
            api,
            options,
            events_tx,
            events_rx,
            current: HashMap::new(),
            monitors: HashMap::new(),
        }
    }

    /// Swaps the API client and options, e.g. after the settings changed.
    /// Running monitors keep the client they started with.
    pub fn reconfigure(&mut self, api: Arc<dyn WorkflowApi>, options: ControllerOptions) {
        self.api = api;
        self.options = options;
    }

    pub fn workflow_file(&self, domain: Domain) -> &str {
        self.options.workflows.for_domain(domain)
    }

    pub fn is_monitoring(&self, domain: Domain) -> bool {
        self.monitors
            .get(&domain)
            .is_some_and(|monitor| !monitor.is_finished())
    }

    /// Starts a deployment of `config` through `link`.
    ///
    /// Any earlier deployment of the same domain stops being followed.
    pub fn deploy(&mut self, config: DomainConfig, link: SourceControlLink) -> Uuid {
        let domain = config.domain();
        let deployment_id = Uuid::new_v4();
        if let Some(previous) = self.monitors.remove(&domain) {
            debug!("Superseding {} deployment {}", domain, previous.deployment_id());
        }
        self.current.insert(domain, deployment_id);

        let _ = self.events_tx.send(Envelope {
            deployment_id,
            event: ControllerEvent::StatusChanged(
                domain,
                StatusUpdate::Triggered { at: Utc::now() },
            ),
        });

        let workflow_file = self.workflow_file(domain).to_string();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        info!(
            "Dispatching {} deployment {} via {} on {}",
            domain,
            deployment_id,
            workflow_file,
            link.full_name()
        );

        self.handle.spawn(async move {
            let inputs = workflow_inputs(&config);
            // Dispatch returns no run id; remember what was already there
            let previous_run_id = match api.latest_dispatched_run(&link, &workflow_file).await {
                Ok(run) => run.map(|run| run.id),
                Err(e) => {
                    warn!("Could not list existing runs of {}: {:#}", workflow_file, e);
                    None
                }
            };
            let dispatched_at = Utc::now();
            let event = match api.dispatch_workflow(&link, &workflow_file, &inputs).await {
                Ok(()) => ControllerEvent::Dispatched(DispatchedDeployment {
                    deployment_id,
                    domain,
                    workflow_url: workflow_page_url(&link, &workflow_file),
                    config,
                    link,
                    workflow_file,
                    dispatched_at,
                    previous_run_id,
                }),
                Err(e) => {
                    error!("Dispatch of {} deployment failed: {:#}", domain, e);
                    ControllerEvent::DispatchFailed {
                        domain,
                        message: format!("{:#}", e),
                    }
                }
            };
            if tx.send(Envelope { deployment_id, event }).is_err() {
                warn!("Console closed before dispatch result was delivered");
            }
        });

        deployment_id
    }

    /// Drains pending events. Starts monitors for accepted dispatches and
    /// releases monitors whose run reached a terminal state.
    pub fn poll_events(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        loop {
            let envelope = match self.events_rx.try_recv() {
                Ok(envelope) => envelope,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            let domain = envelope.event.domain();
            if self.current.get(&domain) != Some(&envelope.deployment_id) {
                debug!(
                    "Dropping event of superseded {} deployment {}",
                    domain, envelope.deployment_id
                );
                continue;
            }

            match &envelope.event {
                ControllerEvent::Dispatched(dispatched) => self.start_monitor(dispatched),
                ControllerEvent::StatusChanged(
                    _,
                    StatusUpdate::Completed { .. } | StatusUpdate::Failed { .. },
                ) => {
                    self.monitors.remove(&domain);
                }
                _ => {}
            }
            events.push(envelope.event);
        }
        events
    }

    fn start_monitor(&mut self, dispatched: &DispatchedDeployment) {
        let monitor = WorkflowMonitor::spawn(
            &self.handle,
            Arc::clone(&self.api),
            MonitorTarget {
                domain: dispatched.domain,
                deployment_id: dispatched.deployment_id,
                link: dispatched.link.clone(),
                workflow_file: dispatched.workflow_file.clone(),
                dispatched_at: dispatched.dispatched_at,
                previous_run_id: dispatched.previous_run_id,
            },
            self.options.monitor,
            self.events_tx.clone(),
        );
        self.monitors.insert(dispatched.domain, monitor);
    }
}

impl Drop for DeploymentController {
    fn drop(&mut self) {
        self.monitors.clear();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
