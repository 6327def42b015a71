//! Background polling of one dispatched workflow run.

use super::controller::{ControllerEvent, Envelope};
use super::status::{RunRef, StatusUpdate};
use crate::app::domain_config::{Domain, SourceControlLink};
use crate::app::github::{WorkflowApi, WorkflowRun};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs created this long before the dispatch still count as ours (clock skew).
const CREATED_AT_SLACK_SECS: i64 = 60;

/// What the monitor follows.
#[derive(Debug, Clone)]
pub struct MonitorTarget {
    pub domain: Domain,
    pub deployment_id: Uuid,
    pub link: SourceControlLink,
    pub workflow_file: String,
    pub dispatched_at: DateTime<Utc>,
    /// Newest run that existed before the dispatch; it and older runs are never adopted
    pub previous_run_id: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub interval: Duration,
    /// Polls spent waiting for the dispatched run to appear
    pub lookup_attempts: u32,
}

/// Handle to a polling task. Dropping it stops the task.
pub struct WorkflowMonitor {
    domain: Domain,
    deployment_id: Uuid,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkflowMonitor {
    pub fn spawn(
        runtime: &tokio::runtime::Handle,
        api: Arc<dyn WorkflowApi>,
        target: MonitorTarget,
        options: MonitorOptions,
        events: UnboundedSender<Envelope>,
    ) -> Self {
        let token = CancellationToken::new();
        let domain = target.domain;
        let deployment_id = target.deployment_id;
        info!(
            "Monitoring {} on {} every {:?}",
            target.workflow_file,
            target.link.full_name(),
            options.interval
        );
        let handle = runtime.spawn(poll_loop(api, target, options, token.clone(), events));
        Self {
            domain,
            deployment_id,
            token,
            handle,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn deployment_id(&self) -> Uuid {
        self.deployment_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for WorkflowMonitor {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("Stopping {} monitor {}", self.domain, self.deployment_id);
        }
        self.token.cancel();
    }
}

enum Poll {
    Continue,
    Done,
}

/// Whether `run` can be the one our dispatch created.
fn is_fresh(run: &WorkflowRun, target: &MonitorTarget) -> bool {
    if target.previous_run_id.is_some_and(|previous| run.id <= previous) {
        return false;
    }
    match run.created_at {
        Some(created) => {
            created >= target.dispatched_at - ChronoDuration::seconds(CREATED_AT_SLACK_SECS)
        }
        None => true,
    }
}

fn run_update(run: &WorkflowRun) -> StatusUpdate {
    if run.is_completed() {
        StatusUpdate::Completed {
            run_id: run.id,
            conclusion: run
                .conclusion
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            at: Utc::now(),
        }
    } else {
        StatusUpdate::Progress {
            run_id: run.id,
            github_status: run.status.clone(),
            at: Utc::now(),
        }
    }
}

struct Poller {
    api: Arc<dyn WorkflowApi>,
    target: MonitorTarget,
    options: MonitorOptions,
    events: UnboundedSender<Envelope>,
    run_id: Option<u64>,
    lookups: u32,
}

impl Poller {
    /// Returns false once the console has gone away.
    fn send(&self, update: StatusUpdate) -> bool {
        self.events
            .send(Envelope {
                deployment_id: self.target.deployment_id,
                event: ControllerEvent::StatusChanged(self.target.domain, update),
            })
            .is_ok()
    }

    fn fail(&self, message: String) -> Poll {
        warn!("{} monitor failed: {}", self.target.domain, message);
        self.send(StatusUpdate::Failed {
            message,
            at: Utc::now(),
        });
        Poll::Done
    }

    fn report(&self, run: &WorkflowRun) -> Poll {
        let update = run_update(run);
        let done = matches!(update, StatusUpdate::Completed { .. });
        if !self.send(update) || done {
            Poll::Done
        } else {
            Poll::Continue
        }
    }

    async fn poll_once(&mut self) -> Poll {
        let target = &self.target;
        match self.run_id {
            None => match self
                .api
                .latest_dispatched_run(&target.link, &target.workflow_file)
                .await
            {
                Ok(Some(run)) if is_fresh(&run, target) => {
                    debug!("Found run {} for {}", run.id, target.workflow_file);
                    self.run_id = Some(run.id);
                    if !self.send(StatusUpdate::RunFound(RunRef {
                        id: run.id,
                        html_url: run.html_url.clone(),
                    })) {
                        return Poll::Done;
                    }
                    self.report(&run)
                }
                Ok(_) => {
                    self.lookups += 1;
                    if self.lookups >= self.options.lookup_attempts {
                        self.fail(format!(
                            "No run of {} appeared after {} attempts",
                            target.workflow_file, self.lookups
                        ))
                    } else {
                        Poll::Continue
                    }
                }
                Err(e) => self.fail(format!("{:#}", e)),
            },
            Some(run_id) => match self.api.get_run(&target.link, run_id).await {
                Ok(run) => self.report(&run),
                Err(e) => self.fail(format!("{:#}", e)),
            },
        }
    }
}

async fn poll_loop(
    api: Arc<dyn WorkflowApi>,
    target: MonitorTarget,
    options: MonitorOptions,
    token: CancellationToken,
    events: UnboundedSender<Envelope>,
) {
    let mut ticker = interval_at(Instant::now() + options.interval, options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut poller = Poller {
        api,
        target,
        options,
        events,
        run_id: None,
        lookups: 0,
    };

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("{} monitor cancelled", poller.target.domain);
                return;
            }
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            outcome = poller.poll_once() => outcome,
        };
        if let Poll::Done = outcome {
            token.cancel();
            debug!("{} monitor finished", poller.target.domain);
            return;
        }
    }
}
