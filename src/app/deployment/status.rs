use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle of one domain's workflow run as seen by the console
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Nothing triggered yet
    #[default]
    Idle,
    /// Dispatch sent, run queued or in progress
    Deploying,
    /// Run completed with a `success` conclusion
    Success,
    /// Dispatch failed, polling failed or the run concluded unsuccessfully
    Error(String),
}

impl RunState {
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Deploying)
    }

    pub fn description(&self) -> &'static str {
        match self {
            RunState::Idle => "Not deployed",
            RunState::Deploying => "Deploying",
            RunState::Success => "Deployment successful",
            RunState::Error(_) => "Deployment failed",
        }
    }
}

/// A GitHub Actions run the console is following.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRef {
    pub id: u64,
    pub html_url: String,
}

/// Inputs to the run state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The user started a new deployment
    Triggered { at: DateTime<Utc> },
    /// The dispatched run was located
    RunFound(RunRef),
    /// A poll returned a non-final GitHub status (`queued`, `in_progress`, ...)
    Progress {
        run_id: u64,
        github_status: String,
        at: DateTime<Utc>,
    },
    /// A poll returned a completed run
    Completed {
        run_id: u64,
        conclusion: String,
        at: DateTime<Utc>,
    },
    /// Dispatch or polling failed
    Failed { message: String, at: DateTime<Utc> },
}

/// Per-domain run status shown on the status panel and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStatus {
    pub state: RunState,
    pub run: Option<RunRef>,
    /// Last raw status reported by GitHub
    pub github_status: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_polled: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStatus {
    /// Applies an update and returns the resulting status.
    ///
    /// Only `Triggered` leaves a terminal state. Poll results for a run other
    /// than the one being followed are dropped.
    pub fn apply(self, update: StatusUpdate) -> RunStatus {
        if let StatusUpdate::Triggered { at } = update {
            debug!("Run status {:?} -> Deploying (new trigger)", self.state);
            return RunStatus {
                state: RunState::Deploying,
                started_at: Some(at),
                ..RunStatus::default()
            };
        }

        if !self.state.is_active() {
            debug!("Ignoring {:?} while {:?}", update, self.state);
            return self;
        }

        let follows = |run_id: u64| self.run.as_ref().is_some_and(|run| run.id == run_id);

        match update {
            StatusUpdate::Triggered { .. } => self,
            StatusUpdate::RunFound(run) => {
                if self.run.is_some() {
                    return self;
                }
                RunStatus {
                    run: Some(run),
                    ..self
                }
            }
            StatusUpdate::Progress {
                run_id,
                github_status,
                at,
            } => {
                if !follows(run_id) {
                    return self;
                }
                RunStatus {
                    github_status: Some(github_status),
                    last_polled: Some(at),
                    ..self
                }
            }
            StatusUpdate::Completed {
                run_id,
                conclusion,
                at,
            } => {
                if !follows(run_id) {
                    return self;
                }
                let state = if conclusion == "success" {
                    RunState::Success
                } else {
                    RunState::Error(format!("Workflow run concluded: {}", conclusion))
                };
                debug!("Run {} finished as {:?}", run_id, state);
                RunStatus {
                    state,
                    github_status: Some("completed".to_string()),
                    last_polled: Some(at),
                    finished_at: Some(at),
                    ..self
                }
            }
            StatusUpdate::Failed { message, at } => RunStatus {
                state: RunState::Error(message),
                last_polled: Some(at),
                finished_at: Some(at),
                ..self
            },
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            RunState::Error(message) => Some(message),
            _ => None,
        }
    }
}
