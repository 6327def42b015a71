//! Console notices shown in the status bar.
//!
//! Two kinds live on the board: short messages (dispatch failures, settings
//! problems, history write errors) that may expire, and one persistent run
//! notice per domain mirroring that domain's [`RunStatus`].

use crate::app::deployment::{RunState, RunStatus};
use crate::app::domain_config::Domain;
use egui::Color32;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub mod details_window;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 50, 50);
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 150, 0);
const INFO_COLOR: Color32 = Color32::from_rgb(70, 130, 200);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 180, 40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Errors stay until dismissed.
    fn lifetime(self) -> Option<Duration> {
        match self {
            Severity::Error => None,
            Severity::Warning => Some(Duration::from_secs(30)),
            Severity::Info => Some(Duration::from_secs(10)),
        }
    }
}

/// Part of the console a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    Startup,
    Settings,
    Dispatch,
    Run,
    History,
}

impl NoticeSource {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeSource::Startup => "Startup",
            NoticeSource::Settings => "Settings",
            NoticeSource::Dispatch => "Workflow Dispatch",
            NoticeSource::Run => "Workflow Run",
            NoticeSource::History => "Deployment History",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Active,
    Succeeded,
    Failed,
}

/// Live state of one domain's deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunNotice {
    pub domain: Domain,
    pub project_name: String,
    pub run_url: Option<String>,
    pub phase: RunPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeKind {
    Message(Severity),
    Run(RunNotice),
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
    pub source: NoticeSource,
    pub kind: NoticeKind,
    pub created_at: Instant,
    pub expires_at: Option<Instant>,
}

/// Board key of a domain's run notice.
fn run_notice_id(domain: Domain) -> String {
    format!("run_{}", domain)
}

/// Board key of a domain's dispatch failure.
pub fn dispatch_failed_id(domain: Domain) -> String {
    format!("dispatch_failed_{}", domain)
}

impl Notice {
    fn message(
        severity: Severity,
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NoticeSource,
    ) -> Self {
        let created_at = Instant::now();
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            detail: None,
            source,
            kind: NoticeKind::Message(severity),
            created_at,
            expires_at: severity.lifetime().map(|lifetime| created_at + lifetime),
        }
    }

    pub fn error(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NoticeSource,
    ) -> Self {
        Self::message(Severity::Error, id, title, message, source)
    }

    pub fn warning(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NoticeSource,
    ) -> Self {
        Self::message(Severity::Warning, id, title, message, source)
    }

    pub fn info(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NoticeSource,
    ) -> Self {
        Self::message(Severity::Info, id, title, message, source)
    }

    pub fn dispatch_failed(domain: Domain, message: impl Into<String>) -> Self {
        Self::error(
            dispatch_failed_id(domain),
            format!("{} dispatch failed", domain.label()),
            message,
            NoticeSource::Dispatch,
        )
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn run(notice: RunNotice, message: String) -> Self {
        Self {
            id: run_notice_id(notice.domain),
            title: format!("{} deployment", notice.domain.label()),
            message,
            detail: None,
            source: NoticeSource::Run,
            kind: NoticeKind::Run(notice),
            created_at: Instant::now(),
            expires_at: None,
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match &self.kind {
            NoticeKind::Message(severity) => Some(*severity),
            NoticeKind::Run(_) => None,
        }
    }

    pub fn run_notice(&self) -> Option<&RunNotice> {
        match &self.kind {
            NoticeKind::Run(run) => Some(run),
            NoticeKind::Message(_) => None,
        }
    }

    /// Run notices are replaced, never dismissed.
    pub fn is_dismissible(&self) -> bool {
        matches!(self.kind, NoticeKind::Message(_))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() > at)
    }

    pub fn color(&self) -> Color32 {
        match &self.kind {
            NoticeKind::Message(Severity::Error) => ERROR_COLOR,
            NoticeKind::Message(Severity::Warning) => WARNING_COLOR,
            NoticeKind::Message(Severity::Info) => INFO_COLOR,
            NoticeKind::Run(run) => match run.phase {
                RunPhase::Active => INFO_COLOR,
                RunPhase::Succeeded => SUCCESS_COLOR,
                RunPhase::Failed => ERROR_COLOR,
            },
        }
    }

    pub fn icon(&self) -> &'static str {
        match &self.kind {
            NoticeKind::Message(Severity::Error) => "✗",
            NoticeKind::Message(Severity::Warning) => "⚠",
            NoticeKind::Message(Severity::Info) => "ℹ",
            NoticeKind::Run(run) => match run.phase {
                RunPhase::Active => "⟳",
                RunPhase::Succeeded => "☁",
                RunPhase::Failed => "✗",
            },
        }
    }
}

#[derive(Default)]
pub struct NoticeBoard {
    notices: HashMap<String, Notice>,
    /// Notice shown in the details window
    pub selected: Option<String>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `notice`, replacing one with the same id.
    pub fn post(&mut self, notice: Notice) {
        self.notices.insert(notice.id.clone(), notice);
    }

    pub fn dismiss(&mut self, id: &str) {
        self.notices.remove(id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
    }

    pub fn get(&self, id: &str) -> Option<&Notice> {
        self.notices.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn prune_expired(&mut self) {
        self.notices.retain(|_, notice| !notice.is_expired());
        if let Some(id) = &self.selected {
            if !self.notices.contains_key(id) {
                self.selected = None;
            }
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .values()
            .filter(|notice| notice.severity() == Some(severity))
            .count()
    }

    pub fn open_details(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Newest message of the given severity.
    fn newest(&self, severity: Severity) -> Option<&Notice> {
        self.notices
            .values()
            .filter(|notice| notice.severity() == Some(severity))
            .max_by_key(|notice| notice.created_at)
    }

    /// Mirrors a domain's run status into its run notice. `Idle` removes it.
    pub fn sync_run_status(&mut self, domain: Domain, project_name: &str, status: &RunStatus) {
        let (phase, message) = match &status.state {
            RunState::Idle => {
                self.notices.remove(&run_notice_id(domain));
                return;
            }
            RunState::Deploying => {
                let progress = status
                    .github_status
                    .as_deref()
                    .map(|s| s.replace('_', " "))
                    .unwrap_or_else(|| "dispatching".to_string());
                (RunPhase::Active, format!("{}: {}", project_name, progress))
            }
            RunState::Success => (
                RunPhase::Succeeded,
                format!("{}: deployment succeeded", project_name),
            ),
            RunState::Error(message) => {
                (RunPhase::Failed, format!("{}: {}", project_name, message))
            }
        };
        let run = RunNotice {
            domain,
            project_name: project_name.to_string(),
            run_url: status.run.as_ref().map(|run| run.html_url.clone()),
            phase,
        };

        match self.notices.get_mut(&run_notice_id(domain)) {
            Some(existing) => {
                existing.message = message;
                existing.kind = NoticeKind::Run(run);
            }
            None => self.post(Notice::run(run, message)),
        }
    }

    /// Run notices in domain order, then error and warning counters.
    pub fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        self.prune_expired();
        if self.notices.is_empty() {
            return;
        }
        ui.separator();

        let mut clicked = None;
        for domain in Domain::ALL {
            let Some(notice) = self.notices.get(&run_notice_id(domain)) else {
                continue;
            };
            let active = notice
                .run_notice()
                .is_some_and(|run| run.phase == RunPhase::Active);
            ui.horizontal(|ui| {
                if active {
                    ui.add(egui::Spinner::new().size(16.0));
                } else {
                    ui.colored_label(notice.color(), notice.icon());
                }
                if ui.colored_label(notice.color(), &notice.message).clicked() {
                    clicked = Some(notice.id.clone());
                }
            });
        }

        for (severity, color, icon, noun) in [
            (Severity::Error, ERROR_COLOR, "✗", "error"),
            (Severity::Warning, WARNING_COLOR, "⚠", "warning"),
        ] {
            let count = self.count(severity);
            if count == 0 {
                continue;
            }
            let text = if count == 1 {
                format!("{} 1 {}", icon, noun)
            } else {
                format!("{} {} {}s", icon, count, noun)
            };
            if ui.colored_label(color, text).clicked() {
                clicked = self.newest(severity).map(|notice| notice.id.clone());
            }
        }

        if let Some(id) = clicked {
            self.open_details(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::deployment::StatusUpdate;
    use chrono::Utc;

    #[test]
    fn test_run_status_is_mirrored_per_domain() {
        let mut board = NoticeBoard::new();
        let deploying = RunStatus::default().apply(StatusUpdate::Triggered { at: Utc::now() });

        board.sync_run_status(Domain::Infrastructure, "prod-gke-1", &deploying);
        assert_eq!(
            board.get("run_infrastructure").unwrap().message,
            "prod-gke-1: dispatching"
        );
        assert_eq!(
            board.get("run_infrastructure").unwrap().run_notice().unwrap().phase,
            RunPhase::Active
        );
        assert!(board.get("run_application").is_none());

        let failed = deploying.apply(StatusUpdate::Failed {
            message: "GitHub API error 404: Not Found".to_string(),
            at: Utc::now(),
        });
        board.sync_run_status(Domain::Infrastructure, "prod-gke-1", &failed);
        let notice = board.get("run_infrastructure").unwrap();
        assert_eq!(notice.run_notice().unwrap().phase, RunPhase::Failed);
        assert!(notice.message.contains("404"));
        assert!(!notice.is_dismissible());

        board.sync_run_status(Domain::Infrastructure, "prod-gke-1", &RunStatus::default());
        assert!(board.is_empty());
    }

    #[test]
    fn test_dispatch_failure_is_replaced_and_dismissed() {
        let mut board = NoticeBoard::new();
        board.post(Notice::dispatch_failed(Domain::Application, "bad credentials"));
        board.post(Notice::dispatch_failed(Domain::Application, "GitHub API error 401"));
        assert_eq!(board.count(Severity::Error), 1);
        assert_eq!(
            board.get(&dispatch_failed_id(Domain::Application)).unwrap().message,
            "GitHub API error 401"
        );

        board.open_details(dispatch_failed_id(Domain::Application));
        board.dismiss(&dispatch_failed_id(Domain::Application));
        assert_eq!(board.count(Severity::Error), 0);
        assert!(board.selected.is_none());
    }

    #[test]
    fn test_expired_messages_are_pruned() {
        let mut board = NoticeBoard::new();
        let mut stale = Notice::info("dispatched", "Dispatched", "ok", NoticeSource::Dispatch);
        stale.expires_at = Some(Instant::now() - Duration::from_secs(1));
        board.post(stale);
        board.post(Notice::warning(
            "settings_save",
            "Settings not saved",
            "read-only file system",
            NoticeSource::Settings,
        ));
        board.open_details("dispatched");

        board.prune_expired();
        assert!(board.get("dispatched").is_none());
        assert!(board.selected.is_none());
        assert_eq!(board.count(Severity::Warning), 1);
    }
}
