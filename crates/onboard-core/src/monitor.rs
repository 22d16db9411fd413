//! One pass of the onboarding progress monitor.
//!
//! Issues are processed one at a time. A failure on one issue is recorded in
//! its outcome and the pass moves on; only failing to list issues aborts the
//! run.

use crate::age::TimeInfo;
use crate::compose::{archival_notice, compose_comment, health_issue, health_issue_reference};
use crate::config::Config;
use crate::error::{OnboardError, Result};
use crate::guard::{skip_reason, SkipReason};
use crate::resolver::{ActionInfo, Resolver};
use crate::title::TitleParser;
use crate::tracker::Tracker;
use crate::types::{ActionKind, Issue, RateLimit};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

const HEALTH_SEARCH_PAGE: u32 = 5;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthSync {
    Updated { number: u64 },
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IssueResult {
    TitleMismatch,
    Extended,
    BeforeCutoff,
    NoAction,
    Skipped {
        action: ActionKind,
        reason: SkipReason,
    },
    Applied {
        action: ActionKind,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        health_issue: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        health_sync: Option<HealthSync>,
    },
    Failed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueOutcome {
    pub number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeInfo>,
    #[serde(flatten)]
    pub result: IssueResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub check_all: bool,
    pub listed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_before: Option<RateLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_after: Option<RateLimit>,
    pub outcomes: Vec<IssueOutcome>,
}

impl MonitorReport {
    pub fn applied(&self) -> usize {
        self.count(|r| matches!(r, IssueResult::Applied { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, IssueResult::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&IssueResult) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.result)).count()
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

pub struct Monitor<'a, T: Tracker + ?Sized> {
    tracker: &'a T,
    config: &'a Config,
    titles: TitleParser,
    resolver: Resolver,
    check_all: bool,
    sleep: fn(Duration),
}

enum Eligibility<'t> {
    Eligible(&'t str),
    Excluded(IssueResult),
}

impl<'a, T: Tracker + ?Sized> Monitor<'a, T> {
    pub fn new(tracker: &'a T, config: &'a Config) -> Result<Self> {
        Ok(Self {
            tracker,
            config,
            titles: TitleParser::new(&config.monitor.title_prefix)?,
            resolver: Resolver::default(),
            check_all: false,
            sleep: std::thread::sleep,
        })
    }

    /// Bulk reconciliation: existing milestone labels no longer suppress
    /// actions, so every eligible issue is brought to its current tier.
    pub fn check_all(mut self, check_all: bool) -> Self {
        self.check_all = check_all;
        self
    }

    /// Replace the inter-issue pause, which defaults to `thread::sleep`.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// Run one pass over all open onboarding issues as of `now`.
    pub fn run(&self, now: DateTime<Utc>) -> Result<MonitorReport> {
        let rate_limit_before = self.check_rate_limit();

        let cfg = &self.config.monitor;
        let issues = self
            .tracker
            .list_open_issues(&self.config.repo, &cfg.required_labels, cfg.page_size)
            .inspect_err(|e| error!(status = ?e.status(), "listing onboarding issues failed: {e}"))?;

        info!(count = issues.len(), repo = %self.config.repo, "found onboarding issues to check");
        if self.check_all {
            info!("reconciliation run: existing milestone labels are ignored");
        } else {
            info!("regular run: issues already carrying their milestone label are skipped");
        }

        let throttle = (issues.len() > cfg.throttle_after && cfg.throttle_delay_ms > 0)
            .then(|| Duration::from_millis(cfg.throttle_delay_ms));

        let mut outcomes = Vec::with_capacity(issues.len());
        for (i, issue) in issues.iter().enumerate() {
            if let Some(delay) = throttle.filter(|_| i > 0) {
                (self.sleep)(delay);
            }
            outcomes.push(self.process(issue, now));
        }

        let report = MonitorReport {
            check_all: self.check_all,
            listed: issues.len(),
            rate_limit_before,
            rate_limit_after: self.check_rate_limit(),
            outcomes,
        };
        info!(
            applied = report.applied(),
            failed = report.failed(),
            "onboarding progress monitoring completed"
        );
        Ok(report)
    }

    /// Evaluate and act on a single issue. Never fails: errors become a
    /// `Failed` outcome.
    pub fn process(&self, issue: &Issue, now: DateTime<Utc>) -> IssueOutcome {
        let project = match self.eligibility(issue) {
            Eligibility::Eligible(project) => project,
            Eligibility::Excluded(result) => {
                return IssueOutcome {
                    number: issue.number,
                    project: self.titles.project_name(&issue.title).map(str::to_string),
                    time: None,
                    result,
                }
            }
        };

        let time = TimeInfo::since(issue.created_at, now);
        info!(
            issue = issue.number,
            project,
            months = time.months,
            weeks = time.weeks,
            days = time.days,
            "processing onboarding issue"
        );

        let result = match self.resolver.resolve(&time) {
            None => {
                info!(issue = issue.number, "no action needed");
                IssueResult::NoAction
            }
            Some(action) => match skip_reason(issue, &action, self.check_all, now) {
                Some(reason) => {
                    info!(issue = issue.number, action = %action.action, %reason, "skipping");
                    IssueResult::Skipped {
                        action: action.action,
                        reason,
                    }
                }
                None => match self.apply(issue, project, &time, &action) {
                    Ok(result) => {
                        info!(issue = issue.number, "completed processing");
                        result
                    }
                    Err(e) => {
                        error!(issue = issue.number, status = ?e.status(), "processing failed: {e}");
                        if e.is_rate_limited() {
                            warn!("this may be a rate limit error; consider slowing down or waiting");
                        }
                        IssueResult::from(&e)
                    }
                },
            },
        };

        IssueOutcome {
            number: issue.number,
            project: Some(project.to_string()),
            time: Some(time),
            result,
        }
    }

    fn eligibility<'t>(&self, issue: &'t Issue) -> Eligibility<'t> {
        let cfg = &self.config.monitor;
        let Some(project) = self.titles.project_name(&issue.title) else {
            warn!(issue = issue.number, title = %issue.title, "skipping: title does not match onboarding format");
            return Eligibility::Excluded(IssueResult::TitleMismatch);
        };
        if issue.has_label(&cfg.extended_label) {
            info!(issue = issue.number, "skipping: timeline extension granted");
            return Eligibility::Excluded(IssueResult::Extended);
        }
        if issue.created_at < cfg.cutoff {
            info!(
                issue = issue.number,
                created = %issue.created_at.date_naive(),
                "skipping: created before monitoring cutoff"
            );
            return Eligibility::Excluded(IssueResult::BeforeCutoff);
        }
        Eligibility::Eligible(project)
    }

    fn apply(
        &self,
        issue: &Issue,
        project: &str,
        time: &TimeInfo,
        action: &ActionInfo,
    ) -> Result<IssueResult> {
        let repo = &self.config.repo;
        info!(issue = issue.number, action = %action.action, label = %action.label, "applying milestone");

        self.tracker
            .add_labels(repo, issue.number, std::slice::from_ref(&action.label))?;
        self.tracker
            .create_comment(repo, issue.number, &compose_comment(time, action, project))?;

        let mut health_issue_number = None;
        let mut health_sync = None;
        match action.action {
            ActionKind::CreateHealthIssue => {
                health_issue_number = self.file_health_issue(issue, project, time);
            }
            ActionKind::TagTeams => self.tag_teams(issue)?,
            ActionKind::Archive => {
                self.tracker.close_issue(repo, issue.number)?;
                info!(issue = issue.number, "closed onboarding issue");
                health_sync = Some(self.sync_health_issue(issue, project));
            }
            ActionKind::Comment | ActionKind::WeeklyWarning | ActionKind::DailyWarning => {}
        }

        Ok(IssueResult::Applied {
            action: action.action,
            label: action.label.clone(),
            health_issue: health_issue_number,
            health_sync,
        })
    }

    /// File the health issue and link it from the onboarding issue. Failures
    /// are logged and never undo the milestone; the number of a created
    /// health issue is always reported.
    fn file_health_issue(&self, issue: &Issue, project: &str, time: &TimeInfo) -> Option<u64> {
        let health_repo = &self.config.health_repo;
        let new = health_issue(
            project,
            &self.config.repo,
            issue.number,
            time.months,
            &self.config.health.labels,
        );
        let created = match self.tracker.create_issue(health_repo, &new) {
            Ok(Some(created)) => created,
            Ok(None) => {
                info!(issue = issue.number, "health issue not filed in {health_repo}");
                return None;
            }
            Err(e) => {
                error!(issue = issue.number, status = ?e.status(), "failed to create health issue in {health_repo}: {e}");
                return None;
            }
        };
        info!(issue = issue.number, health_issue = created.number, "created health issue in {health_repo}");

        if let Err(e) = self.tracker.create_comment(
            &self.config.repo,
            issue.number,
            &health_issue_reference(health_repo, created.number),
        ) {
            error!(
                issue = issue.number,
                health_issue = created.number,
                status = ?e.status(),
                "health issue created but linking it from the onboarding issue failed: {e}"
            );
        }
        Some(created.number)
    }

    fn tag_teams(&self, issue: &Issue) -> Result<()> {
        let assignees = &self.config.monitor.team_assignees;
        if assignees.is_empty() {
            info!(issue = issue.number, "no team assignees configured; skipping assignment");
            return Ok(());
        }
        self.tracker
            .add_assignees(&self.config.repo, issue.number, assignees)
    }

    /// Best effort: the archival already happened and is not rolled back.
    fn sync_health_issue(&self, issue: &Issue, project: &str) -> HealthSync {
        match self.try_sync_health_issue(issue, project) {
            Ok(Some(number)) => {
                info!(issue = issue.number, health_issue = number, "updated health issue");
                HealthSync::Updated { number }
            }
            Ok(None) => {
                warn!(issue = issue.number, "no matching health issue found in {}", self.config.health_repo);
                HealthSync::NotFound
            }
            Err(e) => {
                warn!(issue = issue.number, status = ?e.status(), "failed to update health issue: {e}");
                HealthSync::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn try_sync_health_issue(&self, issue: &Issue, project: &str) -> Result<Option<u64>> {
        let health_repo = &self.config.health_repo;
        let results = self
            .tracker
            .search_issues(&self.health_search_query(project), HEALTH_SEARCH_PAGE)?;
        let Some(health) = results.items.first().filter(|_| results.total_count > 0) else {
            return Ok(None);
        };
        self.tracker.create_comment(
            health_repo,
            health.number,
            &archival_notice(&self.config.repo, issue.number),
        )?;
        Ok(Some(health.number))
    }

    pub fn health_search_query(&self, project: &str) -> String {
        format!(
            "repo:{} is:issue is:open label:{} \"{}\" in:title",
            self.config.health_repo,
            self.config.health.search_label,
            project
        )
    }

    /// Log remaining API quota. Telemetry failures are never fatal.
    fn check_rate_limit(&self) -> Option<RateLimit> {
        match self.tracker.rate_limit() {
            Ok(rate) => {
                let reset = rate
                    .reset_at()
                    .map(|r| r.to_rfc3339())
                    .unwrap_or_else(|| rate.reset.to_string());
                info!(
                    remaining = rate.remaining,
                    limit = rate.limit,
                    reset = %reset,
                    "API rate limit"
                );
                if rate.remaining < self.config.monitor.low_rate_limit {
                    warn!(remaining = rate.remaining, "low API rate limit remaining");
                }
                Some(rate)
            }
            Err(e) => {
                warn!("could not check rate limit: {e}");
                None
            }
        }
    }
}

/// Run a monitor pass with the default resolver.
pub fn monitor_onboarding_progress<T: Tracker + ?Sized>(
    tracker: &T,
    config: &Config,
    check_all: bool,
    now: DateTime<Utc>,
) -> Result<MonitorReport> {
    Monitor::new(tracker, config)?.check_all(check_all).run(now)
}

impl From<&OnboardError> for IssueResult {
    fn from(e: &OnboardError) -> Self {
        IssueResult::Failed {
            message: e.to_string(),
            status: e.status(),
        }
    }
}
