use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Milestone labels
// ---------------------------------------------------------------------------

pub mod labels {
    pub const INCOMPLETE: &str = "onboarding/incomplete";
    pub const STALE: &str = "onboarding/stale";
    pub const WARNING: &str = "onboarding/warning";
    pub const APPROACHING_ARCHIVAL: &str = "onboarding/approaching-archival";
    pub const ARCHIVED: &str = "onboarding/archived";
    /// Timeline extension granted by staff; such issues are never escalated.
    pub const EXTENDED: &str = "onboarding/extended";
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Comment,
    TagTeams,
    CreateHealthIssue,
    WeeklyWarning,
    DailyWarning,
    Archive,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Comment,
            ActionKind::TagTeams,
            ActionKind::CreateHealthIssue,
            ActionKind::WeeklyWarning,
            ActionKind::DailyWarning,
            ActionKind::Archive,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Comment => "comment",
            ActionKind::TagTeams => "tag_teams",
            ActionKind::CreateHealthIssue => "create_health_issue",
            ActionKind::WeeklyWarning => "weekly_warning",
            ActionKind::DailyWarning => "daily_warning",
            ActionKind::Archive => "archive",
        }
    }

    /// Warnings repeat within a tier, so they are rate-limited by activity
    /// time rather than deduplicated by label.
    pub fn is_recurring(self) -> bool {
        matches!(self, ActionKind::WeeklyWarning | ActionKind::DailyWarning)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(ActionKind::Comment),
            "tag_teams" => Ok(ActionKind::TagTeams),
            "create_health_issue" => Ok(ActionKind::CreateHealthIssue),
            "weekly_warning" => Ok(ActionKind::WeeklyWarning),
            "daily_warning" => Ok(ActionKind::DailyWarning),
            "archive" => Ok(ActionKind::Archive),
            _ => Err(crate::error::OnboardError::InvalidAction(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Repo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl Repo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn issue_url(&self, number: u64) -> String {
        format!("https://github.com/{}/{}/issues/{number}", self.owner, self.name)
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ---------------------------------------------------------------------------
// Issue (as returned by the tracker; read-only to the core)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => f.write_str("open"),
            IssueState::Closed => f.write_str("closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Issue {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}

/// Payload for creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Issue>,
}

// ---------------------------------------------------------------------------
// RateLimit telemetry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    /// Reset time as a unix timestamp (seconds).
    pub reset: i64,
}

impl RateLimit {
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.reset, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_parses_its_own_name() {
        for kind in ActionKind::all() {
            let parsed: ActionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
        assert!("escalate".parse::<ActionKind>().is_err());
    }

    #[test]
    fn only_warnings_are_recurring() {
        let recurring: Vec<_> = ActionKind::all()
            .iter()
            .filter(|k| k.is_recurring())
            .collect();
        assert_eq!(
            recurring,
            vec![&ActionKind::WeeklyWarning, &ActionKind::DailyWarning]
        );
    }

    #[test]
    fn issue_deserializes_from_github_payload() {
        let json = r#"{
            "number": 42,
            "title": "[PROJECT ONBOARDING] Foo",
            "state": "open",
            "created_at": "2025-11-01T12:00:00Z",
            "updated_at": "2025-12-01T12:00:00Z",
            "comments": 3,
            "labels": [{"name": "sandbox", "color": "ffffff"}],
            "html_url": "https://github.com/cncf/sandbox/issues/42"
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.comments, 3);
        assert!(issue.has_label("sandbox"));
        assert!(!issue.has_label("onboarding/stale"));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let json = r#"{
            "number": 1,
            "title": "x",
            "created_at": "yesterday",
            "updated_at": "2025-12-01T12:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Issue>(json).is_err());
    }

    #[test]
    fn new_issue_omits_empty_lists() {
        let issue = NewIssue {
            title: "t".to_string(),
            body: "b".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("labels"));
        assert!(!json.contains("assignees"));
    }

    #[test]
    fn repo_display_and_url() {
        let repo = Repo::new("cncf", "toc");
        assert_eq!(repo.to_string(), "cncf/toc");
        assert_eq!(repo.issue_url(7), "https://github.com/cncf/toc/issues/7");
    }
}
