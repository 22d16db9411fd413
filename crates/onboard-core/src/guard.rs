//! Idempotency guard: decides from an issue's labels and activity timestamps
//! whether a resolved milestone action has already been carried out.
//!
//! There is no other record of past runs. Labels mark which tier an issue has
//! been escalated to; activity time rate-limits the recurring month-11
//! warnings. A run that crashed after labelling but before commenting is
//! treated as handled for that tier.

use crate::resolver::ActionInfo;
use crate::types::{ActionKind, Issue};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAILY_WARNING_INTERVAL_HOURS: i64 = 20;
pub const WEEKLY_WARNING_INTERVAL_DAYS: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    RecentDailyWarning,
    RecentWeeklyWarning,
    LabelPresent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::RecentDailyWarning => "activity within the last 20 hours",
            SkipReason::RecentWeeklyWarning => "activity within the last 6 days",
            SkipReason::LabelPresent => "milestone label already applied",
        };
        f.write_str(s)
    }
}

/// Last time anyone touched the issue: `updated_at` once it has comments,
/// otherwise its creation time.
pub fn last_activity(issue: &Issue) -> DateTime<Utc> {
    if issue.comments > 0 {
        issue.updated_at
    } else {
        issue.created_at
    }
}

/// Why `action` should not be applied to `issue` right now, if at all.
///
/// With `check_all` (bulk reconciliation) only the activity-time checks
/// apply, so existing milestone labels never block a re-application.
pub fn skip_reason(
    issue: &Issue,
    action: &ActionInfo,
    check_all: bool,
    now: DateTime<Utc>,
) -> Option<SkipReason> {
    let idle = now - last_activity(issue);
    match action.action {
        ActionKind::DailyWarning => {
            (idle < Duration::hours(DAILY_WARNING_INTERVAL_HOURS))
                .then_some(SkipReason::RecentDailyWarning)
        }
        ActionKind::WeeklyWarning => {
            (idle < Duration::days(WEEKLY_WARNING_INTERVAL_DAYS))
                .then_some(SkipReason::RecentWeeklyWarning)
        }
        _ if check_all => None,
        _ => issue
            .has_label(&action.label)
            .then_some(SkipReason::LabelPresent),
    }
}

pub fn should_skip(issue: &Issue, action: &ActionInfo, check_all: bool, now: DateTime<Utc>) -> bool {
    skip_reason(issue, action, check_all, now).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::TimeInfo;
    use crate::resolver::resolve;
    use crate::types::{labels, IssueState, Label};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-18T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn issue(age_days: i64, comments: u32, updated_ago: Duration, label_names: &[&str]) -> Issue {
        Issue {
            number: 1,
            title: "[PROJECT ONBOARDING] Foo".to_string(),
            state: IssueState::Open,
            created_at: now() - Duration::days(age_days),
            updated_at: now() - updated_ago,
            comments,
            labels: label_names
                .iter()
                .map(|n| Label {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    fn action_at(days: i64) -> ActionInfo {
        resolve(&TimeInfo::from_days(days)).unwrap()
    }

    #[test]
    fn last_activity_uses_creation_without_comments() {
        let i = issue(100, 0, Duration::hours(1), &[]);
        assert_eq!(last_activity(&i), i.created_at);
        let i = issue(100, 2, Duration::hours(1), &[]);
        assert_eq!(last_activity(&i), i.updated_at);
    }

    #[test]
    fn daily_warning_waits_twenty_hours() {
        let action = action_at(355);
        let recent = issue(355, 5, Duration::hours(19) + Duration::minutes(59), &[]);
        assert_eq!(
            skip_reason(&recent, &action, false, now()),
            Some(SkipReason::RecentDailyWarning)
        );
        let due = issue(355, 5, Duration::hours(20), &[]);
        assert!(!should_skip(&due, &action, false, now()));
    }

    #[test]
    fn weekly_warning_waits_six_days() {
        let action = action_at(340);
        let recent = issue(340, 1, Duration::days(5) + Duration::hours(23), &[]);
        assert_eq!(
            skip_reason(&recent, &action, false, now()),
            Some(SkipReason::RecentWeeklyWarning)
        );
        let due = issue(340, 1, Duration::days(6), &[]);
        assert!(!should_skip(&due, &action, false, now()));
    }

    #[test]
    fn warnings_ignore_existing_label() {
        let action = action_at(340);
        let i = issue(340, 1, Duration::days(7), &[labels::APPROACHING_ARCHIVAL]);
        assert!(!should_skip(&i, &action, false, now()));
    }

    #[test]
    fn warnings_keep_time_checks_in_check_all_mode() {
        let daily = action_at(355);
        let i = issue(355, 1, Duration::hours(2), &[]);
        assert!(should_skip(&i, &daily, true, now()));
        let weekly = action_at(340);
        let i = issue(340, 1, Duration::days(1), &[]);
        assert!(should_skip(&i, &weekly, true, now()));
    }

    #[test]
    fn label_present_skips_in_normal_mode() {
        let action = action_at(185);
        assert_eq!(action.label, labels::STALE);
        let i = issue(185, 3, Duration::days(1), &[labels::STALE]);
        assert_eq!(
            skip_reason(&i, &action, false, now()),
            Some(SkipReason::LabelPresent)
        );
    }

    #[test]
    fn label_present_ignored_in_check_all_mode() {
        let action = action_at(185);
        let i = issue(185, 3, Duration::days(1), &[labels::STALE]);
        assert!(!should_skip(&i, &action, true, now()));
    }

    #[test]
    fn lower_tier_label_does_not_block_higher_tier() {
        let action = action_at(275);
        let i = issue(275, 3, Duration::days(1), &[labels::INCOMPLETE, labels::STALE]);
        assert!(!should_skip(&i, &action, false, now()));
    }

    #[test]
    fn fresh_issue_at_first_milestone_is_not_skipped() {
        let action = action_at(95);
        let i = issue(95, 0, Duration::days(95), &[]);
        assert!(!should_skip(&i, &action, false, now()));
    }
}
