use crate::age::TimeInfo;
use crate::resolver::Rule;
use crate::types::{labels, ActionKind};

// ---------------------------------------------------------------------------
// Milestone thresholds (30-day months)
// ---------------------------------------------------------------------------

pub const INCOMPLETE_MONTH: i64 = 3;
pub const STALE_MONTH: i64 = 6;
pub const WARNING_MONTH: i64 = 9;
pub const HEALTH_ISSUE_MONTH: i64 = 10;
pub const FINAL_MONTH: i64 = 11;
pub const ARCHIVE_MONTH: i64 = 12;

/// Week of month 11 in which warnings switch from weekly to daily.
pub const DAILY_WARNING_WEEK: u32 = 4;

macro_rules! rule {
    (id: $id:expr, condition: $cond:expr, action: $action:expr, label: $label:expr) => {
        Rule {
            id: $id,
            condition: $cond,
            action: $action,
            label: $label,
        }
    };
}

// ---------------------------------------------------------------------------
// Condition helpers
// ---------------------------------------------------------------------------

fn in_final_month(t: &TimeInfo) -> bool {
    t.months == FINAL_MONTH
}

fn daily_window(t: &TimeInfo) -> bool {
    t.week_in_month() >= DAILY_WARNING_WEEK
}

// ---------------------------------------------------------------------------
// Default rules (priority-ordered)
// ---------------------------------------------------------------------------

/// The onboarding milestone ladder.
///
/// Month 11 is matched exactly before the `>=` ladder; every other tier uses
/// `>=` so a run that missed a milestone lands on the highest tier reached.
pub fn default_rules() -> Vec<Rule> {
    vec![
        rule! {
            id: "final_month_weekly",
            condition: |t| in_final_month(t) && !daily_window(t),
            action: ActionKind::WeeklyWarning,
            label: labels::APPROACHING_ARCHIVAL
        },
        rule! {
            id: "final_month_daily",
            condition: |t| in_final_month(t) && daily_window(t),
            action: ActionKind::DailyWarning,
            label: labels::APPROACHING_ARCHIVAL
        },
        rule! {
            id: "archive",
            condition: |t| t.months >= ARCHIVE_MONTH,
            action: ActionKind::Archive,
            label: labels::ARCHIVED
        },
        rule! {
            id: "health_issue",
            condition: |t| t.months >= HEALTH_ISSUE_MONTH,
            action: ActionKind::CreateHealthIssue,
            label: labels::APPROACHING_ARCHIVAL
        },
        rule! {
            id: "warning",
            condition: |t| t.months >= WARNING_MONTH,
            action: ActionKind::TagTeams,
            label: labels::WARNING
        },
        rule! {
            id: "stale",
            condition: |t| t.months >= STALE_MONTH,
            action: ActionKind::TagTeams,
            label: labels::STALE
        },
        rule! {
            id: "incomplete",
            condition: |t| t.months >= INCOMPLETE_MONTH,
            action: ActionKind::Comment,
            label: labels::INCOMPLETE
        },
    ]
}

#[cfg(test)]
mod tests {
    use crate::age::TimeInfo;
    use crate::resolver::{resolve, ActionInfo, Resolver};
    use crate::types::{labels, ActionKind};

    fn at(days: i64) -> Option<ActionInfo> {
        resolve(&TimeInfo::from_days(days))
    }

    fn kind_and_label(days: i64) -> (ActionKind, String) {
        let info = at(days).unwrap_or_else(|| panic!("no action at day {days}"));
        (info.action, info.label)
    }

    #[test]
    fn nothing_before_day_90() {
        for days in 0..90 {
            assert_eq!(at(days), None, "day {days}");
        }
    }

    #[test]
    fn months_three_to_five_comment() {
        for days in 90..180 {
            assert_eq!(
                kind_and_label(days),
                (ActionKind::Comment, labels::INCOMPLETE.to_string()),
                "day {days}"
            );
        }
    }

    #[test]
    fn months_six_to_eight_stale() {
        for days in 180..270 {
            assert_eq!(
                kind_and_label(days),
                (ActionKind::TagTeams, labels::STALE.to_string()),
                "day {days}"
            );
        }
    }

    #[test]
    fn month_nine_warning_month_ten_health_issue() {
        assert_eq!(
            kind_and_label(270),
            (ActionKind::TagTeams, labels::WARNING.to_string())
        );
        assert_eq!(
            kind_and_label(299),
            (ActionKind::TagTeams, labels::WARNING.to_string())
        );
        assert_eq!(
            kind_and_label(300),
            (
                ActionKind::CreateHealthIssue,
                labels::APPROACHING_ARCHIVAL.to_string()
            )
        );
        assert_eq!(kind_and_label(329).0, ActionKind::CreateHealthIssue);
    }

    #[test]
    fn month_eleven_weeks_one_to_three_weekly() {
        for days in 330..=350 {
            let info = at(days).unwrap();
            assert_eq!(info.action, ActionKind::WeeklyWarning, "day {days}");
            assert_eq!(info.label, labels::APPROACHING_ARCHIVAL);
            assert!(info.week_in_month.unwrap() <= 3);
        }
    }

    #[test]
    fn month_eleven_last_days_daily() {
        for days in 351..360 {
            let info = at(days).unwrap();
            assert_eq!(info.action, ActionKind::DailyWarning, "day {days}");
            assert_eq!(info.label, labels::APPROACHING_ARCHIVAL);
            assert!(info.week_in_month.unwrap() >= 4);
        }
    }

    #[test]
    fn archive_from_month_twelve_on() {
        for days in [360, 365, 400, 1000, 5000] {
            assert_eq!(
                kind_and_label(days),
                (ActionKind::Archive, labels::ARCHIVED.to_string()),
                "day {days}"
            );
        }
    }

    #[test]
    fn day_335_is_first_weekly_warning() {
        let info = at(335).unwrap();
        assert_eq!(info.action, ActionKind::WeeklyWarning);
        assert_eq!(info.week_in_month, Some(1));
        assert_eq!(info.day_in_week, Some(7));
    }

    #[test]
    fn day_351_is_first_daily_warning() {
        let info = at(351).unwrap();
        assert_eq!(info.action, ActionKind::DailyWarning);
        assert_eq!(info.week_in_month, Some(4));
        assert_eq!(info.day_in_week, Some(2));
    }

    #[test]
    fn only_warnings_carry_week_and_day() {
        for days in [95, 200, 280, 310, 400] {
            let info = at(days).unwrap();
            assert_eq!(info.week_in_month, None);
            assert_eq!(info.day_in_week, None);
        }
    }

    #[test]
    fn final_month_rules_precede_ladder() {
        let rules = super::default_rules();
        for days in 90..800 {
            let t = TimeInfo::from_days(days);
            let matches: Vec<_> = rules.iter().filter(|r| (r.condition)(&t)).collect();
            assert!(!matches.is_empty(), "day {days}");
            if t.months == 11 {
                assert!(matches[0].id.starts_with("final_month"), "day {days}");
            }
        }
    }

    #[test]
    fn rule_id_reports_matching_rule() {
        let resolver = Resolver::default();
        assert_eq!(resolver.rule_id(&TimeInfo::from_days(10)), None);
        assert_eq!(resolver.rule_id(&TimeInfo::from_days(95)), Some("incomplete"));
        assert_eq!(resolver.rule_id(&TimeInfo::from_days(352)), Some("final_month_daily"));
    }

    #[test]
    fn action_info_json_omits_week_fields_outside_month_eleven() {
        let json = serde_json::to_string(&at(95).unwrap()).unwrap();
        assert!(!json.contains("week_in_month"));
        let json = serde_json::to_string(&at(340).unwrap()).unwrap();
        assert!(json.contains("\"week_in_month\":2"));
    }
}
