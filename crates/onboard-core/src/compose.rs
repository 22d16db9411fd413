//! Escalation message rendering.
//!
//! Each [`Escalation`] variant carries only the fields its message needs.
//! Countdowns are computed from the resolver's month thresholds so a message
//! never promises a date the resolver will not honour.

use crate::age::{TimeInfo, DAYS_PER_MONTH, DAYS_PER_WEEK};
use crate::resolver::ActionInfo;
use crate::rules::{
    ARCHIVE_MONTH, DAILY_WARNING_WEEK, FINAL_MONTH, HEALTH_ISSUE_MONTH, STALE_MONTH,
    WARNING_MONTH,
};
use crate::types::{labels, ActionKind, NewIssue, Repo};

const MONITOR_NAME: &str = "CNCF onboarding progress monitor";

/// Day on which the first daily warning is due (month 11, week 4).
pub fn daily_warnings_start_day() -> i64 {
    FINAL_MONTH * DAYS_PER_MONTH + (DAILY_WARNING_WEEK as i64 - 1) * DAYS_PER_WEEK
}

/// Day on which the resolver archives an issue (start of month 12).
pub fn archival_day() -> i64 {
    ARCHIVE_MONTH * DAYS_PER_MONTH
}

// ---------------------------------------------------------------------------
// Escalation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    Reminder {
        time: TimeInfo,
    },
    TeamAlert {
        time: TimeInfo,
        label: String,
    },
    HealthCheck {
        time: TimeInfo,
    },
    WeeklyWarning {
        time: TimeInfo,
        week_in_month: u32,
    },
    DailyWarning {
        time: TimeInfo,
        day_in_week: u32,
    },
    Archival {
        time: TimeInfo,
    },
}

impl Escalation {
    pub fn new(time: &TimeInfo, action: &ActionInfo) -> Self {
        let time = *time;
        match action.action {
            ActionKind::Comment => Escalation::Reminder { time },
            ActionKind::TagTeams => Escalation::TeamAlert {
                time,
                label: action.label.clone(),
            },
            ActionKind::CreateHealthIssue => Escalation::HealthCheck { time },
            ActionKind::WeeklyWarning => Escalation::WeeklyWarning {
                time,
                week_in_month: action.week_in_month.unwrap_or_else(|| time.week_in_month()),
            },
            ActionKind::DailyWarning => Escalation::DailyWarning {
                time,
                day_in_week: action.day_in_week.unwrap_or_else(|| time.day_in_week()),
            },
            ActionKind::Archive => Escalation::Archival { time },
        }
    }

    pub fn time(&self) -> &TimeInfo {
        match self {
            Escalation::Reminder { time }
            | Escalation::TeamAlert { time, .. }
            | Escalation::HealthCheck { time }
            | Escalation::WeeklyWarning { time, .. }
            | Escalation::DailyWarning { time, .. }
            | Escalation::Archival { time } => time,
        }
    }

    /// Comment body posted on the onboarding issue.
    pub fn render(&self, project: &str) -> String {
        let t = self.time();
        let age = format!("**{} months** ({} days)", t.months, t.days);
        let until_archival = t.days_until_month(ARCHIVE_MONTH);
        let header = format!("## ⚠️ Onboarding Progress Alert for {project}\n\n");

        let body = match self {
            Escalation::Reminder { .. } => format!(
                "📝 **REMINDER**: This onboarding issue has been open for {age}.\n\n\
                 **Action Taken:**\n\
                 - ✅ Applied `{label}` label\n\n\
                 {next_steps}\
                 **Timeline:**\n\
                 - If all tasks are not completed in the next {until_stale} days: TOC and projects team will be tagged\n\
                 - If all tasks are not completed in the next {until_archival} days: Automatic archival\n\n\
                 {footer}",
                label = labels::INCOMPLETE,
                next_steps = next_steps(),
                until_stale = t.days_until_month(STALE_MONTH),
                footer = footer("reminder"),
            ),
            Escalation::TeamAlert { label, .. } => {
                let urgency = if t.months >= WARNING_MONTH {
                    "HIGH PRIORITY"
                } else {
                    "PRIORITY"
                };
                format!(
                    "📋 **{urgency}**: This onboarding issue has been open for {age}.\n\n\
                     **Actions Taken:**\n\
                     - ✅ Applied `{label}` label\n\
                     - ✅ Tagged TOC and projects team for visibility\n\n\
                     {next_steps}\
                     **Timeline:**\n\
                     - If all tasks are not completed in the next {until_health} days: Health issue will be created\n\
                     - If all tasks are not completed in the next {until_archival} days: Automatic archival\n\n\
                     {footer}",
                    next_steps = next_steps(),
                    until_health = t.days_until_month(HEALTH_ISSUE_MONTH),
                    footer = footer("alert"),
                )
            }
            Escalation::HealthCheck { .. } => format!(
                "⚠️ **APPROACHING DEADLINE**: This onboarding issue has been open for {age}.\n\n\
                 This project is approaching the 1-year onboarding deadline and will be automatically archived if not completed.\n\n\
                 **Actions Taken:**\n\
                 - ✅ Applied `{label}` label\n\
                 - ✅ Created health issue in TOC repository for visibility\n\n\
                 **Next Steps:**\n\
                 - Complete all remaining onboarding tasks\n\
                 - Contact CNCF staff immediately if assistance is needed\n\n\
                 **Timeline:**\n\
                 - In {until_weekly} days: Weekly warnings will begin\n\
                 - If all tasks are not completed in the next {until_archival} days: Automatic archival\n\n\
                 {footer}",
                label = labels::APPROACHING_ARCHIVAL,
                until_weekly = t.days_until_month(FINAL_MONTH),
                footer = footer("alert"),
            ),
            Escalation::WeeklyWarning { week_in_month, .. } => format!(
                "⚠️ **WARNING**: This onboarding issue has been open for {age}.\n\n\
                 **Weekly Warning #{week_in_month}** - This project will be automatically archived in **{until_archival} days** (on day {archive_day} after this issue was opened).\n\n\
                 **Action Taken:**\n\
                 - ✅ Applied `{label}` label\n\n\
                 **Action Required:**\n\
                 - Complete remaining onboarding tasks\n\
                 - Contact CNCF staff if assistance is needed\n\
                 - Update this issue with progress\n\n\
                 **Timeline:**\n\
                 - Next week: Another weekly warning\n\
                 - In {until_daily} days: Daily warnings will begin\n\
                 - If all tasks are not completed in the next {until_archival} days: Automatic archival\n\n\
                 {footer}",
                label = labels::APPROACHING_ARCHIVAL,
                archive_day = archival_day(),
                until_daily = (daily_warnings_start_day() - t.days).max(0),
                footer = footer("weekly warning"),
            ),
            Escalation::DailyWarning { day_in_week, .. } => format!(
                "🚨 **FINAL WARNING**: This onboarding issue has been open for {age}.\n\n\
                 **Daily Warning #{day_in_week}** - This project will be automatically archived in **{until_archival} days** (on day {archive_day} after this issue was opened).\n\n\
                 **Action Taken:**\n\
                 - ✅ Applied `{label}` label\n\n\
                 **Immediate Action Required:**\n\
                 - Complete all remaining onboarding tasks\n\
                 - Contact CNCF staff if you need assistance\n\
                 - Update this issue with your progress\n\n\
                 **Timeline:**\n\
                 - Tomorrow: Another daily warning\n\
                 - If all tasks are not completed in the next {until_archival} days: Automatic archival\n\n\
                 {footer}",
                label = labels::APPROACHING_ARCHIVAL,
                archive_day = archival_day(),
                footer = footer("daily warning"),
            ),
            Escalation::Archival { .. } => format!(
                "🚨 **CRITICAL**: This onboarding issue has been open for {age}.\n\n\
                 This project has exceeded the 1-year onboarding deadline and will be automatically archived.\n\n\
                 **Action Taken:**\n\
                 - ✅ Applied `{label}` label\n\
                 - ✅ Closed this onboarding issue\n\
                 - ✅ Commented on health issue in TOC repository\n\n\
                 The project will need to reapply for CNCF Sandbox status if they wish to continue.\n\n\
                 ---\n*This action was taken automatically by the {MONITOR_NAME}.*",
                label = labels::ARCHIVED,
            ),
        };

        header + &body
    }
}

fn next_steps() -> &'static str {
    "**Next Steps:**\n\
     - Complete remaining onboarding tasks\n\
     - Contact CNCF staff if assistance is needed\n\
     - Update this issue with progress\n\n"
}

fn footer(kind: &str) -> String {
    format!("---\n*This is an automated {kind} from the {MONITOR_NAME}.*")
}

/// Render the escalation comment for a resolved action.
pub fn compose_comment(time: &TimeInfo, action: &ActionInfo, project: &str) -> String {
    Escalation::new(time, action).render(project)
}

// ---------------------------------------------------------------------------
// Health issue artifacts
// ---------------------------------------------------------------------------

/// Health issue filed in the governance repository at the month-10 milestone.
pub fn health_issue(
    project: &str,
    onboarding_repo: &Repo,
    onboarding_issue: u64,
    months: i64,
    issue_labels: &[String],
) -> NewIssue {
    let remaining = (ARCHIVE_MONTH - months).max(0);
    let url = onboarding_repo.issue_url(onboarding_issue);

    let body = format!(
        "### Purpose of This Issue\n\n\
         This Project Health Issue has been filed to ascertain the current activity and health of the project so the TOC may identify the appropriate support and guidance for the project to return to an optimal state of health or determination of archival.\n\n\
         It is intended to **initiate a public discussion to seek understanding** and define a path forward. Perceptions or commentary counter to this are not constructive for the project or the community.\n\n\
         Should maintainers have sensitive, confidential, or private factors and concerns that influence or affect the project, they are encouraged to contact the TOC or TOC Staff directly via Slack, or email.\n\n\
         ---\n\n\
         ### Project name\n\n\
         {project}\n\n\
         ### Project On-boarding issue\n\n\
         {url}\n\n\
         ### Concern\n\n\
         This sandbox project has been in the onboarding process for **{months}+ months** and is approaching the automatic archival deadline. The project has not completed the required onboarding tasks within the expected timeframe.\n\n\
         **Potential Indicators:**\n\
         - Lack of active maintainer engagement\n\
         - Insufficient resources to complete onboarding requirements\n\
         - Project may no longer be actively maintained\n\
         - Need for additional support or guidance from CNCF staff\n\n\
         **Timeline:**\n\
         - **Current Status:** {months}+ months in onboarding process\n\
         - **Archival Deadline:** {ARCHIVE_MONTH} months from onboarding issue creation\n\
         - **Time Remaining:** ~{remaining} month(s)\n\n\
         **Onboarding Issue:** [#{onboarding_issue}]({url})\n\n\
         **Automated Detection:** This health issue was automatically created by the {MONITOR_NAME} when the project reached the {months}-month milestone, as part of proactive intervention before automatic archival.\n\n\
         **Recent Activity:**\n\
         Please review the onboarding issue for the current status of completion checklist items and any recent maintainer updates.\n\n\
         ### Prior engagement\n\n\
         This is an automated health check triggered by the onboarding progress monitoring system.\n\n\
         Prior to this health issue:\n\
         - **{INCOMPLETE} months:** Automated reminder with `{l_incomplete}` label\n\
         - **{STALE_MONTH} months:** Automated alert with `{l_stale}` label + TOC/projects team notification\n\
         - **{WARNING_MONTH} months:** Automated warning with `{l_warning}` label + TOC/projects team notification\n\
         - **{HEALTH_ISSUE_MONTH} months:** This health issue created with `{l_approaching}` label\n\n\
         No direct TOC engagement has been initiated for this specific onboarding delay beyond automated monitoring.\n\n\
         ### Additional Information\n\n\
         **Suggested Next Steps for TOC:**\n\
         1. Review the onboarding issue to assess current completion status\n\
         2. Contact project maintainers to understand any blockers or challenges\n\
         3. Determine if the project requires additional CNCF staff support\n\
         4. Evaluate if a deadline extension is warranted based on circumstances\n\
         5. Provide specific guidance for completing remaining onboarding tasks\n\
         6. Assess project's continued alignment with sandbox requirements\n\n\
         **If No Action Taken:**\n\
         - **{FINAL_MONTH} months:** Weekly warnings will be posted (weeks 1-3), then daily warnings (week 4)\n\
         - **{ARCHIVE_MONTH} months:** Project will be automatically archived, onboarding issue closed, and this health issue updated\n\n\
         ---\n\n\
         *This health issue was automatically created by the {MONITOR_NAME}. For questions about this automation, please contact CNCF staff or open an issue in the {onboarding_repo} repository.*",
        INCOMPLETE = crate::rules::INCOMPLETE_MONTH,
        l_incomplete = labels::INCOMPLETE,
        l_stale = labels::STALE,
        l_warning = labels::WARNING,
        l_approaching = labels::APPROACHING_ARCHIVAL,
    );

    NewIssue {
        title: format!("[HEALTH]: {project} - Onboarding Deadline Approaching ({months}+ Months)"),
        body,
        labels: issue_labels.to_vec(),
        assignees: Vec::new(),
    }
}

/// Follow-up comment on the onboarding issue pointing at its health issue.
pub fn health_issue_reference(health_repo: &Repo, health_issue: u64) -> String {
    format!(
        "**🏥 Health Issue Created in TOC Repository**\n\n\
         A health issue has been created for TOC review: [{health_repo}#{health_issue}]({url})\n\n\
         The TOC will review this issue and may reach out to maintainers to assess the current status and provide support.",
        url = health_repo.issue_url(health_issue),
    )
}

/// Notice posted on the health issue once its onboarding issue is archived.
pub fn archival_notice(onboarding_repo: &Repo, onboarding_issue: u64) -> String {
    format!(
        "## 🗄️ Project Archived - Onboarding Incomplete\n\n\
         This health issue is being updated as the associated onboarding process has reached the {ARCHIVE_MONTH}-month deadline without completion.\n\n\
         **Onboarding Issue:** [{onboarding_repo}#{onboarding_issue}]({url}) - **CLOSED**\n\n\
         **Action Taken:**\n\
         - ✅ Applied `{label}` label to onboarding issue\n\
         - ✅ Closed onboarding issue\n\
         - ✅ Automated monitoring cycle completed\n\n\
         **Status:**\n\
         The project has been automatically archived due to exceeding the {ARCHIVE_MONTH}-month onboarding timeline. The onboarding requirements were not completed within the allocated timeframe.\n\n\
         **Next Steps:**\n\
         The TOC may choose to:\n\
         1. Close this health issue if no further action is needed\n\
         2. Reach out to maintainers for a final status update\n\
         3. Determine if the project should be allowed to reapply in the future\n\n\
         If the project wishes to rejoin the CNCF Sandbox in the future, they will need to submit a new application through the standard process.\n\n\
         ---\n*This update was automatically posted by the {MONITOR_NAME}.*",
        url = onboarding_repo.issue_url(onboarding_issue),
        label = labels::ARCHIVED,
    )
}
