use super::describe_age;
use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use onboard_core::config::Config;
use onboard_core::github::GitHubClient;
use onboard_core::monitor::{monitor_onboarding_progress, HealthSync, IssueResult, MonitorReport};
use onboard_core::tracker::DryRun;

pub fn run(
    config: &Config,
    token: Option<String>,
    check_all: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    if token.is_none() && !dry_run {
        anyhow::bail!("GITHUB_TOKEN (or --token) is required unless --dry-run is set");
    }
    let client = GitHubClient::new(config.api_url.clone(), token)
        .context("failed to build GitHub client")?;
    let now = Utc::now();

    let report = if dry_run {
        monitor_onboarding_progress(&DryRun::new(&client), config, check_all, now)
    } else {
        monitor_onboarding_progress(&client, config, check_all, now)
    }
    .context("monitoring run failed")?;

    if json {
        return print_json(&report);
    }
    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &MonitorReport, dry_run: bool) {
    let rows: Vec<Vec<String>> = report
        .outcomes
        .iter()
        .map(|o| {
            let (result, detail) = describe(&o.result);
            vec![
                format!("#{}", o.number),
                o.project.clone().unwrap_or_else(|| "-".to_string()),
                o.time.as_ref().map(describe_age).unwrap_or_else(|| "-".to_string()),
                result,
                detail,
            ]
        })
        .collect();
    print_table(&["ISSUE", "PROJECT", "AGE", "RESULT", "DETAIL"], &rows);

    println!();
    println!(
        "{} issue(s) checked, {} escalated, {} failed{}",
        report.listed,
        report.applied(),
        report.failed(),
        if dry_run { " (dry run)" } else { "" }
    );
    if let Some(rate) = &report.rate_limit_after {
        println!("API rate limit: {}/{} remaining", rate.remaining, rate.limit);
    }
}

fn describe(result: &IssueResult) -> (String, String) {
    match result {
        IssueResult::TitleMismatch => ("ignored".into(), "title does not match".into()),
        IssueResult::Extended => ("ignored".into(), "timeline extended".into()),
        IssueResult::BeforeCutoff => ("ignored".into(), "created before cutoff".into()),
        IssueResult::NoAction => ("ok".into(), String::new()),
        IssueResult::Skipped { action, reason } => ("skipped".into(), format!("{action}: {reason}")),
        IssueResult::Applied {
            action,
            label,
            health_issue,
            health_sync,
        } => {
            let mut detail = format!("{action} [{label}]");
            if let Some(n) = health_issue {
                detail.push_str(&format!(", health issue #{n}"));
            }
            match health_sync {
                Some(HealthSync::Updated { number }) => {
                    detail.push_str(&format!(", health issue #{number} updated"))
                }
                Some(HealthSync::NotFound) => detail.push_str(", no health issue found"),
                Some(HealthSync::Failed { .. }) => detail.push_str(", health issue update failed"),
                None => {}
            }
            ("applied".into(), detail)
        }
        IssueResult::Failed { message, .. } => ("failed".into(), message.clone()),
    }
}
