use crate::output::print_json;
use anyhow::Context;
use onboard_core::config::Config;
use onboard_core::github::GitHubClient;
use onboard_core::onboarding::{comment_and_close, create_onboarding_issue, Template};
use std::path::Path;

pub fn run(
    config: &Config,
    token: Option<String>,
    project: &str,
    vote_issue: u64,
    template: Option<&Path>,
    close_vote: bool,
    json: bool,
) -> anyhow::Result<()> {
    let Some(token) = token else {
        anyhow::bail!("GITHUB_TOKEN (or --token) is required to create issues");
    };
    let template_path = template.unwrap_or(&config.onboarding.template);
    let template = Template::load(template_path, &config.onboarding.default_labels)
        .context("failed to load onboarding template")?;

    let client = GitHubClient::new(config.api_url.clone(), Some(token))
        .context("failed to build GitHub client")?;
    let issue = create_onboarding_issue(&client, config, &template, project, vote_issue)
        .with_context(|| format!("failed to create onboarding issue for '{project}'"))?;

    let closed = close_vote && !issue.already_exists;
    if closed {
        comment_and_close(&client, &config.repo, vote_issue, issue.number, project.trim())
            .with_context(|| format!("failed to close vote issue #{vote_issue}"))?;
    }

    if json {
        return print_json(&serde_json::json!({
            "issue": issue,
            "vote_issue": vote_issue,
            "vote_issue_closed": closed,
        }));
    }

    if issue.already_exists {
        println!(
            "Onboarding issue already exists: {} ({})",
            config.repo.issue_url(issue.number),
            issue.state
        );
    } else {
        println!("Created onboarding issue {}", config.repo.issue_url(issue.number));
        if closed {
            println!("Closed vote issue #{vote_issue}");
        }
    }
    Ok(())
}
