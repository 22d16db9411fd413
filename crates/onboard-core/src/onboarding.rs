//! Creating the onboarding issue once a project's sandbox vote has passed.

use crate::config::Config;
use crate::error::{OnboardError, Result};
use crate::title::TitleParser;
use crate::tracker::Tracker;
use crate::types::{IssueState, NewIssue, Repo};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const WELCOME_HEADING: &str = "# Welcome to CNCF Project Onboarding";
const EXISTING_SEARCH_PAGE: u32 = 10;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Front matter values may be written `a, b` or as a YAML list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringList {
    Csv(String),
    List(Vec<String>),
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            StringList::Csv(s) => s.split(',').map(str::to_string).collect(),
            StringList::List(v) => v,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    labels: Option<StringList>,
    #[serde(default)]
    assignees: Option<StringList>,
}

/// Split `---` delimited front matter from the body.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// An onboarding issue template with its front matter resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    /// Markdown body with the front matter stripped.
    pub body: String,
}

impl Template {
    pub fn load(path: &Path, default_labels: &[String]) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OnboardError::Template(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content, default_labels)
    }

    pub fn parse(content: &str, default_labels: &[String]) -> Result<Self> {
        let (front, body) = match split_front_matter(content) {
            Some((yaml, body)) if yaml.trim().is_empty() => (FrontMatter::default(), body),
            Some((yaml, body)) => {
                let front: FrontMatter = serde_yaml::from_str(yaml)
                    .map_err(|e| OnboardError::Template(format!("bad front matter: {e}")))?;
                (front, body)
            }
            None => (FrontMatter::default(), content),
        };

        Ok(Self {
            labels: front
                .labels
                .map(StringList::into_vec)
                .unwrap_or_else(|| default_labels.to_vec()),
            assignees: front
                .assignees
                .map(StringList::into_vec)
                .unwrap_or_default(),
            body: body.to_string(),
        })
    }

    /// Issue body referencing the vote issue at the top and bottom.
    pub fn render(&self, vote_issue: u64) -> String {
        let mut body = if self.body.contains(WELCOME_HEADING) {
            self.body.replacen(
                WELCOME_HEADING,
                &format!("{WELCOME_HEADING}\n\nref: #{vote_issue}"),
                1,
            )
        } else {
            self.body.clone()
        };
        body.push_str(&format!(
            "\n\n---\n\n**Related Issue:** This onboarding issue was automatically created after the community vote was completed in issue #{vote_issue}."
        ));
        body
    }
}

// ---------------------------------------------------------------------------
// Issue creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingIssue {
    pub number: u64,
    pub already_exists: bool,
    pub state: IssueState,
}

/// Search query for onboarding issues titled `title`, open or closed.
pub fn existing_issue_query(repo: &Repo, title: &str) -> String {
    let escaped = title.replace('\\', "\\\\").replace('"', "\\\"");
    format!("repo:{repo} is:issue \"{escaped}\" in:title")
}

/// An onboarding issue for `project` that already exists, by exact title.
pub fn find_existing<T: Tracker + ?Sized>(
    tracker: &T,
    repo: &Repo,
    titles: &TitleParser,
    project: &str,
) -> Result<Option<OnboardingIssue>> {
    let title = titles.format(project);
    let query = existing_issue_query(repo, &title);
    info!(query = %query, "searching for existing onboarding issue");

    let results = tracker.search_issues(&query, EXISTING_SEARCH_PAGE)?;
    let found = results
        .items
        .into_iter()
        .find(|issue| issue.title == title)
        .map(|issue| OnboardingIssue {
            number: issue.number,
            already_exists: true,
            state: issue.state,
        });
    match &found {
        Some(existing) => info!(issue = existing.number, state = %existing.state, "found existing onboarding issue"),
        None => info!(total = results.total_count, "no existing onboarding issue with an exact title match"),
    }
    Ok(found)
}

/// Create the onboarding issue for `project`, unless one already exists.
pub fn create_onboarding_issue<T: Tracker + ?Sized>(
    tracker: &T,
    config: &Config,
    template: &Template,
    project: &str,
    vote_issue: u64,
) -> Result<OnboardingIssue> {
    let project = project.trim();
    if project.is_empty() {
        return Err(OnboardError::InvalidTitle(
            "project name must not be empty".to_string(),
        ));
    }
    let titles = TitleParser::new(&config.monitor.title_prefix)?;

    if let Some(existing) = find_existing(tracker, &config.repo, &titles, project)? {
        warn!(
            issue = existing.number,
            "onboarding issue already exists for {project}; not creating another"
        );
        return Ok(existing);
    }

    let new = NewIssue {
        title: titles.format(project),
        body: template.render(vote_issue),
        labels: template.labels.clone(),
        assignees: template.assignees.clone(),
    };
    let created = tracker
        .create_issue(&config.repo, &new)?
        .ok_or_else(|| OnboardError::Api {
            status: None,
            message: format!("onboarding issue for {project} was not created"),
        })?;
    info!(issue = created.number, labels = ?new.labels, assignees = ?new.assignees, "created onboarding issue");

    Ok(OnboardingIssue {
        number: created.number,
        already_exists: false,
        state: IssueState::Open,
    })
}

pub fn congratulations(project: &str, onboarding_issue: u64) -> String {
    format!(
        "🎉 Congratulations! The onboarding issue has been created for **{project}**.\n\n\
         The community vote has been completed successfully, and your project is now ready to begin the CNCF onboarding process.\n\n\
         **Next Steps:**\n\
         - Please review and work through the tasks in the onboarding issue: #{onboarding_issue}\n\
         - Complete onboarding within one month of acceptance\n\
         - Contact CNCF staff if you have any questions\n\n\
         Good luck with your project's journey in the CNCF! 🚀"
    )
}

/// Point the vote issue at its onboarding issue, then close it.
pub fn comment_and_close<T: Tracker + ?Sized>(
    tracker: &T,
    repo: &Repo,
    vote_issue: u64,
    onboarding_issue: u64,
    project: &str,
) -> Result<()> {
    tracker.create_comment(repo, vote_issue, &congratulations(project, onboarding_issue))?;
    tracker.close_issue(repo, vote_issue)?;
    info!(vote_issue, onboarding_issue, "commented on vote issue and closed it");
    Ok(())
}
