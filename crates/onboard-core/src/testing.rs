//! In-memory tracker that records every call, for unit tests.

use crate::error::{OnboardError, Result};
use crate::tracker::Tracker;
use crate::types::{Issue, IssueState, Label, NewIssue, RateLimit, Repo, SearchResults};
use chrono::{DateTime, Utc};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddLabels(String, u64, Vec<String>),
    Comment(String, u64, String),
    Assign(u64, Vec<String>),
    Close(String, u64),
    Create(String, NewIssue),
    Search(String),
}

#[derive(Default)]
pub struct FakeTracker {
    pub issues: Vec<Issue>,
    pub search_hits: Vec<Issue>,
    pub created_number: u64,
    pub fail_list: bool,
    pub fail_labels_for: Vec<u64>,
    pub fail_create: bool,
    pub fail_search: bool,
    /// Comments whose body contains this text are rejected.
    pub fail_comment_containing: Option<String>,
    pub fail_rate_limit: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeTracker {
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            created_number: 500,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn comments_on(&self, number: u64) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Comment(_, n, body) if n == number => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn api_error(status: u16) -> OnboardError {
    OnboardError::Api {
        status: Some(status),
        message: "boom".to_string(),
    }
}

pub fn issue(number: u64, title: &str, created_at: DateTime<Utc>, labels: &[&str]) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        state: IssueState::Open,
        created_at,
        updated_at: created_at,
        comments: 0,
        labels: labels
            .iter()
            .map(|n| Label {
                name: n.to_string(),
            })
            .collect(),
    }
}

impl Tracker for FakeTracker {
    fn list_open_issues(&self, _: &Repo, _: &[String], _: u32) -> Result<Vec<Issue>> {
        if self.fail_list {
            return Err(api_error(500));
        }
        Ok(self.issues.clone())
    }

    fn search_issues(&self, query: &str, _: u32) -> Result<SearchResults> {
        self.record(Call::Search(query.to_string()));
        if self.fail_search {
            return Err(api_error(422));
        }
        Ok(SearchResults {
            total_count: self.search_hits.len() as u64,
            items: self.search_hits.clone(),
        })
    }

    fn create_issue(&self, repo: &Repo, new: &NewIssue) -> Result<Option<Issue>> {
        self.record(Call::Create(repo.to_string(), new.clone()));
        if self.fail_create {
            return Err(api_error(403));
        }
        Ok(Some(issue(self.created_number, &new.title, Utc::now(), &[])))
    }

    fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        if self.fail_labels_for.contains(&number) {
            return Err(api_error(502));
        }
        self.record(Call::AddLabels(repo.to_string(), number, labels.to_vec()));
        Ok(())
    }

    fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        if let Some(text) = &self.fail_comment_containing {
            if body.contains(text.as_str()) {
                return Err(api_error(500));
            }
        }
        self.record(Call::Comment(repo.to_string(), number, body.to_string()));
        Ok(())
    }

    fn add_assignees(&self, _: &Repo, number: u64, assignees: &[String]) -> Result<()> {
        self.record(Call::Assign(number, assignees.to_vec()));
        Ok(())
    }

    fn close_issue(&self, repo: &Repo, number: u64) -> Result<()> {
        self.record(Call::Close(repo.to_string(), number));
        Ok(())
    }

    fn rate_limit(&self) -> Result<RateLimit> {
        if self.fail_rate_limit {
            return Err(api_error(500));
        }
        Ok(RateLimit {
            limit: 5000,
            remaining: 4999,
            reset: 1_790_000_000,
        })
    }
}
