//! The issue tracker as seen by the monitor: queries and mutations keyed by
//! repository and issue number. Transport lives behind this trait.

use crate::error::Result;
use crate::types::{Issue, NewIssue, RateLimit, Repo, SearchResults};
use tracing::info;

pub trait Tracker {
    /// Open issues carrying every label in `labels`, at most `per_page`.
    fn list_open_issues(&self, repo: &Repo, labels: &[String], per_page: u32)
        -> Result<Vec<Issue>>;

    /// Issue search, newest first.
    fn search_issues(&self, query: &str, per_page: u32) -> Result<SearchResults>;

    /// The created issue, or `None` when the request was only recorded.
    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<Option<Issue>>;

    fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()>;

    fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()>;

    fn add_assignees(&self, repo: &Repo, number: u64, assignees: &[String]) -> Result<()>;

    fn close_issue(&self, repo: &Repo, number: u64) -> Result<()>;

    fn rate_limit(&self) -> Result<RateLimit>;
}

impl<T: Tracker + ?Sized> Tracker for &T {
    fn list_open_issues(
        &self,
        repo: &Repo,
        labels: &[String],
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        (**self).list_open_issues(repo, labels, per_page)
    }

    fn search_issues(&self, query: &str, per_page: u32) -> Result<SearchResults> {
        (**self).search_issues(query, per_page)
    }

    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<Option<Issue>> {
        (**self).create_issue(repo, issue)
    }

    fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        (**self).add_labels(repo, number, labels)
    }

    fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        (**self).create_comment(repo, number, body)
    }

    fn add_assignees(&self, repo: &Repo, number: u64, assignees: &[String]) -> Result<()> {
        (**self).add_assignees(repo, number, assignees)
    }

    fn close_issue(&self, repo: &Repo, number: u64) -> Result<()> {
        (**self).close_issue(repo, number)
    }

    fn rate_limit(&self) -> Result<RateLimit> {
        (**self).rate_limit()
    }
}

// ---------------------------------------------------------------------------
// DryRun
// ---------------------------------------------------------------------------

/// Passes reads through to the inner tracker and logs mutations instead of
/// sending them.
pub struct DryRun<T> {
    inner: T,
}

impl<T: Tracker> DryRun<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Tracker> Tracker for DryRun<T> {
    fn list_open_issues(
        &self,
        repo: &Repo,
        labels: &[String],
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        self.inner.list_open_issues(repo, labels, per_page)
    }

    fn search_issues(&self, query: &str, per_page: u32) -> Result<SearchResults> {
        self.inner.search_issues(query, per_page)
    }

    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<Option<Issue>> {
        info!(repo = %repo, title = %issue.title, "dry run: would create issue");
        Ok(None)
    }

    fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        info!(repo = %repo, issue = number, labels = ?labels, "dry run: would add labels");
        Ok(())
    }

    fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        info!(repo = %repo, issue = number, chars = body.len(), "dry run: would comment");
        Ok(())
    }

    fn add_assignees(&self, repo: &Repo, number: u64, assignees: &[String]) -> Result<()> {
        info!(repo = %repo, issue = number, assignees = ?assignees, "dry run: would assign");
        Ok(())
    }

    fn close_issue(&self, repo: &Repo, number: u64) -> Result<()> {
        info!(repo = %repo, issue = number, "dry run: would close issue");
        Ok(())
    }

    fn rate_limit(&self) -> Result<RateLimit> {
        self.inner.rate_limit()
    }
}
