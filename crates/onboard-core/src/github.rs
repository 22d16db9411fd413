//! Blocking GitHub REST client implementing [`Tracker`].

use crate::error::{OnboardError, Result};
use crate::tracker::Tracker;
use crate::types::{Issue, NewIssue, RateLimit, Repo, SearchResults};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const USER_AGENT: &str = concat!("onboard/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "github request");
        let mut req = self
            .client
            .request(method, &url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });
        Err(OnboardError::Api {
            status: Some(status.as_u16()),
            message,
        })
    }

    fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        Ok(Self::check(req.send()?)?.json()?)
    }

    fn send_empty(req: RequestBuilder) -> Result<()> {
        Self::check(req.send()?)?;
        Ok(())
    }

    fn issue_path(repo: &Repo, number: u64) -> String {
        format!("/repos/{}/{}/issues/{number}", repo.owner, repo.name)
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct RateLimitBody {
    rate: RateLimit,
}

impl Tracker for GitHubClient {
    fn list_open_issues(
        &self,
        repo: &Repo,
        labels: &[String],
        per_page: u32,
    ) -> Result<Vec<Issue>> {
        let req = self
            .request(
                Method::GET,
                &format!("/repos/{}/{}/issues", repo.owner, repo.name),
            )
            .query(&[
                ("state", "open".to_string()),
                ("labels", labels.join(",")),
                ("per_page", per_page.to_string()),
            ]);
        Self::send_json(req)
    }

    fn search_issues(&self, query: &str, per_page: u32) -> Result<SearchResults> {
        let req = self.request(Method::GET, "/search/issues").query(&[
            ("q", query.to_string()),
            ("sort", "created".to_string()),
            ("order", "desc".to_string()),
            ("per_page", per_page.to_string()),
        ]);
        Self::send_json(req)
    }

    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<Option<Issue>> {
        let req = self
            .request(
                Method::POST,
                &format!("/repos/{}/{}/issues", repo.owner, repo.name),
            )
            .json(issue);
        Self::send_json(req).map(Some)
    }

    fn add_labels(&self, repo: &Repo, number: u64, labels: &[String]) -> Result<()> {
        let path = format!("{}/labels", Self::issue_path(repo, number));
        Self::send_empty(self.request(Method::POST, &path).json(&json!({ "labels": labels })))
    }

    fn create_comment(&self, repo: &Repo, number: u64, body: &str) -> Result<()> {
        let path = format!("{}/comments", Self::issue_path(repo, number));
        Self::send_empty(self.request(Method::POST, &path).json(&json!({ "body": body })))
    }

    fn add_assignees(&self, repo: &Repo, number: u64, assignees: &[String]) -> Result<()> {
        let path = format!("{}/assignees", Self::issue_path(repo, number));
        Self::send_empty(
            self.request(Method::POST, &path)
                .json(&json!({ "assignees": assignees })),
        )
    }

    fn close_issue(&self, repo: &Repo, number: u64) -> Result<()> {
        let path = Self::issue_path(repo, number);
        Self::send_empty(
            self.request(Method::PATCH, &path)
                .json(&json!({ "state": "closed" })),
        )
    }

    fn rate_limit(&self) -> Result<RateLimit> {
        let body: RateLimitBody = Self::send_json(self.request(Method::GET, "/rate_limit"))?;
        Ok(body.rate)
    }
}
