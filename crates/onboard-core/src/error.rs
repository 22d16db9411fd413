use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("invalid timestamp '{0}': expected RFC 3339 (e.g. 2025-10-01T00:00:00Z)")]
    InvalidTimestamp(String),

    #[error("title does not match onboarding format: {0}")]
    InvalidTitle(String),

    #[error("unknown action kind '{0}'")]
    InvalidAction(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("GitHub API error{}: {message}", status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl OnboardError {
    /// HTTP status of the failed call, when the failure came from the API.
    pub fn status(&self) -> Option<u16> {
        match self {
            OnboardError::Api { status, .. } => *status,
            OnboardError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(403) | Some(429))
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;
