use crate::error::{OnboardError, Result};
use crate::types::{labels, Repo};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_CONFIG_PATH: &str = ".github/onboarding.yaml";

/// GitHub caps `per_page` at this value.
const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Labels every onboarding issue carries; listing filters on all of them.
    #[serde(default = "default_required_labels")]
    pub required_labels: Vec<String>,
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
    #[serde(default = "default_extended_label")]
    pub extended_label: String,
    /// Issues created before this instant are never monitored.
    #[serde(default = "default_cutoff")]
    pub cutoff: DateTime<Utc>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Batches larger than this are throttled between issues.
    #[serde(default = "default_throttle_after")]
    pub throttle_after: usize,
    #[serde(default = "default_throttle_delay_ms")]
    pub throttle_delay_ms: u64,
    #[serde(default = "default_low_rate_limit")]
    pub low_rate_limit: u32,
    #[serde(default)]
    pub team_assignees: Vec<String>,
}

fn default_required_labels() -> Vec<String> {
    vec!["project onboarding".to_string(), "sandbox".to_string()]
}

fn default_title_prefix() -> String {
    "[PROJECT ONBOARDING]".to_string()
}

fn default_extended_label() -> String {
    labels::EXTENDED.to_string()
}

fn default_cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_throttle_after() -> usize {
    10
}

fn default_throttle_delay_ms() -> u64 {
    1000
}

fn default_low_rate_limit() -> u32 {
    100
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            required_labels: default_required_labels(),
            title_prefix: default_title_prefix(),
            extended_label: default_extended_label(),
            cutoff: default_cutoff(),
            page_size: default_page_size(),
            throttle_after: default_throttle_after(),
            throttle_delay_ms: default_throttle_delay_ms(),
            low_rate_limit: default_low_rate_limit(),
            team_assignees: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// HealthConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_health_labels")]
    pub labels: Vec<String>,
    /// Label used to find an existing health issue when archiving.
    #[serde(default = "default_search_label")]
    pub search_label: String,
}

fn default_health_labels() -> Vec<String> {
    ["needs-triage", "toc", "kind/review", "review/health"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_search_label() -> String {
    "review/health".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            labels: default_health_labels(),
            search_label: default_search_label(),
        }
    }
}

// ---------------------------------------------------------------------------
// OnboardingConfig (issue creation)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Used when the template has no `labels` front matter.
    #[serde(default = "default_onboarding_labels")]
    pub default_labels: Vec<String>,
}

fn default_template() -> PathBuf {
    PathBuf::from(".github/ISSUE_TEMPLATE/project-onboarding.md")
}

fn default_onboarding_labels() -> Vec<String> {
    ["project onboarding", "sandbox", "contribution-agreement/unsigned"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            default_labels: default_onboarding_labels(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_repo")]
    pub repo: Repo,
    #[serde(default = "default_health_repo")]
    pub health_repo: Repo,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
}

fn default_repo() -> Repo {
    Repo::new("cncf", "sandbox")
}

fn default_health_repo() -> Repo {
    Repo::new("cncf", "toc")
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            health_repo: default_health_repo(),
            api_url: default_api_url(),
            monitor: MonitorConfig::default(),
            health: HealthConfig::default(),
            onboarding: OnboardingConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_yaml()?.as_bytes())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Like [`Config::validate`], but fails on the first error-level warning.
    pub fn validated(self) -> Result<Self> {
        if let Some(err) = self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            return Err(OnboardError::Config(err.message));
        }
        Ok(self)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut error = |message: String| {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message,
            })
        };

        for (what, repo) in [("repo", &self.repo), ("health_repo", &self.health_repo)] {
            if repo.owner.trim().is_empty() || repo.name.trim().is_empty() {
                error(format!("{what} needs both an owner and a name"));
            }
        }
        if self.monitor.required_labels.is_empty() {
            error(
                "monitor.required_labels is empty: every open issue in the repo would be monitored"
                    .to_string(),
            );
        }
        if self.monitor.title_prefix.trim().is_empty() {
            error("monitor.title_prefix must not be empty".to_string());
        }
        if self.monitor.page_size == 0 {
            error("monitor.page_size must be at least 1".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            error(format!("api_url '{}' is not an http(s) URL", self.api_url));
        }

        if self.monitor.page_size > MAX_PAGE_SIZE {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "monitor.page_size {} exceeds GitHub's maximum; only {MAX_PAGE_SIZE} issues are returned",
                    self.monitor.page_size
                ),
            });
        }
        if self.monitor.team_assignees.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "monitor.team_assignees is empty: tag_teams milestones will not assign anyone"
                    .to_string(),
            });
        }
        if self.health.labels.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "health.labels is empty: health issues will be filed without triage labels"
                    .to_string(),
            });
        }

        warnings
    }
}

/// Write through a tempfile in the target directory so a concurrent reader
/// never sees a half-written config.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
