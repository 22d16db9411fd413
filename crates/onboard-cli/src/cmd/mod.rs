pub mod config;
pub mod create;
pub mod monitor;
pub mod preview;
pub mod resolve;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use onboard_core::age::TimeInfo;

/// Issue age, either directly in days or from the creation timestamp.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct AgeArgs {
    /// Age in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Issue creation time (RFC 3339), measured against now
    #[arg(long, value_name = "RFC3339")]
    pub created_at: Option<String>,
}

impl AgeArgs {
    pub fn time(&self) -> anyhow::Result<TimeInfo> {
        match (&self.days, &self.created_at) {
            (Some(days), _) => Ok(TimeInfo::from_days(*days)),
            (None, Some(created_at)) => TimeInfo::from_timestamp(created_at, Utc::now())
                .with_context(|| format!("cannot compute age from '{created_at}'")),
            (None, None) => anyhow::bail!("either --days or --created-at is required"),
        }
    }
}

/// Human-readable age, e.g. `3 months (95 days)`.
pub fn describe_age(time: &TimeInfo) -> String {
    format!("{} months ({} days)", time.months, time.days)
}
