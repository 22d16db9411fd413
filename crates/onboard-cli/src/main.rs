mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, AgeArgs};
use onboard_core::config::{Config, DEFAULT_CONFIG_PATH};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "onboard",
    about = "Create sandbox onboarding issues and escalate the ones that stall",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: .github/onboarding.yaml)
    #[arg(long, global = true, env = "ONBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// GitHub token used for API calls
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one monitoring pass over all open onboarding issues
    Monitor {
        /// Ignore existing milestone labels and bring every issue to its current tier
        #[arg(long)]
        check_all: bool,

        /// Log mutations instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which milestone action applies at a given age
    Resolve {
        #[command(flatten)]
        age: AgeArgs,
    },

    /// Render the escalation comment for a project at a given age
    Preview {
        /// Project name as it appears in the issue title
        #[arg(long)]
        project: String,

        #[command(flatten)]
        age: AgeArgs,
    },

    /// Create the onboarding issue after a passed vote and close the vote issue
    Create {
        #[arg(long)]
        project: String,

        /// Issue number of the completed community vote
        #[arg(long)]
        vote_issue: u64,

        /// Issue template (default: onboarding.template from config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Leave the vote issue open
        #[arg(long)]
        no_close: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    use anyhow::Context;
    Config::load(path)
        .and_then(Config::validated)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Monitor { .. } | Commands::Create { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let result = match cli.command {
        Commands::Monitor { check_all, dry_run } => load_config(&config_path).and_then(|config| {
            cmd::monitor::run(&config, cli.token, check_all, dry_run, cli.json)
        }),
        Commands::Resolve { age } => cmd::resolve::run(&age, cli.json),
        Commands::Preview { project, age } => cmd::preview::run(&project, &age, cli.json),
        Commands::Create {
            project,
            vote_issue,
            template,
            no_close,
        } => load_config(&config_path).and_then(|config| {
            cmd::create::run(
                &config,
                cli.token,
                &project,
                vote_issue,
                template.as_deref(),
                !no_close,
                cli.json,
            )
        }),
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
