mod render;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bdaycal_core::{BirthdaySync, RawConfig, SyncConfig};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::ConsoleReporter;

#[derive(Parser)]
#[command(name = "bdaycal")]
#[command(about = "Regenerate a birthday calendar from the contacts in your address book")]
struct Cli {
    /// Address book collection URL (CardDAV)
    #[arg(long = "contacts_url", env = "CONTACTS_URL")]
    contacts_url: Option<String>,

    /// Destination calendar collection URL (CalDAV)
    #[arg(long = "calendar_url", env = "CALENDAR_URL")]
    calendar_url: Option<String>,

    /// Username for both collections
    #[arg(long, env = "USER")]
    user: Option<String>,

    /// Password for both collections
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Number of years to generate, starting with the current one [default: 2]
    #[arg(long, env = "YEARS")]
    years: Option<String>,

    /// Report contacts without a birthday ("true" to enable)
    #[arg(long = "show-skipped", env = "SHOW_SKIPPED", num_args = 0..=1, default_missing_value = "true")]
    show_skipped: Option<String>,

    /// List and download, but never delete or upload ("true" to enable)
    #[arg(long = "dry-run", env = "DRY_RUN", num_args = 0..=1, default_missing_value = "true")]
    dry_run: Option<String>,

    /// Config file (defaults to <config dir>/bdaycal/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<&Cli> for RawConfig {
    fn from(cli: &Cli) -> Self {
        RawConfig {
            contacts_url: cli.contacts_url.clone(),
            calendar_url: cli.calendar_url.clone(),
            user: cli.user.clone(),
            password: cli.password.clone(),
            years: cli.years.clone(),
            show_skipped: cli.show_skipped.clone(),
            dry_run: cli.dry_run.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Validate before any HTTP client exists
    let config = match settings::load(RawConfig::from(&cli), cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            return ExitCode::from(2);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SyncConfig) -> Result<()> {
    debug!(
        "contacts: {}, calendar: {}, years: {}, dry run: {}",
        config.contacts_url, config.calendar_url, config.years, config.dry_run
    );
    let sync = BirthdaySync::new(config).context("Failed to set up sync")?;

    let mut reporter = ConsoleReporter::default();
    let summary = sync
        .run(&mut reporter)
        .await
        .context("Birthday sync aborted")?;

    println!("{}", render::render_summary(&summary));
    Ok(())
}

/// Filter used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "bdaycal=debug,bdaycal_core=debug"
    } else {
        "warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_shows_warnings() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("bdaycal_core=debug"));
    }
}
