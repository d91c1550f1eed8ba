//! The birthday sync pipeline: harvest → wipe → publish.
//!
//! The phases run strictly one after another. Nothing is rolled back if a
//! later phase fails, so a failed publish can leave the calendar empty.

mod harvest;
mod publish;
mod report;
mod wipe;

pub use harvest::{HarvestOptions, harvest};
pub use publish::{PublishSummary, event_file_name, publish};
pub use report::{Phase, Reporter, SyncEvent};
pub use wipe::{WipeSummary, wipe};

use chrono::Datelike;
use tracing::info;

use crate::config::SyncConfig;
use crate::dav::DavClient;
use crate::error::BdayResult;

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub events: usize,
    pub wipe: WipeSummary,
    pub publish: PublishSummary,
    pub dry_run: bool,
}

/// A configured, ready-to-run sync.
pub struct BirthdaySync {
    client: DavClient,
    config: SyncConfig,
    first_year: i32,
}

impl BirthdaySync {
    /// Create a sync starting at the current local year.
    pub fn new(config: SyncConfig) -> BdayResult<Self> {
        let client = DavClient::new(&config.user, &config.password)?;

        Ok(BirthdaySync {
            client,
            config,
            first_year: chrono::Local::now().year(),
        })
    }

    /// Override the first generated year.
    pub fn with_first_year(mut self, year: i32) -> Self {
        self.first_year = year;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub async fn run(&self, reporter: &mut dyn Reporter) -> BdayResult<SyncSummary> {
        let dry_run = self.config.dry_run;
        if dry_run {
            reporter.report(SyncEvent::DryRun);
        }

        info!(
            "Syncing birthdays for {} years from {}",
            self.config.years, self.first_year
        );

        reporter.report(SyncEvent::Phase(Phase::Harvest));
        let options = HarvestOptions {
            first_year: self.first_year,
            years: self.config.years,
            show_skipped: self.config.show_skipped,
        };
        let events = harvest(&self.client, &self.config.contacts_url, &options, reporter).await?;

        reporter.report(SyncEvent::Phase(Phase::Wipe));
        let wiped = wipe(&self.client, &self.config.calendar_url, dry_run, reporter).await?;

        reporter.report(SyncEvent::Phase(Phase::Publish));
        let published = publish(
            &self.client,
            &self.config.calendar_url,
            &events,
            dry_run,
            reporter,
        )
        .await;

        reporter.report(SyncEvent::Done { dry_run });

        Ok(SyncSummary {
            events: events.len(),
            wipe: wiped,
            publish: published,
            dry_run,
        })
    }
}
