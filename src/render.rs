//! Console rendering for sync progress.
//!
//! Extension traits that turn bdaycal-core types into colored terminal lines
//! using owo_colors.

use bdaycal_core::{Phase, Reporter, SyncEvent, SyncSummary};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Phase {
    fn render(&self) -> String {
        let text = match self {
            Phase::Harvest => "Creating birthday events from contacts...",
            Phase::Wipe => "All contacts processed. Deleting all current events...",
            Phase::Publish => "All events deleted. Uploading new events...",
        };
        format!("\n{}", text.bold())
    }
}

impl Render for SyncEvent {
    fn render(&self) -> String {
        match self {
            SyncEvent::DryRun => "Running in dry run mode. No changes will be made."
                .yellow()
                .to_string(),
            SyncEvent::Phase(phase) => phase.render(),
            SyncEvent::BirthdayFound { name, date } => {
                let date = format!("({})", date);
                format!("🎂 Birthday found: {} {}", name, date.dimmed())
            }
            SyncEvent::Skipped { name } => format!("Skipping {}", name).dimmed().to_string(),
            SyncEvent::InvalidBirthday { name, reason } => {
                format!("{}: {}", reason, name).red().to_string()
            }
            SyncEvent::InvalidContact { name, reason } => {
                format!("Skipping {}: {}", name, reason).red().to_string()
            }
            SyncEvent::MalformedCard { file, reason } => {
                format!("Skipping card in {}: {}", file, reason).red().to_string()
            }
            SyncEvent::Deleting { index, total } => format!("Deleting event {}/{}", index, total),
            SyncEvent::DeleteFailed { file, reason } => {
                format!("Failed to delete {}: {}", file, reason).red().to_string()
            }
            SyncEvent::Uploading { index, total } => {
                format!("Uploading event {}/{}", index, total)
            }
            SyncEvent::UploadFailed { uid, reason } => {
                format!("Failed to upload event {}: {}", uid, reason).red().to_string()
            }
            SyncEvent::Done { dry_run } => {
                let mut text = format!("\n{}", "All done.".green());
                if *dry_run {
                    text.push_str(&format!(
                        "\n{}",
                        "Dry run completed. No changes have been made.".yellow()
                    ));
                }
                text
            }
        }
    }
}

/// Prints every event to stdout as it arrives.
#[derive(Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: SyncEvent) {
        println!("{}", event.render());
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// One-line totals shown after a run.
pub fn render_summary(summary: &SyncSummary) -> String {
    let mut parts = vec![format!(
        "{} {} generated",
        summary.events,
        pluralize("event", summary.events)
    )];

    let (deleted, uploaded) = if summary.dry_run {
        ("would delete", "would upload")
    } else {
        ("deleted", "uploaded")
    };
    parts.push(format!("{} {}/{}", deleted, summary.wipe.deleted, summary.wipe.total));
    parts.push(format!(
        "{} {}/{}",
        uploaded, summary.publish.uploaded, summary.publish.total
    ));

    let failed = summary.wipe.failed + summary.publish.failed;
    let line = parts.join(", ");
    if failed > 0 {
        format!("{} ({} failed)", line, failed.red())
    } else {
        line.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdaycal_core::sync::{PublishSummary, WipeSummary};
    use chrono::NaiveDate;

    #[test]
    fn test_progress_lines() {
        assert!(SyncEvent::Deleting { index: 2, total: 7 }
            .render()
            .contains("Deleting event 2/7"));
        assert!(SyncEvent::Uploading { index: 1, total: 3 }
            .render()
            .contains("Uploading event 1/3"));
    }

    #[test]
    fn test_birthday_found_shows_name_and_date() {
        let line = SyncEvent::BirthdayFound {
            name: "Ada Lovelace".into(),
            date: NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
        }
        .render();
        assert!(line.contains("Birthday found: Ada Lovelace"));
        assert!(line.contains("1815-12-10"));
    }

    #[test]
    fn test_done_mentions_dry_run() {
        assert!(!SyncEvent::Done { dry_run: false }.render().contains("Dry run"));
        assert!(SyncEvent::Done { dry_run: true }
            .render()
            .contains("Dry run completed. No changes have been made."));
    }

    #[test]
    fn test_summary_counts_failures() {
        let summary = SyncSummary {
            events: 4,
            wipe: WipeSummary {
                total: 2,
                deleted: 1,
                failed: 1,
            },
            publish: PublishSummary {
                total: 4,
                uploaded: 4,
                failed: 0,
            },
            dry_run: false,
        };

        let line = render_summary(&summary);
        assert!(line.contains("4 events generated"));
        assert!(line.contains("deleted 1/2"));
        assert!(line.contains("uploaded 4/4"));
        assert!(line.contains("failed"));
    }

    #[test]
    fn test_summary_in_dry_run() {
        let summary = SyncSummary {
            events: 1,
            wipe: WipeSummary::default(),
            publish: PublishSummary {
                total: 1,
                uploaded: 1,
                failed: 0,
            },
            dry_run: true,
        };

        let line = render_summary(&summary);
        assert!(line.contains("1 event generated"));
        assert!(line.contains("would upload 1/1"));
    }
}
