//! Event publishing: upload each birthday event as its own `.ics` file.

use tracing::{info, warn};

use crate::dav::{DavClient, ICS_EXT};
use crate::event::BirthdayEvent;
use crate::ics::generate_ics;
use crate::sync::report::{Reporter, SyncEvent};

/// Outcome of a publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub total: usize,
    /// Files uploaded, or that would have been uploaded in a dry run.
    pub uploaded: usize,
    pub failed: usize,
}

/// File name an event is stored under.
pub fn event_file_name(event: &BirthdayEvent) -> String {
    format!("{}{}", event.uid(), ICS_EXT)
}

/// Upload every event to `calendar_url`, replacing any file of the same name.
///
/// Uploads are best effort: a failure is reported and the rest continue.
pub async fn publish(
    client: &DavClient,
    calendar_url: &str,
    events: &[BirthdayEvent],
    dry_run: bool,
    reporter: &mut dyn Reporter,
) -> PublishSummary {
    let mut summary = PublishSummary {
        total: events.len(),
        ..PublishSummary::default()
    };

    for (idx, event) in events.iter().enumerate() {
        let ics = generate_ics(event);
        reporter.report(SyncEvent::Uploading {
            index: idx + 1,
            total: summary.total,
        });

        if dry_run {
            summary.uploaded += 1;
            continue;
        }

        match client
            .put_calendar(calendar_url, &event_file_name(event), ics)
            .await
        {
            Ok(()) => summary.uploaded += 1,
            Err(e) => {
                warn!("Failed to upload event {}: {}", event.uid(), e);
                summary.failed += 1;
                reporter.report(SyncEvent::UploadFailed {
                    uid: event.uid().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Uploaded {} of {} events ({} failed)",
        summary.uploaded, summary.total, summary.failed
    );
    summary
}
