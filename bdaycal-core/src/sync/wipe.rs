//! Calendar wiping: delete every event file in the destination calendar.

use tracing::{info, warn};

use crate::dav::{DavClient, ICS_EXT};
use crate::error::BdayResult;
use crate::sync::report::{Reporter, SyncEvent};

/// Outcome of a wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WipeSummary {
    pub total: usize,
    /// Files deleted, or that would have been deleted in a dry run.
    pub deleted: usize,
    pub failed: usize,
}

/// Delete all `.ics` files in `calendar_url`.
///
/// Only the listing can fail the wipe. Each delete is best effort.
pub async fn wipe(
    client: &DavClient,
    calendar_url: &str,
    dry_run: bool,
    reporter: &mut dyn Reporter,
) -> BdayResult<WipeSummary> {
    let files = client.list(calendar_url, ICS_EXT).await?;
    let mut summary = WipeSummary {
        total: files.len(),
        ..WipeSummary::default()
    };

    for (idx, file) in files.iter().enumerate() {
        reporter.report(SyncEvent::Deleting {
            index: idx + 1,
            total: summary.total,
        });

        if dry_run {
            summary.deleted += 1;
            continue;
        }

        match client.delete(calendar_url, file).await {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                warn!("Failed to delete {}: {}", file, e);
                summary.failed += 1;
                reporter.report(SyncEvent::DeleteFailed {
                    file: file.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Wiped {} of {} events ({} failed)",
        summary.deleted, summary.total, summary.failed
    );
    Ok(summary)
}
