//! Progress reporting for a sync run.

use chrono::NaiveDate;

/// The three stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Harvest,
    Wipe,
    Publish,
}

/// Something worth telling the user about while a run progresses.
///
/// The failure variants are item-level: they are reported and the run
/// carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Emitted first when mutating requests are suppressed.
    DryRun,
    Phase(Phase),
    BirthdayFound { name: String, date: NaiveDate },
    /// Contact without a birthday. Only emitted when skip reporting is on.
    Skipped { name: String },
    InvalidBirthday { name: String, reason: String },
    InvalidContact { name: String, reason: String },
    MalformedCard { file: String, reason: String },
    Deleting { index: usize, total: usize },
    DeleteFailed { file: String, reason: String },
    Uploading { index: usize, total: usize },
    UploadFailed { uid: String, reason: String },
    Done { dry_run: bool },
}

/// Receiver for [`SyncEvent`]s.
pub trait Reporter {
    fn report(&mut self, event: SyncEvent);
}

/// Collects every event, mostly useful in tests.
impl Reporter for Vec<SyncEvent> {
    fn report(&mut self, event: SyncEvent) {
        self.push(event);
    }
}
