//! Upload batch status summarization.
//!
//! The UI shows one line per submission batch. The phrasing priority is a
//! contract: in-flight beats errored beats all-complete, regardless of the
//! mix of statuses underneath.

use crate::models::UploadStatus;

/// Aggregate view over a batch of upload jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub total: usize,
    pub complete: usize,
    pub errored: usize,
    /// Jobs not yet in a terminal status
    pub in_flight: usize,
}

impl BatchProgress {
    /// Tally statuses for one batch.
    pub fn tally(statuses: &[UploadStatus]) -> Self {
        let mut progress = Self {
            total: statuses.len(),
            complete: 0,
            errored: 0,
            in_flight: 0,
        };
        for status in statuses {
            match status {
                UploadStatus::Complete => progress.complete += 1,
                UploadStatus::Error => progress.errored += 1,
                UploadStatus::Pending | UploadStatus::Uploading | UploadStatus::Processing => {
                    progress.in_flight += 1
                }
            }
        }
        progress
    }

    /// Render the single-line summary.
    ///
    /// Priority order (contractual, asserted by tests):
    /// 1. any job still in flight → progress phrasing with the count;
    /// 2. else any job errored → completion-with-errors phrasing;
    /// 3. else → plain completion phrasing.
    pub fn summary(&self) -> String {
        if self.in_flight > 0 {
            format!("{} upload(s) in progress", self.in_flight)
        } else if self.errored > 0 {
            format!("complete with {} error(s)", self.errored)
        } else {
            format!("{} of {} uploads complete", self.complete, self.total)
        }
    }
}

/// Convenience wrapper: tally and render in one call.
pub fn batch_summary(statuses: &[UploadStatus]) -> String {
    BatchProgress::tally(statuses).summary()
}
