//! Download status cursor
//!
//! Holds at most one "currently downloading" label so the per-frame peek
//! never produces the same user-facing notice twice in a row.

/// Deduplicates in-progress transfer notifications against the latest label
#[derive(Debug, Default)]
pub struct DownloadTracker {
    latest: Option<String>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an in-progress label.
    ///
    /// Returns `true` when the label differs from the tracked cursor and a
    /// notification should be emitted.
    pub fn observe(&mut self, label: &str) -> bool {
        if self.latest.as_deref() == Some(label) {
            return false;
        }
        self.latest = Some(label.to_owned());
        true
    }

    /// Clear the cursor when the transfer it names has fully arrived.
    /// A completion for any other label leaves the cursor alone.
    pub fn complete(&mut self, label: &str) {
        if self.latest.as_deref() == Some(label) {
            self.latest = None;
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }
}
