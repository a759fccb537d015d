use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A live resize candidate for one job block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizePreview {
    pub job_id: String,
    pub candidate_end: DateTime<Utc>,
}

/// Transient projection of in-progress resizes, keyed by job id.
///
/// This channel is UI-local: the job store never reads it, and every entry
/// is cleared when its gesture ends, whether committed or cancelled.
#[derive(Debug, Default)]
pub struct PreviewChannel {
    entries: HashMap<String, ResizePreview>,
}

impl PreviewChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, job_id: &str, candidate_end: DateTime<Utc>) {
        self.entries.insert(
            job_id.to_string(),
            ResizePreview {
                job_id: job_id.to_string(),
                candidate_end,
            },
        );
    }

    pub fn get(&self, job_id: &str) -> Option<&ResizePreview> {
        self.entries.get(job_id)
    }

    pub fn clear(&mut self, job_id: &str) {
        self.entries.remove(job_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
