use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::CalendarViewConfig;
use crate::engine::dispatcher::DispatchEngine;
use crate::engine::Notice;
use crate::error::{DispatchError, Result};
use crate::grid::availability::is_working_day;
use crate::store::job::Job;

/// The only payload kind this core accepts; other board surfaces (kanban
/// cards, order rows) use their own kinds and are rejected here.
pub const PAYLOAD_KIND_JOB: &str = "job";

/// Transfer object carried by a drag session from the unassigned-jobs list
/// onto the grid. `issued_at` guards against drops from abandoned sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragPayload {
    pub kind: String,
    pub item: Option<Job>,
    pub issued_at: DateTime<Utc>,
    pub token: Uuid,
}

impl DragPayload {
    pub fn for_job(job: &Job) -> Self {
        Self {
            kind: PAYLOAD_KIND_JOB.to_string(),
            item: Some(job.clone()),
            issued_at: Utc::now(),
            token: Uuid::new_v4(),
        }
    }

    /// Checks shape and age; returns the carried job on success.
    pub fn validate(&self, now: DateTime<Utc>, max_age_secs: i64) -> Result<&Job> {
        if self.kind != PAYLOAD_KIND_JOB {
            return Err(DispatchError::MalformedPayload);
        }
        let job = self.item.as_ref().ok_or(DispatchError::MalformedPayload)?;
        let age_secs = (now - self.issued_at).num_seconds();
        if age_secs > max_age_secs {
            return Err(DispatchError::StalePayload { age_secs });
        }
        Ok(job)
    }
}

/// A (technician, date, hour) drop target on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub technician_id: String,
    pub date: NaiveDate,
    pub hour: u32,
}

impl Slot {
    pub fn new(technician_id: impl Into<String>, date: NaiveDate, hour: u32) -> Self {
        Self {
            technician_id: technician_id.into(),
            date,
            hour,
        }
    }
}

/// A validated drop, ready to commit. `conflicts` lists already-scheduled
/// jobs overlapping the candidate range; they warn, they do not block.
#[derive(Debug, Clone)]
pub struct PlacementResolution {
    pub job_id: String,
    pub technician_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub conflicts: Vec<String>,
}

impl DispatchEngine {
    /// Resolve a drop target into a concrete candidate assignment.
    ///
    /// The derived duration is the engine's default; the job's own estimate
    /// is deliberately not consulted (see DESIGN.md). Non-working cells
    /// never reach time derivation.
    pub async fn resolve_drop(
        &self,
        payload: &DragPayload,
        slot: &Slot,
        view: &CalendarViewConfig,
    ) -> Result<PlacementResolution> {
        let job = payload.validate(Utc::now(), self.config().max_payload_age_secs)?;

        let tech = self
            .technician(&slot.technician_id)
            .await
            .ok_or_else(|| DispatchError::TechnicianNotFound(slot.technician_id.clone()))?;
        if !is_working_day(&tech, slot.date, view.include_weekends) {
            return Err(DispatchError::SlotUnavailable { date: slot.date });
        }

        let start = slot
            .date
            .and_hms_opt(slot.hour, 0, 0)
            .ok_or(DispatchError::PreconditionFailed("invalid slot hour"))?
            .and_utc();
        let end = start + Duration::minutes(self.config().default_assignment_duration_min);

        let conflicts = self
            .job_table()
            .read()
            .await
            .overlapping_jobs(&slot.technician_id, start, end)
            .into_iter()
            .filter(|j| j.id != job.id)
            .map(|j| j.id.clone())
            .collect();

        Ok(PlacementResolution {
            job_id: job.id.clone(),
            technician_id: slot.technician_id.clone(),
            start,
            end,
            conflicts,
        })
    }

    /// Commit a resolved drop through the assignment state machine.
    pub async fn commit_drop(&self, resolution: &PlacementResolution) -> Result<()> {
        self.assign_job(
            &resolution.job_id,
            &resolution.technician_id,
            resolution.start,
            resolution.end,
        )
        .await
    }

    /// Full drop protocol for UI callers: resolve, commit, and convert the
    /// outcome into a user-facing notice. On failure nothing is mutated.
    pub async fn drop_job(
        &self,
        payload: &DragPayload,
        slot: &Slot,
        view: &CalendarViewConfig,
    ) -> Notice {
        let resolution = match self.resolve_drop(payload, slot, view).await {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!(error = %err, "Drop rejected");
                return Notice::error(err.to_string());
            }
        };
        match self.commit_drop(&resolution).await {
            Ok(()) => {
                if resolution.conflicts.is_empty() {
                    Notice::info(format!(
                        "Assigned {} to {}",
                        resolution.job_id, resolution.technician_id
                    ))
                } else {
                    Notice::warning(format!(
                        "Assigned {} to {}; overlaps {}",
                        resolution.job_id,
                        resolution.technician_id,
                        resolution.conflicts.join(", ")
                    ))
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Drop commit failed");
                Notice::error(err.to_string())
            }
        }
    }
}
