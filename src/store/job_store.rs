use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{DispatchError, Result};
use crate::store::job::{Job, JobStatus};

pub const DEFAULT_MIN_DURATION_MIN: i64 = 15;

/// Result of a resize request. A locked job ignores the request instead of
/// failing, so callers can tell a rejection from a soft no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Resized,
    IgnoredLocked,
}

/// The single mutable job table.
///
/// Every schedule mutation in the crate funnels through the four transitions
/// below; nothing else writes a job's technician/time/lock fields.
#[derive(Debug)]
pub struct JobStore {
    jobs: HashMap<String, Job>,
    min_duration_min: i64,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self::with_min_duration(DEFAULT_MIN_DURATION_MIN)
    }

    pub fn with_min_duration(min_duration_min: i64) -> Self {
        Self {
            jobs: HashMap::new(),
            min_duration_min,
        }
    }

    pub fn add_job(&mut self, job: Job) {
        self.jobs.insert(job.id.clone(), job);
    }

    pub fn get_job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Bind a job to a technician and time range.
    ///
    /// Valid from `Unassigned` or `Assigned` (re-assignment allowed);
    /// idempotent for identical arguments. Locked jobs must be unassigned
    /// first.
    pub fn assign(
        &mut self,
        job_id: &str,
        technician_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()> {
        let job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| DispatchError::JobNotFound(job_id.to_string()))?;

        if job.locked {
            return Err(DispatchError::InvalidTransition {
                job_id: job_id.to_string(),
                state: "locked",
            });
        }
        match job.status {
            JobStatus::Unassigned | JobStatus::Assigned => {}
            JobStatus::InProgress => {
                return Err(DispatchError::InvalidTransition {
                    job_id: job_id.to_string(),
                    state: "in_progress",
                })
            }
            JobStatus::Completed => {
                return Err(DispatchError::InvalidTransition {
                    job_id: job_id.to_string(),
                    state: "completed",
                })
            }
            JobStatus::Cancelled => {
                return Err(DispatchError::InvalidTransition {
                    job_id: job_id.to_string(),
                    state: "cancelled",
                })
            }
        }
        let minutes = (end - start).num_minutes();
        if minutes <= 0 {
            return Err(DispatchError::InvalidDuration { minutes });
        }

        job.technician_id = Some(technician_id.to_string());
        job.scheduled_start = Some(start);
        job.scheduled_end = Some(end);
        job.status = JobStatus::Assigned;
        job.locked = false;
        job.updated_at = Utc::now();
        Ok(())
    }

    /// Mark an assignment immutable. A no-op (`Ok(false)`) when already
    /// locked.
    pub fn lock(&mut self, job_id: &str) -> Result<bool> {
        let job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| DispatchError::JobNotFound(job_id.to_string()))?;

        if job.locked {
            return Ok(false);
        }
        if job.status != JobStatus::Assigned {
            return Err(DispatchError::InvalidTransition {
                job_id: job_id.to_string(),
                state: match job.status {
                    JobStatus::Unassigned => "unassigned",
                    JobStatus::InProgress => "in_progress",
                    JobStatus::Completed => "completed",
                    JobStatus::Cancelled => "cancelled",
                    JobStatus::Assigned => unreachable!(),
                },
            });
        }
        if job.scheduled_start.is_none() || job.scheduled_end.is_none() {
            return Err(DispatchError::PreconditionFailed(
                "job has no scheduled time",
            ));
        }

        job.locked = true;
        job.updated_at = Utc::now();
        Ok(true)
    }

    /// Recompute a job's scheduled end.
    ///
    /// Locked jobs ignore the request (`IgnoredLocked`) rather than erroring;
    /// durations under the minimum are rejected and leave the job untouched.
    pub fn resize(&mut self, job_id: &str, new_end: DateTime<Utc>) -> Result<ResizeOutcome> {
        let job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| DispatchError::JobNotFound(job_id.to_string()))?;

        if job.locked {
            return Ok(ResizeOutcome::IgnoredLocked);
        }
        let start = job
            .scheduled_start
            .ok_or(DispatchError::PreconditionFailed("job has no scheduled time"))?;
        let minutes = (new_end - start).num_minutes();
        if minutes < self.min_duration_min {
            return Err(DispatchError::InvalidDuration { minutes });
        }

        job.scheduled_end = Some(new_end);
        job.updated_at = Utc::now();
        Ok(ResizeOutcome::Resized)
    }

    /// Return a job to the unassigned pool. Permitted from any state,
    /// including locked; clears technician, schedule, and lock.
    pub fn unassign(&mut self, job_id: &str) -> Result<()> {
        let job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| DispatchError::JobNotFound(job_id.to_string()))?;

        job.technician_id = None;
        job.scheduled_start = None;
        job.scheduled_end = None;
        job.locked = false;
        job.status = JobStatus::Unassigned;
        job.updated_at = Utc::now();
        Ok(())
    }

    pub fn unassigned_jobs(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self
            .jobs
            .values()
            .filter(|j| j.status == JobStatus::Unassigned)
            .collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    /// Jobs bound to a technician whose scheduled start falls on the given
    /// day, sorted by start.
    pub fn jobs_for_technician_and_day(&self, technician_id: &str, date: NaiveDate) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self
            .jobs
            .values()
            .filter(|j| j.technician_id.as_deref() == Some(technician_id))
            .filter(|j| {
                j.scheduled_start
                    .map(|s| s.date_naive() == date)
                    .unwrap_or(false)
            })
            .collect();
        jobs.sort_by_key(|j| j.scheduled_start);
        jobs
    }

    /// Jobs on a technician's schedule that overlap `[start, end)`.
    pub fn overlapping_jobs(
        &self,
        technician_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|j| j.technician_id.as_deref() == Some(technician_id))
            .filter(|j| match (j.scheduled_start, j.scheduled_end) {
                (Some(s), Some(e)) => s < end && start < e,
                _ => false,
            })
            .collect()
    }

    pub fn all_jobs(&self) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs.values().collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
