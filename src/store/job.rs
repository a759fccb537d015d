use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unassigned,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Unassigned => write!(f, "unassigned"),
            JobStatus::Assigned => write!(f, "assigned"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A unit of dispatchable work belonging to a service order.
///
/// Scheduling state (technician, start, end, lock) is mutated only through
/// the `JobStore` transitions; everything else is descriptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub service_order_id: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub priority: Priority,
    pub estimated_duration_min: i64,
    pub status: JobStatus,
    pub technician_id: Option<String>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub scheduled_end: Option<DateTime<Utc>>,
    pub locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(
        id: impl Into<String>,
        service_order_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_order_id: service_order_id.into(),
            title: title.into(),
            description: String::new(),
            required_skills: Vec::new(),
            priority: Priority::Medium,
            estimated_duration_min: 60,
            status: JobStatus::Unassigned,
            technician_id: None,
            scheduled_start: None,
            scheduled_end: None,
            locked: false,
            updated_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.required_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_estimate(mut self, minutes: i64) -> Self {
        self.estimated_duration_min = minutes;
        self
    }

    /// Whether the job carries a concrete technician/time binding.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some()
    }

    /// Scheduled duration in minutes, when both ends are set.
    pub fn duration_min(&self) -> Option<i64> {
        match (self.scheduled_start, self.scheduled_end) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        }
    }

    /// Verifies the record-level invariants:
    /// locked implies an assigned, fully-scheduled job, and the technician
    /// and both schedule bounds are either all set or all cleared.
    pub fn check_invariants(&self) -> std::result::Result<(), &'static str> {
        if self.locked {
            if self.status != JobStatus::Assigned {
                return Err("locked job is not in assigned status");
            }
            if self.scheduled_start.is_none() || self.scheduled_end.is_none() {
                return Err("locked job has no scheduled time");
            }
        }
        let bound = [
            self.technician_id.is_some(),
            self.scheduled_start.is_some(),
            self.scheduled_end.is_some(),
        ];
        if bound.iter().any(|b| *b) && !bound.iter().all(|b| *b) {
            return Err("technician/start/end must be set or cleared together");
        }
        Ok(())
    }
}
