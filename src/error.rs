use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Malformed drag payload")]
    MalformedPayload,

    #[error("Drag payload is stale ({age_secs}s old)")]
    StalePayload { age_secs: i64 },

    #[error("Invalid transition: job {job_id} is {state}")]
    InvalidTransition {
        job_id: String,
        state: &'static str,
    },

    #[error("Invalid duration: {minutes} minutes is below the minimum")]
    InvalidDuration { minutes: i64 },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(&'static str),

    #[error("Slot on {date} falls outside the technician's working days")]
    SlotUnavailable { date: NaiveDate },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Technician not found: {0}")]
    TechnicianNotFound(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
