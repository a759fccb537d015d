pub mod job;
pub mod job_store;
pub mod service_order;
pub mod technician;

pub use job::{Job, JobStatus, Priority};
pub use job_store::{JobStore, ResizeOutcome};
pub use service_order::ServiceOrder;
pub use technician::{
    DayOverride, LeaveKind, LeaveRange, Technician, TechnicianMeta, TechnicianStatus, WorkingHours,
};
