//! Deterministic demo dataset for the CLI and integration tests.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::store::job::{Job, JobStatus, Priority};
use crate::store::service_order::ServiceOrder;
use crate::store::technician::{
    DayOverride, LeaveKind, LeaveRange, Technician, TechnicianStatus,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn technicians() -> Vec<Technician> {
    vec![
        Technician::new("tech-1", "Dana", "Reyes")
            .with_contact("dana.reyes@example.com")
            .with_skills(&["hvac", "electrical"]),
        Technician::new("tech-2", "Marcus", "Webb")
            .with_contact("marcus.webb@example.com")
            .with_skills(&["plumbing"])
            .with_status(TechnicianStatus::Busy)
            .with_override(
                Weekday::Fri,
                DayOverride::working(t(7, 0), t(13, 0)),
            ),
        Technician::new("tech-3", "Priya", "Natarajan")
            .with_contact("priya.natarajan@example.com")
            .with_skills(&["hvac", "refrigeration"])
            .with_override(
                Weekday::Wed,
                DayOverride::working(t(9, 0), t(17, 0)).with_lunch(t(12, 0), t(12, 30)),
            ),
        Technician::new("tech-4", "Jonas", "Keller")
            .with_contact("jonas.keller@example.com")
            .with_skills(&["electrical", "controls"])
            .with_status(TechnicianStatus::OnLeave)
            .with_leave(LeaveRange {
                start: d(2024, 6, 10),
                end: d(2024, 6, 14),
                reason: "Parental leave".to_string(),
                kind: LeaveKind::Other,
            }),
    ]
}

pub fn service_orders() -> Vec<ServiceOrder> {
    vec![
        ServiceOrder::new("so-1", "Rooftop AHU overhaul - Meridian Plaza", Priority::High),
        ServiceOrder::new("so-2", "Cold room maintenance - Hafner Foods", Priority::Medium),
        ServiceOrder::new("so-3", "Emergency panel repair - Dock 4", Priority::Urgent),
    ]
}

pub fn jobs() -> Vec<Job> {
    let mut assigned = Job::new("job-1", "so-1", "Replace supply fan bearings")
        .with_skills(&["hvac"])
        .with_priority(Priority::High)
        .with_estimate(120);
    // Seed one committed assignment so the board view has content.
    assigned.technician_id = Some("tech-1".to_string());
    assigned.scheduled_start = Some(Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap());
    assigned.scheduled_end = Some(Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap());
    assigned.status = JobStatus::Assigned;

    let mut locked = Job::new("job-2", "so-1", "Recalibrate VAV controllers")
        .with_skills(&["controls"])
        .with_priority(Priority::Medium)
        .with_estimate(180);
    locked.technician_id = Some("tech-1".to_string());
    locked.scheduled_start = Some(Utc.with_ymd_and_hms(2024, 6, 10, 13, 0, 0).unwrap());
    locked.scheduled_end = Some(Utc.with_ymd_and_hms(2024, 6, 10, 16, 0, 0).unwrap());
    locked.status = JobStatus::Assigned;
    locked.locked = true;

    vec![
        assigned,
        locked,
        Job::new("job-3", "so-1", "Inspect ductwork insulation")
            .with_skills(&["hvac"])
            .with_priority(Priority::Medium)
            .with_estimate(90),
        Job::new("job-4", "so-2", "Defrost cycle diagnostics")
            .with_skills(&["refrigeration"])
            .with_priority(Priority::Medium)
            .with_estimate(60),
        Job::new("job-5", "so-2", "Replace door gaskets")
            .with_skills(&["refrigeration"])
            .with_priority(Priority::Low)
            .with_estimate(45),
        Job::new("job-6", "so-3", "Trace breaker fault")
            .with_skills(&["electrical"])
            .with_priority(Priority::Urgent)
            .with_estimate(120),
        Job::new("job-7", "so-3", "Torque and thermal-scan lugs")
            .with_skills(&["electrical"])
            .with_priority(Priority::High)
            .with_estimate(60),
    ]
}
