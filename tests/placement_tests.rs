use chrono::{Duration, NaiveDate, TimeZone, Utc};

use dispatchboard::config::{CalendarViewConfig, EngineConfig};
use dispatchboard::engine::{DispatchEngine, DragPayload, NoticeLevel, Slot};
use dispatchboard::error::DispatchError;
use dispatchboard::seed;
use dispatchboard::store::job::JobStatus;

fn seeded_engine() -> DispatchEngine {
    DispatchEngine::with_dataset(
        EngineConfig::immediate(),
        seed::jobs(),
        seed::technicians(),
        seed::service_orders(),
    )
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Dropping an unassigned job onto a grid cell derives the engine's default
/// duration (3 h), not the job's own estimate.
#[tokio::test]
async fn drop_assigns_default_duration_block() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();
    assert_eq!(job.estimated_duration_min, 90);

    let payload = DragPayload::for_job(&job);
    let slot = Slot::new("tech-3", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let resolution = engine.resolve_drop(&payload, &slot, &view).await.unwrap();
    assert_eq!(
        resolution.start,
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    );
    assert_eq!(
        resolution.end,
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    );

    engine.commit_drop(&resolution).await.unwrap();
    let job = engine.job("job-3").await.unwrap();
    assert_eq!(job.status, JobStatus::Assigned);
    assert_eq!(job.technician_id.as_deref(), Some("tech-3"));
    assert_eq!(
        job.scheduled_start,
        Some(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap())
    );
    assert_eq!(
        job.scheduled_end,
        Some(Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn stale_payload_is_rejected_and_job_unchanged() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();

    let mut payload = DragPayload::for_job(&job);
    payload.issued_at = Utc::now() - Duration::seconds(31);
    let slot = Slot::new("tech-3", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::StalePayload { age_secs } if age_secs >= 31));

    let job = engine.job("job-3").await.unwrap();
    assert_eq!(job.status, JobStatus::Unassigned);
    assert!(job.scheduled_start.is_none());
}

#[tokio::test]
async fn payload_just_inside_age_limit_is_accepted() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();

    let mut payload = DragPayload::for_job(&job);
    payload.issued_at = Utc::now() - Duration::seconds(29);
    let slot = Slot::new("tech-3", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    assert!(engine.resolve_drop(&payload, &slot, &view).await.is_ok());
}

#[tokio::test]
async fn wrong_payload_kind_is_malformed() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();

    let mut payload = DragPayload::for_job(&job);
    payload.kind = "task".to_string();
    let slot = Slot::new("tech-3", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::MalformedPayload));
}

#[tokio::test]
async fn missing_item_is_malformed() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();

    let mut payload = DragPayload::for_job(&job);
    payload.item = None;
    let slot = Slot::new("tech-3", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::MalformedPayload));
}

#[tokio::test]
async fn weekend_cell_never_reaches_time_derivation() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();
    let payload = DragPayload::for_job(&job);

    // 2024-06-08 is a Saturday; tech-3 has no Saturday override.
    let slot = Slot::new("tech-3", day(2024, 6, 8), 9);
    let view = CalendarViewConfig::default();

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::SlotUnavailable { .. }));

    // Same cell with weekends shown resolves fine.
    let view = view.with_weekends(true);
    assert!(engine.resolve_drop(&payload, &slot, &view).await.is_ok());
}

#[tokio::test]
async fn leave_day_is_not_droppable() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();
    let payload = DragPayload::for_job(&job);

    // tech-4 is on leave 2024-06-10 through 2024-06-14.
    let slot = Slot::new("tech-4", day(2024, 6, 12), 9);
    let view = CalendarViewConfig::default().with_weekends(true);

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::SlotUnavailable { .. }));
}

#[tokio::test]
async fn unknown_technician_cell_is_not_found() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();
    let payload = DragPayload::for_job(&job);
    let slot = Slot::new("tech-99", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let err = engine.resolve_drop(&payload, &slot, &view).await.unwrap_err();
    assert!(matches!(err, DispatchError::TechnicianNotFound(_)));
}

/// Overlaps warn but never block: the resolver lists the colliding jobs and
/// the commit still lands.
#[tokio::test]
async fn overlapping_slot_reports_conflicts_but_commits() {
    let engine = seeded_engine();
    let job = engine.job("job-3").await.unwrap();
    let payload = DragPayload::for_job(&job);

    // job-1 is seeded on tech-1 from 08:00 to 10:00 that day.
    let slot = Slot::new("tech-1", day(2024, 6, 10), 9);
    let view = CalendarViewConfig::default();

    let resolution = engine.resolve_drop(&payload, &slot, &view).await.unwrap();
    assert!(resolution.conflicts.contains(&"job-1".to_string()));

    engine.commit_drop(&resolution).await.unwrap();
    assert_eq!(
        engine.job("job-3").await.unwrap().technician_id.as_deref(),
        Some("tech-1")
    );
}

/// The full drop protocol converts failures into notices and leaves the job
/// untouched; a locked job cannot be re-assigned by a drop.
#[tokio::test]
async fn drop_on_locked_job_surfaces_notice_without_mutation() {
    let engine = seeded_engine();
    let locked = engine.job("job-2").await.unwrap();
    assert!(locked.locked);
    let before = locked.clone();

    let payload = DragPayload::for_job(&locked);
    let slot = Slot::new("tech-3", day(2024, 6, 11), 10);
    let view = CalendarViewConfig::default();

    let notice = engine.drop_job(&payload, &slot, &view).await;
    assert_eq!(notice.level, NoticeLevel::Error);

    let after = engine.job("job-2").await.unwrap();
    assert_eq!(after.technician_id, before.technician_id);
    assert_eq!(after.scheduled_start, before.scheduled_start);
    assert_eq!(after.scheduled_end, before.scheduled_end);
    assert!(after.locked);
}

#[tokio::test]
async fn successful_drop_returns_info_notice() {
    let engine = seeded_engine();
    let job = engine.job("job-4").await.unwrap();
    let payload = DragPayload::for_job(&job);
    let slot = Slot::new("tech-2", day(2024, 6, 11), 8);
    let view = CalendarViewConfig::default();

    let notice = engine.drop_job(&payload, &slot, &view).await;
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(engine.job("job-4").await.unwrap().status, JobStatus::Assigned);
}
