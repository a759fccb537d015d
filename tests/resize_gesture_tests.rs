use chrono::{DateTime, TimeZone, Utc};

use dispatchboard::config::EngineConfig;
use dispatchboard::engine::DispatchEngine;
use dispatchboard::gesture::resize::snap_minutes;
use dispatchboard::gesture::{
    GesturePhase, GrabZone, PointerPos, PreviewChannel, ResizeGesture, BODY_DRAG_DEFAULT_MIN,
};
use dispatchboard::seed;
use dispatchboard::store::job::Job;

const HOUR_WIDTH: f32 = 60.0;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, hour, minute, 0).unwrap()
}

fn pos(x: f32, y: f32) -> PointerPos {
    PointerPos { x, y }
}

fn scheduled_job(start: DateTime<Utc>, end: DateTime<Utc>) -> Job {
    let mut job = Job::new("job-3", "so-1", "Inspect ductwork");
    job.status = dispatchboard::store::job::JobStatus::Assigned;
    job.technician_id = Some("tech-3".to_string());
    job.scheduled_start = Some(start);
    job.scheduled_end = Some(end);
    job
}

// ==================== snapping ====================

#[test]
fn raw_delta_snaps_to_nearest_quarter_hour() {
    assert_eq!(snap_minutes(22.0, 15), 15);
    assert_eq!(snap_minutes(23.0, 15), 30);
    assert_eq!(snap_minutes(7.0, 15), 0);
    assert_eq!(snap_minutes(-22.0, 15), -15);
    assert_eq!(snap_minutes(0.0, 15), 0);
}

// ==================== edge drag ====================

#[test]
fn edge_drag_publishes_snapped_preview_and_commits_once() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Edge, pos(500.0, 40.0), HOUR_WIDTH, &config)
            .expect("unlocked scheduled job starts a gesture");
    assert_eq!(gesture.phase(), GesturePhase::EdgeResizing);

    // 22 raw minutes of travel snaps to +15.
    gesture.pointer_moved(pos(500.0 + 22.0, 40.0));
    gesture.tick(&mut preview);
    assert_eq!(preview.get("job-3").unwrap().candidate_end, at(12, 15));

    let end = gesture.finish(&mut preview);
    assert!(preview.is_empty());
    assert_eq!(end.commit_end, Some(at(12, 15)));
    assert!(!end.suppress_click);
}

#[test]
fn edge_drag_below_minimum_never_publishes() {
    let job = scheduled_job(at(9, 0), at(9, 30));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config).unwrap();

    // -30 px = -30 min: candidate duration would be zero.
    gesture.pointer_moved(pos(-30.0, 0.0));
    gesture.tick(&mut preview);
    assert!(preview.get("job-3").is_none());

    let end = gesture.finish(&mut preview);
    assert!(end.commit_end.is_none());
}

#[test]
fn edge_drag_keeps_last_valid_candidate_after_invalid_move() {
    let job = scheduled_job(at(9, 0), at(10, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config).unwrap();

    // Valid: +30 min.
    gesture.pointer_moved(pos(30.0, 0.0));
    gesture.tick(&mut preview);
    assert_eq!(preview.get("job-3").unwrap().candidate_end, at(10, 30));

    // Invalid: -60 min would leave a zero-length job; preview keeps the
    // last valid candidate.
    gesture.pointer_moved(pos(-60.0, 0.0));
    gesture.tick(&mut preview);
    assert_eq!(preview.get("job-3").unwrap().candidate_end, at(10, 30));

    let end = gesture.finish(&mut preview);
    assert_eq!(end.commit_end, Some(at(10, 30)));
}

#[test]
fn moves_within_one_tick_coalesce_to_the_latest() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config).unwrap();

    gesture.pointer_moved(pos(15.0, 0.0));
    gesture.pointer_moved(pos(60.0, 0.0));
    gesture.tick(&mut preview);

    // Only the latest position applied: +60 min, not +15.
    assert_eq!(preview.get("job-3").unwrap().candidate_end, at(13, 0));
}

// ==================== body drag ====================

#[test]
fn small_body_movement_stays_pending_and_keeps_click() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Body, pos(100.0, 100.0), HOUR_WIDTH, &config)
            .unwrap();
    assert_eq!(gesture.phase(), GesturePhase::Pending);

    gesture.pointer_moved(pos(103.0, 105.0));
    gesture.tick(&mut preview);
    assert_eq!(gesture.phase(), GesturePhase::Pending);
    assert!(preview.is_empty());

    let end = gesture.finish(&mut preview);
    assert!(end.commit_end.is_none());
    assert!(!end.suppress_click);
}

#[test]
fn dominant_vertical_movement_becomes_body_resize() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Body, pos(100.0, 100.0), HOUR_WIDTH, &config)
            .unwrap();

    gesture.pointer_moved(pos(102.0, 112.0));
    gesture.tick(&mut preview);
    assert_eq!(gesture.phase(), GesturePhase::BodyResizing);
    assert!(gesture.suppress_click());

    // Conversion resets the candidate to start + 60 min.
    assert_eq!(
        preview.get("job-3").unwrap().candidate_end,
        at(9, 0) + chrono::Duration::minutes(BODY_DRAG_DEFAULT_MIN)
    );
}

#[test]
fn horizontal_movement_does_not_convert_a_body_grab() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Body, pos(100.0, 100.0), HOUR_WIDTH, &config)
            .unwrap();

    gesture.pointer_moved(pos(140.0, 110.0));
    gesture.tick(&mut preview);
    assert_eq!(gesture.phase(), GesturePhase::Pending);
}

#[test]
fn body_resize_tracks_twenty_pixels_per_step() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Body, pos(100.0, 100.0), HOUR_WIDTH, &config)
            .unwrap();

    // Convert to body resize.
    gesture.pointer_moved(pos(100.0, 112.0));
    gesture.tick(&mut preview);

    // 40 px further down = two 15-minute steps past the 60-minute default.
    gesture.pointer_moved(pos(100.0, 152.0));
    gesture.tick(&mut preview);
    assert_eq!(preview.get("job-3").unwrap().candidate_end, at(10, 30));

    let end = gesture.finish(&mut preview);
    assert_eq!(end.commit_end, Some(at(10, 30)));
    assert!(end.suppress_click);
}

// ==================== locked and cancel paths ====================

#[test]
fn locked_job_never_starts_a_gesture() {
    let mut job = scheduled_job(at(9, 0), at(12, 0));
    job.locked = true;
    let config = EngineConfig::immediate();

    assert!(ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config)
        .is_none());
    assert!(ResizeGesture::begin(&job, GrabZone::Body, pos(0.0, 0.0), HOUR_WIDTH, &config)
        .is_none());
}

#[test]
fn unscheduled_job_never_starts_a_gesture() {
    let job = Job::new("job-9", "so-1", "Unscheduled");
    let config = EngineConfig::immediate();
    assert!(ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config)
        .is_none());
}

#[test]
fn cancel_clears_preview_without_commit() {
    let job = scheduled_job(at(9, 0), at(12, 0));
    let mut preview = PreviewChannel::new();
    let config = EngineConfig::immediate();

    let mut gesture =
        ResizeGesture::begin(&job, GrabZone::Edge, pos(0.0, 0.0), HOUR_WIDTH, &config).unwrap();
    gesture.pointer_moved(pos(60.0, 0.0));
    gesture.tick(&mut preview);
    assert_eq!(preview.len(), 1);

    gesture.cancel(&mut preview);
    assert!(preview.is_empty());
}

// ==================== gesture commit through the engine ====================

#[tokio::test]
async fn finished_gesture_commits_exactly_one_resize() {
    let engine = DispatchEngine::with_dataset(
        EngineConfig::immediate(),
        seed::jobs(),
        seed::technicians(),
        seed::service_orders(),
    );
    engine
        .assign_job("job-3", "tech-3", at(9, 0), at(12, 0))
        .await
        .unwrap();
    let job = engine.job("job-3").await.unwrap();

    let mut preview = PreviewChannel::new();
    let mut gesture = ResizeGesture::begin(
        &job,
        GrabZone::Edge,
        pos(0.0, 0.0),
        HOUR_WIDTH,
        engine.config(),
    )
    .unwrap();
    gesture.pointer_moved(pos(45.0, 0.0));
    gesture.tick(&mut preview);
    let end = gesture.finish(&mut preview);

    let notice = engine.commit_resize_gesture(&end).await;
    assert!(notice.is_some());
    assert_eq!(
        engine.job("job-3").await.unwrap().scheduled_end,
        Some(at(12, 45))
    );
}

/// A job locked after the gesture started still commits as a soft no-op:
/// the schedule stays at its locked value.
#[tokio::test]
async fn gesture_commit_on_locked_job_changes_nothing() {
    let engine = DispatchEngine::with_dataset(
        EngineConfig::immediate(),
        seed::jobs(),
        seed::technicians(),
        seed::service_orders(),
    );
    engine
        .assign_job("job-3", "tech-3", at(9, 0), at(12, 0))
        .await
        .unwrap();
    let job = engine.job("job-3").await.unwrap();

    let mut preview = PreviewChannel::new();
    let mut gesture = ResizeGesture::begin(
        &job,
        GrabZone::Edge,
        pos(0.0, 0.0),
        HOUR_WIDTH,
        engine.config(),
    )
    .unwrap();
    gesture.pointer_moved(pos(60.0, 0.0));
    gesture.tick(&mut preview);
    let end = gesture.finish(&mut preview);

    // Lock lands between gesture end and commit.
    engine.lock_job("job-3").await.unwrap();

    let notice = engine.commit_resize_gesture(&end).await.unwrap();
    assert!(notice.message.contains("locked"));
    assert_eq!(
        engine.job("job-3").await.unwrap().scheduled_end,
        Some(at(12, 0))
    );
}
