//! Pointer-driven duration editing.
//!
//! Two gestures share one session type: grabbing the trailing edge resizes
//! freely with snapping, while a vertical drag on the block body resets the
//! job to a default duration and then tracks further movement in fixed
//! steps. The session only ever writes the preview channel; the single
//! commit happens after the gesture ends, through the assignment state
//! machine.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::engine::{DispatchEngine, Notice};
use crate::gesture::preview::PreviewChannel;
use crate::store::job::Job;
use crate::store::job_store::ResizeOutcome;

/// Vertical movement needed before a body grab becomes a resize gesture.
pub const BODY_DRAG_THRESHOLD_PX: f32 = 8.0;
/// Vertical pixels per snap step while body-resizing.
pub const BODY_DRAG_PX_PER_STEP: f32 = 20.0;
/// Duration a body-drag resets the job to before tracking begins.
pub const BODY_DRAG_DEFAULT_MIN: i64 = 60;

/// Where the pointer went down on the job block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabZone {
    /// The trailing (right) edge handle.
    Edge,
    /// Anywhere else on the block.
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Body grab waiting for the movement threshold; may still become a
    /// plain click.
    Pending,
    EdgeResizing,
    BodyResizing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

/// Snap raw minutes to the nearest multiple of `step`.
pub fn snap_minutes(raw: f64, step: i64) -> i64 {
    (raw / step as f64).round() as i64 * step
}

/// Outcome of a finished gesture. `commit_end` is the last valid candidate;
/// `None` means the gesture never produced one and nothing is committed.
#[derive(Debug, Clone)]
pub struct GestureEnd {
    pub job_id: String,
    pub commit_end: Option<DateTime<Utc>>,
    pub suppress_click: bool,
}

/// One tracked pointer session on a job block.
///
/// Pointer moves are coalesced: `pointer_moved` only records the latest
/// position, and `tick` (the frame callback) applies it, so a burst of move
/// events costs one preview recomputation.
#[derive(Debug)]
pub struct ResizeGesture {
    token: Uuid,
    job_id: String,
    phase: GesturePhase,
    origin: PointerPos,
    start: DateTime<Utc>,
    original_end: DateTime<Utc>,
    hour_column_width: f32,
    min_duration_min: i64,
    snap_step_min: i64,
    body_anchor_y: Option<f32>,
    last_valid_end: Option<DateTime<Utc>>,
    pending_move: Option<PointerPos>,
    suppress_click: bool,
}

impl ResizeGesture {
    /// Start tracking a pointer-down on a job block.
    ///
    /// Returns `None` for locked or unscheduled jobs; both gestures no-op
    /// immediately on those.
    pub fn begin(
        job: &Job,
        zone: GrabZone,
        origin: PointerPos,
        hour_column_width: f32,
        config: &EngineConfig,
    ) -> Option<Self> {
        if job.locked {
            return None;
        }
        let (start, end) = match (job.scheduled_start, job.scheduled_end) {
            (Some(s), Some(e)) => (s, e),
            _ => return None,
        };
        let phase = match zone {
            GrabZone::Edge => GesturePhase::EdgeResizing,
            GrabZone::Body => GesturePhase::Pending,
        };
        Some(Self {
            token: Uuid::new_v4(),
            job_id: job.id.clone(),
            phase,
            origin,
            start,
            original_end: end,
            hour_column_width,
            min_duration_min: config.min_duration_min,
            snap_step_min: config.snap_step_min,
            body_anchor_y: None,
            last_valid_end: None,
            pending_move: None,
            suppress_click: false,
        })
    }

    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn suppress_click(&self) -> bool {
        self.suppress_click
    }

    /// Record a pointer move. Coalesces with any move already pending for
    /// the current tick.
    pub fn pointer_moved(&mut self, pos: PointerPos) {
        self.pending_move = Some(pos);
    }

    /// Apply the latest pending pointer position and publish a preview when
    /// it yields a valid candidate.
    pub fn tick(&mut self, preview: &mut PreviewChannel) {
        let Some(pos) = self.pending_move.take() else {
            return;
        };
        match self.phase {
            GesturePhase::Pending => {
                let dx = pos.x - self.origin.x;
                let dy = pos.y - self.origin.y;
                if dy.abs() > BODY_DRAG_THRESHOLD_PX && dy.abs() > dx.abs() {
                    self.phase = GesturePhase::BodyResizing;
                    self.suppress_click = true;
                    self.body_anchor_y = Some(pos.y);
                    let candidate = self.start + Duration::minutes(BODY_DRAG_DEFAULT_MIN);
                    self.accept_candidate(candidate, preview);
                }
            }
            GesturePhase::BodyResizing => {
                let anchor = self.body_anchor_y.unwrap_or(self.origin.y);
                let steps = ((pos.y - anchor) / BODY_DRAG_PX_PER_STEP).round() as i64;
                let candidate = self.start
                    + Duration::minutes(BODY_DRAG_DEFAULT_MIN + steps * self.snap_step_min);
                self.accept_candidate(candidate, preview);
            }
            GesturePhase::EdgeResizing => {
                let raw_min =
                    ((pos.x - self.origin.x) / self.hour_column_width) as f64 * 60.0;
                let delta = snap_minutes(raw_min, self.snap_step_min);
                let candidate = self.original_end + Duration::minutes(delta);
                self.accept_candidate(candidate, preview);
            }
        }
    }

    fn accept_candidate(&mut self, candidate: DateTime<Utc>, preview: &mut PreviewChannel) {
        let minutes = (candidate - self.start).num_minutes();
        if minutes >= self.min_duration_min {
            self.last_valid_end = Some(candidate);
            preview.publish(&self.job_id, candidate);
        }
    }

    /// Qualifying pointer release: clears the preview entry and hands back
    /// the candidate to commit (at most one per gesture).
    pub fn finish(self, preview: &mut PreviewChannel) -> GestureEnd {
        preview.clear(&self.job_id);
        GestureEnd {
            job_id: self.job_id,
            commit_end: self.last_valid_end,
            suppress_click: self.suppress_click,
        }
    }

    /// Teardown path (pointer left without release, or listener cleanup):
    /// clears the preview entry and commits nothing. Callers restore any
    /// global cursor/selection overrides here.
    pub fn cancel(self, preview: &mut PreviewChannel) {
        preview.clear(&self.job_id);
    }
}

impl DispatchEngine {
    /// Commit a finished gesture through the state machine.
    ///
    /// Returns `None` when the gesture produced no valid candidate. Locked
    /// jobs come back as an informational notice, not an error.
    pub async fn commit_resize_gesture(&self, end: &GestureEnd) -> Option<Notice> {
        let new_end = end.commit_end?;
        match self.resize_job(&end.job_id, new_end).await {
            Ok(ResizeOutcome::Resized) => Some(Notice::info(format!(
                "Resized {} to end at {}",
                end.job_id,
                new_end.format("%H:%M")
            ))),
            Ok(ResizeOutcome::IgnoredLocked) => {
                Some(Notice::info(format!("{} is locked; resize ignored", end.job_id)))
            }
            Err(err) => Some(Notice::error(err.to_string())),
        }
    }
}
