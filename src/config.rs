use serde::{Deserialize, Serialize};

/// Zoom steps for the dispatch calendar, from most compressed to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

/// How densely hour labels are drawn at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Labels only at the window edges.
    Minimal,
    /// A label on every hour.
    Hourly,
    /// Labels on every hour and half hour.
    HalfHourly,
}

/// View configuration for the dispatch calendar grid.
///
/// The working-hour range bounds what the grid renders; it is not a
/// scheduling constraint (see `grid::geometry`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarViewConfig {
    pub zoom: ZoomLevel,
    /// Number of consecutive days shown.
    pub day_window: usize,
    /// Paging offset in days relative to the anchor date.
    pub day_offset: i64,
    /// First rendered hour of the day.
    pub day_start_hour: u32,
    /// First hour past the rendered window.
    pub day_end_hour: u32,
    pub include_weekends: bool,
}

impl Default for CalendarViewConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLevel::Md,
            day_window: 3,
            day_offset: 0,
            day_start_hour: 8,
            day_end_hour: 18,
            include_weekends: false,
        }
    }
}

impl CalendarViewConfig {
    /// Hours visible per day column.
    pub fn visible_hours(&self) -> u32 {
        self.day_end_hour.saturating_sub(self.day_start_hour)
    }

    pub fn with_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_day_window(mut self, days: usize) -> Self {
        self.day_window = days;
        self
    }

    pub fn with_weekends(mut self, include: bool) -> Self {
        self.include_weekends = include;
        self
    }
}

/// Tuning for the dispatch engine's mutation boundary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Duration stamped on a drag-and-drop assignment, independent of the
    /// job's own estimate.
    pub default_assignment_duration_min: i64,
    /// Simulated network round-trip applied to every mutation.
    pub simulated_latency_ms: u64,
    /// Drag payloads older than this are refused.
    pub max_payload_age_secs: i64,
    /// Shortest schedulable job duration.
    pub min_duration_min: i64,
    /// Resize deltas snap to multiples of this.
    pub snap_step_min: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_assignment_duration_min: 180,
            simulated_latency_ms: 150,
            max_payload_age_secs: 30,
            min_duration_min: 15,
            snap_step_min: 15,
        }
    }
}

impl EngineConfig {
    /// Configuration for tests and in-process demos: no artificial latency.
    pub fn immediate() -> Self {
        Self {
            simulated_latency_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_default_duration(mut self, minutes: i64) -> Self {
        self.default_assignment_duration_min = minutes;
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.simulated_latency_ms = ms;
        self
    }
}
