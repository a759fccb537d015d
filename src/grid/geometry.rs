use chrono::{DateTime, Timelike, Utc};

use crate::config::{LabelMode, ZoomLevel};

/// Narrowest rendered job block, so short jobs stay grabbable.
pub const MIN_BLOCK_WIDTH_PX: f32 = 24.0;

/// Pixel dimensions for one zoom step of the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions {
    pub day_column_width: f32,
    pub hour_column_width: f32,
    pub label_mode: LabelMode,
}

impl GridDimensions {
    /// Dimension table per zoom step. Day columns assume the standard
    /// 10-hour working window; use [`GridDimensions::day_width`] for other
    /// windows.
    pub fn for_zoom(zoom: ZoomLevel) -> Self {
        let (hour_column_width, label_mode) = match zoom {
            ZoomLevel::Xs => (32.0, LabelMode::Minimal),
            ZoomLevel::Sm => (44.0, LabelMode::Minimal),
            ZoomLevel::Md => (60.0, LabelMode::Hourly),
            ZoomLevel::Lg => (80.0, LabelMode::Hourly),
            ZoomLevel::Xl => (110.0, LabelMode::HalfHourly),
            ZoomLevel::Xxl => (150.0, LabelMode::HalfHourly),
        };
        Self {
            day_column_width: hour_column_width * 10.0,
            hour_column_width,
            label_mode,
        }
    }

    /// Day column width for a window of `visible_hours` hours.
    pub fn day_width(&self, visible_hours: u32) -> f32 {
        self.hour_column_width * visible_hours as f32
    }
}

/// Horizontal placement of a job block inside its technician/day lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGeometry {
    pub left_px: f32,
    pub width_px: f32,
}

/// Maps a scheduled start and duration onto the day lane.
///
/// Starts before the working-hour floor clamp to offset 0. This is purely a
/// rendering clamp: the job keeps its real schedule, and `fits_window`
/// reports out-of-window placements so callers can mark them instead of
/// silently stacking them at the lane edge.
pub fn block_geometry(
    start: DateTime<Utc>,
    duration_min: i64,
    floor_hour: u32,
    hour_column_width: f32,
) -> BlockGeometry {
    let minutes_from_midnight = (start.hour() * 60 + start.minute()) as f32;
    let offset_hours = minutes_from_midnight / 60.0 - floor_hour as f32;
    let left_px = offset_hours.max(0.0) * hour_column_width;
    let width_px = ((duration_min as f32 / 60.0) * hour_column_width).max(MIN_BLOCK_WIDTH_PX);
    BlockGeometry { left_px, width_px }
}

/// Whether `[start, end)` lies entirely inside the rendered working window.
pub fn fits_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    floor_hour: u32,
    ceil_hour: u32,
) -> bool {
    let start_min = start.hour() * 60 + start.minute();
    let end_min = end.hour() * 60 + end.minute();
    // An end exactly on midnight reads as minute 0; treat it as the day ceiling.
    let end_min = if end_min == 0 && end > start {
        24 * 60
    } else {
        end_min
    };
    start.date_naive() == end.date_naive()
        && start_min >= floor_hour * 60
        && end_min <= ceil_hour * 60
}
