//! Per-technician availability on the dispatch grid.
//!
//! Precedence: a full-day-off override beats everything, then leave ranges,
//! then the weekend exclusion of the current view. An enabled weekday
//! override replaces the technician's default working-hours template.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::store::technician::Technician;

/// Effective working hours for one technician on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub lunch: Option<(NaiveTime, NaiveTime)>,
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether the technician can take work on this date.
///
/// False when the weekday override is a full day off, when the date falls in
/// a leave range (both ends inclusive), or when the view excludes weekends,
/// the date is one, and no enabled override says otherwise.
pub fn is_working_day(tech: &Technician, date: NaiveDate, include_weekends: bool) -> bool {
    if let Some(day) = tech.override_for(date.weekday()) {
        if day.full_day_off {
            return false;
        }
    }
    if tech.on_leave(date) {
        return false;
    }
    if !include_weekends && is_weekend(date) && tech.override_for(date.weekday()).is_none() {
        return false;
    }
    true
}

/// Effective (start, end, lunch) hours for the date.
///
/// Falls back to the technician's template when no enabled override exists
/// for the weekday. A full-day-off override yields `None`.
pub fn working_window(tech: &Technician, date: NaiveDate) -> Option<WorkingWindow> {
    match tech.override_for(date.weekday()) {
        Some(day) if day.full_day_off => None,
        Some(day) => Some(WorkingWindow {
            start: day.start,
            end: day.end,
            lunch: day.lunch_start.zip(day.lunch_end),
        }),
        None => Some(WorkingWindow {
            start: tech.working_hours.start,
            end: tech.working_hours.end,
            lunch: None,
        }),
    }
}
