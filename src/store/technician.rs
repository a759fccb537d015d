use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    Available,
    Busy,
    Offline,
    OnLeave,
    NotWorking,
    OverCapacity,
}

impl std::fmt::Display for TechnicianStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TechnicianStatus::Available => write!(f, "available"),
            TechnicianStatus::Busy => write!(f, "busy"),
            TechnicianStatus::Offline => write!(f, "offline"),
            TechnicianStatus::OnLeave => write!(f, "on_leave"),
            TechnicianStatus::NotWorking => write!(f, "not_working"),
            TechnicianStatus::OverCapacity => write!(f, "over_capacity"),
        }
    }
}

/// Default daily working-hours template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            // SAFETY: hardcoded valid times
            start: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        }
    }
}

/// Per-weekday deviation from the working-hours template.
///
/// `full_day_off` wins over everything else: the day contributes no working
/// hours regardless of the override's start/end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOverride {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub lunch_start: Option<NaiveTime>,
    pub lunch_end: Option<NaiveTime>,
    pub full_day_off: bool,
}

impl DayOverride {
    pub fn working(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            enabled: true,
            start,
            end,
            lunch_start: None,
            lunch_end: None,
            full_day_off: false,
        }
    }

    pub fn day_off() -> Self {
        let hours = WorkingHours::default();
        Self {
            enabled: true,
            start: hours.start,
            end: hours.end,
            lunch_start: None,
            lunch_end: None,
            full_day_off: true,
        }
    }

    pub fn with_lunch(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.lunch_start = Some(start);
        self.lunch_end = Some(end);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Vacation,
    Sick,
    Training,
    Other,
}

/// A date interval during which a technician is unavailable.
/// Both ends are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub reason: String,
    pub kind: LeaveKind,
}

impl LeaveRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Mutable per-technician scheduling metadata, addressed by technician id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicianMeta {
    pub schedule_note: Option<String>,
    pub day_overrides: HashMap<Weekday, DayOverride>,
    pub leaves: Vec<LeaveRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    pub skills: Vec<String>,
    pub status: TechnicianStatus,
    pub working_hours: WorkingHours,
    pub meta: TechnicianMeta,
}

impl Technician {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            contact: String::new(),
            skills: Vec::new(),
            status: TechnicianStatus::Available,
            working_hours: WorkingHours::default(),
            meta: TechnicianMeta::default(),
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_status(mut self, status: TechnicianStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.working_hours = WorkingHours { start, end };
        self
    }

    pub fn with_override(mut self, weekday: Weekday, day: DayOverride) -> Self {
        self.meta.day_overrides.insert(weekday, day);
        self
    }

    pub fn with_leave(mut self, leave: LeaveRange) -> Self {
        self.meta.leaves.push(leave);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s == name)
    }

    /// The enabled override for a weekday, if any.
    pub fn override_for(&self, weekday: Weekday) -> Option<&DayOverride> {
        self.meta
            .day_overrides
            .get(&weekday)
            .filter(|o| o.enabled)
    }

    pub fn on_leave(&self, date: NaiveDate) -> bool {
        self.meta.leaves.iter().any(|l| l.contains(date))
    }
}
