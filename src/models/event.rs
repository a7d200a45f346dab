// file: src/models/event.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const SUCCESS_COLOR: &str = "#4caf50";
pub const OVERDUE_COLOR: &str = "#f44336";
pub const UPCOMING_COLOR: &str = "#2196f3";
pub const TEXT_COLOR: &str = "#ffffff";
pub const BORDER_COLOR: &str = "transparent";

/// Completion state of a habit as shown on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Completed,
    Overdue,
    Upcoming,
}

impl EventStatus {
    pub fn color(&self) -> &'static str {
        match self {
            EventStatus::Completed => SUCCESS_COLOR,
            EventStatus::Overdue => OVERDUE_COLOR,
            EventStatus::Upcoming => UPCOMING_COLOR,
        }
    }

    /// RGB components in 0.0..=1.0, for renderers that don't take hex.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            EventStatus::Completed => (0.298, 0.686, 0.314),
            EventStatus::Overdue => (0.957, 0.263, 0.212),
            EventStatus::Upcoming => (0.129, 0.588, 0.953),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Completed => "Completed",
            EventStatus::Overdue => "Overdue",
            EventStatus::Upcoming => "Upcoming",
        }
    }
}

/// Display-only fields carried through from the habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub description: Option<String>,
    pub category: Option<String>,
    pub streak: i64,
    pub progress: f64,
    pub is_completed: bool,
}

/// A calendar entry derived from a habit. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Local wall-clock start
    pub start: NaiveDateTime,
    /// Local wall-clock end
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub status: EventStatus,
    pub details: EventDetails,
}

impl CalendarEvent {
    pub fn background_color(&self) -> &'static str {
        self.status.color()
    }

    pub fn border_color(&self) -> &'static str {
        BORDER_COLOR
    }

    pub fn text_color(&self) -> &'static str {
        TEXT_COLOR
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event(status: EventStatus) -> CalendarEvent {
        CalendarEvent {
            id: "h1".to_string(),
            title: "Stretch".to_string(),
            start: at(10, 9, 0),
            end: at(10, 10, 30),
            all_day: false,
            status,
            details: EventDetails {
                description: None,
                category: Some("Health".to_string()),
                streak: 2,
                progress: 10.0,
                is_completed: status == EventStatus::Completed,
            },
        }
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(event(EventStatus::Completed).background_color(), "#4caf50");
        assert_eq!(event(EventStatus::Overdue).background_color(), "#f44336");
        assert_eq!(event(EventStatus::Upcoming).background_color(), "#2196f3");
    }

    #[test]
    fn test_fixed_colors() {
        let e = event(EventStatus::Upcoming);
        assert_eq!(e.text_color(), "#ffffff");
        assert_eq!(e.border_color(), "transparent");
    }

    #[test]
    fn test_duration_and_start_day() {
        let e = event(EventStatus::Upcoming);
        assert_eq!(e.duration_minutes(), 90);
        assert_eq!(e.start_day(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }
}
