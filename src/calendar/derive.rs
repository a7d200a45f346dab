//! Habit to calendar event derivation
//!
//! Pure functions: the caller supplies `now`, so the same habits and clock
//! always produce the same events.

use crate::models::habit::parse_time_of_day;
use crate::models::{CalendarEvent, EventDetails, EventStatus, Habit};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::warn;

/// Derives one event per habit, in input order.
pub fn derive_events(habits: &[Habit], now: NaiveDateTime) -> Vec<CalendarEvent> {
    habits.iter().map(|habit| derive_event(habit, now)).collect()
}

pub fn derive_event(habit: &Habit, now: NaiveDateTime) -> CalendarEvent {
    let start_time = time_field(habit, "startTime", habit.start_time.as_deref())
        .unwrap_or(NaiveTime::MIN);
    let start = habit.start_date.and_time(start_time);

    let end_day = habit.end_date.unwrap_or(habit.start_date);
    let end = match time_field(habit, "endTime", habit.end_time.as_deref()) {
        Some(end_time) => end_day.and_time(end_time),
        // One hour after the start time of day; 23:xx rolls into the next day
        None => end_day.and_time(start_time) + Duration::hours(1),
    };

    let is_completed = habit.is_completed_on(now.date());
    let status = classify(is_completed, start, now);

    CalendarEvent {
        id: habit.id.clone(),
        title: habit.title.clone(),
        start,
        end,
        all_day: false,
        status,
        details: EventDetails {
            description: habit.description.clone(),
            category: habit.category.clone(),
            streak: habit.streak,
            progress: habit.progress,
            is_completed,
        },
    }
}

/// Completed today wins over everything; otherwise a start strictly before
/// `now` is overdue.
pub fn classify(is_completed_today: bool, start: NaiveDateTime, now: NaiveDateTime) -> EventStatus {
    if is_completed_today {
        EventStatus::Completed
    } else if start < now {
        EventStatus::Overdue
    } else {
        EventStatus::Upcoming
    }
}

fn time_field(habit: &Habit, name: &str, value: Option<&str>) -> Option<NaiveTime> {
    let raw = value?;
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_time_of_day(raw);
    if parsed.is_none() {
        warn!("Habit {} has malformed {} '{}', using default", habit.id, name, raw);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    fn habit(start: Option<&str>, end: Option<&str>) -> Habit {
        Habit::new("h1", "Stretch", date(2024, 1, 10)).with_times(start, end)
    }

    #[test]
    fn test_overdue_scenario() {
        let now = at(date(2024, 1, 11), 8, 0);
        let event = derive_event(&habit(Some("09:00"), Some("10:30")), now);

        assert_eq!(event.start, at(date(2024, 1, 10), 9, 0));
        assert_eq!(event.end, at(date(2024, 1, 10), 10, 30));
        assert_eq!(event.status, EventStatus::Overdue);
        assert_eq!(event.background_color(), "#f44336");
        assert!(!event.details.is_completed);
    }

    #[test]
    fn test_completed_today_scenario() {
        let now = at(date(2024, 1, 11), 8, 0);
        let h = habit(Some("09:00"), Some("10:30")).with_completion(date(2024, 1, 11), true);
        let event = derive_event(&h, now);

        assert_eq!(event.status, EventStatus::Completed);
        assert_eq!(event.background_color(), "#4caf50");
        assert!(event.details.is_completed);
    }

    #[test]
    fn test_completed_wins_even_for_future_start() {
        let now = at(date(2024, 1, 5), 12, 0);
        let h = habit(Some("09:00"), None).with_completion(date(2024, 1, 5), true);
        assert_eq!(derive_event(&h, now).status, EventStatus::Completed);
    }

    #[test]
    fn test_completion_on_other_day_does_not_count() {
        let now = at(date(2024, 1, 11), 8, 0);
        let h = habit(Some("09:00"), None)
            .with_completion(date(2024, 1, 10), true)
            .with_completion(date(2024, 1, 11), false);
        assert_eq!(derive_event(&h, now).status, EventStatus::Overdue);
    }

    #[test]
    fn test_upcoming_when_start_in_future() {
        let now = at(date(2024, 1, 9), 23, 0);
        let event = derive_event(&habit(Some("09:00"), None), now);
        assert_eq!(event.status, EventStatus::Upcoming);
        assert_eq!(event.background_color(), "#2196f3");
    }

    #[test]
    fn test_start_equal_to_now_is_upcoming() {
        let now = at(date(2024, 1, 10), 9, 0);
        assert_eq!(derive_event(&habit(Some("09:00"), None), now).status, EventStatus::Upcoming);
    }

    #[test]
    fn test_missing_end_time_defaults_to_one_hour() {
        let now = at(date(2024, 1, 1), 0, 0);
        let event = derive_event(&habit(Some("14:15"), None), now);
        assert_eq!(event.end, at(date(2024, 1, 10), 15, 15));
        assert_eq!(event.duration_minutes(), 60);
    }

    #[test]
    fn test_missing_start_time_defaults_to_midnight() {
        let now = at(date(2024, 1, 1), 0, 0);
        let event = derive_event(&habit(None, None), now);
        assert_eq!(event.start, at(date(2024, 1, 10), 0, 0));
        assert_eq!(event.end, at(date(2024, 1, 10), 1, 0));
    }

    #[test]
    fn test_late_start_rolls_default_end_into_next_day() {
        let now = at(date(2024, 1, 1), 0, 0);
        let event = derive_event(&habit(Some("23:30"), None), now);
        assert_eq!(event.end, at(date(2024, 1, 11), 0, 30));
    }

    #[test]
    fn test_end_date_used_when_present() {
        let now = at(date(2024, 1, 1), 0, 0);
        let mut h = habit(Some("09:00"), Some("17:00"));
        h.end_date = Some(date(2024, 1, 12));
        let event = derive_event(&h, now);
        assert_eq!(event.end, at(date(2024, 1, 12), 17, 0));

        h.end_time = None;
        assert_eq!(derive_event(&h, now).end, at(date(2024, 1, 12), 10, 0));
    }

    #[test]
    fn test_malformed_times_fall_back_to_defaults() {
        let now = at(date(2024, 1, 1), 0, 0);
        let event = derive_event(&habit(Some("9am"), Some("")), now);
        assert_eq!(event.start.hour(), 0);
        assert_eq!(event.end.hour(), 1);
    }

    #[test]
    fn test_pass_through_fields() {
        let mut h = habit(Some("06:00"), None);
        h.description = Some("Ten minutes".to_string());
        h.category = Some("Health".to_string());
        h.streak = 7;
        h.progress = 63.5;

        let event = derive_event(&h, at(date(2024, 1, 1), 0, 0));
        assert_eq!(event.id, "h1");
        assert_eq!(event.title, "Stretch");
        assert!(!event.all_day);
        assert_eq!(event.details.description.as_deref(), Some("Ten minutes"));
        assert_eq!(event.details.category.as_deref(), Some("Health"));
        assert_eq!(event.details.streak, 7);
        assert_eq!(event.details.progress, 63.5);
    }

    #[test]
    fn test_empty_input() {
        assert!(derive_events(&[], at(date(2024, 1, 1), 0, 0)).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let habits = vec![
            Habit::new("b", "Second", date(2024, 2, 1)),
            Habit::new("a", "First", date(2024, 1, 1)),
        ];
        let events = derive_events(&habits, at(date(2024, 1, 15), 0, 0));
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
