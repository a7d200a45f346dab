// file: src/models/habit.rs
use chrono::{DateTime, NaiveDate, NaiveTime};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A habit as returned by `GET /api/habits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(deserialize_with = "de_date")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "de_null_as_default")]
    pub completion_history: Vec<CompletionEntry>,
    #[serde(default, deserialize_with = "de_null_as_default")]
    pub streak: i64,
    #[serde(default, deserialize_with = "de_null_as_default")]
    pub progress: f64,
}

/// One history entry. An entry whose date is missing or unreadable decodes
/// with `date: None` and never counts as a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEntry {
    #[serde(default, deserialize_with = "de_lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
}

impl Habit {
    pub fn new<S: Into<String>>(id: S, title: S, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            category: None,
            start_date,
            end_date: None,
            start_time: None,
            end_time: None,
            completion_history: Vec::new(),
            streak: 0,
            progress: 0.0,
        }
    }

    pub fn with_times(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_time = start.map(str::to_string);
        self.end_time = end.map(str::to_string);
        self
    }

    pub fn with_completion(mut self, date: NaiveDate, completed: bool) -> Self {
        self.completion_history.push(CompletionEntry {
            date: Some(date),
            completed,
        });
        self
    }

    /// Whether the history holds a completed entry for `day`.
    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completion_history.iter().any(|entry| match entry.date {
            Some(date) => entry.completed && date == day,
            None => {
                warn!("Habit {} has a history entry without a usable date", self.id);
                false
            }
        })
    }
}

/// Parses a 24h `HH:MM` time of day. Seconds are not accepted.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; for timestamps the date
/// as written (in the timestamp's own offset) is kept.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
}

fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_calendar_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw))),
    }
}

/// Never fails: anything other than a parseable date string becomes `None`.
fn de_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_calendar_date(&raw),
        _ => None,
    })
}

fn de_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "_id": "65a1",
            "title": "Morning run",
            "description": "5k",
            "category": "Health",
            "startDate": "2024-01-10T00:00:00.000Z",
            "endDate": "2024-01-12",
            "startTime": "07:00",
            "endTime": "07:45",
            "completionHistory": [
                {"date": "2024-01-10T00:00:00.000Z", "completed": true},
                {"date": "2024-01-11", "completed": false}
            ],
            "streak": 3,
            "progress": 42.5
        }"#;

        let habit: Habit = serde_json::from_str(json).unwrap();
        assert_eq!(habit.id, "65a1");
        assert_eq!(habit.start_date, date(2024, 1, 10));
        assert_eq!(habit.end_date, Some(date(2024, 1, 12)));
        assert_eq!(habit.start_time.as_deref(), Some("07:00"));
        assert_eq!(habit.completion_history.len(), 2);
        assert_eq!(habit.streak, 3);
        assert_eq!(habit.progress, 42.5);
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{"_id": "1", "title": "Read", "startDate": "2024-03-01",
                       "completionHistory": null, "streak": null}"#;
        let habit: Habit = serde_json::from_str(json).unwrap();
        assert!(habit.description.is_none());
        assert!(habit.end_date.is_none());
        assert!(habit.start_time.is_none());
        assert!(habit.completion_history.is_empty());
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.progress, 0.0);
    }

    #[test]
    fn test_deserialize_rejects_garbage_date() {
        let json = r#"{"_id": "1", "title": "Read", "startDate": "yesterday"}"#;
        assert!(serde_json::from_str::<Habit>(json).is_err());
    }

    #[test]
    fn test_bad_history_entry_does_not_fail_the_list() {
        let json = r#"[
            {"_id": "1", "title": "Read", "startDate": "2024-01-10",
             "completionHistory": [{"date": "2024-01-10", "completed": true}]},
            {"_id": "2", "title": "Run", "startDate": "2024-01-10",
             "completionHistory": [{"date": null, "completed": true},
                                   {"date": "someday", "completed": true},
                                   {"completed": true},
                                   {"date": "2024-01-10", "completed": true}]}
        ]"#;

        let habits: Vec<Habit> = serde_json::from_str(json).unwrap();
        assert_eq!(habits.len(), 2);
        assert_eq!(habits[1].completion_history.len(), 4);
        assert!(habits[1].completion_history[..3].iter().all(|e| e.date.is_none()));

        assert!(habits[0].is_completed_on(date(2024, 1, 10)));
        // Undated entries are skipped, the dated one still counts
        assert!(habits[1].is_completed_on(date(2024, 1, 10)));
        assert!(!habits[1].is_completed_on(date(2024, 1, 11)));
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time_of_day("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert!(parse_time_of_day("24:00").is_none());
        assert!(parse_time_of_day("nine").is_none());
        assert!(parse_time_of_day("").is_none());
    }

    #[test]
    fn test_is_completed_on_requires_completed_flag() {
        let habit = Habit::new("1", "Read", date(2024, 1, 1))
            .with_completion(date(2024, 1, 11), false)
            .with_completion(date(2024, 1, 12), true);

        assert!(!habit.is_completed_on(date(2024, 1, 11)));
        assert!(habit.is_completed_on(date(2024, 1, 12)));
        assert!(!habit.is_completed_on(date(2024, 1, 13)));
    }
}
