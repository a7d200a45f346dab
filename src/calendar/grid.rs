//! Month / week / day layout of derived events.
//!
//! Weeks start on Sunday. Navigation never moves the visible range entirely
//! before the first valid day, so past weeks and months can't be browsed.

use crate::models::CalendarEvent;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridView {
    Month,
    Week,
    Day,
}

impl GridView {
    pub fn label(&self) -> &'static str {
        match self {
            GridView::Month => "Month",
            GridView::Week => "Week",
            GridView::Day => "Day",
        }
    }

    pub const ALL: [GridView; 3] = [GridView::Month, GridView::Week, GridView::Day];
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    view: GridView,
    anchor: NaiveDate,
    valid_from: NaiveDate,
}

impl CalendarGrid {
    /// Month view anchored on `today`, which is also the first valid day.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: GridView::Month,
            anchor: today,
            valid_from: today,
        }
    }

    pub fn view(&self) -> GridView {
        self.view
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn set_view(&mut self, view: GridView) {
        self.view = view;
    }

    /// Inclusive first and last day shown.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        match self.view {
            GridView::Day => (self.anchor, self.anchor),
            GridView::Week => {
                let start = week_start(self.anchor);
                (start, start + Duration::days(6))
            }
            GridView::Month => {
                let first = first_of_month(self.anchor);
                let last = last_of_month(self.anchor);
                (week_start(first), week_start(last) + Duration::days(6))
            }
        }
    }

    /// Visible days grouped in rows of seven (one row of one for day view).
    pub fn rows(&self) -> Vec<Vec<NaiveDate>> {
        let (start, end) = self.visible_range();
        let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
        match self.view {
            GridView::Day => vec![days],
            _ => days.chunks(7).map(|week| week.to_vec()).collect(),
        }
    }

    /// Header text: "January 2024", "Jan 7 – 13, 2024", "Wednesday, January 10, 2024".
    pub fn title(&self) -> String {
        match self.view {
            GridView::Month => self.anchor.format("%B %Y").to_string(),
            GridView::Week => {
                let (start, end) = self.visible_range();
                if start.month() == end.month() {
                    format!("{} – {}, {}", start.format("%b %-d"), end.format("%-d"), end.year())
                } else {
                    format!("{} – {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
                }
            }
            GridView::Day => self.anchor.format("%A, %B %-d, %Y").to_string(),
        }
    }

    /// Whether `day` falls inside the anchor month (month view shades the rest).
    pub fn is_in_focus(&self, day: NaiveDate) -> bool {
        match self.view {
            GridView::Month => day.month() == self.anchor.month() && day.year() == self.anchor.year(),
            _ => true,
        }
    }

    pub fn is_valid_day(&self, day: NaiveDate) -> bool {
        day >= self.valid_from
    }

    pub fn can_go_previous(&self) -> bool {
        let previous = self.shifted(-1);
        previous.visible_range().1 >= self.valid_from
    }

    pub fn previous(&mut self) {
        if self.can_go_previous() {
            *self = self.shifted(-1);
        }
    }

    pub fn next(&mut self) {
        *self = self.shifted(1);
    }

    /// Switches to day view on `day`; days before the valid range are ignored.
    pub fn open_day(&mut self, day: NaiveDate) -> bool {
        if !self.is_valid_day(day) {
            return false;
        }
        self.view = GridView::Day;
        self.anchor = day;
        true
    }

    pub fn today(&mut self) {
        self.anchor = self.valid_from;
    }

    /// Moves the first valid day, e.g. when the clock crosses midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.valid_from = today;
        if self.visible_range().1 < today {
            self.anchor = today;
        }
    }

    fn shifted(&self, steps: i32) -> Self {
        let anchor = match self.view {
            GridView::Day => self.anchor + Duration::days(steps as i64),
            GridView::Week => self.anchor + Duration::weeks(steps as i64),
            GridView::Month => {
                let first = first_of_month(self.anchor);
                let months = Months::new(steps.unsigned_abs());
                if steps >= 0 {
                    first.checked_add_months(months).unwrap_or(first)
                } else {
                    first.checked_sub_months(months).unwrap_or(first)
                }
            }
        };
        Self { anchor, ..self.clone() }
    }
}

/// Events that start on `day`, earliest first.
pub fn events_on<'a>(events: &'a [CalendarEvent], day: NaiveDate) -> Vec<&'a CalendarEvent> {
    let mut matching: Vec<&CalendarEvent> =
        events.iter().filter(|event| event.start_day() == day).collect();
    matching.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
    matching
}

/// `"9:00 AM - 10:30 AM"`
pub fn time_label(event: &CalendarEvent) -> String {
    format!("{} - {}", clock(event.start), clock(event.end))
}

fn clock(at: NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn last_of_month(day: NaiveDate) -> NaiveDate {
    first_of_month(day)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day)
}
