//! Calendar navigation
//!
//! Weeks start on Sunday. The month grid is padded with days from the
//! neighbouring months so every row holds seven days.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::session::TutoringSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    Month,
}

impl std::str::FromStr for CalendarView {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(CalendarView::Day),
            "week" => Ok(CalendarView::Week),
            "month" => Ok(CalendarView::Month),
            _ => Err(SchedulingError::UnknownCalendarView(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub view: CalendarView,
    /// Date the current period is anchored on
    pub current: NaiveDate,
}

impl Calendar {
    pub fn new(view: CalendarView, current: NaiveDate) -> Self {
        Self { view, current }
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    /// Step back one period
    pub fn previous(&mut self) {
        self.current = match self.view {
            CalendarView::Day => self.current - Duration::days(1),
            CalendarView::Week => self.current - Duration::days(7),
            CalendarView::Month => first_of_month(self.current)
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.current),
        };
    }

    /// Step forward one period
    pub fn next(&mut self) {
        self.current = match self.view {
            CalendarView::Day => self.current + Duration::days(1),
            CalendarView::Week => self.current + Duration::days(7),
            CalendarView::Month => first_of_month(self.current)
                .checked_add_months(Months::new(1))
                .unwrap_or(self.current),
        };
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.current = today;
    }

    /// Days the current view covers
    pub fn visible_days(&self) -> Vec<NaiveDate> {
        match self.view {
            CalendarView::Day => vec![self.current],
            CalendarView::Week => {
                let start = start_of_week(self.current);
                days_between(start, start + Duration::days(6))
            }
            CalendarView::Month => {
                days_between(first_of_month(self.current), last_of_month(self.current))
            }
        }
    }

    /// Sunday-start weeks covering the current month, spill days included
    pub fn month_grid(&self) -> Vec<Vec<NaiveDate>> {
        let start = start_of_week(first_of_month(self.current));
        let end = start_of_week(last_of_month(self.current)) + Duration::days(6);

        days_between(start, end)
            .chunks(7)
            .map(|week| week.to_vec())
            .collect()
    }

    pub fn is_same_month(&self, date: NaiveDate) -> bool {
        date.year() == self.current.year() && date.month() == self.current.month()
    }
}

/// Hourly slots shown by the day and week views, `start..=end`
pub fn time_slots(start_hour: u32, end_hour: u32) -> Vec<u32> {
    (start_hour..=end_hour.min(23)).collect()
}

/// Sessions starting on `date`, earliest first
pub fn sessions_for_day(sessions: &[TutoringSession], date: NaiveDate) -> Vec<TutoringSession> {
    let mut day: Vec<TutoringSession> = sessions
        .iter()
        .filter(|session| session.is_on(date))
        .cloned()
        .collect();
    day.sort_by_key(|session| session.starts_at);
    day
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Sun).first_day()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}
