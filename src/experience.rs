//! Whole years of professional experience.

use chrono::{Datelike, NaiveDate};

/// Shown until the page has mounted and computed the real figure.
pub const DEFAULT_YEARS: i32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    pub day: u32,
}

pub const CAREER_START: CalendarDay = CalendarDay {
    year: 2008,
    month: 11,
    day: 1,
};

impl<D: Datelike> From<&D> for CalendarDay {
    fn from(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Completed years between `start` and `today`; never rounds up.
pub fn whole_years_since(start: CalendarDay, today: CalendarDay) -> i32 {
    let mut years = today.year - start.year;
    if today.month < start.month || (today.month == start.month && today.day < start.day) {
        years -= 1;
    }
    years
}

/// Years since [`CAREER_START`] as of `today`.
pub fn years_of_experience(today: NaiveDate) -> i32 {
    whole_years_since(CAREER_START, CalendarDay::from(&today))
}
