// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar primitives shared by the recurrence stepper and the budget cycle windows.
//!
//! Every date in the crate is a local civil [`NaiveDate`]. Arithmetic saturates at
//! [`NaiveDate::MIN`] / [`NaiveDate::MAX`] rather than panicking, so all helpers are total.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::cycle::CycleWindow;

pub fn start_of_day(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Last representable second of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default())
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let saturated = if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    };
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(saturated)
}

pub fn add_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    add_days(date, weeks.saturating_mul(7))
}

/// Shifts `date` by `months` calendar months. A day-of-month that does not exist in
/// the target month clamps to its last day: Jan 31 + 1 month is Feb 29 in a leap year.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(if months < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Whole days from `a` to `b`; negative when `b` precedes `a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = shift_month(year, month, 1);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

pub fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month))
}

/// Builds `year-month-day`, pulling `day` back into the month when it overflows.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, clamp_day(year, month, day))
}

/// `(year, month)` moved by `delta` months, wrapping across year boundaries.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// First to last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> CycleWindow {
    let (year, month) = (date.year(), date.month());
    let from = date.with_day(1).unwrap_or(date);
    let to = clamped_date(year, month, 31).unwrap_or(date);
    CycleWindow { from, to }
}

pub fn previous_month_bounds(date: NaiveDate) -> CycleWindow {
    month_bounds(add_months(date.with_day(1).unwrap_or(date), -1))
}

/// Parses an ISO 8601 date or date-time into a local calendar date.
///
/// Accepts `YYYY-MM-DD`, naive date-times (`T` or space separated, optional
/// fraction) and RFC 3339 timestamps. Offset-carrying timestamps are converted to
/// the local zone before the date is taken.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Local).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(start_of_day)
}
