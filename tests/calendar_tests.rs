// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Local, NaiveDate};
use finwise::calendar::{
    add_days, add_months, add_weeks, clamp_day, clamped_date, days_between, days_in_month,
    end_of_day, month_bounds, parse_iso_date, previous_month_bounds, shift_month, start_of_day,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn add_months_clamps_to_last_day_of_shorter_month() {
    assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
    assert_eq!(add_months(d(2023, 1, 31), 1), d(2023, 2, 28));
    assert_eq!(add_months(d(2024, 3, 31), 1), d(2024, 4, 30));
    assert_eq!(add_months(d(2024, 3, 31), -1), d(2024, 2, 29));
}

#[test]
fn add_months_wraps_years_both_ways() {
    assert_eq!(add_months(d(2024, 12, 15), 1), d(2025, 1, 15));
    assert_eq!(add_months(d(2024, 1, 15), -1), d(2023, 12, 15));
    assert_eq!(add_months(d(2024, 2, 29), 12), d(2025, 2, 28));
    assert_eq!(add_months(d(2024, 5, 10), 0), d(2024, 5, 10));
}

#[test]
fn day_and_week_shifts_accept_negative_counts() {
    assert_eq!(add_days(d(2024, 3, 1), -1), d(2024, 2, 29));
    assert_eq!(add_days(d(2023, 12, 31), 1), d(2024, 1, 1));
    assert_eq!(add_weeks(d(2024, 1, 1), 2), d(2024, 1, 15));
    assert_eq!(add_weeks(d(2024, 1, 1), -1), d(2023, 12, 25));
}

#[test]
fn shifts_saturate_instead_of_panicking() {
    assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
    assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
    assert_eq!(add_months(NaiveDate::MAX, 1), NaiveDate::MAX);
}

#[test]
fn days_between_is_signed() {
    assert_eq!(days_between(d(2024, 1, 1), d(2024, 1, 10)), 9);
    assert_eq!(days_between(d(2024, 1, 10), d(2024, 1, 1)), -9);
    assert_eq!(days_between(d(2024, 2, 28), d(2024, 3, 1)), 2);
    assert_eq!(days_between(d(2024, 1, 1), d(2024, 1, 1)), 0);
}

#[test]
fn month_lengths_and_clamping() {
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(2100, 2), 28);
    assert_eq!(days_in_month(2000, 2), 29);
    assert_eq!(days_in_month(2024, 4), 30);
    assert_eq!(days_in_month(2024, 12), 31);

    assert_eq!(clamp_day(2024, 2, 31), 29);
    assert_eq!(clamp_day(2024, 3, 31), 31);
    assert_eq!(clamped_date(2023, 2, 30), Some(d(2023, 2, 28)));
    assert_eq!(clamped_date(2024, 13, 1), None);
}

#[test]
fn shift_month_wraps_across_january() {
    assert_eq!(shift_month(2024, 1, -1), (2023, 12));
    assert_eq!(shift_month(2024, 12, 1), (2025, 1));
    assert_eq!(shift_month(2024, 6, -18), (2022, 12));
}

#[test]
fn start_and_end_of_day() {
    let ts = d(2024, 5, 6).and_hms_opt(17, 45, 12).unwrap();
    assert_eq!(start_of_day(ts), d(2024, 5, 6));
    assert_eq!(
        end_of_day(d(2024, 5, 6)),
        d(2024, 5, 6).and_hms_opt(23, 59, 59).unwrap()
    );
}

#[test]
fn month_bounds_cover_whole_months() {
    let this = month_bounds(d(2024, 2, 10));
    assert_eq!((this.from, this.to), (d(2024, 2, 1), d(2024, 2, 29)));

    let last = previous_month_bounds(d(2024, 1, 31));
    assert_eq!((last.from, last.to), (d(2023, 12, 1), d(2023, 12, 31)));

    let last = previous_month_bounds(d(2024, 3, 31));
    assert_eq!((last.from, last.to), (d(2024, 2, 1), d(2024, 2, 29)));
}

#[test]
fn parses_iso_dates_and_timestamps() {
    assert_eq!(parse_iso_date("2024-01-05"), Some(d(2024, 1, 5)));
    assert_eq!(parse_iso_date(" 2024-01-05 "), Some(d(2024, 1, 5)));
    assert_eq!(parse_iso_date("2024-01-05T23:30:00"), Some(d(2024, 1, 5)));
    assert_eq!(parse_iso_date("2024-01-05T23:30:00.250"), Some(d(2024, 1, 5)));
    assert_eq!(parse_iso_date("2024-01-05 08:00:00"), Some(d(2024, 1, 5)));
    assert_eq!(parse_iso_date("2024-02-30"), None);
    assert_eq!(parse_iso_date("05/01/2024"), None);
}

#[test]
fn offset_timestamps_resolve_to_the_local_date() {
    let raw = "2024-01-04T23:00:00.000Z";
    let expected = DateTime::parse_from_rfc3339(raw)
        .unwrap()
        .with_timezone(&Local)
        .date_naive();
    assert_eq!(parse_iso_date(raw), Some(expected));
}
