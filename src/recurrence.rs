// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::calendar::{add_days, add_months, add_weeks};
use crate::models::{Frequency, RecurringRule};

/// The occurrence following `date`. Monthly steps inherit the day clamp of
/// [`add_months`], so a rule anchored on the 31st drifts to the 29th after February.
pub fn step(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => add_days(date, 1),
        Frequency::Weekly => add_weeks(date, 1),
        Frequency::Monthly => add_months(date, 1),
    }
}

/// The progression `start, step(start), step(step(start)), ...`.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    frequency: Frequency,
}

impl Occurrences {
    pub fn starting_at(start: NaiveDate, frequency: Frequency) -> Self {
        Self {
            next: Some(start),
            frequency,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        let following = step(self.frequency, current);
        // stepping saturates at the end of the calendar
        self.next = (following > current).then_some(following);
        Some(current)
    }
}

/// First date a materialization pass should consider for `rule`.
pub fn resume_cursor(rule: &RecurringRule) -> NaiveDate {
    let cursor = match rule.last_run {
        Some(last) => step(rule.frequency, last),
        None => rule.anchor_date,
    };
    cursor.max(rule.anchor_date)
}

/// Next occurrence on or after `today` that has not been materialized yet.
pub fn next_due(rule: &RecurringRule, today: NaiveDate) -> Option<NaiveDate> {
    Occurrences::starting_at(resume_cursor(rule), rule.frequency).find(|d| *d >= today)
}

pub fn is_due_today(rule: &RecurringRule, today: NaiveDate) -> bool {
    next_due(rule, today) == Some(today)
}

/// Whether `date` is one of the dates generated from the rule's anchor.
pub fn lies_on_progression(rule: &RecurringRule, date: NaiveDate) -> bool {
    Occurrences::starting_at(rule.anchor_date, rule.frequency)
        .take_while(|d| *d <= date)
        .any(|d| d == date)
}
