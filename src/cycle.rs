// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget cycle windows and the spend attributed to them.
//!
//! Every aggregator (budget listing, summary) goes through [`current_window`], so
//! two screens can never disagree about which transactions count against a budget.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{add_days, clamped_date, days_between, shift_month};
use crate::models::{Budget, Kind, Period, Transaction, same_category};

/// Inclusive `[from, to]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl CycleWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days(&self) -> i64 {
        days_between(self.from, self.to) + 1
    }
}

/// Accounting cycle of a budget anchored at `anchor` that is current on `today`.
pub fn current_window(anchor: NaiveDate, period: Period, today: NaiveDate) -> CycleWindow {
    match period {
        Period::Weekly => weekly_window(anchor, today),
        Period::Monthly => monthly_window(anchor, today),
    }
}

fn weekly_window(anchor: NaiveDate, today: NaiveDate) -> CycleWindow {
    let diff = days_between(anchor, today);
    let k = if diff >= 0 {
        diff.div_euclid(7)
    } else {
        (diff - 6).div_euclid(7)
    };
    let from = add_days(anchor, k * 7);
    CycleWindow {
        from,
        to: add_days(from, 6),
    }
}

fn monthly_window(anchor: NaiveDate, today: NaiveDate) -> CycleWindow {
    let anchor_day = anchor.day();
    let (year, month) = (today.year(), today.month());
    // not `today.day() < anchor_day`: on Feb 29 with anchor 31 that window would end on Feb 28
    let start_this_month = clamped_date(year, month, anchor_day).unwrap_or(today);
    let (start_year, start_month) = if today < start_this_month {
        shift_month(year, month, -1)
    } else {
        (year, month)
    };
    let (next_year, next_month) = shift_month(start_year, start_month, 1);

    match (
        clamped_date(start_year, start_month, anchor_day),
        clamped_date(next_year, next_month, anchor_day),
    ) {
        (Some(from), Some(next_start)) => CycleWindow {
            from,
            to: add_days(next_start, -1),
        },
        _ => CycleWindow {
            from: today,
            to: today,
        },
    }
}

impl Budget {
    pub fn current_window(&self, today: NaiveDate) -> CycleWindow {
        current_window(self.anchor_date, self.period, today)
    }
}

/// Adds amounts, pinning at `Decimal::MAX`/`MIN` instead of overflowing.
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Sum of expenses in the budget's category dated inside `window`.
pub fn spent_in_window(budget: &Budget, window: CycleWindow, transactions: &[Transaction]) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == Kind::Expense)
            .filter(|t| same_category(&t.category, &budget.category))
            .filter(|t| window.contains(t.date))
            .map(|t| t.amount),
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub window: CycleWindow,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// `spent / amount`, clamped to `[0, 1]`.
    pub ratio: Decimal,
}

pub fn budget_status(budget: &Budget, transactions: &[Transaction], today: NaiveDate) -> BudgetStatus {
    let window = budget.current_window(today);
    let spent = spent_in_window(budget, window, transactions);
    let ratio = if budget.amount <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        // only a quotient too large to represent fails here
        spent
            .checked_div(budget.amount)
            .unwrap_or(Decimal::ONE)
            .clamp(Decimal::ZERO, Decimal::ONE)
    };
    BudgetStatus {
        budget: budget.clone(),
        window,
        spent,
        remaining: budget.amount.saturating_sub(spent),
        ratio,
    }
}
