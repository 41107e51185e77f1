// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{month_bounds, previous_month_bounds};
use crate::cycle::{BudgetStatus, CycleWindow, budget_status, saturating_sum};
use crate::models::{Budget, Kind, RecurringRule, Transaction};
use crate::recurrence::{is_due_today, next_due};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthStats {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// Month-to-date daily expense rate projected over the whole month.
    pub forecast_expense: Decimal,
    pub last_month_expense: Decimal,
    pub forecast_delta: Decimal,
}

fn total(transactions: &[Transaction], kind: Kind, window: CycleWindow) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == kind && window.contains(t.date))
            .map(|t| t.amount),
    )
}

pub fn month_stats(transactions: &[Transaction], today: NaiveDate) -> MonthStats {
    let this_month = month_bounds(today);
    let last_month = previous_month_bounds(today);

    let income = total(transactions, Kind::Income, this_month);
    let expense = total(transactions, Kind::Expense, this_month);
    let last_month_expense = total(transactions, Kind::Expense, last_month);

    let elapsed = Decimal::from(today.day());
    let month_days = Decimal::from(this_month.days());
    let forecast_expense = expense
        .checked_div(elapsed)
        .map_or(Decimal::MAX, |per_day| per_day.saturating_mul(month_days));

    MonthStats {
        income,
        expense,
        net: income.saturating_sub(expense),
        forecast_expense,
        last_month_expense,
        forecast_delta: forecast_expense.saturating_sub(last_month_expense),
    }
}

/// The `limit` budgets closest to (or past) their threshold.
pub fn top_budgets(
    budgets: &[Budget],
    transactions: &[Transaction],
    today: NaiveDate,
    limit: usize,
) -> Vec<BudgetStatus> {
    let mut statuses: Vec<BudgetStatus> = budgets
        .iter()
        .map(|b| budget_status(b, transactions, today))
        .collect();
    statuses.sort_by(|a, b| b.ratio.cmp(&a.ratio));
    statuses.truncate(limit);
    statuses
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpcomingRecurring {
    pub rule_id: i64,
    pub category: String,
    pub kind: Kind,
    pub amount: Decimal,
    pub due: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecurringOverview {
    pub next: Option<UpcomingRecurring>,
    pub due_today: usize,
}

pub fn recurring_overview(rules: &[RecurringRule], today: NaiveDate) -> RecurringOverview {
    let mut next: Option<UpcomingRecurring> = None;
    let mut due_today = 0;
    for rule in rules {
        let Some(due) = next_due(rule, today) else {
            continue;
        };
        if is_due_today(rule, today) {
            due_today += 1;
        }
        if next.as_ref().is_none_or(|n| due < n.due) {
            next = Some(UpcomingRecurring {
                rule_id: rule.id,
                category: rule.category.clone(),
                kind: rule.kind,
                amount: rule.amount,
                due,
            });
        }
    }
    RecurringOverview { next, due_today }
}
