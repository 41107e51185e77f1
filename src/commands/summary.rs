// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::BudgetStatus;
use crate::store::FinanceStore;
use crate::summary::{MonthStats, RecurringOverview, month_stats, recurring_overview, top_budgets};
use crate::utils::{date_arg_or, fmt_money, fmt_ratio, get_show_cents, pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

const TOP_BUDGETS: usize = 3;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub as_of: NaiveDate,
    pub month: MonthStats,
    pub budgets: Vec<BudgetStatus>,
    pub recurring: RecurringOverview,
}

pub fn build(conn: &Connection, as_of: NaiveDate) -> Result<Summary> {
    let transactions = conn.list_transactions()?;
    let budgets = conn.list_budgets()?;
    let rules = conn.list_recurring_rules()?;
    Ok(Summary {
        as_of,
        month: month_stats(&transactions, as_of),
        budgets: top_budgets(&budgets, &transactions, as_of, TOP_BUDGETS),
        recurring: recurring_overview(&rules, as_of),
    })
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let as_of = date_arg_or(sub, "date", today())?;
    let summary = build(conn, as_of)?;
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let cents = get_show_cents(conn)?;
    let m = &summary.month;
    println!(
        "{}",
        pretty_table(
            &["This month", "Amount"],
            vec![
                vec!["Income".into(), fmt_money(&m.income, cents)],
                vec!["Expense".into(), fmt_money(&m.expense, cents)],
                vec!["Net".into(), fmt_money(&m.net, cents)],
                vec!["Forecast expense".into(), fmt_money(&m.forecast_expense, cents)],
                vec!["Last month expense".into(), fmt_money(&m.last_month_expense, cents)],
                vec!["Forecast vs last month".into(), fmt_money(&m.forecast_delta, cents)],
            ],
        )
    );

    if !summary.budgets.is_empty() {
        let rows = summary
            .budgets
            .iter()
            .map(|s| {
                vec![
                    s.budget.category.clone(),
                    format!("{} .. {}", s.window.from, s.window.to),
                    format!(
                        "{} / {}",
                        fmt_money(&s.spent, cents),
                        fmt_money(&s.budget.amount, cents)
                    ),
                    fmt_ratio(&s.ratio),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Budget", "Cycle", "Spent", "Used"], rows)
        );
    }

    match &summary.recurring.next {
        Some(next) => {
            let due = if next.due == as_of {
                "Today".to_string()
            } else {
                next.due.to_string()
            };
            println!(
                "Next recurring: {} {}{} ({}); {} due today",
                next.category,
                next.kind.sign(),
                fmt_money(&next.amount, cents),
                due,
                summary.recurring.due_today
            );
        }
        None => println!("No recurring rules yet."),
    }
    Ok(())
}
