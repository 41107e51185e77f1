// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::budget_status;
use crate::models::{NewBudget, Period};
use crate::store::FinanceStore;
use crate::store::sqlite::{create_budget, delete_budget, get_budget, update_budget};
use crate::utils::{
    date_arg_or, fmt_money, fmt_ratio, get_show_cents, maybe_print_json, parse_amount,
    parse_date, parse_id, pretty_table, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewBudget {
        category: sub.get_one::<String>("category").unwrap().trim().to_string(),
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        period: sub.get_one::<String>("period").unwrap().parse::<Period>()?,
        anchor_date: date_arg_or(sub, "anchor", today())?,
    };
    new.validate()?;
    let budget = create_budget(conn, &new)?;
    let window = budget.current_window(today());
    println!(
        "Budget #{} set for {} = {} {} (current cycle {} .. {})",
        budget.id, budget.category, budget.amount, budget.period, window.from, window.to
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    pub id: i64,
    pub category: String,
    pub period: Period,
    pub amount: Decimal,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub ratio: Decimal,
}

/// Budgets with the spend of their cycle current on `--date` (default today).
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<BudgetRow>> {
    let as_of = date_arg_or(sub, "date", today())?;
    let budgets = conn.list_budgets()?;
    let transactions = conn.list_transactions()?;
    let data = budgets
        .iter()
        .map(|b| {
            let status = budget_status(b, &transactions, as_of);
            BudgetRow {
                id: b.id,
                category: b.category.clone(),
                period: b.period,
                amount: b.amount,
                from: status.window.from,
                to: status.window.to,
                spent: status.spent,
                remaining: status.remaining,
                ratio: status.ratio,
            }
        })
        .collect();
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let show_cents = get_show_cents(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.category.clone(),
                    r.period.label().to_string(),
                    format!("{} .. {}", r.from, r.to),
                    fmt_money(&r.amount, show_cents),
                    fmt_money(&r.spent, show_cents),
                    fmt_money(&r.remaining, show_cents),
                    fmt_ratio(&r.ratio),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Category", "Period", "Cycle", "Budget", "Spent", "Left", "Used"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut budget = get_budget(conn, id)?;

    if let Some(category) = sub.get_one::<String>("category") {
        budget.category = category.trim().to_string();
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        budget.amount = parse_amount(amount)?;
    }
    if let Some(period) = sub.get_one::<String>("period") {
        budget.period = period.parse()?;
    }
    if let Some(anchor) = sub.get_one::<String>("anchor") {
        budget.anchor_date = parse_date(anchor)?;
    }
    NewBudget {
        category: budget.category.clone(),
        amount: budget.amount,
        period: budget.period,
        anchor_date: budget.anchor_date,
    }
    .validate()?;

    update_budget(conn, &budget).with_context(|| format!("Updating budget {}", id))?;
    println!("Updated budget #{}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    if delete_budget(conn, id)? {
        println!("Removed budget #{}", id);
    } else {
        println!("No budget #{}", id);
    }
    Ok(())
}
