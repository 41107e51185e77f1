// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::materialize::{MaterializeReport, materialize_due};
use crate::models::{Frequency, Kind, NewRecurringRule, RecurringRule};
use crate::recurrence::next_due;
use crate::store::FinanceStore;
use crate::store::sqlite::{create_rule, delete_rule, get_rule, update_rule};
use crate::utils::{
    date_arg_or, fmt_money, get_show_cents, maybe_print_json, parse_amount, parse_date,
    parse_id, pretty_table, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("run", sub)) => {
            let as_of = date_arg_or(sub, "date", today())?;
            let report = run_due(conn, as_of)?;
            print_report(&report, as_of);
        }
        _ => {}
    }
    Ok(())
}

/// Posts everything due on `as_of`.
pub fn run_due(conn: &Connection, as_of: NaiveDate) -> Result<MaterializeReport> {
    materialize_due(conn, as_of).context("Loading recurring rules")
}

/// Startup pass. Failures are logged and never block the requested command.
pub fn auto_run(conn: &Connection, as_of: NaiveDate) {
    match run_due(conn, as_of) {
        Ok(report) if report.inserted_count() > 0 => {
            eprintln!(
                "Posted {} recurring transaction(s) due by {}",
                report.inserted_count(),
                as_of
            );
        }
        Ok(_) => {}
        Err(err) => warn!(error = %format!("{:#}", err), "recurring auto-run failed"),
    }
}

fn print_report(report: &MaterializeReport, as_of: NaiveDate) {
    println!(
        "Posted {} recurring transaction(s) due by {}",
        report.inserted_count(),
        as_of
    );
    for failure in &report.failures {
        println!("  rule #{} failed: {}", failure.rule_id, failure.error);
    }
    if !report.is_clean() {
        println!("Failed rules will be retried on the next run.");
    }
}

/// Catch-up pass after a rule is created or edited, reporting that rule's postings.
fn catch_up(conn: &Connection, rule_id: i64) -> Result<()> {
    let as_of = today();
    let report = run_due(conn, as_of)?;
    if let Some(outcome) = report.outcome(rule_id) {
        println!(
            "Rule #{}: posted {}, already present {}",
            rule_id,
            outcome.inserted.len(),
            outcome.already_present
        );
    }
    print_report(&report, as_of);
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewRecurringRule {
        kind: sub.get_one::<String>("kind").unwrap().parse::<Kind>()?,
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        category: sub.get_one::<String>("category").unwrap().trim().to_string(),
        anchor_date: date_arg_or(sub, "anchor", today())?,
        frequency: sub
            .get_one::<String>("frequency")
            .unwrap()
            .parse::<Frequency>()?,
    };
    new.validate()?;
    let rule = create_rule(conn, &new)?;
    println!(
        "Added rule #{}: {} {} '{}' {} from {}",
        rule.id,
        rule.kind,
        rule.amount,
        rule.category,
        rule.frequency,
        rule.anchor_date
    );
    catch_up(conn, rule.id)
}

#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub id: i64,
    pub kind: Kind,
    pub amount: Decimal,
    pub category: String,
    pub frequency: Frequency,
    pub anchor: NaiveDate,
    pub last_run: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<RuleRow>> {
    let as_of = date_arg_or(sub, "date", today())?;
    let data = conn
        .list_recurring_rules()?
        .into_iter()
        .map(|r| RuleRow {
            id: r.id,
            kind: r.kind,
            amount: r.amount,
            next_due: next_due(&r, as_of),
            category: r.category,
            frequency: r.frequency,
            anchor: r.anchor_date,
            last_run: r.last_run,
        })
        .collect();
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let as_of = date_arg_or(sub, "date", today())?;
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let show_cents = get_show_cents(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let due = match r.next_due {
                    Some(d) if d == as_of => "Today".to_string(),
                    Some(d) => d.to_string(),
                    None => String::new(),
                };
                vec![
                    r.id.to_string(),
                    r.category.clone(),
                    format!("{}{}", r.kind.sign(), fmt_money(&r.amount, show_cents)),
                    r.frequency.label().to_string(),
                    r.anchor.to_string(),
                    r.last_run.map(|d| d.to_string()).unwrap_or_default(),
                    due,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Category", "Amount", "Every", "Anchor", "Last posted", "Next due"],
                rows
            )
        );
    }
    Ok(())
}

/// Applies the edit flags to `rule`. Moving the anchor or changing the frequency
/// starts a new progression, so the watermark is cleared and the next pass replays
/// from the anchor; occurrences already posted are skipped by the duplicate check.
pub fn apply_edit(rule: &mut RecurringRule, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(kind) = sub.get_one::<String>("kind") {
        rule.kind = kind.parse()?;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        rule.amount = parse_amount(amount)?;
    }
    if let Some(category) = sub.get_one::<String>("category") {
        rule.category = category.trim().to_string();
    }
    let mut reset = false;
    if let Some(frequency) = sub.get_one::<String>("frequency") {
        let frequency: Frequency = frequency.parse()?;
        reset |= frequency != rule.frequency;
        rule.frequency = frequency;
    }
    if let Some(anchor) = sub.get_one::<String>("anchor") {
        let anchor = parse_date(anchor)?;
        reset |= anchor != rule.anchor_date;
        rule.anchor_date = anchor;
    }
    if reset {
        rule.last_run = None;
    }
    NewRecurringRule {
        kind: rule.kind,
        amount: rule.amount,
        category: rule.category.clone(),
        anchor_date: rule.anchor_date,
        frequency: rule.frequency,
    }
    .validate()?;
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut rule = get_rule(conn, id)?;
    apply_edit(&mut rule, sub)?;
    update_rule(conn, &rule).with_context(|| format!("Updating rule {}", id))?;
    println!("Updated rule #{}", id);
    catch_up(conn, id)
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    if delete_rule(conn, id)? {
        println!("Removed rule #{} (posted transactions kept)", id);
    } else {
        println!("No rule #{}", id);
    }
    Ok(())
}
