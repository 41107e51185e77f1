// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Kind, NewTransaction, UNCATEGORIZED};
use crate::store::FinanceStore;
use crate::store::sqlite::{
    TransactionFilter, delete_transaction, get_transaction, query_transactions,
    update_transaction,
};
use crate::utils::{
    fmt_money, get_show_cents, maybe_print_json, parse_amount, parse_date, parse_id,
    pretty_table, today,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
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

fn category_or_default(raw: Option<&String>) -> String {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: Kind = sub.get_one::<String>("kind").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = category_or_default(sub.get_one::<String>("category"));
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };

    let new = NewTransaction {
        kind,
        amount,
        category,
        date,
        source_rule_id: None,
    };
    new.validate()?;
    let txn = conn.insert_transaction(&new)?;
    println!(
        "Recorded #{} {} {}{} in '{}' on {}",
        txn.id, txn.kind, txn.kind.sign(), txn.amount, txn.category, txn.date
    );
    Ok(())
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
                    r.date.clone(),
                    r.kind.clone(),
                    fmt_money(&r.amount, show_cents),
                    r.category.clone(),
                    r.rule.map(|id| format!("#{}", id)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Kind", "Amount", "Category", "Rule"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: rust_decimal::Decimal,
    pub category: String,
    pub rule: Option<i64>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TransactionFilter {
        from: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        to: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
        kind: sub
            .get_one::<String>("kind")
            .map(|s| s.parse::<Kind>())
            .transpose()?,
        category: sub
            .get_one::<String>("category")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        limit: sub.get_one::<usize>("limit").copied(),
    };

    let data = query_transactions(conn, &filter)?
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            amount: t.amount,
            category: t.category,
            rule: t.source_rule_id,
        })
        .collect();
    Ok(data)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let mut txn = get_transaction(conn, id)?;

    if let Some(kind) = sub.get_one::<String>("kind") {
        txn.kind = kind.parse()?;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        txn.amount = parse_amount(amount)?;
    }
    if let Some(category) = sub.get_one::<String>("category") {
        txn.category = category_or_default(Some(category));
    }
    if let Some(date) = sub.get_one::<String>("date") {
        txn.date = parse_date(date)?;
    }
    crate::models::validate_amount(txn.amount)?;

    update_transaction(conn, &txn)
        .with_context(|| format!("Updating transaction {}", id))?;
    println!("Updated transaction #{}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    if delete_transaction(conn, id)? {
        println!("Removed transaction #{}", id);
    } else {
        println!("No transaction #{}", id);
    }
    Ok(())
}
