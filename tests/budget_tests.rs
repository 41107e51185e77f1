// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finwise::models::{Kind, NewBudget, NewTransaction, Period};
use finwise::store::FinanceStore;
use finwise::store::sqlite::create_budget;
use finwise::{cli, commands::budgets, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    create_budget(
        &conn,
        &NewBudget {
            category: "Dining".into(),
            amount: Decimal::new(5000, 2),
            period: Period::Weekly,
            anchor_date: d(2024, 1, 1),
        },
    )
    .unwrap();
    for (date, amount, category, kind) in [
        (d(2024, 1, 7), "12.00", "Dining", Kind::Expense),
        (d(2024, 1, 8), "9.50", "dining ", Kind::Expense),
        (d(2024, 1, 10), "20.00", "Dining", Kind::Expense),
        (d(2024, 1, 11), "100.00", "Dining", Kind::Income),
        (d(2024, 1, 15), "7.00", "Dining", Kind::Expense),
    ] {
        conn.insert_transaction(&NewTransaction {
            kind,
            amount: amount.parse().unwrap(),
            category: category.into(),
            date,
            source_rule_id: None,
        })
        .unwrap();
    }
    conn
}

#[test]
fn budget_spent_in_current_week() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["finwise", "budget", "list", "--date", "2024-01-10"]);
    if let Some(("budget", b_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = b_m.subcommand() {
            let rows = budgets::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            let row = &rows[0];
            assert_eq!((row.from, row.to), (d(2024, 1, 8), d(2024, 1, 14)));
            assert_eq!(format!("{:.2}", row.spent), "29.50");
            assert_eq!(format!("{:.2}", row.remaining), "20.50");
            assert_eq!(row.ratio, Decimal::new(59, 2));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no budget subcommand");
    }
}

#[test]
fn budget_rolls_into_next_week() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["finwise", "budget", "list", "--date", "2024-01-15"]);
    let (_, b_m) = matches.subcommand().unwrap();
    let (_, list_m) = b_m.subcommand().unwrap();
    let rows = budgets::query_rows(&conn, list_m).unwrap();
    assert_eq!((rows[0].from, rows[0].to), (d(2024, 1, 15), d(2024, 1, 21)));
    assert_eq!(format!("{:.2}", rows[0].spent), "7.00");
}

#[test]
fn budget_list_rejects_bad_date() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["finwise", "budget", "list", "--date", "10/01/2024"]);
    let (_, b_m) = matches.subcommand().unwrap();
    let (_, list_m) = b_m.subcommand().unwrap();
    assert!(budgets::query_rows(&conn, list_m).is_err());
}
