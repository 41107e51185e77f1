// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finwise::{cli, commands::transactions};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            source_rule_id INTEGER
        );
        "#,
    )
    .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(kind,amount,category,date) VALUES ('expense','10','Cat1',?1)",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(kind,amount,category,date,source_rule_id) VALUES ('income','500','Salary','2025-01-02',7)",
        [],
    )
    .unwrap();
    conn
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["finwise", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, list_m).unwrap();
        }
        panic!("no list subcommand");
    }
    panic!("no tx subcommand");
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let rows = list_rows(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
}

#[test]
fn list_filters_by_kind_and_category() {
    let conn = setup();
    let rows = list_rows(&conn, &["--kind", "income"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rule, Some(7));

    let rows = list_rows(&conn, &["--category", " cat1 "]);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.kind == "expense"));
}

#[test]
fn list_date_bounds_are_inclusive() {
    let conn = setup();
    let rows = list_rows(&conn, &["--from", "2025-01-02", "--to", "2025-01-02"]);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.date == "2025-01-02"));
}
