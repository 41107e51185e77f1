// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finwise::commands::doctor;
use finwise::models::{Frequency, Kind, NewRecurringRule};
use finwise::store::sqlite::create_rule;
use finwise::{db, materialize};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    // no unique index, so duplicates from older databases can be reproduced
    conn.execute_batch(
        r#"
        CREATE TABLE recurring_rules(
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            anchor_date TEXT NOT NULL,
            frequency TEXT NOT NULL,
            last_run TEXT
        );
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            source_rule_id INTEGER
        );
        INSERT INTO recurring_rules VALUES
            (1,'expense','5','Coffee','2024-01-01','daily','2023-12-31'),
            (2,'expense','50','Food','2024-01-01','weekly','2024-01-10'),
            (3,'income','900','Salary','2024-01-31','monthly','2024-03-29');
        INSERT INTO transactions(kind,amount,category,date,source_rule_id) VALUES
            ('income','900','Salary','2024-02-29',3),
            ('income','900','Salary','2024-02-29',3),
            ('expense','5','Coffee','2024-01-05',9),
            ('expense','-5','Coffee','2024-01-06',NULL),
            ('expense','5','Coffee','yesterday',NULL);
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn doctor_reports_each_inconsistency() {
    let conn = setup();
    let mut issues: Vec<&str> = doctor::findings(&conn)
        .unwrap()
        .iter()
        .map(|f| f.issue)
        .collect();
    issues.sort();
    assert_eq!(
        issues,
        vec![
            "bad_amount",
            "bad_date",
            "duplicate_occurrence",
            "last_run_before_anchor",
            "last_run_off_schedule",
            "orphaned_rule_link",
        ]
    );
}

#[test]
fn doctor_details_name_the_records() {
    let conn = setup();
    let findings = doctor::findings(&conn).unwrap();
    let detail = |issue: &str| {
        findings
            .iter()
            .find(|f| f.issue == issue)
            .map(|f| f.detail.clone())
            .unwrap()
    };
    assert_eq!(
        detail("duplicate_occurrence"),
        "rule #3 on 2024-02-29 posted 2 times"
    );
    assert_eq!(
        detail("orphaned_rule_link"),
        "transactions reference deleted rule #9"
    );
    assert!(detail("last_run_off_schedule").starts_with("rule #2:"));
}

#[test]
fn doctor_is_quiet_after_a_clean_pass() {
    let conn = db::open_in_memory().unwrap();
    create_rule(
        &conn,
        &NewRecurringRule {
            kind: Kind::Expense,
            amount: Decimal::from(15),
            category: "Streaming".into(),
            anchor_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            frequency: Frequency::Monthly,
        },
    )
    .unwrap();
    materialize::materialize_due(&conn, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();

    assert!(doctor::findings(&conn).unwrap().is_empty());
}
