// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::parse_iso_date;
use crate::recurrence::lies_on_progression;
use crate::store::FinanceStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub detail: String,
}

fn finding(issue: &'static str, detail: String) -> Finding {
    Finding { issue, detail }
}

/// Read-only consistency checks over the stored records.
pub fn findings(conn: &Connection) -> Result<Vec<Finding>> {
    let mut out = Vec::new();

    // 1) Watermarks that could not have come from the rule's own progression
    for rule in conn.list_recurring_rules()? {
        let Some(last) = rule.last_run else { continue };
        if last < rule.anchor_date {
            out.push(finding(
                "last_run_before_anchor",
                format!("rule #{}: {} < {}", rule.id, last, rule.anchor_date),
            ));
        } else if !lies_on_progression(&rule, last) {
            out.push(finding(
                "last_run_off_schedule",
                format!(
                    "rule #{}: {} is not a {} step from {}",
                    rule.id, last, rule.frequency, rule.anchor_date
                ),
            ));
        }
    }

    // 2) More than one posting for the same occurrence
    let mut stmt = conn.prepare(
        "SELECT source_rule_id, date, COUNT(*) FROM transactions
          WHERE source_rule_id IS NOT NULL
          GROUP BY source_rule_id, date HAVING COUNT(*) > 1
          ORDER BY source_rule_id, date",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let rule_id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let count: i64 = r.get(2)?;
        out.push(finding(
            "duplicate_occurrence",
            format!("rule #{} on {} posted {} times", rule_id, date, count),
        ));
    }

    // 3) Postings whose rule was deleted
    let mut stmt = conn.prepare(
        "SELECT DISTINCT source_rule_id FROM transactions
          WHERE source_rule_id IS NOT NULL
            AND source_rule_id NOT IN (SELECT id FROM recurring_rules)
          ORDER BY source_rule_id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let rule_id: i64 = r.get(0)?;
        out.push(finding(
            "orphaned_rule_link",
            format!("transactions reference deleted rule #{}", rule_id),
        ));
    }

    // 4) Raw rows the typed loaders would reject
    let mut stmt = conn.prepare("SELECT id, amount, date FROM transactions ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount: String = r.get(1)?;
        let date: String = r.get(2)?;
        match amount.trim().parse::<Decimal>() {
            Ok(v) if v > Decimal::ZERO => {}
            _ => out.push(finding(
                "bad_amount",
                format!("transaction #{}: '{}'", id, amount),
            )),
        }
        if parse_iso_date(&date).is_none() {
            out.push(finding(
                "bad_date",
                format!("transaction #{}: '{}'", id, date),
            ));
        }
    }

    Ok(out)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = findings(conn)?
        .into_iter()
        .map(|f| vec![f.issue.to_string(), f.detail])
        .collect();

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
