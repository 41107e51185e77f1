// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::FinanceStore;
use crate::calendar::parse_iso_date;
use crate::errors::StoreError;
use crate::models::{
    Budget, Kind, NewBudget, NewRecurringRule, NewTransaction, RecurringRule, Transaction,
};

const RULE_COLUMNS: &str = "id, kind, amount, category, anchor_date, frequency, last_run";
const TXN_COLUMNS: &str = "id, kind, amount, category, date, source_rule_id";
const BUDGET_COLUMNS: &str = "id, category, amount, period, anchor_date";

type RawRule = (i64, String, String, String, String, String, Option<String>);
type RawTransaction = (i64, String, String, String, String, Option<i64>);
type RawBudget = (i64, String, String, String, String);

fn raw_rule(r: &Row<'_>) -> rusqlite::Result<RawRule> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
    ))
}

fn raw_transaction(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
}

fn raw_budget(r: &Row<'_>) -> rusqlite::Result<RawBudget> {
    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
}

fn stored_date(what: &'static str, value: &str) -> Result<NaiveDate, StoreError> {
    parse_iso_date(value).ok_or_else(|| StoreError::Corrupt {
        what,
        value: value.to_string(),
    })
}

fn stored<T: FromStr>(what: &'static str, value: &str) -> Result<T, StoreError> {
    value.trim().parse::<T>().map_err(|_| StoreError::Corrupt {
        what,
        value: value.to_string(),
    })
}

fn rule_from_raw(raw: RawRule) -> Result<RecurringRule, StoreError> {
    let (id, kind, amount, category, anchor, frequency, last_run) = raw;
    Ok(RecurringRule {
        id,
        kind: stored("kind", &kind)?,
        amount: stored::<Decimal>("amount", &amount)?,
        category,
        anchor_date: stored_date("anchor date", &anchor)?,
        frequency: stored("frequency", &frequency)?,
        last_run: last_run
            .as_deref()
            .map(|s| stored_date("last run", s))
            .transpose()?,
    })
}

fn transaction_from_raw(raw: RawTransaction) -> Result<Transaction, StoreError> {
    let (id, kind, amount, category, date, source_rule_id) = raw;
    Ok(Transaction {
        id,
        kind: stored("kind", &kind)?,
        amount: stored::<Decimal>("amount", &amount)?,
        category,
        date: stored_date("transaction date", &date)?,
        source_rule_id,
    })
}

fn budget_from_raw(raw: RawBudget) -> Result<Budget, StoreError> {
    let (id, category, amount, period, anchor) = raw;
    Ok(Budget {
        id,
        category,
        amount: stored::<Decimal>("amount", &amount)?,
        period: stored("period", &period)?,
        anchor_date: stored_date("anchor date", &anchor)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl FinanceStore for Connection {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>, StoreError> {
        let mut stmt = self.prepare(&format!(
            "SELECT {RULE_COLUMNS} FROM recurring_rules ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map([], raw_rule)?;
        let mut rules = Vec::new();
        for row in rows {
            rules.push(rule_from_raw(row?)?);
        }
        Ok(rules)
    }

    fn find_transaction(
        &self,
        rule_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError> {
        let raw = self
            .query_row(
                &format!(
                    "SELECT {TXN_COLUMNS} FROM transactions WHERE source_rule_id=?1 AND date=?2 LIMIT 1"
                ),
                params![rule_id, date.to_string()],
                raw_transaction,
            )
            .optional()?;
        raw.map(transaction_from_raw).transpose()
    }

    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction, StoreError> {
        let inserted = self.execute(
            "INSERT INTO transactions(kind, amount, category, date, source_rule_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.kind.as_str(),
                new.amount.to_string(),
                new.category,
                new.date.to_string(),
                new.source_rule_id
            ],
        );
        match inserted {
            Ok(_) => Ok(Transaction {
                id: self.last_insert_rowid(),
                kind: new.kind,
                amount: new.amount,
                category: new.category.clone(),
                date: new.date,
                source_rule_id: new.source_rule_id,
            }),
            Err(err) if is_unique_violation(&err) => match new.source_rule_id {
                Some(rule_id) => Err(StoreError::Duplicate {
                    rule_id,
                    date: new.date,
                }),
                None => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }

    fn update_rule_last_run(&self, rule_id: i64, date: NaiveDate) -> Result<(), StoreError> {
        let changed = self.execute(
            "UPDATE recurring_rules SET last_run=?1 WHERE id=?2",
            params![date.to_string(), rule_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                what: "recurring rule",
                id: rule_id,
            });
        }
        Ok(())
    }

    fn list_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        let mut stmt = self.prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map([], raw_budget)?;
        let mut budgets = Vec::new();
        for row in rows {
            budgets.push(budget_from_raw(row?)?);
        }
        Ok(budgets)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        query_transactions(self, &TransactionFilter::default())
    }
}

/// Optional constraints for [`query_transactions`]. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<Kind>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

pub fn query_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, StoreError> {
    let mut sql = format!("SELECT {TXN_COLUMNS} FROM transactions WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(from) = filter.from {
        sql.push_str(" AND date>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND date<=?");
        params_vec.push(to.to_string());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().to_string());
    }
    if let Some(cat) = &filter.category {
        sql.push_str(" AND lower(trim(category))=lower(trim(?))");
        params_vec.push(cat.clone());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), raw_transaction)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(transaction_from_raw(row?)?);
    }
    Ok(data)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {TXN_COLUMNS} FROM transactions WHERE id=?1"),
            params![id],
            raw_transaction,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            what: "transaction",
            id,
        })?;
    transaction_from_raw(raw)
}

pub fn update_transaction(conn: &Connection, txn: &Transaction) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE transactions SET kind=?1, amount=?2, category=?3, date=?4 WHERE id=?5",
        params![
            txn.kind.as_str(),
            txn.amount.to_string(),
            txn.category,
            txn.date.to_string(),
            txn.id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            what: "transaction",
            id: txn.id,
        });
    }
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    Ok(conn.execute("DELETE FROM transactions WHERE id=?1", params![id])? > 0)
}

pub fn create_rule(conn: &Connection, new: &NewRecurringRule) -> Result<RecurringRule, StoreError> {
    conn.execute(
        "INSERT INTO recurring_rules(kind, amount, category, anchor_date, frequency)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.kind.as_str(),
            new.amount.to_string(),
            new.category,
            new.anchor_date.to_string(),
            new.frequency.as_str()
        ],
    )?;
    Ok(RecurringRule {
        id: conn.last_insert_rowid(),
        kind: new.kind,
        amount: new.amount,
        category: new.category.clone(),
        anchor_date: new.anchor_date,
        frequency: new.frequency,
        last_run: None,
    })
}

pub fn get_rule(conn: &Connection, id: i64) -> Result<RecurringRule, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {RULE_COLUMNS} FROM recurring_rules WHERE id=?1"),
            params![id],
            raw_rule,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            what: "recurring rule",
            id,
        })?;
    rule_from_raw(raw)
}

/// Writes every field of `rule`, including its watermark.
pub fn update_rule(conn: &Connection, rule: &RecurringRule) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE recurring_rules
            SET kind=?1, amount=?2, category=?3, anchor_date=?4, frequency=?5, last_run=?6
          WHERE id=?7",
        params![
            rule.kind.as_str(),
            rule.amount.to_string(),
            rule.category,
            rule.anchor_date.to_string(),
            rule.frequency.as_str(),
            rule.last_run.map(|d| d.to_string()),
            rule.id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            what: "recurring rule",
            id: rule.id,
        });
    }
    Ok(())
}

/// Removes the rule. Transactions it already produced are kept.
pub fn delete_rule(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    Ok(conn.execute("DELETE FROM recurring_rules WHERE id=?1", params![id])? > 0)
}

pub fn create_budget(conn: &Connection, new: &NewBudget) -> Result<Budget, StoreError> {
    conn.execute(
        "INSERT INTO budgets(category, amount, period, anchor_date) VALUES (?1, ?2, ?3, ?4)",
        params![
            new.category,
            new.amount.to_string(),
            new.period.as_str(),
            new.anchor_date.to_string()
        ],
    )?;
    Ok(Budget {
        id: conn.last_insert_rowid(),
        category: new.category.clone(),
        amount: new.amount,
        period: new.period,
        anchor_date: new.anchor_date,
    })
}

pub fn get_budget(conn: &Connection, id: i64) -> Result<Budget, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {BUDGET_COLUMNS} FROM budgets WHERE id=?1"),
            params![id],
            raw_budget,
        )
        .optional()?
        .ok_or(StoreError::NotFound { what: "budget", id })?;
    budget_from_raw(raw)
}

pub fn update_budget(conn: &Connection, budget: &Budget) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE budgets SET category=?1, amount=?2, period=?3, anchor_date=?4 WHERE id=?5",
        params![
            budget.category,
            budget.amount.to_string(),
            budget.period.as_str(),
            budget.anchor_date.to_string(),
            budget.id
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound {
            what: "budget",
            id: budget.id,
        });
    }
    Ok(())
}

pub fn delete_budget(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    Ok(conn.execute("DELETE FROM budgets WHERE id=?1", params![id])? > 0)
}
