// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns due occurrences of recurring rules into transactions.
//!
//! A pass walks each rule's progression from its resume point up to `today`,
//! inserting one transaction per date that has none yet and then advancing the
//! rule's `last_run` watermark. The existence check runs immediately before each
//! insert and the store rejects duplicate `(rule, date)` pairs, so passes may be
//! repeated, interrupted or overlapped without producing duplicates.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::models::{NewTransaction, RecurringRule, Transaction};
use crate::recurrence::{Occurrences, resume_cursor};
use crate::store::FinanceStore;

#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule_id: i64,
    pub inserted: Vec<Transaction>,
    /// Due occurrences that were already in the store.
    pub already_present: usize,
    /// New watermark, `None` when nothing was due.
    pub last_run: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct RuleFailure {
    pub rule_id: i64,
    pub error: StoreError,
}

#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub outcomes: Vec<RuleOutcome>,
    pub failures: Vec<RuleFailure>,
}

impl MaterializeReport {
    pub fn inserted_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.inserted.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn outcome(&self, rule_id: i64) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|o| o.rule_id == rule_id)
    }
}

/// Materializes every due occurrence of a single rule.
///
/// On error the rule may be left with some occurrences inserted and its
/// watermark not yet advanced; the next pass picks up from there.
pub fn materialize_rule<S>(
    store: &S,
    rule: &RecurringRule,
    today: NaiveDate,
) -> Result<RuleOutcome, StoreError>
where
    S: FinanceStore + ?Sized,
{
    let mut outcome = RuleOutcome {
        rule_id: rule.id,
        inserted: Vec::new(),
        already_present: 0,
        last_run: None,
    };
    let mut latest = None;

    for date in Occurrences::starting_at(resume_cursor(rule), rule.frequency)
        .take_while(|d| *d <= today)
    {
        if store.find_transaction(rule.id, date)?.is_some() {
            outcome.already_present += 1;
        } else {
            match store.insert_transaction(&NewTransaction::from_rule(rule, date)) {
                Ok(txn) => outcome.inserted.push(txn),
                Err(StoreError::Duplicate { .. }) => outcome.already_present += 1,
                Err(err) => return Err(err),
            }
        }
        latest = Some(date);
    }

    if let Some(date) = latest {
        store.update_rule_last_run(rule.id, date)?;
        outcome.last_run = Some(date);
    }
    Ok(outcome)
}

/// Runs [`materialize_rule`] for each rule; one rule failing does not stop the rest.
pub fn materialize_rules<S>(store: &S, rules: &[RecurringRule], today: NaiveDate) -> MaterializeReport
where
    S: FinanceStore + ?Sized,
{
    let mut report = MaterializeReport::default();
    for rule in rules {
        match materialize_rule(store, rule, today) {
            Ok(outcome) => {
                debug!(
                    rule_id = rule.id,
                    inserted = outcome.inserted.len(),
                    already_present = outcome.already_present,
                    "rule materialized"
                );
                report.outcomes.push(outcome);
            }
            Err(error) => {
                warn!(rule_id = rule.id, %error, "materializing rule failed");
                report.failures.push(RuleFailure {
                    rule_id: rule.id,
                    error,
                });
            }
        }
    }
    info!(
        %today,
        rules = rules.len(),
        inserted = report.inserted_count(),
        failed = report.failures.len(),
        "recurring pass finished"
    );
    report
}

/// Loads every rule from `store` and materializes what is due on `today`.
pub fn materialize_due<S>(store: &S, today: NaiveDate) -> Result<MaterializeReport, StoreError>
where
    S: FinanceStore + ?Sized,
{
    let rules = store.list_recurring_rules()?;
    Ok(materialize_rules(store, &rules, today))
}
