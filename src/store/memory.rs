// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use std::cell::RefCell;

use super::FinanceStore;
use crate::errors::StoreError;
use crate::models::{
    Budget, NewBudget, NewRecurringRule, NewTransaction, RecurringRule, Transaction,
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    rules: Vec<RecurringRule>,
    budgets: Vec<Budget>,
    transactions: Vec<Transaction>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store with the same uniqueness guarantees as the SQLite schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&self, new: NewRecurringRule) -> RecurringRule {
        let mut state = self.state.borrow_mut();
        let rule = RecurringRule {
            id: state.allocate_id(),
            kind: new.kind,
            amount: new.amount,
            category: new.category,
            anchor_date: new.anchor_date,
            frequency: new.frequency,
            last_run: None,
        };
        state.rules.push(rule.clone());
        rule
    }

    /// Replaces a stored rule wholesale, watermark included.
    pub fn put_rule(&self, rule: RecurringRule) {
        let mut state = self.state.borrow_mut();
        match state.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => *slot = rule,
            None => state.rules.push(rule),
        }
    }

    pub fn add_budget(&self, new: NewBudget) -> Budget {
        let mut state = self.state.borrow_mut();
        let budget = Budget {
            id: state.allocate_id(),
            category: new.category,
            amount: new.amount,
            period: new.period,
            anchor_date: new.anchor_date,
        };
        state.budgets.push(budget.clone());
        budget
    }

    pub fn rule(&self, id: i64) -> Option<RecurringRule> {
        self.state.borrow().rules.iter().find(|r| r.id == id).cloned()
    }

    /// Transactions produced by `rule_id`, in insertion order.
    pub fn transactions_for_rule(&self, rule_id: i64) -> Vec<Transaction> {
        self.state
            .borrow()
            .transactions
            .iter()
            .filter(|t| t.source_rule_id == Some(rule_id))
            .cloned()
            .collect()
    }
}

impl FinanceStore for MemoryStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>, StoreError> {
        Ok(self.state.borrow().rules.clone())
    }

    fn find_transaction(
        &self,
        rule_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .state
            .borrow()
            .transactions
            .iter()
            .find(|t| t.source_rule_id == Some(rule_id) && t.date == date)
            .cloned())
    }

    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction, StoreError> {
        let mut state = self.state.borrow_mut();
        if let Some(rule_id) = new.source_rule_id {
            let taken = state
                .transactions
                .iter()
                .any(|t| t.source_rule_id == Some(rule_id) && t.date == new.date);
            if taken {
                return Err(StoreError::Duplicate {
                    rule_id,
                    date: new.date,
                });
            }
        }
        let txn = Transaction {
            id: state.allocate_id(),
            kind: new.kind,
            amount: new.amount,
            category: new.category.clone(),
            date: new.date,
            source_rule_id: new.source_rule_id,
        };
        state.transactions.push(txn.clone());
        Ok(txn)
    }

    fn update_rule_last_run(&self, rule_id: i64, date: NaiveDate) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        let rule = state
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or(StoreError::NotFound {
                what: "recurring rule",
                id: rule_id,
            })?;
        rule.last_run = Some(date);
        Ok(())
    }

    fn list_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        Ok(self.state.borrow().budgets.clone())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.state.borrow().transactions.clone())
    }
}
