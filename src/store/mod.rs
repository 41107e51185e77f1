// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence seam for the materializer and the budget aggregators.

pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;

use crate::errors::StoreError;
use crate::models::{Budget, NewTransaction, RecurringRule, Transaction};

pub use memory::MemoryStore;
pub use sqlite::TransactionFilter;

/// Minimal contract the core needs from a record store.
///
/// `insert_transaction` must report a second insert for the same
/// `(source_rule_id, date)` as [`StoreError::Duplicate`].
pub trait FinanceStore {
    fn list_recurring_rules(&self) -> Result<Vec<RecurringRule>, StoreError>;
    fn find_transaction(
        &self,
        rule_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Transaction>, StoreError>;
    fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction, StoreError>;
    fn update_rule_last_run(&self, rule_id: i64, date: NaiveDate) -> Result<(), StoreError>;
    fn list_budgets(&self) -> Result<Vec<Budget>, StoreError>;
    fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;
}
