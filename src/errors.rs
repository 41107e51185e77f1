// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by a [`crate::store::FinanceStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The `(rule, date)` occurrence is already present. Raised by the unique
    /// backstop when two materialization passes race.
    #[error("occurrence {date} of rule {rule_id} is already materialized")]
    Duplicate { rule_id: i64, date: NaiveDate },
    #[error("corrupt {what} '{value}' in store")]
    Corrupt { what: &'static str, value: String },
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },
}

/// Rejections for user-supplied records. Raised before anything reaches the core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(String),
    #[error("amount {0} has more than 2 decimal places")]
    TooPrecise(String),
    #[error("amount {0} exceeds 1000000000000000")]
    TooLarge(String),
    #[error("category must not be empty")]
    EmptyCategory,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {what} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    pub what: &'static str,
    pub value: String,
    pub expected: &'static str,
}
