// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finwise::cycle::{CycleWindow, budget_status, current_window, spent_in_window};
use finwise::errors::ValidationError;
use finwise::models::{Budget, Kind, NewBudget, Period, Transaction, validate_amount};
use finwise::utils::parse_amount;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn window(from: NaiveDate, to: NaiveDate) -> CycleWindow {
    CycleWindow { from, to }
}

fn budget(category: &str, amount: i64, period: Period, anchor: NaiveDate) -> Budget {
    Budget {
        id: 1,
        category: category.into(),
        amount: Decimal::from(amount),
        period,
        anchor_date: anchor,
    }
}

fn txn(id: i64, kind: Kind, amount: i64, category: &str, date: NaiveDate) -> Transaction {
    Transaction {
        id,
        kind,
        amount: Decimal::from(amount),
        category: category.into(),
        date,
        source_rule_id: None,
    }
}

#[test]
fn weekly_window_contains_today() {
    let anchor = d(2024, 1, 1);
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2024, 1, 10)),
        window(d(2024, 1, 8), d(2024, 1, 14))
    );
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2024, 1, 1)),
        window(d(2024, 1, 1), d(2024, 1, 7))
    );
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2024, 1, 7)),
        window(d(2024, 1, 1), d(2024, 1, 7))
    );
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2024, 1, 8)),
        window(d(2024, 1, 8), d(2024, 1, 14))
    );
}

#[test]
fn weekly_window_before_anchor() {
    let anchor = d(2024, 1, 1);
    // the day before the anchor closes the preceding week
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2023, 12, 31)),
        window(d(2023, 12, 25), d(2023, 12, 31))
    );
    // further back the offset rounds one extra week down
    assert_eq!(
        current_window(anchor, Period::Weekly, d(2023, 12, 29)),
        window(d(2023, 12, 18), d(2023, 12, 24))
    );
}

#[test]
fn monthly_window_from_the_31st() {
    let anchor = d(2024, 1, 31);
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 2, 15)),
        window(d(2024, 1, 31), d(2024, 2, 28))
    );
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 2, 29)),
        window(d(2024, 2, 29), d(2024, 3, 30))
    );
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 3, 15)),
        window(d(2024, 2, 29), d(2024, 3, 30))
    );
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 12, 31)),
        window(d(2024, 12, 31), d(2025, 1, 30))
    );
}

#[test]
fn monthly_window_in_a_non_leap_february() {
    assert_eq!(
        current_window(d(2023, 1, 30), Period::Monthly, d(2023, 2, 28)),
        window(d(2023, 2, 28), d(2023, 3, 29))
    );
}

#[test]
fn monthly_window_wraps_into_the_previous_year() {
    let anchor = d(2023, 6, 15);
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 1, 10)),
        window(d(2023, 12, 15), d(2024, 1, 14))
    );
    assert_eq!(
        current_window(anchor, Period::Monthly, d(2024, 1, 15)),
        window(d(2024, 1, 15), d(2024, 2, 14))
    );
}

#[test]
fn windows_always_contain_today() {
    let anchors = [d(2024, 1, 1), d(2024, 1, 29), d(2024, 1, 31), d(2023, 8, 30)];
    let mut today = d(2024, 1, 1);
    while today <= d(2025, 3, 1) {
        for anchor in anchors {
            let w = current_window(anchor, Period::Monthly, today);
            assert!(w.contains(today), "{anchor} monthly on {today}: {w:?}");
            assert!(w.days() >= 28 && w.days() <= 31);
            if today >= anchor {
                let w = current_window(anchor, Period::Weekly, today);
                assert!(w.contains(today), "{anchor} weekly on {today}: {w:?}");
                assert_eq!(w.days(), 7);
            }
        }
        today = today.succ_opt().unwrap();
    }
}

#[test]
fn window_bounds_are_inclusive() {
    let w = window(d(2024, 1, 8), d(2024, 1, 14));
    assert!(w.contains(d(2024, 1, 8)));
    assert!(w.contains(d(2024, 1, 14)));
    assert!(!w.contains(d(2024, 1, 15)));
    assert!(!w.contains(d(2024, 1, 7)));
}

#[test]
fn spend_counts_matching_expenses_inside_the_window() {
    let b = budget("Food", 100, Period::Weekly, d(2024, 1, 1));
    let txns = vec![
        txn(1, Kind::Expense, 10, "Food", d(2024, 1, 8)),
        txn(2, Kind::Expense, 20, "  food ", d(2024, 1, 14)),
        txn(3, Kind::Expense, 40, "FOOD", d(2024, 1, 7)),
        txn(4, Kind::Income, 500, "Food", d(2024, 1, 9)),
        txn(5, Kind::Expense, 80, "Fuel", d(2024, 1, 9)),
        txn(6, Kind::Expense, 5, "Food", d(2024, 1, 15)),
    ];
    let w = b.current_window(d(2024, 1, 10));
    assert_eq!(spent_in_window(&b, w, &txns), Decimal::from(30));
}

#[test]
fn status_reports_remaining_and_clamped_ratio() {
    let b = budget("Food", 40, Period::Monthly, d(2024, 1, 1));
    let txns = vec![
        txn(1, Kind::Expense, 30, "Food", d(2024, 1, 3)),
        txn(2, Kind::Expense, 30, "Food", d(2024, 1, 20)),
    ];

    let early = budget_status(&b, &txns, d(2024, 1, 10));
    assert_eq!(early.spent, Decimal::from(30));
    assert_eq!(early.remaining, Decimal::from(10));
    assert_eq!(early.ratio, Decimal::new(75, 2));

    let over = budget_status(&b, &txns, d(2024, 1, 25));
    assert_eq!(over.remaining, Decimal::from(-20));
    assert_eq!(over.ratio, Decimal::ONE);

    let empty = budget("Food", 0, Period::Monthly, d(2024, 1, 1));
    assert_eq!(budget_status(&empty, &txns, d(2024, 1, 10)).ratio, Decimal::ZERO);
}

#[test]
fn tiny_budget_amount_saturates_the_ratio() {
    let mut b = budget("Food", 1, Period::Monthly, d(2024, 1, 1));
    b.amount = parse_amount("0.0000000000000000000000000001").unwrap();
    let txns = vec![txn(1, Kind::Expense, 10, "Food", d(2024, 1, 3))];

    let status = budget_status(&b, &txns, d(2024, 1, 10));

    assert_eq!(status.spent, Decimal::from(10));
    assert_eq!(status.ratio, Decimal::ONE);
    assert!(status.remaining < Decimal::ZERO);
}

#[test]
fn huge_expenses_saturate_the_spend() {
    let b = budget("Food", 100, Period::Monthly, d(2024, 1, 1));
    let huge = parse_amount("50000000000000000000000000000").unwrap();
    let txns: Vec<Transaction> = (1..=2)
        .map(|id| Transaction {
            amount: huge,
            ..txn(id, Kind::Expense, 0, "Food", d(2024, 1, 2))
        })
        .collect();

    let status = budget_status(&b, &txns, d(2024, 1, 10));

    assert_eq!(status.spent, Decimal::MAX);
    assert_eq!(status.ratio, Decimal::ONE);
    assert_eq!(status.remaining, Decimal::from(100) - Decimal::MAX);
}

#[test]
fn budget_amounts_are_bounded_at_validation() {
    let new = |amount: &str| NewBudget {
        category: "Food".into(),
        amount: parse_amount(amount).unwrap(),
        period: Period::Monthly,
        anchor_date: d(2024, 1, 1),
    };

    assert!(new("12.50").validate().is_ok());
    assert!(new("12.500").validate().is_ok());
    assert!(new("1000000000000000").validate().is_ok());
    assert!(matches!(
        new("0.0000000000000000000000000001").validate(),
        Err(ValidationError::TooPrecise(_))
    ));
    assert!(matches!(
        new("50000000000000000000000000000").validate(),
        Err(ValidationError::TooLarge(_))
    ));
    assert!(matches!(
        validate_amount(parse_amount("1000000000000000.01").unwrap()),
        Err(ValidationError::TooLarge(_))
    ));
}
