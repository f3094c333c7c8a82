// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use planify::context::{AppContext, DEFAULT_MONTHLY_BUDGET};
use planify::models::{Expense, ExpenseCategory};
use planify::rollup::ChartRange;
use planify::store::{MemoryStore, RecordStore, keys, save_collection, save_decimal};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn worked_example() -> Vec<Expense> {
    vec![
        Expense {
            id: 1,
            category: ExpenseCategory::Housing,
            amount: Decimal::from(800),
            date: d("2024-03-01"),
        },
        Expense {
            id: 2,
            category: ExpenseCategory::Food,
            amount: "85.20".parse().unwrap(),
            date: d("2024-03-05"),
        },
        Expense {
            id: 3,
            category: ExpenseCategory::Transportation,
            amount: "45.80".parse().unwrap(),
            date: d("2024-02-20"),
        },
    ]
}

#[test]
fn spent_counts_only_the_current_month() {
    let mut ctx = AppContext::new();
    ctx.set_expenses(&worked_example(), d("2024-03-10"));
    assert_eq!(ctx.monthly_budget(), DEFAULT_MONTHLY_BUDGET);
    assert_eq!(ctx.budget_spent(), "885.20".parse::<Decimal>().unwrap());
    assert_eq!(ctx.budget_percentage(), 25);
    assert_eq!(ctx.budget_remaining(), "2614.80".parse::<Decimal>().unwrap());
}

#[test]
fn zero_denominators_yield_zero() {
    let mut ctx = AppContext::new();
    ctx.set_budget(Decimal::ZERO);
    ctx.set_budget_spent(Decimal::from(100));
    assert_eq!(ctx.budget_percentage(), 0);
    assert_eq!(ctx.habits_percentage(), 0);
    assert_eq!(ctx.tasks_percentage(), 0);
    assert_eq!(ctx.goals_percentage(), 0);
}

#[test]
fn overspending_is_not_clamped() {
    let mut ctx = AppContext::new();
    ctx.set_budget(Decimal::from(100));
    ctx.set_budget_spent(Decimal::from(150));
    assert_eq!(ctx.budget_percentage(), 150);
    assert_eq!(ctx.budget_remaining(), Decimal::from(-50));
}

#[test]
fn stats_percentages_round_half_up() {
    let mut ctx = AppContext::new();
    ctx.set_habit_stats(1, 8);
    ctx.set_task_stats(2, 3);
    ctx.set_goal_stats(3, 4);
    assert_eq!(ctx.habits_percentage(), 13);
    assert_eq!(ctx.tasks_percentage(), 67);
    assert_eq!(ctx.goals_percentage(), 75);
}

#[test]
fn initialize_reads_store_and_is_idempotent() {
    let store = MemoryStore::new();
    save_collection(&store, keys::EXPENSES, &worked_example()).unwrap();
    save_decimal(&store, keys::MONTHLY_BUDGET, Decimal::from(2000)).unwrap();
    store
        .save(
            keys::TODOS,
            r#"[{"id":1,"title":"a","priority":"high","dueDate":"2024-03-01","category":"Work","completed":true},
                {"id":2,"title":"b","priority":"low","dueDate":"2024-03-02","category":"Other","completed":false}]"#,
        )
        .unwrap();

    let today = d("2024-03-10");
    let mut ctx = AppContext::new();
    ctx.initialize(&store, today).unwrap();
    assert_eq!(ctx.monthly_budget(), Decimal::from(2000));
    assert_eq!(ctx.budget_spent(), "885.20".parse::<Decimal>().unwrap());
    assert_eq!(ctx.tasks().completed, 1);
    assert_eq!(ctx.tasks().total, 2);
    assert_eq!(ctx.tasks_percentage(), 50);

    let snapshot = ctx.clone();
    ctx.initialize(&store, today).unwrap();
    assert_eq!(ctx, snapshot);
}

#[test]
fn initialize_on_empty_store_keeps_defaults() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    ctx.initialize(&store, d("2024-03-10")).unwrap();
    assert_eq!(ctx, AppContext::default());
}

#[test]
fn chart_series_follows_selected_range() {
    let mut ctx = AppContext::new();
    let today = d("2024-03-10");
    ctx.set_expenses(&worked_example(), today);
    assert_eq!(ctx.chart_series(today).len(), 7);
    ctx.set_chart_range(ChartRange::ThreeMonths);
    let series = ctx.chart_series(today);
    assert_eq!(series.len(), 3);
    assert_eq!(series[2].amount, "885.20".parse::<Decimal>().unwrap());
}

#[test]
fn summary_serializes_derived_values() {
    let mut ctx = AppContext::new();
    ctx.set_expenses(&worked_example(), d("2024-03-10"));
    let v = serde_json::to_value(ctx.summary()).unwrap();
    assert_eq!(v["budget_percentage"], 25);
    assert_eq!(v["chart_range"], "7days");
}
