// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::{AppContext, DEFAULT_MONTHLY_BUDGET};
use crate::models::{Expense, ExpenseCategory, next_id};
use crate::rollup::{self, CategorySpend, ChartRange};
use crate::store::{self, RecordStore, keys};
use crate::utils::{
    fmt_money, fmt_relative, maybe_print_json, now_local, now_millis, parse_amount, parse_date,
    percent, pretty_table, today,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    Good,
    Careful,
    Danger,
}

impl BudgetStatus {
    /// Classifies by the share of the budget still available.
    pub fn from_remaining(remaining_pct: i64) -> Self {
        if remaining_pct > 70 {
            BudgetStatus::Good
        } else if remaining_pct >= 40 {
            BudgetStatus::Careful
        } else {
            BudgetStatus::Danger
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Good => "Good",
            BudgetStatus::Careful => "Careful",
            BudgetStatus::Danger => "Danger",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
}

fn seed_expenses() -> Vec<Expense> {
    [
        (1, ExpenseCategory::Housing, Decimal::from(800), 15),
        (2, ExpenseCategory::Food, Decimal::new(8520, 2), 20),
        (3, ExpenseCategory::Transportation, Decimal::new(4580, 2), 18),
        (4, ExpenseCategory::Shopping, Decimal::from(120), 21),
    ]
    .into_iter()
    .filter_map(|(id, category, amount, day)| {
        Some(Expense {
            id,
            category,
            amount,
            date: NaiveDate::from_ymd_opt(2024, 1, day)?,
        })
    })
    .collect()
}

/// Expense collection plus the monthly budget ceiling.
pub struct Budget<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    expenses: Vec<Expense>,
    monthly_budget: Decimal,
}

impl<'s, S: RecordStore + ?Sized> Budget<'s, S> {
    pub fn load(store: &'s S, ctx: &mut AppContext, today: NaiveDate) -> Result<Self> {
        let expenses = store::load_collection(store, keys::EXPENSES)?.unwrap_or_else(seed_expenses);
        let monthly_budget =
            store::load_decimal(store, keys::MONTHLY_BUDGET)?.unwrap_or(DEFAULT_MONTHLY_BUDGET);
        let budget = Self {
            store,
            expenses,
            monthly_budget,
        };
        budget.persist()?;
        ctx.set_budget(budget.monthly_budget);
        ctx.set_expenses(&budget.expenses, today);
        Ok(budget)
    }

    fn persist(&self) -> Result<()> {
        store::save_collection(self.store, keys::EXPENSES, &self.expenses)
    }

    fn commit(&self, ctx: &mut AppContext, today: NaiveDate) -> Result<()> {
        self.persist()?;
        ctx.set_expenses(&self.expenses, today);
        Ok(())
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn monthly_budget(&self) -> Decimal {
        self.monthly_budget
    }

    /// Newest entries first; `None` returns everything.
    pub fn recent(&self, limit: Option<usize>) -> &[Expense] {
        let n = limit.unwrap_or(self.expenses.len()).min(self.expenses.len());
        &self.expenses[..n]
    }

    /// Non-positive amounts are ignored and yield `None`.
    pub fn add_expense(
        &mut self,
        ctx: &mut AppContext,
        new: NewExpense,
        today: NaiveDate,
    ) -> Result<Option<Expense>> {
        if new.amount <= Decimal::ZERO {
            return Ok(None);
        }
        let expense = Expense {
            id: next_id(self.expenses.iter().map(|e| e.id), now_millis()),
            category: new.category,
            amount: new.amount,
            date: new.date,
        };
        self.expenses.insert(0, expense.clone());
        self.commit(ctx, today)?;
        info!(id = expense.id, amount = %expense.amount, "expense added");
        Ok(Some(expense))
    }

    pub fn delete_expense(&mut self, ctx: &mut AppContext, id: i64, today: NaiveDate) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Ok(false);
        }
        self.commit(ctx, today)?;
        Ok(true)
    }

    /// Non-positive values are ignored and yield `false`.
    pub fn set_monthly_budget(&mut self, ctx: &mut AppContext, value: Decimal) -> Result<bool> {
        if value <= Decimal::ZERO {
            return Ok(false);
        }
        self.monthly_budget = value;
        store::save_decimal(self.store, keys::MONTHLY_BUDGET, value)?;
        ctx.set_budget(value);
        info!(budget = %value, "monthly budget set");
        Ok(true)
    }

    /// Drops this month's expenses and keeps every earlier one.
    pub fn reset_current_month(&mut self, ctx: &mut AppContext, today: NaiveDate) -> Result<usize> {
        let kept: Vec<Expense> = rollup::month_complement(&self.expenses, today)
            .into_iter()
            .cloned()
            .collect();
        let removed = self.expenses.len() - kept.len();
        self.expenses = kept;
        self.commit(ctx, today)?;
        info!(removed, "current month spending reset");
        Ok(removed)
    }

    pub fn reset_all(&mut self, ctx: &mut AppContext, today: NaiveDate) -> Result<usize> {
        let removed = self.expenses.len();
        self.expenses.clear();
        self.commit(ctx, today)?;
        info!(removed, "all spending reset");
        Ok(removed)
    }

    pub fn spent_this_month(&self, today: NaiveDate) -> Decimal {
        rollup::total(rollup::month_filter(&self.expenses, today))
    }

    pub fn remaining(&self, today: NaiveDate) -> Decimal {
        self.monthly_budget - self.spent_this_month(today)
    }

    pub fn category_spending(&self, today: NaiveDate) -> Vec<CategorySpend> {
        rollup::category_breakdown(
            rollup::month_filter(&self.expenses, today),
            ExpenseCategory::ALL,
        )
    }

    pub fn status(&self, today: NaiveDate) -> BudgetStatus {
        let spent_pct = percent(self.spent_this_month(today), self.monthly_budget);
        BudgetStatus::from_remaining(100 - spent_pct)
    }
}

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ctx = AppContext::new();
    ctx.initialize(store, today)?;
    let mut budget = Budget::load(store, &mut ctx, today)?;
    match m.subcommand() {
        Some(("add", sub)) => add(&mut budget, &mut ctx, sub, today)?,
        Some(("list", sub)) => list(&budget, &ctx, sub, today)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if budget.delete_expense(&mut ctx, id, today)? {
                println!("Removed expense {}", id);
            } else {
                eprintln!("No expense with id {}", id);
            }
        }
        Some(("set", sub)) => {
            let raw = sub.get_one::<String>("amount").unwrap();
            let accepted = match parse_amount(raw) {
                Some(v) => budget.set_monthly_budget(&mut ctx, v)?,
                None => false,
            };
            if accepted {
                println!("Monthly budget set to {}", fmt_money(&ctx.monthly_budget()));
            } else {
                eprintln!("Ignored budget '{}': must be a positive number", raw.trim());
            }
        }
        Some(("reset", sub)) => {
            let removed = if sub.get_flag("all") {
                budget.reset_all(&mut ctx, today)?
            } else {
                budget.reset_current_month(&mut ctx, today)?
            };
            println!(
                "Removed {} expense(s); spent this month: {}",
                removed,
                fmt_money(&ctx.budget_spent())
            );
        }
        Some(("categories", sub)) => categories(&budget, sub, today)?,
        Some(("chart", sub)) => chart(store, &mut ctx, sub, today)?,
        _ => {}
    }
    Ok(())
}

fn add<S: RecordStore + ?Sized>(
    budget: &mut Budget<'_, S>,
    ctx: &mut AppContext,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let category: ExpenseCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let raw = sub.get_one::<String>("amount").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let Some(amount) = parse_amount(raw) else {
        eprintln!("Ignored expense '{}': amount must be a positive number", raw.trim());
        return Ok(());
    };
    if let Some(e) = budget.add_expense(ctx, NewExpense { category, amount, date }, today)? {
        println!(
            "Recorded {} {} on {} (spent {} of {}, {}%)",
            fmt_money(&e.amount),
            e.category,
            e.date,
            fmt_money(&ctx.budget_spent()),
            fmt_money(&ctx.monthly_budget()),
            ctx.budget_percentage()
        );
    }
    Ok(())
}

fn list<S: RecordStore + ?Sized>(
    budget: &Budget<'_, S>,
    ctx: &AppContext,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let limit = if sub.get_flag("all") {
        None
    } else {
        sub.get_one::<usize>("limit").copied()
    };
    let shown = budget.recent(limit);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shown)? {
        return Ok(());
    }
    let now = now_local();
    let rows = shown
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                fmt_relative(e.date, now),
                e.category.to_string(),
                format!("-{}", fmt_money(&e.amount)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Date", "When", "Category", "Amount"], rows));
    if shown.len() < budget.expenses().len() {
        println!(
            "Showing {} of {} (use --all to show more)",
            shown.len(),
            budget.expenses().len()
        );
    }
    let spent_pct = ctx.budget_percentage();
    println!(
        "Budget {} | spent {} ({}%) | remaining {} ({}%) | {}",
        fmt_money(&ctx.monthly_budget()),
        fmt_money(&ctx.budget_spent()),
        spent_pct,
        fmt_money(&budget.remaining(today)),
        100 - spent_pct,
        budget.status(today).label()
    );
    Ok(())
}

fn categories<S: RecordStore + ?Sized>(
    budget: &Budget<'_, S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let data = budget.category_spending(today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                fmt_money(&c.spent),
                format!("{}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    Ok(())
}

fn chart<S: RecordStore + ?Sized>(
    store: &S,
    ctx: &mut AppContext,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let range = match sub.get_one::<String>("range") {
        Some(r) => r.parse::<ChartRange>()?,
        None => selected_range(store)?,
    };
    ctx.set_chart_range(range);
    let series = ctx.chart_series(today);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let rows = series
        .iter()
        .map(|b| vec![b.label.clone(), fmt_money(&b.amount)])
        .collect();
    println!("Spending over {}", range);
    println!("{}", pretty_table(&["Period", "Spent"], rows));
    Ok(())
}

/// The chart range last chosen with `planify range`.
pub fn selected_range<S: RecordStore + ?Sized>(store: &S) -> Result<ChartRange> {
    Ok(store
        .load(keys::CHART_RANGE)?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}
