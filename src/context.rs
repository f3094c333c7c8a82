// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-feature summary state.
//!
//! Feature modules own their records and push summary numbers in here after
//! every persisted change. Only raw numbers are stored; every percentage is
//! derived on read.

use crate::models::{Expense, Goal, Habit, Todo};
use crate::rollup::{self, Bucket, ChartRange};
use crate::store::{self, RecordStore, keys};
use crate::utils::{percent, share};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_MONTHLY_BUDGET: Decimal = Decimal::from_parts(3500, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalTally {
    pub in_progress: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppContext {
    monthly_budget: Decimal,
    budget_spent: Decimal,
    expenses: Vec<Expense>,
    habits: Tally,
    tasks: Tally,
    goals: GoalTally,
    chart_range: ChartRange,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
            budget_spent: Decimal::ZERO,
            expenses: Vec::new(),
            habits: Tally::default(),
            tasks: Tally::default(),
            goals: GoalTally::default(),
            chart_range: ChartRange::default(),
        }
    }
}

/// Serializable snapshot of the context, derived values included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub monthly_budget: Decimal,
    pub budget_spent: Decimal,
    pub budget_remaining: Decimal,
    pub budget_percentage: i64,
    pub habits: Tally,
    pub habits_percentage: u32,
    pub tasks: Tally,
    pub tasks_percentage: u32,
    pub goals: GoalTally,
    pub goals_percentage: u32,
    pub chart_range: ChartRange,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_budget(&mut self, value: Decimal) {
        self.monthly_budget = value;
    }

    pub fn set_budget_spent(&mut self, value: Decimal) {
        self.budget_spent = value;
    }

    pub fn set_habit_stats(&mut self, completed: usize, total: usize) {
        self.habits = Tally { completed, total };
    }

    pub fn set_task_stats(&mut self, completed: usize, total: usize) {
        self.tasks = Tally { completed, total };
    }

    pub fn set_goal_stats(&mut self, in_progress: usize, total: usize) {
        self.goals = GoalTally { in_progress, total };
    }

    /// Replaces the expense list and recomputes the month's spend.
    pub fn set_expenses(&mut self, expenses: &[Expense], today: NaiveDate) {
        self.expenses = expenses.to_vec();
        self.budget_spent = rollup::total(rollup::month_filter(&self.expenses, today));
    }

    pub fn set_chart_range(&mut self, mode: ChartRange) {
        self.chart_range = mode;
    }

    /// Seeds every statistic straight from the persisted collections.
    /// Absent collections leave the current value untouched, so calling this
    /// repeatedly without intervening writes is a no-op.
    pub fn initialize<S: RecordStore + ?Sized>(&mut self, store: &S, today: NaiveDate) -> Result<()> {
        if let Some(budget) = store::load_decimal(store, keys::MONTHLY_BUDGET)? {
            self.monthly_budget = budget;
        }
        if let Some(expenses) = store::load_collection::<Expense, _>(store, keys::EXPENSES)? {
            self.set_expenses(&expenses, today);
        }
        if let Some(habits) = store::load_collection::<Habit, _>(store, keys::HABITS)? {
            let done = habits.iter().filter(|h| h.completed).count();
            self.set_habit_stats(done, habits.len());
        }
        if let Some(todos) = store::load_collection::<Todo, _>(store, keys::TODOS)? {
            let done = todos.iter().filter(|t| t.completed).count();
            self.set_task_stats(done, todos.len());
        }
        if let Some(goals) = store::load_collection::<Goal, _>(store, keys::GOALS)? {
            let open = goals.iter().filter(|g| !g.completed).count();
            self.set_goal_stats(open, goals.len());
        }
        debug!(spent = %self.budget_spent, "context initialized");
        Ok(())
    }

    pub fn monthly_budget(&self) -> Decimal {
        self.monthly_budget
    }

    pub fn budget_spent(&self) -> Decimal {
        self.budget_spent
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn habits(&self) -> Tally {
        self.habits
    }

    pub fn tasks(&self) -> Tally {
        self.tasks
    }

    pub fn goals(&self) -> GoalTally {
        self.goals
    }

    pub fn chart_range(&self) -> ChartRange {
        self.chart_range
    }

    pub fn budget_remaining(&self) -> Decimal {
        self.monthly_budget - self.budget_spent
    }

    pub fn budget_percentage(&self) -> i64 {
        percent(self.budget_spent, self.monthly_budget)
    }

    pub fn habits_percentage(&self) -> u32 {
        share(self.habits.completed, self.habits.total)
    }

    pub fn tasks_percentage(&self) -> u32 {
        share(self.tasks.completed, self.tasks.total)
    }

    pub fn goals_percentage(&self) -> u32 {
        share(self.goals.in_progress, self.goals.total)
    }

    pub fn chart_series(&self, today: NaiveDate) -> Vec<Bucket> {
        rollup::time_bucket_series(&self.expenses, self.chart_range, today)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            monthly_budget: self.monthly_budget,
            budget_spent: self.budget_spent,
            budget_remaining: self.budget_remaining(),
            budget_percentage: self.budget_percentage(),
            habits: self.habits,
            habits_percentage: self.habits_percentage(),
            tasks: self.tasks,
            tasks_percentage: self.tasks_percentage(),
            goals: self.goals,
            goals_percentage: self.goals_percentage(),
            chart_range: self.chart_range,
        }
    }
}
