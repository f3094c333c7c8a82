// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use crate::commands::budget::{BudgetStatus, selected_range};
use crate::context::AppContext;
use crate::store::RecordStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today};
use anyhow::Result;
use rust_decimal::Decimal;

/// Recent-activity lines; each appears only when its number is non-zero.
pub fn activity_lines(ctx: &AppContext) -> Vec<String> {
    let mut lines = Vec::new();
    if ctx.budget_spent() > Decimal::ZERO {
        lines.push(format!(
            "Spent {} of {} budget",
            fmt_money(&ctx.budget_spent()),
            fmt_money(&ctx.monthly_budget())
        ));
    }
    let habits = ctx.habits();
    if habits.completed > 0 {
        lines.push(format!(
            "Completed {} out of {} habits",
            habits.completed, habits.total
        ));
    }
    let tasks = ctx.tasks();
    if tasks.completed > 0 {
        lines.push(format!(
            "Completed {} out of {} tasks",
            tasks.completed, tasks.total
        ));
    }
    if ctx.goals().in_progress > 0 {
        lines.push(format!("{} goals in progress", ctx.goals().in_progress));
    }
    lines
}

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ctx = AppContext::new();
    ctx.initialize(store, today)?;
    ctx.set_chart_range(selected_range(store)?);

    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &ctx.summary())? {
        return Ok(());
    }

    match auth::display_identity(store)? {
        Some(name) => println!("Welcome back, {}", name),
        None => println!("Welcome back"),
    }
    println!("{}", today.format("%A, %B %-d, %Y"));

    let remaining_pct = 100 - ctx.budget_percentage();
    let status = BudgetStatus::from_remaining(remaining_pct);
    let rows = vec![
        vec![
            "Budget".to_string(),
            format!("{} left ({})", fmt_money(&ctx.budget_remaining()), status.label()),
            format!("{}% remaining", remaining_pct),
        ],
        vec![
            "Habits".to_string(),
            format!("{}/{}", ctx.habits().completed, ctx.habits().total),
            format!("{}%", ctx.habits_percentage()),
        ],
        vec![
            "Tasks".to_string(),
            format!("{}/{}", ctx.tasks().completed, ctx.tasks().total),
            format!("{}%", ctx.tasks_percentage()),
        ],
        vec![
            "Goals".to_string(),
            format!("{}/{} in progress", ctx.goals().in_progress, ctx.goals().total),
            format!("{}%", ctx.goals_percentage()),
        ],
    ];
    println!("{}", pretty_table(&["Area", "Status", "Rate"], rows));

    let lines = activity_lines(&ctx);
    if !lines.is_empty() {
        println!("Recent activity:");
        for line in lines {
            println!("  • {}", line);
        }
    }
    Ok(())
}
