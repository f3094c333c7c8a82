// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{Goal, GoalCategory, Outcome, RecordId, next_record_id};
use crate::store::{self, RecordStore, keys};
use crate::utils::{maybe_print_json, now_millis, parse_date, pretty_table, share, today};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub category: GoalCategory,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalStats {
    pub completed: usize,
    pub in_progress: usize,
    pub total: usize,
    pub average_progress: u32,
}

fn seed_goals() -> Vec<Goal> {
    [
        (1_i64, "Save $10,000", GoalCategory::Finance, (2024, 12, 31), 65),
        (2, "Run a marathon", GoalCategory::Health, (2024, 9, 15), 40),
        (3, "Learn Spanish", GoalCategory::Education, (2024, 6, 30), 25),
        (4, "Read 24 books", GoalCategory::Personal, (2024, 12, 31), 80),
    ]
    .into_iter()
    .filter_map(|(id, title, category, (y, m, d), progress)| {
        Some(Goal {
            id: RecordId::from(id),
            title: title.to_string(),
            category,
            deadline: NaiveDate::from_ymd_opt(y, m, d)?,
            progress,
            completed: false,
        })
    })
    .collect()
}

pub struct Goals<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    goals: Vec<Goal>,
}

impl<'s, S: RecordStore + ?Sized> Goals<'s, S> {
    pub fn load(store: &'s S, ctx: &mut AppContext) -> Result<Self> {
        let goals = store::load_collection(store, keys::GOALS)?.unwrap_or_else(seed_goals);
        let this = Self { store, goals };
        this.commit(ctx)?;
        Ok(this)
    }

    fn commit(&self, ctx: &mut AppContext) -> Result<()> {
        store::save_collection(self.store, keys::GOALS, &self.goals)?;
        let stats = self.stats();
        ctx.set_goal_stats(stats.in_progress, stats.total);
        Ok(())
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn stats(&self) -> GoalStats {
        let total = self.goals.len();
        let completed = self.goals.iter().filter(|g| g.completed).count();
        let progress_sum: usize = self.goals.iter().map(|g| g.progress as usize).sum();
        GoalStats {
            completed,
            in_progress: total - completed,
            total,
            average_progress: share(progress_sum, total * 100),
        }
    }

    /// Open goals first, then by nearest deadline.
    pub fn sorted(&self) -> Vec<&Goal> {
        let mut out: Vec<&Goal> = self.goals.iter().collect();
        out.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then_with(|| a.deadline.cmp(&b.deadline))
        });
        out
    }

    /// Blank titles are ignored and yield `None`.
    pub fn add_goal(&mut self, ctx: &mut AppContext, new: NewGoal) -> Result<Option<Goal>> {
        let title = new.title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let goal = Goal {
            id: next_record_id(self.goals.iter().map(|g| &g.id), now_millis()),
            title: title.to_string(),
            category: new.category,
            deadline: new.deadline,
            progress: 0,
            completed: false,
        };
        self.goals.push(goal.clone());
        self.commit(ctx)?;
        info!(id = %goal.id, "goal added");
        Ok(Some(goal))
    }

    /// Completing snaps progress to 100; reopening snaps it to 0.
    pub fn toggle_goal(&mut self, ctx: &mut AppContext, id: &str) -> Result<Option<Outcome<Goal>>> {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == *id) else {
            return Ok(None);
        };
        goal.completed = !goal.completed;
        goal.progress = if goal.completed { COMPLETE } else { 0 };
        let record = goal.clone();
        self.commit(ctx)?;
        let celebrate = record.completed;
        Ok(Some(Outcome { record, celebrate }))
    }

    /// Clamps to `0..=100`; reaching 100 completes the goal, anything below
    /// reopens it.
    pub fn update_progress(
        &mut self,
        ctx: &mut AppContext,
        id: &str,
        progress: i64,
    ) -> Result<Option<Outcome<Goal>>> {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == *id) else {
            return Ok(None);
        };
        let was_completed = goal.completed;
        goal.progress = progress.clamp(0, COMPLETE as i64) as u8;
        goal.completed = goal.progress == COMPLETE;
        let record = goal.clone();
        self.commit(ctx)?;
        let celebrate = record.completed && !was_completed;
        Ok(Some(Outcome { record, celebrate }))
    }

    pub fn delete_goal(&mut self, ctx: &mut AppContext, id: &str) -> Result<bool> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != *id);
        if self.goals.len() == before {
            return Ok(false);
        }
        self.commit(ctx)?;
        Ok(true)
    }
}

fn report(out: &Outcome<Goal>) {
    let g = &out.record;
    println!("'{}' at {}%", g.title, g.progress);
    if out.celebrate {
        println!("🎉 Goal achieved: {}", g.title);
    }
}

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ctx = AppContext::new();
    ctx.initialize(store, today)?;
    let mut goals = Goals::load(store, &mut ctx)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewGoal {
                title: sub.get_one::<String>("title").unwrap().to_string(),
                category: sub.get_one::<String>("category").unwrap().parse()?,
                deadline: parse_date(sub.get_one::<String>("deadline").unwrap())?,
            };
            match goals.add_goal(&mut ctx, new)? {
                Some(g) => println!("Added goal '{}' (deadline {})", g.title, g.deadline),
                None => eprintln!("Ignored goal: title must not be blank"),
            }
        }
        Some(("list", sub)) => list(&goals, &ctx, sub)?,
        Some(("done", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            match goals.toggle_goal(&mut ctx, id)? {
                Some(out) => report(&out),
                None => eprintln!("No goal with id {}", id),
            }
        }
        Some(("progress", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let value = *sub.get_one::<i64>("value").unwrap();
            match goals.update_progress(&mut ctx, id, value)? {
                Some(out) => report(&out),
                None => eprintln!("No goal with id {}", id),
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if goals.delete_goal(&mut ctx, id)? {
                println!("Removed goal {}", id);
            } else {
                eprintln!("No goal with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn list<S: RecordStore + ?Sized>(
    goals: &Goals<'_, S>,
    ctx: &AppContext,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let sorted = goals.sorted();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sorted)? {
        return Ok(());
    }
    let rows = sorted
        .iter()
        .map(|g| {
            vec![
                g.id.to_string(),
                if g.completed { "✔".into() } else { " ".into() },
                g.title.clone(),
                g.category.to_string(),
                g.deadline.to_string(),
                format!("{}%", g.progress),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Done", "Goal", "Category", "Deadline", "Progress"], rows)
    );
    let stats = goals.stats();
    println!(
        "{} completed, {} in progress ({}%), average progress {}%",
        stats.completed,
        ctx.goals().in_progress,
        ctx.goals_percentage(),
        stats.average_progress
    );
    Ok(())
}
