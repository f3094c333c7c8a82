// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{Habit, HabitIcon, Outcome, next_id};
use crate::reset::DailyReset;
use crate::store::{self, RecordStore, keys};
use crate::utils::{fmt_time_12h, maybe_print_json, now_millis, parse_time, pretty_table, today};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use std::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub icon: HabitIcon,
    pub time: NaiveTime,
}

fn seed_habits() -> Vec<Habit> {
    [
        (1, "Morning Exercise", HabitIcon::Dumbbell, 6, 5),
        (2, "Read a Book", HabitIcon::Book, 20, 3),
        (3, "Meditate", HabitIcon::Sparkles, 7, 7),
    ]
    .into_iter()
    .filter_map(|(id, name, icon, hour, streak)| {
        Some(Habit {
            id,
            name: name.to_string(),
            icon,
            time: NaiveTime::from_hms_opt(hour, 0, 0)?,
            streak,
            completed: false,
        })
    })
    .collect()
}

pub struct Habits<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    habits: Vec<Habit>,
}

impl<'s, S: RecordStore + ?Sized> Habits<'s, S> {
    /// Loads the list and clears yesterday's check-offs if the day changed
    /// since the last reset.
    pub fn load(store: &'s S, ctx: &mut AppContext, today: NaiveDate) -> Result<Self> {
        let habits = store::load_collection(store, keys::HABITS)?.unwrap_or_else(seed_habits);
        let mut this = Self { store, habits };
        if !this.reset_if_new_day(ctx, today)? {
            this.commit(ctx)?;
        }
        Ok(this)
    }

    fn commit(&self, ctx: &mut AppContext) -> Result<()> {
        store::save_collection(self.store, keys::HABITS, &self.habits)?;
        ctx.set_habit_stats(self.completed_count(), self.habits.len());
        Ok(())
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|h| h.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.habits.is_empty() && self.habits.iter().all(|h| h.completed)
    }

    /// Earliest scheduled time first.
    pub fn sorted_by_time(&self) -> Vec<&Habit> {
        let mut out: Vec<&Habit> = self.habits.iter().collect();
        out.sort_by_key(|h| h.time);
        out
    }

    /// Blank names are ignored and yield `None`.
    pub fn add_habit(&mut self, ctx: &mut AppContext, new: NewHabit) -> Result<Option<Habit>> {
        let name = new.name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let habit = Habit {
            id: next_id(self.habits.iter().map(|h| h.id), now_millis()),
            name: name.to_string(),
            icon: new.icon,
            time: new.time,
            streak: 0,
            completed: false,
        };
        self.habits.push(habit.clone());
        self.commit(ctx)?;
        info!(id = habit.id, name = %habit.name, "habit added");
        Ok(Some(habit))
    }

    /// Flips today's completion. Completing bumps the streak; undoing it
    /// takes one back, never below zero.
    pub fn toggle_habit(&mut self, ctx: &mut AppContext, id: i64) -> Result<Option<Outcome<Habit>>> {
        let was_all = self.all_completed();
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        habit.completed = !habit.completed;
        habit.streak = if habit.completed {
            habit.streak + 1
        } else {
            habit.streak.saturating_sub(1)
        };
        let record = habit.clone();
        self.commit(ctx)?;
        Ok(Some(Outcome {
            record,
            celebrate: self.all_completed() && !was_all,
        }))
    }

    pub fn delete_habit(&mut self, ctx: &mut AppContext, id: i64) -> Result<bool> {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() == before {
            return Ok(false);
        }
        self.commit(ctx)?;
        Ok(true)
    }

    /// Clears every `completed` flag when `today` differs from the stored
    /// last-reset date. Streaks are kept.
    pub fn reset_if_new_day(&mut self, ctx: &mut AppContext, today: NaiveDate) -> Result<bool> {
        let last = store::load_date(self.store, keys::HABITS_LAST_RESET)?;
        if last == Some(today) {
            return Ok(false);
        }
        for h in &mut self.habits {
            h.completed = false;
        }
        self.commit(ctx)?;
        store::save_date(self.store, keys::HABITS_LAST_RESET, today)?;
        info!(%today, "habits reset for new day");
        Ok(true)
    }
}

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ctx = AppContext::new();
    ctx.initialize(store, today)?;
    let mut habits = Habits::load(store, &mut ctx, today)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewHabit {
                name: sub.get_one::<String>("name").unwrap().to_string(),
                icon: sub.get_one::<String>("icon").unwrap().parse()?,
                time: parse_time(sub.get_one::<String>("time").unwrap())?,
            };
            match habits.add_habit(&mut ctx, new)? {
                Some(h) => println!("Added habit '{}' at {}", h.name, fmt_time_12h(&h.time)),
                None => eprintln!("Ignored habit: name must not be blank"),
            }
        }
        Some(("list", sub)) => list(&habits, &ctx, sub)?,
        Some(("done", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            match habits.toggle_habit(&mut ctx, id)? {
                Some(out) => {
                    let state = if out.record.completed { "done" } else { "not done" };
                    println!(
                        "'{}' marked {} (streak {}); {}/{} today",
                        out.record.name,
                        state,
                        out.record.streak,
                        ctx.habits().completed,
                        ctx.habits().total
                    );
                    if out.celebrate {
                        println!("🎉 All habits completed today!");
                    }
                }
                None => eprintln!("No habit with id {}", id),
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if habits.delete_habit(&mut ctx, id)? {
                println!("Removed habit {}", id);
            } else {
                eprintln!("No habit with id {}", id);
            }
        }
        Some(("watch", _)) => watch(&mut habits, &mut ctx)?,
        _ => {}
    }
    Ok(())
}

fn list<S: RecordStore + ?Sized>(
    habits: &Habits<'_, S>,
    ctx: &AppContext,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let sorted = habits.sorted_by_time();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sorted)? {
        return Ok(());
    }
    let rows = sorted
        .iter()
        .map(|h| {
            vec![
                h.id.to_string(),
                if h.completed { "✔".into() } else { " ".into() },
                h.name.clone(),
                h.icon.to_string(),
                fmt_time_12h(&h.time),
                format!("{} days", h.streak),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Done", "Habit", "Kind", "Time", "Streak"], rows)
    );
    println!(
        "Today: {}/{} ({}%)",
        ctx.habits().completed,
        ctx.habits().total,
        ctx.habits_percentage()
    );
    Ok(())
}

/// Stays in the foreground and applies the daily reset at every local
/// midnight until interrupted.
fn watch<S: RecordStore + ?Sized>(habits: &mut Habits<'_, S>, ctx: &mut AppContext) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let timer = DailyReset::start(move |day| {
        let _ = tx.send(day);
    });
    println!("Watching for new days (Ctrl-C to stop)");
    for day in rx {
        if habits.reset_if_new_day(ctx, day)? {
            println!("{}: habits reset", day);
        }
    }
    timer.stop();
    Ok(())
}
