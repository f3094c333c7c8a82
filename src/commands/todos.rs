// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::context::AppContext;
use crate::models::{Outcome, Priority, RecordId, Todo, TodoCategory, next_record_id};
use crate::store::{self, RecordStore, keys};
use crate::utils::{maybe_print_json, now_millis, parse_date, pretty_table, today};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    Category,
    DueDate,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "priority" => Ok(SortKey::Priority),
            "category" => Ok(SortKey::Category),
            "due" | "duedate" | "due-date" => Ok(SortKey::DueDate),
            other => Err(anyhow!("Unknown sort key '{}' (use priority|category|due)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::DueDate,
            order: SortOrder::Asc,
        }
    }
}

impl SortState {
    /// Picking the active key again flips the order; a new key starts
    /// ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            let order = match self.order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
            Self { key, order }
        } else {
            Self {
                key,
                order: SortOrder::Asc,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub category: TodoCategory,
}

fn seed_todos() -> Vec<Todo> {
    [
        (1_i64, "Review quarterly budget", Priority::High, 15, TodoCategory::Finance, false),
        (2, "Schedule team meeting", Priority::Medium, 14, TodoCategory::Work, true),
        (3, "Buy groceries", Priority::Low, 13, TodoCategory::Personal, false),
        (4, "Prepare presentation", Priority::High, 16, TodoCategory::Work, false),
        (5, "Call dentist", Priority::Medium, 14, TodoCategory::Health, false),
    ]
    .into_iter()
    .filter_map(|(id, title, priority, day, category, completed)| {
        Some(Todo {
            id: RecordId::from(id),
            title: title.to_string(),
            priority,
            due_date: NaiveDate::from_ymd_opt(2024, 3, day)?,
            category,
            completed,
        })
    })
    .collect()
}

pub struct Todos<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    todos: Vec<Todo>,
}

impl<'s, S: RecordStore + ?Sized> Todos<'s, S> {
    pub fn load(store: &'s S, ctx: &mut AppContext) -> Result<Self> {
        let todos = store::load_collection(store, keys::TODOS)?.unwrap_or_else(seed_todos);
        let this = Self { store, todos };
        this.commit(ctx)?;
        Ok(this)
    }

    fn commit(&self, ctx: &mut AppContext) -> Result<()> {
        store::save_collection(self.store, keys::TODOS, &self.todos)?;
        ctx.set_task_stats(self.completed_count(), self.todos.len());
        Ok(())
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// Blank titles are ignored and yield `None`.
    pub fn add_todo(&mut self, ctx: &mut AppContext, new: NewTodo) -> Result<Option<Todo>> {
        let title = new.title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let todo = Todo {
            id: next_record_id(self.todos.iter().map(|t| &t.id), now_millis()),
            title: title.to_string(),
            priority: new.priority,
            due_date: new.due_date,
            category: new.category,
            completed: false,
        };
        self.todos.push(todo.clone());
        self.commit(ctx)?;
        info!(id = %todo.id, "todo added");
        Ok(Some(todo))
    }

    pub fn toggle_todo(&mut self, ctx: &mut AppContext, id: &str) -> Result<Option<Outcome<Todo>>> {
        let was_all = self.all_completed();
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == *id) else {
            return Ok(None);
        };
        todo.completed = !todo.completed;
        let record = todo.clone();
        self.commit(ctx)?;
        Ok(Some(Outcome {
            record,
            celebrate: self.all_completed() && !was_all,
        }))
    }

    pub fn delete_todo(&mut self, ctx: &mut AppContext, id: &str) -> Result<bool> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != *id);
        if self.todos.len() == before {
            return Ok(false);
        }
        self.commit(ctx)?;
        Ok(true)
    }

    /// Open items always precede completed ones; within each group the
    /// chosen key and order apply.
    pub fn sorted(&self, sort: SortState) -> Vec<&Todo> {
        let mut out: Vec<&Todo> = self.todos.iter().collect();
        out.sort_by(|a, b| {
            a.completed.cmp(&b.completed).then_with(|| {
                let ord = match sort.key {
                    SortKey::Priority => a.priority.cmp(&b.priority),
                    SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
                    SortKey::DueDate => a.due_date.cmp(&b.due_date),
                };
                match sort.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            })
        });
        out
    }
}

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    let mut ctx = AppContext::new();
    ctx.initialize(store, today)?;
    let mut todos = Todos::load(store, &mut ctx)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewTodo {
                title: sub.get_one::<String>("title").unwrap().to_string(),
                priority: sub.get_one::<String>("priority").unwrap().parse()?,
                due_date: match sub.get_one::<String>("due") {
                    Some(d) => parse_date(d)?,
                    None => today,
                },
                category: sub.get_one::<String>("category").unwrap().parse()?,
            };
            match todos.add_todo(&mut ctx, new)? {
                Some(t) => println!("Added '{}' (due {})", t.title, t.due_date),
                None => eprintln!("Ignored to-do: title must not be blank"),
            }
        }
        Some(("list", sub)) => list(&todos, &ctx, sub)?,
        Some(("done", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            match todos.toggle_todo(&mut ctx, id)? {
                Some(out) => {
                    let state = if out.record.completed { "done" } else { "open" };
                    println!(
                        "'{}' marked {}; {}/{} tasks done",
                        out.record.title,
                        state,
                        ctx.tasks().completed,
                        ctx.tasks().total
                    );
                    if out.celebrate {
                        println!("🎉 All tasks completed!");
                    }
                }
                None => eprintln!("No to-do with id {}", id),
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if todos.delete_todo(&mut ctx, id)? {
                println!("Removed to-do {}", id);
            } else {
                eprintln!("No to-do with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn list<S: RecordStore + ?Sized>(
    todos: &Todos<'_, S>,
    ctx: &AppContext,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let sort = SortState {
        key: match sub.get_one::<String>("sort") {
            Some(k) => k.parse()?,
            None => SortKey::DueDate,
        },
        order: if sub.get_flag("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        },
    };
    let sorted = todos.sorted(sort);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &sorted)? {
        return Ok(());
    }
    let rows = sorted
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                if t.completed { "✔".into() } else { " ".into() },
                t.title.clone(),
                t.priority.to_string(),
                t.category.to_string(),
                t.due_date.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Done", "Title", "Priority", "Category", "Due"], rows)
    );
    println!(
        "Completed {}/{} ({}%)",
        ctx.tasks().completed,
        ctx.tasks().total,
        ctx.tasks_percentage()
    );
    Ok(())
}
