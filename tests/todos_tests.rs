// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use planify::commands::todos::{NewTodo, SortKey, SortOrder, SortState, Todos};
use planify::context::AppContext;
use planify::models::{Priority, Todo, TodoCategory};
use planify::store::{MemoryStore, RecordStore, keys, load_collection};

fn ids(todos: &Todos<'_, MemoryStore>, sort: SortState) -> Vec<String> {
    todos.sorted(sort).iter().map(|t| t.id.to_string()).collect()
}

#[test]
fn default_sort_is_due_date_with_completed_last() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let todos = Todos::load(&store, &mut ctx).unwrap();
    assert_eq!(ctx.tasks().completed, 1);
    assert_eq!(ctx.tasks().total, 5);
    assert_eq!(ctx.tasks_percentage(), 20);
    assert_eq!(ids(&todos, SortState::default()), ["3", "5", "1", "4", "2"]);
}

#[test]
fn priority_sort_both_directions() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let todos = Todos::load(&store, &mut ctx).unwrap();
    let asc = SortState::default().toggle(SortKey::Priority);
    assert_eq!(asc.order, SortOrder::Asc);
    assert_eq!(ids(&todos, asc), ["1", "4", "5", "3", "2"]);
    let desc = asc.toggle(SortKey::Priority);
    assert_eq!(desc.order, SortOrder::Desc);
    assert_eq!(ids(&todos, desc), ["3", "5", "1", "4", "2"]);
}

#[test]
fn toggling_sort_state() {
    let s = SortState::default();
    assert_eq!(s.key, SortKey::DueDate);
    let flipped = s.toggle(SortKey::DueDate);
    assert_eq!(flipped.order, SortOrder::Desc);
    let other = flipped.toggle(SortKey::Category);
    assert_eq!(other.key, SortKey::Category);
    assert_eq!(other.order, SortOrder::Asc);
    assert_eq!("due".parse::<SortKey>().unwrap(), SortKey::DueDate);
    assert!("title".parse::<SortKey>().is_err());
}

#[test]
fn finishing_every_task_celebrates() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let mut todos = Todos::load(&store, &mut ctx).unwrap();
    for id in ["1", "3", "4"] {
        assert!(!todos.toggle_todo(&mut ctx, id).unwrap().unwrap().celebrate);
    }
    let last = todos.toggle_todo(&mut ctx, "5").unwrap().unwrap();
    assert!(last.celebrate);
    assert_eq!(ctx.tasks_percentage(), 100);
    assert!(todos.toggle_todo(&mut ctx, "42").unwrap().is_none());
}

#[test]
fn add_and_delete_persist_camel_case() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let mut todos = Todos::load(&store, &mut ctx).unwrap();
    let new = NewTodo {
        title: "  File taxes ".into(),
        priority: Priority::High,
        due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        category: TodoCategory::Finance,
    };
    let added = todos.add_todo(&mut ctx, new).unwrap().unwrap();
    assert_eq!(added.title, "File taxes");
    assert_eq!(ctx.tasks().total, 6);
    let raw = store.load(keys::TODOS).unwrap().unwrap();
    assert!(raw.contains(r#""dueDate":"2024-04-15""#));
    assert!(raw.contains(r#""priority":"high""#));

    assert!(todos.delete_todo(&mut ctx, added.id.as_str()).unwrap());
    assert_eq!(ctx.tasks().total, 5);
    assert_eq!(todos.todos().len(), 5);
}

#[test]
fn blank_title_is_ignored() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let mut todos = Todos::load(&store, &mut ctx).unwrap();
    let new = NewTodo {
        title: String::new(),
        priority: Priority::Low,
        due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        category: TodoCategory::Other,
    };
    assert!(todos.add_todo(&mut ctx, new).unwrap().is_none());
    assert_eq!(todos.todos().len(), 5);
}

#[test]
fn category_sort_is_alphabetical_by_name() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let todos = Todos::load(&store, &mut ctx).unwrap();
    // Finance, Health, Personal, Work; the completed Work item stays last.
    let asc = SortState::default().toggle(SortKey::Category);
    assert_eq!(ids(&todos, asc), ["1", "5", "3", "4", "2"]);
    let desc = asc.toggle(SortKey::Category);
    assert_eq!(ids(&todos, desc), ["4", "3", "5", "1", "2"]);
}

#[test]
fn due_date_descending_keeps_completed_last() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let todos = Todos::load(&store, &mut ctx).unwrap();
    let desc = SortState::default().toggle(SortKey::DueDate);
    assert_eq!(desc.order, SortOrder::Desc);
    assert_eq!(ids(&todos, desc), ["4", "1", "5", "3", "2"]);
}

#[test]
fn text_ids_from_an_existing_list_are_kept() {
    let store = MemoryStore::new();
    store
        .save(
            keys::TODOS,
            r#"[{"id":"1729200000000-k3j2h1","title":"Pay rent","priority":"high","dueDate":"2024-10-01","category":"Finance","completed":false},
                {"id":2,"title":"Walk","priority":"low","dueDate":"2024-10-02","category":"Health","completed":true}]"#,
        )
        .unwrap();
    let mut ctx = AppContext::new();
    let mut todos = Todos::load(&store, &mut ctx).unwrap();
    let titles: Vec<&str> = todos.todos().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Pay rent", "Walk"]);
    assert_eq!(ctx.tasks().total, 2);

    let out = todos
        .toggle_todo(&mut ctx, "1729200000000-k3j2h1")
        .unwrap()
        .unwrap();
    assert!(out.celebrate);
    let saved: Vec<Todo> = load_collection(&store, keys::TODOS).unwrap().unwrap();
    assert_eq!(saved[0].id.as_str(), "1729200000000-k3j2h1");
    assert_eq!(saved[1].id.as_str(), "2");
}

#[test]
fn new_ids_are_text_and_unique() {
    let store = MemoryStore::new();
    let mut ctx = AppContext::new();
    let mut todos = Todos::load(&store, &mut ctx).unwrap();
    let mut seen = Vec::new();
    for title in ["a", "b", "c"] {
        let new = NewTodo {
            title: title.into(),
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            category: TodoCategory::Other,
        };
        let added = todos.add_todo(&mut ctx, new).unwrap().unwrap();
        assert!(added.id.as_str().contains('-'));
        assert!(!seen.contains(&added.id));
        seen.push(added.id);
    }
}
