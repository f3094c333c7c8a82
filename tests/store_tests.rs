// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use planify::commands::doctor;
use planify::config::Settings;
use planify::db::{self, SqliteStore};
use planify::models::Expense;
use planify::store::{
    MemoryStore, RecordStore, StoreError, keys, load_collection, load_date, parse_collection,
    save_date,
};
use tempfile::tempdir;

#[test]
fn sqlite_store_upserts_and_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("planify.sqlite");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.save("b", "1").unwrap();
        store.save("a", "2").unwrap();
        store.save("b", "3").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.load("b").unwrap().as_deref(), Some("3"));
    store.remove("b").unwrap();
    assert_eq!(store.load("b").unwrap(), None);
    let n: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn open_or_init_honours_configured_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.sqlite");
    let settings = Settings {
        db_path: Some(path.clone()),
        ..Settings::default()
    };
    let store = db::open_or_init(&settings).unwrap();
    store.save(keys::USERNAME, "Sam").unwrap();
    assert!(path.exists());
    assert_eq!(db::db_path(&settings).unwrap(), path);
}

#[test]
fn corrupt_collection_is_discarded() {
    let store = MemoryStore::new();
    store.save(keys::EXPENSES, r#"[{"id":1}]"#).unwrap();
    let loaded: Option<Vec<Expense>> = load_collection(&store, keys::EXPENSES).unwrap();
    assert!(loaded.is_none());
    assert_eq!(store.load(keys::EXPENSES).unwrap(), None);
}

#[test]
fn corrupt_error_names_the_key() {
    let err = parse_collection::<Expense>(keys::GOALS, "nope").unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert!(err.to_string().contains("planify-goals"));
}

#[test]
fn dates_round_trip_and_bad_dates_are_dropped() {
    let store = MemoryStore::new();
    let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    save_date(&store, keys::HABITS_LAST_RESET, day).unwrap();
    assert_eq!(load_date(&store, keys::HABITS_LAST_RESET).unwrap(), Some(day));
    store.save(keys::HABITS_LAST_RESET, "Thu Feb 29").unwrap();
    assert_eq!(load_date(&store, keys::HABITS_LAST_RESET).unwrap(), None);
}

#[test]
fn doctor_reports_each_present_key() {
    let store = MemoryStore::new();
    store.save(keys::EXPENSES, "[]").unwrap();
    store.save(keys::GOALS, "{").unwrap();
    store.save(keys::MONTHLY_BUDGET, "3500").unwrap();
    let rows = doctor::diagnose(&store).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], (keys::EXPENSES.to_string(), "ok (0 records)".to_string()));
    assert!(rows[1].1.starts_with("corrupt:"));
    assert_eq!(rows[2].1, "ok (3500)");
    // Diagnosis never modifies the store.
    assert_eq!(store.load(keys::GOALS).unwrap().as_deref(), Some("{"));
}
