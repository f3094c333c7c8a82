// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Expense, Goal, Habit, Todo};
use crate::store::{RecordStore, StoreError, keys, parse_collection, parse_date_value, parse_decimal_value};
use crate::utils::pretty_table;
use anyhow::Result;

fn check<S, F>(store: &S, key: &str, parse: F) -> Result<Option<String>>
where
    S: RecordStore + ?Sized,
    F: Fn(&str, &str) -> Result<String, StoreError>,
{
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    Ok(Some(match parse(key, &raw) {
        Ok(detail) => detail,
        Err(err) => format!("corrupt: {}", err),
    }))
}

fn count<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Result<String, StoreError> {
    parse_collection::<T>(key, raw).map(|v| format!("ok ({} records)", v.len()))
}

/// One row per stored key: record count, scalar value, or the parse error.
pub fn diagnose<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    let checks: [(&str, fn(&str, &str) -> Result<String, StoreError>); 6] = [
        (keys::EXPENSES, count::<Expense>),
        (keys::HABITS, count::<Habit>),
        (keys::TODOS, count::<Todo>),
        (keys::GOALS, count::<Goal>),
        (keys::MONTHLY_BUDGET, |k, raw| {
            parse_decimal_value(k, raw).map(|d| format!("ok ({})", d))
        }),
        (keys::HABITS_LAST_RESET, |k, raw| {
            parse_date_value(k, raw).map(|d| format!("ok ({})", d))
        }),
    ];
    for (key, parse) in checks {
        if let Some(detail) = check(store, key, parse)? {
            rows.push((key.to_string(), detail));
        }
    }
    Ok(rows)
}

pub fn handle<S: RecordStore + ?Sized>(store: &S) -> Result<()> {
    let rows = diagnose(store)?;
    let bad = rows.iter().filter(|(_, d)| d.starts_with("corrupt")).count();
    println!(
        "{}",
        pretty_table(
            &["Key", "Status"],
            rows.into_iter().map(|(k, d)| vec![k, d]).collect()
        )
    );
    if bad == 0 {
        println!("✅ doctor: no issues found");
    } else {
        println!("doctor: {} corrupt key(s); they will be reset to defaults on next use", bad);
    }
    Ok(())
}
