// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat key-value record store.
//!
//! Every collection is stored under one key as a JSON document. Values are
//! not versioned; whatever parses is trusted.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

pub mod keys {
    pub const EXPENSES: &str = "planify-expenses";
    pub const HABITS: &str = "planify-habits";
    pub const TODOS: &str = "planify-todos";
    pub const GOALS: &str = "planify-goals";
    pub const MONTHLY_BUDGET: &str = "planify-monthly-budget";
    pub const HABITS_LAST_RESET: &str = "habits-last-reset";
    pub const USERNAME: &str = "planify-username";
    pub const SESSION: &str = "planify-session";
    pub const CHART_RANGE: &str = "planify-chart-range";
}

pub trait RecordStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("stored value under '{key}' is not a valid {what}: '{raw}'")]
    BadScalar {
        key: String,
        what: &'static str,
        raw: String,
    },
}

/// In-process store, used for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.map.borrow().keys().cloned().collect())
    }
}

pub fn parse_collection<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// Loads a collection. `None` when the key is absent, or when the stored
/// value fails to parse, in which case the corrupt value is discarded.
pub fn load_collection<T, S>(store: &S, key: &str) -> Result<Option<Vec<T>>>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    match parse_collection(key, &raw) {
        Ok(items) => Ok(Some(items)),
        Err(err) => {
            warn!(%err, "discarding corrupt collection");
            store.remove(key)?;
            Ok(None)
        }
    }
}

pub fn save_collection<T, S>(store: &S, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    let raw = serde_json::to_string(items).with_context(|| format!("Serialize '{}'", key))?;
    store.save(key, &raw)?;
    debug!(key, count = items.len(), "collection saved");
    Ok(())
}

pub fn parse_decimal_value(key: &str, raw: &str) -> Result<Decimal, StoreError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| StoreError::BadScalar {
            key: key.to_string(),
            what: "decimal",
            raw: raw.to_string(),
        })
}

pub fn parse_date_value(key: &str, raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| StoreError::BadScalar {
        key: key.to_string(),
        what: "date",
        raw: raw.to_string(),
    })
}

pub fn load_decimal<S: RecordStore + ?Sized>(store: &S, key: &str) -> Result<Option<Decimal>> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    match parse_decimal_value(key, &raw) {
        Ok(d) => Ok(Some(d)),
        Err(err) => {
            warn!(%err, "discarding corrupt scalar");
            store.remove(key)?;
            Ok(None)
        }
    }
}

pub fn save_decimal<S: RecordStore + ?Sized>(store: &S, key: &str, value: Decimal) -> Result<()> {
    store.save(key, &value.to_string())
}

pub fn load_date<S: RecordStore + ?Sized>(store: &S, key: &str) -> Result<Option<NaiveDate>> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    match parse_date_value(key, &raw) {
        Ok(d) => Ok(Some(d)),
        Err(err) => {
            warn!(%err, "discarding corrupt scalar");
            store.remove(key)?;
            Ok(None)
        }
    }
}

pub fn save_date<S: RecordStore + ?Sized>(store: &S, key: &str, value: NaiveDate) -> Result<()> {
    store.save(key, &value.format("%Y-%m-%d").to_string())
}
