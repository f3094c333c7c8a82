// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Display metadata attached to every closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
    pub label: &'static str,
    pub color: &'static str,
}

macro_rules! closed_enum {
    (
        $(#[$attr:meta])*
        $name:ident { $($variant:ident => ($tag:literal, $label:literal, $color:literal)),+ $(,)? }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $tag)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            pub fn meta(&self) -> Meta {
                match self {
                    $($name::$variant => Meta { label: $label, color: $color }),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.meta().label)
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let known: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        anyhow!("Unknown {} '{}' (expected one of: {})", stringify!($name), s, known.join(", "))
                    })
            }
        }
    };
}

closed_enum! {
    ExpenseCategory {
        Housing => ("Housing", "Housing", "purple"),
        Food => ("Food", "Food", "blue"),
        Transportation => ("Transportation", "Transportation", "green"),
        Shopping => ("Shopping", "Shopping", "red"),
        Other => ("Other", "Other", "gray"),
    }
}

closed_enum! {
    HabitIcon {
        Dumbbell => ("Dumbbell", "Exercise", "rose"),
        Book => ("Book", "Reading", "indigo"),
        Coffee => ("Coffee", "Coffee", "amber"),
        Sunrise => ("Sunrise", "Morning", "orange"),
        Sparkles => ("Sparkles", "Mindfulness", "violet"),
        Utensils => ("Utensils", "Meals", "emerald"),
    }
}

closed_enum! {
    /// Declared high to low so that `Ord` puts the most urgent first.
    Priority {
        High => ("high", "High", "red"),
        Medium => ("medium", "Medium", "yellow"),
        Low => ("low", "Low", "green"),
    }
}

closed_enum! {
    TodoCategory {
        Work => ("Work", "Work", "blue"),
        Personal => ("Personal", "Personal", "green"),
        Health => ("Health", "Health", "yellow"),
        Finance => ("Finance", "Finance", "red"),
        Other => ("Other", "Other", "purple"),
    }
}

closed_enum! {
    GoalCategory {
        Personal => ("Personal", "Personal", "purple"),
        Health => ("Health", "Health", "green"),
        Finance => ("Finance", "Finance", "blue"),
        Education => ("Education", "Education", "yellow"),
        Career => ("Career", "Career", "red"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub icon: HabitIcon,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub streak: u32,
    pub completed: bool,
}

/// Text id used by to-dos and goals. Older lists may carry plain numbers,
/// which are read as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Number(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.trim().to_string())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId(n.to_string())
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: RecordId,
    pub title: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub category: TodoCategory,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub title: String,
    pub category: GoalCategory,
    pub deadline: NaiveDate,
    pub progress: u8,
    pub completed: bool,
}

/// Result of a mutation that may cross a "everything done" threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub record: T,
    pub celebrate: bool,
}

/// Next free id: the current timestamp in millis, bumped past any id
/// already in use.
pub fn next_id(existing: impl IntoIterator<Item = i64>, now_millis: i64) -> i64 {
    let max = existing.into_iter().max().unwrap_or(i64::MIN);
    if now_millis > max {
        now_millis
    } else {
        max.saturating_add(1)
    }
}

/// Next free text id: `<millis>-<base36 suffix>`, the suffix bumped until
/// it is not already taken.
pub fn next_record_id<'a>(
    existing: impl IntoIterator<Item = &'a RecordId>,
    now_millis: i64,
) -> RecordId {
    let taken: HashSet<&str> = existing.into_iter().map(RecordId::as_str).collect();
    let mut seq = taken.len() as u64;
    loop {
        let candidate = format!("{}-{}", now_millis, base36(seq));
        if !taken.contains(candidate.as_str()) {
            return RecordId(candidate);
        }
        seq += 1;
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        crate::utils::parse_time(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_saturates_at_max() {
        assert_eq!(next_id([3, 9], 5), 10);
        assert_eq!(next_id([], 42), 42);
        assert_eq!(next_id([i64::MAX], 0), i64::MAX);
    }

    #[test]
    fn record_ids_read_numbers_and_text() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[4, "1729200000000-k3j2h1"]"#).unwrap();
        assert_eq!(ids[0], RecordId::from(4_i64));
        assert_eq!(ids[1].as_str(), "1729200000000-k3j2h1");
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["4","1729200000000-k3j2h1"]"#);
    }

    #[test]
    fn next_record_id_skips_taken_suffixes() {
        let taken = vec![RecordId::from("100-1"), RecordId::from("100-2")];
        assert_eq!(next_record_id(&taken, 100).as_str(), "100-3");
        assert_eq!(next_record_id(&Vec::<RecordId>::new(), 7).as_str(), "7-0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
    }
}
