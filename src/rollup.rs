// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending rollups: current-month scoping, per-category breakdown and
//! fixed-size time buckets for charts.
//!
//! Everything here is pure and recomputed from the expense list on each
//! call.

use crate::models::{Expense, ExpenseCategory};
use crate::utils::percent;
use anyhow::anyhow;
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartRange {
    #[default]
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "3months")]
    ThreeMonths,
}

impl ChartRange {
    pub const ALL: &'static [ChartRange] = &[
        ChartRange::SevenDays,
        ChartRange::ThirtyDays,
        ChartRange::ThreeMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::SevenDays => "7days",
            ChartRange::ThirtyDays => "30days",
            ChartRange::ThreeMonths => "3months",
        }
    }

    pub fn bucket_count(&self) -> usize {
        match self {
            ChartRange::SevenDays => 7,
            ChartRange::ThirtyDays => 6,
            ChartRange::ThreeMonths => 3,
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ChartRange::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown chart range '{}' (use 7days|30days|3months)", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: ExpenseCategory,
    pub spent: Decimal,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub amount: Decimal,
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.month() == b.month() && a.year() == b.year()
}

/// Expenses dated in the reference date's month and year.
pub fn month_filter<'a, I>(records: I, reference: NaiveDate) -> Vec<&'a Expense>
where
    I: IntoIterator<Item = &'a Expense>,
{
    records
        .into_iter()
        .filter(|e| same_month(e.date, reference))
        .collect()
}

/// Everything [`month_filter`] leaves out.
pub fn month_complement<'a, I>(records: I, reference: NaiveDate) -> Vec<&'a Expense>
where
    I: IntoIterator<Item = &'a Expense>,
{
    records
        .into_iter()
        .filter(|e| !same_month(e.date, reference))
        .collect()
}

pub fn total<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a Expense>,
{
    records.into_iter().map(|e| e.amount).sum()
}

/// One entry per requested category, in the order given. Percentages are
/// of the total of `records`, not of the budget.
pub fn category_breakdown<'a, I>(records: I, categories: &[ExpenseCategory]) -> Vec<CategorySpend>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let records: Vec<&Expense> = records.into_iter().collect();
    let all = total(records.iter().copied());
    categories
        .iter()
        .map(|&category| {
            let spent = total(records.iter().copied().filter(|e| e.category == category));
            CategorySpend {
                category,
                spent,
                percentage: percent(spent, all),
            }
        })
        .collect()
}

pub fn time_bucket_series<'a, I>(records: I, mode: ChartRange, reference: NaiveDate) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let records: Vec<&Expense> = records.into_iter().collect();
    match mode {
        ChartRange::SevenDays => daily_buckets(&records, reference),
        ChartRange::ThirtyDays => five_day_buckets(&records, reference),
        ChartRange::ThreeMonths => month_buckets(&records, reference),
    }
}

fn days_before(d: NaiveDate, n: u64) -> NaiveDate {
    d.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

fn daily_buckets(records: &[&Expense], reference: NaiveDate) -> Vec<Bucket> {
    (0..7u64)
        .rev()
        .map(|back| {
            let day = days_before(reference, back);
            Bucket {
                label: day.format("%a %-d").to_string(),
                amount: total(records.iter().copied().filter(|e| e.date == day)),
            }
        })
        .collect()
}

fn five_day_buckets(records: &[&Expense], reference: NaiveDate) -> Vec<Bucket> {
    (0..6u64)
        .rev()
        .map(|back| {
            let end = days_before(reference, back * 5);
            let start = days_before(end, 4);
            Bucket {
                label: format!("{}-{} {}", start.day(), end.day(), end.format("%b")),
                amount: total(
                    records
                        .iter()
                        .copied()
                        .filter(|e| e.date >= start && e.date <= end),
                ),
            }
        })
        .collect()
}

// Matches on the month label alone, so a record from the same month of a
// different year lands in that bucket too.
fn month_buckets(records: &[&Expense], reference: NaiveDate) -> Vec<Bucket> {
    let first = reference.with_day(1).unwrap_or(reference);
    (0..3u32)
        .rev()
        .map(|back| {
            let month = first
                .checked_sub_months(Months::new(back))
                .unwrap_or(first);
            Bucket {
                label: month.format("%b").to_string(),
                amount: total(
                    records
                        .iter()
                        .copied()
                        .filter(|e| e.date.month() == month.month()),
                ),
            }
        })
        .collect()
}
