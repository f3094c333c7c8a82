// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const UA: &str = concat!("planify/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .with_context(|| format!("Invalid time '{}', expected HH:MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a form amount. Non-numeric and non-positive input yields `None`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    parse_decimal(s).ok().filter(|d| *d > Decimal::ZERO)
}

pub fn fmt_money(d: &Decimal) -> String {
    let d = d.round_dp(2);
    if d.is_sign_negative() {
        format!("-${:.2}", d.abs())
    } else {
        format!("${:.2}", d)
    }
}

pub fn fmt_time_12h(t: &NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Age of a dated record: whole hours under a day, whole days after.
/// Dates are taken at local midnight; future dates read as "0h ago".
pub fn fmt_relative(date: NaiveDate, now: NaiveDateTime) -> String {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or(now);
    let hours = (now - start).num_hours().max(0);
    if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", hours / 24)
    }
}

/// `round(100 * part / whole)`, half away from zero; 0 when `whole` is 0.
pub fn percent(part: Decimal, whole: Decimal) -> i64 {
    if whole.is_zero() {
        return 0;
    }
    (part * Decimal::ONE_HUNDRED / whole)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Same rounding as [`percent`] for counts.
pub fn share(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * count + total) / (2 * total)) as u32
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line.
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up_and_guards_zero() {
        assert_eq!(percent(Decimal::new(88520, 2), Decimal::from(3500)), 25);
        assert_eq!(percent(Decimal::ONE, Decimal::from(8)), 13);
        assert_eq!(percent(Decimal::from(10), Decimal::ZERO), 0);
    }

    #[test]
    fn share_matches_percent_rounding() {
        assert_eq!(share(1, 8), 13);
        assert_eq!(share(2, 3), 67);
        assert_eq!(share(1, 3), 33);
        assert_eq!(share(0, 0), 0);
        assert_eq!(share(4, 4), 100);
    }

    #[test]
    fn amount_rejects_non_positive_and_garbage() {
        assert_eq!(parse_amount(" 12.50 "), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn relative_age_switches_from_hours_to_days() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let at = |d: u32, h: u32| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(h, 30, 0)
                .unwrap()
        };
        assert_eq!(fmt_relative(day, at(20, 9)), "9h ago");
        assert_eq!(fmt_relative(day, at(20, 23)), "23h ago");
        assert_eq!(fmt_relative(day, at(21, 0)), "1d ago");
        assert_eq!(fmt_relative(day, at(23, 12)), "3d ago");
        assert_eq!(fmt_relative(day, at(19, 12)), "0h ago");
    }

    #[test]
    fn time_accepts_minutes_or_seconds() {
        let t = parse_time("06:00").unwrap();
        assert_eq!(fmt_time_12h(&t), "6:00 AM");
        assert_eq!(parse_time("20:30:00").unwrap(), NaiveTime::from_hms_opt(20, 30, 0).unwrap());
        assert!(parse_time("25:00").is_err());
    }
}
