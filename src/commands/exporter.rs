// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Expense;
use crate::store::{self, RecordStore, keys};
use anyhow::{Result, bail};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(store, sub),
        _ => Ok(()),
    }
}

fn export_expenses<S: RecordStore + ?Sized>(store: &S, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut expenses: Vec<Expense> =
        store::load_collection(store, keys::EXPENSES)?.unwrap_or_default();
    expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "category", "amount"])?;
            for e in &expenses {
                wtr.write_record([
                    e.id.to_string(),
                    e.date.to_string(),
                    e.category.as_str().to_string(),
                    e.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&expenses)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} expense(s) to {}", expenses.len(), out);
    Ok(())
}
