// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::build_cli;
use crate::commands::{budget, dashboard, goals, habits, todos};
use crate::nav::{Section, navigate_to};
use crate::rollup::ChartRange;
use crate::store::{RecordStore, keys};
use anyhow::Result;

/// Opens a section's default view, as a tab click would.
pub fn go<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let section = navigate_to(m.get_one::<String>("section").unwrap())?;
    let argv: Vec<&str> = match section {
        Section::Dashboard => vec!["planify", "dashboard"],
        other => vec!["planify", other.id(), "list"],
    };
    let matches = build_cli().try_get_matches_from(argv)?;
    let Some((_, sub)) = matches.subcommand() else {
        return Ok(());
    };
    match section {
        Section::Dashboard => dashboard::handle(store, sub),
        Section::Budget => budget::handle(store, sub),
        Section::Habits => habits::handle(store, sub),
        Section::Todos => todos::handle(store, sub),
        Section::Goals => goals::handle(store, sub),
    }
}

/// Remembers the chart range used by `budget chart` and the dashboard.
pub fn set_range<S: RecordStore + ?Sized>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let range: ChartRange = m.get_one::<String>("mode").unwrap().parse()?;
    store.save(keys::CHART_RANGE, range.as_str())?;
    println!("Chart range set to {}", range);
    Ok(())
}
