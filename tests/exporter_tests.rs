// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use planify::cli;
use planify::commands::{budget, exporter};
use planify::models::Expense;
use planify::store::MemoryStore;
use tempfile::tempdir;

fn run(store: &MemoryStore, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("export", sub)) => exporter::handle(store, sub),
        Some(("budget", sub)) => budget::handle(store, sub),
        _ => panic!("unexpected command {:?}", argv),
    }
}

#[test]
fn csv_export_is_sorted_by_date() {
    let store = MemoryStore::new();
    run(&store, &["planify", "budget", "list"]).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    let out_s = out.to_str().unwrap();
    run(&store, &["planify", "export", "expenses", "--out", out_s]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["id", "date", "category", "amount"]);
    let dates: Vec<String> = rdr
        .records()
        .map(|r| r.unwrap()[1].to_string())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-15", "2024-01-18", "2024-01-20", "2024-01-21"]
    );
}

#[test]
fn json_export_round_trips() {
    let store = MemoryStore::new();
    run(&store, &["planify", "budget", "list"]).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    let out_s = out.to_str().unwrap();
    run(&store, &["planify", "export", "expenses", "--format", "JSON", "--out", out_s]).unwrap();
    let raw = std::fs::read_to_string(&out).unwrap();
    let parsed: Vec<Expense> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 4);
}

#[test]
fn unknown_format_is_an_error() {
    let store = MemoryStore::new();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.xml");
    let err = run(
        &store,
        &["planify", "export", "expenses", "--format", "xml", "--out", out.to_str().unwrap()],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}
