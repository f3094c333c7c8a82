// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use planify::{cli, commands, config::Settings, db};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings = Settings::load()?;
    let store = db::open_or_init(&settings)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Record store at {}", db::db_path(&settings)?.display());
        }
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, sub)?,
        Some(("budget", sub)) => commands::budget::handle(&store, sub)?,
        Some(("habits", sub)) => commands::habits::handle(&store, sub)?,
        Some(("todos", sub)) => commands::todos::handle(&store, sub)?,
        Some(("goals", sub)) => commands::goals::handle(&store, sub)?,
        Some(("range", sub)) => commands::view::set_range(&store, sub)?,
        Some(("go", sub)) => commands::view::go(&store, sub)?,
        Some(("auth", sub)) => commands::session::handle(&store, &settings, sub)?,
        Some(("user", sub)) => {
            if let Some(("set", set)) = sub.subcommand() {
                commands::session::set_username(&store, set)?;
            }
        }
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
